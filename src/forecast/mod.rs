//! Demand forecasting with a per-type regression model and a fixed fallback.
//!
//! The forecaster owns a table of `(scaler, forest)` pairs keyed by resource
//! type. The table is published through an [`ArcSwap`]: training builds a
//! complete replacement (starting from the current table, so types without
//! enough rows keep their previous model) and swaps it in with one store.
//! Readers load a snapshot and never block.

mod dataset;

pub use dataset::{load_history, DatasetError};

use arc_swap::ArcSwap;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};

use crate::config::defaults::{default_demand, FALLBACK_CONFIDENCE, TRAINED_CONFIDENCE};
use crate::config::ForecasterConfig;
use crate::error::EngineError;
use crate::ml::{ForestParams, RandomForestRegressor, StandardScaler, TreeParams};
use crate::types::{
    Forecast, ForecastFeatures, HistoricalRecord, ModelStatus, ResourceType, TrainingSummary,
    TypeTrainingOutcome, FORECAST_TIMEFRAME, NUM_FORECAST_FEATURES,
};

/// A fitted model for one resource type.
#[derive(Debug)]
struct TypeModel {
    scaler: StandardScaler<NUM_FORECAST_FEATURES>,
    forest: RandomForestRegressor<NUM_FORECAST_FEATURES>,
    training_rows: usize,
}

type ModelTable = BTreeMap<ResourceType, Arc<TypeModel>>;

/// Per-type demand forecaster.
pub struct DemandForecaster {
    config: ForecasterConfig,
    models: ArcSwap<ModelTable>,
    /// Serialises trainers so concurrent training calls cannot drop each
    /// other's models. Predictions never take it.
    train_lock: Mutex<()>,
}

impl DemandForecaster {
    /// Create an untrained forecaster.
    pub fn new(config: ForecasterConfig) -> Self {
        Self {
            config,
            models: ArcSwap::from_pointee(ModelTable::new()),
            train_lock: Mutex::new(()),
        }
    }

    fn forest_params(&self) -> ForestParams {
        ForestParams {
            n_estimators: self.config.n_estimators,
            seed: self.config.random_seed,
            tree: TreeParams {
                max_depth: self.config.max_depth,
                min_samples_split: self.config.min_samples_split,
            },
        }
    }

    /// Fit a model for every forecastable type that has enough rows.
    ///
    /// Rows of non-forecastable types are ignored. A type below
    /// `min_training_rows` keeps its previous model. Non-finite features or
    /// a negative/non-finite quantity reject the whole dataset.
    pub fn train(&self, records: &[HistoricalRecord]) -> Result<TrainingSummary, EngineError> {
        if let Some(pos) = records.iter().position(|r| !r.is_well_formed()) {
            return Err(EngineError::InvalidDataset(format!(
                "record {pos} has a non-finite feature or invalid quantity"
            )));
        }

        let _guard = self.train_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let params = self.forest_params();
        let mut table: ModelTable = (**self.models.load()).clone();
        let mut outcomes = Vec::with_capacity(ResourceType::FORECASTABLE.len());

        for resource_type in ResourceType::FORECASTABLE {
            let rows: Vec<&HistoricalRecord> = records
                .iter()
                .filter(|r| r.resource_type == resource_type)
                .collect();

            let fitted = if rows.len() < self.config.min_training_rows {
                info!(
                    resource_type = %resource_type,
                    rows = rows.len(),
                    required = self.config.min_training_rows,
                    "Too few rows, leaving model unchanged"
                );
                None
            } else {
                fit_type_model(&rows, &params)
            };

            let trained = match fitted {
                Some(model) => {
                    info!(
                        resource_type = %resource_type,
                        rows = model.training_rows,
                        trees = model.forest.n_trees(),
                        "Demand model fitted"
                    );
                    table.insert(resource_type, Arc::new(model));
                    true
                }
                None => false,
            };

            outcomes.push(TypeTrainingOutcome {
                resource_type,
                rows: rows.len(),
                trained,
            });
        }

        self.models.store(Arc::new(table));

        Ok(TrainingSummary {
            total_rows: records.len(),
            outcomes,
        })
    }

    /// Forecast demand for one type.
    ///
    /// Types without a fitted model (including `Rescue` and `General`) get
    /// the fixed default with fallback confidence.
    pub fn predict(&self, resource_type: ResourceType, features: &ForecastFeatures) -> Forecast {
        predict_from(&self.models.load(), resource_type, features)
    }

    /// One forecast per forecastable type, in fixed order, all from the same
    /// published table.
    pub fn forecast_all(&self, features: &ForecastFeatures) -> Vec<Forecast> {
        let table = self.models.load();
        ResourceType::FORECASTABLE
            .iter()
            .map(|t| predict_from(&table, *t, features))
            .collect()
    }

    pub fn is_trained(&self, resource_type: ResourceType) -> bool {
        self.models.load().contains_key(&resource_type)
    }

    /// Training status per forecastable type.
    pub fn status(&self) -> Vec<ModelStatus> {
        let table = self.models.load();
        ResourceType::FORECASTABLE
            .iter()
            .map(|t| {
                let model = table.get(t);
                ModelStatus {
                    resource_type: *t,
                    trained: model.is_some(),
                    training_rows: model.map(|m| m.training_rows),
                }
            })
            .collect()
    }
}

impl std::fmt::Debug for DemandForecaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let trained: Vec<ResourceType> = self.models.load().keys().copied().collect();
        f.debug_struct("DemandForecaster")
            .field("config", &self.config)
            .field("trained", &trained)
            .finish()
    }
}

fn predict_from(table: &ModelTable, resource_type: ResourceType, features: &ForecastFeatures) -> Forecast {
    match table.get(&resource_type) {
        Some(model) => {
            let scaled = model.scaler.transform(&features.to_vector());
            let raw = model.forest.predict(&scaled);
            // Truncate toward zero; a float-to-int cast saturates and maps NaN to 0
            let predicted_demand = raw.max(0.0) as u64;
            Forecast {
                resource_type,
                predicted_demand,
                confidence: TRAINED_CONFIDENCE,
                timeframe: FORECAST_TIMEFRAME.to_string(),
            }
        }
        None => {
            debug!(resource_type = %resource_type, "No model, using default demand");
            Forecast {
                resource_type,
                predicted_demand: default_demand(resource_type),
                confidence: FALLBACK_CONFIDENCE,
                timeframe: FORECAST_TIMEFRAME.to_string(),
            }
        }
    }
}

fn fit_type_model(rows: &[&HistoricalRecord], params: &ForestParams) -> Option<TypeModel> {
    let features: Vec<[f64; NUM_FORECAST_FEATURES]> = rows.iter().map(|r| r.features()).collect();
    let targets: Vec<f64> = rows.iter().map(|r| r.quantity).collect();

    let (scaler, scaled) = StandardScaler::fit_transform(&features)?;
    let forest = RandomForestRegressor::fit(&scaled, &targets, params)?;

    Some(TypeModel {
        scaler,
        forest,
        training_rows: rows.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(affected_area: i64, severity: i64) -> ForecastFeatures {
        ForecastFeatures {
            day_of_week: 2,
            month: 7,
            affected_area,
            severity,
        }
    }

    /// Demand grows with severity so a fitted model is distinguishable
    /// from the fallback.
    fn history(resource_type: ResourceType, rows: usize) -> Vec<HistoricalRecord> {
        (0..rows)
            .map(|i| {
                let severity = (i % 5 + 1) as f64;
                HistoricalRecord {
                    resource_type,
                    day_of_week: (i % 7) as f64,
                    month: (i % 12 + 1) as f64,
                    affected_area: 5.0,
                    severity,
                    quantity: 1000.0 * severity,
                }
            })
            .collect()
    }

    fn small_config() -> ForecasterConfig {
        ForecasterConfig {
            n_estimators: 20,
            ..ForecasterConfig::default()
        }
    }

    #[test]
    fn test_untrained_uses_defaults() {
        let forecaster = DemandForecaster::new(ForecasterConfig::default());
        let f = forecaster.predict(ResourceType::Medical, &features(5, 3));
        assert_eq!(f.predicted_demand, 350);
        assert_eq!(f.confidence, 0.70);
        assert_eq!(f.timeframe, "24h");

        assert_eq!(forecaster.predict(ResourceType::Rescue, &features(5, 3)).predicted_demand, 500);
        assert_eq!(forecaster.predict(ResourceType::General, &features(5, 3)).predicted_demand, 500);
    }

    #[test]
    fn test_forecast_all_order() {
        let forecaster = DemandForecaster::new(ForecasterConfig::default());
        let all = forecaster.forecast_all(&features(5, 3));
        let types: Vec<ResourceType> = all.iter().map(|f| f.resource_type).collect();
        assert_eq!(types, ResourceType::FORECASTABLE.to_vec());
        let demands: Vec<u64> = all.iter().map(|f| f.predicted_demand).collect();
        assert_eq!(demands, vec![800, 350, 150, 1200, 250]);
    }

    #[test]
    fn test_training_fits_types_with_enough_rows() {
        let forecaster = DemandForecaster::new(small_config());
        let mut records = history(ResourceType::Food, 30);
        records.extend(history(ResourceType::Water, 9));

        let summary = forecaster.train(&records).unwrap();
        assert_eq!(summary.total_rows, 39);
        assert_eq!(summary.trained_count(), 1);
        assert!(forecaster.is_trained(ResourceType::Food));
        assert!(!forecaster.is_trained(ResourceType::Water));

        let water = summary
            .outcomes
            .iter()
            .find(|o| o.resource_type == ResourceType::Water)
            .unwrap();
        assert_eq!(water.rows, 9);
        assert!(!water.trained);

        let food = forecaster.predict(ResourceType::Food, &features(5, 5));
        assert_eq!(food.confidence, 0.85);
        assert!(food.predicted_demand >= 4000, "got {}", food.predicted_demand);
        assert!(food.predicted_demand <= 5000);

        // Water stays on the fallback
        assert_eq!(forecaster.predict(ResourceType::Water, &features(5, 5)).predicted_demand, 1200);
    }

    #[test]
    fn test_exactly_min_rows_trains() {
        let forecaster = DemandForecaster::new(small_config());
        forecaster.train(&history(ResourceType::Shelter, 10)).unwrap();
        assert!(forecaster.is_trained(ResourceType::Shelter));
    }

    #[test]
    fn test_short_retrain_keeps_previous_model() {
        let forecaster = DemandForecaster::new(small_config());
        forecaster.train(&history(ResourceType::Clothing, 20)).unwrap();
        let before = forecaster.predict(ResourceType::Clothing, &features(5, 2));

        let summary = forecaster.train(&history(ResourceType::Clothing, 3)).unwrap();
        assert_eq!(summary.trained_count(), 0);
        assert!(forecaster.is_trained(ResourceType::Clothing));
        assert_eq!(forecaster.predict(ResourceType::Clothing, &features(5, 2)), before);
    }

    #[test]
    fn test_training_is_reproducible() {
        let records = history(ResourceType::Medical, 25);
        let a = DemandForecaster::new(small_config());
        let b = DemandForecaster::new(small_config());
        a.train(&records).unwrap();
        b.train(&records).unwrap();

        for sev in 1..=5 {
            assert_eq!(
                a.predict(ResourceType::Medical, &features(7, sev)),
                b.predict(ResourceType::Medical, &features(7, sev))
            );
        }
    }

    #[test]
    fn test_malformed_rows_reject_dataset() {
        let forecaster = DemandForecaster::new(small_config());
        let mut records = history(ResourceType::Food, 12);
        records[4].quantity = -1.0;

        let err = forecaster.train(&records).unwrap_err();
        assert!(matches!(err, EngineError::InvalidDataset(ref msg) if msg.contains("record 4")));
        assert!(!forecaster.is_trained(ResourceType::Food));
    }

    #[test]
    fn test_status_reports_rows() {
        let forecaster = DemandForecaster::new(small_config());
        forecaster.train(&history(ResourceType::Water, 15)).unwrap();

        let status = forecaster.status();
        assert_eq!(status.len(), 5);
        let water = status.iter().find(|s| s.resource_type == ResourceType::Water).unwrap();
        assert!(water.trained);
        assert_eq!(water.training_rows, Some(15));
        let food = status.iter().find(|s| s.resource_type == ResourceType::Food).unwrap();
        assert!(!food.trained);
        assert_eq!(food.training_rows, None);
    }

    #[test]
    fn test_non_forecastable_rows_are_ignored() {
        let forecaster = DemandForecaster::new(small_config());
        let summary = forecaster.train(&history(ResourceType::Rescue, 40)).unwrap();
        assert_eq!(summary.total_rows, 40);
        assert_eq!(summary.trained_count(), 0);
        assert!(summary.outcomes.iter().all(|o| o.rows == 0));
        assert_eq!(forecaster.predict(ResourceType::Rescue, &features(5, 3)).predicted_demand, 500);
    }
}
