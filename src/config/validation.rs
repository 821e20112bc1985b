//! Config validation: unknown-key detection with Levenshtein suggestions
//! and value range checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

use super::EngineConfig;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, ", did you mean '{s}'?")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for EngineConfig.
///
/// Any new field added to EngineConfig must be added here too.
pub fn known_config_keys() -> HashSet<&'static str> {
    [
        // [server]
        "server",
        "server.addr",
        "server.cors_origins",
        "server.body_limit_bytes",
        // [forecaster]
        "forecaster",
        "forecaster.min_training_rows",
        "forecaster.n_estimators",
        "forecaster.random_seed",
        "forecaster.max_depth",
        "forecaster.min_samples_split",
        "forecaster.history_path",
        // [matcher]
        "matcher",
        "matcher.max_clusters",
        "matcher.kmeans_max_iter",
        "matcher.kmeans_n_init",
        "matcher.kmeans_tolerance",
        "matcher.random_seed",
    ]
    .into_iter()
    .collect()
}

/// Collect every dotted key path in a TOML tree.
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0; b_chars.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_chars.len()]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
///
/// Ties resolve to the lexicographically smallest key so the suggestion is stable.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|&k| (levenshtein(unknown, k), k))
        .filter(|(dist, _)| *dist <= 3)
        .min()
        .map(|(_, k)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// This does NOT fail on unknown keys, it only warns.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let Ok(value) = raw_toml.parse::<toml::Value>() else {
        // parse errors are reported by serde later
        return Vec::new();
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Range Validation
// ============================================================================

/// Check value ranges on a parsed EngineConfig. Every returned string is fatal.
pub fn validate_ranges(config: &EngineConfig) -> Vec<String> {
    let mut errors = Vec::new();
    let f = &config.forecaster;
    let m = &config.matcher;

    if f.min_training_rows == 0 {
        errors.push("forecaster.min_training_rows must be >= 1".to_string());
    }
    if f.n_estimators == 0 {
        errors.push("forecaster.n_estimators must be >= 1".to_string());
    }
    if f.min_samples_split < 2 {
        errors.push(format!(
            "forecaster.min_samples_split = {} must be >= 2",
            f.min_samples_split
        ));
    }
    if f.max_depth == Some(0) {
        errors.push("forecaster.max_depth must be >= 1 when set".to_string());
    }

    if m.max_clusters == 0 {
        errors.push("matcher.max_clusters must be >= 1".to_string());
    }
    if m.kmeans_max_iter == 0 {
        errors.push("matcher.kmeans_max_iter must be >= 1".to_string());
    }
    if m.kmeans_n_init == 0 {
        errors.push("matcher.kmeans_n_init must be >= 1".to_string());
    }
    if !m.kmeans_tolerance.is_finite() || m.kmeans_tolerance < 0.0 {
        errors.push(format!(
            "matcher.kmeans_tolerance = {} must be a non-negative number",
            m.kmeans_tolerance
        ));
    }

    if config.server.body_limit_bytes == 0 {
        errors.push("server.body_limit_bytes must be > 0".to_string());
    }

    errors
}
