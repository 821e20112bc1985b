//! Resource allocation
//!
//! Greedy, per-request assignment of inventory to outstanding aid requests.
//! Requests are served in input order with no backtracking; a request that
//! no resource can cover is skipped.

mod allocator;

pub use allocator::{AllocationBatch, ResourceOptimizer};
