//! Filter implementations for the relation pipeline.
//!
//! This module contains all the concrete filter implementations
//! that can be composed into a FilterPipeline.

pub mod membership;
pub mod minimum_count;
pub mod predicate;

// Re-export for convenience
pub use membership::{MembershipFilter, filter_in};
pub use minimum_count::MinimumCountFilter;
pub use predicate::ColumnPredicateFilter;
