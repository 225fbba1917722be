//! Comparison Source Adapters.

mod static_roster;

pub use static_roster::StaticComparisonSource;
