//! Scouting analytics over FBref-style season tables: per-90 metrics, position groups,
//! similar-player search and within-position percentiles.

pub mod aggregate;
pub mod config;
pub mod dataset;
pub mod derive;
pub mod error;
pub mod export;
pub mod filter;
pub mod normalize;
pub mod percentile;
pub mod position;
pub mod raw_table;
pub mod similarity;
pub mod stats;
pub mod synthetic;

pub use dataset::{EnrichedTable, PlayerRecord, load};
pub use error::{ScoutError, ScoutResult};
pub use filter::{PlayerFilter, filter};
pub use percentile::{compare, percentile, percentiles};
pub use position::{SimplifiedPosition, classify};
pub use raw_table::RawTable;
pub use similarity::{SimilarPlayer, SimilarityOptions, similar, similar_with};
pub use stats::{Metric, RawStat};
