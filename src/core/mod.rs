/// Core search functionality
///
/// Contains the corpus builder, the individual matcher strategies,
/// and the cascade that ties them together.

pub mod corpus;
pub mod engine;
pub mod fuzzy;
pub mod strategies;
pub mod subsequence;

pub use corpus::Corpus;
pub use engine::{SearchEngine, SearchOutcome, SearchQuery};
pub use fuzzy::{Rank, Ranker, SkimRanker};
pub use strategies::Strategy;
pub use subsequence::matches_in_order;
