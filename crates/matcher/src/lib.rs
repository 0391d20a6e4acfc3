//! Precise scoring of one extracted line against its reference candidates.
//!
//! The reference index hands over a cheap, bounded candidate set; this crate
//! turns it into a ranked [`MatchCandidate`] with real scores. Part numbers
//! are the authoritative key: an exact normalized part-number match outranks
//! any name-similarity score. Everything else is Jaro-Winkler similarity
//! over normalized material names.
//!
//! Determinism is a contract, not a nice-to-have: identical inputs and
//! reference data must produce bit-identical scores and ordering. There is
//! no randomness here and no iteration over unordered containers; ties
//! resolve by source priority (item master first) then ascending record id.

pub mod engine;
pub mod types;

pub use engine::match_line;
pub use types::{MatchCandidate, MatchConfig, ScoredReference};
