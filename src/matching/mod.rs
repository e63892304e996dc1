//! Candidate discovery.
//!
//! Submission pools are indexed by classification once; requirement nodes are
//! then looked up against the index.

pub mod index;
pub mod candidates;

pub use index::CategoryIndex;
pub use candidates::{CandidateMatch, CandidateMatcher, MatchStrategy};
