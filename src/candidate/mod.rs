//! Best-match selection over displayed template-matching scores.

pub(crate) mod topk;

pub use topk::{select_matches, MatchFilter, MatchPeak};
