//! Template matching passes.
//!
//! [`scan`] evaluates every valid offset and renders the heat map; [`offset`]
//! recomputes a single offset with its full per-pixel trace. Both score
//! through [`crate::metric::Metric::score_at`], so raw scores agree exactly.

pub mod offset;
pub mod scan;

pub use offset::{match_at_offset, MatchTap, MatchTrace, TemplateBounds};
pub use scan::{match_template, ScoreMap};
