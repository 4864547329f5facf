//! Template preparation for matching.
//!
//! A template is an ordinary [`Raster`](crate::Raster), typically cut out of
//! the source with [`Selection`](crate::Selection). Before matching it is
//! reduced once to a luminosity plane with precomputed statistics.

mod plan;

pub use plan::TemplatePlan;
