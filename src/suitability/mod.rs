//! Crop Suitability Engine
//!
//! Compares a field's environmental input against each crop template and
//! ranks the crops by a weighted 0-100 score.
//!
//! ## Architecture
//! - `comparator.rs` - value vs optimal-range comparison and point curve
//! - `assessment.rs` - SuitabilityResult and per-factor decision notes
//! - `scorer.rs` - factor weights, `score_crop`, `rank_crops`

pub mod assessment;
pub mod comparator;
pub mod scorer;

pub use assessment::{Factor, FactorBand, FactorNote, SuitabilityRating, SuitabilityResult};
pub use comparator::{compare_to_range, RangeComparison, RangeFit};
pub use scorer::{rank_crops, rank_crops_top, score_all, score_crop};
