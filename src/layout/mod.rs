//! Measurement-driven passes: overflow, cut points, ordering, numbering

mod cut;
mod measure;
pub mod numbering;
mod order;
mod overflow;

pub use cut::CutPointSelector;
pub use measure::{BlockMeasure, HeightEstimator};
pub use numbering::{renumber, renumber_template, strip_numbers, NumberingContext};
pub use order::{is_dense, recalculate};
pub use overflow::OverflowDetector;
