pub mod index;
mod stitcher;

pub use index::{BlockRange, block_intervals, calendar_days, calendar_months};
pub use stitcher::{BandOutline, BandPoint, StitchedBand, stitch};
