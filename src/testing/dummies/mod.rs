mod series;

pub use series::*;
