pub mod catalog;
pub mod compositions;
pub mod refresh;
pub mod suggestions;
pub mod units;
