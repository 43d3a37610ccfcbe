pub mod metric;
pub mod segment;
