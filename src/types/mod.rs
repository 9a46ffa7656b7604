pub mod daily;
pub mod location;
pub mod metric;
pub mod monthly;
pub mod period;
pub mod provenance;
