pub mod climatology;
pub mod coordinates;
pub mod crossing;
pub mod error;
pub mod extremes;
pub mod monthly_stats;
pub mod smoothing;
pub mod spatial;
