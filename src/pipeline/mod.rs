pub mod gridded;
pub mod station;
