pub mod column_mapping;
pub mod data_loader;
pub mod error;
