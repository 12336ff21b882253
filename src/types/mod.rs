pub mod daily_record;
pub mod error;
pub mod gridded_field;
pub mod period;
pub mod series;
pub mod yearly;
