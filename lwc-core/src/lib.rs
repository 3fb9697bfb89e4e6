pub mod cache;
pub mod collage;
pub mod date_range;
pub mod error;
pub mod event;
pub mod period;
pub mod series;
pub mod store;
