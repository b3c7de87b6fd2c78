pub mod aggregation;
pub mod constants;
pub mod errors;
pub mod export;
pub mod format;
pub mod live;
pub mod models;
pub mod reconcile;
pub mod seed;
pub mod services;
