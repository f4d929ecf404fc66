pub mod app;
pub mod config;
pub mod import;
pub mod ledger;
pub mod market_data;
pub mod models;
pub mod storage;
