pub mod cli;
pub mod client;
pub mod config;
pub mod core;
pub mod error;
pub mod storage;
pub mod utils;
