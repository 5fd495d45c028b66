pub mod config;
pub mod input;
pub mod log;
pub mod models;
pub mod random;
