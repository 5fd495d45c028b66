pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod headers;
pub mod prober;
pub mod runner;
pub mod sink;
pub mod stop;
