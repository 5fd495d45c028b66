//! Logging shortcuts shared by every crate in the workspace.
//!
//! The macros only pick a fixed `tracing` target. How each target is
//! rendered is decided by the formatter installed in the binary.

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        tracing::info!(target: "vscout::success", $($arg)*)
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        tracing::info!(target: "vscout::info", $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "vscout::warn", $($arg)*)
    };
}
