// * Operations: logging setup shared by the binary and any embedding process

pub mod telemetry;

pub use telemetry::{init_tracing, init_tracing_pretty, init_tracing_with_level, DEFAULT_FILTER};
