pub mod logger;

pub use logger::{TraceId, init_logger};
