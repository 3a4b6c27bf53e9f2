pub mod error;
pub mod logging;

pub use error::{GateError, Result};
pub use logging::{setup_logging, LogFormat, LogOutput, LoggingConfig};
