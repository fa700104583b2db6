pub mod errors;
pub mod logging;
pub mod tracing;

pub use errors::{PlatformError, PlatformResult};
pub use logging::{init_logging, LogOptions};
pub use tracing::correlation_span;
