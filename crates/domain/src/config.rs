pub mod errors;
pub mod intercept;
pub mod logging;
pub mod root;
pub mod server;

pub use errors::ConfigError;
pub use intercept::{FallthroughCode, InterceptConfig};
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
