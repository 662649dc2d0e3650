//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ClientConfig (validated, immutable)
//!     → handed to ApiClient / ReviewApi at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a new client
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::ClientConfig;
pub use schema::{ApiConfig, MockConfig, ObservabilityConfig, RetryConfig, SessionConfig, TimeoutConfig};
pub use validation::ValidationError;
