//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML), or built-in defaults
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → NewsroomConfig (validated, immutable)
//!     → each service reads the sections it needs
//! ```
//!
//! # Design Decisions
//! - One file configures all three services; a process only reads its own sections
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{
    CensorConfig, CommentsConfig, GatewayConfig, LogFormat, NewsroomConfig,
    ObservabilityConfig, SecurityConfig, ServiceKind, TimeoutConfig,
};
pub use validation::ValidationError;
