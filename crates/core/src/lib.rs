//! # Recsys Core
//!
//! Shared building blocks for the recommender lab tools.
//!
//! ## Modules
//!
//! - `error`: Error taxonomy for matrix validation, scoring and loading
//! - `config`: Configuration loading and validation
//! - `observability`: Structured logging initialization
//! - `math`: Vector helpers (dot product, norms, cosine similarity)

pub mod config;
pub mod error;
pub mod math;
pub mod observability;

// Re-export commonly used types
pub use config::{load_dotenv, ConfigLoader, EngineConfig};
pub use error::{Axis, RecsysError};
pub use math::{cosine_similarity, dot_product, l2_norm};
pub use observability::{init_logging, LogConfig, LogFormat, ObservabilityError};

/// Result type alias for recommender operations
pub type Result<T> = std::result::Result<T, RecsysError>;
