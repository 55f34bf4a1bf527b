//! # AlphaZero Network Library
//!
//! An AlphaZero-style policy/value network built on libtorch, plus the
//! board environment that feeds it.
//!
//! ## Features
//!
//! - **Network**: stem convolution, residual tower, policy and value heads
//! - **Model Manager**: parameter store ownership and inference entry points
//! - **Havannah Environment**: rules, win detection and input planes
//!
//! ## Usage
//!
//! ```no_run
//! use alphazero_net::neural::{AlphaZeroModel, NetworkConfig};
//! use tch::{Device, Kind, Tensor};
//!
//! let config = NetworkConfig::new("go", 18, 19, 19, 128, 19, 19, 5, 2, 362);
//! let model = AlphaZeroModel::new(config, Device::Cpu);
//! let output = model.evaluate(&Tensor::zeros([1, 18, 19, 19], (Kind::Float, Device::Cpu)));
//! assert_eq!(output.policy.size(), vec![1, 362]);
//! ```

// ============================================================================
// PUBLIC API MODULES
// ============================================================================

/// Board environments producing network inputs
pub mod game;

/// Neural network components
pub mod neural;

/// Logger setup shared by the binaries
pub mod logging;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

pub use game::{HavannahAction, HavannahConfig, HavannahEnv, Player};
pub use neural::{AlphaZeroModel, AlphaZeroNetwork, NetworkConfig, NetworkOutput};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Main error type for the AlphaZero network library
#[derive(Debug, thiserror::Error)]
pub enum AlphaZeroNetError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Game error: {0}")]
    Game(String),

    #[error("Tensor error: {0}")]
    Tensor(#[from] tch::TchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Logging error: {0}")]
    Logging(#[from] flexi_logger::FlexiLoggerError),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AlphaZeroNetError>;

// ============================================================================
// LIBRARY VERSION INFO
// ============================================================================

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Library description
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
