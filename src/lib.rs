pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use config::AppConfig;
pub use core::client::HttpCalculationService;
pub use core::engine::CalculationEngine;
pub use core::form::FormSession;
pub use domain::model::{Incorporation, Renewal, Transfer};
pub use utils::error::{AppError, Result};
