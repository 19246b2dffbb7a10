#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::client::{DEFAULT_BASE_URL, DEFAULT_PATH_PREFIX};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::path::{Path, PathBuf};
use toml_config::TomlConfig;

/// Effective settings after merging defaults, the TOML file and CLI overrides.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub path_prefix: String,
    pub print_output_dir: Option<PathBuf>,
    pub auto_print: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            path_prefix: DEFAULT_PATH_PREFIX.to_string(),
            print_output_dir: None,
            auto_print: true,
        }
    }
}

impl AppConfig {
    /// 命令列參數優先於設定檔
    pub fn resolve(file: Option<&TomlConfig>, base_url_override: Option<&str>) -> Self {
        let mut config = Self::default();

        if let Some(file) = file {
            if let Some(url) = file.base_url() {
                config.base_url = url.to_string();
            }
            if let Some(prefix) = file.path_prefix() {
                config.path_prefix = prefix.to_string();
            }
            config.print_output_dir = file.output_dir().map(PathBuf::from);
            if let Some(auto_print) = file.auto_print() {
                config.auto_print = auto_print;
            }
        }

        if let Some(url) = base_url_override {
            config.base_url = url.to_string();
        }

        config
    }
}

impl ConfigProvider for AppConfig {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn path_prefix(&self) -> &str {
        &self.path_prefix
    }

    fn print_output_dir(&self) -> Option<&Path> {
        self.print_output_dir.as_deref()
    }

    fn auto_print(&self) -> bool {
        self.auto_print
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("base_url", &self.base_url)?;
        validation::validate_path_prefix("path_prefix", &self.path_prefix)?;
        if let Some(dir) = &self.print_output_dir {
            validation::validate_path("print.output_dir", &dir.to_string_lossy())?;
        }
        Ok(())
    }
}
