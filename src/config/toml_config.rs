use crate::utils::error::{AppError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional settings file:
///
/// ```toml
/// [service]
/// base_url = "https://sada-api.onrender.com"
/// path_prefix = "/api"
///
/// [print]
/// output_dir = "${HOME}/sada"
/// auto_print = true
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub service: Option<ServiceConfig>,
    pub print: Option<PrintConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    pub base_url: Option<String>,
    pub path_prefix: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrintConfig {
    pub output_dir: Option<String>,
    pub auto_print: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AppError::Io)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AppError::ConfigValidation {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${HOME})，未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| AppError::ConfigValidation {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn base_url(&self) -> Option<&str> {
        self.service.as_ref()?.base_url.as_deref()
    }

    pub fn path_prefix(&self) -> Option<&str> {
        self.service.as_ref()?.path_prefix.as_deref()
    }

    pub fn output_dir(&self) -> Option<&str> {
        self.print.as_ref()?.output_dir.as_deref()
    }

    pub fn auto_print(&self) -> Option<bool> {
        self.print.as_ref()?.auto_print
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(url) = self.base_url() {
            crate::utils::validation::validate_url("service.base_url", url)?;
        }

        if let Some(prefix) = self.path_prefix() {
            crate::utils::validation::validate_path_prefix("service.path_prefix", prefix)?;
        }

        if let Some(dir) = self.output_dir() {
            crate::utils::validation::validate_path("print.output_dir", dir)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[service]
base_url = "http://localhost:8080"
path_prefix = "/api"

[print]
output_dir = "./impresiones"
auto_print = false
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.base_url(), Some("http://localhost:8080"));
        assert_eq!(config.path_prefix(), Some("/api"));
        assert_eq!(config.output_dir(), Some("./impresiones"));
        assert_eq!(config.auto_print(), Some(false));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.base_url().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SADA_TEST_BASE_URL", "https://calc.example.com");

        let config = TomlConfig::from_toml_str(
            r#"
[service]
base_url = "${SADA_TEST_BASE_URL}"
"#,
        )
        .unwrap();
        assert_eq!(config.base_url(), Some("https://calc.example.com"));

        std::env::remove_var("SADA_TEST_BASE_URL");
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let bad_url = TomlConfig::from_toml_str("[service]\nbase_url = \"invalid-url\"\n").unwrap();
        assert!(bad_url.validate().is_err());

        let bad_prefix = TomlConfig::from_toml_str("[service]\npath_prefix = \"api\"\n").unwrap();
        assert!(bad_prefix.validate().is_err());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let parsed = TomlConfig::from_toml_str("[service]\ntimeout_seconds = 5\n");
        assert!(matches!(parsed, Err(AppError::ConfigValidation { .. })));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[service]\nbase_url = \"https://sada-api.onrender.com\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.base_url(), Some("https://sada-api.onrender.com"));
    }
}
