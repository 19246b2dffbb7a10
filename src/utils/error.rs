use thiserror::Error;

/// 計算失敗時顯示給使用者的唯一訊息
pub const GENERIC_CALCULATION_ERROR: &str = "Ocurrió un error al calcular. Intenta de nuevo.";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Calculation service at {endpoint} answered with status {status}")]
    ServiceStatus { status: u16, endpoint: String },

    #[error("Malformed response from calculation service: {message}")]
    MalformedResponse { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Print failed: {message}")]
    Print { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Calculation,
    Configuration,
    Io,
    Print,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AppError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::Http(_)
            | AppError::ServiceStatus { .. }
            | AppError::MalformedResponse { .. } => ErrorCategory::Calculation,
            // 請求本體序列化失敗同樣屬於這次計算
            AppError::Serialization(_) => ErrorCategory::Calculation,
            AppError::ConfigValidation { .. }
            | AppError::InvalidConfigValue { .. } => ErrorCategory::Configuration,
            AppError::Io(_) => ErrorCategory::Io,
            AppError::Print { .. } => ErrorCategory::Print,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Calculation => ErrorSeverity::Medium,
            ErrorCategory::Print => ErrorSeverity::Low,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn is_calculation_failure(&self) -> bool {
        self.category() == ErrorCategory::Calculation
    }

    /// 計算相關的錯誤一律收斂成同一則訊息，細節只寫進日誌
    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Calculation => GENERIC_CALCULATION_ERROR.to_string(),
            ErrorCategory::Configuration => format!("Configuración inválida: {}", self),
            ErrorCategory::Io => format!("Error de entrada/salida: {}", self),
            ErrorCategory::Print => "No fue posible generar la impresión.".to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AppError::Http(_) => "Check the network connection and the service base URL",
            AppError::ServiceStatus { .. } => "Submit the calculation again in a moment",
            AppError::MalformedResponse { .. } | AppError::Serialization(_) => {
                "Verify that --base-url points to the SADA calculation service"
            }
            AppError::InvalidConfigValue { .. } => {
                "Fix the offending value in the config file or command line"
            }
            AppError::ConfigValidation { .. } => "Check the TOML syntax of the config file",
            AppError::Io(_) => "Check file permissions and available disk space",
            AppError::Print { .. } => "Use --print-output to write the document to a file instead",
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
