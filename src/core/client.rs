use crate::domain::ports::{CalculationService, ConfigProvider};
use crate::domain::schema::{Transaction, TransactionKind};
use crate::utils::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::Client;

pub const DEFAULT_BASE_URL: &str = "https://sada-api.onrender.com";
pub const DEFAULT_PATH_PREFIX: &str = "/api";

/// HTTP implementation of the calculation service.
///
/// One POST per call: no retries, no timeout override, no auth headers.
#[derive(Debug, Clone)]
pub struct HttpCalculationService {
    base_url: String,
    path_prefix: String,
    client: Client,
}

impl HttpCalculationService {
    pub fn new(base_url: &str, path_prefix: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            path_prefix: path_prefix.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self::new(config.base_url(), config.path_prefix())
    }

    /// `{base_url}{path_prefix}/{segment}/calcular`
    pub fn endpoint(&self, kind: TransactionKind) -> String {
        format!(
            "{}{}/{}/calcular",
            self.base_url,
            self.path_prefix,
            kind.segment()
        )
    }
}

#[async_trait]
impl CalculationService for HttpCalculationService {
    async fn calculate(
        &self,
        kind: TransactionKind,
        body: serde_json::Value,
    ) -> Result<serde_json::Value> {
        let endpoint = self.endpoint(kind);

        tracing::debug!("📡 POST {} body={}", endpoint, body);
        let response = self.client.post(&endpoint).json(&body).send().await?;
        tracing::debug!("📡 Calculation service status: {}", response.status());

        if !response.status().is_success() {
            return Err(AppError::ServiceStatus {
                status: response.status().as_u16(),
                endpoint,
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| AppError::MalformedResponse {
            message: format!("response body is not JSON: {}", e),
        })
    }
}

/// Sends a typed input model and decodes the typed result.
pub async fn calculate<T, S>(service: &S, input: &T::Input) -> Result<T::Output>
where
    T: Transaction,
    S: CalculationService + ?Sized,
{
    let body = serde_json::to_value(input)?;
    let raw = service.calculate(T::KIND, body).await?;

    if !raw.is_object() {
        return Err(AppError::MalformedResponse {
            message: format!("expected a JSON object, got {}", raw),
        });
    }

    serde_json::from_value(raw).map_err(|e| AppError::MalformedResponse {
        message: format!("{} result does not match contract: {}", T::KIND.title(), e),
    })
}
