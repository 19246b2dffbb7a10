use sada_client::config::toml_config::TomlConfig;
use sada_client::core::client::{self, HttpCalculationService};
use sada_client::domain::schema::{Transaction, TransactionKind};
use sada_client::utils::error::Result;
use sada_client::utils::logger::{self, LogFormat};
use sada_client::utils::validation::Validate;
use sada_client::{AppConfig, Incorporation, Renewal, Transfer};
use std::path::Path;

/// 以預設表單值呼叫一個端點並回報結果
async fn probe<T: Transaction>(service: &HttpCalculationService) -> bool {
    let endpoint = service.endpoint(T::KIND);
    let started = std::time::Instant::now();

    match client::calculate::<T, _>(service, &T::Input::default()).await {
        Ok(result) => {
            let present = T::sections(&result)
                .iter()
                .flat_map(|section| section.lines.iter())
                .filter(|line| line.value.is_present())
                .count();
            println!(
                "  ✅ {} {} ({} line items, {:?})",
                T::KIND.title(),
                endpoint,
                present,
                started.elapsed()
            );
            true
        }
        Err(e) => {
            println!("  ❌ {} {}: {}", T::KIND.title(), endpoint, e);
            false
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    logger::init_logger(LogFormat::Compact, false);

    // 設定檔可選，預設讀取目前目錄下的 sada.toml
    let config_path = std::env::var("SADA_CONFIG").unwrap_or_else(|_| "sada.toml".to_string());
    let file = if Path::new(&config_path).exists() {
        let file = TomlConfig::from_file(&config_path)?;
        file.validate()?;
        Some(file)
    } else {
        None
    };

    let base_url = std::env::var("SADA_BASE_URL").ok();
    let config = AppConfig::resolve(file.as_ref(), base_url.as_deref());
    config.validate()?;

    println!("🚀 Probing calculation endpoints at {}", config.base_url);
    let service = HttpCalculationService::from_config(&config);

    let mut results = Vec::with_capacity(TransactionKind::ALL.len());
    for kind in TransactionKind::ALL {
        let ok = match kind {
            TransactionKind::Incorporation => probe::<Incorporation>(&service).await,
            TransactionKind::Transfer => probe::<Transfer>(&service).await,
            TransactionKind::Renewal => probe::<Renewal>(&service).await,
        };
        results.push(ok);
    }

    let healthy = results.iter().filter(|ok| **ok).count();
    println!("📈 {}/{} endpoints answered with a valid result", healthy, results.len());

    if healthy < results.len() {
        std::process::exit(2);
    }
    Ok(())
}
