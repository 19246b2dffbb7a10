use clap::Parser;
use sada_client::config::cli::TransactionCommand;
use sada_client::config::toml_config::TomlConfig;
use sada_client::core::engine::RunReport;
use sada_client::core::form::Completion;
use sada_client::core::print::PrintOutcome;
use sada_client::utils::error::{AppError, ErrorSeverity};
use sada_client::utils::logger::{self, LogFormat};
use sada_client::utils::validation::Validate;
use sada_client::{AppConfig, CalculationEngine, CliConfig, HttpCalculationService};
use sada_client::{Incorporation, Renewal, Transfer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_logger(LogFormat::from_flag(cli.log_json), cli.verbose);

    tracing::info!("Starting sada-client");
    tracing::debug!("CLI config: {:?}", cli);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };

    let service = HttpCalculationService::from_config(&config);
    let engine = CalculationEngine::new(service);
    let request = cli.command.output().to_request(&config);

    let outcome = match &cli.command {
        TransactionCommand::Constitucion(args) => {
            engine.run::<Incorporation>(&args.edits(), &request).await
        }
        TransactionCommand::Compraventa(args) => {
            engine.run::<Transfer>(&args.edits(), &request).await
        }
        TransactionCommand::Renovacion(args) => {
            engine.run::<Renewal>(&args.edits(), &request).await
        }
    };

    match outcome {
        Ok(report) => report_outcome(report),
        Err(e) => exit_with(&e),
    }

    Ok(())
}

fn load_config(cli: &CliConfig) -> Result<AppConfig, AppError> {
    let file = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            let file = TomlConfig::from_file(path)?;
            file.validate()?;
            Some(file)
        }
        None => None,
    };

    let config = AppConfig::resolve(file.as_ref(), cli.base_url.as_deref());
    config.validate()?;
    tracing::debug!("Effective config: {:?}", config);
    Ok(config)
}

fn report_outcome(report: RunReport) {
    if report.rejected_edits > 0 {
        tracing::warn!("⚠️ {} value(s) could not be read and were ignored", report.rejected_edits);
    }

    match report.completion {
        Completion::Applied => {
            if let Some(rendered) = report.rendered {
                println!("{}", rendered);
            }
            match report.print {
                Some(PrintOutcome::Dispatched(path)) => {
                    println!("🖨️ Documento para imprimir: {}", path.display());
                }
                Some(PrintOutcome::NothingToPrint) | None => {}
            }
            if let Some(message) = report.print_error {
                eprintln!("⚠️ {}", message);
            }
        }
        Completion::Failed | Completion::Stale => {
            let message = report
                .error
                .unwrap_or_else(|| sada_client::utils::error::GENERIC_CALCULATION_ERROR.to_string());
            eprintln!("❌ {}", message);
            std::process::exit(2);
        }
    }
}

fn exit_with(e: &AppError) -> ! {
    tracing::error!(
        "❌ sada-client failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}
