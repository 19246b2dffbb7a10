use crate::core::form::{Completion, FormSession};
use crate::core::normalizer::{self, FieldEdit};
use crate::core::presenter;
use crate::core::print::{self, FilePrintSurface, PrintOptions, PrintOutcome};
use crate::domain::ports::CalculationService;
use crate::domain::schema::Transaction;
use crate::utils::error::Result;
use chrono::Local;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PrintTarget {
    #[default]
    None,
    /// Open in the default browser; the file goes to this directory or the temp dir.
    Browser(Option<PathBuf>),
    File(PathBuf),
}

#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    pub output: OutputMode,
    pub print: PrintTarget,
    pub auto_print: bool,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub completion: Completion,
    /// Rendered result (text report or JSON), present on success.
    pub rendered: Option<String>,
    /// User-facing error message, present on failure.
    pub error: Option<String>,
    pub rejected_edits: usize,
    pub print: Option<PrintOutcome>,
    /// A print failure never discards the computed result.
    pub print_error: Option<String>,
}

/// Drives one form from raw edits to rendered (and optionally printed) result.
pub struct CalculationEngine<S: CalculationService> {
    service: S,
}

impl<S: CalculationService> CalculationEngine<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub async fn run<T: Transaction>(
        &self,
        edits: &[FieldEdit],
        request: &RunRequest,
    ) -> Result<RunReport> {
        let mut form = FormSession::<T>::new();

        let rejected_edits = edits.iter().filter(|edit| form.edit(edit).is_err()).count();

        tracing::info!("📝 {} form:", T::KIND.title());
        for (label, shown) in normalizer::display_form::<T>(form.input()) {
            tracing::info!("   {}: {}", label, shown);
        }

        let completion = form.submit(&self.service).await;

        let Some(result) = form.result() else {
            return Ok(RunReport {
                completion,
                rendered: None,
                error: form.error().map(str::to_string),
                rejected_edits,
                print: None,
                print_error: None,
            });
        };

        let rendered = match request.output {
            OutputMode::Text => presenter::render_result::<T>(result),
            OutputMode::Json => serde_json::to_string_pretty(result)?,
        };

        let options = PrintOptions {
            // 只有開瀏覽器列印時才自動叫出列印對話框
            auto_print: request.auto_print && matches!(request.print, PrintTarget::Browser(_)),
            generated_at: Local::now(),
        };
        let (print, print_error) = match print_to::<T>(result, &request.print, &options) {
            Ok(outcome) => (outcome, None),
            Err(e) => {
                tracing::error!(
                    "❌ {} print failed: {} (Severity: {:?})",
                    T::KIND.title(),
                    e,
                    e.severity()
                );
                (None, Some(e.user_friendly_message()))
            }
        };

        tracing::info!("✅ {} calculation completed", T::KIND.title());
        Ok(RunReport {
            completion,
            rendered: Some(rendered),
            error: None,
            rejected_edits,
            print,
            print_error,
        })
    }
}

fn print_to<T: Transaction>(
    result: &T::Output,
    target: &PrintTarget,
    options: &PrintOptions,
) -> Result<Option<PrintOutcome>> {
    let outcome = match target {
        PrintTarget::None => return Ok(None),
        PrintTarget::Browser(dir) => print::print_result::<T, _, _>(
            Some(result),
            || FilePrintSurface::browser(dir.as_deref(), T::KIND.segment()),
            options,
        )?,
        PrintTarget::File(path) => print::print_result::<T, _, _>(
            Some(result),
            || FilePrintSurface::at_path(path),
            options,
        )?,
    };
    Ok(Some(outcome))
}
