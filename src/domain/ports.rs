use crate::domain::schema::TransactionKind;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Remote fee calculation, one JSON object in and one out.
#[async_trait]
pub trait CalculationService: Send + Sync {
    async fn calculate(
        &self,
        kind: TransactionKind,
        body: serde_json::Value,
    ) -> Result<serde_json::Value>;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn path_prefix(&self) -> &str;
    fn print_output_dir(&self) -> Option<&Path>;
    fn auto_print(&self) -> bool;
}

/// A viewing surface that receives one printable document.
///
/// Implementations are driven through `core::print::PrintJob`, which
/// guarantees `release` runs exactly once.
pub trait PrintSurface {
    fn write_document(&mut self, html: &str) -> Result<()>;

    /// Hands the written document to the print pipeline.
    fn dispatch(&mut self) -> Result<PathBuf>;

    /// `dispatched` is false when the job failed before reaching the printer.
    fn release(&mut self, dispatched: bool);
}
