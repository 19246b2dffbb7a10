//! Printable HTML rendition of a result.
//!
//! The document carries its own styling and reuses the exact sections the
//! terminal presenter shows. Surfaces are driven through [`PrintJob`], which
//! releases them on every exit path.

use crate::core::presenter::format_value;
use crate::domain::ports::PrintSurface;
use crate::domain::schema::{LineRole, Section, Transaction};
use crate::utils::error::{AppError, Result};
use chrono::{DateTime, Local};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const PRINT_CSS: &str = r#"
    body { font-family: Arial, sans-serif; margin: 20px; color: #111; }
    h2 { text-align: center; margin-bottom: 20px; }
    table { width: 100%; border-collapse: collapse; margin-bottom: 20px; }
    th, td { border: 1px solid #333; padding: 8px; text-align: left; }
    th { background-color: #eee; }
    tr.subtotal th, tr.subtotal td { font-weight: bold; }
    tr.total th, tr.total td { font-weight: bold; font-size: 17px; }
    .section-title { margin-top: 20px; font-size: 18px; font-weight: bold; }
    footer { margin-top: 30px; font-size: 12px; color: #555; text-align: right; }
    @media print { footer { position: fixed; bottom: 0; right: 0; } }
"#;

const AUTO_PRINT_SCRIPT: &str =
    r#"<script>window.addEventListener("load", function () { window.print(); });</script>"#;

#[derive(Debug, Clone)]
pub struct PrintOptions {
    /// Ask the viewer to open its print dialog as soon as the document loads.
    pub auto_print: bool,
    pub generated_at: DateTime<Local>,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            auto_print: true,
            generated_at: Local::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintOutcome {
    /// No result yet; nothing was opened.
    NothingToPrint,
    Dispatched(PathBuf),
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn render_document(title: &str, sections: &[Section], options: &PrintOptions) -> String {
    let title = escape_html(title);
    let mut body = String::new();

    for section in sections {
        body.push_str(&format!(
            "    <div class=\"section-title\">{}</div>\n    <table>\n",
            escape_html(section.title)
        ));
        for line in &section.lines {
            let class = match line.role {
                LineRole::Item => "",
                LineRole::Subtotal => " class=\"subtotal\"",
                LineRole::Total => " class=\"total\"",
            };
            body.push_str(&format!(
                "      <tr{}><th>{}</th><td>{}</td></tr>\n",
                class,
                escape_html(line.label),
                escape_html(&format_value(&line.value))
            ));
        }
        body.push_str("    </table>\n");
    }

    let script = if options.auto_print {
        AUTO_PRINT_SCRIPT
    } else {
        ""
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="es">
  <head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <style>{css}</style>
  </head>
  <body>
    <h2>{title}</h2>
{body}    <footer>Generado el {generated}</footer>
    {script}
  </body>
</html>
"#,
        title = title,
        css = PRINT_CSS,
        body = body,
        generated = options.generated_at.format("%Y-%m-%d %H:%M"),
        script = script,
    )
}

/// Scoped use of a print surface: write, dispatch, and always release.
pub struct PrintJob<S: PrintSurface> {
    surface: S,
    dispatched: bool,
}

impl<S: PrintSurface> PrintJob<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            dispatched: false,
        }
    }

    pub fn run(mut self, html: &str) -> Result<PathBuf> {
        self.surface.write_document(html)?;
        let location = self.surface.dispatch()?;
        self.dispatched = true;
        Ok(location)
    }
}

impl<S: PrintSurface> Drop for PrintJob<S> {
    fn drop(&mut self) {
        self.surface.release(self.dispatched);
    }
}

/// Generates the print view for the current result, if there is one.
///
/// `acquire` is only called when there is something to print.
pub fn print_result<T, S, F>(
    result: Option<&T::Output>,
    acquire: F,
    options: &PrintOptions,
) -> Result<PrintOutcome>
where
    T: Transaction,
    S: PrintSurface,
    F: FnOnce() -> Result<S>,
{
    let Some(result) = result else {
        tracing::debug!("{}: nothing to print", T::KIND.title());
        return Ok(PrintOutcome::NothingToPrint);
    };

    let html = render_document(&T::KIND.result_title(), &T::sections(result), options);
    let job = PrintJob::new(acquire()?);
    let location = job.run(&html)?;

    tracing::info!("🖨️ Print view ready: {}", location.display());
    Ok(PrintOutcome::Dispatched(location))
}

/// Where a dispatched document ends up.
#[derive(Debug)]
enum Delivery {
    /// Renamed over this path, leaving any previous file untouched until then.
    File(PathBuf),
    /// Kept under its staged name and opened in the system viewer.
    Viewer,
}

/// Print surface backed by an HTML file staged next to its destination.
#[derive(Debug)]
pub struct FilePrintSurface {
    staged: Option<NamedTempFile>,
    delivery: Delivery,
}

fn print_failure(action: &str, path: &Path, e: std::io::Error) -> AppError {
    AppError::Print {
        message: format!("could not {} {}: {}", action, path.display(), e),
    }
}

impl FilePrintSurface {
    /// Writes to `path` and leaves the file there.
    pub fn at_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let staged = tempfile::Builder::new()
            .prefix(".sada-print-")
            .suffix(".html")
            .tempfile_in(&dir)
            .map_err(|e| print_failure("stage print file in", &dir, e))?;

        tracing::debug!("Acquired print surface for {}", path.display());
        Ok(Self {
            staged: Some(staged),
            delivery: Delivery::File(path),
        })
    }

    /// Writes into `dir` (or the system temp dir) and opens the result in the
    /// default browser, which prints it on load.
    pub fn browser(dir: Option<&Path>, file_stem: &str) -> Result<Self> {
        let dir = dir
            .map(Path::to_path_buf)
            .unwrap_or_else(std::env::temp_dir);
        std::fs::create_dir_all(&dir).map_err(|e| print_failure("create", &dir, e))?;

        // 同一秒內重複列印也不會互相覆蓋
        let prefix = format!("{}-{}-", file_stem, Local::now().format("%Y%m%d%H%M%S"));
        let staged = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".html")
            .tempfile_in(&dir)
            .map_err(|e| print_failure("create print file in", &dir, e))?;

        tracing::debug!("Acquired print surface at {}", staged.path().display());
        Ok(Self {
            staged: Some(staged),
            delivery: Delivery::Viewer,
        })
    }
}

impl PrintSurface for FilePrintSurface {
    fn write_document(&mut self, html: &str) -> Result<()> {
        let staged = self.staged.as_mut().ok_or_else(|| AppError::Print {
            message: "print surface already closed".to_string(),
        })?;
        let path = staged.path().to_path_buf();
        staged
            .write_all(html.as_bytes())
            .map_err(|e| print_failure("write", &path, e))
    }

    fn dispatch(&mut self) -> Result<PathBuf> {
        let mut staged = self.staged.take().ok_or_else(|| AppError::Print {
            message: "print surface already closed".to_string(),
        })?;
        let staged_path = staged.path().to_path_buf();
        staged
            .flush()
            .map_err(|e| print_failure("flush", &staged_path, e))?;

        match &self.delivery {
            Delivery::File(path) => {
                staged
                    .persist(path)
                    .map_err(|e| print_failure("write", path, e.error))?;
                Ok(path.clone())
            }
            Delivery::Viewer => {
                let (_, path) = staged
                    .keep()
                    .map_err(|e| print_failure("keep", &staged_path, e.error))?;
                opener::open(&path).map_err(|e| AppError::Print {
                    message: format!("could not open {}: {}", path.display(), e),
                })?;
                Ok(path)
            }
        }
    }

    fn release(&mut self, dispatched: bool) {
        // 未送出的暫存檔在 drop 時刪除，目的地檔案保持原狀
        if let Some(staged) = self.staged.take() {
            tracing::debug!(
                "Discarding print file {} (dispatched: {})",
                staged.path().display(),
                dispatched
            );
        }
    }
}
