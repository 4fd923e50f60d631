use crate::workflows::cover_letter::domain::Applicant;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use tracing::info;

/// Milliseconds the headless browser may spend laying out the page before
/// printing.
pub const DEFAULT_VIRTUAL_TIME_BUDGET: u32 = 50;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to launch {executable}: {source}")]
    Spawn {
        executable: String,
        #[source]
        source: std::io::Error,
    },
    #[error("PDF rendering exited with {status}")]
    Failed { status: ExitStatus },
}

/// Prints an HTML document to PDF with a headless Chrome/Chromium binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessChromeRenderer {
    pub executable: PathBuf,
    pub virtual_time_budget: u32,
}

impl HeadlessChromeRenderer {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            virtual_time_budget: DEFAULT_VIRTUAL_TIME_BUDGET,
        }
    }

    pub fn command(&self, html: &Path, pdf: &Path) -> Command {
        let mut command = Command::new(&self.executable);
        command
            .arg("--headless")
            .arg(format!("--virtual-time-budget={}", self.virtual_time_budget))
            .arg("--disable-gpu")
            .arg("--run-all-compositor-stages-before-draw")
            .arg(format!("--print-to-pdf={}", pdf.display()))
            .arg(html);
        command
    }

    /// Blocks until the browser exits.
    pub fn render(&self, html: &Path, pdf: &Path) -> Result<(), RenderError> {
        let status = self
            .command(html, pdf)
            .status()
            .map_err(|source| RenderError::Spawn {
                executable: self.executable.display().to_string(),
                source,
            })?;

        if !status.success() {
            return Err(RenderError::Failed { status });
        }

        info!(html = %html.display(), pdf = %pdf.display(), "rendered cover letter PDF");
        Ok(())
    }
}

/// `First_M_Last_Cover_Letter.pdf`; the middle part is dropped when the
/// applicant has no middle initial. Whitespace inside names becomes `_`.
pub fn cover_letter_file_name(applicant: &Applicant) -> String {
    let mut parts = vec![applicant.first_name()];
    if let Some(initial) = applicant.middle_initial() {
        parts.push(initial);
    }
    parts.push(applicant.last_name());

    let stem = parts
        .iter()
        .flat_map(|part| part.split_whitespace())
        .collect::<Vec<_>>()
        .join("_");
    format!("{stem}_Cover_Letter.pdf")
}
