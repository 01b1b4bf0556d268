use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Overrides the converter binary, e.g. a full path to `soffice`.
pub const SOFFICE_ENV: &str = "DOCX_STENCIL_SOFFICE";

/// Export `docx` to PDF in `outdir` with a headless office suite.
///
/// Returns the PDF path, or `None` when the converter is unavailable or fails.
pub fn to_pdf(docx: &Path, outdir: &Path) -> Option<PathBuf> {
    let program = std::env::var_os(SOFFICE_ENV).unwrap_or_else(|| OsString::from("soffice"));
    if let Err(e) = std::fs::create_dir_all(outdir) {
        log::warn!("PDF export skipped: cannot create {}: {e}", outdir.display());
        return None;
    }

    let output = Command::new(&program)
        .args(["--headless", "--convert-to", "pdf", "--outdir"])
        .arg(outdir)
        .arg(docx)
        .output();
    match output {
        Err(e) => {
            log::warn!("PDF export skipped: cannot run {}: {e}", program.to_string_lossy());
            None
        }
        Ok(out) if !out.status.success() => {
            log::warn!(
                "PDF export failed ({}): {}",
                out.status,
                String::from_utf8_lossy(&out.stderr).trim()
            );
            None
        }
        Ok(_) => {
            let Some(stem) = docx.file_stem() else {
                log::warn!("PDF export skipped: {} has no file name", docx.display());
                return None;
            };
            let pdf = outdir.join(stem).with_extension("pdf");
            if pdf.exists() {
                log::info!("Exported {}", pdf.display());
                Some(pdf)
            } else {
                log::warn!("PDF export reported success but {} is missing", pdf.display());
                None
            }
        }
    }
}
