mod convert;
pub mod docx;
mod error;
pub mod form;
pub mod model;
pub mod template;

pub use convert::{SOFFICE_ENV, to_pdf};
pub use error::Error;
pub use template::{Fill, FillReport, Mapping, RepeatingBlock};

use std::path::Path;
use std::time::Instant;

pub fn fill_docx(input: &Path, output: &Path, fill: &Fill) -> Result<FillReport, Error> {
    let t0 = Instant::now();

    let mut package = docx::parse(input)?;
    let t_parse = t0.elapsed();

    let report = fill.apply(&mut package.document);
    let t_fill = t0.elapsed();

    package.save(output)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: parse={:.1}ms, fill={:.1}ms, write={:.1}ms, total={:.1}ms ({} replacements)",
        t_parse.as_secs_f64() * 1000.0,
        (t_fill - t_parse).as_secs_f64() * 1000.0,
        (t_total - t_fill).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        report.replacements,
    );

    Ok(report)
}

pub fn fill_docx_bytes(input: &[u8], fill: &Fill) -> Result<(Vec<u8>, FillReport), Error> {
    let t0 = Instant::now();

    let mut package = docx::parse_bytes(input)?;
    let report = fill.apply(&mut package.document);
    let bytes = package.to_bytes()?;

    log::info!(
        "Timing: total={:.1}ms (output {} bytes, {} replacements)",
        t0.elapsed().as_secs_f64() * 1000.0,
        bytes.len(),
        report.replacements,
    );

    Ok((bytes, report))
}
