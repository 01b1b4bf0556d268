mod common;

use std::path::Path;

use docx_stencil::{SOFFICE_ENV, to_pdf};

// One test per process: the converter is chosen through the environment.
#[test]
fn pdf_export_failures_return_none() {
    common::init_logging();
    let dir = tempfile::tempdir().unwrap();

    unsafe { std::env::set_var(SOFFICE_ENV, dir.path().join("no-such-soffice")) };
    assert_eq!(to_pdf(Path::new("resume.docx"), dir.path()), None);

    // `true` exits successfully without writing anything.
    unsafe { std::env::set_var(SOFFICE_ENV, "true") };
    assert_eq!(to_pdf(Path::new("resume.docx"), dir.path()), None);
    assert_eq!(to_pdf(Path::new("/"), dir.path()), None);
}
