use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use docx_stencil::{Error, Fill, Mapping, RepeatingBlock, docx, form};

#[derive(Parser)]
#[command(name = "docx-stencil", version)]
#[command(about = "Fill DOCX templates without losing Word's run formatting")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Substitute placeholders and expand the repeating block
    Fill {
        /// Template DOCX file
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// Output DOCX file, or a directory to write <template>_filled.docx into
        #[arg(short, long)]
        output: PathBuf,

        /// JSON object mapping placeholder tokens to values
        #[arg(long, value_name = "FILE")]
        values: Option<PathBuf>,

        /// JSON items for the repeating block: array of objects or object of arrays
        #[arg(long, value_name = "FILE", requires = "block_start")]
        items: Option<PathBuf>,

        /// Text marking the first paragraph of the repeating block
        #[arg(long)]
        block_start: Option<String>,

        /// Text marking the paragraph after the block (default: document end)
        #[arg(long, default_value = "")]
        block_end: String,

        /// Also export a PDF next to the output (needs LibreOffice)
        #[arg(long)]
        pdf: bool,
    },
    /// Print every paragraph with its run boundaries marked
    Inspect {
        #[arg(value_name = "DOCX")]
        docx: PathBuf,
    },
}

fn read_input(path: &Path) -> Result<String, Error> {
    std::fs::read_to_string(path).map_err(|e| {
        Error::Io(std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())))
    })
}

fn output_path(template: &Path, output: &Path) -> PathBuf {
    if !output.is_dir() {
        return output.to_path_buf();
    }
    let stem = template
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output.join(format!("{}_filled.docx", form::sanitize_filename(&stem)))
}

fn inspect(path: &Path) -> Result<(), Error> {
    let package = docx::parse(path)?;
    let doc = &package.document;
    for (i, id) in doc.all_paragraphs().into_iter().enumerate() {
        let paragraph = doc.paragraph(id);
        let runs: String = paragraph
            .runs()
            .map(|r| format!("[{}]", r.text().escape_debug()))
            .collect();
        println!("{i:>4} {:<16} {runs}", paragraph.style().unwrap_or("-"));
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), Error> {
    match cli.command {
        Command::Inspect { docx } => inspect(&docx),
        Command::Fill {
            template,
            output,
            values,
            items,
            block_start,
            block_end,
            pdf,
        } => {
            let values = match values {
                Some(path) => form::mapping_from_json(&read_input(&path)?)?,
                None => Mapping::new(),
            };
            let mut fill = Fill::new(values);
            if let Some(start) = block_start {
                let items = match items {
                    Some(path) => form::items_from_json(&read_input(&path)?)?,
                    None => Vec::new(),
                };
                fill = fill.with_block(RepeatingBlock {
                    start,
                    end: block_end,
                    items,
                });
            }

            let output = output_path(&template, &output);
            let report = docx_stencil::fill_docx(&template, &output, &fill)?;
            println!(
                "Wrote {} ({} replacements in {} paragraphs, {} block instances)",
                output.display(),
                report.replacements,
                report.paragraphs,
                report.instances
            );

            if pdf {
                let outdir = output
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .unwrap_or(Path::new("."));
                match docx_stencil::to_pdf(&output, outdir) {
                    Some(path) => println!("Wrote {}", path.display()),
                    None => eprintln!(
                        "PDF export failed (DOCX generated). Install LibreOffice or set {}.",
                        docx_stencil::SOFFICE_ENV
                    ),
                }
            }
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
