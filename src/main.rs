use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::info;

use toclink::render::FaceMeasurer;
use toclink::traits::MeasureError;
use toclink::{MergeInput, PipelineError, TocOptions, merge_with_toc};

/// Merge PDF files and prepend a clickable table-of-contents page.
#[derive(Parser, Debug)]
#[command(name = "toclink", version, about)]
struct Args {
    /// PDF files to merge, in order.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output file.
    #[arg(short, long, default_value = "merged.pdf")]
    output: PathBuf,

    /// TrueType/OpenType font file used to measure TOC text. Defaults to a
    /// system sans-serif face.
    #[arg(long)]
    font: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), PipelineError> {
    let font_data = match &args.font {
        Some(path) => std::fs::read(path)?,
        None => system_sans_serif()?,
    };
    let measurer = FaceMeasurer::from_bytes(font_data)?;

    let inputs = args
        .inputs
        .iter()
        .map(MergeInput::load)
        .collect::<Result<Vec<_>, _>>()?;

    let mut document = merge_with_toc(inputs, &measurer, &TocOptions::default())?;
    document.save(&args.output)?;
    info!("Wrote {}", args.output.display());
    Ok(())
}

fn system_sans_serif() -> Result<Vec<u8>, PipelineError> {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();

    let id = db
        .query(&fontdb::Query {
            families: &[fontdb::Family::SansSerif],
            ..fontdb::Query::default()
        })
        .ok_or_else(|| {
            PipelineError::Measure(MeasureError::FontUnavailable(
                "no system sans-serif face found; pass --font".into(),
            ))
        })?;

    db.with_face_data(id, |data, _index| data.to_vec()).ok_or_else(|| {
        PipelineError::Measure(MeasureError::FontUnavailable(
            "could not read system font data".into(),
        ))
    })
}
