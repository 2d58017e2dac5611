use std::{fs, path::PathBuf, process::ExitCode};

use clap::Parser;
use resume_typeset::{config::RenderConfig, error::Error, record::ResumeRecord, render_resume};

#[derive(Parser, Debug)]
#[command(version, about = "Renders a resume record into a PDF", long_about = None)]
struct Args {
    /// Resume record as JSON
    record: PathBuf,

    /// Render configuration as JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory to save the document in
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(&Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Error> {
    let config = match &args.config {
        Some(path) => RenderConfig::from_file(path)?,
        None => RenderConfig::default(),
    };

    let text = fs::read_to_string(&args.record).map_err(|err| Error::io(&args.record, err))?;
    let (record, input_diagnostics) = ResumeRecord::from_json_str(&text)?;

    let rendered = render_resume(&record, &config)?;
    let path = rendered.save(&args.out_dir)?;
    log::info!(
        "saved {} ({} pages, {} warnings)",
        path.display(),
        rendered.page_count,
        input_diagnostics.len() + rendered.diagnostics.len(),
    );
    Ok(())
}
