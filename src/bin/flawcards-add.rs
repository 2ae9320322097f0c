use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use flawcards::annotate::{Catalog, CatalogAnnotator};
use flawcards::chapter::NumericChapters;
use flawcards::config::Settings;
use flawcards::driver;
use flawcards::errors::Result;
use flawcards::headword::BracketHeadword;
use flawcards::input::Input;
use flawcards::output::{self, Format};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::{error, fs, io, process};

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Input file (JSON)
    infile: String,
    /// Output file
    outfile: String,
    /// Settings file (JSON)
    #[arg(long)]
    config: Option<String>,
    /// Audio and wordlist catalog (JSON)
    #[arg(long)]
    catalog: Option<String>,
    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Tsv)]
    format: Format,
    /// Flag characters
    #[arg(long)]
    flags: Option<String>,
    /// Note id prefix for cards built from flagged tokens only
    #[arg(long)]
    id_prefix: Option<String>,
    /// Tag prefix
    #[arg(long)]
    tag_prefix: Option<String>,
    /// Also write the header line to this file (TSV only)
    #[arg(long)]
    fields_file: Option<String>,
    /// Report errors as a JSON file
    #[arg(long)]
    error_file: Option<String>,
    /// Verbosity
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

#[derive(Serialize)]
struct OError {
    error: String,
}

fn settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.config {
        Some(filename) => {
            info!(target: "flawcards", "config: {}", filename);
            Settings::load(filename)?
        }
        None => Settings::default(),
    };
    if let Some(flags) = &args.flags {
        settings.flags = flags.clone();
    }
    if let Some(prefix) = &args.id_prefix {
        settings.id_prefix = prefix.clone();
    }
    if let Some(prefix) = &args.tag_prefix {
        settings.tag_prefix = prefix.clone();
    }
    settings.validate()?;
    Ok(settings)
}

fn process(args: &Args) -> Result<()> {
    let settings = settings(args)?;
    info!(target: "flawcards", "read: {}", args.infile);
    let indata = fs::read_to_string(&args.infile)?;
    let input: Input = serde_json::from_str(&indata)?;
    let catalog = match &args.catalog {
        Some(filename) => {
            info!(target: "flawcards", "catalog: {}", filename);
            Catalog::load(filename)?
        }
        None => Catalog::default(),
    };

    let resolver = BracketHeadword::new(&settings.flags, &settings.headword_strip);
    let chapters = NumericChapters::new(&settings);
    let mut annotator = CatalogAnnotator::new(&catalog, &resolver, &settings);
    let table = driver::run(&settings, &input, &resolver, &chapters, &mut annotator)?;

    info!(target: "flawcards", "audio files used: {}", annotator.usage.files());
    let missing = annotator.coverage.missing(&catalog);
    debug!(target: "flawcards", "wordlist entries without a card: {}", missing.len());

    if args.fields_file.is_some() && args.format != Format::Tsv {
        warn!(target: "flawcards", "fields file is only written for TSV output");
    }
    info!(target: "flawcards", "write: {}", args.outfile);
    output::write(&table, args.format, &args.outfile, args.fields_file.as_deref())?;
    Ok(())
}

fn store_error(error_file: &str, e: &dyn error::Error) -> Result<()> {
    let error = OError {
        error: format!("{e}"),
    };
    let file = fs::File::create(error_file)?;
    let writer = io::BufWriter::new(file);
    serde_json::to_writer(writer, &error)?;
    Ok(())
}

fn main() {
    let args = Args::parse();
    pretty_env_logger::formatted_timed_builder()
        .filter_level(args.verbose.log_level_filter())
        .init();
    match process(&args) {
        Ok(()) => (),
        Err(e) => {
            match &args.error_file {
                Some(filename) => match store_error(filename, &*e) {
                    Ok(()) => {
                        info!(target: "flawcards", "error reported: {e}");
                    }
                    Err(e2) => {
                        error!(target: "flawcards", "{e}");
                        error!(target: "flawcards", "{e2}");
                    }
                },
                None => error!(target: "flawcards", "{e}"),
            }
            process::exit(1);
        }
    }
}
