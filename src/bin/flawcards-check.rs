use anyhow::{Context, Result};
use clap::Parser;
use cliclack::log;
use flawcards::config::Settings;
use flawcards::flags::{self, FlagSet, FlagWarning};
use flawcards::input::Input;
use std::fs;

/// Check that flags are used consistently in parallel expression lists
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Input file (JSON)
    infile: String,
    /// Flag characters
    #[arg(long)]
    flags: Option<String>,
}

fn report(what: &str, warnings: &[FlagWarning], options: &textwrap::Options) -> Result<usize> {
    for w in warnings {
        let line = format!("{what}: {w}");
        log::warning(textwrap::fill(&line, options))?;
    }
    Ok(warnings.len())
}

fn main() -> Result<()> {
    let args = Args::parse();
    cliclack::intro("flawcards-check")?;
    log::info(format!("Reading {}...", args.infile))?;
    let indata =
        fs::read_to_string(&args.infile).with_context(|| format!("cannot read {}", args.infile))?;
    let input: Input =
        serde_json::from_str(&indata).with_context(|| format!("cannot parse {}", args.infile))?;
    let flags = FlagSet::new(&args.flags.unwrap_or_else(|| Settings::default().flags));
    let options = textwrap::Options::new(70).subsequent_indent("  ");

    let mut total = 0;
    for (i, record) in input.records.iter().enumerate() {
        let warnings =
            flags::check_flag_usage(&record.expressions, &record.expression_prompts, &flags);
        let what = format!("record {} ({})", i + 1, record.native);
        total += report(&what, &warnings, &options)?;
    }
    for o in input.overrides.iter().flatten() {
        if let (Some(answers), Some(prompts)) = (&o.expr_answers, &o.expr_prompts) {
            let warnings = flags::check_flag_usage(answers, prompts, &flags);
            total += report(&format!("override {}", o.id), &warnings, &options)?;
        }
    }

    if total == 0 {
        log::success("Flags are used consistently")?;
    }
    cliclack::outro(format!("{total} warnings"))?;
    Ok(())
}
