use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use liftsheet_core::{Extraction, Extractor, ExtractorConfig};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

mod formatter;

#[derive(Parser)]
#[command(name = "liftsheet")]
#[command(about = "Extract structured workout programs from spreadsheet workbooks", long_about = None)]
#[command(version)]
struct Cli {
    /// Workbook files to extract (XLSX/XLS/ODS)
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Output file (single input only; default stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Suppress the diagnostics report on stderr
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// JSON document with the program and its diagnostics
    Json,
    /// Human-readable program summary
    Human,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Explicit config, then ./liftsheet.toml, then built-in defaults.
    let config = if let Some(config_path) = &cli.config {
        ExtractorConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        let default_config_path = PathBuf::from("liftsheet.toml");
        if default_config_path.exists() {
            ExtractorConfig::from_file(&default_config_path).with_context(|| {
                format!(
                    "Failed to load config from {}",
                    default_config_path.display()
                )
            })?
        } else {
            ExtractorConfig::default()
        }
    };

    let extractor = Extractor::with_config(config);

    if cli.files.len() == 1 {
        let file = &cli.files[0];
        let extraction = extractor
            .extract_file(file)
            .with_context(|| format!("Failed to extract {}", file.display()))?;
        emit(&cli, file, &extraction)?;
        return Ok(());
    }

    if cli.output.is_some() {
        anyhow::bail!("--output only applies to a single input file");
    }

    // Workbooks are independent; extract them side by side. A fatal error
    // in one never stops the others. Each worker renders its report into
    // strings; emission happens sequentially afterwards so reports never
    // interleave.
    let results: Vec<(PathBuf, Result<BatchOutput>)> = cli
        .files
        .par_iter()
        .map(|file| (file.clone(), process_batch_file(&extractor, &cli, file)))
        .collect();

    let mut failed = 0usize;
    for (file, result) in results {
        match result {
            Ok(output) => {
                print!("{}", output.stdout);
                eprint!("{}", output.stderr);
            }
            Err(err) => {
                failed += 1;
                eprintln!("{}: {:#}", file.display(), err);
            }
        }
    }
    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Rendered report for one workbook in batch mode, emitted by the caller.
struct BatchOutput {
    stdout: String,
    stderr: String,
}

fn process_batch_file(extractor: &Extractor, cli: &Cli, file: &Path) -> Result<BatchOutput> {
    let extraction = extractor
        .extract_file(file)
        .with_context(|| format!("Failed to extract {}", file.display()))?;

    let mut output = BatchOutput {
        stdout: String::new(),
        stderr: String::new(),
    };
    match cli.format {
        OutputFormat::Json => {
            let json = formatter::to_json(&extraction, cli.pretty)?;
            let target = file.with_extension("json");
            std::fs::write(&target, json)
                .with_context(|| format!("Failed to write {}", target.display()))?;
            if !cli.quiet {
                output.stderr.push_str(&format!(
                    "{} -> {}\n",
                    file.display(),
                    target.display()
                ));
                output
                    .stderr
                    .push_str(&formatter::render_diagnostics(&extraction.diagnostics));
            }
        }
        OutputFormat::Human => {
            output
                .stdout
                .push_str(&formatter::render_human(file, &extraction));
            if !cli.quiet {
                output
                    .stderr
                    .push_str(&formatter::render_diagnostics(&extraction.diagnostics));
            }
        }
    }
    Ok(output)
}

fn emit(cli: &Cli, file: &Path, extraction: &Extraction) -> Result<()> {
    match cli.format {
        OutputFormat::Json => {
            let json = formatter::to_json(extraction, cli.pretty)?;
            match &cli.output {
                Some(target) => std::fs::write(target, json)
                    .with_context(|| format!("Failed to write {}", target.display()))?,
                None => println!("{}", json),
            }
            if !cli.quiet {
                formatter::print_diagnostics(&extraction.diagnostics);
            }
        }
        OutputFormat::Human => {
            formatter::print_human(file, extraction);
            if !cli.quiet {
                formatter::print_diagnostics(&extraction.diagnostics);
            }
        }
    }
    Ok(())
}
