// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Lipiwerk — OCR-fed Indic script detection and batch transliteration
//
// Entry point. Initialises logging, loads settings, and runs one subcommand.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use lipiwerk_app::services::config_dir;
use lipiwerk_app::services::extractor::{build_extractor, warn_ocr_gaps};
use lipiwerk_app::services::report::DetectReport;
use lipiwerk_app::{Output, Pipeline, Upload};
use lipiwerk_core::AppConfig;
use lipiwerk_core::error::{LipiwerkError, Result};
use lipiwerk_core::human_errors::humanize_error;
use lipiwerk_core::types::{OutputEncoding, SourceScheme};
use lipiwerk_translit::{LipiBackend, SchemeRegistry};
use tracing::{error, info, warn};

/// Lipiwerk - transliterate scanned and digital Indic texts between scripts
#[derive(Parser)]
#[command(name = "lipiwerk", version)]
#[command(about = "Detect scripts and transliterate documents between Indic schemes")]
struct Cli {
    /// Directory holding config.json
    #[arg(long, global = true, env = "LIPIWERK_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transliterate files into one or more target schemes
    Convert(ConvertArgs),

    /// Print the detected script and guessed input scheme of each file
    Detect {
        /// Files to inspect (.txt, .pdf, or images)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Emit JSON instead of tab-separated lines
        #[arg(long)]
        json: bool,
    },

    /// List every scheme identifier the backend supports
    Schemes,

    /// Show the effective configuration
    Config {
        /// Write a default config.json if none exists
        #[arg(long)]
        init: bool,
    },
}

#[derive(Args)]
struct ConvertArgs {
    /// Files to convert (.txt, .pdf, or images)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Target scheme (repeatable or comma-separated); defaults to the configured targets
    #[arg(short = 't', long = "target", value_delimiter = ',')]
    targets: Vec<String>,

    /// Source scheme, or "Auto" to guess per file
    #[arg(short, long)]
    source: Option<String>,

    /// OCR language hint (e.g. eng, hin)
    #[arg(long)]
    lang: Option<String>,

    /// Output encoding: utf-8, utf-8-sig, or latin-1
    #[arg(long)]
    encoding: Option<OutputEncoding>,

    /// Where to write the result (text defaults to stdout, archives to the configured name)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory holding the OCR models
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// Binarize images before OCR
    #[arg(long)]
    binarize: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let dir = cli.config_dir.unwrap_or_else(config_dir::config_dir);
    let config = config_dir::load_config(&dir);

    let result = match cli.command {
        Commands::Convert(args) => cmd_convert(args, config),
        Commands::Detect { files, json } => cmd_detect(&files, json, &config),
        Commands::Schemes => cmd_schemes(),
        Commands::Config { init } => cmd_config(&dir, &config, init),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_error(&err),
    }
}

/// Print the human-readable form of `err`. Request errors exit with 2,
/// everything else with 1.
fn report_error(err: &LipiwerkError) -> ExitCode {
    let human = humanize_error(err);
    error!(%err, status = human.status, "request failed");
    eprintln!("error: {}", human.message);
    eprintln!("  {}", human.suggestion);
    if err.is_request_error() {
        ExitCode::from(2)
    } else {
        ExitCode::FAILURE
    }
}

fn cmd_convert(args: ConvertArgs, mut config: AppConfig) -> Result<()> {
    // Flags override the config file.
    if let Some(lang) = args.lang {
        config.ocr_language = lang;
    }
    if let Some(dir) = args.model_dir {
        config.ocr_model_dir = Some(dir);
    }
    if args.binarize {
        config.binarize_before_ocr = true;
    }
    let encoding = args.encoding.unwrap_or(config.output_encoding);
    let targets = if args.targets.is_empty() {
        config.default_targets.clone()
    } else {
        args.targets
    };
    let source = SourceScheme::parse(args.source.as_deref().unwrap_or(&config.default_source));

    let uploads = read_uploads(&args.files)?;
    let extractor = build_extractor(&config);
    warn_ocr_gaps(&extractor, &filenames(&uploads));
    let backend = LipiBackend::new();
    let registry = SchemeRegistry::discover(&backend);

    let output = Pipeline::new(&extractor, &backend, &registry)
        .with_encoding(encoding)
        .run(&uploads, &source, &targets)?;

    if let Output::Text {
        filename,
        target,
        result,
    } = &output
    {
        if result.is_failed() {
            warn!(%filename, to = %target, "conversion failed, writing error marker");
        }
    }

    match output {
        Output::Archive(bytes) => {
            let path = args
                .output
                .unwrap_or_else(|| PathBuf::from(&config.archive_name));
            write_file(&path, &bytes)?;
            println!("{}", path.display());
        }
        text => {
            let bytes = text.into_bytes(encoding);
            match args.output {
                Some(path) => write_file(&path, &bytes)?,
                None => std::io::stdout().lock().write_all(&bytes)?,
            }
        }
    }
    Ok(())
}

fn cmd_detect(files: &[PathBuf], json: bool, config: &AppConfig) -> Result<()> {
    let extractor = build_extractor(config);
    let uploads = read_uploads(files)?;
    warn_ocr_gaps(&extractor, &filenames(&uploads));
    let reports: Vec<DetectReport> = uploads
        .iter()
        .map(|upload| DetectReport::for_document(&extractor.extract(&upload.filename, &upload.bytes)))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            println!("{}", report.to_line());
        }
    }
    Ok(())
}

fn cmd_schemes() -> Result<()> {
    let backend = LipiBackend::new();
    let registry = SchemeRegistry::discover(&backend);
    for id in registry.ids() {
        println!("{id}");
    }
    Ok(())
}

fn cmd_config(dir: &Path, config: &AppConfig, init: bool) -> Result<()> {
    if init {
        let path = config_dir::init_config(dir)?;
        info!(path = %path.display(), "config ready");
    }
    println!("# {}", dir.join(lipiwerk_core::config::CONFIG_FILENAME).display());
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

fn read_uploads(files: &[PathBuf]) -> Result<Vec<Upload>> {
    files
        .iter()
        .map(|path| {
            let bytes = std::fs::read(path).map_err(|err| with_path(path, err))?;
            Ok(Upload::new(path.display().to_string(), bytes))
        })
        .collect()
}

fn filenames(uploads: &[Upload]) -> Vec<&str> {
    uploads.iter().map(|upload| upload.filename.as_str()).collect()
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).map_err(|err| with_path(path, err))?;
    info!(path = %path.display(), bytes = bytes.len(), "output written");
    Ok(())
}

fn with_path(path: &Path, err: std::io::Error) -> LipiwerkError {
    LipiwerkError::Io(std::io::Error::new(
        err.kind(),
        format!("{}: {}", path.display(), err),
    ))
}
