//! fcb-convert - Command-line tool for converting Dunia binary object files.
//!
//! Converts FCB files to annotated XML and back, using a directory of
//! definition files to name classes and fields.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

use dunia::prelude::*;

/// fcb-convert - convert Dunia binary object files to XML and back
#[derive(Parser)]
#[command(name = "fcb-convert")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Convert XML to FCB
    #[arg(long, conflicts_with = "xml")]
    fcb: bool,

    /// Convert FCB to XML
    #[arg(long)]
    xml: bool,

    /// Look up definitions under this base name instead of the file name
    #[arg(short, long, value_name = "NAME")]
    base_name: Option<String>,

    /// Be verbose (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Directory of definition files
    #[arg(short, long, env = "DUNIA_SCHEMA_DIR", value_name = "DIR")]
    schema: Option<PathBuf>,

    /// Treat every path as an input and convert them in parallel
    #[arg(long)]
    batch: bool,

    /// Write entity libraries as a single document
    #[arg(long)]
    no_split: bool,

    /// input [output]
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    ToFcb,
    ToXml,
}

impl Mode {
    /// Explicit mode from the command line, if any.
    fn explicit(cli: &Cli) -> Option<Self> {
        if cli.fcb {
            Some(Self::ToFcb)
        } else if cli.xml {
            Some(Self::ToXml)
        } else {
            None
        }
    }

    /// Mode implied by an input file's extension.
    fn detect(input: &Path) -> Option<Self> {
        let extension = input.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "fcb" | "obj" | "lib" => Some(Self::ToXml),
            "xml" => Some(Self::ToFcb),
            _ => None,
        }
    }
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "error",
        1 => "warn",
        2 => "info",
        _ => "debug",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbosity >= 3)
        .init();
}

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Usage and help are not failures
            e.print()?;
            return Ok(());
        }
    };
    setup_logging(cli.verbose);

    let explicit = Mode::explicit(&cli);
    let mode = match cli.paths.first() {
        Some(input) if cli.batch || cli.paths.len() <= 2 => explicit.or_else(|| Mode::detect(input)),
        _ => None,
    };
    let Some(mode) = mode else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let Some(schema_dir) = cli.schema.as_deref().filter(|dir| dir.is_dir()) else {
        println!("Warning: no active project loaded.");
        return Ok(());
    };

    if cli.verbose > 0 {
        println!("Loading definitions from {}...", schema_dir.display());
    }
    let start = Instant::now();
    let config = Configuration::load(schema_dir).context("Failed to load definitions")?;
    if cli.verbose > 0 {
        println!(
            "Loaded in {:?}: {} classes, {} enums, {} object files",
            start.elapsed(),
            config.class_count(),
            config.enum_count(),
            config.object_file_count()
        );
    }

    let transcoder = Transcoder::new(&config).with_options(TranscodeOptions {
        split_entity_libraries: !cli.no_split,
    });
    let base_name = cli.base_name.as_deref();

    if cli.batch {
        return cmd_batch(&transcoder, &cli.paths, explicit, base_name);
    }

    let input = &cli.paths[0];
    let output = cli.paths.get(1).map(PathBuf::as_path);
    match mode {
        Mode::ToFcb => cmd_to_fcb(&transcoder, input, output, base_name, cli.verbose > 0)?,
        Mode::ToXml => cmd_to_xml(&transcoder, input, output, base_name, cli.verbose > 0)?,
    };

    Ok(())
}

fn cmd_to_fcb(
    transcoder: &Transcoder<'_>,
    input: &Path,
    output: Option<&Path>,
    base_name: Option<&str>,
    verbose: bool,
) -> Result<PathBuf> {
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| with_suffix(input, "_converted.fcb"));
    let base_name = match base_name {
        Some(name) => name.to_string(),
        None => fcb_base_name(input)?,
    };

    if verbose {
        println!("Converting: {} -> {}", input.display(), output.display());
    }

    let object_def = object_definition(transcoder, &base_name);
    debug!(input = %input.display(), base_name = %base_name, "reading XML document");
    let root = transcoder
        .read_document(input, object_def.as_ref())
        .with_context(|| format!("Failed to read {}", input.display()))?;

    BinaryObjectFile::new(root)
        .write_file(&output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!(output = %output.display(), "wrote binary object file");
    Ok(output)
}

fn cmd_to_xml(
    transcoder: &Transcoder<'_>,
    input: &Path,
    output: Option<&Path>,
    base_name: Option<&str>,
    verbose: bool,
) -> Result<PathBuf> {
    let (output, base_path) = match output {
        Some(output) => (output.to_path_buf(), output.with_extension("")),
        None => (with_suffix(input, "_converted.xml"), with_suffix(input, "_converted")),
    };
    let base_name = match base_name {
        Some(name) => name.to_string(),
        None => file_stem(input)?,
    };

    if verbose {
        println!("Converting: {} -> {}", input.display(), output.display());
    }

    let file = BinaryObjectFile::read_file(input).with_context(|| format!("Failed to read {}", input.display()))?;

    let object_def = object_definition(transcoder, &base_name);
    debug!(input = %input.display(), base_name = %base_name, "writing XML document");
    transcoder
        .write_document(&file.root, object_def.as_ref(), &output, &base_path)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!(output = %output.display(), "wrote XML document");

    Ok(output)
}

fn cmd_batch(transcoder: &Transcoder<'_>, inputs: &[PathBuf], mode: Option<Mode>, base_name: Option<&str>) -> Result<()> {
    println!("Converting {} files...", inputs.len());

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let failures: Vec<(&PathBuf, anyhow::Error)> = inputs
        .par_iter()
        .filter_map(|input| {
            let result = match mode.or_else(|| Mode::detect(input)) {
                Some(Mode::ToFcb) => cmd_to_fcb(transcoder, input, None, base_name, false),
                Some(Mode::ToXml) => cmd_to_xml(transcoder, input, None, base_name, false),
                None => Err(anyhow::anyhow!("cannot tell conversion direction")),
            };
            pb.inc(1);
            result.err().map(|e| (input, e))
        })
        .collect();

    pb.finish_with_message("Done");
    for (input, e) in &failures {
        eprintln!("Error converting {}: {:#}", input.display(), e);
    }
    println!(
        "Converted {} files in {:?} ({} errors)",
        inputs.len() - failures.len(),
        start.elapsed(),
        failures.len()
    );

    if !failures.is_empty() {
        bail!("{} of {} conversions failed", failures.len(), inputs.len());
    }
    Ok(())
}

fn object_definition(transcoder: &Transcoder<'_>, base_name: &str) -> Option<std::sync::Arc<ObjectDefinition>> {
    let object_def = transcoder.object_definition_for(base_name);
    if object_def.is_none() {
        println!("Warning: could not find binary object definition '{}'", base_name);
    }
    object_def
}

/// `path` without its extension, followed by `suffix`.
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.with_extension("").into_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

fn file_stem(path: &Path) -> Result<String> {
    match path.file_stem().and_then(|s| s.to_str()) {
        Some(stem) if !stem.is_empty() => Ok(stem.to_string()),
        _ => bail!("cannot derive a base name from {}", path.display()),
    }
}

/// Base name of an XML input, ignoring the suffix added by a previous conversion.
fn fcb_base_name(input: &Path) -> Result<String> {
    let stem = file_stem(input)?;
    match stem.strip_suffix("_converted") {
        Some(base) if !base.is_empty() => Ok(base.to_string()),
        _ => Ok(stem),
    }
}
