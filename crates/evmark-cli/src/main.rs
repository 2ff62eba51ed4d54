//! evmark: CLI tool to render document event streams as Markdown

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use evmark_core::{MacroFallback, RenderOptions, render};
use evmark_events::parse_events;

use config::{CONFIG_FILE_NAME, Config};

const DEFAULT_EXTENSION: &str = "md";

#[derive(Parser, Debug)]
#[command(name = "evmark")]
#[command(about = "Render document event streams as Markdown")]
#[command(version)]
#[command(after_help = "Examples:
  evmark page.json                   # Render to page.md
  evmark page.jsonl -o out.md        # Render to a specific output file
  evmark events/ -o docs/            # Render a directory
  evmark events/ -o docs/ -r -j4     # Recurse, using 4 parallel jobs
  evmark init                        # Write a sample _evmark.toml")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Input event stream (.json or .jsonl) or directory
    input: Option<PathBuf>,

    /// Output file or directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of parallel jobs (defaults to number of CPUs)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Process directories recursively
    #[arg(short, long)]
    recursive: bool,

    /// What to do with macros that have no Markdown form [possible values: skip, wiki]
    #[arg(long, value_name = "MODE")]
    macro_fallback: Option<MacroFallback>,

    /// Never print `type:` prefixes on wiki references
    #[arg(long)]
    no_typed_prefixes: bool,

    /// Configuration file (defaults to _evmark.toml next to the input)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only show errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a sample _evmark.toml
    Init {
        /// Directory to write the configuration file to
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },
    /// Print the JSON schema of the configuration file
    Schema,
}

/// Settings for one run, after merging the config file and flags
#[derive(Debug, Clone)]
struct Settings {
    extension: String,
    options: RenderOptions,
    verbose: bool,
    quiet: bool,
}

impl Settings {
    /// Flags take precedence over the config file
    fn resolve(cli: &Cli, config: &Config) -> Result<Self> {
        let macro_fallback = match cli.macro_fallback {
            Some(fallback) => fallback,
            None => config.render.macro_fallback()?.unwrap_or_default(),
        };
        let typed_prefixes =
            !cli.no_typed_prefixes && config.references.typed_prefixes.unwrap_or(true);
        let extension = config
            .output
            .extension
            .clone()
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());

        Ok(Self {
            extension,
            options: RenderOptions {
                macro_fallback,
                typed_prefixes,
            },
            verbose: cli.verbose,
            quiet: cli.quiet,
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Command::Init { dir, force }) => return init_config(dir, *force, cli.quiet),
        Some(Command::Schema) => {
            println!("{}", Config::json_schema_string()?);
            return Ok(());
        }
        None => {}
    }

    let Some(input) = cli.input.as_deref() else {
        anyhow::bail!("No input given. Run `evmark --help` for usage");
    };

    let config = load_config(input, cli.config.as_deref())?;
    let settings = Settings::resolve(&cli, &config)?;

    if input.is_file() {
        convert_file(input, cli.output.as_deref(), &settings)?;
    } else if input.is_dir() {
        convert_directory(
            input,
            cli.output.as_deref(),
            cli.recursive,
            cli.jobs,
            &settings,
        )?;
    } else {
        anyhow::bail!("Input path does not exist: {}", input.display());
    }

    Ok(())
}

/// Load the explicit config file, or `_evmark.toml` next to the input
fn load_config(input: &Path, explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return Config::load(path);
    }

    let dir = if input.is_dir() {
        Some(input)
    } else {
        input.parent().filter(|p| !p.as_os_str().is_empty())
    };
    let dir = dir.unwrap_or(Path::new("."));
    Ok(Config::load_from_dir(dir)?.unwrap_or_default())
}

/// Write a sample configuration file
fn init_config(dir: &Path, force: bool, quiet: bool) -> Result<()> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    let content = Config::sample().to_toml_with_schema()?;
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    fs::write(&path, content).with_context(|| format!("Failed to write: {}", path.display()))?;

    if !quiet {
        println!("{}", path.display());
    }
    Ok(())
}

/// Convert a single event stream file
fn convert_file(input: &Path, output: Option<&Path>, settings: &Settings) -> Result<()> {
    let output_path = match output {
        Some(p) => p.to_path_buf(),
        None => input.with_extension(&settings.extension),
    };

    if settings.verbose {
        eprintln!(
            "Converting: {} -> {}",
            input.display(),
            output_path.display()
        );
    }

    convert_file_inner(input, &output_path, &settings.options)?;

    if !settings.quiet {
        println!("{}", output_path.display());
    }

    Ok(())
}

/// Convert a directory of event stream files
fn convert_directory(
    input: &Path,
    output: Option<&Path>,
    recursive: bool,
    jobs: Option<usize>,
    settings: &Settings,
) -> Result<()> {
    let output_dir = output.unwrap_or(input);

    let files = collect_event_files(input, recursive)?;

    if files.is_empty() {
        if !settings.quiet {
            eprintln!("No event stream files found in {}", input.display());
        }
        return Ok(());
    }

    let total = files.len();
    if settings.verbose {
        eprintln!("Found {} event stream files", total);
    }

    if let Some(n) = jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let success = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);

    // One renderer per file
    let errors: Vec<_> = files
        .par_iter()
        .filter_map(|file| {
            let relative = file.strip_prefix(input).unwrap_or(file);
            let output_file = output_dir.join(relative).with_extension(&settings.extension);

            match convert_file_inner(file, &output_file, &settings.options) {
                Ok(()) => {
                    success.fetch_add(1, Ordering::Relaxed);
                    if !settings.quiet {
                        println!("{}", output_file.display());
                    }
                    None
                }
                Err(e) => {
                    failed.fetch_add(1, Ordering::Relaxed);
                    Some((file.clone(), e))
                }
            }
        })
        .collect();

    for (file, e) in &errors {
        eprintln!("Error converting {}: {:#}", file.display(), e);
    }

    let success_count = success.load(Ordering::Relaxed);
    let failed_count = failed.load(Ordering::Relaxed);

    if !settings.quiet {
        eprintln!("Converted {} files, {} failed", success_count, failed_count);
    }

    if failed_count > 0 {
        anyhow::bail!("{} files failed to convert", failed_count);
    }

    Ok(())
}

/// Read, render and write one file without reporting (for parallel use)
fn convert_file_inner(input: &Path, output: &Path, options: &RenderOptions) -> Result<()> {
    let content = fs::read_to_string(input)
        .with_context(|| format!("Failed to read: {}", input.display()))?;

    let markdown = convert_events_to_markdown(&content, options)
        .with_context(|| format!("Failed to convert: {}", input.display()))?;

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(output, &markdown)
        .with_context(|| format!("Failed to write: {}", output.display()))?;

    Ok(())
}

/// Whether a path looks like an event stream file
fn is_event_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| {
        ext.eq_ignore_ascii_case("json") || ext.eq_ignore_ascii_case("jsonl")
    })
}

/// Collect all event stream files in a directory
fn collect_event_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in
        fs::read_dir(dir).with_context(|| format!("Failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_file() {
            if is_event_file(&path) {
                files.push(path);
            }
        } else if path.is_dir() && recursive {
            files.extend(collect_event_files(&path, recursive)?);
        }
    }

    files.sort();
    Ok(files)
}

/// Core conversion function
fn convert_events_to_markdown(source: &str, options: &RenderOptions) -> Result<String> {
    let events = parse_events(source).context("Invalid event stream")?;
    let markdown = render(&events, options).context("Invalid event structure")?;
    Ok(markdown)
}
