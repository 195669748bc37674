//! rich2md: CLI tool to convert stored rich-text documents to Markdown and back

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use config::Config;
use rich2md_core::{document_from_json, document_to_json, markdown_to_document};
use rich2md_doc::document_to_markdown;

#[derive(Parser, Debug)]
#[command(name = "rich2md")]
#[command(about = "Convert stored rich-text documents (JSON) to Markdown and back")]
#[command(version)]
#[command(after_help = "Examples:
  rich2md post.json                 # Convert document to post.md
  rich2md post.md --pretty          # Convert Markdown to post.json
  rich2md drafts/ -o out/           # Convert directory
  rich2md drafts/ -o out/ -j4       # Use 4 parallel jobs
  rich2md --init-config drafts/     # Write a sample _rich2md.toml")]
struct Cli {
    /// Input file (.json or .md) or directory
    input: PathBuf,

    /// Output file or directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file (defaults to _rich2md.toml next to the input)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of parallel jobs (defaults to number of CPUs)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Process directories recursively
    #[arg(short, long)]
    recursive: bool,

    /// Pretty-print document JSON output
    #[arg(long)]
    pretty: bool,

    /// Write a sample configuration file into the input directory and exit
    #[arg(long)]
    init_config: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only show errors
    #[arg(short, long)]
    quiet: bool,
}

/// Which way a file converts, decided by its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    DocumentToMarkdown,
    MarkdownToDocument,
}

fn direction_for(path: &Path) -> Option<Direction> {
    let ext = path.extension()?.to_str()?;
    if ext.eq_ignore_ascii_case("json") {
        Some(Direction::DocumentToMarkdown)
    } else if ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown") {
        Some(Direction::MarkdownToDocument)
    } else {
        None
    }
}

/// Effective settings after merging config file and flags
#[derive(Debug, Clone)]
struct Options {
    markdown_extension: String,
    pretty_json: bool,
}

impl Options {
    fn merge(config: Option<Config>, cli: &Cli) -> Self {
        let output = config.map(|c| c.output).unwrap_or_default();
        Self {
            markdown_extension: output.extension.unwrap_or_else(|| "md".to_string()),
            pretty_json: cli.pretty || output.pretty_json.unwrap_or(false),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.init_config {
        return init_config(&cli.input);
    }

    let config = match &cli.config {
        Some(path) => Some(Config::load(path)?),
        None => {
            let dir = if cli.input.is_dir() {
                cli.input.clone()
            } else {
                cli.input.parent().unwrap_or(Path::new(".")).to_path_buf()
            };
            Config::load_from_dir(&dir)?
        }
    };
    let options = Options::merge(config, &cli);

    if cli.input.is_file() {
        convert_file(
            &cli.input,
            cli.output.as_deref(),
            &options,
            cli.verbose,
            cli.quiet,
        )?;
    } else if cli.input.is_dir() {
        convert_directory(&cli.input, cli.output.as_deref(), &options, &cli)?;
    } else {
        anyhow::bail!("Input path does not exist: {}", cli.input.display());
    }

    Ok(())
}

/// Write a sample `_rich2md.toml` into the given directory
fn init_config(dir: &Path) -> Result<()> {
    anyhow::ensure!(dir.is_dir(), "Not a directory: {}", dir.display());
    let path = dir.join(config::CONFIG_FILE_NAME);
    anyhow::ensure!(!path.exists(), "Config already exists: {}", path.display());

    fs::write(&path, Config::sample().to_toml_with_schema()?)
        .with_context(|| format!("Failed to write: {}", path.display()))?;
    println!("{}", path.display());
    Ok(())
}

/// Convert a single file
fn convert_file(
    input: &Path,
    output: Option<&Path>,
    options: &Options,
    verbose: bool,
    quiet: bool,
) -> Result<()> {
    let direction = direction_for(input).with_context(|| {
        format!(
            "Unsupported input extension (expected .json or .md): {}",
            input.display()
        )
    })?;

    let output_path = match output {
        Some(p) => p.to_path_buf(),
        None => input.with_extension(output_extension(direction, options)),
    };

    if verbose {
        eprintln!(
            "Converting: {} -> {}",
            input.display(),
            output_path.display()
        );
    }

    convert_file_inner(input, &output_path, direction, options)?;

    if !quiet {
        println!("{}", output_path.display());
    }

    Ok(())
}

/// Convert a directory of document and Markdown files
fn convert_directory(input: &Path, output: Option<&Path>, options: &Options, cli: &Cli) -> Result<()> {
    let output_dir = output.unwrap_or(input);

    let files = collect_input_files(input, cli.recursive)?;

    if files.is_empty() {
        if !cli.quiet {
            eprintln!("No .json or .md files found in {}", input.display());
        }
        return Ok(());
    }

    if cli.verbose {
        eprintln!("Found {} files", files.len());
    }

    // Configure thread pool if jobs specified
    if let Some(n) = cli.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    // Atomic counters for thread-safe progress tracking
    let success = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);

    // Parallel conversion
    let errors: Vec<_> = files
        .par_iter()
        .filter_map(|(file, direction)| {
            let relative = file.strip_prefix(input).unwrap_or(file);
            let output_file = output_dir
                .join(relative)
                .with_extension(output_extension(*direction, options));

            match convert_file_inner(file, &output_file, *direction, options) {
                Ok(()) => {
                    success.fetch_add(1, Ordering::Relaxed);
                    if !cli.quiet {
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

    // Report errors
    for (file, e) in &errors {
        eprintln!("Error converting {}: {:#}", file.display(), e);
    }

    let success_count = success.load(Ordering::Relaxed);
    let failed_count = failed.load(Ordering::Relaxed);

    if !cli.quiet {
        eprintln!("Converted {} files, {} failed", success_count, failed_count);
    }

    if failed_count > 0 {
        anyhow::bail!("{} files failed to convert", failed_count);
    }

    Ok(())
}

fn output_extension(direction: Direction, options: &Options) -> &str {
    match direction {
        Direction::DocumentToMarkdown => &options.markdown_extension,
        Direction::MarkdownToDocument => "json",
    }
}

/// Inner conversion function that doesn't print (for parallel use)
fn convert_file_inner(
    input: &Path,
    output: &Path,
    direction: Direction,
    options: &Options,
) -> Result<()> {
    let content = fs::read_to_string(input)
        .with_context(|| format!("Failed to read: {}", input.display()))?;

    let converted = convert_content(&content, direction, options)?;

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(output, &converted)
        .with_context(|| format!("Failed to write: {}", output.display()))?;

    Ok(())
}

/// Collect convertible files in a directory, paired with their direction
fn collect_input_files(dir: &Path, recursive: bool) -> Result<Vec<(PathBuf, Direction)>> {
    let mut files = Vec::new();

    for entry in
        fs::read_dir(dir).with_context(|| format!("Failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_file() {
            if let Some(direction) = direction_for(&path) {
                files.push((path, direction));
            }
        } else if path.is_dir() && recursive {
            files.extend(collect_input_files(&path, recursive)?);
        }
    }

    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}

/// Core conversion function
fn convert_content(content: &str, direction: Direction, options: &Options) -> Result<String> {
    match direction {
        Direction::DocumentToMarkdown => {
            let doc = document_from_json(content).context("Failed to decode document")?;
            let mut markdown = document_to_markdown(&doc);
            if !markdown.is_empty() {
                markdown.push('\n');
            }
            Ok(markdown)
        }
        Direction::MarkdownToDocument => {
            let doc = markdown_to_document(content);
            let mut json = document_to_json(&doc, options.pretty_json)
                .context("Failed to encode document")?;
            json.push('\n');
            Ok(json)
        }
    }
}
