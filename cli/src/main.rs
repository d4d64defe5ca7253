//! pdfoutline CLI - infer a PDF's title and heading outline

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfoutline::{outline_file, write_outline, HeadingLevel, JsonFormat, Outline, OutlineConfig};

/// Input used when the interactive prompt is left blank.
const SAMPLE_INPUT: &str = "sample.pdf";

#[derive(Parser)]
#[command(name = "pdfoutline")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Infer a PDF's title and heading outline as JSON", long_about = None)]
struct Cli {
    /// Input PDF file (prompted for when omitted)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output JSON file [default: <FILE stem>_outline.json]
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Log per-stage decisions
    #[arg(short, long)]
    debug: bool,

    /// JSON configuration file (partial files allowed)
    #[arg(long, value_name = "FILE", env = "PDFOUTLINE_CONFIG")]
    config: Option<PathBuf>,

    /// Deepest heading level to emit (1-6)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=6))]
    max_depth: Option<u8>,

    /// Write compact JSON
    #[arg(long)]
    compact: bool,

    /// Process pages on a single thread
    #[arg(long)]
    sequential: bool,
}

/// What to process, after prompting if needed.
struct Request {
    input: PathBuf,
    output: PathBuf,
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    let result = resolve_request(&cli).and_then(|request| {
        init_logging(request.debug);
        cmd_outline(&cli, &request)
    });

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let default_filter = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn resolve_request(cli: &Cli) -> Result<Request, Box<dyn std::error::Error>> {
    if let Some(input) = &cli.input {
        return Ok(Request {
            output: cli
                .output
                .clone()
                .unwrap_or_else(|| default_output(input)),
            input: input.clone(),
            debug: cli.debug,
        });
    }

    let stdin = io::stdin();
    let mut stdin = stdin.lock();

    let input = prompt(&mut stdin, &format!("Input PDF path [{}]: ", SAMPLE_INPUT))?;
    let input = if input.is_empty() {
        PathBuf::from(SAMPLE_INPUT)
    } else {
        PathBuf::from(input)
    };

    let output = match &cli.output {
        Some(path) => path.clone(),
        None => {
            let suggested = default_output(&input);
            let answer = prompt(
                &mut stdin,
                &format!("Output JSON path [{}]: ", suggested.display()),
            )?;
            if answer.is_empty() {
                suggested
            } else {
                PathBuf::from(answer)
            }
        }
    };

    let debug = cli.debug || {
        let answer = prompt(&mut stdin, "Enable debug logging? (y/N): ")?;
        matches!(answer.to_lowercase().as_str(), "y" | "yes")
    };

    Ok(Request {
        input,
        output,
        debug,
    })
}

/// Print a question and read one trimmed line (empty at end of input).
fn prompt(stdin: &mut impl BufRead, question: &str) -> io::Result<String> {
    print!("{}", question);
    io::stdout().flush()?;
    let mut line = String::new();
    stdin.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// `<dir>/<stem>_outline.json` next to the input.
fn default_output(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    input.with_file_name(format!("{}_outline.json", stem))
}

fn load_config(cli: &Cli) -> Result<OutlineConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
            OutlineConfig::from_json(&json)?
        }
        None => OutlineConfig::default(),
    };

    if let Some(depth) = cli.max_depth {
        config = config.with_max_depth(depth);
    }
    if cli.sequential {
        config = config.sequential();
    }
    Ok(config)
}

fn cmd_outline(cli: &Cli, request: &Request) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(cli)?;
    log::debug!("Configuration: {:?}", config);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Analyzing {}...", request.input.display()));

    let outline = match outline_file(&request.input, &config) {
        Ok(outline) => outline,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e.into());
        }
    };

    pb.set_message("Writing outline...");
    let format = if cli.compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let written = write_outline(&outline, &request.output, format);
    pb.finish_and_clear();
    written?;

    print_summary(&outline, &request.output);
    Ok(())
}

fn print_summary(outline: &Outline, output: &Path) {
    println!("{} {}", "Saved to".green(), output.display());

    let title = if outline.title.is_empty() {
        "(none)".dimmed().to_string()
    } else {
        outline.title.bold().to_string()
    };
    println!("  {} {}", "Title:".cyan(), title);
    let per_level: Vec<String> = (1..=HeadingLevel::MAX)
        .filter_map(HeadingLevel::new)
        .map(|level| (level, outline.at_level(level).count()))
        .filter(|(_, count)| *count > 0)
        .map(|(level, count)| format!("{level}: {count}"))
        .collect();
    if per_level.is_empty() {
        println!("  {} 0", "Headings:".cyan());
    } else {
        println!(
            "  {} {} ({})",
            "Headings:".cyan(),
            outline.outline.len(),
            per_level.join(", ")
        );
    }

    for entry in &outline.outline {
        let indent = "  ".repeat(entry.level.depth() as usize);
        println!(
            "  {}{} {} {}",
            indent,
            entry.level.to_string().yellow(),
            entry.text,
            format!("(p. {})", entry.page).dimmed()
        );
    }
}
