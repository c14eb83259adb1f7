//! twbfields CLI - Tableau calculated field export tool
//!
//! A command-line tool for listing calculated fields of TWB and TWBX files.

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use twbfields::render::{self, JsonFormat};
use twbfields::{ExtractOptions, OutputFormat, DEFAULT_PREFIXES};

/// Calculated field metadata export for Tableau workbooks
#[derive(Parser)]
#[command(
    name = "twbfields",
    author = "iyulab",
    version,
    about = "Export calculated fields from Tableau workbooks",
    long_about = "twbfields - Calculated field metadata export for Tableau workbooks.\n\n\
                  Reads TWB and TWBX files and writes field name, formula and data type\n\
                  of every calculated field to CSV or JSON."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract calculated fields to a CSV or JSON file
    Extract {
        /// Input workbook (.twb or .twbx)
        input: PathBuf,

        /// Output directory (created if absent)
        #[arg(short = 'd', long, default_value = "data/output")]
        output_dir: PathBuf,

        /// Output file name (default: calculated_fields.<format>)
        #[arg(short = 'n', long)]
        output_name: Option<String>,

        /// Keep only fields whose name starts with this prefix (repeatable)
        #[arg(short, long = "prefix", value_name = "PREFIX")]
        prefixes: Vec<String>,

        /// Keep every calculated field
        #[arg(long, conflicts_with = "prefixes")]
        all: bool,

        /// Output format
        #[arg(short, long, default_value = "csv")]
        format: FormatArg,

        /// Print to stdout instead of writing a file
        #[arg(long)]
        stdout: bool,
    },

    /// Unpack a workbook and print the path of its XML document
    Resolve {
        /// Input workbook (.twb or .twbx)
        input: PathBuf,
    },

    /// Show version information
    Version,
}

/// Output format
#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Comma-separated values
    Csv,
    /// JSON array
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Extract {
            input,
            output_dir,
            output_name,
            prefixes,
            all,
            format,
            stdout,
        } => {
            let format = OutputFormat::from(format);
            let options = extract_options(prefixes, all);

            let pb = create_spinner("Resolving workbook...");
            let xml_path = twbfields::resolve(&input)?;
            pb.set_message("Extracting calculated fields...");
            let fields = twbfields::extract_fields(&xml_path, &options)?;
            pb.finish_and_clear();

            if stdout {
                let content = match format {
                    OutputFormat::Csv => render::to_csv(&fields)?,
                    OutputFormat::Json => render::to_json(&fields, JsonFormat::Pretty)?,
                };
                let stdout = io::stdout();
                let mut handle = stdout.lock();
                write!(handle, "{}", content)?;
                return Ok(());
            }

            let output_file = output_path(&output_dir, output_name.as_deref(), format);
            twbfields::export_records(&fields, format, &output_file)?;

            println!(
                "{} {} calculated fields written to {}",
                "✓".green().bold(),
                fields.len(),
                output_file.display()
            );
        }

        Commands::Resolve { input } => {
            let xml_path = twbfields::resolve(&input)?;
            println!("{}", xml_path.display());
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

fn extract_options(prefixes: Vec<String>, all: bool) -> ExtractOptions {
    if all {
        ExtractOptions::new()
    } else if prefixes.is_empty() {
        ExtractOptions::new().with_default_prefixes()
    } else {
        ExtractOptions::new().with_prefixes(prefixes)
    }
}

fn output_path(dir: &Path, name: Option<&str>, format: OutputFormat) -> PathBuf {
    match name {
        Some(name) => dir.join(name),
        None => dir.join(format!("calculated_fields.{}", format.extension())),
    }
}

fn print_version() {
    println!("{} {}", "twbfields".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Calculated field metadata export for Tableau workbooks");
    println!();
    println!("Supported formats: TWB, TWBX");
    println!("Default prefixes: {}", DEFAULT_PREFIXES.join(" "));
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
