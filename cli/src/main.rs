//! swrlimg CLI - SWRL rule diagrams for Widoco documentation

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use swrlimg::{
    process_directory, scale_rule, BatchReport, PageLayout, ProcessOptions, RuleId, ScaleOptions,
};

#[derive(Parser)]
#[command(name = "swrlimg")]
#[command(version)]
#[command(about = "Add SWRL rule diagrams to Widoco documentation", long_about = None)]
struct Cli {
    /// Widoco documentation directory
    #[arg(value_name = "DIR")]
    directory: Option<PathBuf>,

    #[command(flatten)]
    process: ProcessArgs,

    /// More log output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Args, Clone)]
struct ProcessArgs {
    /// Use the entity name (rdfs:label of the rule) instead of its position
    /// in the cross-reference page for image paths
    #[arg(long, env = "SWRLIMG_NAME")]
    name: bool,

    /// Max height of the diagrams, raise if they look too small
    #[arg(long, default_value = "100", env = "SWRLIMG_HEIGHT")]
    height: u32,

    /// Diagram file extension
    #[arg(long, default_value = "svg")]
    extension: String,

    /// Substring removed from entity names
    #[arg(long, default_value = "back_to_ToC")]
    boilerplate: String,

    /// Diagram directory (defaults to DIR/swrlrules)
    #[arg(long, value_name = "DIR")]
    asset_dir: Option<PathBuf>,

    /// Do not rewrite diagram sizes
    #[arg(long)]
    no_scale: bool,

    /// Do not install the stylesheet and script
    #[arg(long)]
    no_resources: bool,

    /// Report printed after processing
    #[arg(long, value_enum, default_value = "summary")]
    report: ReportFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a documentation directory
    Process {
        /// Widoco documentation directory
        #[arg(value_name = "DIR")]
        directory: PathBuf,

        #[command(flatten)]
        process: ProcessArgs,
    },

    /// Scale the diagram pairs of the given rules
    Scale {
        /// Diagram directory
        #[arg(value_name = "DIR")]
        asset_dir: PathBuf,

        /// Rule identifiers
        #[arg(value_name = "RULE", required = true)]
        rules: Vec<String>,

        /// Max height of the diagrams
        #[arg(long, default_value = "100")]
        height: u32,

        /// Diagram file extension
        #[arg(long, default_value = "svg")]
        extension: String,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    /// Coloured summary
    Summary,
    /// JSON document
    Json,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = match cli.command {
        Some(Commands::Process { directory, process }) => cmd_process(&directory, &process),
        Some(Commands::Scale {
            asset_dir,
            rules,
            height,
            extension,
        }) => cmd_scale(&asset_dir, &rules, height, &extension),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            if let Some(directory) = cli.directory {
                cmd_process(&directory, &cli.process)
            } else {
                println!("{}", "Usage: swrlimg <DIR> [OPTIONS]".yellow());
                println!("       swrlimg --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn build_options(directory: &Path, args: &ProcessArgs) -> ProcessOptions {
    let layout = PageLayout::new()
        .with_image_extension(args.extension.as_str())
        .with_boilerplate(args.boilerplate.as_str());

    let mut options = ProcessOptions::new(directory)
        .use_names(args.name)
        .with_layout(layout)
        .with_max_height(args.height)
        .with_asset_scaling(!args.no_scale)
        .with_resources(!args.no_resources);
    if let Some(dir) = &args.asset_dir {
        options = options.with_asset_dir(dir);
    }
    options
}

fn cmd_process(directory: &Path, args: &ProcessArgs) -> Result<(), Box<dyn std::error::Error>> {
    if !directory.is_dir() {
        return Err(format!("{} is not a directory", directory.display()).into());
    }

    let options = build_options(directory, args);
    let report = process_directory(&options)?;

    match args.report {
        ReportFormat::Json => println!("{}", report.to_json()?),
        ReportFormat::Summary => print_summary(&report),
    }
    Ok(())
}

fn print_summary(report: &BatchReport) {
    println!("{}", "SWRL diagrams".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!(
        "{}: {}",
        "Resources".bold(),
        report.resources_installed.len()
    );
    println!(
        "{}: {} injected, {} skipped",
        "Cross-reference pages".bold(),
        report.pages_injected.len(),
        report.pages_skipped.len()
    );
    println!("{}: {}", "Rules".bold(), report.rules.len());
    println!("{}: {}", "Pairs scaled".bold(), report.pairs_scaled);
    println!(
        "{}: {} updated, {} skipped",
        "Index pages".bold(),
        report.index_pages_updated.len(),
        report.index_pages_skipped.len()
    );
}

fn cmd_scale(
    asset_dir: &Path,
    rules: &[String],
    height: u32,
    extension: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = ScaleOptions::new().with_max_height(f64::from(height));
    for rule in rules {
        let scale = scale_rule(asset_dir, &RuleId::new(rule.as_str()), extension, &options)?;
        println!(
            "{} rule_{} (factor {:.3}{})",
            "Scaled".green(),
            rule,
            scale.factor,
            if scale.compensated { ", compensated" } else { "" }
        );
    }
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "swrlimg".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("SWRL rule diagrams for Widoco documentation");
    println!();
    println!("License: GPL-3.0");
}
