use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use panelcut_core::{OptimizationRequest, OptimizationResult, Optimizer};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "panelcut")]
#[command(about = "Sheet cutting optimizer - pack a cut list onto stock sheets", long_about = None)]
struct Cli {
    /// Show debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Optimize a cut list
    Optimize {
        /// Input file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for result (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Override the saw kerf
        #[arg(long)]
        cut_width: Option<f64>,

        /// Override the sheet edge margin
        #[arg(long)]
        margin: Option<f64>,

        /// Override how many upcoming panels the look-ahead samples
        #[arg(long)]
        lookahead: Option<usize>,

        /// Never rotate panels
        #[arg(long)]
        no_rotation: bool,
    },

    /// Print a per-sheet report of a saved result
    Report {
        /// Input result file (JSON)
        #[arg(short, long)]
        input: PathBuf,
    },
}

struct Overrides {
    cut_width: Option<f64>,
    margin: Option<f64>,
    lookahead: Option<usize>,
    no_rotation: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Optimize {
            input,
            output,
            cut_width,
            margin,
            lookahead,
            no_rotation,
        } => {
            let overrides = Overrides {
                cut_width,
                margin,
                lookahead,
                no_rotation,
            };
            optimize_command(input, output, overrides)?;
        }
        Commands::Report { input } => {
            report_command(input)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // stdout carries the JSON result, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_request(input: &Path) -> Result<OptimizationRequest> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let request: OptimizationRequest = match input.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
        _ => serde_json::from_str(&content)?,
    };

    tracing::debug!(path = %input.display(), panels = request.panels.len(), "loaded request");
    Ok(request)
}

fn optimize_command(input: PathBuf, output: Option<PathBuf>, overrides: Overrides) -> Result<()> {
    eprintln!("{}", "🔍 Loading cut list...".bright_blue());

    let mut request = load_request(&input)?;
    if let Some(cut_width) = overrides.cut_width {
        request.options.cut_width = cut_width;
    }
    if let Some(margin) = overrides.margin {
        request.options.margin = margin;
    }
    if let Some(lookahead) = overrides.lookahead {
        request.options.lookahead = lookahead;
    }
    if overrides.no_rotation {
        request.options.allow_rotation = false;
    }

    let pieces: u32 = request.panels.iter().map(|p| p.quantity).sum();
    eprintln!(
        "  {} panel types, {} pieces to cut",
        request.panels.len().to_string().bright_white().bold(),
        pieces.to_string().bright_white().bold()
    );
    eprintln!("  Stock sheet: {} x {}", request.sheet.width, request.sheet.height);
    eprintln!();

    eprintln!("{}", "🚀 Running optimization...".bright_blue());

    let optimizer = Optimizer::new(request)?;
    let result = optimizer.optimize();

    eprintln!();
    eprintln!("{}", "✅ Optimization complete!".bright_green().bold());
    eprintln!();

    print_summary(&result);

    let json = serde_json::to_string_pretty(&result)?;
    if let Some(output_path) = output {
        std::fs::write(&output_path, json)?;
        eprintln!(
            "💾 Saved result to {}",
            output_path.display().to_string().bright_white()
        );
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn report_command(input: PathBuf) -> Result<()> {
    let content = std::fs::read_to_string(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let result: OptimizationResult = serde_json::from_str(&content)?;

    print_summary(&result);

    for sheet in &result.sheets {
        println!(
            "{} ({} x {}): {} panels, {:.1}% used",
            sheet.id.bright_white().bold(),
            sheet.width,
            sheet.height,
            sheet.placed_panels.len(),
            sheet.utilization * 100.0
        );
        for panel in &sheet.placed_panels {
            let rotated = if panel.rotated { " (R)" } else { "" };
            println!(
                "    • {:<20} {:>8.1} x {:<8.1} at ({:.1}, {:.1}){}",
                panel.id, panel.width, panel.height, panel.x, panel.y, rotated
            );
        }
        if !sheet.free_rects.is_empty() {
            println!("    offcuts:");
            for rect in &sheet.free_rects {
                println!(
                    "      {:>8.1} x {:<8.1} at ({:.1}, {:.1})",
                    rect.width, rect.height, rect.x, rect.y
                );
            }
        }
    }

    Ok(())
}

fn print_summary(result: &OptimizationResult) {
    eprintln!("{}", "📊 Results:".bright_yellow().bold());
    eprintln!(
        "  Sheets required: {}",
        result.total_sheets.to_string().bright_white().bold()
    );
    eprintln!(
        "  Utilization: {}",
        format!("{:.1}%", result.total_utilization * 100.0).bright_white()
    );
    eprintln!(
        "  Total waste: {}",
        format!("{:.0} sq units", result.total_waste).bright_white()
    );

    if let Some(reusable_area) = result.reusable_remnant_area {
        eprintln!(
            "  Reusable offcuts: {}",
            format!("{:.0} sq units", reusable_area).bright_white()
        );
    }

    if let Some(actual_waste) = result.actual_waste_area {
        eprintln!(
            "  Actual waste (excluding reusable): {}",
            format!("{:.0} sq units", actual_waste).bright_green()
        );
    }

    if !result.unplaced_panels.is_empty() {
        eprintln!();
        eprintln!("  {}", "Panels that could not be placed:".bright_red());
        for panel in &result.unplaced_panels {
            eprintln!(
                "    • {} ({} x {})",
                panel.id.bright_red(),
                panel.width,
                panel.height
            );
        }
    }

    eprintln!("  Computed in {:.1} ms", result.optimization_time_ms);
    eprintln!();
}
