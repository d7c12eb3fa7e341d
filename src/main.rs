//! PromptOptimizer CLI - rewrite prompts to cut on-device inference cost

use anyhow::Result;
use clap::{Parser, Subcommand};
use prompt_optimizer::{
    base_rule_groups, generate_report, generate_report_with, BatchSummary, Config, LearnedRules,
    OptimizationRecord, PromptOptimizer, ReportOptions,
};
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "prompt-optimizer")]
#[command(about = "Rewrite prompts with learned rules to minimize LLM latency and energy")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Optimize a single prompt or a file of prompts
    Optimize {
        /// Prompt text to optimize
        #[arg(short, long)]
        prompt: Option<String>,

        /// File containing prompts, one per line
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Learned-rules JSON produced by the analysis pipeline
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Apply aggressive keyword removal
        #[arg(short, long)]
        aggressive: bool,

        /// Write batch results as JSON to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compare rule-group subsets against a file of prompts
    Benchmark {
        /// File containing prompts, one per line
        #[arg(short, long)]
        file: PathBuf,

        /// Learned-rules JSON to include
        #[arg(short, long)]
        rules: Option<PathBuf>,
    },

    /// Interactive mode for exploring optimizations
    Interactive,

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Initialize configuration file with defaults
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },

    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Optimize {
            prompt,
            file,
            rules,
            aggressive,
            output,
        } => {
            run_optimize(prompt, file, rules, aggressive, output).await?;
        }
        Commands::Benchmark { file, rules } => {
            run_benchmark(file, rules).await?;
        }
        Commands::Interactive => {
            run_interactive()?;
        }
        Commands::Config(cmd) => {
            run_config_command(cmd)?;
        }
    }

    Ok(())
}

async fn run_optimize(
    prompt: Option<String>,
    file: Option<PathBuf>,
    rules: Option<PathBuf>,
    aggressive: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = Config::load()?;
    let rules_path = rules.or(config.rules.path);
    let aggressive = aggressive || config.optimization.aggressive;

    let optimizer = PromptOptimizer::new(rules_path.as_deref());

    if let Some(prompt) = prompt {
        let (optimized, details) = optimizer.optimize(&prompt, aggressive);

        println!("\nOriginal: {prompt}");
        println!("Optimized: {optimized}");
        println!("\nDetails: {}", serde_json::to_string_pretty(&details)?);

        return Ok(());
    }

    if let Some(path) = file {
        info!("Optimizing prompts from {}", path.display());

        let content = tokio::fs::read_to_string(&path).await?;
        // Blank lines are separators, not prompts.
        let prompts: Vec<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        let records = optimizer.batch_optimize(&prompts, aggressive);

        let opts = ReportOptions {
            sample_count: config.report.sample_count,
            sample_prefix_chars: config.report.sample_prefix_chars,
        };
        println!("{}", generate_report_with(&records, &opts));

        if let Some(out_path) = output {
            let json = serde_json::to_string_pretty(&records)?;
            tokio::fs::write(&out_path, json).await?;
            println!("\nResults saved to {}", out_path.display());
        }

        return Ok(());
    }

    println!("Provide --prompt or --file to optimize something.");
    Ok(())
}

async fn run_benchmark(file: PathBuf, rules: Option<PathBuf>) -> Result<()> {
    info!("Running benchmark on {}", file.display());

    let content = tokio::fs::read_to_string(&file).await?;
    let prompts: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    let learned = rules
        .as_deref()
        .map(LearnedRules::load)
        .unwrap_or_default();

    // Groups compose sequentially, so the meaningful subsets are prefixes.
    let subsets = [
        ("None", 0),
        ("Politeness", 1),
        ("+ Instructions", 2),
        ("+ Verbose modifiers", 3),
        ("All groups", 4),
    ];

    println!("=== Benchmark Results ===\n");
    println!(
        "{:<22} {:>14} {:>12}",
        "Rule groups", "Avg chars cut", "Avg latency"
    );
    println!("{}", "-".repeat(50));

    for (name, count) in subsets {
        let mut groups = base_rule_groups();
        groups.truncate(count);

        let optimizer = PromptOptimizer::with_rules(groups, learned.clone());
        let records = optimizer.batch_optimize(&prompts, false);
        let summary = BatchSummary::from_records(&records);

        println!(
            "{:<22} {:>14.1} {:>11.1}%",
            name,
            summary.avg_length_reduction,
            summary.avg_latency_reduction * 100.0
        );
    }

    Ok(())
}

fn run_interactive() -> Result<()> {
    use std::io::{self, BufRead, Write};

    println!("PromptOptimizer Interactive Mode");
    println!("================================");
    println!("Commands:");
    println!("  /optimize <text>  - Optimize the given prompt");
    println!("  /aggressive       - Toggle aggressive mode");
    println!("  /rules <file>     - Load a learned-rules file");
    println!("  /report           - Show a report for this session");
    println!("  /clear            - Clear session records");
    println!("  /quit             - Exit");
    println!();

    let stdin = io::stdin();
    let mut optimizer = PromptOptimizer::new(None);
    let mut aggressive = false;
    let mut records: Vec<OptimizationRecord> = Vec::new();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        if line.starts_with("/quit") {
            break;
        }

        if line.starts_with("/clear") {
            records.clear();
            println!("Session records cleared.");
            continue;
        }

        if line.starts_with("/aggressive") {
            aggressive = !aggressive;
            println!("Aggressive mode: {}", if aggressive { "on" } else { "off" });
            continue;
        }

        if line.starts_with("/report") {
            println!("{}", generate_report(&records));
            continue;
        }

        if let Some(path) = line.strip_prefix("/rules ") {
            let path = path.trim();
            let rules = LearnedRules::load(Path::new(path));
            if rules.is_empty() {
                println!("No usable rules in {path}, keeping base rules only.");
            } else {
                println!("Loaded rules from {path}.");
            }
            optimizer = PromptOptimizer::with_rules(base_rule_groups(), rules);
            continue;
        }

        if let Some(text) = line.strip_prefix("/optimize ") {
            let (optimized, details) = optimizer.optimize(text, aggressive);

            println!("\nOptimized: {optimized}");
            println!(
                "Length: {} -> {} (quality {}, est. latency -{:.1}%)",
                details.original_length,
                details.optimized_length,
                details.quality_impact,
                details.estimated_latency_reduction * 100.0
            );

            records.push(OptimizationRecord {
                original: text.to_string(),
                optimized,
                details,
            });
            continue;
        }

        println!("Unknown command. Type /quit to exit.");
    }

    Ok(())
}

fn run_config_command(cmd: ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::Init { force } => {
            let path = Config::default_path();

            if path.exists() && !force {
                println!("Configuration file already exists at: {}", path.display());
                println!("Use --force to overwrite");
                return Ok(());
            }

            let config = Config::default();
            config.save()?;

            println!("Configuration file created at: {}", path.display());
        }
        ConfigCommands::Show => {
            let config = Config::load()?;
            println!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigCommands::Path => {
            let path = Config::default_path();
            println!("{}", path.display());

            if path.exists() {
                println!("(file exists)");
            } else {
                println!("(file does not exist - run 'config init' to create)");
            }
        }
    }

    Ok(())
}
