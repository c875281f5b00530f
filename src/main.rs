//! @ai:module:intent CLI for question-paper analysis interpretation
//! @ai:module:layer presentation

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use paper_insight::{
    config::{FallbackProfile, InsightConfig},
    extractor::QuestionExtractor,
    interpreter::ResultInterpreterTrait,
    loader::{PayloadLoader, PayloadLoaderTrait},
    metrics::{difficulty_distribution, MetricRecord, MetricsAggregator, MetricsAggregatorTrait},
    report::{AnalysisReport, ReportGenerator, ViewMode},
};
use std::path::PathBuf;

const DEFAULT_CONFIG_FILE: &str = "paper-insight.toml";

#[derive(Parser)]
#[command(name = "paper-insight")]
#[command(about = "Interpret AI question-paper analyses and summarize per-question metrics")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interpret one payload and write reports
    Analyze {
        /// Path to a JSON response body or raw analysis text
        #[arg(short, long)]
        payload: PathBuf,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Fallback score profile (current, legacy, custom)
        #[arg(long)]
        profile: Option<String>,

        /// Export view (standard, metrics)
        #[arg(long, default_value = "standard")]
        view: String,

        /// Output directory for reports
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Turn raw multi-question analysis text into a structured payload
    Extract {
        /// Path to the analysis text
        #[arg(short, long)]
        text: PathBuf,

        /// Model name recorded on each question
        #[arg(short, long)]
        model: Option<String>,

        /// Output file for the payload JSON (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Summarize every payload file in a directory
    Batch {
        /// Directory containing .json and .txt payloads
        #[arg(short, long)]
        dir: PathBuf,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Initialize default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("paper_insight=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            payload,
            config,
            profile,
            view,
            output,
        } => analyze(AnalyzeArgs {
            payload,
            config,
            profile,
            view,
            output,
        }),
        Commands::Extract {
            text,
            model,
            output,
        } => extract(text, model, output),
        Commands::Batch { dir, config } => batch(dir, config),
        Commands::Init { output } => init_config(output),
    }
}

struct AnalyzeArgs {
    payload: PathBuf,
    config: Option<PathBuf>,
    profile: Option<String>,
    view: String,
    output: Option<PathBuf>,
}

/// @ai:intent Interpret a payload, print the summary and write reports
/// @ai:effects fs:read, fs:write
fn analyze(args: AnalyzeArgs) -> Result<()> {
    let mut config = load_or_default_config(args.config)?;

    if let Some(name) = args.profile {
        config.fallback.profile = match FallbackProfile::from_name(&name) {
            Some(profile) => profile,
            None => bail!("Unknown fallback profile '{}'", name),
        };
    }

    let view = match ViewMode::from_name(&args.view) {
        Some(view) => view,
        None => bail!("Unknown view '{}', expected standard or metrics", args.view),
    };

    let payload = PayloadLoader::new()
        .load_file(&args.payload)
        .with_context(|| format!("Failed to load payload: {}", args.payload.display()))?;

    let aggregator = MetricsAggregator::from_config(&config);
    let report = AnalysisReport::build(
        &payload,
        &aggregator,
        view,
        chrono::Utc::now().to_rfc3339(),
    );

    let timestamp = chrono::Utc::now().format("%Y-%m-%d_%H-%M-%S");
    let output_dir = args
        .output
        .unwrap_or_else(|| config.output.results_dir.clone())
        .join(timestamp.to_string());

    ReportGenerator::new()
        .generate_all(&report, &output_dir)
        .context("Failed to write reports")?;

    print_summary(&report);
    println!();
    println!("Reports written to {}", output_dir.display());
    Ok(())
}

/// @ai:intent Convert analysis text into structured payload JSON
/// @ai:effects fs:read, fs:write
fn extract(text_path: PathBuf, model: Option<String>, output: Option<PathBuf>) -> Result<()> {
    let text = std::fs::read_to_string(&text_path)
        .with_context(|| format!("Failed to read analysis text: {}", text_path.display()))?;

    let payload = QuestionExtractor::new().into_payload(&text, model.as_deref());
    tracing::info!(
        "Extracted {} question(s) from {}",
        payload.all_questions_metrics.len(),
        text_path.display()
    );

    let json = serde_json::to_string_pretty(&payload)?;
    match output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write payload: {}", path.display()))?;
            println!("Payload saved to {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// @ai:intent Print one summary line per payload file plus totals
/// @ai:effects fs:read
fn batch(dir: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_or_default_config(config_path)?;
    let aggregator = MetricsAggregator::from_config(&config);
    let interpreter = aggregator.interpreter();

    let payloads = PayloadLoader::new().load_dir(&dir);
    if payloads.is_empty() {
        tracing::warn!("No payload files found in {}", dir.display());
        return Ok(());
    }

    println!(
        "{:<40} {:>10} {:>8} {:>10} {:>10}",
        "File", "Difficulty", "Score", "Questions", "Avg Diff"
    );
    println!("{}", "-".repeat(82));

    let mut all_records: Vec<MetricRecord> = Vec::new();

    for loaded in &payloads {
        let interpretation = interpreter.interpret(&loaded.payload);
        let aggregation = aggregator.aggregate(&loaded.payload);

        let name = loaded
            .path
            .strip_prefix(&dir)
            .unwrap_or(&loaded.path)
            .display()
            .to_string();
        let score = interpretation
            .score
            .map(|s| format!("{:.1}", s))
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:<40} {:>10} {:>8} {:>10} {:>10.1}",
            name,
            interpretation.difficulty.as_str(),
            score,
            aggregation.summary.total_questions,
            aggregation.summary.avg_difficulty
        );

        all_records.extend(aggregation.records);
    }

    let summary = aggregator.summarize(&all_records);
    let distribution = difficulty_distribution(&all_records);

    println!();
    println!("Files:              {}", payloads.len());
    println!("Questions:          {}", summary.total_questions);
    println!("Avg difficulty:     {:.1}", summary.avg_difficulty);
    println!("Avg alignment:      {:.1}", summary.avg_alignment);
    println!("Estimated time:     {}", summary.total_estimated_minutes);
    for segment in &distribution.segments {
        println!(
            "{:<20}{} ({:.1}%)",
            format!("{}:", segment.bucket),
            segment.count,
            segment.percentage
        );
    }

    Ok(())
}

/// @ai:intent Write default configuration
/// @ai:effects fs:write
fn init_config(output: PathBuf) -> Result<()> {
    let config = InsightConfig::default();
    config.save(&output)?;
    println!("Configuration saved to {}", output.display());
    Ok(())
}

/// @ai:intent Load configuration or use defaults
/// @ai:effects fs:read
fn load_or_default_config(path: Option<PathBuf>) -> Result<InsightConfig> {
    match path {
        Some(p) => Ok(InsightConfig::load(&p)?),
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);

            if default_path.exists() {
                Ok(InsightConfig::load(&default_path)?)
            } else {
                Ok(InsightConfig::default())
            }
        }
    }
}

/// @ai:intent Print analysis summary to stdout
/// @ai:effects io
fn print_summary(report: &AnalysisReport) {
    let summary = &report.aggregation.summary;

    println!();
    println!("Paper Analysis");
    println!("==============");
    println!();
    println!("{}", report.interpretation.share_text());
    println!();
    println!("{:<22} {:>10.1}", "Average difficulty:", summary.avg_difficulty);
    println!("{:<22} {:>10.1}", "Average alignment:", summary.avg_alignment);
    println!("{:<22} {:>10.1}", "Average complexity:", summary.avg_complexity);
    println!("{:<22} {:>10}", "Total questions:", summary.total_questions);
    println!("{:<22} {:>10}", "Cognitive level:", summary.cognitive_level);
    println!(
        "{:<22} {:>10}",
        "Estimated time:",
        summary.total_estimated_minutes.to_string()
    );

    if !report.aggregation.distribution.segments.is_empty() {
        println!();
        for segment in &report.aggregation.distribution.segments {
            println!(
                "{:<22} {:>4} ({:.1}%)",
                format!("{}:", segment.bucket),
                segment.count,
                segment.percentage
            );
        }
    }
}
