//! Newsletter Projection CLI
//!
//! Command-line interface for running subscriber growth projections

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use newsletter_projection::{
    inputs::load_scenarios,
    report::{self, ProjectionReport},
    InputParameters, Parameter, ProjectionResult, ScenarioRunner,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "newsletter_projection")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Project one parameter set month by month
    Project {
        #[command(flatten)]
        inputs: InputArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Project every scenario in a CSV file
    Batch {
        /// CSV file with a header row naming input fields
        #[arg(short, long)]
        scenarios: PathBuf,

        /// Print full JSON reports instead of summary lines
        #[arg(long)]
        json: bool,
    },

    /// Vary one input across several values
    Sweep {
        #[command(flatten)]
        inputs: InputArgs,

        /// Parameter to vary (e.g. personal_ad_spend, displayAdRPM)
        #[arg(short, long)]
        parameter: Parameter,

        /// Comma-separated values for the parameter
        #[arg(long, value_delimiter = ',', required = true)]
        values: Vec<f64>,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
    Json,
}

/// Starting parameters; defaults are the calculator's initial values
#[derive(Args)]
struct InputArgs {
    /// Cost to acquire one subscriber via ads ($)
    #[arg(long, default_value_t = 5.0)]
    ad_conversion_cost: f64,

    /// Current subscriber count
    #[arg(long, default_value_t = 500.0)]
    current_subscribers: f64,

    /// Current daily pageviews
    #[arg(long, default_value_t = 1000.0)]
    daily_pageviews: f64,

    /// Display ad revenue per 1000 pageviews ($)
    #[arg(long, default_value_t = 2.5)]
    display_ad_rpm: f64,

    /// Daily unsubscribe rate in percent (0.1 = 0.1%)
    #[arg(long, default_value_t = 0.1)]
    daily_unsubscribe_rate: f64,

    /// Monthly ad budget from outside earnings ($)
    #[arg(long, default_value_t = 1000.0)]
    personal_ad_spend: f64,

    /// Months to project (1-60)
    #[arg(short = 'm', long, default_value_t = 12)]
    projection_months: u32,
}

impl From<&InputArgs> for InputParameters {
    fn from(args: &InputArgs) -> Self {
        Self {
            ad_conversion_cost: args.ad_conversion_cost,
            current_subscribers: args.current_subscribers,
            daily_pageviews: args.daily_pageviews,
            display_ad_rpm: args.display_ad_rpm,
            daily_unsubscribe_rate: args.daily_unsubscribe_rate,
            personal_ad_spend: args.personal_ad_spend,
            projection_months: args.projection_months,
        }
    }
}

fn open_output(path: Option<&PathBuf>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Unable to create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    })
}

fn write_table(result: &ProjectionResult, out: &mut dyn Write) -> io::Result<()> {
    writeln!(
        out,
        "{:>7} {:>11} {:>8} {:>12} {:>10} {:>12} {:>12} {:>10} {:>12} {:>12}",
        "Month",
        "Subscribers",
        "Unsubs",
        "Replenish",
        "Pageviews",
        "DisplayEarn",
        "NetAvail",
        "Personal",
        "Reinvested",
        "TotalSpend"
    )?;
    writeln!(out, "{}", "-".repeat(115))?;

    for row in &result.months {
        let month = if row.month == 0 {
            "Current".to_string()
        } else {
            row.month.to_string()
        };
        writeln!(
            out,
            "{:>7} {:>11} {:>8} {:>12.2} {:>10} {:>12.2} {:>12.2} {:>10.2} {:>12.2} {:>12.2}",
            month,
            row.subscribers,
            row.monthly_unsubscribes,
            row.replenishment_cost,
            row.daily_pageviews,
            row.monthly_display_earnings,
            row.net_available_earnings,
            row.personal_ad_spend,
            row.reinvested_earnings,
            row.total_ad_spend,
        )?;
    }

    let summary = result.summary();
    writeln!(out)?;
    writeln!(out, "Summary ({} months):", summary.total_months)?;
    let metrics = [
        ("Subscribers", &summary.subscribers),
        ("Monthly churn", &summary.monthly_unsubscribes),
        ("Display earnings", &summary.monthly_display_earnings),
        ("Net available", &summary.net_available_earnings),
        ("Total ad spend", &summary.total_ad_spend),
        ("Daily pageviews", &summary.daily_pageviews),
    ];
    for (label, metric) in metrics {
        let growth = match metric.growth_pct {
            Some(pct) => format!("{:+.1}%", pct),
            None => "N/A".to_string(),
        };
        writeln!(
            out,
            "  {:<17} {:>12.2} -> {:>12.2}  ({})",
            label, metric.current, metric.projected, growth
        )?;
    }
    writeln!(out, "  Final replenishment cost: {:.2}", summary.final_replenishment_cost)?;
    writeln!(out, "  Total reinvested:         {:.2}", summary.total_reinvested_earnings)?;
    Ok(())
}

fn summary_line(label: &str, result: &ProjectionResult) -> String {
    let summary = result.summary();
    format!(
        "{:<20} subscribers {:>8} -> {:>8}  total spend {:>10.2} -> {:>10.2}  reinvested {:>12.2}",
        label,
        summary.subscribers.current,
        summary.subscribers.projected,
        summary.total_ad_spend.current,
        summary.total_ad_spend.projected,
        summary.total_reinvested_earnings,
    )
}

fn run_project(inputs: &InputArgs, format: OutputFormat, output: Option<&PathBuf>) -> Result<()> {
    let params = InputParameters::from(inputs);
    let result = ScenarioRunner::new(params).run().context("Projection failed")?;

    let mut out = open_output(output)?;
    match format {
        OutputFormat::Table => write_table(&result, &mut out)?,
        OutputFormat::Csv => report::write_csv(&result.months, &mut out)?,
        OutputFormat::Json => {
            report::write_json(&result, &mut out)?;
            writeln!(out)?;
        }
    }
    out.flush()?;

    if let Some(path) = output {
        log::info!("Results written to {}", path.display());
    }
    Ok(())
}

fn run_batch(path: &PathBuf, json: bool) -> Result<()> {
    let scenarios = load_scenarios(path)
        .with_context(|| format!("Failed to load scenarios from {}", path.display()))?;

    let runner = ScenarioRunner::default();
    let outcomes = runner.run_scenarios(&scenarios);

    let mut failures = 0;
    let mut reports = Vec::new();
    for outcome in &outcomes {
        match &outcome.result {
            Ok(result) if json => reports.push(ProjectionReport::new(result)),
            Ok(result) => println!("{}", summary_line(&outcome.name, result)),
            Err(e) => {
                failures += 1;
                log::warn!("Scenario '{}' skipped: {}", outcome.name, e);
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }
    if failures > 0 {
        eprintln!("{} of {} scenarios failed validation", failures, outcomes.len());
    }
    Ok(())
}

fn run_sweep(inputs: &InputArgs, parameter: Parameter, values: &[f64]) -> Result<()> {
    let runner = ScenarioRunner::new(InputParameters::from(inputs));

    for (value, result) in runner.sweep(parameter, values) {
        let label = format!("{}={}", parameter, value);
        match result {
            Ok(result) => println!("{}", summary_line(&label, &result)),
            Err(e) => println!("{:<20} error: {}", label, e),
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match &cli.command {
        Commands::Project {
            inputs,
            format,
            output,
        } => run_project(inputs, *format, output.as_ref()),
        Commands::Batch { scenarios, json } => run_batch(scenarios, *json),
        Commands::Sweep {
            inputs,
            parameter,
            values,
        } => run_sweep(inputs, *parameter, values),
    }
}
