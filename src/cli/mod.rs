// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// clap and hands every command to a Layer 2 use case; the only
// work done here is printing results.

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{CleanArgs, Commands, DescribeArgs, OutlierArgs, PredictArgs};

use crate::domain::vocabulary::{agent_name, CategoryMap};

#[derive(Parser, Debug)]
#[command(
    name = "listing-price",
    version = "0.1.0",
    about = "Clean real-estate listings and estimate sale prices."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Clean(args)          => run_clean(args),
            Commands::FilterOutliers(args) => run_filter_outliers(args),
            Commands::Predict(args)        => run_predict(args),
            Commands::Describe(args)       => run_describe(args),
            Commands::Vocabulary           => run_vocabulary(),
        }
    }
}

fn run_clean(args: CleanArgs) -> Result<()> {
    use crate::application::clean_use_case::CleanUseCase;

    let output = args.output.clone();
    let report = CleanUseCase::new(args.into()).execute()?;

    println!(
        "Kept {} of {} records ({} malformed lines skipped) → {}",
        report.stats.kept, report.stats.total_seen, report.malformed, output
    );
    for (reason, count) in &report.stats.removed {
        println!("  removed {count:>6}  {reason}");
    }
    if report.stats.rooms_repaired > 0 {
        println!("  repaired {} empty rooms values", report.stats.rooms_repaired);
    }
    Ok(())
}

fn run_filter_outliers(args: OutlierArgs) -> Result<()> {
    use crate::application::outlier_use_case::OutlierUseCase;

    let input = args.input.clone();
    let summary = OutlierUseCase::new(args.into()).execute()?;
    if summary.rewritten {
        println!("Removed {} of {} lines from {}", summary.removed, summary.total, input);
    } else {
        println!("No outliers in {input}; file left unchanged");
    }
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    use crate::application::predict_use_case::PredictUseCase;

    let use_case = PredictUseCase::new(&args.model_dir)?;
    let price = use_case.predict(&(&args).into())?;
    println!("{} NOK", format_price(price));
    Ok(())
}

fn run_describe(args: DescribeArgs) -> Result<()> {
    use crate::application::describe_use_case::DescribeUseCase;
    use crate::data::loader::JsonlLoader;

    let use_case = DescribeUseCase::new(JsonlLoader::new(&args.input), args.limit);

    if args.list || args.x.is_none() {
        for (name, info) in use_case.features()? {
            let kind = if info.numeric { "numeric" } else { "text" };
            println!("{name:<24} {kind:<8} {}", serde_json::to_string(&info.sample)?);
        }
    }

    if let (Some(x), Some(y)) = (&args.x, &args.y) {
        let s = use_case.pair(x, y)?;
        println!("{x} vs {y}: n = {}", s.n);
        if s.n > 0 {
            println!("  mean {x} = {:.3}", s.mean_x);
            println!("  mean {y} = {:.3}", s.mean_y);
        }
        match s.correlation {
            Some(r) => println!("  pearson r = {r:.4}"),
            None    => println!("  pearson r undefined"),
        }
    }
    Ok(())
}

fn run_vocabulary() -> Result<()> {
    let months = CategoryMap::months();
    println!("Months (slot order):");
    for (i, m) in months.categories().iter().enumerate() {
        println!("  {i:>2}  {m}");
    }

    let agents = CategoryMap::agents();
    println!("Agents (slot order):");
    for (i, id) in agents.categories().iter().enumerate() {
        println!("  {i:>2}  {id}  {}", agent_name(id).unwrap_or("-"));
    }
    Ok(())
}

/// `1234567.891` → `"1,234,567.89"`
pub fn format_price(price: f64) -> String {
    let fixed = format!("{:.2}", price.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if price < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{frac}")
}
