use clap::{Parser, Subcommand};
use serde_json::json;
use std::process::ExitCode;
use tracing::{info, warn};

use sector_lens::config::{FetchStrategy, ScreenerLayout, SectorLayout, Settings};
use sector_lens::engine::{MultiplesService, ScrapeError};
use sector_lens::ops::telemetry::{init_tracing_pretty, init_tracing_with_level};
use sector_lens::refinery::MetricName;
use sector_lens::report;

#[derive(Parser, Debug)]
#[command(version, about = "Industry and company valuation multiples from Finviz", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Fetch backend
    #[arg(long, value_enum, global = true)]
    strategy: Option<FetchStrategy>,

    /// Maximum screener pages per industry
    #[arg(long, global = true)]
    max_pages: Option<u32>,

    /// Pause between page fetches, in milliseconds
    #[arg(long, global = true)]
    delay_ms: Option<u64>,

    #[arg(long, value_enum, global = true)]
    sector_layout: Option<SectorLayout>,

    #[arg(long, value_enum, global = true)]
    screener_layout: Option<ScreenerLayout>,

    /// Print results as JSON instead of text tables
    #[arg(long, global = true)]
    json: bool,

    /// Log filter directive, overridden by RUST_LOG
    #[arg(long, global = true, default_value = sector_lens::ops::telemetry::DEFAULT_FILTER)]
    log_level: String,

    /// Human-readable logs instead of JSON lines
    #[arg(long, global = true)]
    pretty_logs: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Industry overview multiples, optionally compared on one metric.
    Sectors {
        /// Industries to compare, by display name
        #[arg(long, num_args = 1..)]
        compare: Vec<String>,

        #[arg(long, value_enum, default_value = "pe")]
        metric: MetricName,
    },

    /// Companies of one or more industries.
    Companies {
        #[arg(required = true)]
        industries: Vec<String>,

        /// Rank the largest companies that report this metric
        #[arg(long, value_enum, default_value = "pe")]
        metric: MetricName,

        #[arg(long, default_value_t = report::TOP_COMPANIES)]
        top: usize,

        /// Show every company instead of the top ones
        #[arg(long)]
        all: bool,
    },

    /// Describe the available metrics.
    Metrics,
}

impl Cli {
    fn settings(&self) -> Settings {
        let mut settings = Settings::from_env();
        if let Some(strategy) = self.strategy {
            settings = settings.with_strategy(strategy);
        }
        if let Some(max_pages) = self.max_pages {
            settings = settings.with_max_pages(max_pages);
        }
        if let Some(delay_ms) = self.delay_ms {
            settings = settings.with_page_delay_ms(delay_ms);
        }
        if let Some(layout) = self.sector_layout {
            settings = settings.with_sector_layout(layout);
        }
        if let Some(layout) = self.screener_layout {
            settings = settings.with_screener_layout(layout);
        }
        settings
    }
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => warn!("Could not serialize output: {}", e),
    }
}

fn report_error(what: &str, err: &ScrapeError, json: bool) {
    warn!("{} failed ({:?}): {}", what, err.kind(), err.reason());
    if json {
        print_json(&json!({ "target": what, "error": err }));
    } else {
        eprintln!("{}: {}", what, err);
    }
}

async fn run_sectors(service: &MultiplesService, compare: &[String], metric: MetricName, json: bool) -> bool {
    let sectors = match service.sector_summary().await {
        Ok(sectors) => sectors,
        Err(e) => {
            report_error("sector summary", &e, json);
            return false;
        }
    };

    if compare.is_empty() {
        if json {
            print_json(&json!({ "sectors": sectors }));
        } else {
            let all: Vec<_> = sectors.iter().collect();
            print!("{}", report::sector_table(&all));
        }
        return true;
    }

    let compared = report::compare_sectors(&sectors, compare, metric);
    if compared.len() < compare.len() {
        warn!("{} of {} requested industries not found", compare.len() - compared.len(), compare.len());
    }
    if json {
        print_json(&json!({ "metric": metric, "sectors": compared }));
        return true;
    }

    if report::all_missing(&compared, metric) {
        println!("No {} data for the selected industries", metric.label());
        return true;
    }
    print!("{}", report::sector_table(&compared));
    println!();
    let bars: Vec<(String, Option<f64>)> = compared
        .iter()
        .map(|s| (s.name.clone(), s.metric(metric).and_then(|m| m.value)))
        .collect();
    println!("{} ({})", metric.label(), metric.description());
    print!("{}", report::render_bars(&bars));
    true
}

async fn run_companies(
    service: &MultiplesService,
    industries: &[String],
    metric: MetricName,
    top: usize,
    all: bool,
    json: bool,
) -> bool {
    let mut any_ok = false;
    for industry in industries {
        let companies = match service.companies(industry).await {
            Ok(companies) => companies,
            Err(e) => {
                report_error(industry, &e, json);
                continue;
            }
        };
        any_ok = true;

        let shown: Vec<_> = if all {
            companies.iter().collect()
        } else {
            report::top_companies(&companies, metric, top)
        };

        if json {
            print_json(&json!({ "industry": industry, "metric": metric, "companies": shown }));
            continue;
        }

        println!("{} ({} companies)", industry, companies.len());
        if shown.is_empty() {
            println!("No company reports {}", metric.label());
        } else {
            print!("{}", report::company_table(&shown));
            println!();
            println!("{} ({})", metric.label(), metric.description());
            print!("{}", report::company_bars(&shown, metric));
        }
        println!();
    }
    any_ok
}

fn run_metrics(json: bool) {
    let catalog: Vec<_> = <MetricName as clap::ValueEnum>::value_variants()
        .iter()
        .map(|m| (m.label(), m.description()))
        .collect();

    if json {
        let entries: Vec<_> = catalog
            .iter()
            .map(|(label, description)| json!({ "label": label, "description": description }))
            .collect();
        print_json(&json!(entries));
        return;
    }

    let rows: Vec<Vec<String>> = catalog
        .iter()
        .map(|(label, description)| vec![label.to_string(), description.to_string()])
        .collect();
    print!("{}", report::render_table(&["Metric", "Meaning"], &rows));
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    if cli.pretty_logs {
        init_tracing_pretty(&cli.log_level);
    } else {
        init_tracing_with_level(&cli.log_level);
    }

    let settings = cli.settings();
    info!(
        "Sector-Lens starting (strategy {:?}, max {} pages)",
        settings.strategy, settings.max_pages
    );
    let service = MultiplesService::new(settings);

    let ok = match &cli.command {
        Commands::Sectors { compare, metric } => run_sectors(&service, compare, *metric, cli.json).await,
        Commands::Companies {
            industries,
            metric,
            top,
            all,
        } => run_companies(&service, industries, *metric, *top, *all, cli.json).await,
        Commands::Metrics => {
            run_metrics(cli.json);
            true
        }
    };

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
