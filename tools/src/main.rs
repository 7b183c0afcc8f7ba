//! roi-runner: headless front end for the ROI calculator core.
//!
//! Usage:
//!   roi-runner --db usage.db --data-dir ./data
//!   roi-runner --db usage.db --ipc-mode

use anyhow::Result;
use roi_core::{
    assess_market,
    clock::SystemClock,
    compute_roi,
    config::AppConfig,
    metrics,
    report::UsageSummary,
    store::UsageStore,
    usage::{CalculationDraft, CalculationLedger, ExportDraft, ExportLedger},
    MarketQuery, RoiInput, RoiRequest,
};
use roi_sdk::{CalculationRequest, CalculatorClient};
use serde_json::{json, Value};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    ComputeRoi {
        #[serde(flatten)]
        request: RoiRequest,
    },
    AssessMarket {
        #[serde(flatten)]
        query: MarketQuery,
    },
    #[serde(rename_all = "camelCase")]
    Npv {
        initial_investment: f64,
        discount_rate:      f64,
        cash_flows:         Vec<f64>,
    },
    #[serde(rename_all = "camelCase")]
    Irr {
        initial_investment: f64,
        cash_flows:         Vec<f64>,
    },
    #[serde(rename_all = "camelCase")]
    Cagr {
        beginning_value: f64,
        ending_value:    f64,
        years:           f64,
    },
    #[serde(rename_all = "camelCase")]
    Payback {
        initial_investment: f64,
        cash_flows:         Vec<f64>,
    },
    RecordCalculation {
        #[serde(flatten)]
        draft: CalculationDraft,
    },
    RecordExport {
        #[serde(flatten)]
        draft: ExportDraft,
    },
    Stats,
    Clear,
    RemoteRoi {
        #[serde(flatten)]
        request: CalculationRequest,
    },
    Health,
    Quit,
}

struct Runner<'a> {
    calculations: CalculationLedger<'a>,
    exports:      ExportLedger<'a>,
    client:       Option<CalculatorClient>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let data_dir = string_arg(&args, "--data-dir").unwrap_or("./data");

    let config = load_config(&args)?;

    if !ipc_mode {
        println!("InvestWise ROI: roi-runner");
        println!("  db:        {}", config.storage.db_path);
        println!("  data_dir:  {data_dir}");
        println!("  api:       {}", config.api.base_url);
        println!();
    }

    let store = UsageStore::open_migrated(&config.storage.db_path)?;
    let clock = SystemClock;

    let client = match CalculatorClient::from_config(&config.api) {
        Ok(c) => Some(c),
        Err(e) => {
            log::warn!("sdk: client unavailable: {e}");
            None
        }
    };

    let runner = Runner {
        calculations: CalculationLedger::from_config(&store, &clock, &config.storage),
        exports:      ExportLedger::from_config(&store, &clock, &config.storage),
        client,
    };

    if ipc_mode {
        run_ipc_loop(&runner)?;
    } else {
        print_summary(&runner)?;
    }

    Ok(())
}

/// Config from `--data-dir`, with `--db` taking precedence over the
/// configured database path. A missing or invalid data dir is fatal.
fn load_config(args: &[String]) -> Result<AppConfig> {
    let data_dir = string_arg(args, "--data-dir").unwrap_or("./data");
    let mut config = AppConfig::load(data_dir)?;
    if let Some(db) = string_arg(args, "--db") {
        config.storage.db_path = db.to_string();
    }
    Ok(config)
}

fn run_ipc_loop(runner: &Runner<'_>) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                writeln!(stdout, "{}", json!({ "error": e.to_string() }))?;
                stdout.flush()?;
                continue;
            }
        };

        if matches!(cmd, IpcCommand::Quit) {
            break;
        }

        let reply = match handle_command(runner, cmd) {
            Ok(v) => v,
            Err(e) => json!({ "error": e.to_string() }),
        };
        writeln!(stdout, "{reply}")?;
        stdout.flush()?;
    }
    Ok(())
}

fn handle_command(runner: &Runner<'_>, cmd: IpcCommand) -> Result<Value> {
    let reply = match cmd {
        IpcCommand::ComputeRoi { request } => {
            let input = RoiInput::try_from(request)?;
            serde_json::to_value(compute_roi(&input)?)?
        }
        IpcCommand::AssessMarket { query } => serde_json::to_value(assess_market(&query)?)?,
        IpcCommand::Npv { initial_investment, discount_rate, cash_flows } => json!({
            "npv": metrics::net_present_value(initial_investment, discount_rate, &cash_flows)?
        }),
        IpcCommand::Irr { initial_investment, cash_flows } => json!({
            "irr": metrics::internal_rate_of_return(initial_investment, &cash_flows)?
        }),
        IpcCommand::Cagr { beginning_value, ending_value, years } => json!({
            "cagr": metrics::compound_annual_growth_rate(beginning_value, ending_value, years)?
        }),
        IpcCommand::Payback { initial_investment, cash_flows } => {
            serde_json::to_value(metrics::payback_period(initial_investment, &cash_flows)?)?
        }
        IpcCommand::RecordCalculation { draft } => {
            serde_json::to_value(runner.calculations.record(draft))?
        }
        IpcCommand::RecordExport { draft } => serde_json::to_value(runner.exports.record(draft))?,
        IpcCommand::Stats => {
            serde_json::to_value(UsageSummary::collect(&runner.calculations, &runner.exports))?
        }
        IpcCommand::Clear => {
            runner.calculations.clear();
            runner.exports.clear();
            json!({ "cleared": true })
        }
        IpcCommand::RemoteRoi { request } => match &runner.client {
            Some(client) => serde_json::to_value(client.calculate_roi(&request))?,
            None => json!({ "error": "API client is not configured" }),
        },
        IpcCommand::Health => match &runner.client {
            Some(client) => serde_json::to_value(client.health_check())?,
            None => json!({ "error": "API client is not configured" }),
        },
        IpcCommand::Quit => Value::Null,
    };
    Ok(reply)
}

fn print_summary(runner: &Runner<'_>) -> Result<()> {
    let summary = UsageSummary::collect(&runner.calculations, &runner.exports);

    println!("=== USAGE SUMMARY ===");
    println!("  calculations:   {}", summary.total_calculations);
    println!("  exports:        {}", summary.total_exports);
    println!("  average roi:    {:.2}%", summary.average_roi);
    println!("  export success: {:.1}%", summary.export_success_rate);
    println!(
        "  features:       charts {} | market {} | recommendations {}",
        summary.feature_usage.charts,
        summary.feature_usage.market_analysis,
        summary.feature_usage.recommendations
    );

    println!();
    println!("=== POPULAR SCENARIOS ===");
    if summary.popular_scenarios.is_empty() {
        println!("  (No calculations recorded yet)");
    } else {
        for s in &summary.popular_scenarios {
            println!("  #{:<4} {:<32} {}", s.scenario_id, s.scenario_name, s.count);
        }
    }

    println!();
    println!("=== EXPORT TEMPLATES ===");
    for t in &summary.template_breakdown {
        println!("  {:<10} {:>5} ({}%)", t.template, t.count, t.percentage);
    }

    println!();
    println!("=== RECENT ACTIVITY ===");
    for a in &summary.recent_activity {
        let subject = a
            .scenario
            .clone()
            .or_else(|| a.template.map(|t| t.to_string()))
            .unwrap_or_default();
        println!(
            "  {} | {:?} | {} | {} | {:?}",
            a.timestamp.format("%Y-%m-%d %H:%M:%S"),
            a.kind,
            a.user,
            subject,
            a.status
        );
    }
    Ok(())
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
