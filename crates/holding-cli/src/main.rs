mod commands;
mod config;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing::{debug, info};

use holding_core::detailed::DetailedRuleSet;
use holding_core::simplified::SimplifiedRuleSet;
use holding_core::RuleSetKind;

use commands::ScenarioArgs;
use config::HoldingConfig;

/// PF vs PJ rental-holding viability calculations
#[derive(Parser)]
#[command(
    name = "holding",
    version,
    about = "PF vs PJ rental-holding viability calculations",
    long_about = "Compares individual (PF) and corporate holding (PJ) taxation of rental \
                  income with decimal precision: effective rates, net income under each \
                  regime, conversion cost, payback period, score and recommendation."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Rule set to apply (overrides the config file)
    #[arg(long, global = true, env = "HOLDING_RULE_SET")]
    rule_set: Option<RuleSetKind>,

    /// Path to a YAML (or JSON) configuration file
    #[arg(long, global = true, env = "HOLDING_CONFIG")]
    config: Option<String>,

    /// Log calculation details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive effective PF and PJ tax rates
    Rates(ScenarioArgs),
    /// Compute holding viability: savings, payback, score, recommendation
    Viability(ScenarioArgs),
    /// Print the resolved configuration
    ShowConfig,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn run(
    command: Commands,
    config_path: Option<&str>,
    rule_set: Option<RuleSetKind>,
) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let resolve = || -> Result<HoldingConfig, Box<dyn std::error::Error>> {
        let mut cfg = config::load(config_path)?;
        if let Some(kind) = rule_set {
            debug!(%kind, "rule set overridden from command line");
            cfg.rule_set = kind;
        }
        info!(rule_set = %cfg.rule_set, "rule set selected");
        Ok(cfg)
    };

    match command {
        Commands::Rates(args) => {
            let cfg = resolve()?;
            match cfg.rule_set {
                RuleSetKind::Detailed => {
                    commands::run_rates(&DetailedRuleSet::new(cfg.detailed), args)
                }
                RuleSetKind::Simplified => commands::run_rates(&SimplifiedRuleSet, args),
            }
        }
        Commands::Viability(args) => {
            let cfg = resolve()?;
            match cfg.rule_set {
                RuleSetKind::Detailed => {
                    commands::run_viability(&DetailedRuleSet::new(cfg.detailed), args)
                }
                RuleSetKind::Simplified => commands::run_viability(&SimplifiedRuleSet, args),
            }
        }
        Commands::ShowConfig => Ok(serde_json::to_value(resolve()?)?),
        Commands::Version => Ok(serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        })),
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = run(cli.command, cli.config.as_deref(), cli.rule_set);

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
