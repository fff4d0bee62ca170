//! Leveraged trade sequence simulator
//!
//! Simulates ordered trade sequences against a single margin account and
//! sizes ATR-based stop-loss/take-profit levels with the same lot rule.

mod models;
mod trading;

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{warn, Level};
use tracing_subscriber::FmtSubscriber;

use crate::models::{AccountConfig, Direction, ExitSpec, TradeRequest};
use crate::trading::{PortfolioRunner, RiskInputs, RiskSizer};

/// Leveraged trade simulator CLI.
#[derive(Parser)]
#[command(name = "leversim")]
#[command(about = "Simulate leveraged trade sequences and ATR-based risk levels", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

/// Account parameters shared by both subcommands.
#[derive(Args)]
struct AccountArgs {
    /// Starting capital
    #[arg(long, default_value = "10000")]
    principal: Decimal,

    /// Leverage multiple
    #[arg(long, default_value = "10")]
    leverage: Decimal,

    /// Units per lot (overrides the preset)
    #[arg(long)]
    contract_size: Option<Decimal>,

    /// Lot quantization step (overrides the preset)
    #[arg(long)]
    lot_step: Option<Decimal>,

    /// Percent of balance risked per trade (1-100)
    #[arg(long, default_value = "10")]
    margin_pct: Decimal,

    /// Default trade direction (long or short)
    #[arg(long, default_value = "long")]
    direction: Direction,

    /// Size each trade against running equity instead of the principal
    #[arg(long)]
    compound: bool,

    /// Instrument preset for contract size and lot step
    /// (forex, gold, index, btc)
    #[arg(long, default_value = "forex")]
    preset: String,
}

impl AccountArgs {
    fn into_config(self) -> Result<AccountConfig> {
        let (preset_contract, preset_step) = preset_params(&self.preset)?;
        AccountConfig::new(
            self.principal,
            self.leverage,
            self.contract_size.unwrap_or(preset_contract),
            self.lot_step.unwrap_or(preset_step),
            self.margin_pct,
            self.direction,
            self.compound,
        )
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate an ordered sequence of trades
    Simulate {
        #[command(flatten)]
        account: AccountArgs,

        /// JSON file with trade requests
        #[arg(long)]
        trades: Option<PathBuf>,

        /// Inline trade spec: ENTRY:EXIT, ENTRY:PCT%, optional :long/:short
        #[arg(long = "trade", value_name = "SPEC")]
        inline: Vec<String>,

        /// Emit the result as JSON instead of a text report
        #[arg(long)]
        json: bool,
    },

    /// Size stop-loss/take-profit levels from an ATR multiple
    Risk {
        #[command(flatten)]
        account: AccountArgs,

        /// Entry price
        #[arg(long)]
        entry: Decimal,

        /// Average true range
        #[arg(long)]
        atr: Decimal,

        /// Stop-loss distance in ATR multiples
        #[arg(long, default_value = "1.5")]
        sl_mult: Decimal,

        /// Take-profit distance in ATR multiples
        /// (defaults to twice the stop multiple)
        #[arg(long)]
        tp_mult: Option<Decimal>,

        /// Emit the plan as JSON instead of a text report
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Simulate {
            account,
            trades,
            inline,
            json,
        } => {
            let config = account.into_config()?;

            let mut requests = Vec::new();
            if let Some(path) = trades {
                let raw = fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                let parsed: Vec<TradeRequest> =
                    serde_json::from_str(&raw).context("invalid trade list JSON")?;
                requests.extend(parsed);
            }
            for spec in &inline {
                if let Some(request) = parse_trade_spec(spec) {
                    requests.push(request);
                }
            }

            if requests.is_empty() {
                bail!("no trades given; use --trades FILE or --trade SPEC");
            }

            let runner = PortfolioRunner::new(config)?;
            let result = runner.run(&requests)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", result);
            }
        }

        Commands::Risk {
            account,
            entry,
            atr,
            sl_mult,
            tp_mult,
            json,
        } => {
            let direction = account.direction;
            let config = account.into_config()?;

            // Boundary convenience: an omitted take-profit multiple follows
            // the stop multiple at 2x
            let tp_mult = tp_mult.or(Some(sl_mult * dec!(2)));

            let inputs = RiskInputs {
                entry,
                direction,
                atr,
                sl_mult,
                tp_mult,
            };

            let plan = RiskSizer::new(config)?.plan(&inputs)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                println!("{}", plan);
            }
        }
    }

    Ok(())
}

/// Contract size and lot step for common instruments.
fn preset_params(name: &str) -> Result<(Decimal, Decimal)> {
    match name.to_lowercase().as_str() {
        "forex" | "fx" => Ok((dec!(100000), dec!(0.01))),
        "gold" | "xauusd" => Ok((dec!(100), dec!(0.01))),
        "index" => Ok((dec!(10), dec!(0.1))),
        "btc" | "bitcoin" => Ok((dec!(1), dec!(0.001))),
        other => bail!("unknown preset '{}' (expected forex, gold, index, or btc)", other),
    }
}

/// Parse an inline trade spec: "1.1000:1.1050", "1.1000:0.5%", or with a
/// trailing direction override like "1.1000:-0.5%:short". Rows that fail to
/// parse are skipped, matching how an incomplete form row is ignored.
fn parse_trade_spec(spec: &str) -> Option<TradeRequest> {
    let parts: Vec<&str> = spec.split(':').collect();
    if parts.len() < 2 || parts.len() > 3 {
        warn!(spec = %spec, "skipping malformed trade spec");
        return None;
    }

    let entry = match parts[0].trim().parse::<Decimal>() {
        Ok(v) => v,
        Err(_) => {
            warn!(spec = %spec, "skipping trade with unparseable entry");
            return None;
        }
    };

    let exit_part = parts[1].trim();
    let exit = if let Some(pct) = exit_part.strip_suffix('%') {
        match pct.parse::<Decimal>() {
            Ok(v) => ExitSpec::PercentMove(v),
            Err(_) => {
                warn!(spec = %spec, "skipping trade with unparseable percent");
                return None;
            }
        }
    } else {
        match exit_part.parse::<Decimal>() {
            Ok(v) => ExitSpec::Price(v),
            Err(_) => {
                warn!(spec = %spec, "skipping trade with unparseable exit");
                return None;
            }
        }
    };

    let direction = match parts.get(2) {
        Some(part) => match part.trim().parse::<Direction>() {
            Ok(d) => Some(d),
            Err(_) => {
                warn!(spec = %spec, "skipping trade with unknown direction");
                return None;
            }
        },
        None => None,
    };

    Some(TradeRequest {
        entry,
        exit,
        direction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price_spec() {
        let request = parse_trade_spec("1.1000:1.1050").unwrap();
        assert_eq!(request.entry, dec!(1.1000));
        assert!(matches!(request.exit, ExitSpec::Price(p) if p == dec!(1.1050)));
        assert!(request.direction.is_none());
    }

    #[test]
    fn test_parse_percent_spec_with_direction() {
        let request = parse_trade_spec("1.1000:-0.5%:short").unwrap();
        assert!(matches!(request.exit, ExitSpec::PercentMove(p) if p == dec!(-0.5)));
        assert_eq!(request.direction, Some(Direction::Short));
    }

    #[test]
    fn test_malformed_specs_are_skipped() {
        assert!(parse_trade_spec("1.1000").is_none());
        assert!(parse_trade_spec("abc:1.1050").is_none());
        assert!(parse_trade_spec("1.1000:x%").is_none());
        assert!(parse_trade_spec("1.1000:1.1050:sideways").is_none());
    }
}
