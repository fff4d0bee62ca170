//! Sequential portfolio simulation over an ordered trade list.

use anyhow::{bail, Result};
use rust_decimal_macros::dec;
use tracing::{debug, info};

use crate::models::{AccountConfig, PortfolioResult, ResolvedTrade, TradeRequest};

use super::TradeEvaluator;

/// Drives the evaluator over a trade sequence, maintaining a running balance
/// and the balance curve.
pub struct PortfolioRunner {
    config: AccountConfig,
    evaluator: TradeEvaluator,
}

impl PortfolioRunner {
    pub fn new(config: AccountConfig) -> Result<Self> {
        let evaluator = TradeEvaluator::new(config.clone())?;
        Ok(Self { config, evaluator })
    }

    /// Run the simulation. An empty request list is a caller error; rows
    /// that fail to resolve (non-positive entry or exit) are dropped and the
    /// run proceeds with whatever remains.
    pub fn run(&self, requests: &[TradeRequest]) -> Result<PortfolioResult> {
        if requests.is_empty() {
            bail!("trade list is empty");
        }

        let resolved: Vec<ResolvedTrade> = requests
            .iter()
            .filter_map(|r| r.resolve(self.config.direction))
            .collect();

        let dropped = requests.len() - resolved.len();
        if dropped > 0 {
            debug!(dropped, remaining = resolved.len(), "dropped invalid trade rows");
        }

        let mut balance = self.config.principal;
        let mut balance_curve = vec![self.config.principal];
        let mut trades = Vec::with_capacity(resolved.len());

        for trade in &resolved {
            // Compounding sizes against running equity; static mode sizes
            // every trade against the original principal while profit still
            // accumulates into the balance.
            let sizing_base = if self.config.compound {
                balance
            } else {
                self.config.principal
            };

            let result = self.evaluator.evaluate(balance, sizing_base, trade)?;
            balance = result.balance_after;
            balance_curve.push(balance);
            trades.push(result);
        }

        let final_balance = balance;
        let total_profit = final_balance - self.config.principal;
        let total_return_pct = total_profit / self.config.principal * dec!(100);

        info!(
            trades = trades.len(),
            final_balance = %final_balance,
            total_profit = %total_profit,
            "simulation complete"
        );

        Ok(PortfolioResult {
            trades,
            balance_curve,
            final_balance,
            total_profit,
            total_return_pct,
        })
    }
}
