//! Simulation output records and their text reports.

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use super::Direction;

/// Full outcome of one executed trade.
#[derive(Debug, Clone, Serialize)]
pub struct TradeResult {
    /// Trade direction
    pub direction: Direction,

    /// Account balance going into the trade
    pub balance_before: Decimal,

    /// Risk capital allocated to the trade
    pub trade_capital: Decimal,

    /// Quantized lot count
    pub lots: Decimal,

    /// Units controlled (lots x contract size)
    pub units: Decimal,

    /// Margin consumed by the position
    pub margin: Decimal,

    /// Notional contract value at entry
    pub contract_value: Decimal,

    /// Realized leverage after quantization (contract value / balance)
    pub effective_leverage: Decimal,

    /// Entry price
    pub entry: Decimal,

    /// Exit price
    pub exit: Decimal,

    /// Profit, signed by direction
    pub profit: Decimal,

    /// Profit as percent of the balance going in
    pub profit_pct: Decimal,

    /// Balance left after reserving margin
    pub free_margin: Decimal,

    /// Largest adverse price move tolerable before free margin is exhausted
    pub max_drawdown_price: Decimal,

    /// Same tolerance as percent of the entry price
    pub max_drawdown_pct: Decimal,

    /// Price level at which free margin would be fully consumed
    pub liquidation_price: Decimal,

    /// Balance after realizing the trade (unclamped, may go negative)
    pub balance_after: Decimal,
}

/// Result of a whole simulation run.
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioResult {
    /// Per-trade outcomes, in execution order
    pub trades: Vec<TradeResult>,

    /// Balance after each trade, starting with the principal
    pub balance_curve: Vec<Decimal>,

    /// Balance after the last trade
    pub final_balance: Decimal,

    /// Final balance minus principal
    pub total_profit: Decimal,

    /// Total profit as percent of the principal
    pub total_return_pct: Decimal,
}

impl fmt::Display for PortfolioResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let initial = self.balance_curve.first().copied().unwrap_or(Decimal::ZERO);

        writeln!(f, "\n{:=^78}", " SIMULATION RESULTS ")?;
        writeln!(f)?;
        writeln!(f, "--- Account ---")?;
        writeln!(f, "Initial:      ${:.2}", initial)?;
        writeln!(f, "Final:        ${:.2}", self.final_balance)?;
        writeln!(f, "Total Profit: ${:.2}", self.total_profit)?;
        writeln!(f, "Return:       {:.2}%", self.total_return_pct)?;
        writeln!(f)?;
        writeln!(f, "--- Trades ({}) ---", self.trades.len())?;
        writeln!(
            f,
            "{:>3} {:>6} {:>10} {:>10} {:>7} {:>11} {:>11} {:>10} {:>12}",
            "#", "Dir", "Entry", "Exit", "Lots", "Margin", "Profit", "Liq", "Balance"
        )?;
        for (i, t) in self.trades.iter().enumerate() {
            writeln!(
                f,
                "{:>3} {:>6} {:>10.5} {:>10.5} {:>7.2} {:>11.2} {:>11.2} {:>10.5} {:>12.2}",
                i + 1,
                t.direction.as_str(),
                t.entry,
                t.exit,
                t.lots,
                t.margin,
                t.profit,
                t.liquidation_price,
                t.balance_after
            )?;
        }
        writeln!(f)?;
        writeln!(f, "--- Balance Curve ---")?;
        let curve = self
            .balance_curve
            .iter()
            .map(|b| format!("{:.2}", b))
            .collect::<Vec<_>>()
            .join(" -> ");
        writeln!(f, "{}", curve)?;
        writeln!(f, "{:=^78}", "")?;
        Ok(())
    }
}

/// Stop-loss/take-profit plan sized from an ATR multiple.
#[derive(Debug, Clone, Serialize)]
pub struct RiskPlan {
    pub direction: Direction,
    pub entry: Decimal,

    /// Quantized lot count
    pub lots: Decimal,

    /// Units controlled
    pub units: Decimal,

    /// Margin consumed at entry
    pub margin: Decimal,

    /// Stop distance in price units
    pub stop_distance: Decimal,

    /// Stop-loss price level
    pub stop_price: Decimal,

    /// Dollar exposure if the stop is hit
    pub stop_loss: Decimal,

    /// Stop exposure as percent of the principal
    pub stop_loss_pct: Decimal,

    /// Take-profit distance, when enabled
    pub take_profit_distance: Option<Decimal>,

    /// Take-profit price level, when enabled
    pub take_profit_price: Option<Decimal>,

    /// Dollar gain at the take-profit level, when enabled
    pub take_profit: Option<Decimal>,

    /// Take-profit gain as percent of the principal, when enabled
    pub take_profit_pct: Option<Decimal>,

    /// Reward multiple per unit of risk (tp mult / sl mult), when enabled
    pub risk_reward: Option<Decimal>,
}

impl fmt::Display for RiskPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n{:=^52}", " RISK PLAN ")?;
        writeln!(f)?;
        writeln!(f, "Direction:   {}", self.direction.as_str())?;
        writeln!(f, "Entry:       {:.5}", self.entry)?;
        writeln!(f, "Lots:        {:.2}", self.lots)?;
        writeln!(f, "Units:       {:.2}", self.units)?;
        writeln!(f, "Margin:      ${:.2}", self.margin)?;
        writeln!(f)?;
        writeln!(
            f,
            "Stop:        {:.5} ({:.5} away)",
            self.stop_price, self.stop_distance
        )?;
        writeln!(
            f,
            "Risk:        ${:.2} ({:.2}% of capital)",
            self.stop_loss, self.stop_loss_pct
        )?;

        match (
            self.take_profit_price,
            self.take_profit_distance,
            self.take_profit,
            self.take_profit_pct,
        ) {
            (Some(price), Some(distance), Some(gain), Some(pct)) => {
                writeln!(f, "Target:      {:.5} ({:.5} away)", price, distance)?;
                writeln!(f, "Reward:      ${:.2} ({:.2}% of capital)", gain, pct)?;
            }
            _ => {
                writeln!(f, "Target:      -")?;
            }
        }

        match self.risk_reward {
            Some(rr) => writeln!(f, "Risk/Reward: 1 : {}", rr.normalize())?,
            None => writeln!(f, "Risk/Reward: -")?,
        }

        writeln!(f, "{:=^52}", "")?;
        Ok(())
    }
}
