//! Per-trade outcome evaluation: sizing, margin, P&L, and liquidation level.

use anyhow::Result;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{AccountConfig, Direction, ResolvedTrade, TradeResult};

use super::PositionSizer;

/// Computes the full outcome of a single trade against the account.
pub struct TradeEvaluator {
    config: AccountConfig,
    sizer: PositionSizer,
}

impl TradeEvaluator {
    pub fn new(config: AccountConfig) -> Result<Self> {
        let sizer = PositionSizer::from_config(&config)?;
        Ok(Self { config, sizer })
    }

    /// Evaluate one trade. `balance` is the account balance going in;
    /// `sizing_base` is the balance the trade's capital allocation is sized
    /// against (the running balance when compounding, the principal
    /// otherwise). The returned balance is not clamped: a large enough loss
    /// drives it negative, and later trades still size off one lot step.
    pub fn evaluate(
        &self,
        balance: Decimal,
        sizing_base: Decimal,
        trade: &ResolvedTrade,
    ) -> Result<TradeResult> {
        let trade_capital = sizing_base * self.config.margin_ratio;
        let lots = self.sizer.lots(trade_capital, trade.entry)?;

        let units = lots * self.config.contract_size;
        let margin = units * trade.entry / self.config.leverage;
        let contract_value = units * trade.entry;
        let effective_leverage = ratio(contract_value, balance);

        let price_diff = match trade.direction {
            Direction::Long => trade.exit - trade.entry,
            Direction::Short => trade.entry - trade.exit,
        };
        let profit = units * price_diff;
        let profit_pct = ratio(profit, balance) * dec!(100);

        let free_margin = balance - margin;
        let max_drawdown_price = if units > Decimal::ZERO {
            free_margin / units
        } else {
            Decimal::ZERO
        };
        let max_drawdown_pct = max_drawdown_price / trade.entry * dec!(100);
        let liquidation_price = match trade.direction {
            Direction::Long => trade.entry - max_drawdown_price,
            Direction::Short => trade.entry + max_drawdown_price,
        };

        Ok(TradeResult {
            direction: trade.direction,
            balance_before: balance,
            trade_capital,
            lots,
            units,
            margin,
            contract_value,
            effective_leverage,
            entry: trade.entry,
            exit: trade.exit,
            profit,
            profit_pct,
            free_margin,
            max_drawdown_price,
            max_drawdown_pct,
            liquidation_price,
            balance_after: balance + profit,
        })
    }
}

/// Division guarded against a balance that has decayed to exactly zero.
fn ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TradeRequest;

    fn config() -> AccountConfig {
        AccountConfig::new(
            dec!(10000),
            dec!(10),
            dec!(100000),
            dec!(0.01),
            dec!(10),
            Direction::Long,
            true,
        )
        .unwrap()
    }

    fn evaluate(balance: Decimal, entry: Decimal, exit: Decimal, dir: Direction) -> TradeResult {
        let request = TradeRequest::price(entry, exit).with_direction(dir);
        let trade = request.resolve(Direction::Long).unwrap();
        TradeEvaluator::new(config())
            .unwrap()
            .evaluate(balance, balance, &trade)
            .unwrap()
    }

    #[test]
    fn test_winning_long_trade() {
        let r = evaluate(dec!(10000), dec!(1.1000), dec!(1.1050), Direction::Long);

        assert_eq!(r.trade_capital, dec!(1000));
        assert_eq!(r.lots, dec!(0.09));
        assert_eq!(r.units, dec!(9000));
        assert_eq!(r.margin, dec!(990));
        assert_eq!(r.contract_value, dec!(9900));
        assert_eq!(r.effective_leverage, dec!(0.99));
        assert_eq!(r.profit, dec!(45));
        assert_eq!(r.profit_pct, dec!(0.45));
        assert_eq!(r.free_margin, dec!(9010));
        assert_eq!(r.balance_after, dec!(10045));
    }

    #[test]
    fn test_losing_long_trade() {
        let r = evaluate(dec!(10000), dec!(1.1000), dec!(1.0950), Direction::Long);

        assert_eq!(r.profit, dec!(-45));
        assert_eq!(r.balance_after, dec!(9955));
    }

    #[test]
    fn test_short_profits_from_price_drop() {
        let r = evaluate(dec!(10000), dec!(1.1000), dec!(1.0900), Direction::Short);

        assert_eq!(r.profit, dec!(90)); // units * 0.01
        assert!(r.profit > Decimal::ZERO);
    }

    #[test]
    fn test_direction_symmetry() {
        let long = evaluate(dec!(10000), dec!(1.1000), dec!(1.1080), Direction::Long);
        let short = evaluate(dec!(10000), dec!(1.1000), dec!(1.0920), Direction::Short);

        assert_eq!(long.profit, short.profit);
        assert_eq!(long.lots, short.lots);
    }

    #[test]
    fn test_margin_never_exceeds_trade_capital() {
        for balance in [dec!(2000), dec!(10000), dec!(123456.78)] {
            let r = evaluate(balance, dec!(1.1000), dec!(1.1050), Direction::Long);
            assert!(r.margin <= r.trade_capital, "balance {}", balance);
        }
    }

    #[test]
    fn test_liquidation_price_sides() {
        let long = evaluate(dec!(10000), dec!(1.1000), dec!(1.1050), Direction::Long);
        let short = evaluate(dec!(10000), dec!(1.1000), dec!(1.1050), Direction::Short);

        // Free margin 9010 over 9000 units tolerates just over a 1.0011 move
        assert!(long.liquidation_price < long.entry);
        assert!(short.liquidation_price > short.entry);
        assert_eq!(long.entry - long.liquidation_price, long.max_drawdown_price);
        assert_eq!(short.liquidation_price - short.entry, short.max_drawdown_price);
    }

    #[test]
    fn test_loss_can_drive_balance_negative() {
        // Tiny balance still sizes one lot step; the loss swamps the account
        let r = evaluate(dec!(10), dec!(1.0000), dec!(0.5000), Direction::Long);

        assert_eq!(r.lots, dec!(0.01));
        assert!(r.balance_after < Decimal::ZERO);
    }
}
