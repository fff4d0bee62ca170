//! ATR-based stop-loss/take-profit sizing.

use anyhow::{bail, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::models::{AccountConfig, Direction, RiskPlan};

use super::PositionSizer;

/// Inputs for a risk plan, as collected at the boundary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RiskInputs {
    pub entry: Decimal,
    pub direction: Direction,

    /// Average true range, the volatility unit the distances scale from
    pub atr: Decimal,

    /// Stop distance in ATR multiples
    pub sl_mult: Decimal,

    /// Take-profit distance in ATR multiples; absent or zero disables it
    pub tp_mult: Option<Decimal>,
}

/// Sizes stop-loss/take-profit levels with the same lot rule as the
/// simulator.
pub struct RiskSizer {
    config: AccountConfig,
    sizer: PositionSizer,
}

impl RiskSizer {
    pub fn new(config: AccountConfig) -> Result<Self> {
        let sizer = PositionSizer::from_config(&config)?;
        Ok(Self { config, sizer })
    }

    /// Compute a risk plan. Degenerate inputs (non-positive entry, ATR, or
    /// multiples) are rejected outright; the caller renders a placeholder
    /// instead of a partial plan.
    pub fn plan(&self, inputs: &RiskInputs) -> Result<RiskPlan> {
        if inputs.entry <= Decimal::ZERO {
            bail!("entry price must be positive, got {}", inputs.entry);
        }
        if inputs.atr <= Decimal::ZERO {
            bail!("ATR must be positive, got {}", inputs.atr);
        }
        if inputs.sl_mult <= Decimal::ZERO {
            bail!("stop-loss multiple must be positive, got {}", inputs.sl_mult);
        }
        if let Some(tp) = inputs.tp_mult {
            if tp < Decimal::ZERO {
                bail!("take-profit multiple must not be negative, got {}", tp);
            }
        }
        // Zero is "disabled", not an error
        let tp_mult = inputs.tp_mult.filter(|m| !m.is_zero());

        let stop_distance = inputs.atr * inputs.sl_mult;
        let stop_price = match inputs.direction {
            Direction::Long => inputs.entry - stop_distance,
            Direction::Short => inputs.entry + stop_distance,
        };

        let capital = self.config.principal * self.config.margin_ratio;
        let lots = self.sizer.lots(capital, inputs.entry)?;
        let units = lots * self.config.contract_size;
        let margin = units * inputs.entry / self.config.leverage;

        let stop_loss = units * stop_distance;
        let stop_loss_pct = stop_loss / self.config.principal * dec!(100);

        let (take_profit_distance, take_profit_price, take_profit, take_profit_pct, risk_reward) =
            match tp_mult {
                Some(mult) => {
                    let distance = inputs.atr * mult;
                    let price = match inputs.direction {
                        Direction::Long => inputs.entry + distance,
                        Direction::Short => inputs.entry - distance,
                    };
                    let gain = units * distance;
                    let pct = gain / self.config.principal * dec!(100);
                    (
                        Some(distance),
                        Some(price),
                        Some(gain),
                        Some(pct),
                        Some(mult / inputs.sl_mult),
                    )
                }
                None => (None, None, None, None, None),
            };

        Ok(RiskPlan {
            direction: inputs.direction,
            entry: inputs.entry,
            lots,
            units,
            margin,
            stop_distance,
            stop_price,
            stop_loss,
            stop_loss_pct,
            take_profit_distance,
            take_profit_price,
            take_profit,
            take_profit_pct,
            risk_reward,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizer() -> RiskSizer {
        let config = AccountConfig::new(
            dec!(10000),
            dec!(10),
            dec!(100000),
            dec!(0.01),
            dec!(10),
            Direction::Long,
            true,
        )
        .unwrap();
        RiskSizer::new(config).unwrap()
    }

    fn inputs(tp_mult: Option<Decimal>) -> RiskInputs {
        RiskInputs {
            entry: dec!(1.1000),
            direction: Direction::Long,
            atr: dec!(0.0050),
            sl_mult: dec!(1.5),
            tp_mult,
        }
    }

    #[test]
    fn test_long_plan_levels() {
        let plan = sizer().plan(&inputs(Some(dec!(3)))).unwrap();

        assert_eq!(plan.stop_distance, dec!(0.0075));
        assert_eq!(plan.stop_price, dec!(1.0925));
        assert_eq!(plan.take_profit_distance, Some(dec!(0.0150)));
        assert_eq!(plan.take_profit_price, Some(dec!(1.1150)));
        assert_eq!(plan.risk_reward, Some(dec!(2)));

        // Same lot rule as the simulator: 1000 risk capital at 1.1 -> 0.09
        assert_eq!(plan.lots, dec!(0.09));
        assert_eq!(plan.units, dec!(9000));
        assert_eq!(plan.stop_loss, dec!(67.5));
        assert_eq!(plan.stop_loss_pct, dec!(0.675));
        assert_eq!(plan.take_profit, Some(dec!(135)));
    }

    #[test]
    fn test_short_plan_mirrors_levels() {
        let mut short = inputs(Some(dec!(3)));
        short.direction = Direction::Short;
        let plan = sizer().plan(&short).unwrap();

        assert_eq!(plan.stop_price, dec!(1.1075));
        assert_eq!(plan.take_profit_price, Some(dec!(1.0850)));
    }

    #[test]
    fn test_absent_or_zero_tp_disables_target() {
        for tp in [None, Some(Decimal::ZERO)] {
            let plan = sizer().plan(&inputs(tp)).unwrap();
            assert!(plan.take_profit_price.is_none());
            assert!(plan.risk_reward.is_none());
        }
    }

    #[test]
    fn test_degenerate_inputs_rejected() {
        let s = sizer();

        let mut bad = inputs(None);
        bad.entry = Decimal::ZERO;
        assert!(s.plan(&bad).is_err());

        let mut bad = inputs(None);
        bad.atr = dec!(-0.001);
        assert!(s.plan(&bad).is_err());

        let mut bad = inputs(None);
        bad.sl_mult = Decimal::ZERO;
        assert!(s.plan(&bad).is_err());

        let bad = inputs(Some(dec!(-1)));
        assert!(s.plan(&bad).is_err());
    }
}
