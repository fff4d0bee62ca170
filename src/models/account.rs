//! Account configuration for a simulation run.

use anyhow::{bail, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Direction of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "long",
            Direction::Short => "short",
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "long" | "buy" => Ok(Direction::Long),
            "short" | "sell" => Ok(Direction::Short),
            other => bail!("unknown direction '{}' (expected long or short)", other),
        }
    }
}

/// Immutable per-run account parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Starting capital
    pub principal: Decimal,

    /// Leverage multiple (>= 1)
    pub leverage: Decimal,

    /// Units per lot
    pub contract_size: Decimal,

    /// Lot quantization step
    pub lot_step: Decimal,

    /// Fraction of balance earmarked as risk capital per trade, in (0, 1]
    pub margin_ratio: Decimal,

    /// Default trade direction, overridable per request
    pub direction: Direction,

    /// Size each trade against running equity rather than the principal
    pub compound: bool,
}

impl AccountConfig {
    /// Build a validated config. `margin_pct` is the 1-100 percent input
    /// collected at the boundary; it is stored as a fraction.
    pub fn new(
        principal: Decimal,
        leverage: Decimal,
        contract_size: Decimal,
        lot_step: Decimal,
        margin_pct: Decimal,
        direction: Direction,
        compound: bool,
    ) -> Result<Self> {
        if principal <= Decimal::ZERO {
            bail!("principal must be positive, got {}", principal);
        }
        if leverage < Decimal::ONE {
            bail!("leverage must be at least 1, got {}", leverage);
        }
        if contract_size <= Decimal::ZERO {
            bail!("contract size must be positive, got {}", contract_size);
        }
        if lot_step <= Decimal::ZERO {
            bail!("lot step must be positive, got {}", lot_step);
        }
        if margin_pct <= Decimal::ZERO || margin_pct > dec!(100) {
            bail!("margin percent must be in (0, 100], got {}", margin_pct);
        }

        Ok(Self {
            principal,
            leverage,
            contract_size,
            lot_step,
            margin_ratio: margin_pct / dec!(100),
            direction,
            compound,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(
        principal: Decimal,
        leverage: Decimal,
        contract_size: Decimal,
        lot_step: Decimal,
        margin_pct: Decimal,
    ) -> Result<AccountConfig> {
        AccountConfig::new(
            principal,
            leverage,
            contract_size,
            lot_step,
            margin_pct,
            Direction::Long,
            true,
        )
    }

    #[test]
    fn test_margin_percent_stored_as_fraction() {
        let config = build(dec!(10000), dec!(10), dec!(100000), dec!(0.01), dec!(10)).unwrap();
        assert_eq!(config.margin_ratio, dec!(0.1));
    }

    #[test]
    fn test_rejects_out_of_domain_values() {
        assert!(build(dec!(0), dec!(10), dec!(100000), dec!(0.01), dec!(10)).is_err());
        assert!(build(dec!(10000), dec!(0.5), dec!(100000), dec!(0.01), dec!(10)).is_err());
        assert!(build(dec!(10000), dec!(10), dec!(0), dec!(0.01), dec!(10)).is_err());
        assert!(build(dec!(10000), dec!(10), dec!(100000), dec!(0), dec!(10)).is_err());
        assert!(build(dec!(10000), dec!(10), dec!(100000), dec!(0.01), dec!(0)).is_err());
        assert!(build(dec!(10000), dec!(10), dec!(100000), dec!(0.01), dec!(101)).is_err());
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!("long".parse::<Direction>().unwrap(), Direction::Long);
        assert_eq!("SHORT".parse::<Direction>().unwrap(), Direction::Short);
        assert!("sideways".parse::<Direction>().is_err());
    }
}
