//! Trade requests and their resolution to canonical entry/exit pairs.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::Direction;

/// How a request specifies its exit level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitSpec {
    /// Explicit exit price
    Price(Decimal),
    /// Percentage move from entry, signed by direction
    PercentMove(Decimal),
}

/// One requested trade, as collected at the boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRequest {
    /// Entry price
    pub entry: Decimal,

    /// Exit level specification
    pub exit: ExitSpec,

    /// Overrides the account default direction when set
    #[serde(default)]
    pub direction: Option<Direction>,
}

/// A request resolved to the canonical (entry, exit, direction) triple.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedTrade {
    pub entry: Decimal,
    pub exit: Decimal,
    pub direction: Direction,
}

impl TradeRequest {
    pub fn price(entry: Decimal, exit: Decimal) -> Self {
        Self {
            entry,
            exit: ExitSpec::Price(exit),
            direction: None,
        }
    }

    pub fn percent(entry: Decimal, pct: Decimal) -> Self {
        Self {
            entry,
            exit: ExitSpec::PercentMove(pct),
            direction: None,
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Resolve against the account default direction. Percent moves are
    /// converted to an explicit exit price here, once, before evaluation.
    /// Rows that cannot produce a valid entry/exit pair return `None` and
    /// are dropped from the run.
    pub fn resolve(&self, default_direction: Direction) -> Option<ResolvedTrade> {
        let direction = self.direction.unwrap_or(default_direction);

        if self.entry <= Decimal::ZERO {
            warn!(entry = %self.entry, "dropping trade with non-positive entry");
            return None;
        }

        let exit = match self.exit {
            ExitSpec::Price(price) => price,
            ExitSpec::PercentMove(pct) => {
                let factor = match direction {
                    Direction::Long => Decimal::ONE + pct / dec!(100),
                    Direction::Short => Decimal::ONE - pct / dec!(100),
                };
                self.entry * factor
            }
        };

        if exit <= Decimal::ZERO {
            warn!(entry = %self.entry, exit = %exit, "dropping trade with non-positive exit");
            return None;
        }

        Some(ResolvedTrade {
            entry: self.entry,
            exit,
            direction,
        })
    }
}
