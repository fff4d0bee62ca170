//! Lot sizing: converts risk capital into a step-quantized lot count.

use anyhow::{bail, Result};
use rust_decimal::Decimal;

use crate::models::AccountConfig;

/// Calculator for tradable lot counts.
#[derive(Debug, Clone, Copy)]
pub struct PositionSizer {
    leverage: Decimal,
    contract_size: Decimal,
    lot_step: Decimal,
}

impl PositionSizer {
    /// Create a sizer from raw parameters. A non-positive lot step makes the
    /// quantization undefined, so all three parameters are rejected up front
    /// rather than silently substituted.
    pub fn new(leverage: Decimal, contract_size: Decimal, lot_step: Decimal) -> Result<Self> {
        if leverage <= Decimal::ZERO {
            bail!("leverage must be positive, got {}", leverage);
        }
        if contract_size <= Decimal::ZERO {
            bail!("contract size must be positive, got {}", contract_size);
        }
        if lot_step <= Decimal::ZERO {
            bail!("lot step must be positive, got {}", lot_step);
        }

        Ok(Self {
            leverage,
            contract_size,
            lot_step,
        })
    }

    pub fn from_config(config: &AccountConfig) -> Result<Self> {
        Self::new(config.leverage, config.contract_size, config.lot_step)
    }

    /// Lot count for `capital` at `entry`, quantized down to the nearest
    /// multiple of the lot step with a floor of one step. Quantization only
    /// ever reduces exposure below the nominal target; the floor means a
    /// minimum position is always taken, even when capital is tiny.
    pub fn lots(&self, capital: Decimal, entry: Decimal) -> Result<Decimal> {
        if entry <= Decimal::ZERO {
            bail!("entry price must be positive, got {}", entry);
        }

        let raw = capital * self.leverage / (self.contract_size * entry);
        let quantized = (raw / self.lot_step).floor() * self.lot_step;

        Ok(quantized.max(self.lot_step))
    }
}
