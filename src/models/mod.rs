//! Data models for account configuration, trade requests, and results.

mod account;
mod result;
mod trade;

pub use account::{AccountConfig, Direction};
pub use result::{PortfolioResult, RiskPlan, TradeResult};
pub use trade::{ExitSpec, ResolvedTrade, TradeRequest};
