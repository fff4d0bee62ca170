//! Simulation logic: lot sizing, trade evaluation, portfolio runs, risk sizing.

mod evaluator;
mod position_sizer;
mod risk_sizer;
mod runner;

pub use evaluator::TradeEvaluator;
pub use position_sizer::PositionSizer;
pub use risk_sizer::{RiskInputs, RiskSizer};
pub use runner::PortfolioRunner;
