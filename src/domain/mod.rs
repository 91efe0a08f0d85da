// Domain layer - Trim sessions, gallery model and the rules behind them

pub mod errors;
pub mod model;
pub mod rules;
