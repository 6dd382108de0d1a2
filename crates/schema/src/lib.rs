pub mod error;
pub mod types;
pub mod validate;

pub use error::{ConstraintError, ValidationFailure, Violation};
pub use types::{LiveSwitch, RawEdits, RawValue, StrategyConfig, Timeframe};
pub use validate::validate;
