use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Chart timeframe the strategy runs on.
///
/// Wire tokens are the MT5-style names; matching is exact and case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Timeframe {
    M1,
    M5,
    #[default]
    M15,
    M30,
    H1,
    H4,
    D1,
}

impl Timeframe {
    /// Every accepted token, in ascending bar-length order.
    pub const TOKENS: &'static [&'static str] = &["M1", "M5", "M15", "M30", "H1", "H4", "D1"];

    /// Exact token match. No case-folding, no aliases.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "M1" => Some(Timeframe::M1),
            "M5" => Some(Timeframe::M5),
            "M15" => Some(Timeframe::M15),
            "M30" => Some(Timeframe::M30),
            "H1" => Some(Timeframe::H1),
            "H4" => Some(Timeframe::H4),
            "D1" => Some(Timeframe::D1),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Timeframe::M1 => "M1",
            Timeframe::M5 => "M5",
            Timeframe::M15 => "M15",
            Timeframe::M30 => "M30",
            Timeframe::H1 => "H1",
            Timeframe::H4 => "H4",
            Timeframe::D1 => "D1",
        }
    }

    /// Bar length in minutes, as the executor maps timeframes to MT5 constants.
    pub fn minutes(&self) -> u32 {
        match self {
            Timeframe::M1 => 1,
            Timeframe::M5 => 5,
            Timeframe::M15 => 15,
            Timeframe::M30 => 30,
            Timeframe::H1 => 60,
            Timeframe::H4 => 240,
            Timeframe::D1 => 1440,
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Whether the executor is allowed to place real orders.
///
/// The executor compares the decoded field against the literal string
/// `"true"`, so the wire form is the token, not a JSON boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LiveSwitch {
    #[default]
    #[serde(rename = "false")]
    Disabled,
    #[serde(rename = "true")]
    Enabled,
}

impl LiveSwitch {
    pub const TOKENS: &'static [&'static str] = &["false", "true"];

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "false" => Some(LiveSwitch::Disabled),
            "true" => Some(LiveSwitch::Enabled),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            LiveSwitch::Disabled => "false",
            LiveSwitch::Enabled => "true",
        }
    }

    pub fn is_live(&self) -> bool {
        *self == LiveSwitch::Enabled
    }
}

impl std::fmt::Display for LiveSwitch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// The validated strategy configuration.
///
/// Exists only as the output of a successful [`crate::validate()`] pass — never
/// partially constructed, never mutated in place. Pure value semantics.
///
/// Field order is the wire order: serialization walks the struct top to
/// bottom, so the canonical JSON form is byte-stable for equal values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StrategyConfig {
    /// Comma-delimited instrument identifiers, passed through verbatim.
    pub symbols: String,
    pub timeframe: Timeframe,
    pub risk_per_trade_pct: f64,
    pub max_open_positions: i64,
    pub ema_fast: i64,
    pub ema_slow: i64,
    pub rsi_period: i64,
    pub atr_period: i64,
    pub atr_stop_multiplier: f64,
    pub take_profit_r_multiple: f64,
    #[serde(rename = "trailingStopATR")]
    pub trailing_stop_atr: f64,
    pub daily_loss_limit_pct: f64,
    pub max_drawdown_pct: f64,
    pub live_trading: LiveSwitch,
    pub magic_number: i64,
}

impl StrategyConfig {
    /// The symbol list as the executor will interpret it: split on commas,
    /// trimmed, uppercased, empties dropped. Does not affect the wire form.
    pub fn symbol_list(&self) -> Vec<String> {
        self.symbols
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            symbols: "EURUSD,GBPUSD".to_string(),
            timeframe: Timeframe::M15,
            risk_per_trade_pct: 1.0,
            max_open_positions: 3,
            ema_fast: 20,
            ema_slow: 50,
            rsi_period: 14,
            atr_period: 14,
            atr_stop_multiplier: 1.5,
            take_profit_r_multiple: 2.0,
            trailing_stop_atr: 1.0,
            daily_loss_limit_pct: 5.0,
            max_drawdown_pct: 20.0,
            live_trading: LiveSwitch::Disabled,
            magic_number: 246800,
        }
    }
}

/// One unvalidated field value as supplied by the form collaborator.
///
/// Form controls yield text; programmatic callers may hand numbers directly.
/// Anything else is outside the input contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        RawValue::Int(v)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Float(v)
    }
}

impl std::fmt::Display for RawValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawValue::Int(v) => write!(f, "{v}"),
            RawValue::Float(v) => write!(f, "{v}"),
            RawValue::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Snapshot of the collaborator-owned raw edit state: field name → raw value.
/// The validator only ever reads it; ownership stays with the caller.
pub type RawEdits = BTreeMap<String, RawValue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeframe_tokens_round_trip() {
        for token in Timeframe::TOKENS {
            let tf = Timeframe::from_token(token).expect("every listed token parses");
            assert_eq!(tf.token(), *token);
        }
    }

    #[test]
    fn timeframe_rejects_near_misses() {
        assert!(Timeframe::from_token("M16").is_none());
        assert!(Timeframe::from_token("m15").is_none());
        assert!(Timeframe::from_token(" M15").is_none());
    }

    #[test]
    fn timeframe_minutes_match_executor_mapping() {
        assert_eq!(Timeframe::M1.minutes(), 1);
        assert_eq!(Timeframe::H4.minutes(), 240);
        assert_eq!(Timeframe::D1.minutes(), 1440);
    }

    #[test]
    fn live_switch_tokens_are_exact() {
        assert_eq!(LiveSwitch::from_token("true"), Some(LiveSwitch::Enabled));
        assert_eq!(LiveSwitch::from_token("false"), Some(LiveSwitch::Disabled));
        assert!(LiveSwitch::from_token("True").is_none());
        assert!(LiveSwitch::from_token("1").is_none());
    }

    #[test]
    fn symbol_list_normalizes_like_the_executor() {
        let config = StrategyConfig {
            symbols: " eurusd, GBPUSD ,,xauusd ".to_string(),
            ..StrategyConfig::default()
        };
        assert_eq!(config.symbol_list(), vec!["EURUSD", "GBPUSD", "XAUUSD"]);
    }

    #[test]
    fn symbol_list_of_empty_string_is_empty() {
        let config = StrategyConfig {
            symbols: String::new(),
            ..StrategyConfig::default()
        };
        assert!(config.symbol_list().is_empty());
    }

    #[test]
    fn raw_value_deserializes_from_json_strings_and_numbers() {
        let parsed: RawValue = serde_json::from_str("\"1.5\"").unwrap();
        assert_eq!(parsed, RawValue::Text("1.5".to_string()));

        let parsed: RawValue = serde_json::from_str("3").unwrap();
        assert_eq!(parsed, RawValue::Int(3));

        let parsed: RawValue = serde_json::from_str("3.5").unwrap();
        assert_eq!(parsed, RawValue::Float(3.5));
    }

    #[test]
    fn raw_edits_deserialize_from_toml_table() {
        let edits: RawEdits = toml::from_str(
            r#"
            riskPerTradePct = "2.5"
            maxOpenPositions = 5
            atrStopMultiplier = 1.25
            "#,
        )
        .unwrap();
        assert_eq!(edits["riskPerTradePct"], RawValue::Text("2.5".to_string()));
        assert_eq!(edits["maxOpenPositions"], RawValue::Int(5));
        assert_eq!(edits["atrStopMultiplier"], RawValue::Float(1.25));
    }
}
