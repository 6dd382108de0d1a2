//! Validation pass: raw edit snapshot in, typed config or structured failure out.
//!
//! One pass walks every declared field, substituting defaults for omissions,
//! coercing raw values, and checking domains. Problems are collected, not
//! short-circuited, so a single pass reports every offending field.

use crate::error::{ConstraintError, ValidationFailure, Violation};
use crate::types::{LiveSwitch, RawEdits, RawValue, StrategyConfig, Timeframe};

/// Largest fractional component still treated as representation noise when an
/// integer field is supplied as a decimal (e.g. "3.0000000001").
const FRACTION_TOLERANCE: f64 = 1e-9;

/// Validate one snapshot of the raw edit state.
///
/// Pure function of its input: no retained state, no side effects, safe to
/// call on every keystroke. Fields absent from `raw` take their defaults;
/// keys outside the declared set are ignored. On any violation the whole
/// pass fails, and the failure lists every offending field.
pub fn validate(raw: &RawEdits) -> Result<StrategyConfig, ValidationFailure> {
    let defaults = StrategyConfig::default();
    let mut problems = Vec::new();

    let config = StrategyConfig {
        symbols: text_field(raw, "symbols", &defaults.symbols),
        timeframe: token_field(
            raw,
            "timeframe",
            defaults.timeframe,
            Timeframe::from_token,
            Timeframe::TOKENS,
            &mut problems,
        ),
        risk_per_trade_pct: decimal_field(
            raw,
            "riskPerTradePct",
            defaults.risk_per_trade_pct,
            0.0,
            10.0,
            &mut problems,
        ),
        max_open_positions: int_field(
            raw,
            "maxOpenPositions",
            defaults.max_open_positions,
            1,
            20,
            &mut problems,
        ),
        ema_fast: int_field(raw, "emaFast", defaults.ema_fast, 2, 200, &mut problems),
        ema_slow: int_field(raw, "emaSlow", defaults.ema_slow, 5, 400, &mut problems),
        rsi_period: int_field(raw, "rsiPeriod", defaults.rsi_period, 2, 50, &mut problems),
        atr_period: int_field(raw, "atrPeriod", defaults.atr_period, 5, 100, &mut problems),
        atr_stop_multiplier: decimal_field(
            raw,
            "atrStopMultiplier",
            defaults.atr_stop_multiplier,
            0.1,
            10.0,
            &mut problems,
        ),
        take_profit_r_multiple: decimal_field(
            raw,
            "takeProfitRMultiple",
            defaults.take_profit_r_multiple,
            0.1,
            10.0,
            &mut problems,
        ),
        trailing_stop_atr: decimal_field(
            raw,
            "trailingStopATR",
            defaults.trailing_stop_atr,
            0.0,
            10.0,
            &mut problems,
        ),
        daily_loss_limit_pct: decimal_field(
            raw,
            "dailyLossLimitPct",
            defaults.daily_loss_limit_pct,
            0.0,
            50.0,
            &mut problems,
        ),
        max_drawdown_pct: decimal_field(
            raw,
            "maxDrawdownPct",
            defaults.max_drawdown_pct,
            0.0,
            90.0,
            &mut problems,
        ),
        live_trading: token_field(
            raw,
            "liveTrading",
            defaults.live_trading,
            LiveSwitch::from_token,
            LiveSwitch::TOKENS,
            &mut problems,
        ),
        magic_number: int_field(
            raw,
            "magicNumber",
            defaults.magic_number,
            1,
            999_999,
            &mut problems,
        ),
    };

    if problems.is_empty() {
        Ok(config)
    } else {
        Err(ValidationFailure { violations: problems })
    }
}

// ─── Per-field helpers ────────────────────────────────────────────────────────

/// Free-text field. Any raw value is accepted in its textual rendering;
/// emptiness is permitted (the executor tolerates an empty symbol list).
fn text_field(raw: &RawEdits, field: &'static str, default: &str) -> String {
    match raw.get(field) {
        Some(value) => value.to_string(),
        None => default.to_string(),
    }
}

/// Enumeration field: the raw value must be text and an exact token match.
fn token_field<T: Copy>(
    raw: &RawEdits,
    field: &'static str,
    default: T,
    parse: fn(&str) -> Option<T>,
    allowed: &'static [&'static str],
    problems: &mut Vec<Violation>,
) -> T {
    let Some(value) = raw.get(field) else {
        return default;
    };
    let parsed = match value {
        RawValue::Text(token) => parse(token),
        // A number can never match a token; coercion is not attempted.
        _ => None,
    };
    match parsed {
        Some(v) => v,
        None => {
            problems.push(Violation {
                field,
                raw: value.to_string(),
                constraint: ConstraintError::Membership { allowed },
            });
            default
        }
    }
}

/// Bounded decimal field over a closed interval.
fn decimal_field(
    raw: &RawEdits,
    field: &'static str,
    default: f64,
    min: f64,
    max: f64,
    problems: &mut Vec<Violation>,
) -> f64 {
    let Some(value) = raw.get(field) else {
        return default;
    };
    let Some(parsed) = coerce_number(value) else {
        problems.push(Violation {
            field,
            raw: value.to_string(),
            constraint: ConstraintError::Coercion { expected: "a decimal number" },
        });
        return default;
    };
    if parsed < min || parsed > max {
        problems.push(Violation {
            field,
            raw: value.to_string(),
            constraint: ConstraintError::Range { min, max },
        });
        return default;
    }
    parsed
}

/// Bounded integer field over a closed interval. The coerced value must carry
/// no fractional component beyond representable tolerance.
fn int_field(
    raw: &RawEdits,
    field: &'static str,
    default: i64,
    min: i64,
    max: i64,
    problems: &mut Vec<Violation>,
) -> i64 {
    let Some(value) = raw.get(field) else {
        return default;
    };
    let Some(parsed) = coerce_number(value) else {
        problems.push(Violation {
            field,
            raw: value.to_string(),
            constraint: ConstraintError::Coercion { expected: "an integer" },
        });
        return default;
    };
    if (parsed - parsed.round()).abs() > FRACTION_TOLERANCE {
        problems.push(Violation {
            field,
            raw: value.to_string(),
            constraint: ConstraintError::Coercion { expected: "an integer" },
        });
        return default;
    }
    if parsed < min as f64 || parsed > max as f64 {
        problems.push(Violation {
            field,
            raw: value.to_string(),
            constraint: ConstraintError::Range { min: min as f64, max: max as f64 },
        });
        return default;
    }
    parsed.round() as i64
}

/// Coerce a raw value to a finite number. Text is trimmed before parsing;
/// `NaN` and infinities are rejected in both textual and numeric form.
fn coerce_number(value: &RawValue) -> Option<f64> {
    let parsed = match value {
        RawValue::Int(v) => *v as f64,
        RawValue::Float(v) => *v,
        RawValue::Text(s) => s.trim().parse::<f64>().ok()?,
    };
    parsed.is_finite().then_some(parsed)
}
