use proptest::prelude::*;

use codec::{decode, encode, encode_for};
use schema::{LiveSwitch, StrategyConfig, Timeframe};

fn arb_timeframe() -> impl Strategy<Value = Timeframe> {
    prop_oneof![
        Just(Timeframe::M1),
        Just(Timeframe::M5),
        Just(Timeframe::M15),
        Just(Timeframe::M30),
        Just(Timeframe::H1),
        Just(Timeframe::H4),
        Just(Timeframe::D1),
    ]
}

prop_compose! {
    /// Arbitrary config drawn entirely from the legal field domains.
    fn arb_config()(
        symbols in "[A-Z]{3,6}(,[A-Z]{3,6}){0,3}",
        timeframe in arb_timeframe(),
        risk_per_trade_pct in 0.0f64..=10.0,
        max_open_positions in 1i64..=20,
        ema_fast in 2i64..=200,
        ema_slow in 5i64..=400,
        rsi_period in 2i64..=50,
        atr_period in 5i64..=100,
        atr_stop_multiplier in 0.1f64..=10.0,
        take_profit_r_multiple in 0.1f64..=10.0,
        trailing_stop_atr in 0.0f64..=10.0,
        daily_loss_limit_pct in 0.0f64..=50.0,
        max_drawdown_pct in 0.0f64..=90.0,
        live in any::<bool>(),
        magic_number in 1i64..=999_999,
    ) -> StrategyConfig {
        StrategyConfig {
            symbols,
            timeframe,
            risk_per_trade_pct,
            max_open_positions,
            ema_fast,
            ema_slow,
            rsi_period,
            atr_period,
            atr_stop_multiplier,
            take_profit_r_multiple,
            trailing_stop_atr,
            daily_loss_limit_pct,
            max_drawdown_pct,
            live_trading: if live { LiveSwitch::Enabled } else { LiveSwitch::Disabled },
            magic_number,
        }
    }
}

proptest! {
    /// Decoding the payload always reproduces the config field-for-field.
    #[test]
    fn payload_round_trips_for_any_valid_config(config in arb_config()) {
        let encoded = encode(&config).expect("encoding a valid config cannot fail");
        let decoded = decode(&encoded.payload).expect("own payload must decode");
        prop_assert_eq!(decoded, config);
    }

    /// Equal configs produce byte-identical outputs on every pass.
    #[test]
    fn encoding_is_deterministic_for_any_config(config in arb_config()) {
        let first = encode(&config).unwrap();
        let second = encode(&config).unwrap();
        prop_assert_eq!(&first.canonical, &second.canonical);
        prop_assert_eq!(&first.payload, &second.payload);
        prop_assert_eq!(&first.invocation, &second.invocation);
    }

    /// The payload never leaves the base-64 alphabet and never wraps, so the
    /// single-quoted argument always stays one shell token.
    #[test]
    fn invocation_stays_a_single_line(config in arb_config()) {
        let encoded = encode_for(&config, "python3 mt5_connector.py").unwrap();
        prop_assert!(encoded
            .payload
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/' || c == '='));
        prop_assert_eq!(encoded.invocation.lines().count(), 1);
        prop_assert!(
            encoded.invocation.ends_with(&format!("'{}'", encoded.payload)),
            "invocation does not end with quoted payload: {:?}",
            encoded.invocation
        );
    }
}
