use anyhow::{bail, Context, Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use schema::{RawEdits, RawValue};
use session::EditSession;

const USAGE: &str = "\
Usage: mt5cfg [--params <file.toml>] [field=value ...]
       mt5cfg --decode <payload>

Builds the strategy config payload for the MT5 connector. Fields omitted
from the params file and overrides take their defaults. On success prints
the canonical JSON, the base-64 payload, and the executor invocation line.

Environment:
  MT5CFG_PARAMS    default params file path
  MT5CFG_EXECUTOR  executor command for the invocation line";

fn main() -> Result<()> {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let _ = dotenvy::dotenv(); // ignore error if .env not present

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{USAGE}");
        return Ok(());
    }

    // ── Decode mode: reverse a payload back to canonical JSON ────────────────
    if let Some(pos) = args.iter().position(|a| a == "--decode") {
        let payload = args
            .get(pos + 1)
            .context("--decode requires a payload argument")?;
        let config = codec::decode(payload).context("payload is not a valid config")?;
        println!("{}", codec::encode(&config)?.canonical);
        return Ok(());
    }

    // ── Collect raw edits: params file first, key=value overrides on top ─────
    let mut params_path = optional_env("MT5CFG_PARAMS");
    let mut overrides: Vec<(String, String)> = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--params" {
            let path = iter.next().context("--params requires a file path")?;
            params_path = Some(path.clone());
        } else if let Some((field, value)) = arg.split_once('=') {
            overrides.push((field.to_string(), value.to_string()));
        } else {
            bail!("unrecognized argument '{arg}' — see mt5cfg --help");
        }
    }

    let executor = optional_env("MT5CFG_EXECUTOR")
        .unwrap_or_else(|| codec::DEFAULT_EXECUTOR.to_string());
    let mut session = EditSession::with_executor(executor);

    if let Some(path) = params_path {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read params file '{path}'"))?;
        let file_edits: RawEdits = toml::from_str(&content)
            .with_context(|| format!("failed to parse params file '{path}'"))?;
        info!(path = %path, fields = file_edits.len(), "Loaded params file");
        for (field, value) in file_edits {
            session.apply(field, value);
        }
    }
    for (field, value) in overrides {
        session.apply(field, RawValue::from(value));
    }

    // ── Report ───────────────────────────────────────────────────────────────
    match session.output() {
        Some(encoded) => {
            println!("{}", encoded.canonical);
            println!("{}", encoded.payload);
            println!("{}", encoded.invocation);
            Ok(())
        }
        None => {
            let failure = session
                .last_failure()
                .context("no payload and no recorded failure")?;
            for violation in &failure.violations {
                error!(field = violation.field, raw = %violation.raw, "{}", violation.constraint);
            }
            bail!(
                "{} invalid field(s) — no payload produced",
                failure.violations.len()
            );
        }
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
