//! fncall-cli: 把 API 描述转换为函数声明，并用自然语言调用 API
//!
//! Usage:
//!   fncall-cli convert <file|url> [--legacy]          Print the tool schema for an API description
//!   fncall-cli ask <query> [--config <file>] [--dry-run]
//!                                                     Ask the model and dispatch its function call
//!   fncall-cli version | help

use anyhow::{bail, Context};
use api_fncall_bridge::{
    tools_to_json, ApiDescription, Bridge, BridgeConfig, BridgeOutcome, ExclusionMode,
    FunctionCallOutcome,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let result = match args[1].as_str() {
        "convert" => cmd_convert(&args[2..]).await,
        "ask" => cmd_ask(&args[2..]).await,
        "version" | "--version" | "-V" => {
            cmd_version();
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"fncall-cli: natural-language access to an HTTP API through function calling

USAGE:
    fncall-cli <COMMAND> [OPTIONS]

COMMANDS:
    convert <file|url> [--legacy]          Print the functionDeclarations tool schema
    ask <query> [--config <file>] [--dry-run]
                                           Ask the model; dispatch its call unless --dry-run
    version                                Show version information
    help                                   Show this help message

ENVIRONMENT:
    GEMINI_API_KEY              Model provider credential (keyring entry 'api-fncall-bridge/gemini' is tried first)
    FNCALL_API_BASE_URL         Target service base URL (default http://localhost:8080)
    FNCALL_DESCRIPTION_URL      API description URL (default <base>/v3/api-docs)
    FNCALL_MODEL                Model id (default gemini-1.5-flash)
    FNCALL_HTTP_TIMEOUT_SECS    Network timeout in seconds (default 30)
    FNCALL_EXCLUSION_MODE       skip | legacy
    RUST_LOG                    Log filter, e.g. api_fncall_bridge=debug"#
    );
}

fn cmd_version() {
    println!("fncall-cli {}", env!("CARGO_PKG_VERSION"));
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

async fn cmd_convert(args: &[String]) -> anyhow::Result<()> {
    let Some(source) = args.first() else {
        bail!("Usage: fncall-cli convert <file|url> [--legacy]");
    };
    let mut config = BridgeConfig::from_env()?;
    if args.iter().any(|a| a == "--legacy") {
        config.exclusion_mode = ExclusionMode::LegacyTruncate;
    }

    let description = if source.starts_with("http://") || source.starts_with("https://") {
        ApiDescription::fetch(source, &config.transport_options()).await?
    } else {
        ApiDescription::from_path(source).await?
    };

    let report = config.converter().convert_with_report(&description);
    for skipped in &report.skipped {
        eprintln!(
            "skipped {} {} ({}): {}",
            skipped.method,
            skipped.path,
            skipped.operation_id.as_deref().unwrap_or("-"),
            skipped.reason
        );
    }
    println!("{}", tools_to_json(&report.tools)?);
    Ok(())
}

async fn cmd_ask(args: &[String]) -> anyhow::Result<()> {
    let Some(query) = args.first() else {
        bail!("Usage: fncall-cli ask <query> [--config <file>] [--dry-run]");
    };
    let config = match flag_value(args, "--config") {
        Some(path) => BridgeConfig::from_path(path)
            .await
            .with_context(|| format!("loading config from {path}"))?,
        None => BridgeConfig::from_env()?,
    };

    let bridge = Bridge::from_config(&config, None).await?;
    eprintln!("{} tool(s) declared", bridge.tools().len());

    if args.iter().any(|a| a == "--dry-run") {
        match bridge.suggest(query).await? {
            FunctionCallOutcome::Call(call) => {
                println!("{}", serde_json::to_string_pretty(&call)?)
            }
            FunctionCallOutcome::NoCall { text, .. } => {
                println!("No function call suggested. {}", text.unwrap_or_default())
            }
        }
        return Ok(());
    }

    match bridge.run(query).await? {
        BridgeOutcome::Executed { call, body } => {
            eprintln!("called {} {}", call.name, serde_json::Value::Object(call.args));
            println!("{body}");
        }
        BridgeOutcome::NoCall { text } => {
            println!("No function call suggested. {}", text.unwrap_or_default())
        }
    }
    Ok(())
}
