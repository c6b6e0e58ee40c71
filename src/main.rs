use std::io::Write;

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use serde_json::{Map, Value};
use swagger_actions::config::{DEFAULT_NAMESPACE, DEFAULT_SWAGGER_PATH};
use swagger_actions::{ApiDocument, ResponseData, Service, ServiceConfig};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

fn build_cli() -> Command {
    Command::new("swagger-actions")
        .about("Call any endpoint of a Swagger API by its synthesized action name")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .global(true)
                .default_value("http://localhost:5000/rest")
                .help("API base URL, or a bare host"),
        )
        .arg(
            Arg::new("swagger-path")
                .long("swagger-path")
                .global(true)
                .default_value(DEFAULT_SWAGGER_PATH)
                .help("Path of swagger.json relative to the base URL"),
        )
        .arg(
            Arg::new("namespace")
                .long("namespace")
                .global(true)
                .default_value(DEFAULT_NAMESPACE)
                .help("Path segment left out of action names"),
        )
        .arg(
            Arg::new("spec")
                .long("spec")
                .global(true)
                .help("Read the API document from a file instead of the server"),
        )
        .subcommand(Command::new("list").about("List synthesized actions"))
        .subcommand(
            Command::new("call")
                .about("Invoke an action")
                .arg(Arg::new("action").required(true).help("Action name"))
                .arg(
                    Arg::new("arg")
                        .long("arg")
                        .short('a')
                        .action(ArgAction::Append)
                        .help("Argument: key=value (repeatable)"),
                )
                .arg(
                    Arg::new("json-body")
                        .long("json")
                        .short('j')
                        .action(ArgAction::Set)
                        .help("Request body as JSON string"),
                ),
        )
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(filter);

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

async fn load_service(matches: &ArgMatches) -> Result<Service> {
    let mut config = ServiceConfig::default();
    if let Some(base_url) = matches.get_one::<String>("base-url") {
        config.set_base_url(base_url);
    }
    if let Some(path) = matches.get_one::<String>("swagger-path") {
        config = config.swagger_path(path.clone());
    }
    if let Some(namespace) = matches.get_one::<String>("namespace") {
        config = config.namespace(namespace.clone());
    }

    let mut service = Service::http(config).context("invalid base URL")?;
    match matches.get_one::<String>("spec") {
        Some(file) => {
            let text = std::fs::read_to_string(file)
                .with_context(|| format!("failed to read API document from {file}"))?;
            service.load_document(&ApiDocument::from_json_str(&text)?)?;
        }
        None => service.init().await?,
    }
    Ok(service)
}

/// `--arg key=value` pairs plus `--json` as the `body` argument.
fn build_args(matches: &ArgMatches) -> Result<Map<String, Value>> {
    let mut args = Map::new();

    if let Some(fields) = matches.get_many::<String>("arg") {
        for field in fields {
            let Some((key, val)) = field.split_once('=') else {
                bail!("invalid --arg format: {field} (expected key=value)");
            };
            // Try to parse as JSON value, fall back to string
            let json_val = serde_json::from_str(val).unwrap_or(Value::String(val.to_string()));
            args.insert(key.to_string(), json_val);
        }
    }

    if let Some(json_str) = matches.get_one::<String>("json-body") {
        let body: Value = serde_json::from_str(json_str).context("invalid JSON in --json argument")?;
        args.insert("body".to_string(), body);
    }

    Ok(args)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("list", sub)) => {
            let service = load_service(sub).await?;
            let mut out = std::io::stdout().lock();
            for (name, action) in service.actions() {
                writeln!(out, "{name}\t{}\t{}", action.verb(), action.path())?;
            }
        }
        Some(("call", sub)) => {
            let service = load_service(sub).await?;
            let action = sub
                .get_one::<String>("action")
                .context("missing action name")?;
            let args = build_args(sub)?;
            match service.call(action, &args).await? {
                ResponseData::Json(value) => {
                    println!("{}", serde_json::to_string_pretty(&value)?);
                }
                ResponseData::Binary(bytes) => std::io::stdout().lock().write_all(&bytes)?,
            }
        }
        _ => unreachable!("subcommand_required"),
    }

    Ok(())
}
