use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

use tenant_router::config::{load_config, RouterConfig};
use tenant_router::routing::{slugify, RouteTables, RoutingEngine};

#[derive(Parser)]
#[command(name = "tenant-cli")]
#[command(about = "Inspect and operate the tenant router", long_about = None)]
struct Cli {
    /// Ops API base URL.
    #[arg(short, long, default_value = "http://localhost:8081")]
    url: String,

    /// Ops API key.
    #[arg(short, long, default_value = "")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the routing rules for a path locally
    Resolve {
        path: String,
        /// Config file to take the rules from (defaults otherwise)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Derive an organization slug from a name
    Slugify {
        name: String,
        /// Config file to take reserved words and personal routes from
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Load and validate a config file
    CheckConfig { file: PathBuf },
    /// Query the running router's status
    Status,
    /// Ask the running router how it would route a path
    Explain { path: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve { path, config } => {
            let config = local_config(config)?;
            let engine = RoutingEngine::from_config(&config)?;
            print_json(&serde_json::to_value(engine.explain(&path))?)?;
        }
        Commands::Slugify { name, config } => {
            let tables = RouteTables::from_config(&local_config(config)?.tenancy);
            let slug = slugify(&name);
            let verdict = match tables.check_new_slug(&slug) {
                Ok(_) => json!({ "slug": slug, "valid": true }),
                Err(e) => json!({ "slug": slug, "valid": false, "error": e.to_string() }),
            };
            print_json(&verdict)?;
        }
        Commands::CheckConfig { file } => match load_config(&file) {
            Ok(_) => println!("{}: ok", file.display()),
            Err(e) => {
                eprintln!("{}: {}", file.display(), e);
                std::process::exit(1);
            }
        },
        Commands::Status => {
            let res = client(&cli.key)?.get(format!("{}/status", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Explain { path } => {
            let res = client(&cli.key)?
                .get(format!("{}/resolve", cli.url))
                .query(&[("path", path)])
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

fn local_config(file: Option<PathBuf>) -> Result<RouterConfig, Box<dyn std::error::Error>> {
    match file {
        Some(file) => Ok(load_config(&file)?),
        None => Ok(RouterConfig::default()),
    }
}

fn client(key: &str) -> Result<reqwest::Client, Box<dyn std::error::Error>> {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {key}"))?);
    Ok(reqwest::Client::builder().default_headers(headers).build()?)
}

fn print_json(value: &Value) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: ops API returned status {status}");
        if let Ok(text) = res.text().await {
            eprintln!("Response: {text}");
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    print_json(&json)
}
