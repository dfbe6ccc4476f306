//! Tenant Router
//!
//! An edge service in front of the web application that maps tenant URLs
//! onto internal application routes.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌──────────────────────────────────────────────────┐
//!                          │                  TENANT ROUTER                    │
//!                          │                                                   │
//!     Client Request       │  ┌──────────┐   ┌────────────┐   ┌────────────┐   │
//!     /acme-co/reports ────┼─▶│  http    │──▶│  routing   │──▶│  forward   │───┼──▶ Web app
//!                          │  │  server  │   │  engine    │   │  handler   │   │   /app/acme-co/reports
//!                          │  └──────────┘   └────────────┘   └─────┬──────┘   │
//!                          │                                        │          │
//!     Client Response      │        X-Tenant-Slug: acme-co          │          │
//!     ◀────────────────────┼─────── Set-Cookie: tenant-slug=acme-co ◀┘          │
//!                          │                                                   │
//!                          │  ┌──────────┐ ┌─────────────┐ ┌──────────────┐   │
//!                          │  │ config + │ │observability│ │ ops API      │   │
//!                          │  │ watcher  │ │ logs/metrics│ │ status/resolve│  │
//!                          │  └──────────┘ └─────────────┘ └──────────────┘   │
//!                          └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "tenant-router")]
#[command(about = "Path-based multi-tenant routing edge", long_about = None)]
struct Args {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    tenant_router::lifecycle::startup::run(args.config).await?;
    Ok(())
}
