//! Page Attachments CLI
//!
//! Renders attachment templates against a JSON fixture of pages, users and
//! attachments. Rendered output goes to stdout, logs to stderr.

mod cli;
mod fixture;

use std::path::Path;

use anyhow::Context;
use clap::Parser;
use tokio::io::AsyncReadExt;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands};
use fixture::Fixture;
use pa_core::config::AppConfig;
use pa_tags::{Renderer, TagRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Commands::Render {
            fixture,
            page,
            template,
        } => {
            let config = AppConfig::from_env().unwrap_or_else(|e| {
                warn!("Failed to load config from env: {}, using defaults", e);
                AppConfig::default()
            });
            let output = render(&config, &fixture, page, &template).await?;
            print!("{}", output);
        }
        Commands::Tags => print!("{}", TagRegistry::with_attachment_tags().documentation()),
    }
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pa_tags=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .init();
}

async fn render(
    config: &AppConfig,
    fixture_path: &Path,
    page_id: Option<i64>,
    template_path: &Path,
) -> anyhow::Result<String> {
    let json = tokio::fs::read_to_string(fixture_path)
        .await
        .with_context(|| format!("failed to read fixture {}", fixture_path.display()))?;
    let fixture = Fixture::from_json(&json)?;
    let page = fixture.page(page_id)?;

    let template = if template_path == Path::new("-") {
        let mut template = String::new();
        tokio::io::stdin()
            .read_to_string(&mut template)
            .await
            .context("failed to read template from stdin")?;
        template
    } else {
        tokio::fs::read_to_string(template_path)
            .await
            .with_context(|| format!("failed to read template {}", template_path.display()))?
    };

    info!(
        page = %page.slug,
        storage = ?config.storage.backend,
        "Rendering template"
    );
    let renderer = Renderer::new(fixture.services(config).await?);
    renderer
        .render(&template, page)
        .await
        .context("failed to render template")
}
