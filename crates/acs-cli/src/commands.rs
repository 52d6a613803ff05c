//! Command handlers. Payloads go to stdout as pretty JSON; logs go to stderr.

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use acs_scraper::AcsService;

pub(crate) fn print_json<T: Serialize>(payload: &T) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(payload).context("failed to serialize payload")?;
    println!("{out}");
    Ok(())
}

pub(crate) async fn run_news(service: &AcsService, slug: &str) -> anyhow::Result<()> {
    let detail = service
        .get_news_detail(slug)
        .await
        .with_context(|| format!("news article '{slug}' is unavailable"))?;
    print_json(&detail)
}

pub(crate) async fn run_article(service: &AcsService, slug: &str) -> anyhow::Result<()> {
    let detail = service
        .get_article_detail(slug)
        .await
        .with_context(|| format!("article '{slug}' is unavailable"))?;
    print_json(&detail)
}

/// Reads `file`, or stdin when `None`, and prints the sanitized HTML.
pub(crate) async fn run_sanitize(service: &AcsService, file: Option<&Path>) -> anyhow::Result<()> {
    let raw = match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };
    println!("{}", service.sanitizer().sanitize(&raw));
    Ok(())
}

/// Primes every listing cache. Degraded entries are reported, not fatal, so
/// an offline build still completes.
pub(crate) async fn run_warm(service: &AcsService) -> anyhow::Result<()> {
    let report = service.warm_all().await;
    for entry in &report.entries {
        tracing::info!(key = %entry.key, source = ?entry.source, records = entry.records, "cache warmed");
    }
    if !report.all_live() {
        tracing::warn!("some pages were served from cache or local data");
    }
    print_json(&report)
}
