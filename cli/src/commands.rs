use anyhow::{bail, Context, Result};
use plagscan_browser::BrowserEngine;
use plagscan_core::{AppConfig, SiteId};
use plagscan_crawler::{CrawlOrchestrator, CrawlOutcome, CrawlRequest, CrawlResponse, SessionPool};
use plagscan_site::{SiteLoader, SiteRegistry};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub struct CheckArgs {
    pub text: Option<String>,
    pub file: Option<PathBuf>,
    pub site: Option<String>,
    pub deadline_secs: Option<u64>,
    pub headful: bool,
    pub report: bool,
    pub definitions: Option<PathBuf>,
}

/// Where user definitions come from: the flag, then the config, then
/// `sites/` under the data directory if it exists.
fn definitions_dir(
    config: &AppConfig,
    definitions: Option<&Path>,
    data_dir: Option<PathBuf>,
) -> Option<PathBuf> {
    definitions
        .map(Path::to_path_buf)
        .or_else(|| config.crawler.definitions_dir.clone())
        .or_else(|| data_dir.map(|dir| dir.join("sites")).filter(|dir| dir.is_dir()))
}

/// Built-in definitions plus whatever the definitions directory provides.
fn registry(config: &AppConfig, definitions: Option<&Path>) -> Result<SiteRegistry> {
    let dir = definitions_dir(config, definitions, AppConfig::data_dir().ok());

    let loader = match dir {
        Some(dir) => Some(
            SiteLoader::new(dir.clone())
                .with_context(|| format!("definitions directory {}", dir.display()))?,
        ),
        None => SiteLoader::with_default_dir().ok(),
    };

    match loader {
        Some(loader) => Ok(SiteRegistry::load_from(&loader)?),
        None => Ok(SiteRegistry::with_builtins()),
    }
}

fn read_text(args: &CheckArgs) -> Result<String> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }
    if let Some(path) = &args.file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path.display()));
    }

    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("could not read text from standard input")?;
    if text.trim().is_empty() {
        bail!("no text given; use --text, --file or pipe it on standard input");
    }
    Ok(text)
}

/// Exit status for an outcome: 0 for a verdict, 2 for rejected input, 1 otherwise.
fn exit_status(outcome: &CrawlOutcome) -> u8 {
    match outcome.http_status() {
        200 | 404 => 0,
        400 => 2,
        _ => 1,
    }
}

fn exit_code(outcome: &CrawlOutcome) -> ExitCode {
    ExitCode::from(exit_status(outcome))
}

pub async fn check(args: CheckArgs) -> Result<ExitCode> {
    let mut config = AppConfig::load_with_env().context("could not load configuration")?;
    if args.headful {
        config.browser.headless = false;
    }

    let registry = registry(&config, args.definitions.as_deref())?;
    let site_id = SiteId::new(args.site.as_deref().unwrap_or(&config.crawler.default_site))?;
    let site = registry.get(&site_id)?;
    let text = read_text(&args)?;

    let deadline = config.crawler.resolve_deadline(args.deadline_secs.map(Duration::from_secs));
    let request = match CrawlRequest::new(&text, deadline) {
        Ok(request) => request,
        Err(violation) => {
            let outcome = CrawlOutcome::Failed(violation.into());
            println!("{}", serde_json::to_string_pretty(&CrawlResponse::from(&outcome))?);
            return Ok(exit_code(&outcome));
        }
    };

    let engine = Arc::new(
        BrowserEngine::launch(&config.browser)
            .await
            .context("could not launch the browser")?,
    );
    let pool = SessionPool::new(Arc::clone(&engine), config.crawler.max_concurrent_sessions);
    let crawler = CrawlOrchestrator::new(pool, site, config.crawler.clone());

    let cancel = CancellationToken::new();
    let ctrl_c = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupted, cancelling crawl");
                cancel.cancel();
            }
        }
    });

    info!(site = %site_id, chars = request.len(), deadline = ?request.deadline(), "checking text");
    let report = crawler.run(request, cancel).await;
    ctrl_c.abort();

    let output = if args.report {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string_pretty(&report.response())?
    };
    println!("{output}");

    drop(crawler);
    match Arc::try_unwrap(engine) {
        Ok(engine) => engine.shutdown().await,
        Err(_) => info!("browser still referenced, leaving it to drop"),
    }

    Ok(exit_code(&report.outcome))
}

pub fn sites(definitions: Option<&Path>) -> Result<ExitCode> {
    let config = AppConfig::load_with_env().unwrap_or_default();
    let registry = registry(&config, definitions)?;

    for site in registry.get_all() {
        println!("{:<20} {:<20} {}", site.id().as_str(), site.name(), site.url());
    }
    Ok(ExitCode::SUCCESS)
}
