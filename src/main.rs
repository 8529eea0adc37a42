// PageSpeed journey runner
//
// Opens every URL given on the command line as its own journey context in a
// real browser, then scores each context through PageSpeed Insights.

use anyhow::{Context, Result, bail};
use clap::Parser;
use pagespeed_journey::{
    AuditModule, ChromiumPage, Journey, MemoryStorage, ModuleContext, ModuleEvent,
    ModuleEventBus, PageSpeedClient, PageSpeedConfig, PageSpeedModule, SqliteStorage,
    StorageSink, Strategy, TracingResultLogger, UrlWrapper, launch_browser,
    utils::DEFAULT_EVENT_BUS_CAPACITY,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "pagespeed-journey")]
#[command(about = "Score every context of a browsing journey with PageSpeed Insights", long_about = None)]
#[command(version)]
struct Cli {
    /// URLs to open, one journey context each
    #[arg(required = true)]
    urls: Vec<String>,

    /// Context names, matched to URLs by position (default: context-1, context-2, ...)
    #[arg(long = "context-name")]
    context_names: Vec<String>,

    /// Page reference reported in every result (default: first URL)
    #[arg(long)]
    page: Option<String>,

    /// PageSpeed Insights API key
    #[arg(long, env = "PAGESPEED_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Emulated device
    #[arg(long)]
    strategy: Option<Strategy>,

    /// Override the PageSpeed endpoint
    #[arg(long)]
    endpoint: Option<String>,

    /// Persist results into this SQLite database
    #[arg(long)]
    sqlite: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    headful: bool,
}

fn init_tracing() {
    let mut filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    for noisy in ["chromiumoxide::handler=off", "chromiumoxide::conn=off"] {
        if let Ok(directive) = noisy.parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn context_name(names: &[String], index: usize) -> String {
    names
        .get(index)
        .filter(|n| !n.trim().is_empty())
        .cloned()
        .unwrap_or_else(|| format!("context-{}", index + 1))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    if cli.context_names.len() > cli.urls.len() {
        bail!(
            "{} context names given for {} URLs",
            cli.context_names.len(),
            cli.urls.len()
        );
    }

    let mut builder = PageSpeedConfig::builder().with_env()?;
    if cli.api_key.is_some() {
        builder = builder.api_key(cli.api_key);
    }
    if let Some(endpoint) = cli.endpoint {
        builder = builder.endpoint(endpoint);
    }
    if cli.strategy.is_some() {
        builder = builder.strategy(cli.strategy);
    }
    let client = PageSpeedClient::new(builder.build()?)?;

    let page_ref = cli
        .page
        .as_deref()
        .or(cli.urls.first().map(String::as_str))
        .context("No page to analyse")?;
    let page_ref = UrlWrapper::parse(page_ref)?;
    tracing::info!("Scoring {} context(s) of {page_ref}", cli.urls.len());

    let storage: Arc<dyn StorageSink> = match &cli.sqlite {
        Some(path) => Arc::new(SqliteStorage::open(path).await?),
        None => Arc::new(MemoryStorage::new()),
    };

    let capacity =
        PageSpeedModule::events_per_pass(cli.urls.len()).max(DEFAULT_EVENT_BUS_CAPACITY);
    let event_bus = ModuleEventBus::new(capacity);
    let mut results = event_bus.subscribe_filtered(|e| matches!(e, ModuleEvent::OnResult { .. }));

    let context = ModuleContext::new(event_bus.clone(), storage, Arc::new(TracingResultLogger));
    let module = Arc::new(PageSpeedModule::new(context, Arc::new(client)));
    module.init().await?;

    let mut journey = Journey::new();
    module.clone().init_events(&mut journey);

    let session = launch_browser(!cli.headful, None).await?;

    journey.start().await?;
    for (index, url) in cli.urls.iter().enumerate() {
        let name = context_name(&cli.context_names, index);
        let page = session.open_page(url).await?;
        journey
            .new_context(&name, &ChromiumPage::new(page))
            .await
            .with_context(|| format!("Failed to track context {name}"))?;
    }

    module.analyse(&page_ref).await?;

    let drained = results.drain();
    if drained.missed > 0 {
        tracing::warn!(
            "{} events were lost before printing; every row is still in storage",
            drained.missed
        );
    }
    for event in &drained.events {
        if let Some(result) = event.result() {
            println!("{}", serde_json::to_string(result)?);
        }
    }

    tracing::debug!("{}", event_bus.get_metrics_report());
    session.close().await?;
    Ok(())
}
