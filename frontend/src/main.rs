//! Command-line driver for one search page session.

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use backend::{
    IndexConfig,
    api::{catalog::list_facet_catalog, search::HttpSearchExecutor},
};
use clap::Parser;
use common::{
    facet_options::{MEDIA_TYPE_OPTIONS, label_for},
    filter_state::{SearchMode, SortKey},
    search_result::SearchSnapshot,
};
use mediaverse_frontend::{BootstrapLoader, Message, SearchCoordinator, UpdateResult};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "mediaverse-search")]
#[command(about = "Run a faceted catalog search the way the search page does")]
struct Cli {
    /// Deep-link parameters, e.g. "q=dune&mediaType=Book&topics=history,space"
    #[arg(long, default_value = "")]
    params: String,

    /// Switch mode after bootstrap (items/media or collections/mixlists)
    #[arg(long)]
    mode: Option<SearchMode>,

    /// Sort order after bootstrap (relevance, dateAdded, rating, title)
    #[arg(long)]
    sort: Option<SortKey>,

    /// Page to show after bootstrap
    #[arg(long)]
    page: Option<u64>,

    /// Base URL of the catalog search API
    #[arg(long, env = "SEARCH_API_URL")]
    api_url: Option<String>,

    /// Round trip timeout in milliseconds
    #[arg(long, env = "SEARCH_API_TIMEOUT_MS")]
    timeout_ms: Option<u64>,

    /// Print the topic and genre catalogs instead of searching
    #[arg(long)]
    list_facets: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mediaverse_frontend=info,mediaverse_backend=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = IndexConfig::from_env();
    if let Some(api_url) = cli.api_url.clone() {
        config = IndexConfig::new(api_url).with_timeout(config.timeout);
    }
    if let Some(timeout_ms) = cli.timeout_ms.filter(|ms| *ms > 0) {
        config = config.with_timeout(Duration::from_millis(timeout_ms));
    }
    info!(base_url = %config.base_url, timeout_ms = config.timeout.as_millis() as u64, "using search API");

    let executor = HttpSearchExecutor::new(config).context("building search client")?;

    if cli.list_facets {
        let catalog = list_facet_catalog(executor.client(), executor.config()).await?;
        println!("topics ({}):", catalog.topics.len());
        for topic in &catalog.topics {
            println!("  {}", topic.name);
        }
        println!("genres ({}):", catalog.genres.len());
        for genre in &catalog.genres {
            println!("  {}", genre.name);
        }
        return Ok(());
    }

    let mut coordinator = SearchCoordinator::new(Arc::new(executor));

    coordinator.update(Message::BeginBootstrap);
    let loader = BootstrapLoader::from_query_string(&cli.params);
    coordinator.update(Message::BootstrapComplete(loader.load()));
    coordinator.settle().await;

    let follow_ups = [
        cli.mode.map(Message::SetMode),
        cli.sort.map(Message::SetSortKey),
        cli.page.map(Message::GoToPage),
    ];
    for message in follow_ups.into_iter().flatten() {
        if let UpdateResult::Dispatched { .. } = coordinator.update(message) {
            coordinator.settle().await;
        }
    }

    print_snapshot(&coordinator.snapshot());
    Ok(())
}

fn print_snapshot(snapshot: &SearchSnapshot) {
    if let Some(error) = &snapshot.error {
        println!("search failed: {error}");
    }
    if snapshot.is_empty_result() {
        println!("no {} match these filters", snapshot.mode);
        return;
    }
    println!(
        "{} {} found, page {} of {}",
        snapshot.total_found,
        snapshot.mode,
        snapshot.current_page,
        snapshot.total_pages.max(1)
    );
    for (i, record) in snapshot.records.iter().enumerate() {
        let kind = if record.is_collection {
            record.result_type.as_str()
        } else {
            label_for(MEDIA_TYPE_OPTIONS, &record.result_type)
        };
        let mut line = format!("{:>3}. [{kind}] {}", i + 1, record.title);
        if let Some(byline) = record.byline() {
            line.push_str(&format!(" / {byline}"));
        }
        if let Some(duration) = record.duration_label() {
            line.push_str(&format!(" ({duration})"));
        }
        if let Some(date) = record.date_added {
            line.push_str(&format!(", added {date}"));
        }
        println!("{line}");
    }
}
