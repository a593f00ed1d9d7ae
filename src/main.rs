use oddsportal_scraper::rules::SiteRules;
use oddsportal_scraper::{BrowserSession, CrawlOptions, Crawler, CsvSink, SessionConfig};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

const OUTPUT_PATH: &str = "matches.csv";

#[tokio::main]
async fn main() -> oddsportal_scraper::Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut sink = CsvSink::create(OUTPUT_PATH)?;
    let session = BrowserSession::launch(&SessionConfig::default()).await?;

    let crawler = Crawler::new(&session, SiteRules::default(), CrawlOptions::default());
    let outcome = crawler.run(&mut sink).await;

    // The browser closes exactly once, whatever the crawl outcome was.
    if let Err(e) = session.close().await {
        error!(error = %e, "failed to close browser");
    }

    match &outcome {
        Ok(()) => info!(path = OUTPUT_PATH, "crawl finished"),
        Err(e) => error!(error = %e, "crawl aborted"),
    }
    outcome
}
