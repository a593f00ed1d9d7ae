use scraper::error::SelectorErrorKind;

/// All errors that can occur during a scrape run.
#[derive(thiserror::Error, Debug)]
pub enum ScrapeError {
    /// Browser launch or CDP transport failure.
    #[error("browser error: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),

    /// The browser configuration was rejected before launch.
    #[error("failed to build browser config: {0}")]
    BrowserConfig(String),

    /// An injected script returned something other than the expected shape.
    #[error("script evaluation failed: {context}")]
    Evaluation { context: &'static str },

    /// A bounded DOM wait elapsed without the selector matching.
    #[error("timed out after {timeout_secs}s waiting for `{selector}` on {url}")]
    WaitTimeout {
        selector: String,
        url: String,
        timeout_secs: u64,
    },

    /// A CSS selector string could not be parsed.
    #[error("invalid CSS selector: {0}")]
    Selector(String),

    /// A scraped href could not be resolved to an absolute URL.
    #[error("failed to resolve URL: {0}")]
    Url(#[from] url::ParseError),

    /// Writing a record to the output failed.
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// An expected HTML element was not found on the page.
    #[error("expected element not found: {context}")]
    ElementNotFound { context: &'static str },
}

impl<'a> From<SelectorErrorKind<'a>> for ScrapeError {
    fn from(err: SelectorErrorKind<'a>) -> Self {
        ScrapeError::Selector(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
