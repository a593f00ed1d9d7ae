pub use crawler::{CrawlOptions, Crawler, Sport};
pub use error::{Result, ScrapeError};
pub use model::MatchRecord;
pub use session::{BrowserSession, SessionConfig};
pub use sink::{CsvSink, RecordSink};

pub mod crawler;
pub mod error;
pub mod extract;
pub mod model;
pub mod rules;
pub mod session;
pub mod sink;
