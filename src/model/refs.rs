use url::Url;

use crate::error::Result;

const CURRENT_SEASON: &str = "Current";

/// Normalized URL of a tournament's results root.
///
/// Invariant: the URL always ends with `/results/`, whatever the trailing
/// slash state of the raw href was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TournamentRef(String);

impl TournamentRef {
    pub fn new(raw: &str) -> Self {
        Self(normalize_results_url(raw))
    }

    /// Resolve a possibly relative href against the page it came from.
    pub fn resolve(base: &Url, href: &str) -> Result<Self> {
        Ok(Self::new(base.join(href)?.as_str()))
    }

    pub fn url(&self) -> &str {
        &self.0
    }
}

/// Normalized URL of one season's results page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearRef(String);

impl YearRef {
    /// Resolve a season option value against the tournament page URL.
    pub fn resolve(base: &Url, href: &str) -> Result<Self> {
        Ok(Self(normalize_results_url(base.join(href)?.as_str())))
    }

    /// A tournament without a season selector is its own single season.
    pub fn from_tournament(tournament: &TournamentRef) -> Self {
        Self(tournament.url().to_string())
    }

    pub fn url(&self) -> &str {
        &self.0
    }

    /// Season label derived from the URL: the trailing hyphen-delimited
    /// token of the season path segment when purely numeric, otherwise
    /// `"Current"`.
    pub fn year_label(&self) -> String {
        let path = self.0.trim_end_matches('/');
        let path = path.strip_suffix("/results").unwrap_or(path);
        let segment = path.rsplit('/').next().unwrap_or_default();
        let token = segment.rsplit('-').next().unwrap_or_default();
        if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
            token.to_string()
        } else {
            CURRENT_SEASON.to_string()
        }
    }
}

fn normalize_results_url(raw: &str) -> String {
    let trimmed = raw.trim_end_matches('/');
    if trimmed.ends_with("/results") {
        format!("{trimmed}/")
    } else {
        format!("{trimmed}/results/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_bare_tournament_url() {
        let t = TournamentRef::new("https://www.oddsportal.com/tennis/argentina/atp-buenos-aires");
        assert_eq!(
            t.url(),
            "https://www.oddsportal.com/tennis/argentina/atp-buenos-aires/results/"
        );
    }

    #[test]
    fn normalization_ignores_trailing_slash_state() {
        let without = TournamentRef::new("https://www.oddsportal.com/tennis/x/y");
        let with = TournamentRef::new("https://www.oddsportal.com/tennis/x/y/");
        let already = TournamentRef::new("https://www.oddsportal.com/tennis/x/y/results/");
        let bare_suffix = TournamentRef::new("https://www.oddsportal.com/tennis/x/y/results");
        assert_eq!(without, with);
        assert_eq!(with, already);
        assert_eq!(already, bare_suffix);
        assert!(already.url().ends_with("/results/"));
    }

    #[test]
    fn resolves_relative_hrefs() {
        let base = Url::parse("https://www.oddsportal.com/tennis/results/").unwrap();
        let t = TournamentRef::resolve(&base, "/tennis/argentina/atp-buenos-aires/").unwrap();
        assert_eq!(
            t.url(),
            "https://www.oddsportal.com/tennis/argentina/atp-buenos-aires/results/"
        );
    }

    #[test]
    fn year_label_from_numeric_token() {
        let base = Url::parse("https://www.oddsportal.com/").unwrap();
        let year =
            YearRef::resolve(&base, "/tennis/australia/atp-australian-open-2023/results/").unwrap();
        assert_eq!(year.year_label(), "2023");
    }

    #[test]
    fn year_label_falls_back_to_current() {
        let tournament =
            TournamentRef::new("https://www.oddsportal.com/tennis/australia/atp-australian-open");
        let year = YearRef::from_tournament(&tournament);
        assert_eq!(year.url(), tournament.url());
        assert_eq!(year.year_label(), "Current");
    }
}
