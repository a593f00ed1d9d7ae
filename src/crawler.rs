//! Hierarchical traversal: country → tournament → season → match rows.
//!
//! Failure isolation follows one rule: a failure while processing a
//! country, tournament, or season page is logged and skips to the next
//! sibling; only the root listing never rendering aborts the run.

use scraper::Html;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::error::Result;
use crate::extract;
use crate::model::{MatchRecord, TournamentRef, YearRef};
use crate::rules::SiteRules;
use crate::session::BrowserSession;
use crate::sink::RecordSink;

/// Which oddsportal sport archive to crawl.
#[derive(Debug, Clone, Copy, strum_macros::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Sport {
    Tennis,
    Football,
    Basketball,
    Baseball,
    Hockey,
    Volleyball,
}

impl Sport {
    /// Root results listing for this sport.
    pub fn results_url(self) -> String {
        format!("https://www.oddsportal.com/{self}/results/")
    }
}

/// Traversal settings.
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub sport: Sport,
    /// Stop after this many country groups; `None` crawls them all.
    pub country_limit: Option<usize>,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            sport: Sport::Tennis,
            country_limit: None,
        }
    }
}

/// Drives one browser session through the whole results hierarchy.
pub struct Crawler<'a> {
    session: &'a BrowserSession,
    rules: SiteRules,
    options: CrawlOptions,
}

impl<'a> Crawler<'a> {
    pub fn new(session: &'a BrowserSession, rules: SiteRules, options: CrawlOptions) -> Self {
        Self {
            session,
            rules,
            options,
        }
    }

    /// Walk the full hierarchy and stream every match record into `sink`.
    #[instrument(skip(self, sink))]
    pub async fn run<S: RecordSink>(&self, sink: &mut S) -> Result<()> {
        let root = self.options.sport.results_url();
        self.load_root(&root).await?;

        let document = self.session.document().await?;
        let total = extract::country_group_count(&document, &self.rules)?;
        let limit = self.options.country_limit.unwrap_or(total).min(total);
        info!(total, limit, "found country groups");

        for index in 0..limit {
            // Tournament navigation left the root listing, so each country
            // starts from a fresh copy of it.
            if index > 0 {
                if let Err(e) = self.load_root(&root).await {
                    warn!(country = index, error = %e, "could not return to root listing");
                    continue;
                }
            }
            if let Err(e) = self.crawl_country(index, sink).await {
                warn!(country = index, error = %e, "skipping country");
            }
        }
        Ok(())
    }

    /// Load the root listing and wait for the country groups. A timeout on
    /// the first call is the one fatal error of the run.
    async fn load_root(&self, root: &str) -> Result<()> {
        self.session.goto(root).await?;
        self.session.wait_for(self.rules.country_group).await?;
        // The consent banner swallows synthetic clicks while visible;
        // its absence is fine.
        if self
            .session
            .click_nth(self.rules.cookie_button, 0)
            .await
            .is_ok()
        {
            debug!("accepted cookie consent");
        }
        Ok(())
    }

    async fn crawl_country<S: RecordSink>(&self, index: usize, sink: &mut S) -> Result<()> {
        self.session.click_nth(self.rules.country_group, index).await?;
        self.session.wait_for(self.rules.tournament_link).await?;

        let document = self.session.document().await?;
        let base = Url::parse(&self.session.current_url().await)?;
        let tournaments = resolve_tournaments(&document, &self.rules, index, &base)?;
        info!(country = index, count = tournaments.len(), "collected tournament links");

        if let Err(e) = self.session.click_nth(self.rules.country_group, index).await {
            warn!(country = index, error = %e, "failed to collapse country group");
        }

        for tournament in &tournaments {
            if let Err(e) = self.crawl_tournament(tournament, sink).await {
                warn!(url = tournament.url(), error = %e, "skipping tournament");
            }
        }
        Ok(())
    }

    async fn crawl_tournament<S: RecordSink>(
        &self,
        tournament: &TournamentRef,
        sink: &mut S,
    ) -> Result<()> {
        self.session.goto(tournament.url()).await?;
        self.session.wait_for(self.rules.title).await?;

        let document = self.session.document().await?;
        let (country, name) = extract::tournament_header(&document, &self.rules);
        info!(country = %country, tournament = %name, "processing tournament");

        let years = resolve_years(&document, &self.rules, tournament)?;
        for year in &years {
            if let Err(e) = self.crawl_year(&country, &name, year, sink).await {
                warn!(url = year.url(), error = %e, "skipping season");
            }
        }
        Ok(())
    }

    async fn crawl_year<S: RecordSink>(
        &self,
        country: &str,
        tournament: &str,
        year: &YearRef,
        sink: &mut S,
    ) -> Result<()> {
        self.session.goto(year.url()).await?;
        self.session.wait_for(self.rules.matches_container).await?;

        let document = self.session.document().await?;
        let rows = extract::year_page_records(&document, &self.rules)?;
        let label = year.year_label();
        info!(url = year.url(), rows = rows.len(), year = %label, "extracted match rows");

        for fields in rows {
            sink.write(&MatchRecord {
                country: country.to_string(),
                tournament: tournament.to_string(),
                year: label.clone(),
                date: fields.date,
                time: fields.time,
                player1: fields.player1,
                player2: fields.player2,
                score: fields.score,
                odds: fields.odds,
            })?;
        }
        Ok(())
    }
}

fn resolve_tournaments(
    document: &Html,
    rules: &SiteRules,
    group_index: usize,
    base: &Url,
) -> Result<Vec<TournamentRef>> {
    let hrefs = extract::tournament_hrefs(document, rules, group_index)?;
    Ok(hrefs
        .iter()
        .filter_map(|href| match TournamentRef::resolve(base, href) {
            Ok(tournament) => Some(tournament),
            Err(e) => {
                warn!(href = %href, error = %e, "unresolvable tournament link");
                None
            }
        })
        .collect())
}

fn resolve_years(
    document: &Html,
    rules: &SiteRules,
    tournament: &TournamentRef,
) -> Result<Vec<YearRef>> {
    let base = Url::parse(tournament.url())?;
    let years: Vec<YearRef> = extract::season_urls(document, rules)
        .iter()
        .filter_map(|value| match YearRef::resolve(&base, value) {
            Ok(year) => Some(year),
            Err(e) => {
                warn!(value = %value, error = %e, "unresolvable season option");
                None
            }
        })
        .collect();
    // Every tournament yields at least one season page.
    if years.is_empty() {
        Ok(vec![YearRef::from_tournament(tournament)])
    } else {
        Ok(years)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sport_maps_to_results_url() {
        assert_eq!(
            Sport::Tennis.results_url(),
            "https://www.oddsportal.com/tennis/results/"
        );
        assert_eq!(
            Sport::Basketball.results_url(),
            "https://www.oddsportal.com/basketball/results/"
        );
    }

    #[test]
    fn tournaments_resolve_against_the_listing_url() {
        let document = Html::parse_document(
            r#"<ul class="flex content-start w-full text-xs border-l">
                 <li class="flex items-center"><a href="/tennis/argentina/atp-buenos-aires/">ATP Buenos Aires</a></li>
                 <li class="flex items-center"><a href="/tennis/argentina/challenger-tigre">Challenger Tigre</a></li>
               </ul>"#,
        );
        let base = Url::parse("https://www.oddsportal.com/tennis/results/").unwrap();
        let tournaments =
            resolve_tournaments(&document, &SiteRules::default(), 0, &base).unwrap();
        assert_eq!(
            tournaments,
            vec![
                TournamentRef::new("https://www.oddsportal.com/tennis/argentina/atp-buenos-aires"),
                TournamentRef::new("https://www.oddsportal.com/tennis/argentina/challenger-tigre"),
            ]
        );
    }

    #[test]
    fn tournament_without_season_selector_is_its_own_year() {
        let document = Html::parse_document("<html><body><h1>WTA Linz</h1></body></html>");
        let tournament = TournamentRef::new("https://www.oddsportal.com/tennis/austria/wta-linz");
        let years = resolve_years(&document, &SiteRules::default(), &tournament).unwrap();
        assert_eq!(years, vec![YearRef::from_tournament(&tournament)]);
        assert_eq!(years[0].url(), tournament.url());
        assert_eq!(years[0].year_label(), "Current");
    }

    #[test]
    fn season_options_become_year_refs() {
        let document = Html::parse_document(
            r#"<div class="breadcrumbs"><select>
                 <option value="/tennis/austria/wta-linz/results/">2024</option>
                 <option value="/tennis/austria/wta-linz-2023/results/">2023</option>
               </select></div>"#,
        );
        let tournament = TournamentRef::new("https://www.oddsportal.com/tennis/austria/wta-linz");
        let years = resolve_years(&document, &SiteRules::default(), &tournament).unwrap();
        assert_eq!(years.len(), 2);
        assert_eq!(
            years[0].url(),
            "https://www.oddsportal.com/tennis/austria/wta-linz/results/"
        );
        assert_eq!(years[1].year_label(), "2023");
    }
}
