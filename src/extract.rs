//! Pure extraction over captured documents.
//!
//! Everything here is a function of document content only, so a year page
//! snapshot always parses to the same records.

use chrono::NaiveDate;
use itertools::Itertools;
use scraper::{ElementRef, Html, Selector};

use crate::error::{Result, ScrapeError};
use crate::model::SENTINEL;
use crate::rules::SiteRules;

const DATE_OUTPUT_FORMAT: &str = "%Y%m%d";

/// Field values extracted from a single match row, before the crawl context
/// (country, tournament, season) is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFields {
    pub date: String,
    pub time: String,
    pub player1: String,
    pub player2: String,
    pub score: String,
    pub odds: String,
}

/// Number of country groups on the root results listing.
pub fn country_group_count(document: &Html, rules: &SiteRules) -> Result<usize> {
    let selector = Selector::parse(rules.country_group)?;
    Ok(document.select(&selector).count())
}

/// Raw tournament hrefs inside the country group at `group_index`.
pub fn tournament_hrefs(
    document: &Html,
    rules: &SiteRules,
    group_index: usize,
) -> Result<Vec<String>> {
    let group_selector = Selector::parse(rules.country_group)?;
    let link_selector = Selector::parse(rules.tournament_link)?;
    let group = document
        .select(&group_selector)
        .nth(group_index)
        .ok_or(ScrapeError::ElementNotFound {
            context: "country group",
        })?;
    Ok(group
        .select(&link_selector)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| !href.is_empty())
        .map(str::to_string)
        .collect())
}

/// Country and tournament display names from a tournament page.
///
/// The country name is taken from the breadcrumb link at the configured
/// position, the tournament name from the title with its fixed suffix
/// stripped. Each falls back to the sentinel on its own; neither failure
/// affects the other.
pub fn tournament_header(document: &Html, rules: &SiteRules) -> (String, String) {
    let root = document.root_element();

    let country = Selector::parse(rules.breadcrumb_link)
        .ok()
        .and_then(|selector| {
            root.select(&selector)
                .nth(rules.breadcrumb_country_index)
                .map(full_text)
        })
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| SENTINEL.to_string());

    let tournament = Selector::parse(rules.title)
        .ok()
        .and_then(|selector| root.select(&selector).next().map(full_text))
        .map(|title| title.replace(rules.title_suffix, "").trim().to_string())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| SENTINEL.to_string());

    (country, tournament)
}

/// Raw season option values from the tournament page, in document order.
/// Empty when the tournament has no season selector.
pub fn season_urls(document: &Html, rules: &SiteRules) -> Vec<String> {
    let Ok(selector) = Selector::parse(rules.season_option) else {
        return Vec::new();
    };
    document
        .select(&selector)
        .filter_map(|option| option.value().attr("value"))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse every match row on a year page.
///
/// The carried date threads through the row sequence as a fold accumulator:
/// a row with a parsable date label updates it, any other row reuses it.
/// Zero rows is an empty vec, not an error.
pub fn year_page_records(document: &Html, rules: &SiteRules) -> Result<Vec<RowFields>> {
    let container_selector = Selector::parse(rules.matches_container)?;
    let container =
        document
            .select(&container_selector)
            .next()
            .ok_or(ScrapeError::ElementNotFound {
                context: "matches container",
            })?;

    let row_selector = Selector::parse(rules.event_row)?;
    let selectors = RowSelectors::compile(rules)?;

    let (records, _) = container.select(&row_selector).fold(
        (Vec::new(), SENTINEL.to_string()),
        |(mut records, carried), row| {
            let (fields, carried) = parse_row(row, &selectors, rules.row_date_format, carried);
            records.push(fields);
            (records, carried)
        },
    );
    Ok(records)
}

struct RowSelectors {
    date: Selector,
    time: Selector,
    participant: Selector,
    set_score: Selector,
    odds: Selector,
}

impl RowSelectors {
    fn compile(rules: &SiteRules) -> Result<Self> {
        Ok(Self {
            date: Selector::parse(rules.row_date)?,
            time: Selector::parse(rules.row_time)?,
            participant: Selector::parse(rules.participant)?,
            set_score: Selector::parse(rules.set_score)?,
            odds: Selector::parse(rules.odds_value)?,
        })
    }
}

/// Extract one row. Every field falls back to the sentinel on its own;
/// the date falls back to the carried value instead.
fn parse_row(
    row: ElementRef,
    selectors: &RowSelectors,
    date_format: &str,
    carried: String,
) -> (RowFields, String) {
    let carried = row_date(row, &selectors.date, date_format).unwrap_or(carried);

    let time = non_empty_or_sentinel(select_text(row, &selectors.time));

    let mut participants = row
        .select(&selectors.participant)
        .map(own_text)
        .filter(|name| !name.is_empty());
    let player1 = participants.next().unwrap_or_else(|| SENTINEL.to_string());
    let player2 = participants.next().unwrap_or_else(|| SENTINEL.to_string());

    let score = non_empty_or_sentinel(
        row.select(&selectors.set_score)
            .map(own_text)
            .filter(|set| !set.is_empty())
            .join(" "),
    );

    let odds = row
        .select(&selectors.odds)
        .map(own_text)
        .filter(|value| !value.is_empty())
        .next_tuple()
        .map(|(home, away)| format!("{home}-{away}"))
        .unwrap_or_else(|| format!("{SENTINEL}-{SENTINEL}"));

    let fields = RowFields {
        date: carried.clone(),
        time,
        player1,
        player2,
        score,
        odds,
    };
    (fields, carried)
}

/// The row's date label reformatted to `YYYYMMDD`, or `None` when the label
/// is absent or unparsable.
fn row_date(row: ElementRef, selector: &Selector, format: &str) -> Option<String> {
    let raw = select_text(row, selector);
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(&raw, format)
        .ok()
        .map(|date| date.format(DATE_OUTPUT_FORMAT).to_string())
}

/// All text under `element`, concatenated and trimmed.
fn full_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Trimmed text of the first non-empty text node under `element`.
fn own_text(element: ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .find(|text| !text.is_empty())
        .unwrap_or_default()
        .replace(['\n', '\t'], "")
}

/// Text of the first element matching `selector` inside `scope`, or an
/// empty string when nothing matches.
fn select_text(scope: ElementRef, selector: &Selector) -> String {
    scope.select(selector).next().map(own_text).unwrap_or_default()
}

fn non_empty_or_sentinel(value: String) -> String {
    if value.is_empty() {
        SENTINEL.to_string()
    } else {
        value
    }
}
