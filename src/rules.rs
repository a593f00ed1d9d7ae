//! Site-specific extraction rules.
//!
//! Every selector, structural position, and text format the crawl depends on
//! lives in one place, so a markup change on the site is a one-file edit.
//! The defaults match the current oddsportal.com markup.

#[derive(Debug, Clone)]
pub struct SiteRules {
    /// One expandable group per country on the root results listing.
    pub country_group: &'static str,
    /// Tournament links revealed inside an expanded country group.
    pub tournament_link: &'static str,
    /// OneTrust cookie consent button on first load.
    pub cookie_button: &'static str,
    /// Tournament page title element.
    pub title: &'static str,
    /// Trailing phrase stripped from the title to get the tournament name.
    pub title_suffix: &'static str,
    /// Breadcrumb links on a tournament page.
    pub breadcrumb_link: &'static str,
    /// Position of the country name among the breadcrumb links.
    pub breadcrumb_country_index: usize,
    /// `<option>` elements of the season selector, when one exists.
    pub season_option: &'static str,
    /// Container holding all match rows on a results page.
    pub matches_container: &'static str,
    /// One block per match inside the container.
    pub event_row: &'static str,
    /// Date label inside a row; most rows omit it.
    pub row_date: &'static str,
    /// Input format of the date label.
    pub row_date_format: &'static str,
    /// Start time paragraph inside a row.
    pub row_time: &'static str,
    /// Participant name paragraphs, in home/away order.
    pub participant: &'static str,
    /// Per-set score cells.
    pub set_score: &'static str,
    /// Odds values on the two outcome buttons.
    pub odds_value: &'static str,
}

impl Default for SiteRules {
    fn default() -> Self {
        Self {
            country_group: "ul.flex.content-start.w-full.text-xs.border-l",
            tournament_link: "li.flex.items-center a",
            cookie_button: "#onetrust-accept-btn-handler",
            title: "h1",
            title_suffix: " Results, Scores & Historical Odds",
            breadcrumb_link: "div.bg-gray-med_light ul.flex.items-center a",
            breadcrumb_country_index: 2,
            season_option: "div.breadcrumbs select option",
            matches_container: "div.flex.flex-col.px-3.text-sm",
            event_row: "div[class*=\"eventRow\"]",
            row_date: "div.text-black-main.font-main",
            row_date_format: "%d %b %Y",
            row_time: "div.flex.w-full p",
            participant: "a p.participant-name",
            set_score: "div.flex.gap-1.font-bold :is(div.hidden, div.font-bold)",
            odds_value: "div[data-testid=\"add-to-coupon-button\"] p",
        }
    }
}
