use serde::Serialize;

/// Fallback value for any field whose extraction fails.
pub const SENTINEL: &str = "N/A";

/// One extracted match, the unit of output.
///
/// Every field is a display string: `date` is an 8-digit `YYYYMMDD` value
/// (or the sentinel), `score` is a space-joined list of set scores, and
/// `odds` is the two outcome odds joined with a hyphen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    pub country: String,
    pub tournament: String,
    pub year: String,
    pub date: String,
    pub time: String,
    pub player1: String,
    pub player2: String,
    pub score: String,
    pub odds: String,
}
