//! Streaming record output.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::model::MatchRecord;

/// Destination for extracted match records.
pub trait RecordSink {
    fn write(&mut self, record: &MatchRecord) -> Result<()>;
}

/// Append-only CSV output with a fixed column schema.
///
/// Rows are flushed as they are written, so everything emitted before an
/// abort is on disk.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    include_year: bool,
}

impl CsvSink<File> {
    /// Create the output file and write the header row.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_writer(File::create(path)?)
    }
}

impl<W: Write> CsvSink<W> {
    pub fn from_writer(writer: W) -> Result<Self> {
        Self::build(writer, false)
    }

    /// Variant with a Year column between Tournament and Date.
    pub fn with_year_column(writer: W) -> Result<Self> {
        Self::build(writer, true)
    }

    fn build(writer: W, include_year: bool) -> Result<Self> {
        let mut writer = csv::Writer::from_writer(writer);
        let mut header = vec![
            "Country", "Tournament", "Date", "Time", "Player 1", "Player 2", "Score", "Odds",
        ];
        if include_year {
            header.insert(2, "Year");
        }
        writer.write_record(&header)?;
        writer.flush()?;
        Ok(Self {
            writer,
            include_year,
        })
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    fn write(&mut self, record: &MatchRecord) -> Result<()> {
        let mut row = vec![
            record.country.as_str(),
            record.tournament.as_str(),
            record.date.as_str(),
            record.time.as_str(),
            record.player1.as_str(),
            record.player2.as_str(),
            record.score.as_str(),
            record.odds.as_str(),
        ];
        if self.include_year {
            row.insert(2, record.year.as_str());
        }
        self.writer.write_record(&row)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> MatchRecord {
        MatchRecord {
            country: "Australia".to_string(),
            tournament: "ATP Australian Open".to_string(),
            year: "2023".to_string(),
            date: "20230116".to_string(),
            time: "09:00".to_string(),
            player1: "Djokovic N.".to_string(),
            player2: "Alcaraz C.".to_string(),
            score: "6 4 6 3".to_string(),
            odds: "1.44-2.75".to_string(),
        }
    }

    fn rendered<W: Write>(sink: CsvSink<W>) -> String
    where
        W: Into<Vec<u8>>,
    {
        let inner = sink.writer.into_inner().unwrap();
        String::from_utf8(inner.into()).unwrap()
    }

    #[test]
    fn writes_header_and_rows_in_schema_order() {
        let mut sink = CsvSink::from_writer(Vec::new()).unwrap();
        sink.write(&record()).unwrap();
        let output = rendered(sink);
        let mut lines = output.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Country,Tournament,Date,Time,Player 1,Player 2,Score,Odds"
        );
        assert_eq!(
            lines.next().unwrap(),
            "Australia,ATP Australian Open,20230116,09:00,Djokovic N.,Alcaraz C.,6 4 6 3,1.44-2.75"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn year_column_sits_between_tournament_and_date() {
        let mut sink = CsvSink::with_year_column(Vec::new()).unwrap();
        sink.write(&record()).unwrap();
        let output = rendered(sink);
        let mut lines = output.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Country,Tournament,Year,Date,Time,Player 1,Player 2,Score,Odds"
        );
        assert_eq!(
            lines.next().unwrap(),
            "Australia,ATP Australian Open,2023,20230116,09:00,Djokovic N.,Alcaraz C.,6 4 6 3,1.44-2.75"
        );
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        let mut sink = CsvSink::from_writer(Vec::new()).unwrap();
        let mut r = record();
        r.tournament = "Masters, Paris".to_string();
        sink.write(&r).unwrap();
        let output = rendered(sink);
        assert!(output.contains("\"Masters, Paris\""));
    }
}
