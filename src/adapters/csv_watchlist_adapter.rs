//! CSV file watchlist adapter.

use super::csv_file;
use crate::domain::article::Sentiment;
use crate::domain::error::{LedgerError, ParseLabelError};
use crate::domain::trade::Action;
use crate::domain::watchlist::{Stance, TrackedPosition, Watchlist};
use crate::ports::watchlist_port::WatchlistPort;
use std::fs;
use std::path::PathBuf;

const HEADER: [&str; 5] = ["title", "stance", "investment_size", "sentiment", "recommendation"];

fn parse_label<T>(
    row: usize,
    value: &str,
    from_label: fn(&str) -> Result<T, ParseLabelError>,
) -> Result<T, LedgerError> {
    from_label(value).map_err(|e| LedgerError::malformed(row, e.to_string()))
}

fn parse_size(row: usize, value: &str) -> Result<f64, LedgerError> {
    let size = value
        .trim()
        .parse::<f64>()
        .map_err(|e| LedgerError::malformed(row, format!("invalid investment_size: {e}")))?;
    if !size.is_finite() || size < 0.0 {
        return Err(LedgerError::malformed(
            row,
            format!("investment_size {size} is not a non-negative amount"),
        ));
    }
    Ok(size)
}

pub struct CsvWatchlistAdapter {
    path: PathBuf,
}

impl CsvWatchlistAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl WatchlistPort for CsvWatchlistAdapter {
    fn load(&self) -> Result<Watchlist, LedgerError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Watchlist::new()),
            Err(e) => return Err(LedgerError::storage(&self.path, e)),
        };

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut positions = Vec::new();

        for (row, result) in rdr.records().enumerate() {
            let record =
                result.map_err(|e| LedgerError::malformed(row, format!("CSV parse error: {e}")))?;
            let field = |i: usize| {
                record
                    .get(i)
                    .ok_or_else(|| LedgerError::malformed(row, format!("missing {} column", HEADER[i])))
            };

            positions.push(TrackedPosition {
                title: field(0)?.to_string(),
                stance: parse_label(row, field(1)?, Stance::from_label)?,
                investment_size: parse_size(row, field(2)?)?,
                sentiment: parse_label(row, field(3)?, Sentiment::from_label)?,
                recommendation: parse_label(row, field(4)?, Action::from_label)?,
            });
        }

        Ok(Watchlist::from(positions))
    }

    fn save(&self, watchlist: &Watchlist) -> Result<(), LedgerError> {
        csv_file::write_atomically(
            &self.path,
            &HEADER,
            watchlist.positions().iter().map(|p| {
                [
                    p.title.clone(),
                    p.stance.label().to_string(),
                    p.investment_size.to_string(),
                    p.sentiment.label().to_string(),
                    p.recommendation.label().to_string(),
                ]
            }),
        )?;

        tracing::info!(path = %self.path.display(), tracked = watchlist.len(), "saved watchlist");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HEADER_LINE: &str = "title,stance,investment_size,sentiment,recommendation\n";

    fn load_from(content: &str) -> Result<Watchlist, LedgerError> {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("watchlist.csv");
        fs::write(&path, content).unwrap();
        CsvWatchlistAdapter::new(path).load()
    }

    fn position(title: &str, stance: Stance) -> TrackedPosition {
        TrackedPosition {
            title: title.into(),
            stance,
            investment_size: 1250.5,
            sentiment: Sentiment::Positive,
            recommendation: Action::Buy,
        }
    }

    #[test]
    fn missing_file_is_empty_watchlist() {
        let dir = TempDir::new().unwrap();
        let adapter = CsvWatchlistAdapter::new(dir.path().join("watchlist.csv"));
        assert!(adapter.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let adapter = CsvWatchlistAdapter::new(dir.path().join("watchlist.csv"));
        let list = Watchlist::from(vec![
            position("Apple stock on the rise", Stance::Buy),
            position("Tesla faces challenges", Stance::Hold),
        ]);

        adapter.save(&list).unwrap();
        assert_eq!(adapter.load().unwrap(), list);
    }

    #[test]
    fn bad_stance_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("watchlist.csv");
        fs::write(
            &path,
            "title,stance,investment_size,sentiment,recommendation\nA,Short,1.00,Positive,Buy\n",
        )
        .unwrap();
        let err = CsvWatchlistAdapter::new(path).load().unwrap_err();
        assert!(matches!(err, LedgerError::MalformedRecord { row: 0, .. }));
    }

    #[test]
    fn size_keeps_full_precision() {
        let dir = TempDir::new().unwrap();
        let adapter = CsvWatchlistAdapter::new(dir.path().join("watchlist.csv"));
        let mut precise = position("Apple", Stance::Buy);
        precise.investment_size = 1234.5678;
        let mut tiny = position("Tesla", Stance::Sell);
        tiny.investment_size = 0.001;
        let list = Watchlist::from(vec![precise, tiny]);

        adapter.save(&list).unwrap();
        assert_eq!(adapter.load().unwrap(), list);
    }

    #[test]
    fn save_replaces_file_without_leaving_temp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("watchlist.csv");
        let adapter = CsvWatchlistAdapter::new(path.clone());

        adapter
            .save(&Watchlist::from(vec![position("A", Stance::Buy), position("B", Stance::Hold)]))
            .unwrap();
        adapter.save(&Watchlist::from(vec![position("B", Stance::Hold)])).unwrap();

        assert_eq!(adapter.load().unwrap().titles(), vec!["B"]);
        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["watchlist.csv"]);
    }

    #[test]
    fn failed_save_keeps_previous_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("watchlist.csv");
        let adapter = CsvWatchlistAdapter::new(path.clone());
        adapter.save(&Watchlist::from(vec![position("A", Stance::Buy)])).unwrap();
        let before = fs::read(&path).unwrap();

        fs::create_dir(csv_file::temp_path(&path)).unwrap();
        fs::write(csv_file::temp_path(&path).join("blocker"), "x").unwrap();
        assert!(adapter.save(&Watchlist::new()).is_err());
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn negative_or_non_finite_size_is_malformed() {
        for size in ["-5", "NaN", "inf", "abc"] {
            let err = load_from(&format!("{HEADER_LINE}A,Buy,{size},Positive,Buy\n")).unwrap_err();
            assert!(
                matches!(err, LedgerError::MalformedRecord { row: 0, .. }),
                "size {size} gave {err}"
            );
        }
    }

    #[test]
    fn stored_labels_must_be_canonical() {
        assert!(load_from(&format!("{HEADER_LINE}A,Buy,1,Positive,Buy\n")).is_ok());
        for row in [
            "A,buy,1,Positive,Buy",
            "A,Buy,1,positive,Buy",
            "A,Buy,1,Positive,BUY",
            "A, Hold,1,Positive,Buy",
        ] {
            let err = load_from(&format!("{HEADER_LINE}{row}\n")).unwrap_err();
            assert!(matches!(err, LedgerError::MalformedRecord { row: 0, .. }), "{row}");
        }
    }
}
