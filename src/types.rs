use std::cmp::Ordering;
use std::collections::HashSet;

use crate::constants::COLUMNS;

/// One extracted listing entry. Strategies only emit records with a title;
/// every other field is independently optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub rating: Option<f64>,
    pub votes: Option<u64>,
}

impl Record {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn with_year(mut self, year: Option<i32>) -> Self {
        self.year = year;
        self
    }

    pub fn with_rating(mut self, rating: Option<f64>) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_votes(mut self, votes: Option<u64>) -> Self {
        self.votes = votes;
        self
    }

    /// Identity used to spot repeated items: lowercase trimmed title plus year.
    fn dedup_key(&self) -> (String, Option<i32>) {
        let title = self.title.as_deref().unwrap_or("").trim().to_lowercase();
        (title, self.year)
    }

    /// True when no field carries a value. An empty title counts as absent.
    pub fn is_blank(&self) -> bool {
        self.title.as_deref().map_or(true, str::is_empty)
            && self.year.is_none()
            && self.rating.is_none()
            && self.votes.is_none()
    }

    /// Field values rendered as text, in column order. Absent values are `None`.
    pub fn cells(&self) -> [Option<String>; 4] {
        [
            self.title.clone().filter(|t| !t.is_empty()),
            self.year.map(|y| y.to_string()),
            self.rating.map(|r| r.to_string()),
            self.votes.map(|v| v.to_string()),
        ]
    }
}

/// Rows in column order [`COLUMNS`]. Built once per pipeline run, then
/// only read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    rows: Vec<Record>,
}

impl Table {
    /// Drops blank rows and repeats of an earlier title/year, then applies
    /// the rating/votes ordering.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut seen = HashSet::new();
        let mut rows: Vec<Record> = records
            .into_iter()
            .filter(|r| !r.is_blank())
            .filter(|r| seen.insert(r.dedup_key()))
            .collect();
        // sort_by is stable: equal keys keep the order strategies emitted them in
        rows.sort_by(|a, b| {
            descending_absent_last(a.rating, b.rating, f64::total_cmp)
                .then_with(|| descending_absent_last(a.votes, b.votes, u64::cmp))
        });
        Self { rows }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &COLUMNS
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn descending_absent_last<T>(
    a: Option<T>,
    b: Option<T>,
    cmp: impl Fn(&T, &T) -> Ordering,
) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => cmp(&y, &x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(table: &Table) -> Vec<&str> {
        table
            .rows()
            .iter()
            .map(|r| r.title.as_deref().unwrap_or(""))
            .collect()
    }

    #[test]
    fn sorts_by_rating_then_votes_with_absent_last() {
        let table = Table::from_records(vec![
            Record::new("a").with_rating(Some(7.2)).with_votes(Some(100)),
            Record::new("b").with_votes(Some(50)),
            Record::new("c").with_rating(Some(9.1)).with_votes(Some(200)),
            Record::new("d").with_rating(Some(9.1)).with_votes(Some(200)),
        ]);
        assert_eq!(titles(&table), vec!["c", "d", "a", "b"]);
    }

    #[test]
    fn votes_break_rating_ties() {
        let table = Table::from_records(vec![
            Record::new("few").with_rating(Some(8.0)).with_votes(Some(10)),
            Record::new("none").with_rating(Some(8.0)),
            Record::new("many").with_rating(Some(8.0)).with_votes(Some(10_000)),
        ]);
        assert_eq!(titles(&table), vec!["many", "few", "none"]);
    }

    #[test]
    fn blank_rows_are_dropped_but_title_only_rows_stay() {
        let table = Table::from_records(vec![
            Record::default(),
            Record::new("Only a title"),
            Record {
                title: Some(String::new()),
                ..Default::default()
            },
        ]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].title.as_deref(), Some("Only a title"));
    }

    #[test]
    fn repeated_title_and_year_keeps_first_occurrence() {
        let table = Table::from_records(vec![
            Record::new("Heat").with_year(Some(1995)).with_rating(Some(8.3)),
            Record::new("  HEAT ").with_year(Some(1995)).with_rating(Some(9.9)),
            Record::new("Heat").with_year(Some(1986)),
            Record::new("Heat").with_year(Some(1995)),
        ]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].rating, Some(8.3));
        assert_eq!(table.rows()[1].year, Some(1986));
    }

    #[test]
    fn row_without_title_but_with_values_is_kept() {
        let table = Table::from_records(vec![Record {
            year: Some(1999),
            ..Default::default()
        }]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn cells_follow_column_order() {
        let record = Record::new("Heat")
            .with_year(Some(1995))
            .with_rating(Some(8.3))
            .with_votes(Some(700_000));
        assert_eq!(
            record.cells(),
            [
                Some("Heat".to_string()),
                Some("1995".to_string()),
                Some("8.3".to_string()),
                Some("700000".to_string()),
            ]
        );
        assert_eq!(Table::default().columns(), &["Title", "Year", "Rating", "Votes"]);
    }
}
