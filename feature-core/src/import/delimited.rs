//! Line-oriented importer for `Id;Name;Description;Priority` text files

use super::{feature_from_fields, log_skipped, ImportReport, RowError};

/// Field separator of the delimited format
pub const DELIMITER: char = ';';

/// Parses delimited text, one record per line
///
/// Lines with fewer than four fields, or whose id or priority is not an
/// integer, are skipped and reported with their 1-based line number. Fields
/// beyond the fourth are ignored.
pub fn parse_delimited(text: &str) -> ImportReport {
    let text = text.trim_start_matches('\u{feff}');
    let mut report = ImportReport::default();

    for (index, line) in text.lines().enumerate() {
        let fields: Vec<&str> = line.split(DELIMITER).collect();
        match feature_from_fields(&fields) {
            Ok(feature) => report.features.push(feature),
            Err(issue) => report.skipped.push(RowError {
                row: index + 1,
                content: line.to_string(),
                issue,
            }),
        }
    }

    log_skipped("TXT", &report.skipped);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::RowIssue;
    use crate::models::Feature;

    #[test]
    fn test_valid_and_invalid_lines() {
        let report = parse_delimited("3;Login;Allow login;5\nabc;Foo;Bar;5\n");

        assert_eq!(report.features, vec![Feature::new(3, "Login", "Allow login", 5)]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].row, 2);
        assert_eq!(report.skipped[0].content, "abc;Foo;Bar;5");
        assert_eq!(report.skipped[0].issue, RowIssue::InvalidId("abc".to_string()));
        assert!(!report.is_clean());
    }

    #[test]
    fn test_priority_is_clamped() {
        let report = parse_delimited("1;A;a;0\r\n2;B;b;10\r\n3;C;c;-1\r\n");
        let priorities: Vec<u8> = report.features.iter().map(|f| f.priority).collect();
        assert_eq!(priorities, vec![0, 10, 0]);
        assert!(report.is_clean());
    }

    #[test]
    fn test_short_and_blank_lines_are_reported() {
        let report = parse_delimited("1;A\n\n2;B;b;4");
        assert_eq!(report.features, vec![Feature::new(2, "B", "b", 4)]);
        let rows: Vec<usize> = report.skipped.iter().map(|e| e.row).collect();
        assert_eq!(rows, vec![1, 2]);
        assert_eq!(report.skipped[0].issue, RowIssue::MissingFields(2));
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let report = parse_delimited("7;Name;Desc;2;trailing;more");
        assert_eq!(report.features, vec![Feature::new(7, "Name", "Desc", 2)]);
    }

    #[test]
    fn test_empty_text_fields_are_kept() {
        let report = parse_delimited("5;;;1");
        assert_eq!(report.features, vec![Feature::new(5, "", "", 1)]);
    }
}
