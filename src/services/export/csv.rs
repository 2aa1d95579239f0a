//! CSV rendering

use super::render::flatten_value;
use crate::models::ExportRecord;
use crate::utils::helpers::capitalize;

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

/// Header of capitalized field names, then one fully quoted row per record
pub fn render_csv(records: &[ExportRecord], fields: &[String]) -> String {
    let header = fields
        .iter()
        .map(|field| quote(&capitalize(field)))
        .collect::<Vec<_>>()
        .join(",");

    let rows = records.iter().map(|record| {
        fields
            .iter()
            .map(|field| quote(&flatten_value(field, record.get(field))))
            .collect::<Vec<_>>()
            .join(",")
    });

    std::iter::once(header).chain(rows).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::{json, Value};

    /// Minimal reader for fully quoted CSV
    fn parse_csv(text: &str) -> Vec<Vec<String>> {
        let mut rows = Vec::new();
        let mut row = Vec::new();
        let mut cell = String::new();
        let mut in_quotes = false;
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            match (c, in_quotes) {
                ('"', true) if chars.peek() == Some(&'"') => {
                    cell.push('"');
                    chars.next();
                }
                ('"', _) => in_quotes = !in_quotes,
                (',', false) => row.push(std::mem::take(&mut cell)),
                ('\n', false) => {
                    row.push(std::mem::take(&mut cell));
                    rows.push(std::mem::take(&mut row));
                }
                (c, _) => cell.push(c),
            }
        }
        row.push(cell);
        rows.push(row);
        rows
    }

    fn record(value: Value) -> ExportRecord {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_feedback_ratings_rendered_as_pairs() {
        let records = vec![
            record(json!({"fullName": "Asha", "ratings": {"content": 5, "speaker": 4}})),
            record(json!({"fullName": "Ben \"B\"", "ratings": {"content": 3}})),
        ];
        let fields = vec!["fullName".to_string(), "ratings".to_string()];

        let csv = render_csv(&records, &fields);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], r#""FullName","Ratings""#);
        assert_eq!(lines[1], r#""Asha","content: 5, speaker: 4""#);
        assert_eq!(lines[2], r#""Ben ""B""","content: 3""#);
    }

    #[test]
    fn test_missing_values_are_empty() {
        let records = vec![record(json!({"fullName": "Asha"}))];
        let csv = render_csv(&records, &["fullName".to_string(), "email".to_string()]);
        assert_eq!(csv.lines().nth(1), Some(r#""Asha","""#));
    }

    proptest! {
        #[test]
        fn prop_csv_round_trip(values in prop::collection::vec(("[^\r]{0,16}", "[^\r]{0,16}"), 1..8)) {
            let records: Vec<ExportRecord> = values
                .iter()
                .map(|(a, b)| record(json!({"name": a, "notes": b})))
                .collect();
            let fields = vec!["name".to_string(), "notes".to_string()];

            let parsed = parse_csv(&render_csv(&records, &fields));
            prop_assert_eq!(parsed.len(), values.len() + 1);
            for (row, (a, b)) in parsed.iter().skip(1).zip(&values) {
                prop_assert_eq!(&row[0], a);
                prop_assert_eq!(&row[1], b);
            }
        }
    }
}
