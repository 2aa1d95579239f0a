//! Standalone HTML table rendering

use chrono::{DateTime, Utc};

use super::render::{flatten_value, format_timestamp_value, header_label};
use crate::models::ExportRecord;
use crate::utils::helpers::{escape_html, format_locale_date};

const STYLE: &str = r#"
    body { font-family: Arial, sans-serif; margin: 20px; background-color: #ffffff; }
    h1 { color: #333; font-size: 24px; margin-bottom: 10px; }
    .date { color: #666; font-size: 14px; margin-bottom: 20px; }
    table { border-collapse: collapse; width: 100%; margin-top: 20px; font-size: 12px; }
    th, td { border: 1px solid #ddd; padding: 8px; text-align: left; vertical-align: top; }
    th { background-color: #f2f2f2; font-weight: bold; color: #333; }
    tr:nth-child(even) { background-color: #f9f9f9; }
    tr:nth-child(odd) { background-color: #ffffff; }
    tr:hover { background-color: #f5f5f5; }
"#;

fn cell_text(field: &str, record: &ExportRecord) -> String {
    let value = record.get(field);
    match value {
        Some(v) if v.is_object() || v.is_array() => flatten_value(field, value),
        _ if field == "timestamp" => format_timestamp_value(value),
        _ => flatten_value(field, value),
    }
}

/// Render a titled, styled table; every cell is HTML-escaped and never truncated
pub fn render_html(
    records: &[ExportRecord],
    fields: &[String],
    title: &str,
    generated_at: DateTime<Utc>,
) -> String {
    let title = escape_html(title);

    let header: String = fields
        .iter()
        .map(|field| format!("<th>{}</th>", escape_html(&header_label(field))))
        .collect();

    let body: String = records
        .iter()
        .map(|record| {
            let cells: String = fields
                .iter()
                .map(|field| format!("<td>{}</td>", escape_html(&cell_text(field, record))))
                .collect();
            format!("      <tr>{}</tr>\n", cells)
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <title>{title}</title>
  <style>{STYLE}</style>
</head>
<body>
  <h1>{title}</h1>
  <div class="date">Generated on: {date}</div>
  <table>
    <thead>
      <tr>{header}</tr>
    </thead>
    <tbody>
{body}    </tbody>
  </table>
</body>
</html>
"#,
        date = format_locale_date(generated_at),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::{json, Value};

    fn record(value: Value) -> ExportRecord {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_html_document_structure() {
        let generated = Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap();
        let records = vec![record(json!({
            "fullName": "Asha <admin>",
            "ratings": {"content": 5, "venue": 0},
            "timestamp": "2025-03-14T09:05:00Z",
            "linkedin": null
        }))];
        let fields: Vec<String> = ["fullName", "ratings", "timestamp", "linkedin"]
            .iter()
            .map(|f| f.to_string())
            .collect();

        let html = render_html(&records, &fields, "Feedback & Ratings", generated);

        assert!(html.contains("<title>Feedback &amp; Ratings</title>"));
        assert!(html.contains("Generated on: 3/14/2025"));
        assert!(html.contains("<th>FullName</th><th>Ratings</th><th>Timestamp</th><th>LinkedIn</th>"));
        assert!(html.contains("<td>Asha &lt;admin&gt;</td>"));
        assert!(html.contains("<td>content: 5</td>"));
        assert!(html.contains("<td>3/14/2025, 9:05:00 AM</td>"));
        assert!(html.contains("<td></td>"));
    }

    #[test]
    fn test_long_text_not_truncated() {
        let long = "x".repeat(5000);
        let records = vec![record(json!({ "motivation": long }))];
        let html = render_html(&records, &["motivation".to_string()], "Apps", Utc::now());
        assert!(html.contains(&long));
    }
}
