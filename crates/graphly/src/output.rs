//! Rendering for the `--output` formats.
//!
//! Table is the interactive default; json / json-compact / yaml
//! serialize the underlying data via serde, and plain prints bare
//! identifiers for scripting. Callers shape their own table rows and
//! identifier strings; this module only picks the representation.

use std::io::{self, IsTerminal, Write};

use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};

/// Whether ANSI color should be used for human-facing text.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal(),
    }
}

/// Render a list: `items` feed the structured formats, `rows` the table
/// view, `ids` the plain view (one per line).
pub fn render_list<T, R>(format: &OutputFormat, items: &[T], rows: &[R], ids: &[String]) -> String
where
    T: Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => Table::new(rows).with(Style::rounded()).to_string(),
        OutputFormat::Json => json_pretty(items),
        OutputFormat::JsonCompact => json_compact(items),
        OutputFormat::Yaml => yaml(items),
        OutputFormat::Plain => ids.join("\n"),
    }
}

/// Render a single item; the table view is caller-formatted text.
pub fn render_single<T: Serialize>(
    format: &OutputFormat,
    item: &T,
    detail: String,
    id: String,
) -> String {
    match format {
        OutputFormat::Table => detail,
        OutputFormat::Json => json_pretty(item),
        OutputFormat::JsonCompact => json_compact(item),
        OutputFormat::Yaml => yaml(item),
        OutputFormat::Plain => id,
    }
}

/// Write rendered output to stdout unless quiet.
pub fn print_output(rendered: &str, quiet: bool) {
    if quiet || rendered.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{rendered}");
}

/// Pretty-printed JSON; also used for the report.json artifact.
pub(crate) fn json_pretty<T: Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string_pretty(data).expect("report types serialize infallibly")
}

fn json_compact<T: Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string(data).expect("report types serialize infallibly")
}

fn yaml<T: Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).expect("report types serialize infallibly")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Tabled)]
    struct Row {
        name: String,
        count: u64,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                name: "alpha".into(),
                count: 3,
            },
            Row {
                name: "beta".into(),
                count: 1,
            },
        ]
    }

    #[test]
    fn plain_lists_one_id_per_line() {
        let items = rows();
        let ids = vec!["alpha".to_string(), "beta".to_string()];
        let out = render_list(&OutputFormat::Plain, &items, &items, &ids);
        assert_eq!(out, "alpha\nbeta");
    }

    #[test]
    fn json_serializes_the_items() {
        let items = rows();
        let out = render_list(&OutputFormat::Json, &items, &items, &[]);
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("valid json");
        assert_eq!(parsed[0]["count"], 3);
    }

    #[test]
    fn table_contains_every_row() {
        let items = rows();
        let out = render_list(&OutputFormat::Table, &items, &items, &[]);
        assert!(out.contains("alpha") && out.contains("beta"));
    }

    #[test]
    fn single_table_uses_the_detail_text() {
        let items = rows();
        let out = render_single(
            &OutputFormat::Table,
            &items[0],
            "detail view".into(),
            "alpha".into(),
        );
        assert_eq!(out, "detail view");
    }
}
