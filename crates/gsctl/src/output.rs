//! Output formatting: table, markdown, JSON, YAML.
//!
//! Renders data in the format selected by `--output`. Table and markdown
//! use `tabled`; structured formats use serde.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::OutputFormat;

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable items in the chosen format.
///
/// - `table` / `markdown`: converts each item with `to_row` and lays the
///   rows out with the `Tabled` derive
/// - `json` / `json-compact` / `yaml`: serializes the original data
pub fn render_list<T, R>(format: OutputFormat, data: &[T], to_row: impl Fn(&T) -> R) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Table::new(rows).with(Style::rounded()).to_string()
        }
        OutputFormat::Markdown => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Table::new(rows).with(Style::markdown()).to_string()
        }
        OutputFormat::Json => render_json_pretty(data),
        OutputFormat::JsonCompact => render_json_compact(data),
        OutputFormat::Yaml => render_yaml(data),
    }
}

/// Render a single item. Table and markdown use the pre-formatted
/// `detail_fn` output.
pub fn render_single<T>(format: OutputFormat, data: &T, detail_fn: impl Fn(&T) -> String) -> String
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table | OutputFormat::Markdown => detail_fn(data),
        OutputFormat::Json => render_json_pretty(data),
        OutputFormat::JsonCompact => render_json_compact(data),
        OutputFormat::Yaml => render_yaml(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Print a one-line status message to stderr, respecting quiet mode.
pub fn print_status(message: &str, quiet: bool) {
    if quiet {
        return;
    }
    if io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none() {
        eprintln!("{}", message.green());
    } else {
        eprintln!("{message}");
    }
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_json_pretty<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string_pretty(data).expect("serialization should not fail")
}

fn render_json_compact<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string(data).expect("serialization should not fail")
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).expect("serialization should not fail")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(serde::Serialize)]
    struct Item {
        port: u8,
        name: String,
    }

    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "Port")]
        port: u8,
        #[tabled(rename = "Name")]
        name: String,
    }

    fn rows() -> Vec<Item> {
        vec![
            Item {
                port: 1,
                name: "Camera".into(),
            },
            Item {
                port: 2,
                name: String::new(),
            },
        ]
    }

    fn to_row(item: &Item) -> Row {
        Row {
            port: item.port,
            name: item.name.clone(),
        }
    }

    #[test]
    fn markdown_has_header_separator() {
        let out = render_list(OutputFormat::Markdown, &rows(), to_row);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].contains("Port"));
        assert!(lines[1].starts_with("|-"));
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn compact_json_is_one_line() {
        let out = render_list(OutputFormat::JsonCompact, &rows(), to_row);
        assert_eq!(out, r#"[{"port":1,"name":"Camera"},{"port":2,"name":""}]"#);
    }

    #[test]
    fn yaml_lists_items() {
        let out = render_list(OutputFormat::Yaml, &rows(), to_row);
        assert!(out.starts_with("- port: 1\n  name: Camera\n"));
    }
}
