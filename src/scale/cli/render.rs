//! Turns command results into terminal text. Render functions return strings so
//! they can be tested; the `print_*` wrappers write them out.

use colored::Colorize;
use scale::commands::{CmdMessage, ListRow, MessageLevel};
use scale::config::ScaleConfig;
use serde_json::Value;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const TITLE_WIDTH: usize = 40;

pub fn render_messages(messages: &[CmdMessage]) -> String {
    let mut output = String::new();
    for message in messages {
        let line = match message.level {
            MessageLevel::Info => message.content.dimmed(),
            MessageLevel::Success => message.content.green(),
            MessageLevel::Warning => message.content.yellow(),
            MessageLevel::Error => message.content.red(),
        };
        output.push_str(&format!("{}\n", line));
    }
    output
}

pub fn print_messages(messages: &[CmdMessage]) {
    let output = render_messages(messages);
    if !output.is_empty() {
        print!("{}", output);
    }
}

/// Aligned `ID  NAME  VERSION  TITLE` table.
pub fn render_rows(rows: &[ListRow]) -> String {
    if rows.is_empty() {
        return "Nothing found.\n".to_string();
    }

    let ids: Vec<String> = rows
        .iter()
        .map(|r| r.id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string()))
        .collect();
    let id_width = column_width("ID", ids.iter().map(String::as_str));
    let name_width = column_width("NAME", rows.iter().map(|r| r.name.as_str()));
    let version_width = column_width("VERSION", rows.iter().map(|r| r.version.as_str()));

    let mut output = format!(
        "{}  {}  {}  {}\n",
        pad("ID", id_width),
        pad("NAME", name_width),
        pad("VERSION", version_width),
        "TITLE"
    )
    .bold()
    .to_string();

    for (row, id) in rows.iter().zip(&ids) {
        output.push_str(&format!(
            "{}  {}  {}  {}\n",
            pad(id, id_width).yellow(),
            pad(&row.name, name_width),
            pad(&row.version, version_width),
            truncate_to_width(&row.title, TITLE_WIDTH)
        ));
    }
    output
}

pub fn print_rows(rows: &[ListRow]) {
    print!("{}", render_rows(rows));
}

pub fn render_record(record: &Value) -> String {
    let text = serde_json::to_string_pretty(record).unwrap_or_else(|_| record.to_string());
    format!("{}\n", text)
}

pub fn print_record(record: &Value) {
    print!("{}", render_record(record));
}

pub fn render_config(config: &ScaleConfig) -> String {
    let mut output = String::new();
    for (key, value) in config.list_all() {
        let shown = if value.is_empty() {
            "(unset)".dimmed().to_string()
        } else {
            value
        };
        output.push_str(&format!("{} = {}\n", key.bold(), shown));
    }
    output
}

pub fn print_config(config: &ScaleConfig) {
    print!("{}", render_config(config));
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values.map(|v| v.width()).fold(header.width(), usize::max)
}

fn pad(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(fill))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    let limit = max_width.saturating_sub(1);

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: Option<i64>, name: &str, title: &str) -> ListRow {
        ListRow {
            id,
            name: name.into(),
            version: "1.0".into(),
            title: title.into(),
        }
    }

    #[test]
    fn test_render_messages_one_line_each() {
        colored::control::set_override(false);
        let output = render_messages(&[CmdMessage::success("done"), CmdMessage::warning("careful")]);
        assert_eq!(output, "done\ncareful\n");
    }

    #[test]
    fn test_render_rows_aligns_columns() {
        colored::control::set_override(false);
        let output = render_rows(&[row(Some(1), "ingest", "Ingest"), row(None, "a-much-longer-name", "X")]);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID  NAME"));
        let title_col = lines[0].find("TITLE").unwrap();
        assert_eq!(lines[1].find("Ingest"), Some(title_col));
        assert!(lines[2].starts_with("-   a-much-longer-name"));
    }

    #[test]
    fn test_render_rows_empty() {
        assert_eq!(render_rows(&[]), "Nothing found.\n");
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdefghij", 5), "abcd…");
        // wide characters count double
        assert_eq!(truncate_to_width("日本語テキスト", 6), "日本…");
    }

    #[test]
    fn test_render_config_marks_unset() {
        colored::control::set_override(false);
        let output = render_config(&ScaleConfig::default());
        assert!(output.contains("url = (unset)\n"));
        assert!(output.contains("timeout = 30\n"));
    }
}
