//! # Label Codec
//!
//! Reads and rewrites a single field of a metadata statement (`LABEL`) inside a
//! container build file, leaving every other line of the file untouched.
//!
//! ## Encoding
//!
//! Values are stored double-quoted. Before quoting, every `${` is written as
//! `$ {` so the build tool does not expand job placeholders such as
//! `${input_file}`; reading reverses both steps. The unescape is lossy for text
//! that already contained a literal `$ {`: it comes back as `${`.
//!
//! With the default `\` escape, quoting follows JSON string rules. In a file
//! that declares a backtick escape (`` # escape=` ``), `"` and the backtick are
//! prefixed with a backtick instead; such values can not hold line breaks.
//!
//! ## Writes
//!
//! [`set_field`] regenerates the whole statement, one `key=value` pair per
//! physical line, starting at the statement's first line, with the file's escape
//! character as continuation and its line endings kept. The new file is written
//! to a sibling temporary file and persisted over the original only after the full
//! copy succeeded, so a failed write never leaves a partial file behind.
//! There is no locking: concurrent writers to the same file race.

use crate::dockerfile::{self, Instruction};
use crate::error::{Result, ScaleError};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Label key holding the JSON job type definition.
pub const JOB_TYPE_LABEL: &str = "com.ngageoint.scale.job-type";

/// Longest line the rewrite copy accepts.
pub const MAX_LINE_BYTES: usize = 1024 * 1024;

/// Returns the decoded value of `field` in the first `statement` of the file.
///
/// `Ok(None)` when there is no such statement or when the first one does not
/// carry the field. Later statements with the same keyword are not searched.
pub fn get_field(path: &Path, statement: &str, field: &str) -> Result<Option<String>> {
    let instructions = dockerfile::parse_file(path)?;
    let Some(instr) = find_statement(&instructions, statement) else {
        debug!(path = %path.display(), statement, "no matching statement");
        return Ok(None);
    };
    let Some(idx) = find_pair(instr, field) else {
        debug!(path = %path.display(), field, "field not present");
        return Ok(None);
    };

    decode_for(&instr.tokens[idx + 1], instr.escape)
        .map(Some)
        .map_err(|message| ScaleError::Parse {
            line: instr.start_line,
            message,
        })
}

/// Replaces the value of `field` in the first `statement` of the file.
///
/// Returns `Ok(false)` without touching the file when the field is absent.
pub fn set_field(path: &Path, statement: &str, field: &str, value: &str) -> Result<bool> {
    set_field_with_limit(path, statement, field, value, MAX_LINE_BYTES)
}

fn set_field_with_limit(
    path: &Path,
    statement: &str,
    field: &str,
    value: &str,
    limit: usize,
) -> Result<bool> {
    let instructions = dockerfile::parse_file(path)?;
    let Some(instr) = find_statement(&instructions, statement) else {
        return Ok(false);
    };
    let Some(idx) = find_pair(instr, field) else {
        return Ok(false);
    };

    let encoded = encode_for(value, instr.escape)?;
    let text = rebuild(instr, idx, &encoded);
    splice(path, instr.start_line, instr.end_line, &text, limit)?;
    debug!(
        path = %path.display(),
        field,
        start = instr.start_line,
        end = instr.end_line,
        "rewrote statement"
    );
    Ok(true)
}

fn find_statement<'a>(instructions: &'a [Instruction], statement: &str) -> Option<&'a Instruction> {
    let keyword = dockerfile::normalize_keyword(statement);
    instructions.iter().find(|i| i.keyword == keyword)
}

/// Index of the key token for `field`; the value follows it.
fn find_pair(instr: &Instruction, field: &str) -> Option<usize> {
    instr
        .pairs()
        .position(|(key, _)| {
            key == field || unquote_for(key, instr.escape).is_ok_and(|k| k == field)
        })
        .map(|n| n * 2)
}

fn rebuild(instr: &Instruction, target: usize, encoded: &str) -> String {
    let separator = format!(" {}\n ", instr.escape);
    let mut out = format!("{} ", instr.keyword);
    for (n, (key, value)) in instr.pairs().enumerate() {
        if n > 0 {
            out.push_str(&separator);
        }
        let value = if n * 2 == target { encoded } else { value };
        out.push_str(key);
        out.push('=');
        out.push_str(value);
    }
    out
}

fn splice(path: &Path, start: usize, end: usize, replacement: &str, limit: usize) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let permissions = fs::metadata(path)?.permissions();

    let reader = BufReader::new(File::open(path)?);
    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        copy_replacing(reader, &mut writer, start, end, replacement, limit)?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.as_file().set_permissions(permissions)?;
    tmp.persist(path).map_err(|e| ScaleError::Io(e.error))?;
    Ok(())
}

/// Copies `reader` to `writer` line by line, writing `replacement` in place of
/// lines `start..=end`. The replacement takes the line breaks of the span it
/// replaces: `\r\n` when the first line used them, and whatever ended the last.
fn copy_replacing<R: BufRead, W: Write>(
    mut reader: R,
    writer: &mut W,
    start: usize,
    end: usize,
    replacement: &str,
    limit: usize,
) -> Result<()> {
    let mut buf = Vec::new();
    let mut line_no = 0;
    let mut newline = "\n";
    loop {
        buf.clear();
        let read = (&mut reader)
            .take(limit as u64 + 1)
            .read_until(b'\n', &mut buf)?;
        if read == 0 {
            break;
        }
        line_no += 1;

        let content_len = buf.strip_suffix(b"\n").map_or(buf.len(), <[u8]>::len);
        if content_len > limit {
            return Err(ScaleError::LineTooLong {
                line: line_no,
                limit,
            });
        }

        if line_no == start && buf.ends_with(b"\r\n") {
            newline = "\r\n";
        }
        if line_no == end {
            writer.write_all(replacement.replace('\n', newline).as_bytes())?;
            writer.write_all(line_ending(&buf))?;
        } else if line_no < start || line_no > end {
            writer.write_all(&buf)?;
        }
    }
    Ok(())
}

fn line_ending(line: &[u8]) -> &'static [u8] {
    if line.ends_with(b"\r\n") {
        b"\r\n"
    } else if line.ends_with(b"\n") {
        b"\n"
    } else {
        b""
    }
}

pub fn escape_placeholders(s: &str) -> String {
    s.replace("${", "$ {")
}

pub fn unescape_placeholders(s: &str) -> String {
    s.replace("$ {", "${")
}

/// Double-quotes `s`, escaping quotes, backslashes and control characters.
pub fn quote(s: &str) -> String {
    serde_json::Value::String(s.to_owned()).to_string()
}

/// Reverses [`quote`]. Single-quoted tokens lose their quotes and bare tokens are
/// returned unchanged. Double-quoted text that is not a valid escaped string
/// falls back to shell rules, where only `\"`, `\\`, `\$` and `` \` `` are escapes.
pub fn unquote(token: &str) -> std::result::Result<String, String> {
    if let Some(inner) = token.strip_prefix('"') {
        let Some(inner) = inner.strip_suffix('"') else {
            return Err(format!("unterminated quoted value {}", token));
        };
        return match serde_json::from_str::<String>(token) {
            Ok(value) => Ok(value),
            Err(_) => Ok(shell_unescape(inner, '\\')),
        };
    }
    if let Some(inner) = token.strip_prefix('\'') {
        return inner
            .strip_suffix('\'')
            .map(str::to_string)
            .ok_or_else(|| format!("unterminated quoted value {}", token));
    }
    Ok(token.to_string())
}

/// Double-quotes `s` for a file whose escape character is `escape`.
pub fn quote_for(s: &str, escape: char) -> Result<String> {
    if escape == '\\' {
        return Ok(quote(s));
    }
    if s.contains(['\n', '\r']) {
        return Err(ScaleError::InvalidInput(format!(
            "values with line breaks can not be quoted with the {} escape",
            escape
        )));
    }
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == escape {
            out.push(escape);
        }
        out.push(c);
    }
    out.push('"');
    Ok(out)
}

/// Reverses [`quote_for`].
pub fn unquote_for(token: &str, escape: char) -> std::result::Result<String, String> {
    if escape == '\\' {
        return unquote(token);
    }
    match token.strip_prefix('"') {
        Some(inner) => inner
            .strip_suffix('"')
            .map(|inner| shell_unescape(inner, escape))
            .ok_or_else(|| format!("unterminated quoted value {}", token)),
        None => unquote(token),
    }
}

fn shell_unescape(inner: &str, escape: char) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c == escape {
            if let Some(&next) = chars.peek() {
                let escapable = next == '"'
                    || next == '$'
                    || next == escape
                    || (escape == '\\' && next == '`');
                if escapable {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

pub fn encode(value: &str) -> String {
    quote(&escape_placeholders(value))
}

pub fn decode(token: &str) -> std::result::Result<String, String> {
    unquote(token).map(|s| unescape_placeholders(&s))
}

pub fn encode_for(value: &str, escape: char) -> Result<String> {
    quote_for(&escape_placeholders(value), escape)
}

pub fn decode_for(token: &str, escape: char) -> std::result::Result<String, String> {
    unquote_for(token, escape).map(|s| unescape_placeholders(&s))
}
