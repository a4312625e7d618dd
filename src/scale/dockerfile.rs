//! # Build File Parser
//!
//! Parses a container build file into an ordered list of [`Instruction`]s, each
//! carrying the 1-based range of physical lines it was read from. The label codec
//! relies on those ranges to splice a rewritten statement back into the file.
//!
//! ## Syntax handled
//!
//! - Blank lines and `#` comments are skipped.
//! - An `# escape=` parser directive before the first instruction switches the
//!   continuation character between `\` and `` ` ``.
//! - A line ending in the continuation character joins the next line. Blank and
//!   comment lines inside a continuation are skipped but still count towards the
//!   instruction's line range when followed by more of it.
//! - Keywords are normalized to upper case.
//!
//! `LABEL` arguments are split into `key`, `value` token pairs and validated
//! strictly. Other instructions are split into words leniently; nothing in this
//! crate interprets them.

use crate::error::{Result, ScaleError};
use std::fs;
use std::path::Path;

pub const LABEL: &str = "LABEL";

const DEFAULT_ESCAPE: char = '\\';

/// One parsed statement of a build file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Upper-cased statement keyword (`FROM`, `LABEL`, ...)
    pub keyword: String,
    /// Argument text with continuations joined
    pub args: String,
    /// For `LABEL`: `[key0, value0, key1, value1, ...]` with source quoting kept.
    /// Otherwise the quote-aware words of `args`.
    pub tokens: Vec<String>,
    /// Escape character in effect for the file (`\` unless `# escape=` said otherwise)
    pub escape: char,
    pub start_line: usize,
    pub end_line: usize,
}

impl Instruction {
    /// Iterates `(key, value)` token pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tokens
            .chunks_exact(2)
            .map(|pair| (pair[0].as_str(), pair[1].as_str()))
    }
}

/// Normalizes a statement name the same way the parser normalizes keywords.
pub fn normalize_keyword(name: &str) -> String {
    name.trim().to_ascii_uppercase()
}

pub fn parse_file(path: &Path) -> Result<Vec<Instruction>> {
    let source = fs::read_to_string(path)?;
    parse(&source)
}

struct Pending {
    start: usize,
    end: usize,
    text: String,
}

pub fn parse(source: &str) -> Result<Vec<Instruction>> {
    let mut escape = DEFAULT_ESCAPE;
    let mut directives_allowed = true;
    let mut pending: Option<Pending> = None;
    let mut instructions = Vec::new();

    for (idx, raw) in source.split('\n').enumerate() {
        let line_no = idx + 1;
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        let trimmed = line.trim_start();

        let current = match pending.as_mut() {
            Some(current) => {
                if trimmed.is_empty() || trimmed.starts_with('#') {
                    continue;
                }
                current.end = line_no;
                current
            }
            None => {
                if trimmed.is_empty() {
                    directives_allowed = false;
                    continue;
                }
                if trimmed.starts_with('#') {
                    if directives_allowed {
                        if let Some(c) = parse_escape_directive(trimmed, line_no)? {
                            escape = c;
                            continue;
                        }
                    }
                    directives_allowed = false;
                    continue;
                }
                directives_allowed = false;
                pending.insert(Pending {
                    start: line_no,
                    end: line_no,
                    text: String::new(),
                })
            }
        };

        let content = if current.text.is_empty() { trimmed } else { line };
        match content.trim_end().strip_suffix(escape) {
            Some(joined) => current.text.push_str(joined),
            None => {
                current.text.push_str(content);
                if let Some(done) = pending.take() {
                    instructions.push(finish(done, escape)?);
                }
            }
        }
    }

    if let Some(done) = pending.take() {
        instructions.push(finish(done, escape)?);
    }

    Ok(instructions)
}

/// Recognizes `# escape=<c>`. Other comments return `None`.
fn parse_escape_directive(comment: &str, line: usize) -> Result<Option<char>> {
    let body = comment.trim_start_matches('#').trim();
    let Some((name, value)) = body.split_once('=') else {
        return Ok(None);
    };
    if !name.trim().eq_ignore_ascii_case("escape") {
        return Ok(None);
    }
    match value.trim() {
        "\\" => Ok(Some('\\')),
        "`" => Ok(Some('`')),
        other => Err(ScaleError::Parse {
            line,
            message: format!("invalid escape token '{}', must be ` or \\", other),
        }),
    }
}

fn finish(pending: Pending, escape: char) -> Result<Instruction> {
    let text = pending.text.trim();
    let (word, rest) = match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (text, ""),
    };

    if word.is_empty() || !word.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ScaleError::Parse {
            line: pending.start,
            message: format!("invalid instruction '{}'", word),
        });
    }

    let keyword = normalize_keyword(word);
    let tokens = if keyword == LABEL {
        label_tokens(rest, escape, pending.start)?
    } else {
        split_words(rest, escape).0
    };

    Ok(Instruction {
        keyword,
        args: rest.to_string(),
        tokens,
        escape,
        start_line: pending.start,
        end_line: pending.end,
    })
}

fn label_tokens(args: &str, escape: char, line: usize) -> Result<Vec<String>> {
    let parse_err = |message: String| ScaleError::Parse { line, message };

    let (words, unterminated) = split_words(args, escape);
    if unterminated {
        return Err(parse_err("unterminated quote in LABEL".to_string()));
    }
    let Some(first) = words.first() else {
        return Err(parse_err("LABEL requires at least one argument".to_string()));
    };

    // Legacy `LABEL key value with spaces` form
    if find_unquoted_eq(first, escape).is_none() {
        let value = args[first.len()..].trim();
        if value.is_empty() {
            return Err(parse_err(format!("LABEL {} requires a value", first)));
        }
        return Ok(vec![first.clone(), value.to_string()]);
    }

    let mut tokens = Vec::with_capacity(words.len() * 2);
    for word in &words {
        let Some(eq) = find_unquoted_eq(word, escape) else {
            return Err(parse_err(format!(
                "can't find = in \"{}\", must be of the form name=value",
                word
            )));
        };
        let (key, value) = (&word[..eq], &word[eq + 1..]);
        if key.is_empty() {
            return Err(parse_err("LABEL names can not be blank".to_string()));
        }
        tokens.push(key.to_string());
        tokens.push(value.to_string());
    }
    Ok(tokens)
}

/// Splits on whitespace outside quotes, keeping the quotes in the words.
/// The flag reports a quote still open at the end of the text.
fn split_words(text: &str, escape: char) -> (Vec<String>, bool) {
    let mut words = Vec::new();
    let mut word = String::new();
    let mut quote: Option<char> = None;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) => {
                word.push(c);
                if c == escape && q == '"' {
                    if let Some(next) = chars.next() {
                        word.push(next);
                    }
                } else if c == q {
                    quote = None;
                }
            }
            None if c.is_whitespace() => {
                if !word.is_empty() {
                    words.push(std::mem::take(&mut word));
                }
            }
            None => {
                word.push(c);
                if c == '"' || c == '\'' {
                    quote = Some(c);
                } else if c == escape {
                    if let Some(next) = chars.next() {
                        word.push(next);
                    }
                }
            }
        }
    }
    if !word.is_empty() {
        words.push(word);
    }
    (words, quote.is_some())
}

fn find_unquoted_eq(word: &str, escape: char) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in word.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match quote {
            Some(q) if c == escape && q == '"' => escaped = true,
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '=' => return Some(i),
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == escape => escaped = true,
            None => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_file() {
        let src = "FROM alpine:3.19\nMAINTAINER ops@example.com\nCOPY entryPoint.sh ./\n";
        let instrs = parse(src).unwrap();
        assert_eq!(instrs.len(), 3);
        assert_eq!(instrs[0].keyword, "FROM");
        assert_eq!(instrs[0].tokens, vec!["alpine:3.19"]);
        assert_eq!(instrs[2].tokens, vec!["entryPoint.sh", "./"]);
        assert_eq!((instrs[2].start_line, instrs[2].end_line), (3, 3));
    }

    #[test]
    fn test_keywords_are_normalized() {
        let instrs = parse("from alpine\nlabel a=b\n").unwrap();
        assert_eq!(instrs[0].keyword, "FROM");
        assert_eq!(instrs[1].keyword, LABEL);
        assert_eq!(normalize_keyword(" label "), LABEL);
    }

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let src = "# a comment\n\nFROM alpine\n\n   # indented comment\nRUN true\n";
        let instrs = parse(src).unwrap();
        assert_eq!(instrs.len(), 2);
        assert_eq!(instrs[0].start_line, 3);
        assert_eq!(instrs[1].start_line, 6);
    }

    #[test]
    fn test_continuation_spans_lines() {
        let src = "FROM alpine\nLABEL a=\"1\" \\\n  b=\"2\" \\\n  c=\"3\"\nRUN true\n";
        let instrs = parse(src).unwrap();
        let label = &instrs[1];
        assert_eq!(label.keyword, LABEL);
        assert_eq!((label.start_line, label.end_line), (2, 4));
        assert_eq!(label.tokens, vec!["a", "\"1\"", "b", "\"2\"", "c", "\"3\""]);
        assert_eq!(instrs[2].start_line, 5);
    }

    #[test]
    fn test_comment_inside_continuation() {
        let src = "RUN echo one \\\n# skipped\n  two\n";
        let instrs = parse(src).unwrap();
        assert_eq!(instrs.len(), 1);
        assert_eq!(instrs[0].tokens, vec!["echo", "one", "two"]);
        assert_eq!((instrs[0].start_line, instrs[0].end_line), (1, 3));
    }

    #[test]
    fn test_continuation_open_at_eof() {
        let instrs = parse("LABEL a=b \\\n").unwrap();
        assert_eq!(instrs.len(), 1);
        assert_eq!(instrs[0].tokens, vec!["a", "b"]);
        assert_eq!(instrs[0].end_line, 1);
        assert_eq!(instrs[0].escape, '\\');
    }

    #[test]
    fn test_escape_directive() {
        let src = "# escape=`\nFROM windows\nRUN dir c:\\ `\n  /s\n";
        let instrs = parse(src).unwrap();
        assert_eq!(instrs.len(), 2);
        assert_eq!((instrs[1].start_line, instrs[1].end_line), (3, 4));
        assert_eq!(instrs[1].args, "dir c:\\   /s");
        assert!(instrs.iter().all(|i| i.escape == '`'));
    }

    #[test]
    fn test_invalid_escape_directive() {
        let err = parse("# escape=x\nFROM alpine\n").unwrap_err();
        assert!(matches!(err, ScaleError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_directive_after_instruction_is_comment() {
        let instrs = parse("FROM alpine\n# escape=x\n").unwrap();
        assert_eq!(instrs.len(), 1);
    }

    #[test]
    fn test_quoted_label_values_keep_quotes() {
        let src = r#"LABEL com.example.job-type="{\"name\":\"foo bar\"}" other='x y'"#;
        let instrs = parse(src).unwrap();
        assert_eq!(
            instrs[0].tokens,
            vec![
                "com.example.job-type",
                r#""{\"name\":\"foo bar\"}""#,
                "other",
                "'x y'"
            ]
        );
    }

    #[test]
    fn test_legacy_label_form() {
        let instrs = parse("LABEL description some words here\n").unwrap();
        assert_eq!(instrs[0].tokens, vec!["description", "some words here"]);
    }

    #[test]
    fn test_label_errors() {
        let err = parse("FROM alpine\nLABEL a=\"open\n").unwrap_err();
        assert!(matches!(err, ScaleError::Parse { line: 2, .. }));

        let err = parse("LABEL\n").unwrap_err();
        assert!(matches!(err, ScaleError::Parse { line: 1, .. }));

        let err = parse("LABEL a=b c\n").unwrap_err();
        assert!(err.to_string().contains("can't find ="));

        let err = parse("LABEL =b\n").unwrap_err();
        assert!(err.to_string().contains("blank"));

        let err = parse("LABEL solo\n").unwrap_err();
        assert!(err.to_string().contains("requires a value"));
    }

    #[test]
    fn test_invalid_keyword() {
        let err = parse("FROM alpine\n123 go\n").unwrap_err();
        assert!(matches!(err, ScaleError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_crlf_line_endings() {
        let instrs = parse("FROM alpine\r\nLABEL a=b \\\r\n c=d\r\n").unwrap();
        assert_eq!(instrs[1].tokens, vec!["a", "b", "c", "d"]);
        assert_eq!(instrs[1].end_line, 3);
    }

    #[test]
    fn test_pairs() {
        let instrs = parse("LABEL a=1 b=2\n").unwrap();
        let pairs: Vec<_> = instrs[0].pairs().collect();
        assert_eq!(pairs, vec![("a", "1"), ("b", "2")]);
    }
}
