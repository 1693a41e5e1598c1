//! BibTeX file parser
//!
//! Nom-based parser for `.bib` databases. Handles braced and quoted field
//! values with nested braces, bare numbers, `@string` definitions with `#`
//! concatenation, and `%` line comments. `@comment` and `@preamble` blocks
//! are recognized and skipped; nothing downstream needs them.
//!
//! A malformed entry is recorded as a [`ParseIssue`] and skipped, and parsing
//! resumes at the next `@`. One bad record never aborts the batch.

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, multispace0},
    combinator::map,
    IResult,
};
use std::collections::HashMap;

use super::entry::RawEntry;

/// A recoverable problem encountered while parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct ParseIssue {
    /// 1-based line where the skipped region started
    pub line: u32,
    pub message: String,
}

/// The parsed contents of one `.bib` file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BibFile {
    /// Entries in source order
    pub entries: Vec<RawEntry>,
    /// Malformed regions that were skipped
    pub issues: Vec<ParseIssue>,
}

/// Parse a `.bib` database.
///
/// Never fails outright: unparseable regions are reported through
/// [`BibFile::issues`] and the parser recovers at the next `@`.
pub fn parse_file(input: &str) -> BibFile {
    let mut out = BibFile::default();
    let mut strings: HashMap<String, String> = HashMap::new();

    let mut remaining = input;
    let mut line = 1u32;

    while !remaining.is_empty() {
        let (rest, skipped) = skip_blanks_and_comments(remaining);
        line += count_newlines(skipped);
        remaining = rest;

        if remaining.is_empty() {
            break;
        }

        if !remaining.starts_with('@') {
            // Stray text between entries; BibTeX treats it as commentary
            match remaining.find('@') {
                Some(pos) => {
                    line += count_newlines(&remaining[..pos]);
                    remaining = &remaining[pos..];
                }
                None => break,
            }
            continue;
        }

        match parse_block(remaining, &strings) {
            Ok((rest, block)) => {
                let consumed = &remaining[..remaining.len() - rest.len()];
                match block {
                    Block::Entry(entry) => out.entries.push(entry),
                    Block::StringDef(name, value) => {
                        strings.insert(name, value);
                    }
                    Block::Skipped => {}
                }
                line += count_newlines(consumed);
                remaining = rest;
            }
            Err(_) => {
                out.issues.push(ParseIssue {
                    line,
                    message: "malformed entry".to_string(),
                });
                // Resume at the next @ after the one that failed
                match remaining[1..].find('@') {
                    Some(pos) => {
                        line += count_newlines(&remaining[..pos + 1]);
                        remaining = &remaining[pos + 1..];
                    }
                    None => break,
                }
            }
        }
    }

    out
}

/// One `@...` block
enum Block {
    Entry(RawEntry),
    StringDef(String, String),
    Skipped,
}

fn count_newlines(text: &str) -> u32 {
    text.matches('\n').count() as u32
}

/// Skip whitespace and `%` line comments
fn skip_blanks_and_comments(input: &str) -> (&str, &str) {
    let bytes = input.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos].is_ascii_whitespace() {
            pos += 1;
        } else if bytes[pos] == b'%' {
            while pos < bytes.len() && bytes[pos] != b'\n' {
                pos += 1;
            }
        } else {
            break;
        }
    }

    (&input[pos..], &input[..pos])
}

fn parse_block<'a>(input: &'a str, strings: &HashMap<String, String>) -> IResult<&'a str, Block> {
    let (rest, _) = char('@')(input)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, block_type) = take_while1(|c: char| c.is_ascii_alphanumeric())(rest)?;

    match block_type.to_lowercase().as_str() {
        "string" => {
            let (rest, (name, value)) = parse_string_definition(rest, strings)?;
            Ok((rest, Block::StringDef(name, value)))
        }
        "preamble" => {
            let (rest, _) = parse_braced_block(rest)?;
            Ok((rest, Block::Skipped))
        }
        "comment" => {
            let (rest, _) = parse_comment_body(rest)?;
            Ok((rest, Block::Skipped))
        }
        _ => {
            let (rest, entry) = parse_entry_body(rest, block_type, strings)?;
            Ok((rest, Block::Entry(entry)))
        }
    }
}

/// `@string{name = value}`
fn parse_string_definition<'a>(
    input: &'a str,
    strings: &HashMap<String, String>,
) -> IResult<&'a str, (String, String)> {
    let (rest, _) = multispace0(input)?;
    let (rest, _) = char('{')(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, name) =
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-')(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char('=')(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, value) = parse_value(rest, strings)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char('}')(rest)?;

    Ok((rest, (name.to_string(), value)))
}

/// `@preamble{...}` — consumed and discarded
fn parse_braced_block(input: &str) -> IResult<&str, ()> {
    let (rest, _) = multispace0(input)?;
    let (rest, _) = parse_braced_span(rest)?;
    Ok((rest, ()))
}

/// `@comment` body: braced group or rest of line
fn parse_comment_body(input: &str) -> IResult<&str, ()> {
    let (rest, _) = multispace0(input)?;
    if rest.starts_with('{') {
        let (rest, _) = parse_braced_span(rest)?;
        Ok((rest, ()))
    } else {
        let pos = rest.find('\n').unwrap_or(rest.len());
        Ok((&rest[pos..], ()))
    }
}

/// `{key, field = value, ...}` after the entry type token
fn parse_entry_body<'a>(
    input: &'a str,
    entry_type: &str,
    strings: &HashMap<String, String>,
) -> IResult<&'a str, RawEntry> {
    let (rest, _) = multispace0(input)?;
    let (rest, _) = char('{')(rest)?;
    let (rest, _) = multispace0(rest)?;

    let (rest, key) =
        take_while1(|c: char| c.is_ascii_alphanumeric() || "_-:./+".contains(c))(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char(',')(rest)?;

    let mut entry = RawEntry::new(key, entry_type);
    let (rest, fields) = parse_fields(rest, strings)?;
    for (name, value) in fields {
        entry.push_field(name, value);
    }

    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char('}')(rest)?;

    Ok((rest, entry))
}

fn parse_fields<'a>(
    input: &'a str,
    strings: &HashMap<String, String>,
) -> IResult<&'a str, Vec<(String, String)>> {
    let mut fields = Vec::new();
    let mut remaining = input;

    loop {
        let (rest, _) = multispace0(remaining)?;
        if rest.starts_with('}') {
            return Ok((rest, fields));
        }

        match parse_single_field(rest, strings) {
            Ok((rest, field)) => {
                fields.push(field);
                let (rest, _) = multispace0(rest)?;
                remaining = rest.strip_prefix(',').unwrap_or(rest);
            }
            // No more fields; let the caller match the closing brace
            Err(_) => return Ok((remaining, fields)),
        }
    }
}

fn parse_single_field<'a>(
    input: &'a str,
    strings: &HashMap<String, String>,
) -> IResult<&'a str, (String, String)> {
    let (rest, _) = multispace0(input)?;
    let (rest, name) =
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-')(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char('=')(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, value) = parse_value(rest, strings)?;

    Ok((rest, (name.to_string(), value)))
}

/// A field value: braced, quoted, bare number, or @string reference,
/// possibly concatenated with `#`
fn parse_value<'a>(input: &'a str, strings: &HashMap<String, String>) -> IResult<&'a str, String> {
    let mut value = String::new();
    let mut remaining = input;

    loop {
        let (rest, _) = multispace0(remaining)?;

        let (rest, part) = alt((
            parse_braced_value,
            parse_quoted_value,
            map(take_while1(|c: char| c.is_ascii_digit()), |s: &str| {
                s.to_string()
            }),
            map(
                take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-'),
                |s: &str| strings.get(s).cloned().unwrap_or_else(|| s.to_string()),
            ),
        ))(rest)?;

        value.push_str(&part);

        let (rest, _) = multispace0(rest)?;
        match rest.strip_prefix('#') {
            Some(stripped) => remaining = stripped,
            None => return Ok((rest, value)),
        }
    }
}

/// `{content}` with the outer braces removed
fn parse_braced_value(input: &str) -> IResult<&str, String> {
    let (rest, span) = parse_braced_span(input)?;
    Ok((rest, span[1..span.len() - 1].to_string()))
}

/// A balanced-brace span including the outer braces; respects `\`-escapes
fn parse_braced_span(input: &str) -> IResult<&str, &str> {
    if !input.starts_with('{') {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        )));
    }

    let bytes = input.as_bytes();
    let mut depth = 0i32;
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&input[pos + 1..], &input[..pos + 1]));
                }
            }
            b'\\' => pos += 1,
            _ => {}
        }
        pos += 1;
    }

    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Char,
    )))
}

/// `"content"`, tolerating braced groups with quotes inside
fn parse_quoted_value(input: &str) -> IResult<&str, String> {
    if !input.starts_with('"') {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        )));
    }

    let mut value = String::new();
    let mut brace_depth = 0i32;
    let mut chars = input.char_indices().skip(1);

    while let Some((pos, c)) = chars.next() {
        match c {
            '"' if brace_depth == 0 => return Ok((&input[pos + 1..], value)),
            '{' => {
                brace_depth += 1;
                value.push('{');
            }
            '}' => {
                brace_depth -= 1;
                value.push('}');
            }
            '\\' => {
                value.push('\\');
                if let Some((_, escaped)) = chars.next() {
                    value.push(escaped);
                }
            }
            c => value.push(c),
        }
    }

    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Char,
    )))
}
