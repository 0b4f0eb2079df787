//! Expression parser for the text between `${` and its matching `}`
//!
//! The body is split into a variable name followed by an operator suffix.
//! Operators are recognized longest delimiter first, so `##` wins over `#`
//! and `//` over `/`. Operand text (patterns, replacements, defaults) may
//! itself contain nested `${...}` markers, which are parsed here as well so
//! that evaluation never has to deal with syntax errors.

use super::error::SyntaxError;
use super::pattern::{Anchor, Greediness};
use super::scanner::find_closing_brace;
use tracing::trace;

/// A fully parsed `${...}` marker
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    /// Variable the operator applies to; always present, even for `${#var}`
    pub name: String,
    pub op: Operator,
}

/// The expansion operator applied to the variable
#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    /// `${var}`
    Value,
    /// `${#var}`
    Length,
    /// `${var^}`, `${var^^}`, `${var,}`, `${var,,}`
    Case(CaseConversion),
    /// `${var:offset}` and `${var:offset:length}`
    Substring { offset: i64, length: Option<i64> },
    /// `${var#pat}`, `${var##pat}`, `${var*pat}`, `${var**pat}`
    Strip {
        pattern: Word,
        anchor: Anchor,
        greediness: Greediness,
    },
    /// `${var-def}`, `${var:-def}`, `${var=def}`, `${var:=def}`
    Default {
        word: Word,
        when: DefaultWhen,
        assign: bool,
    },
    /// `${var/pat/rep}`, `${var//pat/rep}`, `${var/#pat/rep}`, `${var/*pat/rep}`
    Replace {
        pattern: Word,
        replacement: Word,
        scope: ReplaceScope,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseConversion {
    UpperFirst,
    UpperAll,
    LowerFirst,
    LowerAll,
}

/// When a default operand replaces the variable's value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultWhen {
    /// Only when the variable is absent (`-`, `=`)
    Unset,
    /// When the variable is absent or set to `""` (`:-`, `:=`)
    UnsetOrEmpty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceScope {
    /// First occurrence, scanning left to right
    First,
    /// Every non-overlapping occurrence
    All,
    /// Single occurrence anchored at the start of the value
    Prefix,
    /// Single occurrence anchored at the end of the value
    Suffix,
}

/// Operand text, possibly interleaved with nested expansions
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Word {
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Text(String),
    Expansion(Expression),
}

impl Word {
    pub fn literal(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            return Self::default();
        }
        Self {
            segments: vec![Segment::Text(text)],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// How backslash escapes in operand text are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Escapes {
    /// Keep the backslash so the glob matcher sees a literal character
    Keep,
    /// Drop the backslash, keeping only the escaped character
    Strip,
}

/// Parse a marker body such as `name:-fallback`.
///
/// Error positions are character offsets into `body`.
pub fn parse(body: &str) -> Result<Expression, SyntaxError> {
    let chars: Vec<char> = body.chars().collect();
    parse_body(&chars, 0)
}

/// Parse a marker body whose first character sits at `body_start` in the
/// enclosing text. The marker's `${` is assumed to precede it directly.
pub(crate) fn parse_body(body: &[char], body_start: usize) -> Result<Expression, SyntaxError> {
    let marker_start = body_start.saturating_sub(2);

    if body.is_empty() {
        return Err(SyntaxError::new(marker_start, "empty expansion marker"));
    }

    if body[0] == '#' {
        let name = parse_name(&body[1..], body_start + 1)?;
        if name.chars().count() != body.len() - 1 {
            return Err(SyntaxError::unrecognized(marker_start, &collect(body)));
        }
        return Ok(Expression {
            name,
            op: Operator::Length,
        });
    }

    let name = parse_name(body, body_start)?;
    let name_len = name.chars().count();
    let rest = &body[name_len..];
    let rest_start = body_start + name_len;

    let op = match rest {
        [] => Operator::Value,
        ['^', '^'] => Operator::Case(CaseConversion::UpperAll),
        ['^'] => Operator::Case(CaseConversion::UpperFirst),
        [',', ','] => Operator::Case(CaseConversion::LowerAll),
        [','] => Operator::Case(CaseConversion::LowerFirst),
        [':', '-', tail @ ..] => default_op(tail, rest_start + 2, DefaultWhen::UnsetOrEmpty, false)?,
        [':', '=', tail @ ..] => default_op(tail, rest_start + 2, DefaultWhen::UnsetOrEmpty, true)?,
        [':', tail @ ..] => substring_op(tail, rest_start + 1)?,
        ['#', '#', tail @ ..] => strip_op(tail, rest_start + 2, Anchor::Start, Greediness::Longest)?,
        ['#', tail @ ..] => strip_op(tail, rest_start + 1, Anchor::Start, Greediness::Shortest)?,
        ['*', '*', tail @ ..] => strip_op(tail, rest_start + 2, Anchor::End, Greediness::Longest)?,
        ['*', tail @ ..] => strip_op(tail, rest_start + 1, Anchor::End, Greediness::Shortest)?,
        ['-', tail @ ..] => default_op(tail, rest_start + 1, DefaultWhen::Unset, false)?,
        ['=', tail @ ..] => default_op(tail, rest_start + 1, DefaultWhen::Unset, true)?,
        ['/', '/', tail @ ..] => replace_op(tail, rest_start + 2, ReplaceScope::All)?,
        ['/', '#', tail @ ..] => replace_op(tail, rest_start + 2, ReplaceScope::Prefix)?,
        ['/', '*', tail @ ..] => replace_op(tail, rest_start + 2, ReplaceScope::Suffix)?,
        ['/', tail @ ..] => replace_op(tail, rest_start + 1, ReplaceScope::First)?,
        _ => return Err(SyntaxError::unrecognized(marker_start, &collect(body))),
    };

    let expression = Expression { name, op };
    trace!("Parsed expansion marker at {}: {:?}", marker_start, expression);
    Ok(expression)
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn parse_name(chars: &[char], start: usize) -> Result<String, SyntaxError> {
    let len = chars.iter().take_while(|c| is_name_char(**c)).count();
    if len == 0 {
        return Err(SyntaxError::new(start, "missing variable name"));
    }
    if chars[0].is_ascii_digit() {
        return Err(SyntaxError::new(
            start,
            format!(
                "invalid variable name '{}': must not start with a digit",
                collect(&chars[..len])
            ),
        ));
    }
    Ok(collect(&chars[..len]))
}

fn default_op(
    tail: &[char],
    start: usize,
    when: DefaultWhen,
    assign: bool,
) -> Result<Operator, SyntaxError> {
    Ok(Operator::Default {
        word: parse_word(tail, start, Escapes::Strip)?,
        when,
        assign,
    })
}

fn strip_op(
    tail: &[char],
    start: usize,
    anchor: Anchor,
    greediness: Greediness,
) -> Result<Operator, SyntaxError> {
    Ok(Operator::Strip {
        pattern: parse_word(tail, start, Escapes::Keep)?,
        anchor,
        greediness,
    })
}

fn replace_op(tail: &[char], start: usize, scope: ReplaceScope) -> Result<Operator, SyntaxError> {
    let (pattern, replacement) = match split_unescaped(tail, '/') {
        Some(idx) => (
            parse_word(&tail[..idx], start, Escapes::Keep)?,
            parse_word(&tail[idx + 1..], start + idx + 1, Escapes::Strip)?,
        ),
        None => (parse_word(tail, start, Escapes::Keep)?, Word::default()),
    };
    Ok(Operator::Replace {
        pattern,
        replacement,
        scope,
    })
}

fn substring_op(tail: &[char], start: usize) -> Result<Operator, SyntaxError> {
    let (offset_chars, length_chars) = match tail.iter().position(|c| *c == ':') {
        Some(idx) => (&tail[..idx], Some((&tail[idx + 1..], start + idx + 1))),
        None => (tail, None),
    };

    let offset_text = collect(offset_chars);
    let offset = if offset_text.trim().is_empty() && length_chars.is_some() {
        0
    } else {
        parse_number(&offset_text, start, "offset")?
    };

    let length = match length_chars {
        Some((chars, _)) if collect(chars).trim().is_empty() => Some(0),
        Some((chars, pos)) => Some(parse_number(&collect(chars), pos, "length")?),
        None => None,
    };

    Ok(Operator::Substring { offset, length })
}

/// Parse a substring bound: an optionally parenthesised, optionally signed integer
fn parse_number(text: &str, position: usize, what: &str) -> Result<i64, SyntaxError> {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .unwrap_or(trimmed)
        .trim();

    inner.parse::<i64>().map_err(|_| {
        SyntaxError::new(
            position,
            format!("invalid substring {} '{}': expected an integer", what, text),
        )
    })
}

/// Index of the first `delim` that is neither escaped nor inside a brace group
fn split_unescaped(chars: &[char], delim: char) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\\' => {
                i += 2;
                continue;
            }
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            c if c == delim && depth == 0 => return Some(i),
            _ => {}
        }
        i += 1;
    }
    None
}

/// Parse operand text into literal segments and nested expansions
fn parse_word(chars: &[char], start: usize, escapes: Escapes) -> Result<Word, SyntaxError> {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\\' && i + 1 < chars.len() {
            if escapes == Escapes::Keep {
                text.push('\\');
            }
            text.push(chars[i + 1]);
            i += 2;
            continue;
        }

        if c == '$' && chars.get(i + 1) == Some(&'{') {
            let close = find_closing_brace(chars, i + 2)
                .ok_or_else(|| SyntaxError::unterminated(start + i))?;
            let nested = parse_body(&chars[i + 2..close], start + i + 2)?;
            if !text.is_empty() {
                segments.push(Segment::Text(std::mem::take(&mut text)));
            }
            segments.push(Segment::Expansion(nested));
            i = close + 1;
            continue;
        }

        text.push(c);
        i += 1;
    }

    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }
    Ok(Word { segments })
}

fn collect(chars: &[char]) -> String {
    chars.iter().collect()
}
