//! Expression evaluation against a variable scope
//!
//! Evaluation is infallible: unset variables read as the empty string unless
//! the operator distinguishes unset from empty, and a pattern that never
//! matches leaves the value unchanged. All string operations work on
//! `char`s, so multi-byte characters are counted and sliced as single units.

use super::parser::{
    CaseConversion, DefaultWhen, Expression, Operator, ReplaceScope, Segment, Word,
};
use super::pattern::{Anchor, Greediness, Pattern};
use crate::env::Environment;

/// Compute the string a parsed marker expands to.
///
/// The only side effect is the write-back performed by the assigning
/// default operators (`=`, `:=`).
pub fn evaluate<E: Environment + ?Sized>(expr: &Expression, env: &mut E) -> String {
    let name = expr.name.as_str();

    match &expr.op {
        Operator::Value => env.get(name).unwrap_or_default(),
        Operator::Length => {
            let value = env.get(name).unwrap_or_default();
            value.chars().count().to_string()
        }
        Operator::Case(conversion) => {
            convert_case(&env.get(name).unwrap_or_default(), *conversion)
        }
        Operator::Substring { offset, length } => {
            substring(&env.get(name).unwrap_or_default(), *offset, *length)
        }
        Operator::Strip {
            pattern,
            anchor,
            greediness,
        } => {
            let value = env.get(name).unwrap_or_default();
            let pattern = render_word(pattern, env);
            strip(&value, &pattern, *anchor, *greediness)
        }
        Operator::Default { word, when, assign } => {
            let current = env.get(name);
            let use_default = match (when, current.as_deref()) {
                (_, None) => true,
                (DefaultWhen::UnsetOrEmpty, Some("")) => true,
                _ => false,
            };
            if !use_default {
                return current.unwrap_or_default();
            }

            let value = render_word(word, env);
            if *assign {
                env.set(name, value.clone());
            }
            value
        }
        Operator::Replace {
            pattern,
            replacement,
            scope,
        } => {
            let value = env.get(name).unwrap_or_default();
            let pattern = render_word(pattern, env);
            let replacement = render_word(replacement, env);
            replace(&value, &pattern, &replacement, *scope)
        }
    }
}

/// Evaluate an operand, expanding any nested markers in order
pub fn render_word<E: Environment + ?Sized>(word: &Word, env: &mut E) -> String {
    let mut out = String::new();
    for segment in &word.segments {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Expansion(nested) => out.push_str(&evaluate(nested, env)),
        }
    }
    out
}

fn convert_case(value: &str, conversion: CaseConversion) -> String {
    match conversion {
        CaseConversion::UpperAll => value.to_uppercase(),
        CaseConversion::LowerAll => value.to_lowercase(),
        CaseConversion::UpperFirst => {
            let mut chars = value.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
        CaseConversion::LowerFirst => {
            let mut chars = value.chars();
            match chars.next() {
                Some(first) => first.to_lowercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

/// `${var:offset:length}` with clamping instead of errors.
///
/// A negative offset counts back from the end (clamped to the start); a
/// negative length marks an end position counted back from the end.
fn substring(value: &str, offset: i64, length: Option<i64>) -> String {
    let chars: Vec<char> = value.chars().collect();
    let len = chars.len() as i64;

    let start = if offset < 0 {
        (len + offset).max(0)
    } else {
        offset
    };
    if start >= len {
        return String::new();
    }

    let end = match length {
        None => len,
        Some(n) if n >= 0 => start.saturating_add(n).min(len),
        Some(n) => len + n,
    };
    if end <= start {
        return String::new();
    }

    chars[start as usize..end as usize].iter().collect()
}

fn strip(value: &str, pattern: &str, anchor: Anchor, greediness: Greediness) -> String {
    let chars: Vec<char> = value.chars().collect();
    match Pattern::parse(pattern).find_anchored(&chars, anchor, greediness) {
        Some(range) => chars[..range.start]
            .iter()
            .chain(&chars[range.end..])
            .collect(),
        None => value.to_string(),
    }
}

fn replace(value: &str, pattern: &str, replacement: &str, scope: ReplaceScope) -> String {
    let chars: Vec<char> = value.chars().collect();
    let pattern = Pattern::parse(pattern);

    let splice = |range: std::ops::Range<usize>| -> String {
        let mut out: String = chars[..range.start].iter().collect();
        out.push_str(replacement);
        out.extend(&chars[range.end..]);
        out
    };

    match scope {
        ReplaceScope::First => pattern
            .find_from(&chars, 0, Greediness::Shortest)
            .map_or_else(|| value.to_string(), splice),
        ReplaceScope::Prefix => pattern
            .find_anchored(&chars, Anchor::Start, Greediness::Shortest)
            .map_or_else(|| value.to_string(), splice),
        ReplaceScope::Suffix => pattern
            .find_anchored(&chars, Anchor::End, Greediness::Shortest)
            .map_or_else(|| value.to_string(), splice),
        ReplaceScope::All => {
            let mut out = String::with_capacity(value.len());
            let mut pos = 0;
            while let Some(range) = pattern.find_from(&chars, pos, Greediness::Shortest) {
                out.extend(&chars[pos..range.start]);
                out.push_str(replacement);
                pos = range.end;
            }
            out.extend(&chars[pos..]);
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MapEnv;
    use crate::expand::parser::parse;

    fn eval(body: &str, env: &mut MapEnv) -> String {
        evaluate(&parse(body).unwrap(), env)
    }

    fn with(name: &str, value: &str) -> MapEnv {
        MapEnv::new().with_var(name, value)
    }

    #[test]
    fn test_value_and_missing() {
        let mut env = with("x", "value");
        assert_eq!(eval("x", &mut env), "value");
        assert_eq!(eval("missing", &mut env), "");
    }

    #[test]
    fn test_length_counts_chars() {
        assert_eq!(eval("#x", &mut MapEnv::new()), "0");
        assert_eq!(eval("#x", &mut with("x", "abc")), "3");
        assert_eq!(eval("#x", &mut with("x", "héllo")), "5");
    }

    #[test]
    fn test_case_conversion() {
        let mut env = with("x", "abc");
        assert_eq!(eval("x^^", &mut env), "ABC");
        assert_eq!(eval("x^", &mut env), "Abc");

        let mut env = with("x", "ÉCOLE");
        assert_eq!(eval("x,,", &mut env), "école");
        assert_eq!(eval("x,", &mut env), "éCOLE");

        assert_eq!(eval("x^", &mut MapEnv::new()), "");
    }

    #[test]
    fn test_substring_clamping() {
        let mut env = with("x", "abcdef");
        assert_eq!(eval("x:1:2", &mut env), "bc");
        assert_eq!(eval("x:2", &mut env), "cdef");
        assert_eq!(eval("x:10", &mut env), "");
        assert_eq!(eval("x:6", &mut env), "");
        assert_eq!(eval("x:4:100", &mut env), "ef");
        assert_eq!(eval("x: -2", &mut env), "ef");
        assert_eq!(eval("x:(-100):2", &mut env), "ab");
        assert_eq!(eval("x:1:-1", &mut env), "bcde");
        assert_eq!(eval("x:4:-3", &mut env), "");
        assert_eq!(eval("x:0:0", &mut env), "");
    }

    #[test]
    fn test_substring_multibyte() {
        let mut env = with("x", "añb€c");
        assert_eq!(eval("x:1:3", &mut env), "ñb€");
    }

    #[test]
    fn test_strip_prefix_and_suffix() {
        let mut env = with("x", "foobarfoo");
        assert_eq!(eval("x#foo*", &mut env), "barfoo");
        assert_eq!(eval("x##foo*", &mut env), "");
        assert_eq!(eval("x*o", &mut env), "foobarfo");
        assert_eq!(eval("x**b*", &mut env), "foo");
        assert_eq!(eval("x#zzz", &mut env), "foobarfoo");
    }

    #[test]
    fn test_strip_file_extension() {
        let mut env = with("file", "archive.tar.gz");
        assert_eq!(eval("file*.*", &mut env), "archive.tar");
        assert_eq!(eval("file**.*", &mut env), "archive");
        assert_eq!(eval("file#*.", &mut env), "tar.gz");
        assert_eq!(eval("file##*.", &mut env), "gz");
    }

    #[test]
    fn test_default_unset_vs_empty() {
        let mut env = with("empty", "");
        assert_eq!(eval("empty-def", &mut env), "");
        assert_eq!(eval("empty:-def", &mut env), "def");
        assert_eq!(eval("unset-def", &mut env), "def");
        assert_eq!(eval("unset:-def", &mut env), "def");
        assert!(!env.is_set("unset"));
    }

    #[test]
    fn test_default_keeps_set_value() {
        let mut env = with("x", "set");
        assert_eq!(eval("x-def", &mut env), "set");
        assert_eq!(eval("x:=def", &mut env), "set");
        assert_eq!(env.get("x").as_deref(), Some("set"));
    }

    #[test]
    fn test_assigning_default_writes_back() {
        let mut env = with("empty", "");

        assert_eq!(eval("y=hi", &mut env), "hi");
        assert_eq!(env.get("y").as_deref(), Some("hi"));

        assert_eq!(eval("empty=ignored", &mut env), "");
        assert_eq!(env.get("empty").as_deref(), Some(""));

        assert_eq!(eval("empty:=filled", &mut env), "filled");
        assert_eq!(env.get("empty").as_deref(), Some("filled"));
    }

    #[test]
    fn test_default_operand_is_lazy() {
        let mut env = with("x", "set");
        assert_eq!(eval("x:-${y=side-effect}", &mut env), "set");
        assert!(!env.is_set("y"));

        assert_eq!(eval("z:-${y=side-effect}", &mut env), "side-effect");
        assert_eq!(env.get("y").as_deref(), Some("side-effect"));
    }

    #[test]
    fn test_replace_first_and_all() {
        let mut env = with("x", "aXbXc");
        assert_eq!(eval("x/X/_", &mut env), "a_bXc");
        assert_eq!(eval("x//X/_", &mut env), "a_b_c");
        assert_eq!(eval("x/Q/_", &mut env), "aXbXc");
        assert_eq!(eval("x//X", &mut env), "abc");
    }

    #[test]
    fn test_replace_glob_uses_shortest_match() {
        let mut env = with("x", "a-b-c");
        assert_eq!(eval("x/-*/+", &mut env), "a+b-c");
        assert_eq!(eval("x//?-/", &mut env), "c");
    }

    #[test]
    fn test_replace_anchored() {
        let mut env = with("x", "abcabc");
        assert_eq!(eval("x/#abc/X", &mut env), "Xabc");
        assert_eq!(eval("x/*abc/X", &mut env), "abcX");
        assert_eq!(eval("x/#bc/X", &mut env), "abcabc");
        assert_eq!(eval("x/#/pre-", &mut env), "pre-abcabc");
        assert_eq!(eval("x/*/-post", &mut env), "abcabc-post");
    }

    #[test]
    fn test_replace_all_with_empty_pattern_is_noop() {
        let mut env = with("x", "abc");
        assert_eq!(eval("x///_", &mut env), "abc");
    }

    #[test]
    fn test_replace_with_braces_in_operands() {
        let mut env = with("x", "say {a}");
        assert_eq!(eval("x/{a}/{b}", &mut env), "say {b}");
    }

    #[test]
    fn test_escaped_glob_chars_are_literal() {
        let mut env = with("x", "a*b*c");
        assert_eq!(eval("x//\\*/+", &mut env), "a+b+c");
    }

    #[test]
    fn test_nested_expansion_in_pattern_and_replacement() {
        let mut env = MapEnv::from_pairs([("x", "hello world"), ("old", "world"), ("new", "there")]);
        assert_eq!(eval("x/${old}/${new}", &mut env), "hello there");
    }
}
