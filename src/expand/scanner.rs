//! Scanner / substitution driver
//!
//! Walks the input once, left to right. Text outside markers is copied
//! verbatim; each `${...}` marker is parsed, evaluated and spliced into the
//! output. Only the braced form is recognized: a `$` not followed by `{` is
//! ordinary text, and `\${` produces a literal `${`. A doubled backslash
//! right before `${` stands for one literal backslash, so `\\${x}` yields a
//! backslash followed by the value of `x`.

use super::error::SyntaxError;
use super::evaluator::evaluate;
use super::parser::parse_body;
use crate::env::Environment;
use tracing::debug;

/// Expand every `${...}` marker in `text` against `env`.
///
/// Fails only when a marker is malformed; in that case nothing is returned
/// for the whole call. Assignments made by `=`/`:=` markers are written to
/// `env` and seen by later markers in the same text.
///
/// # Examples
///
/// ```
/// use boilr::env::MapEnv;
/// use boilr::expand::expand;
///
/// let mut env = MapEnv::from_pairs([("x", "aXbXc")]);
/// assert_eq!(expand("${x/X/_} ${x//X/_}", &mut env).unwrap(), "a_bXc a_b_c");
/// ```
pub fn expand<E: Environment + ?Sized>(text: &str, env: &mut E) -> Result<String, SyntaxError> {
    if !text.contains("${") {
        return Ok(text.to_string());
    }

    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut markers = 0usize;
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '\\' if chars.get(i + 1) == Some(&'\\') && starts_marker(&chars, i + 2) => {
                out.push('\\');
                i += 2;
            }
            '\\' if starts_marker(&chars, i + 1) => {
                out.push_str("${");
                i += 3;
            }
            '$' if chars.get(i + 1) == Some(&'{') => {
                let close =
                    find_closing_brace(&chars, i + 2).ok_or(SyntaxError::unterminated(i))?;
                let expression = parse_body(&chars[i + 2..close], i + 2)?;
                let value = evaluate(&expression, env);
                debug!(
                    "Expanded marker at {} for '{}' to {} chars",
                    i,
                    expression.name,
                    value.chars().count()
                );
                out.push_str(&value);
                markers += 1;
                i = close + 1;
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }

    debug!("Expanded {} marker(s)", markers);
    Ok(out)
}

fn starts_marker(chars: &[char], at: usize) -> bool {
    chars.get(at) == Some(&'$') && chars.get(at + 1) == Some(&'{')
}

/// Index of the `}` balancing a `${` whose body starts at `from`.
///
/// Every unescaped `{` inside the body opens a nested group, so operands such
/// as `${x/{a}/{b}}` stay inside one marker.
pub(crate) fn find_closing_brace(chars: &[char], from: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut i = from;

    while i < chars.len() {
        match chars[i] {
            '\\' => {
                i += 2;
                continue;
            }
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::env::MapEnv;
    use proptest::prelude::*;

    fn valid_var_name() -> impl Strategy<Value = String> {
        r"[a-zA-Z_][a-zA-Z0-9_]{0,20}"
    }

    fn safe_value() -> impl Strategy<Value = String> {
        r"[a-zA-Z0-9 _.-]{0,30}"
    }

    proptest! {
        #[test]
        fn prop_text_without_markers_is_identity(text in "[^{]*") {
            let mut env = MapEnv::new();
            prop_assert_eq!(expand(&text, &mut env).unwrap(), text);
        }

        #[test]
        fn prop_plain_reference_yields_value(name in valid_var_name(), value in safe_value()) {
            let mut env = MapEnv::new().with_var(name.clone(), value.clone());
            let result = expand(&format!("${{{}}}", name), &mut env).unwrap();
            prop_assert_eq!(result, value);
        }

        #[test]
        fn prop_expansion_is_idempotent_for_safe_values(
            template in r"[a-z ]{0,10}(\$\{[a-c]\}[a-z ]{0,10}){0,4}",
            a in safe_value(),
            b in safe_value(),
        ) {
            let mut env = MapEnv::from_pairs([("a", a), ("b", b)]);
            let once = expand(&template, &mut env).unwrap();
            let twice = expand(&once, &mut env).unwrap();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_expansion_is_deterministic(
            template in r"[a-z ]{0,10}(\$\{[a-c](#|##|\*|\*\*|:-|/|//)[a-z?*]{0,3}\}){0,3}",
            a in safe_value(),
        ) {
            let mut first = MapEnv::from_pairs([("a", a.clone())]);
            let mut second = MapEnv::from_pairs([("a", a)]);
            prop_assert_eq!(expand(&template, &mut first), expand(&template, &mut second));
        }
    }
}
