//! Gitignore-style rules for skipping files in a template directory

use glob::{MatchOptions, Pattern};
use tracing::warn;

/// Rules applied when no `--ignore` pattern is given
pub const DEFAULT_IGNORE: &[&str] = &[".git", ".DS_Store", ".env"];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[derive(Debug, Clone)]
struct Rule {
    pattern: Pattern,
    negated: bool,
    dir_only: bool,
    rooted: bool,
}

impl Rule {
    fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }

        let (negated, line) = match line.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, line),
        };
        let (dir_only, line) = match line.strip_suffix('/') {
            Some(rest) => (true, rest),
            None => (false, line),
        };
        let rooted = line.contains('/');
        let line = line.trim_start_matches('/');
        if line.is_empty() {
            return None;
        }

        match Pattern::new(line) {
            Ok(pattern) => Some(Self {
                pattern,
                negated,
                dir_only,
                rooted,
            }),
            Err(e) => {
                warn!("Invalid ignore pattern '{}': {}", line, e);
                None
            }
        }
    }

    /// `components` is the relative path split on `/`; all but the last are directories
    fn matches(&self, components: &[&str], is_dir: bool) -> bool {
        let last = components.len().saturating_sub(1);
        let component_is_dir = |idx: usize| idx < last || is_dir;

        if self.rooted {
            (0..components.len()).any(|idx| {
                (!self.dir_only || component_is_dir(idx))
                    && self
                        .pattern
                        .matches_with(&components[..=idx].join("/"), MATCH_OPTIONS)
            })
        } else {
            components.iter().enumerate().any(|(idx, component)| {
                (!self.dir_only || component_is_dir(idx))
                    && self.pattern.matches_with(component, MATCH_OPTIONS)
            })
        }
    }
}

/// An ordered list of ignore rules; the last matching rule decides
///
/// - a rule without `/` matches any path component
/// - a rule containing `/` matches from the root, as a whole path or a
///   leading directory prefix
/// - a trailing `/` restricts the rule to directories
/// - a leading `!` re-includes what earlier rules excluded
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    rules: Vec<Rule>,
}

impl IgnoreRules {
    /// No rules: nothing is ignored
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules = Self::new();
        for line in lines {
            rules.add(line.as_ref());
        }
        rules
    }

    pub fn add(&mut self, line: &str) {
        if let Some(rule) = Rule::parse(line) {
            self.rules.push(rule);
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether `relative` (a `/`-separated path below the template root) is ignored
    pub fn is_ignored(&self, relative: &str, is_dir: bool) -> bool {
        let components: Vec<&str> = relative.split('/').filter(|c| !c.is_empty()).collect();
        if components.is_empty() {
            return false;
        }

        self.rules
            .iter()
            .rev()
            .find(|rule| rule.matches(&components, is_dir))
            .is_some_and(|rule| !rule.negated)
    }
}

impl Default for IgnoreRules {
    fn default() -> Self {
        Self::from_lines(DEFAULT_IGNORE)
    }
}
