//! Shell-glob pattern matching for the stripping and replacement operators
//!
//! The dialect is deliberately small:
//! - `*` matches any run of characters, including the empty run
//! - `?` matches exactly one character
//! - `[...]` matches one character from a class (ranges, `!`/`^` negation,
//!   POSIX names such as `[:alpha:]`)
//! - `\x` matches `x` literally
//!
//! Patterns are parsed on every use and never cached. Searches simulate the
//! token sequence as a set of live states over the subject, so a search costs
//! time proportional to the subject length times the pattern length.

use std::ops::Range;

/// Where a match must be pinned within the subject
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Match must begin at the first character
    Start,
    /// Match must end at the last character
    End,
}

/// Which of several satisfying matches to prefer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Greediness {
    Shortest,
    Longest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(char),
    AnyChar,
    AnyRun,
    Class(CharClass),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CharClass {
    negated: bool,
    items: Vec<ClassItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ClassItem {
    Char(char),
    Range(char, char),
    Named(NamedClass),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NamedClass {
    Alpha,
    Digit,
    Alnum,
    Upper,
    Lower,
    Space,
    Punct,
    Xdigit,
}

impl NamedClass {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "alpha" => Some(Self::Alpha),
            "digit" => Some(Self::Digit),
            "alnum" => Some(Self::Alnum),
            "upper" => Some(Self::Upper),
            "lower" => Some(Self::Lower),
            "space" => Some(Self::Space),
            "punct" => Some(Self::Punct),
            "xdigit" => Some(Self::Xdigit),
            _ => None,
        }
    }

    fn contains(self, c: char) -> bool {
        match self {
            Self::Alpha => c.is_alphabetic(),
            Self::Digit => c.is_ascii_digit(),
            Self::Alnum => c.is_alphanumeric(),
            Self::Upper => c.is_uppercase(),
            Self::Lower => c.is_lowercase(),
            Self::Space => c.is_whitespace(),
            Self::Punct => c.is_ascii_punctuation(),
            Self::Xdigit => c.is_ascii_hexdigit(),
        }
    }
}

impl CharClass {
    fn contains(&self, c: char) -> bool {
        let hit = self.items.iter().any(|item| match *item {
            ClassItem::Char(x) => x == c,
            ClassItem::Range(lo, hi) => lo <= c && c <= hi,
            ClassItem::Named(named) => named.contains(c),
        });
        hit != self.negated
    }
}

impl Token {
    fn matches_char(&self, c: char) -> bool {
        match self {
            Token::Literal(x) => *x == c,
            Token::AnyChar => true,
            Token::AnyRun => true,
            Token::Class(class) => class.contains(c),
        }
    }
}

/// A parsed glob pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    tokens: Vec<Token>,
}

impl Pattern {
    /// Parse a glob pattern. Parsing never fails: an unterminated class or a
    /// trailing backslash is taken literally.
    pub fn parse(source: &str) -> Self {
        let chars: Vec<char> = source.chars().collect();
        let mut tokens = Vec::new();
        let mut i = 0;

        while i < chars.len() {
            match chars[i] {
                '*' => {
                    // Consecutive stars are equivalent to one
                    if tokens.last() != Some(&Token::AnyRun) {
                        tokens.push(Token::AnyRun);
                    }
                    i += 1;
                }
                '?' => {
                    tokens.push(Token::AnyChar);
                    i += 1;
                }
                '\\' if i + 1 < chars.len() => {
                    tokens.push(Token::Literal(chars[i + 1]));
                    i += 2;
                }
                '[' => match parse_class(&chars, i) {
                    Some((class, next)) => {
                        tokens.push(Token::Class(class));
                        i = next;
                    }
                    None => {
                        tokens.push(Token::Literal('['));
                        i += 1;
                    }
                },
                c => {
                    tokens.push(Token::Literal(c));
                    i += 1;
                }
            }
        }

        Self { tokens }
    }

    /// Whether the pattern matches the whole of `text`
    pub fn is_match(&self, text: &[char]) -> bool {
        let tokens = &self.tokens;
        let (mut p, mut t) = (0, 0);
        // Token index following the last `*`, and the text position it has consumed up to
        let mut backtrack: Option<(usize, usize)> = None;

        while t < text.len() {
            if p < tokens.len() {
                if tokens[p] == Token::AnyRun {
                    backtrack = Some((p + 1, t));
                    p += 1;
                    continue;
                }
                if tokens[p].matches_char(text[t]) {
                    p += 1;
                    t += 1;
                    continue;
                }
            }
            match backtrack {
                Some((after_star, consumed)) => {
                    p = after_star;
                    t = consumed + 1;
                    backtrack = Some((after_star, consumed + 1));
                }
                None => return false,
            }
        }

        tokens[p..].iter().all(|tok| *tok == Token::AnyRun)
    }

    /// Find a match pinned to one end of `subject`.
    ///
    /// Returns the character range of the match, or `None` when no prefix
    /// (resp. suffix) of `subject` matches.
    pub fn find_anchored(
        &self,
        subject: &[char],
        anchor: Anchor,
        greediness: Greediness,
    ) -> Option<Range<usize>> {
        let n = subject.len();
        match anchor {
            Anchor::Start => {
                let accepted = sweep(&self.tokens, subject.iter().copied());
                pick_length(&accepted, 0, greediness).map(|len| 0..len)
            }
            Anchor::End => {
                // A glob read backwards matches the reversed subject
                let reversed: Vec<Token> = self.tokens.iter().rev().cloned().collect();
                let accepted = sweep(&reversed, subject.iter().rev().copied());
                pick_length(&accepted, 0, greediness).map(|len| n - len..n)
            }
        }
    }

    /// Find the earliest non-empty match starting at or after `from`.
    ///
    /// Among matches at the earliest start position, `greediness` picks the
    /// shortest or longest one.
    pub fn find_from(
        &self,
        subject: &[char],
        from: usize,
        greediness: Greediness,
    ) -> Option<Range<usize>> {
        let start = self.earliest_start(subject, from)?;
        let accepted = sweep(&self.tokens, subject[start..].iter().copied());
        pick_length(&accepted, 1, greediness).map(|len| start..start + len)
    }

    /// Earliest position at or after `from` where a non-empty match begins.
    ///
    /// One pass over the subject, starting a thread at every position. Each
    /// token state remembers the smallest start that reaches it.
    fn earliest_start(&self, subject: &[char], from: usize) -> Option<usize> {
        let tokens = &self.tokens;
        let m = tokens.len();
        let mut states: Vec<Option<usize>> = vec![None; m + 1];
        let mut best: Option<usize> = None;

        for pos in from..=subject.len() {
            if states[0].is_none() {
                states[0] = Some(pos);
            }
            close_min(tokens, &mut states);

            if let Some(start) = states[m] {
                if start < pos && best.map_or(true, |b| start < b) {
                    best = Some(start);
                }
            }
            if let Some(b) = best {
                // No live thread can still finish with an earlier start
                if states.iter().flatten().all(|&s| s >= b) {
                    break;
                }
            }
            if pos == subject.len() {
                break;
            }

            let c = subject[pos];
            let mut next: Vec<Option<usize>> = vec![None; m + 1];
            for (p, token) in tokens.iter().enumerate() {
                let Some(start) = states[p] else { continue };
                let target = match token {
                    Token::AnyRun => p,
                    tok if tok.matches_char(c) => p + 1,
                    _ => continue,
                };
                next[target] = Some(next[target].map_or(start, |s| s.min(start)));
            }
            states = next;
        }

        best
    }
}

/// Run the pattern over `chars` from a fixed start.
///
/// Entry `len` of the result is true when the first `len` characters match.
/// The table stops growing once no token state is alive.
fn sweep(tokens: &[Token], chars: impl Iterator<Item = char>) -> Vec<bool> {
    let m = tokens.len();
    let mut states = vec![false; m + 1];
    states[0] = true;
    close(tokens, &mut states);
    let mut accepted = vec![states[m]];

    for c in chars {
        let mut next = vec![false; m + 1];
        let mut alive = false;
        for (p, token) in tokens.iter().enumerate() {
            if !states[p] {
                continue;
            }
            match token {
                Token::AnyRun => next[p] = true,
                tok if tok.matches_char(c) => next[p + 1] = true,
                _ => continue,
            }
            alive = true;
        }
        if !alive {
            break;
        }
        close(tokens, &mut next);
        states = next;
        accepted.push(states[m]);
    }

    accepted
}

/// A live state on `*` may also skip past it
fn close(tokens: &[Token], states: &mut [bool]) {
    for (p, token) in tokens.iter().enumerate() {
        if states[p] && *token == Token::AnyRun {
            states[p + 1] = true;
        }
    }
}

fn close_min(tokens: &[Token], states: &mut [Option<usize>]) {
    for (p, token) in tokens.iter().enumerate() {
        if *token != Token::AnyRun {
            continue;
        }
        if let Some(start) = states[p] {
            states[p + 1] = Some(states[p + 1].map_or(start, |s| s.min(start)));
        }
    }
}

/// Shortest or longest accepted length of at least `min`
fn pick_length(accepted: &[bool], min: usize, greediness: Greediness) -> Option<usize> {
    let mut lengths = (min..accepted.len()).filter(|&len| accepted[len]);
    match greediness {
        Greediness::Shortest => lengths.next(),
        Greediness::Longest => lengths.last(),
    }
}

/// Parse a bracket class starting at `chars[start] == '['`.
///
/// Returns the class and the index just past its closing `]`, or `None` if
/// the class is never closed.
fn parse_class(chars: &[char], start: usize) -> Option<(CharClass, usize)> {
    let mut i = start + 1;
    let mut negated = false;
    if matches!(chars.get(i), Some('!') | Some('^')) {
        negated = true;
        i += 1;
    }

    let mut items = Vec::new();
    let mut first = true;

    loop {
        let c = *chars.get(i)?;
        if c == ']' && !first {
            return Some((CharClass { negated, items }, i + 1));
        }
        first = false;

        if c == '[' && chars.get(i + 1) == Some(&':') {
            if let Some((named, next)) = parse_named_class(chars, i) {
                items.push(ClassItem::Named(named));
                i = next;
                continue;
            }
        }

        let (lo, next) = class_char(chars, i)?;
        i = next;

        if chars.get(i) == Some(&'-') && chars.get(i + 1).is_some_and(|&c| c != ']') {
            let (hi, next) = class_char(chars, i + 1)?;
            items.push(ClassItem::Range(lo, hi));
            i = next;
        } else {
            items.push(ClassItem::Char(lo));
        }
    }
}

fn class_char(chars: &[char], i: usize) -> Option<(char, usize)> {
    match chars.get(i)? {
        '\\' => chars.get(i + 1).map(|&c| (c, i + 2)),
        &c => Some((c, i + 1)),
    }
}

fn parse_named_class(chars: &[char], start: usize) -> Option<(NamedClass, usize)> {
    let name_start = start + 2;
    let close = (name_start..chars.len().saturating_sub(1))
        .find(|&j| chars[j] == ':' && chars[j + 1] == ']')?;
    let name: String = chars[name_start..close].iter().collect();
    NamedClass::from_name(&name).map(|named| (named, close + 2))
}

/// Run an anchored match directly on string slices.
///
/// Returns the matched substring of `subject`, or `None` for no match.
pub fn find_match<'a>(
    subject: &'a str,
    pattern: &str,
    anchor: Anchor,
    greediness: Greediness,
) -> Option<&'a str> {
    let chars: Vec<char> = subject.chars().collect();
    let range = Pattern::parse(pattern).find_anchored(&chars, anchor, greediness)?;

    let byte_at = |idx: usize| {
        subject
            .char_indices()
            .nth(idx)
            .map_or(subject.len(), |(b, _)| b)
    };
    Some(&subject[byte_at(range.start)..byte_at(range.end)])
}
