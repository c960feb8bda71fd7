//! Glob metacharacter detection and shell-style pattern matching.
//!
//! Matching follows `fnmatch(3)`: `*`, `?`, bracket expressions with
//! ranges, negation and POSIX classes, and backslash escapes. Two flags
//! change how path-like names are treated:
//!
//! - `pathname`: `/` is only matched by a literal `/` in the pattern, so
//!   wildcards never cross a path separator.
//! - `period`: a leading `.` (at the start of the name, or after a `/` when
//!   `pathname` is set) is only matched by a literal `.` in the pattern.

/// Options controlling [`fnmatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchOptions {
    /// Wildcards and bracket expressions never match `/`.
    pub pathname: bool,

    /// A leading `.` must be matched explicitly.
    pub period: bool,

    /// Treat `\` as an ordinary character.
    pub noescape: bool,
}

impl MatchOptions {
    /// Options used for archive member globbing: `pathname` and `period`.
    #[must_use]
    pub const fn member() -> Self {
        Self {
            pathname: true,
            period: true,
            noescape: false,
        }
    }
}

/// Options for member glob expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobOptions {
    /// Whether `\` quotes the next character during metacharacter detection.
    pub honor_escapes: bool,

    /// How member names are matched against the pattern.
    pub matching: MatchOptions,
}

impl Default for GlobOptions {
    fn default() -> Self {
        Self {
            honor_escapes: true,
            matching: MatchOptions::member(),
        }
    }
}

/// Returns `true` if `pattern` contains glob metacharacters.
///
/// `*` and `?` always count. A `]` counts only when it closes a bracket
/// opened earlier by `[` and something sits between them; a `]` right after
/// the `[` is part of the bracket's contents, and so is a further `[`. With
/// `honor_escapes`, a `\` hides the character that follows it.
///
/// # Examples
///
/// ```
/// use armember_core::has_glob_metacharacters;
///
/// assert!(has_glob_metacharacters("*.o", true));
/// assert!(has_glob_metacharacters("foo[ab].o", true));
/// assert!(!has_glob_metacharacters("foo.o", true));
/// assert!(!has_glob_metacharacters("foo\\*.o", true));
/// assert!(has_glob_metacharacters("foo\\*.o", false));
/// ```
#[must_use]
pub fn has_glob_metacharacters(pattern: &str, honor_escapes: bool) -> bool {
    // Number of bytes seen since the last unclosed `[`.
    let mut bracket: Option<usize> = None;
    let mut bytes = pattern.bytes();

    while let Some(b) = bytes.next() {
        match b {
            b'*' | b'?' => return true,
            b'\\' if honor_escapes => {
                bytes.next();
                bracket = bracket.map(|n| n + 1);
            }
            // A `[` inside an open bracket is part of its contents.
            b'[' => bracket = Some(bracket.map_or(0, |n| n + 1)),
            b']' => match bracket {
                Some(n) if n > 0 => return true,
                Some(_) => bracket = Some(1),
                None => {}
            },
            _ => bracket = bracket.map(|n| n + 1),
        }
    }

    false
}

/// Matches `name` against the shell pattern `pattern`.
///
/// # Examples
///
/// ```
/// use armember_core::{fnmatch, MatchOptions};
///
/// let opts = MatchOptions::member();
/// assert!(fnmatch("*.o", "foo.o", opts));
/// assert!(!fnmatch("*.o", ".hidden.o", opts));
/// assert!(fnmatch(".*.o", ".hidden.o", opts));
/// assert!(!fnmatch("*.o", "dir/foo.o", opts));
/// ```
#[must_use]
pub fn fnmatch(pattern: &str, name: &str, opts: MatchOptions) -> bool {
    Matcher {
        pattern: pattern.as_bytes(),
        text: name.as_bytes(),
        opts,
    }
    .matches_at(0, 0)
}

struct Matcher<'a> {
    pattern: &'a [u8],
    text: &'a [u8],
    opts: MatchOptions,
}

impl Matcher<'_> {
    /// A `.` at `si` that only a literal `.` may match.
    fn is_leading_period(&self, si: usize) -> bool {
        self.opts.period
            && self.text.get(si) == Some(&b'.')
            && (si == 0 || (self.opts.pathname && self.text[si - 1] == b'/'))
    }

    fn is_separator(&self, c: u8) -> bool {
        self.opts.pathname && c == b'/'
    }

    fn matches_at(&self, mut pi: usize, mut si: usize) -> bool {
        let pat = self.pattern;
        let text = self.text;

        while pi < pat.len() {
            match pat[pi] {
                b'?' => {
                    let Some(&c) = text.get(si) else {
                        return false;
                    };
                    if self.is_separator(c) || self.is_leading_period(si) {
                        return false;
                    }
                    pi += 1;
                    si += 1;
                }
                b'*' => {
                    if self.is_leading_period(si) {
                        return false;
                    }
                    while pi < pat.len() && pat[pi] == b'*' {
                        pi += 1;
                    }
                    if pi == pat.len() {
                        return !self.opts.pathname || !text[si..].contains(&b'/');
                    }
                    for k in si..=text.len() {
                        if self.matches_at(pi, k) {
                            return true;
                        }
                        if k < text.len() && self.is_separator(text[k]) {
                            break;
                        }
                    }
                    return false;
                }
                b'[' => {
                    let Some(&c) = text.get(si) else {
                        return false;
                    };
                    match self.bracket(pi + 1, c) {
                        Some((matched, next)) => {
                            if !matched || self.is_separator(c) || self.is_leading_period(si) {
                                return false;
                            }
                            pi = next;
                        }
                        // Unterminated: `[` is an ordinary character.
                        None => {
                            if c != b'[' {
                                return false;
                            }
                            pi += 1;
                        }
                    }
                    si += 1;
                }
                b'\\' if !self.opts.noescape => {
                    // A trailing lone `\` matches nothing.
                    let Some(&literal) = pat.get(pi + 1) else {
                        return false;
                    };
                    if text.get(si) != Some(&literal) {
                        return false;
                    }
                    pi += 2;
                    si += 1;
                }
                literal => {
                    if text.get(si) != Some(&literal) {
                        return false;
                    }
                    pi += 1;
                    si += 1;
                }
            }
        }

        si == text.len()
    }

    /// Evaluates the bracket expression starting at `start` (just past the
    /// `[`) against `c`. Returns whether it matched and the index after the
    /// closing `]`, or `None` if the bracket is never closed.
    fn bracket(&self, start: usize, c: u8) -> Option<(bool, usize)> {
        let pat = self.pattern;
        let mut i = start;

        let negate = matches!(pat.get(i), Some(b'!' | b'^'));
        if negate {
            i += 1;
        }

        let mut matched = false;
        let mut first = true;

        loop {
            let mut lo = *pat.get(i)?;

            if lo == b']' && !first {
                return Some((matched != negate, i + 1));
            }
            first = false;

            if lo == b'[' && pat.get(i + 1) == Some(&b':') {
                if let Some((class, next)) = class_at(pat, i + 2) {
                    matched |= class.contains(c);
                    i = next;
                    continue;
                }
            }

            if lo == b'\\' && !self.opts.noescape {
                i += 1;
                lo = *pat.get(i)?;
            }
            i += 1;

            // A `-` followed by `]` is literal.
            if pat.get(i) == Some(&b'-') && pat.get(i + 1).is_some_and(|&b| b != b']') {
                let mut hi = pat[i + 1];
                i += 2;
                if hi == b'\\' && !self.opts.noescape {
                    hi = *pat.get(i)?;
                    i += 1;
                }
                matched |= lo <= c && c <= hi;
            } else {
                matched |= lo == c;
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum CharClass {
    Alnum,
    Alpha,
    Blank,
    Cntrl,
    Digit,
    Graph,
    Lower,
    Print,
    Punct,
    Space,
    Upper,
    Xdigit,
}

impl CharClass {
    fn from_name(name: &[u8]) -> Option<Self> {
        Some(match name {
            b"alnum" => Self::Alnum,
            b"alpha" => Self::Alpha,
            b"blank" => Self::Blank,
            b"cntrl" => Self::Cntrl,
            b"digit" => Self::Digit,
            b"graph" => Self::Graph,
            b"lower" => Self::Lower,
            b"print" => Self::Print,
            b"punct" => Self::Punct,
            b"space" => Self::Space,
            b"upper" => Self::Upper,
            b"xdigit" => Self::Xdigit,
            _ => return None,
        })
    }

    const fn contains(self, c: u8) -> bool {
        match self {
            Self::Alnum => c.is_ascii_alphanumeric(),
            Self::Alpha => c.is_ascii_alphabetic(),
            Self::Blank => c == b' ' || c == b'\t',
            Self::Cntrl => c.is_ascii_control(),
            Self::Digit => c.is_ascii_digit(),
            Self::Graph => c.is_ascii_graphic(),
            Self::Lower => c.is_ascii_lowercase(),
            Self::Print => c.is_ascii_graphic() || c == b' ',
            Self::Punct => c.is_ascii_punctuation(),
            Self::Space => c.is_ascii_whitespace() || c == 0x0b,
            Self::Upper => c.is_ascii_uppercase(),
            Self::Xdigit => c.is_ascii_hexdigit(),
        }
    }
}

/// Parses `name:]` starting at `start`, returning the class and the index
/// after the closing `]`.
fn class_at(pat: &[u8], start: usize) -> Option<(CharClass, usize)> {
    let rest = pat.get(start..)?;
    let end = rest.windows(2).position(|w| w == b":]")?;
    let class = CharClass::from_name(&rest[..end])?;
    Some((class, start + end + 2))
}
