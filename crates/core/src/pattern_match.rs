//! Pattern matching for catalog search.
//!
//! The search dialect has a single wildcard:
//! - `*` matches zero or more characters
//!
//! Every other character is literal, including `%`, `_` and `?`. Matching
//! operates on Unicode scalar values. Case folding, when enabled, lowercases
//! both sides before matching.
//!
//! A user query becomes a substring pattern by wrapping it with wildcards on
//! both sides, see [`contains_pattern`].

/// The wildcard character of the search dialect.
pub const WILDCARD: char = '*';

/// Wraps a raw query with wildcards so it matches anywhere in a value.
///
/// ```
/// use vitrine_core::pattern_match::contains_pattern;
/// assert_eq!(contains_pattern("foo"), "*foo*");
/// ```
pub fn contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push(WILDCARD);
    pattern.push_str(query);
    pattern.push(WILDCARD);
    pattern
}

/// Case-sensitive wildcard matching.
///
/// ```
/// use vitrine_core::pattern_match::wildcard;
/// assert!(wildcard("hello", "h*o"));
/// assert!(wildcard("hello", "*ell*"));
/// assert!(!wildcard("hello", "world"));
/// ```
pub fn wildcard(value: &str, pattern: &str) -> bool {
    let v: Vec<char> = value.chars().collect();
    let p: Vec<char> = pattern.chars().collect();
    wildcard_chars(&v, &p)
}

/// Greedy matcher with single-star backtracking. Runs in O(|v| * |p|).
fn wildcard_chars(v: &[char], p: &[char]) -> bool {
    let mut vi = 0;
    let mut pi = 0;
    // (pattern position after the last star, value position it is anchored at)
    let mut star: Option<(usize, usize)> = None;

    while vi < v.len() {
        if pi < p.len() && p[pi] == WILDCARD {
            star = Some((pi + 1, vi));
            pi += 1;
        } else if pi < p.len() && p[pi] == v[vi] {
            pi += 1;
            vi += 1;
        } else if let Some((after_star, anchor)) = star {
            // Let the last star absorb one more character and retry
            pi = after_star;
            vi = anchor + 1;
            star = Some((after_star, anchor + 1));
        } else {
            return false;
        }
    }

    p[pi..].iter().all(|&c| c == WILDCARD)
}

/// A compiled search pattern.
///
/// Holds the pattern characters (already case folded when matching is
/// case-insensitive) so repeated matching over a table does not re-parse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchPattern {
    source: String,
    chars: Vec<char>,
    case_sensitive: bool,
}

impl SearchPattern {
    /// Compiles a pattern in the search dialect.
    pub fn new(pattern: &str, case_sensitive: bool) -> Self {
        let chars = if case_sensitive {
            pattern.chars().collect()
        } else {
            pattern.to_lowercase().chars().collect()
        };
        Self {
            source: pattern.to_string(),
            chars,
            case_sensitive,
        }
    }

    /// Compiles a substring pattern for a raw user query.
    pub fn contains(query: &str, case_sensitive: bool) -> Self {
        Self::new(&contains_pattern(query), case_sensitive)
    }

    /// Returns the pattern as written.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns whether matching is case-sensitive.
    #[inline]
    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Tests a value against the pattern.
    pub fn matches(&self, value: &str) -> bool {
        let v: Vec<char> = if self.case_sensitive {
            value.chars().collect()
        } else {
            value.to_lowercase().chars().collect()
        };
        wildcard_chars(&v, &self.chars)
    }
}
