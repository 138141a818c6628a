//! Composable checks over identifier lists
//!
//! Checks are built either directly from the enums below or from their
//! textual form (see [`parse_checks`]), for instance:
//!
//! ```text
//! Or(Length(EQ(0)), And(Length(EQ(2)), SliceByPos(EQ("rc"), MatchesPattern("[1-9][0-9]*", "numeric"))))
//! ```
//!
//! The `Display` form of every check is the text it was parsed from, in
//! canonical spacing.

mod parser;

pub use parser::parse_checks;

use crate::error::{CheckFailure, ParseError};
use regex::Regex;
use std::fmt;
use std::str::FromStr;

/// A check on an integer value (a length)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntCheck {
    Eq(i64),
    Ne(i64),
    Gt(i64),
    Ge(i64),
    Lt(i64),
    Le(i64),
    /// Inclusive at both ends
    Between(i64, i64),
    Not(Box<IntCheck>),
    And(Vec<IntCheck>),
    Or(Vec<IntCheck>),
}

impl IntCheck {
    pub fn check(&self, v: i64) -> Result<(), String> {
        let fail = |relation: &str, n: i64| -> Result<(), String> {
            Err(format!("the value ({}) must {} {}", v, relation, n))
        };
        match self {
            IntCheck::Eq(n) if v != *n => fail("equal", *n),
            IntCheck::Ne(n) if v == *n => fail("not equal", *n),
            IntCheck::Gt(n) if v <= *n => fail("be greater than", *n),
            IntCheck::Ge(n) if v < *n => fail("be greater than or equal to", *n),
            IntCheck::Lt(n) if v >= *n => fail("be less than", *n),
            IntCheck::Le(n) if v > *n => fail("be less than or equal to", *n),
            IntCheck::Between(lo, hi) if v < *lo || v > *hi => Err(format!(
                "the value ({}) must be between {} and {} (inclusive)",
                v, lo, hi
            )),
            IntCheck::Not(inner) => match inner.check(v) {
                Ok(()) => Err(format!("the value ({}) must not satisfy {}", v, inner)),
                Err(_) => Ok(()),
            },
            IntCheck::And(checks) => checks.iter().try_for_each(|c| c.check(v)),
            IntCheck::Or(checks) => any_of(checks.iter().map(|c| c.check(v))),
            _ => Ok(()),
        }
    }
}

/// A regular expression which must match the whole value, with a
/// description of what it accepts
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    desc: String,
    re: Regex,
}

impl Pattern {
    pub fn new(source: impl Into<String>, desc: impl Into<String>) -> Result<Self, regex::Error> {
        let source = source.into();
        let re = Regex::new(&format!("^(?:{})$", source))?;
        Ok(Pattern {
            source,
            desc: desc.into(),
            re,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn desc(&self) -> &str {
        &self.desc
    }

    pub fn is_match(&self, s: &str) -> bool {
        self.re.is_match(s)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.desc == other.desc
    }
}

impl Eq for Pattern {}

/// A check on a single identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrCheck {
    Eq(String),
    Ne(String),
    HasPrefix(String),
    HasSuffix(String),
    MatchesPattern(Pattern),
    Length(IntCheck),
    Not(Box<StrCheck>),
    And(Vec<StrCheck>),
    Or(Vec<StrCheck>),
}

impl StrCheck {
    pub fn check(&self, s: &str) -> Result<(), String> {
        match self {
            StrCheck::Eq(want) if s != want.as_str() => {
                Err(format!("the value ({:?}) must equal {:?}", s, want))
            }
            StrCheck::Ne(unwanted) if s == unwanted.as_str() => {
                Err(format!("the value ({:?}) must not equal {:?}", s, unwanted))
            }
            StrCheck::HasPrefix(prefix) if !s.starts_with(prefix.as_str()) => {
                Err(format!("the value ({:?}) must start with {:?}", s, prefix))
            }
            StrCheck::HasSuffix(suffix) if !s.ends_with(suffix.as_str()) => {
                Err(format!("the value ({:?}) must end with {:?}", s, suffix))
            }
            StrCheck::MatchesPattern(pattern) if !pattern.is_match(s) => {
                Err(format!("the value ({:?}) must be {}", s, pattern.desc()))
            }
            StrCheck::Length(ic) => ic.check(len_of(s.len())).map_err(|msg| {
                format!("the length of the string ({}) is incorrect: {}", s.len(), msg)
            }),
            StrCheck::Not(inner) => match inner.check(s) {
                Ok(()) => Err(format!("the value ({:?}) must not satisfy {}", s, inner)),
                Err(_) => Ok(()),
            },
            StrCheck::And(checks) => checks.iter().try_for_each(|c| c.check(s)),
            StrCheck::Or(checks) => any_of(checks.iter().map(|c| c.check(s))),
            _ => Ok(()),
        }
    }
}

/// A check on a whole identifier list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    Length(IntCheck),
    /// Entry `i` is checked with check `i`; entries past the last check are not checked
    SliceByPos(Vec<StrCheck>),
    SliceAll(StrCheck),
    SliceAny(StrCheck),
    NoDups,
    Not(Box<Check>),
    And(Vec<Check>),
    Or(Vec<Check>),
}

impl Check {
    pub fn check<S: AsRef<str>>(&self, ids: &[S]) -> Result<(), CheckFailure> {
        self.eval(ids).map_err(CheckFailure)
    }

    fn eval<S: AsRef<str>>(&self, ids: &[S]) -> Result<(), String> {
        match self {
            Check::Length(ic) => ic.check(len_of(ids.len())).map_err(|msg| {
                format!("the length of the list ({}) is incorrect: {}", ids.len(), msg)
            }),
            Check::SliceByPos(checks) => ids
                .iter()
                .zip(checks)
                .enumerate()
                .try_for_each(|(i, (id, c))| entry_check(i, id.as_ref(), c)),
            Check::SliceAll(c) => ids
                .iter()
                .enumerate()
                .try_for_each(|(i, id)| entry_check(i, id.as_ref(), c)),
            Check::SliceAny(c) => {
                if ids.iter().any(|id| c.check(id.as_ref()).is_ok()) {
                    Ok(())
                } else {
                    Err(format!("no list entry passes the test: {}", c))
                }
            }
            Check::NoDups => {
                for (i, a) in ids.iter().enumerate() {
                    if let Some(j) = ids[i + 1..].iter().position(|b| b.as_ref() == a.as_ref()) {
                        return Err(format!(
                            "list entries: {} and {} are duplicates ({})",
                            i,
                            i + 1 + j,
                            a.as_ref()
                        ));
                    }
                }
                Ok(())
            }
            Check::Not(inner) => match inner.eval(ids) {
                Ok(()) => Err(format!("the list must not satisfy {}", inner)),
                Err(_) => Ok(()),
            },
            Check::And(checks) => checks.iter().try_for_each(|c| c.eval(ids)),
            Check::Or(checks) => any_of(checks.iter().map(|c| c.eval(ids))),
        }
    }
}

impl FromStr for Check {
    type Err = ParseError;

    /// Parse exactly one check
    fn from_str(s: &str) -> Result<Self, ParseError> {
        let mut checks = parse_checks(s)?;
        if checks.len() != 1 {
            return Err(ParseError::bad_check(
                s,
                0,
                format!("expected a single check, found {}", checks.len()),
            ));
        }
        Ok(checks.remove(0))
    }
}

fn entry_check(i: usize, id: &str, c: &StrCheck) -> Result<(), String> {
    c.check(id)
        .map_err(|msg| format!("list entry: {} ({}) does not pass the test: {}", i, id, msg))
}

fn len_of(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// Passes if any result passes; otherwise reports every alternative
fn any_of(results: impl Iterator<Item = Result<(), String>>) -> Result<(), String> {
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(()) => return Ok(()),
            Err(msg) => failures.push(msg),
        }
    }
    match failures.len() {
        0 => Ok(()),
        1 => Err(failures.remove(0)),
        _ => Err(format!("either [{}]", failures.join("] or ["))),
    }
}

fn write_args<T: fmt::Display>(f: &mut fmt::Formatter<'_>, name: &str, args: &[T]) -> fmt::Result {
    write!(f, "{}(", name)?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", arg)?;
    }
    f.write_str(")")
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

impl fmt::Display for IntCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntCheck::Eq(n) => write!(f, "EQ({})", n),
            IntCheck::Ne(n) => write!(f, "NE({})", n),
            IntCheck::Gt(n) => write!(f, "GT({})", n),
            IntCheck::Ge(n) => write!(f, "GE({})", n),
            IntCheck::Lt(n) => write!(f, "LT({})", n),
            IntCheck::Le(n) => write!(f, "LE({})", n),
            IntCheck::Between(lo, hi) => write!(f, "Between({}, {})", lo, hi),
            IntCheck::Not(inner) => write!(f, "Not({})", inner),
            IntCheck::And(checks) => write_args(f, "And", checks),
            IntCheck::Or(checks) => write_args(f, "Or", checks),
        }
    }
}

impl fmt::Display for StrCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrCheck::Eq(s) => write!(f, "EQ({})", quote(s)),
            StrCheck::Ne(s) => write!(f, "NE({})", quote(s)),
            StrCheck::HasPrefix(s) => write!(f, "HasPrefix({})", quote(s)),
            StrCheck::HasSuffix(s) => write!(f, "HasSuffix({})", quote(s)),
            StrCheck::MatchesPattern(p) => write!(
                f,
                "MatchesPattern({}, {})",
                quote(p.as_str()),
                quote(p.desc())
            ),
            StrCheck::Length(ic) => write!(f, "Length({})", ic),
            StrCheck::Not(inner) => write!(f, "Not({})", inner),
            StrCheck::And(checks) => write_args(f, "And", checks),
            StrCheck::Or(checks) => write_args(f, "Or", checks),
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::Length(ic) => write!(f, "Length({})", ic),
            Check::SliceByPos(checks) => write_args(f, "SliceByPos", checks),
            Check::SliceAll(c) => write!(f, "SliceAll({})", c),
            Check::SliceAny(c) => write!(f, "SliceAny({})", c),
            Check::NoDups => f.write_str("NoDups()"),
            Check::Not(inner) => write!(f, "Not({})", inner),
            Check::And(checks) => write_args(f, "And", checks),
            Check::Or(checks) => write_args(f, "Or", checks),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rc_check() -> Check {
        Check::Or(vec![
            Check::Length(IntCheck::Eq(0)),
            Check::And(vec![
                Check::Length(IntCheck::Eq(2)),
                Check::SliceByPos(vec![
                    StrCheck::Eq("rc".to_string()),
                    StrCheck::MatchesPattern(Pattern::new("[1-9][0-9]*", "numeric").unwrap()),
                ]),
            ]),
        ])
    }

    #[test]
    fn test_rc_check_passes() {
        let empty: [&str; 0] = [];
        assert!(rc_check().check(&empty).is_ok());
        assert!(rc_check().check(&["rc", "1"]).is_ok());
        assert!(rc_check().check(&["rc", "42"]).is_ok());
    }

    #[test]
    fn test_rc_check_bad_length() {
        let err = rc_check().check(&["rc", "1", "x"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "either [the length of the list (3) is incorrect: the value (3) must equal 0] \
             or [the length of the list (3) is incorrect: the value (3) must equal 2]"
        );
    }

    #[test]
    fn test_rc_check_bad_entry() {
        let err = rc_check().check(&["rc", "01"]).unwrap_err();
        assert!(err
            .to_string()
            .contains("list entry: 1 (01) does not pass the test: the value (\"01\") must be numeric"));
    }

    #[test]
    fn test_pattern_matches_whole_value() {
        let p = Pattern::new("[1-9][0-9]*", "numeric").unwrap();
        assert!(p.is_match("10"));
        assert!(!p.is_match("10x"));
        assert!(!p.is_match("x10"));
    }

    #[test]
    fn test_int_checks() {
        assert!(IntCheck::Gt(2).check(3).is_ok());
        assert_eq!(
            IntCheck::Gt(2).check(2).unwrap_err(),
            "the value (2) must be greater than 2"
        );
        assert!(IntCheck::Between(1, 3).check(3).is_ok());
        assert!(IntCheck::Between(1, 3).check(4).is_err());
        assert!(IntCheck::Not(Box::new(IntCheck::Eq(1))).check(1).is_err());
        assert!(IntCheck::Not(Box::new(IntCheck::Eq(1))).check(2).is_ok());
    }

    #[test]
    fn test_str_checks() {
        assert!(StrCheck::HasPrefix("rc".into()).check("rc1").is_ok());
        assert!(StrCheck::HasSuffix("x".into()).check("rc1").is_err());
        assert!(StrCheck::Length(IntCheck::Le(3)).check("abcd").is_err());
        assert!(StrCheck::Ne("a".into()).check("a").is_err());
    }

    #[test]
    fn test_slice_all_and_any() {
        let numeric = StrCheck::MatchesPattern(Pattern::new("[0-9]+", "numeric").unwrap());
        assert!(Check::SliceAll(numeric.clone()).check(&["1", "2"]).is_ok());
        assert!(Check::SliceAll(numeric.clone()).check(&["1", "b"]).is_err());
        assert!(Check::SliceAny(numeric.clone()).check(&["a", "2"]).is_ok());
        assert!(Check::SliceAny(numeric).check(&["a", "b"]).is_err());
    }

    #[test]
    fn test_slice_by_pos_ignores_extra_entries() {
        let c = Check::SliceByPos(vec![StrCheck::Eq("rc".into())]);
        assert!(c.check(&["rc", "anything", "else"]).is_ok());
    }

    #[test]
    fn test_no_dups() {
        assert!(Check::NoDups.check(&["a", "b"]).is_ok());
        let err = Check::NoDups.check(&["a", "b", "a"]).unwrap_err();
        assert_eq!(err.to_string(), "list entries: 0 and 2 are duplicates (a)");
    }

    #[test]
    fn test_not() {
        let c = Check::Not(Box::new(Check::Length(IntCheck::Eq(0))));
        let empty: [&str; 0] = [];
        assert_eq!(
            c.check(&empty).unwrap_err().to_string(),
            "the list must not satisfy Length(EQ(0))"
        );
        assert!(c.check(&["a"]).is_ok());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            rc_check().to_string(),
            "Or(Length(EQ(0)), And(Length(EQ(2)), \
             SliceByPos(EQ(\"rc\"), MatchesPattern(\"[1-9][0-9]*\", \"numeric\"))))"
        );
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("a\"b\\c"), "\"a\\\"b\\\\c\"");
    }
}
