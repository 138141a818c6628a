//! Setters turn a raw parameter value into a typed one.
//!
//! A [`Setter`] knows how to parse its value, how to describe what it
//! accepts and how to render a value back to text. [`value_parser`] plugs a
//! setter into `clap`; the outcome of each parse is stored, so a bad value
//! is reported without stopping `clap` from parsing the rest.

use crate::check::{parse_checks, Check};
use crate::domain::{IdKind, IdList, SemVer, ID_SEPARATOR};
use crate::error::ParseError;
use clap::builder::TypedValueParser;
use std::convert::Infallible;

/// Converts a raw parameter value into a typed value
pub trait Setter: Clone + Send + Sync + 'static {
    type Value: Clone + Send + Sync + 'static;

    fn parse(&self, raw: &str) -> Result<Self::Value, ParseError>;

    /// Human-readable description of the accepted values
    fn allowed_values(&self) -> String;

    /// Canonical text for a value; parsing it gives the value back
    fn render(&self, value: &Self::Value) -> String;
}

/// Adapt a setter for use as a `clap` value parser.
///
/// `clap` stores `Ok(value)` or the [`ParseError`]; it never fails on a
/// value the setter rejects.
pub fn value_parser<S: Setter>(
    setter: S,
) -> impl TypedValueParser<Value = Result<S::Value, ParseError>> {
    move |raw: &str| Ok::<_, Infallible>(setter.parse(raw))
}

/// Sets a semantic version number such as `v1.2.3-rc.1+b.7`
#[derive(Debug, Clone, Copy, Default)]
pub struct SemverSetter;

impl Setter for SemverSetter {
    type Value = SemVer;

    fn parse(&self, raw: &str) -> Result<SemVer, ParseError> {
        SemVer::parse(raw)
    }

    fn allowed_values(&self) -> String {
        "a semantic version number such as v1.2.3 optionally followed by \
         non-empty lists of dot-separated pre-release and build IDs. \
         For instance, 'v1.2.3-a.b.c+x.y.z'. \
         See the Semantic Versioning spec for full details."
            .to_string()
    }

    fn render(&self, value: &SemVer) -> String {
        value.to_string()
    }
}

/// Sets a non-empty, dot-separated list of identifiers of one kind
#[derive(Debug, Clone, Copy)]
pub struct IdListSetter {
    pub kind: IdKind,
}

impl IdListSetter {
    pub fn new(kind: IdKind) -> Self {
        IdListSetter { kind }
    }
}

impl Setter for IdListSetter {
    type Value = IdList;

    fn parse(&self, raw: &str) -> Result<IdList, ParseError> {
        IdList::parse(raw, self.kind)
    }

    fn allowed_values(&self) -> String {
        let mut desc = format!(
            "a list of {}s separated by '{}'. Each must be a non-empty string \
             of letters, digits or hyphens",
            self.kind.id_name(),
            ID_SEPARATOR
        );
        if self.kind == IdKind::PreRelease {
            desc.push_str(" with no leading zero if it's all numeric");
        }
        desc
    }

    fn render(&self, value: &IdList) -> String {
        value.to_string()
    }
}

/// Sets a list of checks written in the check language
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckSetter;

impl Setter for CheckSetter {
    type Value = Vec<Check>;

    fn parse(&self, raw: &str) -> Result<Vec<Check>, ParseError> {
        parse_checks(raw)
    }

    fn allowed_values(&self) -> String {
        "a comma-separated list of checks, for instance \
         'Or(Length(EQ(0)), And(Length(EQ(2)), SliceByPos(EQ(\"rc\"), \
         MatchesPattern(\"[1-9][0-9]*\", \"numeric\"))))'. \
         List checks: Length, SliceByPos, SliceAll, SliceAny, NoDups, Not, And, Or. \
         String checks: EQ, NE, HasPrefix, HasSuffix, MatchesPattern, Length, Not, And, Or. \
         Number checks: EQ, NE, GT, GE, LT, LE, Between, Not, And, Or."
            .to_string()
    }

    fn render(&self, value: &Vec<Check>) -> String {
        value
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
