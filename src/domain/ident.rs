//! Pre-release and build identifiers for semantic versions
//!
//! Identifier syntax follows semver.org: https://semver.org/#spec-item-9 and
//! https://semver.org/#spec-item-10

use crate::error::ParseError;
use std::fmt;
use std::str::FromStr;

/// Separator between identifiers in their textual form.
pub const ID_SEPARATOR: char = '.';

/// Which section of a semantic version an identifier belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdKind {
    /// Pre-release identifiers (after the `-`)
    PreRelease,
    /// Build metadata identifiers (after the `+`)
    Build,
}

impl IdKind {
    /// Name of a single identifier of this kind, used in syntax errors
    pub fn id_name(&self) -> &'static str {
        match self {
            IdKind::PreRelease => "Pre-Rel ID",
            IdKind::Build => "Build ID",
        }
    }

    /// Name of a list of identifiers of this kind, used in validation errors
    pub fn list_name(&self) -> &'static str {
        match self {
            IdKind::PreRelease => "PreRelIDs",
            IdKind::Build => "BuildIDs",
        }
    }

    /// Check the syntax of a single identifier.
    ///
    /// Every identifier must be a non-empty string of ASCII letters, digits
    /// or hyphens. All-numeric pre-release identifiers must not have a
    /// leading zero; build identifiers have no such restriction.
    pub fn check_id(&self, id: &str) -> std::result::Result<(), String> {
        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-') {
            return Err(format!(
                "the {}: '{}' must be a non-empty string of letters, digits or hyphens",
                self.id_name(),
                id
            ));
        }

        if *self == IdKind::PreRelease
            && id.len() > 1
            && id.starts_with('0')
            && id.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(format!(
                "the {}: '{}' must have no leading zero if it's all numeric",
                self.id_name(),
                id
            ));
        }

        Ok(())
    }

    /// Check every identifier in a list, reporting the first bad one and its position
    pub fn check_all<S: AsRef<str>>(&self, ids: &[S]) -> std::result::Result<(), ParseError> {
        for (position, id) in ids.iter().enumerate() {
            let id = id.as_ref();
            self.check_id(id).map_err(|reason| ParseError::BadId {
                kind: *self,
                position,
                id: id.to_string(),
                reason,
            })?;
        }
        Ok(())
    }
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id_name())
    }
}

/// An ordered list of identifiers, dot-separated in its textual form
///
/// # Examples
/// - "rc.1" -> ["rc", "1"]
/// - "x" -> ["x"]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IdList(Vec<String>);

impl IdList {
    /// Split text on the separator and check every identifier against `kind`
    ///
    /// The result is never empty: an empty string yields one empty
    /// identifier, which fails the syntax check.
    pub fn parse(s: &str, kind: IdKind) -> std::result::Result<Self, ParseError> {
        let ids: Vec<String> = s.split(ID_SEPARATOR).map(str::to_string).collect();
        kind.check_all(&ids)?;
        Ok(IdList(ids))
    }

    pub fn ids(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for IdList {
    fn from(ids: Vec<String>) -> Self {
        IdList(ids)
    }
}

impl FromStr for IdList {
    type Err = ParseError;

    /// Parse with the stricter pre-release rules
    fn from_str(s: &str) -> std::result::Result<Self, ParseError> {
        IdList::parse(s, IdKind::PreRelease)
    }
}

impl fmt::Display for IdList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", ID_SEPARATOR)?;
            }
            f.write_str(id)?;
        }
        Ok(())
    }
}
