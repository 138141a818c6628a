use thiserror::Error;

use crate::domain::IdKind;

/// Unified error type for semver-params operations
#[derive(Error, Debug)]
pub enum SemverParamsError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Cli(#[from] clap::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience type alias for Results in semver-params
pub type Result<T> = std::result::Result<T, SemverParamsError>;

impl SemverParamsError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        SemverParamsError::Config(msg.into())
    }

    /// The typed parse error behind this error, if there is one
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            SemverParamsError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

/// A raw value could not be turned into a typed one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("bad semantic version ({input}): it must start with a 'v'")]
    MissingPrefix { input: String },

    #[error("bad semantic version ({input}): {reason}")]
    BadVersion { input: String, reason: String },

    #[error("list entry: {position} ({id}) does not pass the test: {reason}")]
    BadId {
        kind: IdKind,
        position: usize,
        id: String,
        reason: String,
    },

    #[error("bad check ({input}) at offset {position}: {reason}")]
    BadCheck {
        input: String,
        position: usize,
        reason: String,
    },
}

impl ParseError {
    pub(crate) fn bad_version(input: &str, reason: impl Into<String>) -> Self {
        ParseError::BadVersion {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn bad_check(input: &str, position: usize, reason: impl Into<String>) -> Self {
        ParseError::BadCheck {
            input: input.to_string(),
            position,
            reason: reason.into(),
        }
    }
}

/// The message of a check which was not satisfied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct CheckFailure(pub String);

impl CheckFailure {
    pub fn new(msg: impl Into<String>) -> Self {
        CheckFailure(msg.into())
    }
}

/// A parameter value was rejected; the parameter is left unset.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("--{param}: {error}")]
pub struct ParamError {
    pub param: String,
    pub error: ParseError,
}

/// An identifier list failed one of its configured checks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}Bad {}: {}", desc_prefix(.desc), .kind.list_name(), .failure)]
pub struct ValidationError {
    pub desc: Option<String>,
    pub kind: IdKind,
    pub failure: CheckFailure,
}

fn desc_prefix(desc: &Option<String>) -> String {
    match desc.as_deref() {
        Some(d) if !d.is_empty() => format!("{}: ", d),
        _ => String::new(),
    }
}
