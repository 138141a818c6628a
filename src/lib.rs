//! Semantic-version-aware command-line parameters for `clap`.
//!
//! [`params::SemverVals`] adds parameters for a semantic version number and
//! its pre-release and build IDs; [`params::SemverChecks`] adds parameters
//! holding checks which those IDs must pass. The checks are written in a
//! small language (see [`check`]) and are run once all the parameters have
//! been parsed.
//!
//! ```
//! use clap::Command;
//! use semver_params::params::{ParamSet, SemverChecks, SemverVals};
//!
//! let checks = SemverChecks::default();
//! let mut vals = SemverVals::default();
//! let mut ps = ParamSet::new(Command::new("prog")).load_config_files(false);
//! vals.add_semver_param(&mut ps, Some(&checks)).unwrap();
//! checks.add_check_params(&mut ps).unwrap();
//!
//! let parsed = ps
//!     .parse_from([
//!         "prog",
//!         "--semver", "v1.2.3-invalid",
//!         "--pre-rel-id-checks", "Or(Length(EQ(0)), Length(EQ(2)))",
//!     ])
//!     .unwrap();
//! vals.load(&parsed);
//!
//! assert_eq!(vals.semver().unwrap().to_string(), "v1.2.3-invalid");
//! assert!(parsed.errors()[0].to_string().starts_with("Bad PreRelIDs"));
//! ```

pub mod check;
pub mod config;
pub mod domain;
pub mod error;
pub mod params;
pub mod ui;
pub mod validator;

pub use error::{CheckFailure, ParamError, ParseError, Result, SemverParamsError, ValidationError};
