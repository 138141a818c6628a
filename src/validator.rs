//! Identifier list validation
//!
//! Runs an ordered list of checks over an identifier list and reports the
//! first failure. Checks are opaque here: anything implementing [`ListCheck`]
//! will do, including plain closures.

use crate::check::Check;
use crate::domain::IdKind;
use crate::error::{CheckFailure, ValidationError};
use tracing::trace;

/// A predicate over an identifier list
pub trait ListCheck {
    fn check_ids(&self, ids: &[String]) -> Result<(), CheckFailure>;
}

impl ListCheck for Check {
    fn check_ids(&self, ids: &[String]) -> Result<(), CheckFailure> {
        self.check(ids)
    }
}

impl<F> ListCheck for F
where
    F: Fn(&[String]) -> Result<(), CheckFailure>,
{
    fn check_ids(&self, ids: &[String]) -> Result<(), CheckFailure> {
        self(ids)
    }
}

/// Apply `checks` in order, failing on the first one not satisfied.
///
/// The error names the kind of list and is prefixed by `desc` when one is
/// given. With no checks every list is valid.
///
/// # Example
/// ```
/// use semver_params::check::parse_checks;
/// use semver_params::domain::IdKind;
/// use semver_params::validator::validate_ids;
///
/// let checks = parse_checks("Length(EQ(2))").unwrap();
/// let ids = vec!["rc".to_string()];
/// let err = validate_ids(IdKind::PreRelease, &ids, &checks, Some("release")).unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "release: Bad PreRelIDs: the length of the list (1) is incorrect: the value (1) must equal 2"
/// );
/// ```
pub fn validate_ids<C: ListCheck>(
    kind: IdKind,
    ids: &[String],
    checks: &[C],
    desc: Option<&str>,
) -> Result<(), ValidationError> {
    trace!(kind = kind.list_name(), ids = ids.len(), checks = checks.len(), "validating ids");
    for check in checks {
        check.check_ids(ids).map_err(|failure| ValidationError {
            desc: desc.map(str::to_string),
            kind,
            failure,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{IntCheck, Pattern, StrCheck};

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

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
    fn test_no_checks_always_passes() {
        let none: Vec<Check> = Vec::new();
        assert!(validate_ids(IdKind::PreRelease, &[], &none, None).is_ok());
        assert!(validate_ids(IdKind::Build, &ids(&["a", "b"]), &none, None).is_ok());
    }

    #[test]
    fn test_rc_check() {
        let checks = vec![rc_check()];
        assert!(validate_ids(IdKind::PreRelease, &[], &checks, None).is_ok());
        assert!(validate_ids(IdKind::PreRelease, &ids(&["rc", "1"]), &checks, None).is_ok());

        let err = validate_ids(IdKind::PreRelease, &ids(&["rc", "1", "x"]), &checks, None)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Bad PreRelIDs: either [the length of the list (3) is incorrect: \
             the value (3) must equal 0] or [the length of the list (3) is incorrect: \
             the value (3) must equal 2]"
        );
    }

    #[test]
    fn test_fails_fast_in_order() {
        let checks = vec![
            Check::Length(IntCheck::Eq(5)),
            Check::Length(IntCheck::Eq(6)),
        ];
        let err = validate_ids(IdKind::Build, &ids(&["a"]), &checks, Some("desc")).unwrap_err();
        assert_eq!(err.desc.as_deref(), Some("desc"));
        assert_eq!(err.kind, IdKind::Build);
        assert!(err.failure.to_string().ends_with("must equal 5"));
    }

    #[test]
    fn test_closure_checks() {
        let no_x = |ids: &[String]| {
            if ids.iter().any(|id| id == "x") {
                Err(CheckFailure::new("x is not allowed"))
            } else {
                Ok(())
            }
        };
        assert!(validate_ids(IdKind::Build, &ids(&["a"]), &[no_x], None).is_ok());
        let err = validate_ids(IdKind::Build, &ids(&["x"]), &[no_x], None).unwrap_err();
        assert_eq!(err.to_string(), "Bad BuildIDs: x is not allowed");
    }
}
