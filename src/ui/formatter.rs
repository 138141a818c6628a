//! Pure formatting functions for UI output.
//!
//! The `format_*` functions build text and are testable; the `display_*`
//! functions print it.

use crate::params::{CheckSetter, SemverChecks, SemverVals, Setter};
use console::style;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// One `name: value` line per value that has been set.
///
/// # Arguments
/// * `vals` - The version and ID values
/// * `checks` - The checks in force
pub fn format_values(vals: &SemverVals, checks: &SemverChecks) -> Vec<(String, String)> {
    let mut lines = Vec::new();
    if let Some(sv) = vals.semver() {
        lines.push((vals.semver_param(), sv.to_string()));
    }
    if vals.pre_rel_ids_have_been_set() {
        lines.push((vals.pre_rel_ids_param(), vals.pre_rel_ids().join(".")));
    }
    if vals.build_ids_have_been_set() {
        lines.push((vals.build_ids_param(), vals.build_ids().join(".")));
    }
    let pre_rel_checks = checks.pre_rel_id_checks();
    if !pre_rel_checks.is_empty() {
        lines.push((
            checks.pre_rel_id_checks_param(),
            CheckSetter.render(&pre_rel_checks),
        ));
    }
    let build_checks = checks.build_id_checks();
    if !build_checks.is_empty() {
        lines.push((
            checks.build_id_checks_param(),
            CheckSetter.render(&build_checks),
        ));
    }
    lines
}

/// Print the values which have been set, names in bold.
pub fn display_values(vals: &SemverVals, checks: &SemverChecks) {
    for (name, value) in format_values(vals, checks) {
        println!("{}: {}", style(name).bold(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::Check;

    #[test]
    fn test_format_values_empty() {
        let lines = format_values(&SemverVals::default(), &SemverChecks::default());
        assert!(lines.is_empty());
    }

    #[test]
    fn test_format_values() {
        let mut vals = SemverVals::new("a", "");
        vals.set_semver("v1.2.3-rc.1+b.2").unwrap();
        let checks = SemverChecks::default().with_build_id_checks(vec![Check::NoDups]);

        let lines = format_values(&vals, &checks);
        assert_eq!(
            lines,
            vec![
                ("a-semver".to_string(), "v1.2.3-rc.1+b.2".to_string()),
                ("build-id-checks".to_string(), "NoDups()".to_string()),
            ]
        );
    }
}
