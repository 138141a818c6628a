//! The parameter groups used by this crate

use super::ParamSet;
use crate::config;
use crate::error::Result;

/// Group holding the version and identifier parameters
pub const SEMVER_GROUP: &str = "semver";

/// Group holding the identifier check parameters
pub const SEMVER_CHECKS_GROUP: &str = "semver-checks";

/// Add the semver group with its global and personal config files.
///
/// Safe to call any number of times; the group is only added once.
pub fn add_semver_group(ps: &mut ParamSet) -> Result<()> {
    ps.add_group_once(
        SEMVER_GROUP,
        "common parameters concerned with semantic version numbers",
        |ps| add_default_config_files(ps, SEMVER_GROUP),
    )
}

/// Add the semver-checks group with its global and personal config files.
pub fn add_semver_checks_group(ps: &mut ParamSet) -> Result<()> {
    ps.add_group_once(
        SEMVER_CHECKS_GROUP,
        "common parameters concerned with checks on semantic version numbers",
        |ps| add_default_config_files(ps, SEMVER_CHECKS_GROUP),
    )
}

fn add_default_config_files(ps: &mut ParamSet, group: &str) -> Result<()> {
    for dir in config::config_dirs() {
        ps.add_group_config_file(group, config::group_config_path(&dir, group), true)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Command;
    use std::sync::{Arc, Mutex};
    use std::thread;

    #[test]
    fn test_add_semver_group_is_idempotent() {
        let mut ps = ParamSet::new(Command::new("test"));
        add_semver_group(&mut ps).unwrap();
        add_semver_group(&mut ps).unwrap();
        assert_eq!(ps.groups().len(), 1);

        let group = ps.group(SEMVER_GROUP).unwrap();
        assert!(group.config_files.iter().all(|f| f.optional));
        assert!(group
            .config_files
            .iter()
            .all(|f| f.path.ends_with("semver-params/group-semver.toml")));
    }

    #[test]
    fn test_both_groups() {
        let mut ps = ParamSet::new(Command::new("test"));
        add_semver_group(&mut ps).unwrap();
        add_semver_checks_group(&mut ps).unwrap();
        assert!(ps.has_group(SEMVER_GROUP));
        assert!(ps.has_group(SEMVER_CHECKS_GROUP));
    }

    #[test]
    fn test_concurrent_registration_adds_group_once() {
        let ps = Arc::new(Mutex::new(ParamSet::new(Command::new("test"))));

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let ps = Arc::clone(&ps);
                thread::spawn(move || {
                    let mut ps = ps.lock().unwrap();
                    add_semver_group(&mut ps).is_ok()
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert_eq!(ps.lock().unwrap().groups().len(), 1);
    }
}
