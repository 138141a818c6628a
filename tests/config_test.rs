// tests/config_test.rs
use clap::Command;
use semver_params::config::group_config_path;
use semver_params::params::{
    add_semver_group, ParamSet, SemverChecks, SemverVals, SEMVER_CHECKS_GROUP, SEMVER_GROUP,
};
use semver_params::SemverParamsError;
use serial_test::serial;
use std::env;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_group_file(base: &Path, group: &str, content: &str) {
    let path = group_config_path(base, group);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn semver_param_set(vals: &SemverVals) -> ParamSet {
    let mut ps = ParamSet::new(Command::new("test"));
    ps.add_group(SEMVER_GROUP, "semver params").unwrap();
    vals.add_semver_param(&mut ps, None).unwrap();
    vals.add_id_params(&mut ps, None).unwrap();
    ps
}

#[test]
fn test_config_file_sets_values() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("group-semver.toml");
    fs::write(&path, "semver = \"v1.2.3\"\nbuild-ids = [\"b\", 7]\n").unwrap();

    let mut vals = SemverVals::default();
    let mut ps = semver_param_set(&vals);
    ps.add_group_config_file(SEMVER_GROUP, &path, false).unwrap();

    let parsed = ps.parse_from(["test"]).unwrap();
    vals.load(&parsed);
    assert_eq!(vals.semver().unwrap().to_string(), "v1.2.3");
    assert_eq!(vals.build_ids(), &["b", "7"]);
}

#[test]
fn test_later_sources_override_earlier_ones() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("first.toml");
    let second = dir.path().join("second.toml");
    fs::write(&first, "semver = \"v1.0.0\"\npre-rel-ids = \"a\"\n").unwrap();
    fs::write(&second, "semver = \"v2.0.0\"\n").unwrap();

    let mut vals = SemverVals::default();
    let mut ps = semver_param_set(&vals);
    ps.add_group_config_file(SEMVER_GROUP, &first, false).unwrap();
    ps.add_group_config_file(SEMVER_GROUP, &second, false).unwrap();

    let parsed = ps.parse_from(["test"]).unwrap();
    vals.load(&parsed);
    assert_eq!(vals.semver().unwrap().to_string(), "v2.0.0");
    assert_eq!(vals.pre_rel_ids(), &["a"]);

    let parsed = ps.parse_from(["test", "--semver", "v3.0.0"]).unwrap();
    vals.load(&parsed);
    assert_eq!(vals.semver().unwrap().to_string(), "v3.0.0");
}

#[test]
fn test_missing_mandatory_config_file() {
    let dir = TempDir::new().unwrap();
    let vals = SemverVals::default();
    let mut ps = semver_param_set(&vals);
    ps.add_group_config_file(SEMVER_GROUP, dir.path().join("missing.toml"), false)
        .unwrap();

    let err = ps.parse_from(["test"]).unwrap_err();
    assert!(matches!(err, SemverParamsError::Io(_)));
}

#[test]
fn test_config_file_with_param_of_another_group() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("group-semver.toml");
    fs::write(&path, "pre-rel-id-checks = \"NoDups()\"\n").unwrap();

    let vals = SemverVals::default();
    let mut ps = semver_param_set(&vals);
    SemverChecks::default().add_check_params(&mut ps).unwrap();
    ps.add_group_config_file(SEMVER_GROUP, &path, false).unwrap();

    let err = ps.parse_from(["test"]).unwrap_err();
    assert!(err.to_string().contains("is not a parameter of the group 'semver'"));
}

#[test]
fn test_bad_value_in_config_file_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("group-semver.toml");
    fs::write(&path, "semver = \"1.2.3\"\nbuild-ids = \"x.y\"\n").unwrap();

    let mut vals = SemverVals::default();
    let mut ps = semver_param_set(&vals);
    ps.add_group_config_file(SEMVER_GROUP, &path, false).unwrap();

    let parsed = ps.parse_from(["test"]).unwrap();
    vals.load(&parsed);
    assert_eq!(parsed.parse_errors().len(), 1);
    assert_eq!(parsed.parse_errors()[0].param, "semver");
    assert!(!vals.semver_has_been_set());
    assert_eq!(vals.build_ids(), &["x", "y"]);
}

#[test]
fn test_config_value_starting_with_a_hyphen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("group-semver.toml");
    fs::write(&path, "pre-rel-ids = \"-rc.1\"\nbuild-ids = [\"-b\", 2]\n").unwrap();

    let mut vals = SemverVals::default();
    let mut ps = semver_param_set(&vals);
    ps.add_group_config_file(SEMVER_GROUP, &path, false).unwrap();

    let parsed = ps.parse_from(["test"]).unwrap();
    vals.load(&parsed);
    assert!(parsed.is_ok());
    assert_eq!(vals.pre_rel_ids(), &["-rc", "1"]);
    assert_eq!(vals.build_ids(), &["-b", "2"]);
}

#[test]
fn test_config_files_can_be_disabled() {
    let dir = TempDir::new().unwrap();
    let vals = SemverVals::default();
    let mut ps = semver_param_set(&vals).load_config_files(false);
    ps.add_group_config_file(SEMVER_GROUP, dir.path().join("missing.toml"), false)
        .unwrap();

    assert!(ps.parse_from(["test"]).is_ok());
}

#[test]
#[serial]
fn test_default_config_files_global_then_personal() {
    let global = TempDir::new().unwrap();
    let personal = TempDir::new().unwrap();
    write_group_file(global.path(), SEMVER_GROUP, "semver = \"v1.0.0\"\nbuild-ids = \"g\"\n");
    write_group_file(personal.path(), SEMVER_GROUP, "semver = \"v2.0.0\"\n");
    write_group_file(
        personal.path(),
        SEMVER_CHECKS_GROUP,
        "build-id-checks = 'SliceAll(EQ(\"p\"))'\n",
    );

    let old_dirs = env::var_os("XDG_CONFIG_DIRS");
    let old_home = env::var_os("XDG_CONFIG_HOME");
    env::set_var("XDG_CONFIG_DIRS", global.path());
    env::set_var("XDG_CONFIG_HOME", personal.path());

    let mut vals = SemverVals::default();
    let checks = SemverChecks::default();
    let mut ps = ParamSet::new(Command::new("test"));
    add_semver_group(&mut ps).unwrap();
    vals.add_semver_param(&mut ps, Some(&checks)).unwrap();
    vals.add_id_params(&mut ps, Some(&checks)).unwrap();
    checks.add_check_params(&mut ps).unwrap();
    let result = ps.parse_from(["test"]);

    match old_dirs {
        Some(v) => env::set_var("XDG_CONFIG_DIRS", v),
        None => env::remove_var("XDG_CONFIG_DIRS"),
    }
    match old_home {
        Some(v) => env::set_var("XDG_CONFIG_HOME", v),
        None => env::remove_var("XDG_CONFIG_HOME"),
    }

    let parsed = result.unwrap();
    vals.load(&parsed);
    checks.load(&parsed);
    assert_eq!(vals.semver().unwrap().to_string(), "v2.0.0");
    assert_eq!(vals.build_ids(), &["g"]);
    assert_eq!(checks.build_id_checks()[0].to_string(), "SliceAll(EQ(\"p\"))");

    let msgs: Vec<String> = parsed.errors().iter().map(|e| e.to_string()).collect();
    assert_eq!(
        msgs,
        vec!["Bad BuildIDs: list entry: 0 (g) does not pass the test: the value (\"g\") must equal \"p\""]
    );
}
