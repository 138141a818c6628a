use super::group::{add_semver_checks_group, SEMVER_CHECKS_GROUP};
use super::setter::{CheckSetter, Setter};
use super::{get_value, ParamSet, Parsed};
use crate::check::Check;
use crate::domain::IdKind;
use crate::error::Result;
use clap::{Arg, ArgMatches};
use std::sync::{Arc, PoisonError, RwLock};

const PRE_REL_ID_CHECKS: &str = "pre-rel-id-checks";
const BUILD_ID_CHECKS: &str = "build-id-checks";

const PARAM_DESC_INTRO: &str = "specify a non-empty list of check functions to apply";

#[derive(Debug, Default)]
struct CheckLists {
    pre_rel: Vec<Check>,
    build: Vec<Check>,
}

impl CheckLists {
    fn get(&self, kind: IdKind) -> &Vec<Check> {
        match kind {
            IdKind::PreRelease => &self.pre_rel,
            IdKind::Build => &self.build,
        }
    }

    fn get_mut(&mut self, kind: IdKind) -> &mut Vec<Check> {
        match kind {
            IdKind::PreRelease => &mut self.pre_rel,
            IdKind::Build => &mut self.build,
        }
    }
}

/// Checks applied to the pre-release and build IDs of a semantic version.
///
/// The lists can be set in code, or from the command line once
/// [`SemverChecks::add_check_params`] has been called. A list given on the
/// command line replaces the one set in code.
///
/// Clones share the lists, and the final checks registered with a
/// [`ParamSet`] read them when they run, so lists set after registration
/// still apply.
#[derive(Debug, Clone, Default)]
pub struct SemverChecks {
    /// Prefix for the check parameter names; empty for none
    pub name: String,
    lists: Arc<RwLock<CheckLists>>,
}

impl SemverChecks {
    pub fn new(name: impl Into<String>) -> Self {
        SemverChecks {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_pre_rel_id_checks(self, checks: Vec<Check>) -> Self {
        self.set_pre_rel_id_checks(checks);
        self
    }

    pub fn with_build_id_checks(self, checks: Vec<Check>) -> Self {
        self.set_build_id_checks(checks);
        self
    }

    pub fn pre_rel_id_checks(&self) -> Vec<Check> {
        self.checks(IdKind::PreRelease)
    }

    pub fn build_id_checks(&self) -> Vec<Check> {
        self.checks(IdKind::Build)
    }

    pub fn set_pre_rel_id_checks(&self, checks: Vec<Check>) {
        self.set_checks(IdKind::PreRelease, checks);
    }

    pub fn set_build_id_checks(&self, checks: Vec<Check>) {
        self.set_checks(IdKind::Build, checks);
    }

    fn checks(&self, kind: IdKind) -> Vec<Check> {
        let lists = self.lists.read().unwrap_or_else(PoisonError::into_inner);
        lists.get(kind).clone()
    }

    fn set_checks(&self, kind: IdKind, checks: Vec<Check>) {
        let mut lists = self.lists.write().unwrap_or_else(PoisonError::into_inner);
        *lists.get_mut(kind) = checks;
    }

    fn param_name(&self, base: &str) -> String {
        if self.name.is_empty() {
            base.to_string()
        } else {
            format!("{}-{}", self.name, base)
        }
    }

    pub fn pre_rel_id_checks_param(&self) -> String {
        self.param_name(PRE_REL_ID_CHECKS)
    }

    pub fn build_id_checks_param(&self) -> String {
        self.param_name(BUILD_ID_CHECKS)
    }

    /// Add the check parameters, in the semver-checks group
    pub fn add_check_params(&self, ps: &mut ParamSet) -> Result<()> {
        add_semver_checks_group(ps)?;

        let long_help = format!("The value is {}", CheckSetter.allowed_values());
        ps.add_setter(
            SEMVER_CHECKS_GROUP,
            Arg::new(self.pre_rel_id_checks_param())
                .long(self.pre_rel_id_checks_param())
                .visible_alias(self.param_name("pr-id-checks"))
                .value_name("CHECKS")
                .help(format!(
                    "{} to the pre-release IDs for the semantic version number",
                    PARAM_DESC_INTRO
                ))
                .long_help(long_help.clone()),
            CheckSetter,
        )?;
        ps.add_setter(
            SEMVER_CHECKS_GROUP,
            Arg::new(self.build_id_checks_param())
                .long(self.build_id_checks_param())
                .visible_alias(self.param_name("bld-id-checks"))
                .value_name("CHECKS")
                .help(format!(
                    "{} to the build IDs for the semantic version number",
                    PARAM_DESC_INTRO
                ))
                .long_help(long_help),
            CheckSetter,
        )
    }

    /// Replace the lists with those given as parameters, if any
    pub fn load(&self, parsed: &Parsed) {
        if let Some(checks) = parsed.get::<Vec<Check>>(&self.pre_rel_id_checks_param()) {
            self.set_pre_rel_id_checks(checks.clone());
        }
        if let Some(checks) = parsed.get::<Vec<Check>>(&self.build_id_checks_param()) {
            self.set_build_id_checks(checks.clone());
        }
    }

    pub(crate) fn source(&self, kind: IdKind) -> CheckSource {
        let param = match kind {
            IdKind::PreRelease => self.pre_rel_id_checks_param(),
            IdKind::Build => self.build_id_checks_param(),
        };
        CheckSource {
            param,
            kind,
            checks: self.clone(),
        }
    }
}

/// Where a final check finds its checks: the parameter if it was given,
/// otherwise the lists held by the [`SemverChecks`] when the check runs
#[derive(Debug, Clone)]
pub(crate) struct CheckSource {
    param: String,
    kind: IdKind,
    checks: SemverChecks,
}

impl CheckSource {
    pub(crate) fn resolve(&self, matches: &ArgMatches) -> Vec<Check> {
        match get_value::<Vec<Check>>(matches, &self.param) {
            Some(given) => given.clone(),
            None => self.checks.checks(self.kind),
        }
    }
}
