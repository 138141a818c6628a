use super::checks::SemverChecks;
use super::group::{add_semver_group, SEMVER_GROUP};
use super::setter::{IdListSetter, SemverSetter, Setter};
use super::{get_value, ParamSet, Parsed};
use crate::domain::{IdKind, IdList, SemVer};
use crate::error::{ParseError, Result, SemverParamsError};
use crate::validator::validate_ids;
use clap::Arg;

const SEMVER: &str = "semver";
const PRE_REL_IDS: &str = "pre-rel-ids";
const BUILD_IDS: &str = "build-ids";

/// Values set by the semver parameters.
///
/// Several instances can share one [`ParamSet`] as long as each has its own
/// `prefix`. Values are copied out of the parse results by
/// [`SemverVals::load`]; each has a "has been set" accessor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SemverVals {
    /// Prefix for the parameter names; empty for none
    pub prefix: String,
    /// Label put before any validation error; empty for none
    pub desc: String,
    semver: Option<SemVer>,
    pre_rel_ids: Option<IdList>,
    build_ids: Option<IdList>,
}

impl SemverVals {
    pub fn new(prefix: impl Into<String>, desc: impl Into<String>) -> Self {
        SemverVals {
            prefix: prefix.into(),
            desc: desc.into(),
            ..Default::default()
        }
    }

    fn param_name(&self, base: &str) -> String {
        if self.prefix.is_empty() {
            base.to_string()
        } else {
            format!("{}-{}", self.prefix, base)
        }
    }

    pub fn semver_param(&self) -> String {
        self.param_name(SEMVER)
    }

    pub fn pre_rel_ids_param(&self) -> String {
        self.param_name(PRE_REL_IDS)
    }

    pub fn build_ids_param(&self) -> String {
        self.param_name(BUILD_IDS)
    }

    fn desc_label(&self) -> Option<String> {
        (!self.desc.is_empty()).then(|| self.desc.clone())
    }

    /// Add the semantic version parameter.
    ///
    /// With `checks`, a final check validates the pre-release and build IDs
    /// of any version given.
    pub fn add_semver_param(&self, ps: &mut ParamSet, checks: Option<&SemverChecks>) -> Result<()> {
        add_semver_group(ps)?;

        let id = self.semver_param();
        ps.add_setter(
            SEMVER_GROUP,
            Arg::new(id.clone())
                .long(id.clone())
                .visible_alias(self.param_name("svn"))
                .value_name("SEMVER")
                .help("specify the semantic version number to be used")
                .long_help(format!(
                    "specify the semantic version number to be used. The value is {}",
                    SemverSetter.allowed_values()
                )),
            SemverSetter,
        )?;

        if let Some(checks) = checks {
            let pre_rel = checks.source(IdKind::PreRelease);
            let build = checks.source(IdKind::Build);
            let desc = self.desc_label();
            ps.add_final_check(move |matches| {
                let Some(sv) = get_value::<SemVer>(matches, &id) else {
                    return Ok(());
                };
                validate_ids(
                    IdKind::PreRelease,
                    &sv.pre_rel_ids(),
                    &pre_rel.resolve(matches),
                    desc.as_deref(),
                )?;
                validate_ids(
                    IdKind::Build,
                    &sv.build_ids(),
                    &build.resolve(matches),
                    desc.as_deref(),
                )
            });
        }
        Ok(())
    }

    /// Add the pre-release and build ID list parameters.
    ///
    /// With `checks`, a final check validates each list given.
    pub fn add_id_params(&self, ps: &mut ParamSet, checks: Option<&SemverChecks>) -> Result<()> {
        add_semver_group(ps)?;

        let pre_rel_id = self.pre_rel_ids_param();
        let pre_rel_setter = IdListSetter::new(IdKind::PreRelease);
        ps.add_setter(
            SEMVER_GROUP,
            Arg::new(pre_rel_id.clone())
                .long(pre_rel_id.clone())
                .visible_alias(self.param_name("pr-ids"))
                .value_name("IDS")
                .help(
                    "specify a non-empty list of pre-release IDs \
                     suitable for setting on a semantic version number",
                )
                .long_help(format!("The value is {}", pre_rel_setter.allowed_values())),
            pre_rel_setter,
        )?;

        let build_id = self.build_ids_param();
        let build_setter = IdListSetter::new(IdKind::Build);
        ps.add_setter(
            SEMVER_GROUP,
            Arg::new(build_id.clone())
                .long(build_id.clone())
                .visible_alias(self.param_name("bld-ids"))
                .value_name("IDS")
                .help(
                    "specify a non-empty list of build IDs \
                     suitable for setting on a semantic version number",
                )
                .long_help(format!("The value is {}", build_setter.allowed_values())),
            build_setter,
        )?;

        if let Some(checks) = checks {
            for (kind, id, source) in [
                (IdKind::PreRelease, pre_rel_id, checks.source(IdKind::PreRelease)),
                (IdKind::Build, build_id, checks.source(IdKind::Build)),
            ] {
                let desc = self.desc_label();
                ps.add_final_check(move |matches| match get_value::<IdList>(matches, &id) {
                    Some(ids) => {
                        validate_ids(kind, ids.ids(), &source.resolve(matches), desc.as_deref())
                    }
                    None => Ok(()),
                });
            }
        }
        Ok(())
    }

    /// Change the attributes of the semantic version parameter, for instance
    /// to make it required.
    ///
    /// [`SemverVals::add_semver_param`] must have been called on `ps` first.
    pub fn set_attr_on_semver_param<F>(&self, ps: &mut ParamSet, f: F) -> Result<()>
    where
        F: FnOnce(Arg) -> Arg,
    {
        let id = self.semver_param();
        if !ps.has_param(&id) {
            return Err(SemverParamsError::config(format!(
                "the semver parameter ('{}') has not been created yet. \
                 Call add_semver_param before setting its attributes",
                id
            )));
        }
        ps.set_attrs(&id, f)
    }

    /// Copy the values given as parameters; values not given are left alone
    pub fn load(&mut self, parsed: &Parsed) {
        if let Some(sv) = parsed.get::<SemVer>(&self.semver_param()) {
            self.semver = Some(sv.clone());
        }
        if let Some(ids) = parsed.get::<IdList>(&self.pre_rel_ids_param()) {
            self.pre_rel_ids = Some(ids.clone());
        }
        if let Some(ids) = parsed.get::<IdList>(&self.build_ids_param()) {
            self.build_ids = Some(ids.clone());
        }
    }

    /// Set the version from text; on error the previous value is kept
    pub fn set_semver(&mut self, raw: &str) -> std::result::Result<(), ParseError> {
        self.semver = Some(SemverSetter.parse(raw)?);
        Ok(())
    }

    pub fn semver(&self) -> Option<&SemVer> {
        self.semver.as_ref()
    }

    pub fn semver_has_been_set(&self) -> bool {
        self.semver.is_some()
    }

    /// The pre-release IDs given; empty if none were
    pub fn pre_rel_ids(&self) -> &[String] {
        self.pre_rel_ids.as_ref().map(IdList::ids).unwrap_or(&[])
    }

    pub fn pre_rel_ids_have_been_set(&self) -> bool {
        self.pre_rel_ids.is_some()
    }

    /// The build IDs given; empty if none were
    pub fn build_ids(&self) -> &[String] {
        self.build_ids.as_ref().map(IdList::ids).unwrap_or(&[])
    }

    pub fn build_ids_have_been_set(&self) -> bool {
        self.build_ids.is_some()
    }
}
