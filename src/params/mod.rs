//! Parameter registration on top of `clap`
//!
//! A [`ParamSet`] owns the `clap::Command` together with what `clap` itself
//! does not provide: named parameter groups (shown as help headings), group
//! config files applied before the command line, and final checks run after
//! everything has been parsed.
//!
//! Parsing is two-phase. Every value given is stored first; then each final
//! check runs, in registration order, and its failure is collected in
//! [`Parsed::errors`] without discarding any value. A value which cannot be
//! parsed is not stored, and its error goes to [`Parsed::parse_errors`]; the
//! other parameters are unaffected.

pub mod checks;
pub mod group;
pub mod setter;
pub mod vals;

pub use checks::SemverChecks;
pub use group::{add_semver_checks_group, add_semver_group, SEMVER_CHECKS_GROUP, SEMVER_GROUP};
pub use setter::{value_parser, CheckSetter, IdListSetter, SemverSetter, Setter};
pub use vals::SemverVals;

use crate::config::{self, ConfigFile};
use crate::error::{ParamError, ParseError, Result, SemverParamsError, ValidationError};
use clap::{Arg, ArgMatches, Command};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::{debug, trace};

/// A check run once all parameters have been parsed
pub type FinalCheck =
    Box<dyn Fn(&ArgMatches) -> std::result::Result<(), ValidationError> + Send + Sync>;

/// Reads back the parse error stored for a setter parameter
type StoredError = fn(&ArgMatches, &str) -> Option<ParseError>;

/// A named collection of parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub name: String,
    pub desc: String,
    pub config_files: Vec<ConfigFile>,
}

/// The set of parameters a program accepts
pub struct ParamSet {
    command: Command,
    groups: Vec<Group>,
    /// Parameter id -> group name
    params: BTreeMap<String, String>,
    /// Parameters parsed by a [`Setter`], in registration order
    setter_params: Vec<(String, StoredError)>,
    final_checks: Vec<FinalCheck>,
    load_config_files: bool,
}

impl ParamSet {
    /// Wrap a `clap` command; parameters are added to it through the set
    pub fn new(command: Command) -> Self {
        ParamSet {
            command: command.args_override_self(true),
            groups: Vec::new(),
            params: BTreeMap::new(),
            setter_params: Vec::new(),
            final_checks: Vec::new(),
            load_config_files: true,
        }
    }

    /// Whether group config files are read when parsing (they are by default)
    pub fn load_config_files(mut self, load: bool) -> Self {
        self.load_config_files = load;
        self
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn has_group(&self, name: &str) -> bool {
        self.group(name).is_some()
    }

    pub fn has_param(&self, id: &str) -> bool {
        self.params.contains_key(id)
    }

    /// Add a new group. Adding a group twice is an error.
    pub fn add_group(&mut self, name: &str, desc: &str) -> Result<()> {
        if self.has_group(name) {
            return Err(SemverParamsError::config(format!(
                "parameter group '{}' already exists",
                name
            )));
        }
        debug!(group = name, "adding parameter group");
        self.groups.push(Group {
            name: name.to_string(),
            desc: desc.to_string(),
            config_files: Vec::new(),
        });
        Ok(())
    }

    /// Add a group unless it is already present.
    ///
    /// `init` runs only when the group is actually added, so it happens at
    /// most once per set. Callers racing at start-up share the set behind a
    /// `Mutex`; the second caller sees the group and does nothing.
    pub fn add_group_once<F>(&mut self, name: &str, desc: &str, init: F) -> Result<()>
    where
        F: FnOnce(&mut ParamSet) -> Result<()>,
    {
        if self.has_group(name) {
            trace!(group = name, "parameter group already present");
            return Ok(());
        }
        self.add_group(name, desc)?;
        init(self)
    }

    /// Add a config file for a group.
    ///
    /// Files are applied in the order they were added, before the command
    /// line, so values from later files and from the command line win.
    pub fn add_group_config_file(
        &mut self,
        group: &str,
        path: impl Into<PathBuf>,
        optional: bool,
    ) -> Result<()> {
        let group = self
            .groups
            .iter_mut()
            .find(|g| g.name == group)
            .ok_or_else(|| {
                SemverParamsError::config(format!(
                    "cannot add a config file to the unknown parameter group '{}'",
                    group
                ))
            })?;
        group.config_files.push(ConfigFile {
            path: path.into(),
            optional,
        });
        Ok(())
    }

    /// Add a parameter to a group. The group must exist and the id must be new.
    pub fn add(&mut self, group: &str, arg: Arg) -> Result<()> {
        let id = arg.get_id().as_str().to_string();
        if !self.has_group(group) {
            return Err(SemverParamsError::config(format!(
                "parameter '{}' cannot be added to the unknown group '{}'",
                id, group
            )));
        }
        if self.has_param(&id) || self.command.get_arguments().any(|a| a.get_id() == id.as_str()) {
            return Err(SemverParamsError::config(format!(
                "parameter '{}' already exists",
                id
            )));
        }
        debug!(param = %id, group, "adding parameter");
        self.params.insert(id, group.to_string());
        let arg = arg.help_heading(group.to_string());
        self.update_command(|cmd| cmd.arg(arg));
        Ok(())
    }

    /// Add a parameter whose value is parsed by `setter`.
    ///
    /// A bad value does not fail the parse: the parameter is left unset and
    /// the error is reported in [`Parsed::parse_errors`].
    pub fn add_setter<S: Setter>(&mut self, group: &str, arg: Arg, setter: S) -> Result<()> {
        let id = arg.get_id().as_str().to_string();
        self.add(group, arg.value_parser(value_parser(setter)))?;
        let stored: StoredError = stored_error::<S::Value>;
        self.setter_params.push((id, stored));
        Ok(())
    }

    /// Change the attributes of a parameter which has already been added
    pub fn set_attrs<F>(&mut self, id: &str, f: F) -> Result<()>
    where
        F: FnOnce(Arg) -> Arg,
    {
        if !self.has_param(id) {
            return Err(SemverParamsError::config(format!(
                "the parameter '{}' has not been added yet",
                id
            )));
        }
        self.update_command(|cmd| cmd.mut_arg(id, f));
        Ok(())
    }

    pub fn add_final_check<F>(&mut self, check: F)
    where
        F: Fn(&ArgMatches) -> std::result::Result<(), ValidationError> + Send + Sync + 'static,
    {
        self.final_checks.push(Box::new(check));
    }

    /// Parse the arguments (the first one is the program name).
    ///
    /// Errors from `clap` itself, such as an unknown or missing parameter,
    /// fail the parse. Bad setter values and final-check failures do not;
    /// they are returned in [`Parsed::parse_errors`] and [`Parsed::errors`].
    pub fn parse_from<I, T>(&mut self, args: I) -> Result<Parsed>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let mut argv: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let config_args = self.config_args()?;
        if !config_args.is_empty() {
            let at = argv.len().min(1);
            argv.splice(at..at, config_args);
        }

        let matches = self.command.try_get_matches_from_mut(argv)?;

        let parse_errors: Vec<ParamError> = self
            .setter_params
            .iter()
            .filter_map(|(id, stored)| {
                stored(&matches, id).map(|error| ParamError {
                    param: id.clone(),
                    error,
                })
            })
            .collect();
        for err in &parse_errors {
            debug!(error = %err, "parameter value rejected");
        }

        debug!(count = self.final_checks.len(), "running final checks");
        let errors: Vec<ValidationError> = self
            .final_checks
            .iter()
            .filter_map(|check| check(&matches).err())
            .collect();
        for err in &errors {
            debug!(error = %err, "final check failed");
        }

        Ok(Parsed {
            matches,
            parse_errors,
            errors,
        })
    }

    fn config_args(&self) -> Result<Vec<OsString>> {
        let mut args = Vec::new();
        if !self.load_config_files {
            return Ok(args);
        }
        for group in &self.groups {
            for file in &group.config_files {
                let Some(values) = config::load_group_config(file)? else {
                    continue;
                };
                for (key, value) in values {
                    if self.params.get(&key).map(String::as_str) != Some(group.name.as_str()) {
                        return Err(SemverParamsError::config(format!(
                            "{}: '{}' is not a parameter of the group '{}'",
                            file.path.display(),
                            key,
                            group.name
                        )));
                    }
                    // one token, so a value starting with '-' is not taken for a flag
                    args.push(OsString::from(format!("--{}={}", key, value)));
                }
            }
        }
        Ok(args)
    }

    fn update_command(&mut self, f: impl FnOnce(Command) -> Command) {
        let name = self.command.get_name().to_string();
        let cmd = std::mem::replace(&mut self.command, Command::new(name));
        self.command = f(cmd);
    }
}

impl std::fmt::Debug for ParamSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParamSet")
            .field("command", &self.command.get_name())
            .field("groups", &self.groups)
            .field("params", &self.params)
            .field("setter_params", &self.setter_params.len())
            .field("final_checks", &self.final_checks.len())
            .finish()
    }
}

/// The outcome of [`ParamSet::parse_from`]
#[derive(Debug)]
pub struct Parsed {
    matches: ArgMatches,
    parse_errors: Vec<ParamError>,
    errors: Vec<ValidationError>,
}

impl Parsed {
    pub fn matches(&self) -> &ArgMatches {
        &self.matches
    }

    /// Final-check failures, in the order the checks were registered
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Values which could not be parsed, in the order the parameters were added
    pub fn parse_errors(&self) -> &[ParamError] {
        &self.parse_errors
    }

    /// No value was rejected and every final check passed
    pub fn is_ok(&self) -> bool {
        self.parse_errors.is_empty() && self.errors.is_empty()
    }

    /// The typed value of a parameter, if it was given and could be parsed
    pub fn get<T: Clone + Send + Sync + 'static>(&self, id: &str) -> Option<&T> {
        get_value(&self.matches, id)
    }
}

/// Typed lookup which treats unknown ids and rejected values as absent.
///
/// Setter parameters store a `Result`; other parameters store the value.
pub(crate) fn get_value<'m, T: Clone + Send + Sync + 'static>(
    matches: &'m ArgMatches,
    id: &str,
) -> Option<&'m T> {
    match matches.try_get_one::<std::result::Result<T, ParseError>>(id) {
        Ok(stored) => stored.and_then(|r| r.as_ref().ok()),
        Err(_) => matches.try_get_one::<T>(id).ok().flatten(),
    }
}

fn stored_error<T: Clone + Send + Sync + 'static>(
    matches: &ArgMatches,
    id: &str,
) -> Option<ParseError> {
    matches
        .try_get_one::<std::result::Result<T, ParseError>>(id)
        .ok()
        .flatten()
        .and_then(|r| r.as_ref().err().cloned())
}
