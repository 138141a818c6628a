use crate::error::{Result, SemverParamsError};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory, under each config base directory, holding the group files
pub const CONFIG_DIR_NAME: &str = "semver-params";

/// Fallback for `XDG_CONFIG_DIRS` when it is unset or empty
const DEFAULT_GLOBAL_CONFIG_DIR: &str = "/etc/xdg";

/// A config file registered for a parameter group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub path: PathBuf,
    /// A missing optional file is skipped; a missing mandatory one is an error
    pub optional: bool,
}

/// A value in a group config file.
///
/// Lists are joined with `.`, the identifier separator, so
/// `pre-rel-ids = ["rc", "1"]` means the same as `pre-rel-ids = "rc.1"`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<ConfigValue>),
}

impl ConfigValue {
    /// The value as it would be given on the command line
    pub fn to_arg(&self) -> String {
        match self {
            ConfigValue::Bool(b) => b.to_string(),
            ConfigValue::Int(n) => n.to_string(),
            ConfigValue::Str(s) => s.clone(),
            ConfigValue::List(vals) => vals
                .iter()
                .map(ConfigValue::to_arg)
                .collect::<Vec<_>>()
                .join("."),
        }
    }
}

/// The contents of a group config file: parameter id -> value
pub type GroupConfig = BTreeMap<String, ConfigValue>;

/// Path of the config file for `group` under the base directory `base`
pub fn group_config_path(base: &Path, group: &str) -> PathBuf {
    base.join(CONFIG_DIR_NAME).join(format!("group-{}.toml", group))
}

/// The global config directory: the first entry of `XDG_CONFIG_DIRS`
pub fn global_config_dir() -> Option<PathBuf> {
    match env::var_os("XDG_CONFIG_DIRS") {
        Some(dirs) if !dirs.is_empty() => {
            env::split_paths(&dirs).find(|p| !p.as_os_str().is_empty())
        }
        _ => Some(PathBuf::from(DEFAULT_GLOBAL_CONFIG_DIR)),
    }
}

/// The personal config directory, such as `~/.config` on Linux
pub fn personal_config_dir() -> Option<PathBuf> {
    dirs::config_dir()
}

/// Base directories for group config files, global before personal
pub fn config_dirs() -> Vec<PathBuf> {
    global_config_dir()
        .into_iter()
        .chain(personal_config_dir())
        .collect()
}

/// Parse the text of a group config file
pub fn parse_group_config(content: &str) -> Result<GroupConfig> {
    Ok(toml::from_str(content)?)
}

/// Loads a group config file.
///
/// # Arguments
/// * `file` - The file and whether it may be missing
///
/// # Returns
/// * `Ok(Some(values))` - Parameter ids and their values as argument text
/// * `Ok(None)` - The file is optional and does not exist
/// * `Err` - The file is mandatory and missing, or cannot be read or parsed
pub fn load_group_config(file: &ConfigFile) -> Result<Option<Vec<(String, String)>>> {
    if file.optional && !file.path.exists() {
        debug!(path = %file.path.display(), "optional config file not found");
        return Ok(None);
    }

    let content = fs::read_to_string(&file.path)?;
    let config = parse_group_config(&content).map_err(|e| {
        SemverParamsError::config(format!("{}: {}", file.path.display(), e))
    })?;
    debug!(path = %file.path.display(), values = config.len(), "loaded config file");

    Ok(Some(
        config
            .into_iter()
            .map(|(key, value)| (key, value.to_arg()))
            .collect(),
    ))
}
