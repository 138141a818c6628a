use anyhow::Result;
use clap::{ArgMatches, Command, CommandFactory, FromArgMatches};
use std::ffi::OsString;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use semver_params::params::{ParamSet, SemverChecks, SemverVals};
use semver_params::{ui, SemverParamsError};

#[derive(clap::Parser)]
#[command(
    name = "semver-params",
    version,
    about = "Parse a semantic version number and check its pre-release and build IDs"
)]
struct Args {
    #[arg(long, help = "Do not read the group config files")]
    no_config: bool,

    #[arg(short, long, help = "Only print the values, not the check outcome")]
    quiet: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let argv: Vec<OsString> = std::env::args_os().collect();

    let checks = SemverChecks::default();
    let mut vals = SemverVals::default();
    let mut ps = ParamSet::new(Args::command());
    vals.add_semver_param(&mut ps, Some(&checks))?;
    vals.add_id_params(&mut ps, Some(&checks))?;
    checks.add_check_params(&mut ps)?;

    // Config files are read during the parse, so this flag is needed first
    let no_config = no_config_given(ps.command(), &argv);
    let mut ps = ps.load_config_files(!no_config);

    let parsed = match ps.parse_from(argv) {
        Ok(parsed) => parsed,
        Err(SemverParamsError::Cli(e)) => e.exit(),
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };
    let args = Args::from_arg_matches(parsed.matches())?;
    debug!(config_files = !args.no_config, "parameters parsed");

    vals.load(&parsed);
    checks.load(&parsed);
    ui::display_values(&vals, &checks);

    if !parsed.is_ok() {
        for err in parsed.parse_errors() {
            ui::display_error(&err.to_string());
        }
        for err in parsed.errors() {
            ui::display_error(&err.to_string());
        }
        std::process::exit(1);
    }
    if !args.quiet {
        ui::display_success("all checks passed");
    }
    Ok(())
}

/// Whether `--no-config` is among the arguments, found by a lenient parse
fn no_config_given(command: &Command, argv: &[OsString]) -> bool {
    command
        .clone()
        .ignore_errors(true)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .try_get_matches_from(argv)
        .ok()
        .as_ref()
        .and_then(|m: &ArgMatches| m.try_get_one::<bool>("no_config").ok().flatten().copied())
        .unwrap_or(false)
}
