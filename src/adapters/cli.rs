// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line identity arguments.
//!
//! This module defines the command-line flags that describe an application
//! identity and resolver settings, and turns parsed arguments into an
//! [`AppIdentity`] and [`ResolverSettings`]. The flags can be used as a
//! standalone command or merged into a host application's own command.

use crate::domain::{AppIdentity, ConfigError, Result};
use crate::service::{FetchMode, ResolverSettings};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::ffi::OsString;
use std::time::Duration;

/// Returns a standalone command accepting the identity flags.
///
/// # Examples
///
/// ```rust
/// use remotecfg::adapters::cli::identity_command;
///
/// let matches = identity_command()
///     .try_get_matches_from(["app", "--name", "orders", "--profiles", "dev,local"])
///     .unwrap();
/// assert_eq!(matches.get_one::<String>("name").map(String::as_str), Some("orders"));
/// ```
pub fn identity_command() -> Command {
    with_identity_args(
        Command::new("remotecfg").about("Resolve layered remote configuration for an application"),
    )
}

/// Adds the identity flags to an existing command.
pub fn with_identity_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("name")
                .long("name")
                .value_name("NAME")
                .required(true)
                .help("Application name"),
        )
        .arg(
            Arg::new("group")
                .long("group")
                .value_name("GROUP")
                .help("Configuration group [default: DEFAULT_GROUP]"),
        )
        .arg(
            Arg::new("prefix")
                .long("prefix")
                .value_name("PREFIX")
                .help("Resource prefix [default: the application name]"),
        )
        .arg(
            Arg::new("file-extension")
                .long("file-extension")
                .value_name("EXT")
                .help("Document format extension [default: properties]"),
        )
        .arg(
            Arg::new("profiles")
                .long("profiles")
                .value_name("PROFILE")
                .action(ArgAction::Append)
                .value_delimiter(',')
                .help("Active profiles, lowest precedence first"),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .value_name("MILLIS")
                .value_parser(value_parser!(u64))
                .help("Per-fetch timeout in milliseconds [default: 3000]"),
        )
        .arg(
            Arg::new("deadline")
                .long("deadline")
                .value_name("MILLIS")
                .value_parser(value_parser!(u64))
                .help("Overall build deadline in milliseconds"),
        )
        .arg(
            Arg::new("fetch-mode")
                .long("fetch-mode")
                .value_name("MODE")
                .value_parser(["sequential", "concurrent"])
                .help("Fetch layers one by one or all at once"),
        )
}

/// Identity and settings parsed from the command line.
///
/// # Examples
///
/// ```rust
/// use remotecfg::adapters::IdentityArgs;
///
/// let args = IdentityArgs::try_parse_from([
///     "app",
///     "--name=orders",
///     "--file-extension=yaml",
///     "--profiles=dev",
///     "--profiles=local",
/// ])
/// .unwrap();
///
/// assert_eq!(args.identity().active_profiles(), ["dev", "local"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityArgs {
    identity: AppIdentity,
    settings: ResolverSettings,
}

impl IdentityArgs {
    /// Parses the given arguments with [`identity_command`].
    ///
    /// The first argument is the program name.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIdentity` if the arguments are rejected or the
    /// identity does not validate.
    pub fn try_parse_from<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = identity_command()
            .try_get_matches_from(args)
            .map_err(|e| ConfigError::InvalidIdentity {
                message: e.to_string(),
            })?;
        Self::from_matches(&matches)
    }

    /// Parses the process's command-line arguments.
    pub fn from_env_args() -> Result<Self> {
        Self::try_parse_from(std::env::args_os())
    }

    /// Extracts identity and settings from matches of a command built with
    /// [`with_identity_args`].
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let name = matches
            .get_one::<String>("name")
            .ok_or_else(|| ConfigError::InvalidIdentity {
                message: "--name is required".to_string(),
            })?;

        let mut identity = AppIdentity::new(name.trim());
        if let Some(group) = matches.get_one::<String>("group") {
            identity = identity.with_group(group.trim());
        }
        if let Some(prefix) = matches.get_one::<String>("prefix") {
            identity = identity.with_prefix(prefix.trim());
        }
        if let Some(extension) = matches.get_one::<String>("file-extension") {
            identity = identity.with_file_extension(extension.trim());
        }
        if let Some(profiles) = matches.get_many::<String>("profiles") {
            identity = identity.with_profiles(
                profiles
                    .map(|profile| profile.trim())
                    .filter(|profile| !profile.is_empty()),
            );
        }
        identity.validate()?;

        let mut settings = ResolverSettings::default();
        if let Some(timeout) = matches.get_one::<u64>("timeout") {
            settings = settings.with_fetch_timeout(Duration::from_millis(*timeout));
        }
        if let Some(deadline) = matches.get_one::<u64>("deadline") {
            settings = settings.with_deadline(Duration::from_millis(*deadline));
        }
        if let Some(mode) = matches.get_one::<String>("fetch-mode") {
            settings = settings.with_fetch_mode(mode.parse::<FetchMode>()?);
        }

        tracing::debug!(
            "Parsed identity '{}' from command line (profiles={:?})",
            identity.application_name(),
            identity.active_profiles()
        );

        Ok(Self { identity, settings })
    }

    /// Returns the parsed identity.
    pub fn identity(&self) -> &AppIdentity {
        &self.identity
    }

    /// Returns the parsed settings.
    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Splits into identity and settings.
    pub fn into_parts(self) -> (AppIdentity, ResolverSettings) {
        (self.identity, self.settings)
    }
}
