use crate::cli::Arguments;
use config::{ConfigError, ensure_config_exists, load, load_from_path};
use ssh::{SshCommandBuilder, list_hosts, parse_ssh_config};
use std::env;
use thiserror::Error;
use tracing::debug;

/// Errors reported by the command line front end.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Ssh(#[from] ssh::Error),

    #[error("no target given; use --profile, --ssh-config or --user/--host")]
    MissingTarget,

    #[error("no command given")]
    MissingCommand,
}

/// Runs the requested action and returns the text to print on stdout.
///
/// # Errors
///
/// Returns an error if the target cannot be resolved, an option is rejected,
/// or no command was given.
pub fn run(args: &Arguments) -> Result<String, RunError> {
    if args.init_config {
        let path = match &args.config {
            Some(path) => path.clone(),
            None => config::config_path().ok_or(ConfigError::NoHomeDir)?,
        };
        ensure_config_exists(&path)?;
        return Ok(path.display().to_string());
    }

    if args.list_hosts {
        return Ok(list_hosts(&parse_ssh_config()?).join("\n"));
    }

    if args.command.is_empty() {
        return Err(RunError::MissingCommand);
    }

    let mut builder = resolve_target(args)?;
    apply_overrides(args, &mut builder)?;
    debug!(target = %builder.target(), "resolved builder");

    Ok(builder.build_command(args.command.as_slice()))
}

fn resolve_target(args: &Arguments) -> Result<SshCommandBuilder, RunError> {
    if let Some(name) = &args.profile {
        let config = match &args.config {
            Some(path) => load_from_path(path)?,
            None => load()?,
        };
        return Ok(config.require_profile(name)?.builder()?);
    }

    if let Some(alias) = &args.ssh_config {
        let user = args.user.clone().or_else(login_name);
        return Ok(SshCommandBuilder::from_ssh_config(
            alias,
            user.as_deref(),
            &parse_ssh_config()?,
        )?);
    }

    match (&args.user, &args.host) {
        (Some(user), Some(host)) => Ok(SshCommandBuilder::new(user, host)),
        _ => Err(RunError::MissingTarget),
    }
}

fn apply_overrides(args: &Arguments, builder: &mut SshCommandBuilder) -> Result<(), RunError> {
    if let Some(identity) = &args.identity {
        builder.use_private_key(identity);
    }
    if let Some(jump) = &args.jump {
        builder.use_jump_host(jump);
    }
    if let Some(port) = args.port {
        builder.use_port(port)?;
    }
    if let Some(control_path) = &args.control_path {
        match &args.control_persist {
            Some(persist) => builder.use_multiplexing_with_persist(control_path, persist),
            None => builder.use_multiplexing(control_path),
        };
    }
    if args.no_strict_host_key_checking {
        builder.disable_strict_host_key_checking();
    }
    if args.strict_host_key_checking {
        builder.enable_strict_host_key_checking();
    }
    if args.quiet {
        builder.enable_quiet_mode();
    }
    if args.no_quiet {
        builder.disable_quiet_mode();
    }
    if args.no_password_auth {
        builder.disable_password_authentication();
    }
    if args.password_auth {
        builder.enable_password_authentication();
    }
    for option in &args.options {
        builder.add_extra_option(option);
    }
    Ok(())
}

fn login_name() -> Option<String> {
    env::var("USER").or_else(|_| env::var("USERNAME")).ok()
}
