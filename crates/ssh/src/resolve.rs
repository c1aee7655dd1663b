//! Resolves ssh targets from the user's `~/.ssh/config`.

use crate::builder::SshCommandBuilder;
use crate::error::Error;
use ssh2_config::{ParseRule, SshConfig};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Returns the default SSH config file path (~/.ssh/config).
pub fn ssh_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".ssh").join("config"))
}

/// Parses the SSH config file at `path`.
///
/// Returns `None` if the file doesn't exist.
///
/// # Errors
///
/// Returns `Error::SshConfigParse` if the file exists but is malformed.
pub fn load_ssh_config(path: &Path) -> Result<Option<SshConfig>, Error> {
    if !path.exists() {
        return Ok(None);
    }

    let file = File::open(path).map_err(|e| Error::SshConfigParse(e.to_string()))?;
    let mut reader = BufReader::new(file);

    SshConfig::default()
        .parse(&mut reader, ParseRule::ALLOW_UNKNOWN_FIELDS)
        .map(Some)
        .map_err(|e| Error::SshConfigParse(e.to_string()))
}

/// Parses `~/.ssh/config`, returning an empty config if the file is missing.
///
/// # Errors
///
/// Returns `Error::NoHomeDir` if the home directory is unknown, or
/// `Error::SshConfigParse` if the file exists but is malformed.
pub fn parse_ssh_config() -> Result<SshConfig, Error> {
    let path = ssh_config_path().ok_or(Error::NoHomeDir)?;
    Ok(load_ssh_config(&path)?.unwrap_or_default())
}

/// Host clauses that name a single host: no wildcard, no negation.
fn concrete_aliases(config: &SshConfig) -> impl Iterator<Item = &str> {
    config
        .get_hosts()
        .iter()
        .flat_map(|host| &host.pattern)
        .filter(|clause| !clause.negated)
        .map(|clause| clause.pattern.as_str())
        .filter(|name| *name != "!" && !name.contains(['*', '?']))
}

/// Returns concrete host aliases declared in `config`, sorted case-insensitively.
pub fn list_hosts(config: &SshConfig) -> Vec<String> {
    let mut hosts: Vec<String> = concrete_aliases(config).map(str::to_owned).collect();
    hosts.sort_by_key(|name| name.to_lowercase());
    hosts.dedup();
    hosts
}

impl SshCommandBuilder {
    /// Creates a builder for `alias` using the parameters in `config`.
    ///
    /// `HostName` replaces the alias as the target host and `User` takes
    /// precedence over `default_user`. `Port` and the first `IdentityFile` are
    /// applied through the regular setters.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if neither the config nor
    /// `default_user` names a user, and propagates setter validation errors.
    pub fn from_ssh_config(
        alias: &str,
        default_user: Option<&str>,
        config: &SshConfig,
    ) -> Result<Self, Error> {
        let params = config.query(alias);

        let host = params.host_name.as_deref().unwrap_or(alias);
        let user = params
            .user
            .as_deref()
            .or(default_user)
            .ok_or_else(|| {
                Error::InvalidArgument(format!("no user configured for '{alias}'"))
            })?;
        let declared = concrete_aliases(config).any(|name| name == alias);
        debug!(alias, host, user, declared, "resolved ssh config entry");

        let mut builder = Self::new(user, host);

        if let Some(port) = params.port {
            builder.use_port(port)?;
        }

        if let Some(identity) = params.identity_file.as_ref().and_then(|f| f.first()) {
            builder.use_private_key(identity.to_string_lossy());
        }

        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(source: &str) -> SshConfig {
        SshConfig::default()
            .parse(
                &mut BufReader::new(Cursor::new(source)),
                ParseRule::ALLOW_UNKNOWN_FIELDS,
            )
            .expect("config should parse")
    }

    const SAMPLE: &str = "\
Host prod
    HostName prod.example.com
    User deploy
    Port 2222
    IdentityFile /keys/prod

Host staging Alpha
    HostName 10.0.0.5

Host *.internal !secret
    User ops

Host dev
    Port 22
";

    #[test]
    fn test_list_hosts_skips_patterns() {
        let hosts = list_hosts(&parse(SAMPLE));
        assert_eq!(hosts, vec!["Alpha", "dev", "prod", "staging"]);
    }

    #[test]
    fn test_concrete_aliases_keep_declaration_order() {
        let config = parse("Host zeta beta\n    Port 1\nHost web?? !db gamma\n    Port 2\n");
        let aliases: Vec<_> = concrete_aliases(&config).collect();
        assert_eq!(aliases, vec!["zeta", "beta", "gamma"]);
    }

    #[test]
    fn test_list_hosts_empty_config() {
        assert!(list_hosts(&SshConfig::default()).is_empty());
    }

    #[test]
    fn test_from_ssh_config_resolves_all_fields() {
        let builder =
            SshCommandBuilder::from_ssh_config("prod", Some("me"), &parse(SAMPLE)).unwrap();

        assert_eq!(builder.user(), "deploy");
        assert_eq!(builder.host(), "prod.example.com");
        assert_eq!(builder.rendered_options(), vec!["-i /keys/prod", "-p 2222"]);
    }

    #[test]
    fn test_from_ssh_config_falls_back_to_alias_and_user() {
        let builder =
            SshCommandBuilder::from_ssh_config("unknown", Some("me"), &parse(SAMPLE)).unwrap();

        assert_eq!(builder.target(), "me@unknown");
        assert!(builder.rendered_options().is_empty());
    }

    #[test]
    fn test_from_ssh_config_default_port_is_omitted() {
        let builder =
            SshCommandBuilder::from_ssh_config("dev", Some("me"), &parse(SAMPLE)).unwrap();
        assert!(builder.options().is_empty());
    }

    #[test]
    fn test_from_ssh_config_keeps_local_bypass() {
        let config = parse("Host box\n    HostName localhost\n");
        let builder = SshCommandBuilder::from_ssh_config("box", Some("me"), &config).unwrap();

        assert!(builder.is_local());
        assert_eq!(builder.build_command("uptime"), "uptime");
    }

    #[test]
    fn test_from_ssh_config_without_user() {
        let config = parse(SAMPLE);

        let builder = SshCommandBuilder::from_ssh_config("prod", None, &config).unwrap();
        assert_eq!(builder.user(), "deploy");

        let err = SshCommandBuilder::from_ssh_config("staging", None, &config).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidArgument("no user configured for 'staging'".into())
        );
    }

    #[test]
    fn test_load_ssh_config_missing_file() {
        let result = load_ssh_config(Path::new("/nonexistent/path/ssh_config")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_ssh_config_path_ends_with_config() {
        if let Some(path) = ssh_config_path() {
            assert!(path.ends_with(".ssh/config"));
        }
    }
}
