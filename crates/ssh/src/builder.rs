//! Composes `ssh` heredoc invocations.
//!
//! Values are interpolated without shell quoting. Callers that pass
//! untrusted user, host, path or payload text must sanitize it first.

use crate::error::Error;
use crate::options::{OptionKey, OptionSet};
use crate::payload::{LINE_ENDING, Payload};
use tracing::{debug, warn};

/// Sentinel closing the heredoc that carries the payload.
pub const HEREDOC_DELIMITER: &str = "EOF-LARAVEL-SSH";

/// Host names that run the payload directly instead of over ssh.
pub const LOCAL_HOSTS: [&str; 3] = ["local", "localhost", "127.0.0.1"];

/// Persist value used by [`SshCommandBuilder::use_multiplexing`].
pub const DEFAULT_CONTROL_PERSIST: &str = "10m";

const DEFAULT_SSH_PORT: i64 = 22;

/// Builds the shell command that runs a payload on `user@host`.
///
/// ```
/// use ssh::SshCommandBuilder;
///
/// let mut builder = SshCommandBuilder::new("foo", "bar");
/// builder.use_port(222)?.enable_quiet_mode();
///
/// assert_eq!(
///     builder.build_command(["ls -al"]),
///     "ssh -p 222 -q foo@bar 'bash -se' << \\EOF-LARAVEL-SSH\nls -al\nEOF-LARAVEL-SSH"
/// );
/// # Ok::<(), ssh::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshCommandBuilder {
    user: String,
    host: String,
    options: OptionSet,
}

impl SshCommandBuilder {
    /// Creates a builder for `user@host` with no options set.
    pub fn new(user: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            host: host.into(),
            options: OptionSet::default(),
        }
    }

    /// Creates a builder for `user@host`. Same as [`SshCommandBuilder::new`].
    pub fn create(user: impl Into<String>, host: impl Into<String>) -> Self {
        Self::new(user, host)
    }

    /// Remote login name.
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Remote host as given, before any local bypass check.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns `user@host`.
    pub fn target(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }

    /// Returns `true` if the host is one of [`LOCAL_HOSTS`] (exact match).
    pub fn is_local(&self) -> bool {
        LOCAL_HOSTS.contains(&self.host.as_str())
    }

    /// Named and extra flags set so far.
    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    /// Flag strings in the order they appear on the command line.
    pub fn rendered_options(&self) -> Vec<&str> {
        self.options.iter().collect()
    }

    /// Stores `-i <path>`.
    pub fn use_private_key(&mut self, path: impl AsRef<str>) -> &mut Self {
        self.options
            .set(OptionKey::PrivateKey, format!("-i {}", path.as_ref()));
        self
    }

    /// Stores `-J <jump_host>`.
    pub fn use_jump_host(&mut self, jump_host: impl AsRef<str>) -> &mut Self {
        self.options
            .set(OptionKey::JumpHost, format!("-J {}", jump_host.as_ref()));
        self
    }

    /// Sets the remote port.
    ///
    /// Port 22 clears any previous port, since ssh uses it by default.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for a negative port. The builder is
    /// left untouched in that case.
    pub fn use_port(&mut self, port: impl Into<i64>) -> Result<&mut Self, Error> {
        let port = port.into();

        if port < 0 {
            return Err(Error::negative_port());
        }

        if port == DEFAULT_SSH_PORT {
            self.options.unset(OptionKey::Port);
        } else {
            self.options.set(OptionKey::Port, format!("-p {port}"));
        }

        Ok(self)
    }

    /// Enables connection sharing with [`DEFAULT_CONTROL_PERSIST`].
    pub fn use_multiplexing(&mut self, control_path: impl AsRef<str>) -> &mut Self {
        self.use_multiplexing_with_persist(control_path, DEFAULT_CONTROL_PERSIST)
    }

    /// Stores the `ControlMaster=auto`, `ControlPath` and `ControlPersist` options.
    pub fn use_multiplexing_with_persist(
        &mut self,
        control_path: impl AsRef<str>,
        control_persist: impl AsRef<str>,
    ) -> &mut Self {
        self.options.set(
            OptionKey::ControlMaster,
            format!(
                "-o ControlMaster=auto -o ControlPath={} -o ControlPersist={}",
                control_path.as_ref(),
                control_persist.as_ref()
            ),
        );
        self
    }

    /// Clears the host key checking override. ssh verifies host keys again.
    pub fn enable_strict_host_key_checking(&mut self) -> &mut Self {
        self.options.unset(OptionKey::EnableStrictCheck);
        self
    }

    /// Stores `-o StrictHostKeyChecking=no -o UserKnownHostsFile=/dev/null`.
    pub fn disable_strict_host_key_checking(&mut self) -> &mut Self {
        self.options.set(
            OptionKey::EnableStrictCheck,
            "-o StrictHostKeyChecking=no -o UserKnownHostsFile=/dev/null",
        );
        self
    }

    /// Stores `-q`.
    pub fn enable_quiet_mode(&mut self) -> &mut Self {
        self.options.set(OptionKey::Quiet, "-q");
        self
    }

    /// Clears `-q`.
    pub fn disable_quiet_mode(&mut self) -> &mut Self {
        self.options.unset(OptionKey::Quiet);
        self
    }

    /// Stores `-o PasswordAuthentication=no`.
    pub fn disable_password_authentication(&mut self) -> &mut Self {
        self.options
            .set(OptionKey::PasswordAuthentication, "-o PasswordAuthentication=no");
        self
    }

    /// Clears the password authentication override.
    pub fn enable_password_authentication(&mut self) -> &mut Self {
        self.options.unset(OptionKey::PasswordAuthentication);
        self
    }

    /// Appends a raw flag after all named options.
    pub fn add_extra_option(&mut self, option: impl Into<String>) -> &mut Self {
        self.options.push_extra(option);
        self
    }

    /// Renders the command for `payload`.
    ///
    /// Local hosts get the joined payload back verbatim. Everything else is
    /// wrapped as `ssh <options> user@host 'bash -se' << \DELIM`.
    pub fn build_command(&self, payload: impl Into<Payload>) -> String {
        let payload = payload.into();
        let body = payload.body();

        if self.is_local() {
            debug!(host = %self.host, "local host, skipping ssh");
            return body;
        }

        if closes_heredoc_early(&payload) {
            warn!(
                delimiter = HEREDOC_DELIMITER,
                "payload contains the heredoc delimiter and will be truncated remotely"
            );
        }

        let options = self.options.render();
        let target = self.target();
        debug!(%target, %options, lines = payload.lines().len(), "built ssh command");

        format!(
            "ssh {options} {target} 'bash -se' << \\{HEREDOC_DELIMITER}{LINE_ENDING}{body}{LINE_ENDING}{HEREDOC_DELIMITER}"
        )
    }
}

/// Returns `true` if some payload line would end the heredoc before the body does.
fn closes_heredoc_early(payload: &Payload) -> bool {
    payload.contains_line(HEREDOC_DELIMITER)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected_command(body: &str, options: &str) -> String {
        format!(
            "ssh {options} foo@bar 'bash -se' << \\EOF-LARAVEL-SSH{LINE_ENDING}{body}{LINE_ENDING}EOF-LARAVEL-SSH"
        )
    }

    fn builder() -> SshCommandBuilder {
        SshCommandBuilder::new("foo", "bar")
    }

    #[test]
    fn test_create_builder() {
        let builder = builder();
        assert_eq!(builder.user(), "foo");
        assert_eq!(builder.host(), "bar");
        assert_eq!(builder.target(), "foo@bar");
        assert!(!builder.is_local());
        assert_eq!(builder.build_command("ls -al"), expected_command("ls -al", ""));
    }

    #[test]
    fn test_create_matches_new() {
        assert_eq!(SshCommandBuilder::create("foo", "bar"), builder());
    }

    #[test]
    fn test_no_options_leaves_empty_segment() {
        assert!(builder().build_command("ls -al").starts_with("ssh  foo@bar "));
    }

    #[test]
    fn test_command_from_list() {
        let body = format!("ls -al{LINE_ENDING}whoami");
        assert_eq!(
            builder().build_command(vec!["ls -al", "whoami"]),
            expected_command(&body, "")
        );
    }

    #[cfg(not(windows))]
    #[test]
    fn test_end_to_end_with_port() {
        let mut builder = builder();
        builder.use_port(222).unwrap();
        assert_eq!(
            builder.build_command("ls -al"),
            "ssh -p 222 foo@bar 'bash -se' << \\EOF-LARAVEL-SSH\nls -al\nEOF-LARAVEL-SSH"
        );
    }

    #[test]
    fn test_local_hosts_bypass_ssh() {
        for host in LOCAL_HOSTS {
            let mut builder = SshCommandBuilder::new("foo", host);
            builder
                .use_port(2222)
                .unwrap()
                .enable_quiet_mode()
                .add_extra_option("-A");

            assert!(builder.is_local());
            assert_eq!(builder.host(), host);
            assert_eq!(builder.build_command("ls -al"), "ls -al");
        }
    }

    #[test]
    fn test_local_bypass_joins_lines() {
        let builder = SshCommandBuilder::new("foo", "localhost");
        assert_eq!(
            builder.build_command(["cd /tmp", "ls"]),
            format!("cd /tmp{LINE_ENDING}ls")
        );
    }

    #[test]
    fn test_local_match_is_case_sensitive() {
        for host in ["LOCALHOST", "Local", "localhost.localdomain", "127.0.0.2"] {
            let builder = SshCommandBuilder::new("foo", host);
            assert!(!builder.is_local(), "{host} should not bypass ssh");
            assert!(builder.build_command("ls").starts_with("ssh "));
        }
    }

    #[test]
    fn test_port() {
        let mut builder = builder();
        builder.use_port(222).unwrap();
        assert_eq!(
            builder.build_command("ls -al"),
            expected_command("ls -al", "-p 222")
        );
    }

    #[test]
    fn test_port_22_is_omitted() {
        let mut builder = builder();
        builder.use_port(22).unwrap();
        assert_eq!(builder.build_command("ls -al"), expected_command("ls -al", ""));
    }

    #[test]
    fn test_port_22_clears_previous_port() {
        let mut builder = builder();
        builder.use_port(2222).unwrap().use_port(22).unwrap();
        assert_eq!(builder, self::builder());
    }

    #[test]
    fn test_port_zero_is_rendered() {
        let mut builder = builder();
        builder.use_port(0).unwrap();
        assert_eq!(builder.rendered_options(), vec!["-p 0"]);
    }

    #[test]
    fn test_port_last_write_wins() {
        let mut builder = builder();
        builder.use_port(2222).unwrap().use_port(2200).unwrap();
        assert_eq!(builder.rendered_options(), vec!["-p 2200"]);
    }

    #[test]
    fn test_port_accepts_u16() {
        let mut builder = builder();
        builder.use_port(2222_u16).unwrap();
        assert_eq!(builder.rendered_options(), vec!["-p 2222"]);
    }

    #[test]
    fn test_negative_port_is_rejected() {
        let mut builder = builder();
        builder.use_port(2222).unwrap().enable_quiet_mode();
        let before = builder.clone();

        let err = builder.use_port(-5).unwrap_err();

        assert_eq!(
            err,
            Error::InvalidArgument("port must be a positive integer".into())
        );
        assert_eq!(builder, before);
    }

    #[test]
    fn test_private_key() {
        let mut builder = builder();
        builder.use_private_key("~/.ssh/github");
        assert_eq!(
            builder.build_command("ls -al"),
            expected_command("ls -al", "-i ~/.ssh/github")
        );
    }

    #[test]
    fn test_jump_host() {
        let mut builder = builder();
        builder.use_jump_host("foo");
        assert_eq!(
            builder.build_command("ls -al"),
            expected_command("ls -al", "-J foo")
        );
    }

    #[test]
    fn test_multiplexing_default_persist() {
        let mut builder = builder();
        builder.use_multiplexing("foo");
        assert_eq!(
            builder.build_command("ls -al"),
            expected_command(
                "ls -al",
                "-o ControlMaster=auto -o ControlPath=foo -o ControlPersist=10m"
            )
        );
    }

    #[test]
    fn test_multiplexing_custom_persist() {
        let mut builder = builder();
        builder
            .use_multiplexing("foo")
            .use_multiplexing_with_persist("/tmp/cm-%r@%h:%p", "1h");
        assert_eq!(
            builder.rendered_options(),
            vec!["-o ControlMaster=auto -o ControlPath=/tmp/cm-%r@%h:%p -o ControlPersist=1h"]
        );
    }

    #[test]
    fn test_disable_strict_host_key_checking() {
        let mut builder = builder();
        builder.disable_strict_host_key_checking();
        assert_eq!(
            builder.build_command("ls -al"),
            expected_command(
                "ls -al",
                "-o StrictHostKeyChecking=no -o UserKnownHostsFile=/dev/null"
            )
        );
    }

    #[test]
    fn test_enable_quiet_mode() {
        let mut builder = builder();
        builder.enable_quiet_mode();
        assert_eq!(builder.build_command("ls -al"), expected_command("ls -al", "-q"));
    }

    #[test]
    fn test_disable_password_authentication() {
        let mut builder = builder();
        builder.disable_password_authentication();
        assert_eq!(
            builder.build_command("ls -al"),
            expected_command("ls -al", "-o PasswordAuthentication=no")
        );
    }

    #[test]
    fn test_toggles_return_to_untouched_state() {
        let untouched = builder();

        let mut quiet = builder();
        quiet.enable_quiet_mode().disable_quiet_mode();
        assert_eq!(quiet, untouched);

        let mut strict = builder();
        strict
            .disable_strict_host_key_checking()
            .enable_strict_host_key_checking();
        assert_eq!(strict, untouched);

        let mut password = builder();
        password
            .disable_password_authentication()
            .enable_password_authentication();
        assert_eq!(password, untouched);

        for toggled in [quiet, strict, password] {
            assert_eq!(
                toggled.build_command("ls -al"),
                untouched.build_command("ls -al")
            );
        }
    }

    #[test]
    fn test_enabling_defaults_on_fresh_builder_is_noop() {
        let mut builder = builder();
        builder
            .enable_strict_host_key_checking()
            .disable_quiet_mode()
            .enable_password_authentication();
        assert_eq!(builder, self::builder());
    }

    #[test]
    fn test_render_order_is_canonical() {
        let mut builder = builder();
        builder
            .disable_password_authentication()
            .enable_quiet_mode()
            .disable_strict_host_key_checking()
            .use_multiplexing("cm")
            .use_port(2222)
            .unwrap()
            .use_jump_host("bastion")
            .use_private_key("id_ed25519");

        assert_eq!(
            builder.rendered_options(),
            vec![
                "-i id_ed25519",
                "-J bastion",
                "-p 2222",
                "-o ControlMaster=auto -o ControlPath=cm -o ControlPersist=10m",
                "-o StrictHostKeyChecking=no -o UserKnownHostsFile=/dev/null",
                "-q",
                "-o PasswordAuthentication=no",
            ]
        );
    }

    #[test]
    fn test_quiet_before_port_still_renders_port_first() {
        let mut builder = builder();
        builder.enable_quiet_mode().use_port(222).unwrap();
        assert_eq!(
            builder.build_command("ls -al"),
            expected_command("ls -al", "-p 222 -q")
        );
    }

    #[test]
    fn test_extra_options_render_after_named() {
        let mut builder = builder();
        builder
            .add_extra_option("-o ServerAliveInterval=30")
            .enable_quiet_mode()
            .add_extra_option("-A");

        assert_eq!(
            builder.build_command("ls -al"),
            expected_command("ls -al", "-q -o ServerAliveInterval=30 -A")
        );
    }

    #[test]
    fn test_extra_options_are_additive() {
        let mut builder = builder();
        builder.add_extra_option("-A").add_extra_option("-A");
        assert_eq!(builder.rendered_options(), vec!["-A", "-A"]);
    }

    #[test]
    fn test_values_are_not_escaped() {
        let mut builder = SshCommandBuilder::new("deploy user", "host;rm");
        builder.use_private_key("/keys/my key");
        assert_eq!(
            builder.build_command("echo $HOME"),
            format!(
                "ssh -i /keys/my key deploy user@host;rm 'bash -se' << \\EOF-LARAVEL-SSH{LINE_ENDING}echo $HOME{LINE_ENDING}EOF-LARAVEL-SSH"
            )
        );
    }

    #[test]
    fn test_delimiter_in_payload_is_passed_through() {
        let body = format!("echo one{LINE_ENDING}EOF-LARAVEL-SSH{LINE_ENDING}echo two");
        assert_eq!(
            builder().build_command(["echo one", HEREDOC_DELIMITER, "echo two"]),
            expected_command(&body, "")
        );
    }

    #[test]
    fn test_delimiter_collision_is_detected() {
        assert!(closes_heredoc_early(&Payload::from([
            "echo one",
            HEREDOC_DELIMITER,
            "echo two"
        ])));
        assert!(closes_heredoc_early(&Payload::from("echo\nEOF-LARAVEL-SSH\nrm")));
        assert!(!closes_heredoc_early(&Payload::from("echo EOF-LARAVEL-SSH")));
    }

    #[test]
    fn test_embedded_delimiter_is_passed_through() {
        assert_eq!(
            builder().build_command("echo\nEOF-LARAVEL-SSH\nrm"),
            expected_command("echo\nEOF-LARAVEL-SSH\nrm", "")
        );
    }

    #[test]
    fn test_build_command_does_not_consume_builder() {
        let mut builder = builder();
        builder.enable_quiet_mode();
        let first = builder.build_command("uptime");
        let second = builder.build_command("uptime");
        assert_eq!(first, second);
    }
}
