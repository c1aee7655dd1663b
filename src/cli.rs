use clap::{ArgAction, Parser};
use std::path::PathBuf;

const VERSION: &str = concat!(
    env!("REMOTE_PROCESS_VERSION"),
    " ",
    env!("REMOTE_PROCESS_BUILD_HASH")
);

/// Print the ssh command that runs COMMAND on a remote host.
///
/// Each COMMAND argument becomes one line of the script sent to the remote
/// `bash -se`. The command is printed, not executed.
#[derive(Debug, Parser)]
#[command(name = "remote-process", version = VERSION)]
pub struct Arguments {
    /// Use a profile from the config file.
    #[arg(long, value_name = "NAME", conflicts_with_all = ["ssh_config", "host", "user"])]
    pub profile: Option<String>,

    /// Resolve the target from an alias in ~/.ssh/config.
    #[arg(long = "ssh-config", value_name = "ALIAS", conflicts_with = "host")]
    pub ssh_config: Option<String>,

    /// Remote user. With --ssh-config, used only when the alias has no User.
    #[arg(long)]
    pub user: Option<String>,

    /// Remote host. `local`, `localhost` and `127.0.0.1` print COMMAND as is.
    #[arg(long, requires = "user")]
    pub host: Option<String>,

    /// Remote port. 22 is omitted.
    #[arg(short, long, allow_negative_numbers = true)]
    pub port: Option<i64>,

    /// Private key file.
    #[arg(short = 'i', long, value_name = "PATH")]
    pub identity: Option<String>,

    /// Jump host.
    #[arg(short = 'J', long = "jump", value_name = "HOST")]
    pub jump: Option<String>,

    /// Enable connection sharing through this control socket.
    #[arg(long, value_name = "PATH")]
    pub control_path: Option<String>,

    /// How long the shared connection stays open [default: 10m].
    #[arg(long, value_name = "DURATION", requires = "control_path")]
    pub control_persist: Option<String>,

    /// Skip host key verification.
    #[arg(long)]
    pub no_strict_host_key_checking: bool,

    /// Verify host keys even if the profile disables it.
    #[arg(long, conflicts_with = "no_strict_host_key_checking")]
    pub strict_host_key_checking: bool,

    /// Pass -q to ssh.
    #[arg(short, long)]
    pub quiet: bool,

    /// Drop -q even if the profile sets it.
    #[arg(long, conflicts_with = "quiet")]
    pub no_quiet: bool,

    /// Refuse password authentication.
    #[arg(long)]
    pub no_password_auth: bool,

    /// Allow password authentication even if the profile refuses it.
    #[arg(long, conflicts_with = "no_password_auth")]
    pub password_auth: bool,

    /// Extra flag appended verbatim, e.g. -o "-o ServerAliveInterval=30".
    #[arg(short = 'o', long = "option", value_name = "FLAG", allow_hyphen_values = true)]
    pub options: Vec<String>,

    /// Config file [default: ~/.remote-process.json].
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write the default config file if it does not exist and print its path.
    #[arg(long, conflicts_with = "list_hosts")]
    pub init_config: bool,

    /// List host aliases from ~/.ssh/config.
    #[arg(long)]
    pub list_hosts: bool,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Command lines to run remotely.
    #[arg(value_name = "COMMAND", trailing_var_arg = true)]
    pub command: Vec<String>,
}
