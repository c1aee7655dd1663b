//! Builds shell commands that run a payload on a remote host over ssh.
//!
//! The output of [`SshCommandBuilder::build_command`] is plain text meant to
//! be handed to a shell. Nothing here spawns processes.

mod builder;
mod error;
mod options;
mod payload;
mod resolve;

pub use builder::{
    DEFAULT_CONTROL_PERSIST, HEREDOC_DELIMITER, LOCAL_HOSTS, SshCommandBuilder,
};
pub use error::Error;
pub use options::{OptionKey, OptionSet};
pub use payload::{LINE_ENDING, Payload};
pub use resolve::{list_hosts, load_ssh_config, parse_ssh_config, ssh_config_path};
pub use ssh2_config::SshConfig;
