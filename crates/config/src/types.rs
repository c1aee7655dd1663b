use serde::{Deserialize, Serialize};
use ssh::SshCommandBuilder;

/// Connection sharing settings for a profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Multiplexing {
    pub control_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_persist: Option<String>,
}

/// A named target with the ssh options to use for it.
///
/// Unset fields leave the builder defaults alone.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    pub name: String,
    pub user: String,
    pub host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jump_host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplexing: Option<Multiplexing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict_host_key_checking: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiet: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_authentication: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_options: Vec<String>,
}

impl Profile {
    /// Returns a builder configured from this profile.
    ///
    /// # Errors
    ///
    /// Returns the builder's validation error for an invalid port.
    pub fn builder(&self) -> Result<SshCommandBuilder, ssh::Error> {
        let mut builder = SshCommandBuilder::new(&self.user, &self.host);
        self.apply(&mut builder)?;
        Ok(builder)
    }

    /// Applies every field that is set to `builder`.
    ///
    /// # Errors
    ///
    /// Returns the builder's validation error for an invalid port.
    pub fn apply(&self, builder: &mut SshCommandBuilder) -> Result<(), ssh::Error> {
        if let Some(path) = &self.private_key {
            builder.use_private_key(path);
        }
        if let Some(jump_host) = &self.jump_host {
            builder.use_jump_host(jump_host);
        }
        if let Some(port) = self.port {
            builder.use_port(port)?;
        }
        if let Some(mux) = &self.multiplexing {
            match &mux.control_persist {
                Some(persist) => builder.use_multiplexing_with_persist(&mux.control_path, persist),
                None => builder.use_multiplexing(&mux.control_path),
            };
        }
        match self.strict_host_key_checking {
            Some(true) => {
                builder.enable_strict_host_key_checking();
            }
            Some(false) => {
                builder.disable_strict_host_key_checking();
            }
            None => {}
        }
        match self.quiet {
            Some(true) => {
                builder.enable_quiet_mode();
            }
            Some(false) => {
                builder.disable_quiet_mode();
            }
            None => {}
        }
        match self.password_authentication {
            Some(true) => {
                builder.enable_password_authentication();
            }
            Some(false) => {
                builder.disable_password_authentication();
            }
            None => {}
        }
        for option in &self.extra_options {
            builder.add_extra_option(option);
        }
        Ok(())
    }
}

/// Top-level profile file.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub profiles: Vec<Profile>,
}

impl Config {
    /// Looks up a profile by exact name.
    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == name)
    }
}
