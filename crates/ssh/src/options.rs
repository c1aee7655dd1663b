//! Named and free-form ssh client options.
//!
//! Named options live in fixed slots indexed by [`OptionKey`]. Rendering walks
//! [`OptionKey::ALL`], so flag order never depends on the order setters ran.

use std::fmt;

const KEY_COUNT: usize = 7;

/// Identifier of a named option slot.
///
/// Variant order is the render order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum OptionKey {
    PrivateKey,
    JumpHost,
    Port,
    ControlMaster,
    EnableStrictCheck,
    Quiet,
    PasswordAuthentication,
}

impl OptionKey {
    /// Every key, in canonical render order.
    pub const ALL: [OptionKey; KEY_COUNT] = [
        Self::PrivateKey,
        Self::JumpHost,
        Self::Port,
        Self::ControlMaster,
        Self::EnableStrictCheck,
        Self::Quiet,
        Self::PasswordAuthentication,
    ];

    /// Returns the stable name of the slot.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PrivateKey => "private_key",
            Self::JumpHost => "jump_host",
            Self::Port => "port",
            Self::ControlMaster => "control_master",
            Self::EnableStrictCheck => "enable_strict_check",
            Self::Quiet => "quiet",
            Self::PasswordAuthentication => "password_authentication",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendered flag strings for the named slots plus any free-form extras.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSet {
    named: [Option<String>; KEY_COUNT],
    extra: Vec<String>,
}

impl OptionSet {
    /// Stores `flag` under `key`, replacing whatever was there.
    pub fn set(&mut self, key: OptionKey, flag: impl Into<String>) {
        self.named[key.index()] = Some(flag.into());
    }

    /// Clears the slot for `key`.
    pub fn unset(&mut self, key: OptionKey) {
        self.named[key.index()] = None;
    }

    /// Returns the flag stored under `key`, if any.
    #[must_use]
    pub fn get(&self, key: OptionKey) -> Option<&str> {
        self.named[key.index()].as_deref()
    }

    /// Appends a free-form flag. Extras are never replaced.
    pub fn push_extra(&mut self, flag: impl Into<String>) {
        self.extra.push(flag.into());
    }

    /// Iterates flags in render order: named slots first, then extras.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        OptionKey::ALL
            .iter()
            .filter_map(|key| self.get(*key))
            .chain(self.extra.iter().map(String::as_str))
    }

    /// Joins all flags with a single space.
    #[must_use]
    pub fn render(&self) -> String {
        self.iter().collect::<Vec<_>>().join(" ")
    }

    /// Returns `true` when no flag would be rendered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}
