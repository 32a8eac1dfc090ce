//! Light/dark theme preference shared by the runtime and browser adapters.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
/// Resolved color scheme.
pub enum ThemeMode {
    /// Light color scheme.
    #[default]
    Light,
    /// Dark color scheme.
    Dark,
}

impl ThemeMode {
    /// Stable token used in asset paths and `data-theme` attributes.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Returns the other mode.
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Maps a `prefers-color-scheme: dark` media query result to a mode.
    pub const fn from_prefers_dark(prefers_dark: bool) -> Self {
        if prefers_dark {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Theme selection: either follow the host's system scheme or use a manual override.
pub struct ThemePreference {
    /// Whether [`Self::active`] follows [`Self::system`].
    pub use_system: bool,
    /// Last scheme reported by the host.
    pub system: ThemeMode,
    /// Manually selected scheme.
    pub manual: ThemeMode,
}

impl Default for ThemePreference {
    fn default() -> Self {
        Self {
            use_system: true,
            system: ThemeMode::Light,
            manual: ThemeMode::Light,
        }
    }
}

impl ThemePreference {
    /// The scheme currently in effect.
    pub const fn active(&self) -> ThemeMode {
        if self.use_system {
            self.system
        } else {
            self.manual
        }
    }

    /// Records a host scheme change. Returns `true` when the active scheme changed.
    pub fn set_system(&mut self, mode: ThemeMode) -> bool {
        let before = self.active();
        self.system = mode;
        before != self.active()
    }

    /// Stops following the system scheme and flips the active scheme.
    pub fn switch(&mut self) -> ThemeMode {
        let next = self.active().toggled();
        self.use_system = false;
        self.manual = next;
        next
    }
}
