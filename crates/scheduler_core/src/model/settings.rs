//! Application settings singleton.

use super::UnknownVariant;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Display for Theme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Light => f.write_str("light"),
            Self::Dark => f.write_str("dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(UnknownVariant {
                kind: "theme",
                value: value.to_string(),
            }),
        }
    }
}

/// User preferences. Always present once the store is initialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub theme: Theme,
    /// Reminder offset applied to new events that do not pick one.
    pub default_reminder_time: u32,
    /// Master switch for reminder and overdue signals.
    pub notifications: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            default_reminder_time: 15,
            notifications: true,
        }
    }
}

impl Settings {
    /// Shallow merge of the present patch fields.
    pub fn apply_patch(&mut self, patch: &SettingsPatch) {
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(minutes) = patch.default_reminder_time {
            self.default_reminder_time = minutes;
        }
        if let Some(enabled) = patch.notifications {
            self.notifications = enabled;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SettingsPatch {
    pub theme: Option<Theme>,
    pub default_reminder_time: Option<u32>,
    pub notifications: Option<bool>,
}
