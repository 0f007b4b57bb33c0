//! Conventional color variables read from the process environment
//!
//! `CI`, `FORCE_COLOR`, `NO_COLOR` and `CLICOLOR` adjust the color choice
//! made by defaults and flags before the logger is initialized.

use crate::primitives::{ColorChoice, ConfigError};
use serde::Deserialize;

/// Raw values of the color-related variables; unset variables stay `None`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvironmentConfig {
    /// `NO_COLOR`: a non-empty value turns color off
    pub no_color: Option<String>,
    /// `FORCE_COLOR`: `0`/`false` off, `1`..`3`/`true` on, anything else ignored
    pub force_color: Option<String>,
    /// `CLICOLOR`: `0` turns color off
    pub clicolor: Option<String>,
    /// `CI`: set on build servers, whose logs are not terminals
    pub ci: Option<String>,
}

impl EnvironmentConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Ok(envy::from_env()?)
    }

    /// Same as [`load`](Self::load) over explicit `(name, value)` pairs
    pub fn from_pairs<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::from_iter(vars)?)
    }

    /// Color choice after the environment has had its say
    ///
    /// `CI` always disables color. Otherwise a recognized `FORCE_COLOR`
    /// decides, then `NO_COLOR` or `CLICOLOR=0` disable it, and failing all
    /// of those `color` is kept.
    pub fn apply_color_config(&self, color: ColorChoice) -> ColorChoice {
        if self.ci.is_some() {
            return ColorChoice::Never;
        }

        if let Some(forced) = self.forced_color() {
            return forced;
        }

        let no_color = self.no_color.as_deref().is_some_and(|value| !value.is_empty());
        let clicolor_off = self.clicolor.as_deref() == Some("0");
        if no_color || clicolor_off {
            ColorChoice::Never
        } else {
            color
        }
    }

    fn forced_color(&self) -> Option<ColorChoice> {
        match self.force_color.as_deref()? {
            "0" | "false" => Some(ColorChoice::Never),
            "1" | "2" | "3" | "true" => Some(ColorChoice::Always),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    include!("env.test.rs");
}
