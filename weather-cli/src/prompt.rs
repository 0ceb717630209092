//! Interactive prompts: the location permission question and `configure`.

use std::fmt;

use anyhow::{Context, Result};
use inquire::{
    Confirm, CustomType, CustomUserError, InquireError, Password, PasswordDisplayMode, Select,
    validator::Validation,
};
use weather_core::{Config, Coordinates, Permission, PermissionPolicy, SourceKind};

/// Decide this session's location permission, asking the user if the policy says so.
pub fn resolve_permission(policy: PermissionPolicy) -> Result<Permission> {
    if let Some(decided) = Permission::from_policy(policy) {
        return Ok(decided);
    }

    let answer = Confirm::new("Allow Weather finder to use your location?")
        .with_default(true)
        .with_help_message("Location permission is required to fetch weather for where you are")
        .prompt();

    match answer {
        Ok(true) => Ok(Permission::Granted),
        Ok(false) => Ok(Permission::Denied),
        Err(InquireError::OperationCanceled) => Ok(Permission::Denied),
        Err(err) => Err(err).context("Failed to read location permission answer"),
    }
}

/// Answers collected by [`configure`].
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigureAnswers {
    /// `None` keeps the stored key.
    pub api_key: Option<String>,
    pub permission: PermissionPolicy,
    pub source: SourceKind,
    pub fixed: Option<Coordinates>,
}

impl ConfigureAnswers {
    pub fn apply(self, config: &mut Config) {
        if let Some(key) = self.api_key {
            config.set_api_key(key);
        }
        config.location.permission = self.permission;
        match self.fixed {
            Some(coords) if self.source == SourceKind::Fixed => config.set_fixed_location(coords),
            _ => config.location.source = self.source,
        }
    }
}

struct Choice<T> {
    value: T,
    label: &'static str,
}

impl<T> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label)
    }
}

fn select<T: Copy + PartialEq>(message: &str, choices: Vec<Choice<T>>, current: T) -> Result<T> {
    let cursor = choices.iter().position(|c| c.value == current).unwrap_or(0);
    let picked = Select::new(message, choices)
        .with_starting_cursor(cursor)
        .prompt()
        .with_context(|| format!("Prompt '{message}' was not answered"))?;
    Ok(picked.value)
}

fn degrees(message: &str, limit: f64, current: Option<f64>) -> Result<f64> {
    let mut prompt = CustomType::<f64>::new(message)
        .with_error_message("Please enter a number in decimal degrees")
        .with_validator(move |v: &f64| -> Result<Validation, CustomUserError> {
            if v.is_finite() && v.abs() <= limit {
                Ok(Validation::Valid)
            } else {
                Ok(Validation::Invalid(
                    format!("Must be between -{limit} and {limit}").into(),
                ))
            }
        });
    if let Some(value) = current {
        prompt = prompt.with_default(value);
    }
    prompt
        .prompt()
        .with_context(|| format!("Prompt '{message}' was not answered"))
}

/// Walk the user through every setting, starting from the current config.
pub fn configure(current: &Config) -> Result<ConfigureAnswers> {
    let has_key = current.openweather.api_key.is_some();
    let mut key_prompt = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked);
    if has_key {
        key_prompt = key_prompt.with_help_message("Leave empty to keep the current key");
    }
    let api_key = key_prompt
        .prompt()
        .context("API key prompt was not answered")?
        .trim()
        .to_string();
    let api_key = (!api_key.is_empty()).then_some(api_key);

    let permission = select(
        "Location permission:",
        vec![
            Choice {
                value: PermissionPolicy::Ask,
                label: "Ask every time",
            },
            Choice {
                value: PermissionPolicy::Granted,
                label: "Always allow",
            },
            Choice {
                value: PermissionPolicy::Denied,
                label: "Never allow",
            },
        ],
        current.location.permission,
    )?;

    let source = select(
        "Where should your location come from?",
        vec![
            Choice {
                value: SourceKind::Ip,
                label: "Approximate, from my IP address",
            },
            Choice {
                value: SourceKind::Fixed,
                label: "Fixed coordinates",
            },
        ],
        current.location.source,
    )?;

    let fixed = if source == SourceKind::Fixed {
        let lat = degrees("Latitude:", 90.0, current.location.latitude)?;
        let lon = degrees("Longitude:", 180.0, current.location.longitude)?;
        Some(Coordinates::new(lat, lon).context("Invalid coordinates")?)
    } else {
        None
    };

    Ok(ConfigureAnswers {
        api_key,
        permission,
        source,
        fixed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decided_policies_skip_the_prompt() {
        assert_eq!(
            resolve_permission(PermissionPolicy::Granted).unwrap(),
            Permission::Granted
        );
        assert_eq!(
            resolve_permission(PermissionPolicy::Denied).unwrap(),
            Permission::Denied
        );
    }

    #[test]
    fn apply_keeps_existing_key_when_none() {
        let mut cfg = Config::default();
        cfg.set_api_key("OLD".into());

        ConfigureAnswers {
            api_key: None,
            permission: PermissionPolicy::Granted,
            source: SourceKind::Ip,
            fixed: None,
        }
        .apply(&mut cfg);

        assert_eq!(cfg.openweather.api_key.as_deref(), Some("OLD"));
        assert_eq!(cfg.location.permission, PermissionPolicy::Granted);
        assert_eq!(cfg.location.source, SourceKind::Ip);
    }

    #[test]
    fn apply_sets_fixed_location() {
        let mut cfg = Config::default();

        ConfigureAnswers {
            api_key: Some("NEW".into()),
            permission: PermissionPolicy::Ask,
            source: SourceKind::Fixed,
            fixed: Some(Coordinates::new(40.0, -75.0).unwrap()),
        }
        .apply(&mut cfg);

        assert_eq!(cfg.openweather.api_key.as_deref(), Some("NEW"));
        assert_eq!(cfg.location.source, SourceKind::Fixed);
        assert_eq!(cfg.location.latitude, Some(40.0));
        assert_eq!(cfg.location.longitude, Some(-75.0));
    }
}
