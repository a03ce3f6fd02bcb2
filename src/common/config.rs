use std::path::{Path, PathBuf};

use anyhow::{Context as _, bail};
use serde::{Deserialize, Serialize};

use super::collections::HashSet;

const MAX_WORKSPACE_NAME_LEN: usize = 64;

/// `~/.config/trellis/config.toml`, or a relative path when there is no home
/// directory.
pub fn config_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".config")
        .join("trellis")
        .join("config.toml")
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub workspaces: WorkspaceSettings,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Focus every window as soon as it is managed.
    #[serde(default = "yes")]
    pub focus_new_windows: bool,
}

impl Default for Settings {
    fn default() -> Self { Self { focus_new_windows: yes() } }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WorkspaceSettings {
    /// Names handed out, in order, to the default workspace of each new
    /// monitor. Numbers are used once these run out.
    #[serde(default = "default_workspace_names")]
    pub names: Vec<String>,
}

impl Default for WorkspaceSettings {
    fn default() -> Self { Self { names: default_workspace_names() } }
}

impl WorkspaceSettings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.names.is_empty() {
            issues.push("workspaces.names must not be empty".to_string());
        }
        let mut seen = HashSet::default();
        for name in &self.names {
            if name.trim().is_empty() {
                issues.push("workspaces.names contains a blank name".to_string());
            } else if name.len() > MAX_WORKSPACE_NAME_LEN {
                issues.push(format!(
                    "workspace name {name:?} is longer than {MAX_WORKSPACE_NAME_LEN} bytes"
                ));
            }
            if !seen.insert(name.as_str()) {
                issues.push(format!("workspace name {name:?} appears more than once"));
            }
        }
        issues
    }
}

fn yes() -> bool { true }

fn default_workspace_names() -> Vec<String> {
    ["1", "2", "3", "4"].into_iter().map(String::from).collect()
}

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let buf = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {}", path.display()))?;
        Self::parse(&buf)
    }

    /// Reads `path` if it exists, otherwise returns the defaults.
    pub fn read_or_default(path: &Path) -> anyhow::Result<Config> {
        if path.exists() { Self::read(path) } else { Ok(Config::default()) }
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let toml_string = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml_string.as_bytes())?;
        Ok(())
    }

    /// Validates the entire configuration and returns a list of issues found.
    pub fn validate(&self) -> Vec<String> { self.workspaces.validate() }

    fn parse(buf: &str) -> anyhow::Result<Config> {
        match toml::from_str::<Config>(buf) {
            Ok(config) => Ok(config),
            Err(e) => bail!("{}", e.to_string().trim_end()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_file_matches_defaults() {
        let parsed = Config::parse(include_str!("../../trellis.default.toml")).unwrap();
        assert_eq!(Config::default(), parsed);
        assert!(parsed.validate().is_empty());
    }

    #[test]
    fn empty_file_uses_defaults() {
        assert_eq!(Config::default(), Config::parse("").unwrap());
    }

    #[test]
    fn partial_sections_fill_in_defaults() {
        let config = Config::parse("[settings]\nfocus_new_windows = false\n").unwrap();
        assert!(!config.settings.focus_new_windows);
        assert_eq!(default_workspace_names(), config.workspaces.names);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Config::parse("[settings]\nanimate = true\n").unwrap_err();
        assert!(err.to_string().contains("animate"), "{err}");
    }

    #[test]
    fn validation_reports_empty_and_duplicate_names() {
        let config = Config::parse("[workspaces]\nnames = []\n").unwrap();
        assert_eq!(vec!["workspaces.names must not be empty".to_string()], config.validate());

        let config = Config::parse("[workspaces]\nnames = [\"web\", \" \", \"web\"]\n").unwrap();
        let issues = config.validate();
        assert_eq!(2, issues.len(), "{issues:?}");
        assert!(issues[0].contains("blank"));
        assert!(issues[1].contains("\"web\""));
    }

    #[test]
    fn save_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.workspaces.names = vec!["code".into(), "chat".into()];
        config.save(&path).unwrap();
        assert_eq!(config, Config::read(&path).unwrap());
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(Config::read(&path).is_err());
        assert_eq!(Config::default(), Config::read_or_default(&path).unwrap());
    }
}
