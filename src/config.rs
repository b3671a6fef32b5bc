use crate::session::store::View;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StartView {
    #[default]
    Installed,
    Updatable,
}

impl From<StartView> for View {
    fn from(v: StartView) -> Self {
        match v {
            StartView::Installed => View::Installed,
            StartView::Updatable => View::Updatable,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// brew 可执行文件路径，留空则自动检测
    pub brew_command: Option<String>,
    pub no_auto_update: bool,
    pub start_view: StartView,
    /// 是否把卸载 / 更新日志保存到 log_dir
    pub save_logs: bool,
    pub log_dir: PathBuf,
}

fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            brew_command: None,
            no_auto_update: true,
            start_view: StartView::Installed,
            save_logs: false,
            log_dir: home_dir().join(".lian/brew"),
        }
    }
}

impl Config {
    pub fn path() -> PathBuf {
        home_dir().join(".config/lian-brew/config.toml")
    }

    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::path();

        if config_path.exists() {
            let content = fs::read_to_string(&config_path)?;
            let config = Self::parse(&content)?;
            log::info!("已加载配置 {}", config_path.display());
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.brew_command, None);
        assert!(config.no_auto_update);
        assert_eq!(config.start_view, StartView::Installed);
        assert!(!config.save_logs);
        assert!(config.log_dir.ends_with(".lian/brew"));
    }

    #[test]
    fn partial_file_overrides_fields() {
        let config = Config::parse(
            r#"
brew_command = "/opt/homebrew/bin/brew"
start_view = "updatable"
save_logs = true
log_dir = "/tmp/brew-logs"
"#,
        )
        .unwrap();
        assert_eq!(config.brew_command.as_deref(), Some("/opt/homebrew/bin/brew"));
        assert!(config.no_auto_update);
        assert_eq!(View::from(config.start_view), View::Updatable);
        assert!(config.save_logs);
        assert_eq!(config.log_dir, PathBuf::from("/tmp/brew-logs"));
    }

    #[test]
    fn unknown_view_is_an_error() {
        assert!(Config::parse("start_view = \"casks\"").is_err());
    }
}
