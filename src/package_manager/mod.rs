//! 包管理器模块：对 Homebrew 命令行的封装

pub mod parser;
pub mod types;

pub use types::{DetailInfo, PackageDetail, PackageSummary, RunnerError};

use parser::{clean_terminal_output, parse_info_json, parse_outdated_output, parse_versions_output};
use std::process::Command;

/// 包管理命令执行器
///
/// 所有方法都是阻塞调用，由会话层放到 `spawn_blocking` 中执行。
pub trait PackageCommandRunner: Send + Sync {
    /// (name, installed_version)
    fn list_installed(&self) -> Result<Vec<(String, String)>, RunnerError>;
    /// (name, installed_version, latest_version)
    fn list_updatable(&self) -> Result<Vec<(String, String, String)>, RunnerError>;
    fn detail_structured(&self, name: &str) -> Result<DetailInfo, RunnerError>;
    fn detail_text(&self, name: &str) -> Result<String, RunnerError>;
    fn remove(&self, name: &str) -> Result<String, RunnerError>;
    fn update(&self, name: &str) -> Result<String, RunnerError>;
}

/// Homebrew 的默认安装前缀（macOS arm / macOS intel / Linuxbrew）
const BREW_CANDIDATES: &[&str] = &[
    "/opt/homebrew/bin/brew",
    "/usr/local/bin/brew",
    "/home/linuxbrew/.linuxbrew/bin/brew",
];

#[derive(Debug, Clone)]
pub struct BrewRunner {
    pub command: String,
    /// 设置 HOMEBREW_NO_AUTO_UPDATE，避免每次 upgrade 前先跑 `brew update`
    pub no_auto_update: bool,
}

impl BrewRunner {
    pub fn detect(no_auto_update: bool) -> Result<Self, RunnerError> {
        let in_path = Command::new("which")
            .arg("brew")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false);
        if in_path {
            return Ok(Self::with_command("brew", no_auto_update));
        }

        BREW_CANDIDATES
            .iter()
            .find(|path| std::path::Path::new(path).exists())
            .map(|path| Self::with_command(*path, no_auto_update))
            .ok_or(RunnerError::NotFound)
    }

    pub fn with_command(command: impl Into<String>, no_auto_update: bool) -> Self {
        Self {
            command: command.into(),
            no_auto_update,
        }
    }

    fn build(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.command);
        cmd.args(args).env("HOMEBREW_NO_COLOR", "1");
        if self.no_auto_update {
            cmd.env("HOMEBREW_NO_AUTO_UPDATE", "1");
        }
        cmd
    }

    /// 执行 brew 子命令，返回清理后的 stdout；失败时 output 包含 stdout + stderr
    fn run(&self, args: &[&str]) -> Result<String, RunnerError> {
        let label = format!("brew {}", args.join(" "));
        log::debug!("执行 {}", label);

        let output = self.build(args).output().map_err(|source| RunnerError::Spawn {
            command: label.clone(),
            source,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        if output.status.success() {
            return Ok(stdout);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        log::warn!("{} 退出码 {:?}", label, output.status.code());
        Err(RunnerError::CommandFailed {
            command: label,
            code: output.status.code(),
            output: clean_terminal_output(&format!("{}\n{}", stdout, stderr)),
        })
    }

    /// 执行会修改系统的命令，stdout 与 stderr 合并作为日志文本
    fn run_combined(&self, args: &[&str]) -> Result<String, RunnerError> {
        let label = format!("brew {}", args.join(" "));
        log::info!("执行 {}", label);

        let output = self.build(args).output().map_err(|source| RunnerError::Spawn {
            command: label.clone(),
            source,
        })?;

        let combined = clean_terminal_output(&format!(
            "{}\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        ));
        if output.status.success() {
            Ok(combined.trim().to_string())
        } else {
            Err(RunnerError::CommandFailed {
                command: label,
                code: output.status.code(),
                output: combined,
            })
        }
    }
}

impl PackageCommandRunner for BrewRunner {
    fn list_installed(&self) -> Result<Vec<(String, String)>, RunnerError> {
        let out = self.run(&["list", "--formula", "--versions"])?;
        Ok(parse_versions_output(&out))
    }

    fn list_updatable(&self) -> Result<Vec<(String, String, String)>, RunnerError> {
        let out = self.run(&["outdated", "--formula", "--verbose"])?;
        Ok(parse_outdated_output(&out))
    }

    fn detail_structured(&self, name: &str) -> Result<DetailInfo, RunnerError> {
        let out = self.run(&["info", "--json=v1", name])?;
        parse_info_json(&out).map_err(|reason| RunnerError::Parse {
            command: format!("brew info --json=v1 {}", name),
            reason,
        })
    }

    fn detail_text(&self, name: &str) -> Result<String, RunnerError> {
        let out = self.run(&["info", name])?;
        Ok(clean_terminal_output(&out))
    }

    fn remove(&self, name: &str) -> Result<String, RunnerError> {
        self.run_combined(&["uninstall", name])
    }

    fn update(&self, name: &str) -> Result<String, RunnerError> {
        self.run_combined(&["upgrade", name])
    }
}
