//! PackageManager 相关数据类型定义

use thiserror::Error;

/// 列表中的一个 formula（已安装 / 可更新）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSummary {
    pub name: String,
    pub installed_version: String,
    /// 仅可更新列表中存在
    pub latest_version: Option<String>,
}

impl PackageSummary {
    pub fn installed(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            installed_version: version.into(),
            latest_version: None,
        }
    }

    pub fn updatable(
        name: impl Into<String>,
        version: impl Into<String>,
        latest: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            installed_version: version.into(),
            latest_version: Some(latest.into()),
        }
    }
}

/// `brew info --json` 返回的结构化字段（尚未归一化）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailInfo {
    pub desc: Option<String>,
    pub homepage: Option<String>,
    pub dependencies: Option<Vec<String>>,
    pub conflicts_with: Option<Vec<String>>,
}

/// 包详情：summary + 归一化后的详情字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDetail {
    pub summary: PackageSummary,
    pub description: String,
    pub homepage: String,
    pub dependencies: Vec<String>,
    pub conflicts: Vec<String>,
}

/// 命令执行器错误
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("未找到 Homebrew (brew)")]
    NotFound,
    #[error("无法执行 {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    /// 退出码非 0，output 为清理后的 stdout + stderr
    #[error("{command} 执行失败 (exit {code:?})\n{output}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        output: String,
    },
    #[error("解析 {command} 输出失败: {reason}")]
    Parse { command: String, reason: String },
}
