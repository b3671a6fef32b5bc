//! 卸载 / 更新的确认流程，以及只读的信息查看

use chrono::{DateTime, Local};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Remove,
    Update,
}

impl MutationKind {
    pub fn label(self) -> &'static str {
        match self {
            MutationKind::Remove => "卸载",
            MutationKind::Update => "更新",
        }
    }

    /// 用于保存日志的文件名片段
    pub fn slug(self) -> &'static str {
        match self {
            MutationKind::Remove => "uninstall",
            MutationKind::Update => "upgrade",
        }
    }
}

/// 命令返回的原始文本，不区分成功失败
#[derive(Debug, Clone, PartialEq)]
pub struct OperationLog {
    pub target: String,
    pub text: String,
    pub finished_at: DateTime<Local>,
}

impl OperationLog {
    pub fn new(target: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            text: text.into(),
            finished_at: Local::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MutationPhase {
    Idle,
    ConfirmPending { target: String },
    InFlight { target: String, progress: String },
    Completed(OperationLog),
}

#[derive(Debug)]
pub struct MutationWorkflow {
    kind: MutationKind,
    phase: MutationPhase,
}

impl MutationWorkflow {
    pub fn new(kind: MutationKind) -> Self {
        Self {
            kind,
            phase: MutationPhase::Idle,
        }
    }

    pub fn phase(&self) -> &MutationPhase {
        &self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == MutationPhase::Idle
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self.phase, MutationPhase::InFlight { .. })
    }

    /// Idle → ConfirmPending
    pub fn request_confirm(&mut self, target: &str) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.phase = MutationPhase::ConfirmPending {
            target: target.to_string(),
        };
        true
    }

    /// ConfirmPending → InFlight，返回需要执行命令的包名
    pub fn confirm(&mut self) -> Option<String> {
        let MutationPhase::ConfirmPending { target } = &self.phase else {
            return None;
        };
        let target = target.clone();
        self.phase = MutationPhase::InFlight {
            progress: format!("正在{} \"{}\"...\n请稍候...", self.kind.label(), target),
            target: target.clone(),
        };
        Some(target)
    }

    /// ConfirmPending → Idle，其他状态下无效
    pub fn cancel(&mut self) -> bool {
        if matches!(self.phase, MutationPhase::ConfirmPending { .. }) {
            self.phase = MutationPhase::Idle;
            return true;
        }
        false
    }

    /// InFlight → Completed
    pub fn complete(&mut self, log: OperationLog) -> bool {
        if !self.is_in_flight() {
            return false;
        }
        self.phase = MutationPhase::Completed(log);
        true
    }

    /// Completed → Idle
    pub fn dismiss(&mut self) -> bool {
        if matches!(self.phase, MutationPhase::Completed(_)) {
            self.phase = MutationPhase::Idle;
            return true;
        }
        false
    }

    /// 要显示的日志文本：在途时为提示语，完成后为命令输出
    pub fn log_text(&self) -> Option<&str> {
        match &self.phase {
            MutationPhase::InFlight { progress, .. } => Some(progress),
            MutationPhase::Completed(log) => Some(&log.text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum InfoPhase {
    #[default]
    Idle,
    Pending { target: String, progress: String },
    Displayed(OperationLog),
}

impl InfoPhase {
    pub fn pending(target: &str) -> Self {
        InfoPhase::Pending {
            target: target.to_string(),
            progress: format!("正在获取 \"{}\" 的信息...\n请稍候...", target),
        }
    }

    pub fn target(&self) -> Option<&str> {
        match self {
            InfoPhase::Idle => None,
            InfoPhase::Pending { target, .. } => Some(target),
            InfoPhase::Displayed(log) => Some(&log.target),
        }
    }

    pub fn log_text(&self) -> Option<&str> {
        match self {
            InfoPhase::Idle => None,
            InfoPhase::Pending { progress, .. } => Some(progress),
            InfoPhase::Displayed(log) => Some(&log.text),
        }
    }
}
