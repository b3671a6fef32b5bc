//! 当前选中的包及其详情加载状态

use crate::package_manager::{PackageDetail, PackageSummary};

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Absent,
    Pending,
    Present(PackageDetail),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub summary: PackageSummary,
    pub detail: DetailState,
}

impl Selection {
    pub fn name(&self) -> &str {
        &self.summary.name
    }
}

#[derive(Debug, Default)]
pub struct SelectionController {
    current: Option<Selection>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// 立即切换选中项，详情状态由调用方根据缓存结果给出
    pub fn select(&mut self, summary: PackageSummary, detail: DetailState) {
        self.current = Some(Selection { summary, detail });
    }

    /// 详情请求结束；名字已不是当前选中项时丢弃结果
    ///
    /// `None` 表示请求失败，详情回到 Absent，下次 select 会重新请求。
    pub fn resolve(&mut self, name: &str, detail: Option<PackageDetail>) -> bool {
        let Some(sel) = self.current.as_mut() else {
            return false;
        };
        if sel.summary.name != name || sel.detail != DetailState::Pending {
            log::debug!("丢弃过期的详情结果: {}", name);
            return false;
        }
        sel.detail = match detail {
            Some(d) => DetailState::Present(d),
            None => DetailState::Absent,
        };
        true
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Selection> {
        self.current.as_ref()
    }

    pub fn name(&self) -> Option<&str> {
        self.current.as_ref().map(Selection::name)
    }

    /// 正在加载详情的包名
    pub fn loading_for(&self) -> Option<&str> {
        self.current
            .as_ref()
            .filter(|sel| sel.detail == DetailState::Pending)
            .map(Selection::name)
    }
}
