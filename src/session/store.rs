//! 已安装 / 可更新两个列表

use crate::package_manager::PackageSummary;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Installed,
    Updatable,
}

impl View {
    pub fn toggle(self) -> Self {
        match self {
            View::Installed => View::Updatable,
            View::Updatable => View::Installed,
        }
    }
}

#[derive(Debug, Default)]
pub struct CollectionStore {
    installed: Vec<PackageSummary>,
    updatable: Vec<PackageSummary>,
    loading: bool,
    error: Option<String>,
}

pub fn installed_from_rows(rows: Vec<(String, String)>) -> Vec<PackageSummary> {
    rows.into_iter()
        .map(|(name, version)| PackageSummary::installed(name, version))
        .collect()
}

pub fn updatable_from_rows(rows: Vec<(String, String, String)>) -> Vec<PackageSummary> {
    rows.into_iter()
        .map(|(name, version, latest)| PackageSummary::updatable(name, version, latest))
        .collect()
}

impl CollectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 开始加载；已在加载中时返回 false
    pub fn begin_load(&mut self) -> bool {
        if self.loading {
            return false;
        }
        self.loading = true;
        self.error = None;
        true
    }

    /// 两个列表一起替换，失败时两者都清空
    pub fn finish_load(
        &mut self,
        result: Result<(Vec<PackageSummary>, Vec<PackageSummary>), String>,
    ) {
        self.loading = false;
        match result {
            Ok((installed, updatable)) => {
                let names: HashSet<&str> = installed.iter().map(|p| p.name.as_str()).collect();
                for orphan in updatable.iter().filter(|p| !names.contains(p.name.as_str())) {
                    log::debug!("可更新的 {} 不在已安装列表中", orphan.name);
                }
                log::info!(
                    "已加载 {} 个已安装、{} 个可更新 formula",
                    installed.len(),
                    updatable.len()
                );
                self.installed = installed;
                self.updatable = updatable;
                self.error = None;
            }
            Err(e) => {
                log::error!("加载 formula 列表失败: {}", e);
                self.installed.clear();
                self.updatable.clear();
                self.error = Some(e);
            }
        }
    }

    pub fn replace_installed(&mut self, installed: Vec<PackageSummary>) {
        self.installed = installed;
    }

    pub fn replace_updatable(&mut self, updatable: Vec<PackageSummary>) {
        self.updatable = updatable;
    }

    pub fn collection(&self, view: View) -> &[PackageSummary] {
        match view {
            View::Installed => &self.installed,
            View::Updatable => &self.updatable,
        }
    }

    /// 名称包含 query（不区分大小写）的条目，保持原顺序
    pub fn filter(&self, view: View, query: &str) -> Vec<&PackageSummary> {
        let keyword = query.to_lowercase();
        self.collection(view)
            .iter()
            .filter(|pkg| keyword.is_empty() || pkg.name.to_lowercase().contains(&keyword))
            .collect()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
