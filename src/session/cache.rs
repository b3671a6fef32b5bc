//! 包详情缓存：同一包名同时最多只有一个请求在途

use crate::package_manager::{DetailInfo, PackageDetail, PackageSummary};
use std::collections::{HashMap, HashSet};

/// 详情字段缺失时的占位符
pub const PLACEHOLDER: &str = "--";

/// 把拉取到的详情字段合并到 summary 上（纯函数）
///
/// 空字符串与缺失同样视为无值。
pub fn merge_detail(summary: &PackageSummary, info: DetailInfo) -> PackageDetail {
    let or_placeholder = |v: Option<String>| {
        v.filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    };

    PackageDetail {
        summary: summary.clone(),
        description: or_placeholder(info.desc),
        homepage: or_placeholder(info.homepage),
        dependencies: info.dependencies.unwrap_or_default(),
        conflicts: info.conflicts_with.unwrap_or_default(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    /// 已缓存，无需请求
    Hit(PackageDetail),
    /// 已有请求在途，等待其结果即可
    Pending,
    /// 调用方需要发起一次请求（已标记为在途）
    Fetch,
}

#[derive(Debug, Default)]
pub struct DetailCache {
    entries: HashMap<String, PackageDetail>,
    pending: HashSet<String>,
}

impl DetailCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, summary: &PackageSummary) -> CacheLookup {
        if let Some(detail) = self.entries.get(&summary.name) {
            return CacheLookup::Hit(detail.clone());
        }
        if self.pending.contains(&summary.name) {
            return CacheLookup::Pending;
        }
        self.pending.insert(summary.name.clone());
        CacheLookup::Fetch
    }

    /// 请求结束；成功则写入缓存并返回合并后的详情，失败不缓存
    pub fn complete<E>(
        &mut self,
        summary: &PackageSummary,
        result: Result<DetailInfo, E>,
    ) -> Option<PackageDetail> {
        self.pending.remove(&summary.name);
        let info = result.ok()?;
        let detail = merge_detail(summary, info);
        self.entries.insert(summary.name.clone(), detail.clone());
        Some(detail)
    }

    #[cfg(test)]
    pub fn peek(&self, name: &str) -> Option<&PackageDetail> {
        self.entries.get(name)
    }

    #[cfg(test)]
    pub fn is_pending(&self, name: &str) -> bool {
        self.pending.contains(name)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wget() -> PackageSummary {
        PackageSummary::installed("wget", "1.21.4")
    }

    #[test]
    fn merge_normalizes_missing_and_empty_fields() {
        let detail = merge_detail(
            &wget(),
            DetailInfo {
                desc: Some(String::new()),
                homepage: None,
                dependencies: None,
                conflicts_with: Some(vec!["curl-openssl".to_string()]),
            },
        );
        assert_eq!(detail.summary, wget());
        assert_eq!(detail.description, "--");
        assert_eq!(detail.homepage, "--");
        assert!(detail.dependencies.is_empty());
        assert_eq!(detail.conflicts, vec!["curl-openssl".to_string()]);
    }

    #[test]
    fn second_get_while_pending_does_not_fetch() {
        let mut cache = DetailCache::new();
        assert_eq!(cache.get(&wget()), CacheLookup::Fetch);
        assert_eq!(cache.get(&wget()), CacheLookup::Pending);
        assert!(cache.is_pending("wget"));
    }

    #[test]
    fn completed_entry_is_a_hit() {
        let mut cache = DetailCache::new();
        cache.get(&wget());
        let stored = cache
            .complete::<()>(&wget(), Ok(DetailInfo::default()))
            .unwrap();
        assert!(!cache.is_pending("wget"));
        assert_eq!(cache.get(&wget()), CacheLookup::Hit(stored));
    }

    #[test]
    fn failed_fetch_is_not_cached() {
        let mut cache = DetailCache::new();
        cache.get(&wget());
        assert!(cache.complete(&wget(), Err("boom")).is_none());
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.get(&wget()), CacheLookup::Fetch);
    }
}
