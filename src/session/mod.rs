//! 包会话管理：列表、详情缓存、当前选中项、卸载/更新流程
//!
//! 所有对 brew 的调用都在后台任务中执行，结果通过 [`SessionEvent`] 送回；
//! 会话状态只在 [`Session::handle_event`] 和各命令方法中修改，始终在 UI 线程上。

pub mod cache;
pub mod mutation;
pub mod selection;
pub mod store;

use crate::package_manager::{DetailInfo, PackageCommandRunner, PackageSummary, RunnerError};
use crate::report::LogSaver;
use cache::{CacheLookup, DetailCache};
use mutation::{InfoPhase, MutationKind, MutationWorkflow, OperationLog};
use selection::{DetailState, Selection, SelectionController};
use std::sync::Arc;
use store::{installed_from_rows, updatable_from_rows, CollectionStore, View};
use tokio::sync::mpsc;

#[derive(Debug)]
pub enum SessionEvent {
    CollectionsLoaded(anyhow::Result<(Vec<PackageSummary>, Vec<PackageSummary>)>),
    DetailLoaded {
        summary: PackageSummary,
        result: anyhow::Result<DetailInfo>,
    },
    MutationFinished {
        kind: MutationKind,
        target: String,
        text: String,
        refreshed: anyhow::Result<Vec<PackageSummary>>,
    },
    InfoLoaded {
        target: String,
        text: String,
    },
}

/// 在阻塞线程池中执行一次 runner 调用
async fn blocking<T, F>(f: F) -> anyhow::Result<T>
where
    F: FnOnce() -> Result<T, RunnerError> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(f).await??)
}

pub struct Session {
    runner: Arc<dyn PackageCommandRunner>,
    tx: mpsc::Sender<SessionEvent>,
    store: CollectionStore,
    cache: DetailCache,
    selection: SelectionController,
    remove: MutationWorkflow,
    update: MutationWorkflow,
    info: InfoPhase,
    log_saver: Option<LogSaver>,
}

impl Session {
    pub fn new(
        runner: Arc<dyn PackageCommandRunner>,
        tx: mpsc::Sender<SessionEvent>,
        log_saver: Option<LogSaver>,
    ) -> Self {
        Self {
            runner,
            tx,
            store: CollectionStore::new(),
            cache: DetailCache::new(),
            selection: SelectionController::new(),
            remove: MutationWorkflow::new(MutationKind::Remove),
            update: MutationWorkflow::new(MutationKind::Update),
            info: InfoPhase::Idle,
            log_saver,
        }
    }

    // ===== 命令 =====

    /// 并发获取两个列表，全部成功才替换
    pub fn load_all(&mut self) {
        if !self.store.begin_load() {
            return;
        }
        self.selection.clear();

        let installed_runner = self.runner.clone();
        let updatable_runner = self.runner.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = tokio::try_join!(
                blocking(move || installed_runner.list_installed()),
                blocking(move || updatable_runner.list_updatable()),
            )
            .map(|(installed, updatable)| {
                (installed_from_rows(installed), updatable_from_rows(updatable))
            });
            let _ = tx.send(SessionEvent::CollectionsLoaded(result)).await;
        });
    }

    pub fn filter(&self, view: View, query: &str) -> Vec<&PackageSummary> {
        self.store.filter(view, query)
    }

    /// 立即选中，详情命中缓存直接使用，否则后台拉取
    pub fn select(&mut self, summary: PackageSummary) {
        match self.cache.get(&summary) {
            CacheLookup::Hit(detail) => {
                self.selection.select(summary, DetailState::Present(detail));
            }
            CacheLookup::Pending => {
                self.selection.select(summary, DetailState::Pending);
            }
            CacheLookup::Fetch => {
                self.selection.select(summary.clone(), DetailState::Pending);

                let runner = self.runner.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let name = summary.name.clone();
                    let result = blocking(move || runner.detail_structured(&name)).await;
                    let _ = tx.send(SessionEvent::DetailLoaded { summary, result }).await;
                });
            }
        }
    }

    pub fn clear(&mut self) {
        self.selection.clear();
    }

    pub fn request_confirm(&mut self, kind: MutationKind) -> bool {
        if self.info != InfoPhase::Idle {
            return false;
        }
        let Some(name) = self.selection.name().map(str::to_string) else {
            return false;
        };
        self.workflow_mut(kind).request_confirm(&name)
    }

    /// 确认后执行命令，随后刷新受影响的列表
    pub fn confirm(&mut self, kind: MutationKind) -> bool {
        let Some(target) = self.workflow_mut(kind).confirm() else {
            return false;
        };
        log::info!("开始{} {}", kind.label(), target);

        let runner = self.runner.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let name = target.clone();
            let op_runner = runner.clone();
            let outcome = match kind {
                MutationKind::Remove => blocking(move || op_runner.remove(&name)).await,
                MutationKind::Update => blocking(move || op_runner.update(&name)).await,
            };
            // 输出原样展示，失败也只是文本
            let text = outcome.unwrap_or_else(|e| e.to_string());

            let refreshed = match kind {
                MutationKind::Remove => blocking(move || runner.list_installed())
                    .await
                    .map(installed_from_rows),
                MutationKind::Update => blocking(move || runner.list_updatable())
                    .await
                    .map(updatable_from_rows),
            };

            let _ = tx
                .send(SessionEvent::MutationFinished {
                    kind,
                    target,
                    text,
                    refreshed,
                })
                .await;
        });
        true
    }

    pub fn cancel(&mut self, kind: MutationKind) -> bool {
        self.workflow_mut(kind).cancel()
    }

    pub fn dismiss(&mut self, kind: MutationKind) -> bool {
        self.workflow_mut(kind).dismiss()
    }

    /// 获取 `brew info` 原始文本
    pub fn show_info(&mut self) -> bool {
        if self.info != InfoPhase::Idle || !self.remove.is_idle() || !self.update.is_idle() {
            return false;
        }
        let Some(target) = self.selection.name().map(str::to_string) else {
            return false;
        };
        self.info = InfoPhase::pending(&target);

        let runner = self.runner.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let name = target.clone();
            let text = blocking(move || runner.detail_text(&name))
                .await
                .unwrap_or_else(|e| e.to_string());
            let _ = tx.send(SessionEvent::InfoLoaded { target, text }).await;
        });
        true
    }

    pub fn dismiss_info(&mut self) -> bool {
        if self.info == InfoPhase::Idle {
            return false;
        }
        self.info = InfoPhase::Idle;
        true
    }

    // ===== 事件 =====

    pub fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::CollectionsLoaded(result) => {
                self.store
                    .finish_load(result.map_err(|e| format!("加载 formula 列表失败: {}", e)));
            }
            SessionEvent::DetailLoaded { summary, result } => {
                if let Err(e) = &result {
                    log::warn!("获取 {} 详情失败: {}", summary.name, e);
                }
                let detail = self.cache.complete(&summary, result);
                self.selection.resolve(&summary.name, detail);
            }
            SessionEvent::MutationFinished {
                kind,
                target,
                text,
                refreshed,
            } => {
                match (kind, refreshed) {
                    (MutationKind::Remove, Ok(list)) => self.store.replace_installed(list),
                    (MutationKind::Update, Ok(list)) => self.store.replace_updatable(list),
                    (_, Err(e)) => log::warn!("{}后刷新列表失败: {}", kind.label(), e),
                }
                if kind == MutationKind::Remove {
                    self.selection.clear();
                }

                let op_log = OperationLog::new(target, text);
                if let Some(saver) = self.log_saver.clone() {
                    let saved = op_log.clone();
                    tokio::task::spawn_blocking(move || {
                        if let Err(e) = saver.save(kind, &saved) {
                            log::error!("保存日志失败: {}", e);
                        }
                    });
                }
                self.workflow_mut(kind).complete(op_log);
            }
            SessionEvent::InfoLoaded { target, text } => {
                if self.info.target() == Some(target.as_str())
                    && matches!(self.info, InfoPhase::Pending { .. })
                {
                    self.info = InfoPhase::Displayed(OperationLog::new(target, text));
                } else {
                    log::debug!("信息对话框已关闭，丢弃 {} 的结果", target);
                }
            }
        }
    }

    // ===== 只读访问 =====

    pub fn collection(&self, view: View) -> &[PackageSummary] {
        self.store.collection(view)
    }

    pub fn is_loading(&self) -> bool {
        self.store.is_loading()
    }

    pub fn load_error(&self) -> Option<&str> {
        self.store.error()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.current()
    }

    pub fn loading_details_for(&self) -> Option<&str> {
        self.selection.loading_for()
    }

    #[cfg(test)]
    pub fn cached_detail(&self, name: &str) -> Option<&crate::package_manager::PackageDetail> {
        self.cache.peek(name)
    }

    pub fn workflow(&self, kind: MutationKind) -> &MutationWorkflow {
        match kind {
            MutationKind::Remove => &self.remove,
            MutationKind::Update => &self.update,
        }
    }

    pub fn info(&self) -> &InfoPhase {
        &self.info
    }

    fn workflow_mut(&mut self, kind: MutationKind) -> &mut MutationWorkflow {
        match kind {
            MutationKind::Remove => &mut self.remove,
            MutationKind::Update => &mut self.update,
        }
    }
}
