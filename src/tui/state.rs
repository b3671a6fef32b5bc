use super::input::{str_delete_back, str_delete_forward, str_insert_char};
use crate::package_manager::PackageSummary;
use crate::session::mutation::MutationKind;
use crate::session::store::View;
use crate::session::Session;

/// 当前弹出的对话框（同一时刻最多一个）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialog {
    Mutation(MutationKind),
    Info,
}

/// 界面状态：视图、搜索框、光标行、对话框滚动；会话数据只读使用
pub struct App {
    pub session: Session,
    pub view: View,
    pub search: String,
    pub search_cursor: usize,
    /// 过滤后列表中的光标行
    pub row: usize,
    pub dialog_scroll: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(session: Session, view: View) -> Self {
        Self {
            session,
            view,
            search: String::new(),
            search_cursor: 0,
            row: 0,
            dialog_scroll: 0,
            should_quit: false,
        }
    }

    pub fn visible(&self) -> Vec<&PackageSummary> {
        self.session.filter(self.view, &self.search)
    }

    pub fn row_summary(&self) -> Option<PackageSummary> {
        self.visible().get(self.row).map(|p| (*p).clone())
    }

    /// 切换视图总是清空选中项
    pub fn switch_view(&mut self) {
        self.view = self.view.toggle();
        self.row = 0;
        self.session.clear();
    }

    pub fn move_up(&mut self, n: usize) {
        self.row = self.row.saturating_sub(n);
    }

    pub fn move_down(&mut self, n: usize) {
        let max = self.visible().len().saturating_sub(1);
        self.row = (self.row + n).min(max);
    }

    /// 列表刷新后光标可能越界
    pub fn clamp_row(&mut self) {
        let len = self.visible().len();
        if self.row >= len {
            self.row = len.saturating_sub(1);
        }
    }

    pub fn search_insert(&mut self, c: char) {
        str_insert_char(&mut self.search, &mut self.search_cursor, c);
        self.row = 0;
    }

    pub fn search_delete_back(&mut self) {
        str_delete_back(&mut self.search, &mut self.search_cursor);
        self.row = 0;
    }

    pub fn search_delete_forward(&mut self) {
        str_delete_forward(&mut self.search, &mut self.search_cursor);
        self.row = 0;
    }

    pub fn search_clear(&mut self) {
        self.search.clear();
        self.search_cursor = 0;
        self.row = 0;
    }

    /// 卸载在已安装视图、更新在可更新视图中可用
    pub fn mutation_for_view(&self) -> MutationKind {
        match self.view {
            View::Installed => MutationKind::Remove,
            View::Updatable => MutationKind::Update,
        }
    }

    pub fn active_dialog(&self) -> Option<Dialog> {
        [MutationKind::Remove, MutationKind::Update]
            .into_iter()
            .find(|kind| !self.session.workflow(*kind).is_idle())
            .map(Dialog::Mutation)
            .or_else(|| (self.session.info().target().is_some()).then_some(Dialog::Info))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package_manager::{DetailInfo, PackageCommandRunner, RunnerError};
    use crate::session::SessionEvent;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    /// 这些测试只驱动界面状态，不会真正调用 brew
    struct NoBrew;

    impl PackageCommandRunner for NoBrew {
        fn list_installed(&self) -> Result<Vec<(String, String)>, RunnerError> {
            Err(RunnerError::NotFound)
        }
        fn list_updatable(&self) -> Result<Vec<(String, String, String)>, RunnerError> {
            Err(RunnerError::NotFound)
        }
        fn detail_structured(&self, _: &str) -> Result<DetailInfo, RunnerError> {
            Err(RunnerError::NotFound)
        }
        fn detail_text(&self, _: &str) -> Result<String, RunnerError> {
            Err(RunnerError::NotFound)
        }
        fn remove(&self, _: &str) -> Result<String, RunnerError> {
            Err(RunnerError::NotFound)
        }
        fn update(&self, _: &str) -> Result<String, RunnerError> {
            Err(RunnerError::NotFound)
        }
    }

    fn app_with(installed: &[&str], updatable: &[&str]) -> App {
        let (tx, _rx) = mpsc::channel(4);
        let mut session = Session::new(Arc::new(NoBrew), tx, None);
        session.handle_event(SessionEvent::CollectionsLoaded(Ok((
            installed
                .iter()
                .map(|n| PackageSummary::installed(*n, "1.0"))
                .collect(),
            updatable
                .iter()
                .map(|n| PackageSummary::updatable(*n, "1.0", "1.1"))
                .collect(),
        ))));
        App::new(session, View::Installed)
    }

    #[test]
    fn typing_filters_and_resets_cursor() {
        let mut app = app_with(&["git", "wget", "curl"], &[]);
        app.move_down(2);
        assert_eq!(app.row_summary().unwrap().name, "curl");

        app.search_insert('G');
        let names: Vec<String> = app.visible().iter().map(|p| p.name.clone()).collect();
        assert_eq!(names, vec!["git", "wget"]);
        assert_eq!(app.row, 0);

        app.move_down(10);
        assert_eq!(app.row_summary().unwrap().name, "wget");

        app.search_clear();
        assert_eq!(app.visible().len(), 3);
    }

    #[test]
    fn switching_view_changes_available_mutation() {
        let mut app = app_with(&["git", "wget"], &["wget"]);
        assert_eq!(app.mutation_for_view(), MutationKind::Remove);
        app.move_down(1);

        app.switch_view();
        assert_eq!(app.view, View::Updatable);
        assert_eq!(app.row, 0);
        assert_eq!(app.mutation_for_view(), MutationKind::Update);
        assert!(app.session.selection().is_none());
        assert_eq!(app.active_dialog(), None);
    }

    #[test]
    fn cursor_is_clamped_after_list_shrinks() {
        let mut app = app_with(&["a", "b", "c"], &[]);
        app.move_down(2);
        app.session.handle_event(SessionEvent::CollectionsLoaded(Ok((
            vec![PackageSummary::installed("a", "1.0")],
            Vec::new(),
        ))));
        app.clamp_row();
        assert_eq!(app.row, 0);
    }
}
