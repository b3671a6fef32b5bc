//! 主界面：formula 列表、搜索框、详情面板

use super::input::render_input_box;
use super::layout;
use super::state::App;
use super::theme::{AMBER, BLUE, BRIGHT_WHITE, DIM, PINK, SEL_BG};
use crate::package_manager::PackageSummary;
use crate::session::cache::PLACEHOLDER;
use crate::session::mutation::MutationKind;
use crate::session::selection::DetailState;
use crate::session::store::View;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
    Frame,
};

/// 处理主界面按键，返回 true 表示已消费该按键
pub fn handle_browse_key(key: KeyEvent, app: &mut App, page_size: usize) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('x') if app.mutation_for_view() == MutationKind::Remove => {
                app.session.request_confirm(MutationKind::Remove)
            }
            KeyCode::Char('u') if app.mutation_for_view() == MutationKind::Update => {
                app.session.request_confirm(MutationKind::Update)
            }
            KeyCode::Char('o') => {
                app.dialog_scroll = 0;
                app.session.show_info()
            }
            KeyCode::Char('l') => {
                app.session.load_all();
                true
            }
            _ => false,
        };
    }

    match key.code {
        KeyCode::Tab => {
            app.switch_view();
            true
        }
        KeyCode::Up => {
            app.move_up(1);
            true
        }
        KeyCode::Down => {
            app.move_down(1);
            true
        }
        KeyCode::PageUp => {
            app.move_up(page_size);
            true
        }
        KeyCode::PageDown => {
            app.move_down(page_size);
            true
        }
        KeyCode::Enter => {
            if let Some(summary) = app.row_summary() {
                app.session.select(summary);
            }
            true
        }
        KeyCode::Esc => {
            app.search_clear();
            true
        }
        KeyCode::Backspace => {
            app.search_delete_back();
            true
        }
        KeyCode::Delete => {
            app.search_delete_forward();
            true
        }
        KeyCode::Left => {
            app.search_cursor = app.search_cursor.saturating_sub(1);
            true
        }
        KeyCode::Right => {
            app.search_cursor = (app.search_cursor + 1).min(app.search.chars().count());
            true
        }
        KeyCode::Home => {
            app.search_cursor = 0;
            true
        }
        KeyCode::End => {
            app.search_cursor = app.search.chars().count();
            true
        }
        KeyCode::Char(c) => {
            app.search_insert(c);
            true
        }
        _ => false,
    }
}

/// 列表可见行数（总高度减去 header/footer/搜索框/边框）
pub fn list_height(term_height: u16) -> usize {
    term_height.saturating_sub(11) as usize
}

pub fn render_browse(f: &mut Frame, app: &App) {
    let chunks = layout::main_layout(f.area());

    let title = match app.view {
        View::Installed => format!(
            "📦 已安装 ({}) | 🔄 可更新 {}",
            app.session.collection(View::Installed).len(),
            app.session.collection(View::Updatable).len()
        ),
        View::Updatable => format!(
            "🔄 可更新 ({}) | 📦 已安装 {}",
            app.session.collection(View::Updatable).len(),
            app.session.collection(View::Installed).len()
        ),
    };
    layout::render_header(f, &title, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(chunks[1]);

    render_input_box(f, &app.search, app.search_cursor, "🔍 搜索:", app.active_dialog().is_none(), body[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(body[1]);

    render_package_list(f, app, columns[0]);
    render_detail_panel(f, app, columns[1]);

    let footer = match app.view {
        View::Installed => {
            "Enter 选中 | Tab 切换视图 | Ctrl+X 卸载 | Ctrl+O 信息 | Esc 清空搜索 | Ctrl+C 退出"
        }
        View::Updatable => {
            "Enter 选中 | Tab 切换视图 | Ctrl+U 更新 | Ctrl+O 信息 | Esc 清空搜索 | Ctrl+C 退出"
        }
    };
    layout::render_footer(f, footer, app.session.load_error(), chunks[2]);
}

fn render_package_list(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    f.render_widget(block, area);
    let padded = inner.inner(Margin {
        horizontal: 1,
        vertical: 0,
    });

    if app.session.is_loading() {
        let loading = Paragraph::new("正在加载 formula 列表…").style(Style::default().fg(Color::Yellow));
        f.render_widget(loading, padded);
        return;
    }

    let packages = app.visible();
    if packages.is_empty() {
        let hint = Paragraph::new("  没有匹配的结果").style(Style::default().fg(Color::DarkGray));
        f.render_widget(hint, padded);
        return;
    }

    let visible_height = padded.height as usize;
    let total = packages.len();
    let scroll = layout::list_offset(app.row, visible_height);
    let selected_name = app.session.selection().map(|s| s.name().to_string());

    let name_width = packages
        .iter()
        .skip(scroll)
        .take(visible_height)
        .map(|p| p.name.chars().count())
        .max()
        .unwrap_or(20);

    let lines: Vec<Line> = packages
        .iter()
        .enumerate()
        .skip(scroll)
        .take(visible_height)
        .map(|(idx, pkg)| {
            package_line(
                pkg,
                name_width,
                idx == app.row,
                selected_name.as_deref() == Some(pkg.name.as_str()),
            )
        })
        .collect();

    f.render_widget(Paragraph::new(lines), padded);

    // 滚动条
    if total > visible_height {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));
        let mut state = ScrollbarState::new(total).position(scroll);
        f.render_stateful_widget(scrollbar, inner, &mut state);
    }
}

fn package_line(pkg: &PackageSummary, name_width: usize, is_cursor: bool, is_selected: bool) -> Line<'static> {
    let cursor = if is_cursor { "> " } else { "  " };
    let marker = if is_selected { "● " } else { "  " };
    let padding = " ".repeat(name_width.saturating_sub(pkg.name.chars().count()) + 2);
    let latest = pkg
        .latest_version
        .as_ref()
        .map(|v| format!(" → {}", v))
        .unwrap_or_default();

    let base = if is_cursor {
        Style::default().bg(SEL_BG)
    } else {
        Style::default()
    };
    let name_style = if is_cursor {
        base.fg(BRIGHT_WHITE).add_modifier(Modifier::BOLD)
    } else if is_selected {
        base.fg(PINK)
    } else {
        base.fg(AMBER)
    };

    Line::from(vec![
        Span::styled(format!("{}{}", cursor, marker), base.fg(PINK)),
        Span::styled(pkg.name.clone(), name_style),
        Span::styled(padding, base),
        Span::styled(pkg.installed_version.clone(), base.fg(Color::White)),
        Span::styled(latest, base.fg(BLUE)),
    ])
}

/// 详情面板的文本行
pub fn detail_lines(app: &App) -> Vec<(String, String)> {
    let Some(sel) = app.session.selection() else {
        return vec![("".to_string(), "未选择软件包".to_string())];
    };

    let loading = if app.session.loading_details_for() == Some(sel.name()) {
        " (加载中…)"
    } else {
        ""
    };
    let mut lines = vec![("".to_string(), format!("{}{}", sel.name(), loading))];

    let join = |items: &[String]| {
        if items.is_empty() {
            PLACEHOLDER.to_string()
        } else {
            items.join(", ")
        }
    };
    let (description, homepage, dependencies, conflicts) = match &sel.detail {
        DetailState::Present(d) => (
            d.description.clone(),
            d.homepage.clone(),
            join(&d.dependencies),
            join(&d.conflicts),
        ),
        DetailState::Absent | DetailState::Pending => (
            PLACEHOLDER.to_string(),
            PLACEHOLDER.to_string(),
            PLACEHOLDER.to_string(),
            PLACEHOLDER.to_string(),
        ),
    };

    lines.push(("描述".to_string(), description));
    lines.push(("主页".to_string(), homepage));
    lines.push(("版本".to_string(), sel.summary.installed_version.clone()));
    if let Some(latest) = &sel.summary.latest_version {
        lines.push(("最新版本".to_string(), latest.clone()));
    }
    lines.push(("依赖".to_string(), dependencies));
    lines.push(("冲突".to_string(), conflicts));
    lines
}

fn render_detail_panel(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" 详情 ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines: Vec<Line> = detail_lines(app)
        .into_iter()
        .map(|(label, value)| {
            if label.is_empty() {
                Line::from(Span::styled(
                    value,
                    Style::default().fg(AMBER).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(vec![
                    Span::styled(format!("{}: ", label), Style::default().fg(DIM)),
                    Span::styled(value, Style::default().fg(Color::White)),
                ])
            }
        })
        .collect();

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(
        paragraph,
        inner.inner(Margin {
            horizontal: 1,
            vertical: 0,
        }),
    );
}
