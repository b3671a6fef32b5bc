//! 弹出对话框：确认卸载/更新、命令日志、brew info

use super::layout;
use super::state::{App, Dialog};
use crate::session::mutation::{MutationKind, MutationPhase, OperationLog};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn handle_dialog_key(key: KeyEvent, app: &mut App, dialog: Dialog) -> bool {
    match dialog {
        Dialog::Mutation(kind) => handle_mutation_key(key, app, kind),
        Dialog::Info => match key.code {
            KeyCode::Enter | KeyCode::Esc => {
                app.dialog_scroll = 0;
                app.session.dismiss_info()
            }
            _ => handle_scroll_key(key, app),
        },
    }
}

fn handle_mutation_key(key: KeyEvent, app: &mut App, kind: MutationKind) -> bool {
    match app.session.workflow(kind).phase() {
        MutationPhase::ConfirmPending { .. } => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.dialog_scroll = 0;
                app.session.confirm(kind)
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.session.cancel(kind),
            _ => false,
        },
        // 命令执行中不可取消，只能滚动
        MutationPhase::InFlight { .. } => handle_scroll_key(key, app),
        MutationPhase::Completed(_) => match key.code {
            KeyCode::Enter | KeyCode::Esc => {
                app.dialog_scroll = 0;
                let dismissed = app.session.dismiss(kind);
                app.clamp_row();
                dismissed
            }
            _ => handle_scroll_key(key, app),
        },
        MutationPhase::Idle => false,
    }
}

fn handle_scroll_key(key: KeyEvent, app: &mut App) -> bool {
    match key.code {
        KeyCode::Up => app.dialog_scroll = app.dialog_scroll.saturating_sub(1),
        KeyCode::Down => app.dialog_scroll += 1,
        KeyCode::PageUp => app.dialog_scroll = app.dialog_scroll.saturating_sub(10),
        KeyCode::PageDown => app.dialog_scroll += 10,
        _ => return false,
    }
    true
}

/// 日志对话框滚动不超过最后一页
pub fn clamp_dialog_scroll(app: &mut App, dialog: Dialog, screen: Rect) {
    let text = match dialog {
        Dialog::Mutation(kind) => app.session.workflow(kind).log_text(),
        Dialog::Info => app.session.info().log_text(),
    };
    let Some(text) = text else {
        return;
    };
    app.dialog_scroll = app.dialog_scroll.min(max_log_scroll(text, screen));
}

/// 按折行后的行数计算最大滚动量，与 render_log 的排版一致
fn max_log_scroll(text: &str, screen: Rect) -> usize {
    let (width, height) = layout::scrollable_inner(log_area(screen));
    let total = layout::wrap_lines(&log_lines(text), width).len();
    total.saturating_sub(height)
}

pub fn render_dialog(f: &mut Frame, app: &App, dialog: Dialog) {
    match dialog {
        Dialog::Mutation(kind) => {
            let wf = app.session.workflow(kind);
            match wf.phase() {
                MutationPhase::ConfirmPending { target } => render_confirm(f, kind, target),
                MutationPhase::InFlight { target, progress } => {
                    let title = format!("{}日志 - {} (执行中…)", kind.label(), target);
                    render_log(f, &title, progress, app.dialog_scroll);
                }
                MutationPhase::Completed(log) => {
                    render_log(f, &log_title(kind.label(), log), &log.text, app.dialog_scroll);
                }
                MutationPhase::Idle => {}
            }
        }
        Dialog::Info => {
            let info = app.session.info();
            if let (Some(target), Some(text)) = (info.target(), info.log_text()) {
                render_log(f, &format!("{} 的信息", target), text, app.dialog_scroll);
            }
        }
    }
}

fn log_title(label: &str, log: &OperationLog) -> String {
    format!(
        "{}日志 - {} [{}]",
        label,
        log.target,
        log.finished_at.format("%H:%M:%S")
    )
}

fn render_confirm(f: &mut Frame, kind: MutationKind, target: &str) {
    let area = confirm_area(f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(" 确认{} ", kind.label()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let text = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw(format!("确定要{} ", kind.label())),
            Span::styled(
                target.to_string(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" 吗？"),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "y / Enter 确认    n / Esc 取消",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_log(f: &mut Frame, title: &str, text: &str, scroll: usize) {
    let area = log_area(f.area());
    f.render_widget(Clear, area);
    layout::render_scrollable_content(f, title, &log_lines(text), scroll, area);
}

fn log_area(screen: Rect) -> Rect {
    layout::centered_rect(80, 70, screen)
}

/// 正文 + 空行 + 提示行
fn log_lines(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
    if lines.is_empty() {
        lines.push("(无输出)".to_string());
    }
    lines.push(String::new());
    lines.push("Enter / Esc 关闭 | ↑↓ 滚动".to_string());
    lines
}

fn confirm_area(area: Rect) -> Rect {
    let width = area.width.min(60);
    let height = area.height.min(7);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_log_rows_count_towards_scroll_limit() {
        let screen = Rect::new(0, 0, 50, 20);
        let (width, height) = layout::scrollable_inner(log_area(screen));
        assert!(width > 0 && height > 3);

        // 短日志放得下，无需滚动
        assert_eq!(max_log_scroll("==> Upgrading wget", screen), 0);

        // 超长单行正好折满一页，空行和提示行需要再滚两行
        let long = "x".repeat(width * height);
        assert_eq!(max_log_scroll(&long, screen), 2);
    }
}
