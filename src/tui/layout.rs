use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};
use unicode_width::UnicodeWidthChar;

/// 标准三段式布局：Header(3) + Content(弹性) + Footer(3)
pub fn main_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area)
        .to_vec()
}

/// 居中的弹出区域，按百分比
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// 渲染通用 header
pub fn render_header(f: &mut Frame, title: &str, area: Rect) {
    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
    f.render_widget(header, area);
}

/// 渲染通用 footer；有错误时以红色显示错误横幅
pub fn render_footer(f: &mut Frame, text: &str, error: Option<&str>, area: Rect) {
    let (content, color) = match error {
        Some(msg) => (format!(" ❌ {} | Ctrl+L 重新加载", msg), Color::Red),
        None => (format!(" {}", text), Color::Green),
    };
    let footer = Paragraph::new(content)
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);
    f.render_widget(footer, area);
}

/// 渲染带滚动条的内容区域
pub fn render_scrollable_content(
    f: &mut Frame,
    title: &str,
    lines: &[String],
    scroll_offset: usize,
    area: Rect,
) {
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let inner = block.inner(area);
    f.render_widget(block, area);

    // 内部水平边距
    let padded = inner.inner(Margin {
        horizontal: 1,
        vertical: 0,
    });

    // 先按宽度折行，滚动按折行后的行计数
    let rows = wrap_lines(lines, padded.width as usize);
    let total_lines = rows.len();
    let visible_height = padded.height as usize;
    let actual_scroll = clamp_scroll(scroll_offset, total_lines, visible_height);

    let visible_content: Vec<Line> = rows
        .into_iter()
        .skip(actual_scroll)
        .take(visible_height)
        .map(Line::from)
        .collect();

    f.render_widget(Paragraph::new(visible_content), padded);

    // 滚动条
    if total_lines > visible_height {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));

        let mut scrollbar_state = ScrollbarState::new(total_lines).position(actual_scroll);

        f.render_stateful_widget(
            scrollbar,
            area.inner(Margin {
                horizontal: 0,
                vertical: 1,
            }),
            &mut scrollbar_state,
        );
    }
}

/// 滚动区域正文的 (宽, 高)：去掉边框和左右各一列边距
pub fn scrollable_inner(area: Rect) -> (usize, usize) {
    (
        area.width.saturating_sub(4) as usize,
        area.height.saturating_sub(2) as usize,
    )
}

/// 按显示宽度硬折行，保留原有空白，宽字符不拆开
pub fn wrap_lines(lines: &[String], width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::with_capacity(lines.len());
    for line in lines {
        let mut current = String::new();
        let mut current_width = 0;
        for c in line.chars() {
            let w = c.width().unwrap_or(0);
            if current_width + w > width && current_width > 0 {
                rows.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(c);
            current_width += w;
        }
        rows.push(current);
    }
    rows
}

pub fn clamp_scroll(scroll: usize, total_lines: usize, visible_height: usize) -> usize {
    scroll.min(total_lines.saturating_sub(visible_height))
}

/// 列表窗口起始行，保证光标行可见
pub fn list_offset(selected: usize, visible_height: usize) -> usize {
    if visible_height == 0 || selected < visible_height {
        0
    } else {
        selected + 1 - visible_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_offset_keeps_cursor_visible() {
        assert_eq!(list_offset(0, 10), 0);
        assert_eq!(list_offset(9, 10), 0);
        assert_eq!(list_offset(10, 10), 1);
        assert_eq!(list_offset(25, 10), 16);
        assert_eq!(list_offset(3, 0), 0);
    }

    #[test]
    fn scroll_is_clamped_to_last_page() {
        assert_eq!(clamp_scroll(50, 30, 10), 20);
        assert_eq!(clamp_scroll(5, 3, 10), 0);
    }

    #[test]
    fn long_lines_wrap_by_display_width() {
        let lines = vec!["abcdefg".to_string(), String::new(), "你好世界".to_string()];
        assert_eq!(
            wrap_lines(&lines, 3),
            vec!["abc", "def", "g", "", "你", "好", "世", "界"]
        );
        assert_eq!(wrap_lines(&lines[2..], 5), vec!["你好", "世界"]);
    }
}
