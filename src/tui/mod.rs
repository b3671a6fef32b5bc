mod browse;
mod dialog;
pub mod input;
mod layout;
pub mod state;
mod theme;

use crate::config::Config;
use crate::package_manager::BrewRunner;
use crate::report::LogSaver;
use crate::session::Session;
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Frame, Terminal};
use state::App;
use std::io;
use std::sync::Arc;
use tokio::sync::mpsc;

pub async fn run(runner: BrewRunner, config: Config) -> Result<()> {
    // 终端初始化
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, runner, config).await;

    // 恢复终端（无论主循环是否出错）
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    runner: BrewRunner,
    config: Config,
) -> Result<()> {
    let (tx, mut rx) = mpsc::channel(32);

    let log_saver = config
        .save_logs
        .then(|| LogSaver::new(config.log_dir.clone()));
    let session = Session::new(Arc::new(runner), tx, log_saver);
    let mut app = App::new(session, config.start_view.into());

    // 启动时加载两个列表
    app.session.load_all();

    loop {
        let term_size = terminal.size()?;
        if let Some(dialog) = app.active_dialog() {
            let screen = Rect::new(0, 0, term_size.width, term_size.height);
            dialog::clamp_dialog_scroll(&mut app, dialog, screen);
        }

        terminal.draw(|f| ui(f, &app))?;

        // 处理按键
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Windows 终端会额外发送 Release 事件
                if key.kind == KeyEventKind::Press {
                    handle_key(key, &mut app, term_size.height);
                }
            }
        }

        // 处理异步事件
        while let Ok(event) = rx.try_recv() {
            app.session.handle_event(event);
            app.clamp_row();
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_key(key: KeyEvent, app: &mut App, term_height: u16) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
    } else if let Some(dialog) = app.active_dialog() {
        // 对话框打开时按键只交给对话框
        dialog::handle_dialog_key(key, app, dialog);
    } else {
        let page = browse::list_height(term_height).max(1);
        browse::handle_browse_key(key, app, page);
    }
}

fn ui(f: &mut Frame, app: &App) {
    browse::render_browse(f, app);
    if let Some(dialog) = app.active_dialog() {
        dialog::render_dialog(f, app, dialog);
    }
}
