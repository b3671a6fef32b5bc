mod config;
mod package_manager;
mod report;
mod session;
mod tui;

use anyhow::Result;
use package_manager::BrewRunner;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    // 加载配置
    let config = config::Config::load_or_default()?;

    // brew 路径优先级：配置文件 > 自动检测
    let runner = match &config.brew_command {
        Some(cmd) => BrewRunner::with_command(cmd.clone(), config.no_auto_update),
        None => BrewRunner::detect(config.no_auto_update).unwrap_or_else(|e| {
            eprintln!("错误: {}", e);
            eprintln!("请安装 Homebrew，或在 {} 中设置 brew_command", config::Config::path().display());
            std::process::exit(1);
        }),
    };
    log::info!("使用 {}", runner.command);

    tui::run(runner, config).await?;

    Ok(())
}
