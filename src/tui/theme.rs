//! 主题色定义，全局统一使用

use ratatui::style::Color;

/// 包名（Homebrew 琥珀色）
pub const AMBER: Color = Color::Rgb(251, 176, 59);
/// 版本号 / 可用新版本
pub const BLUE: Color = Color::Rgb(91, 206, 250);
/// 选中行背景色
pub const SEL_BG: Color = Color::Rgb(45, 35, 55);
/// 亮白色
pub const BRIGHT_WHITE: Color = Color::Rgb(255, 255, 255);
/// 暗灰色（次要信息）
pub const DIM: Color = Color::Rgb(130, 130, 140);
/// 已选中（已加载详情）的包
pub const PINK: Color = Color::Rgb(245, 169, 184);
