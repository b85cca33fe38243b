//! # 工具模块
//!
//! - 文本长度与空白判断（字符计数、空输入校验）
//! - 日志订阅器初始化

use tracing::Level;

/// 以 Unicode 标量值计数的字符数
///
/// 界面上显示的字符数以及防抖延迟的计算都使用这个口径，
/// 因此 "你好" 计为 2 而不是 UTF-8 字节数 6。
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// 判断文本是否为空或只包含空白字符
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// 初始化全局 tracing 订阅器
///
/// `level` 接受 trace/debug/info/warn/error，无法识别时回退到 info。
/// 重复调用时返回 false（订阅器已存在），不会 panic。
pub fn init_tracing(level: &str, no_color: bool) -> bool {
    let level = level.parse::<Level>().unwrap_or(Level::INFO);

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(!no_color)
        .with_target(false)
        .try_init()
        .is_ok()
}
