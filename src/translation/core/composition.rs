//! 输入法组合守卫
//!
//! 输入法（IME）组合期间的文本是临时的，不能触发翻译；
//! 组合结束时提交的文本才是权威输入。

/// 组合状态
#[derive(Debug, Default, Clone)]
pub struct CompositionGuard {
    composing: bool,
    preedit: String,
}

impl CompositionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// 组合是否进行中
    pub fn is_active(&self) -> bool {
        self.composing
    }

    /// 当前的预编辑缓冲区（仅用于展示）
    pub fn preedit(&self) -> &str {
        &self.preedit
    }

    /// 组合开始
    ///
    /// 已经挂起的定时器保持不变，只抑制新的调度。
    pub fn start(&mut self) {
        if self.composing {
            tracing::debug!("重复的组合开始事件");
        }
        self.composing = true;
        self.preedit.clear();
    }

    /// 组合更新，没有调度副作用
    pub fn update(&mut self, partial: &str) {
        if !self.composing {
            // 部分平台会在 start 之前发送 update
            self.composing = true;
        }
        self.preedit.clear();
        self.preedit.push_str(partial);
    }

    /// 组合结束，返回权威文本
    pub fn end(&mut self, final_text: String) -> String {
        self.composing = false;
        self.preedit.clear();
        final_text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut guard = CompositionGuard::new();
        assert!(!guard.is_active());

        guard.start();
        assert!(guard.is_active());

        guard.update("bu");
        assert_eq!(guard.preedit(), "bu");
        guard.update("部");
        assert_eq!(guard.preedit(), "部");

        let text = guard.end("部分".to_string());
        assert_eq!(text, "部分");
        assert!(!guard.is_active());
        assert_eq!(guard.preedit(), "");
    }

    #[test]
    fn test_empty_pair_does_not_panic() {
        let mut guard = CompositionGuard::new();
        guard.start();
        assert_eq!(guard.end(String::new()), "");
        assert!(!guard.is_active());
    }

    #[test]
    fn test_update_without_start_activates() {
        let mut guard = CompositionGuard::new();
        guard.update("k");
        assert!(guard.is_active());
    }
}
