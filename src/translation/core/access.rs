//! 访问口令
//!
//! 单一共享口令；未配置口令时直接放行。

pub struct AccessGate {
    password: Option<String>,
    unlocked: bool,
}

impl AccessGate {
    pub fn new(password: Option<String>) -> Self {
        let password = password.filter(|p| !p.is_empty());
        let unlocked = password.is_none();
        Self { password, unlocked }
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    pub fn requires_password(&self) -> bool {
        self.password.is_some()
    }

    /// 提交口令，返回是否解锁成功
    pub fn submit(&mut self, attempt: &str) -> bool {
        match &self.password {
            None => self.unlocked = true,
            Some(expected) if constant_time_eq(expected.as_bytes(), attempt.as_bytes()) => {
                tracing::info!("访问口令验证通过");
                self.unlocked = true;
            }
            Some(_) => {
                tracing::warn!("访问口令错误");
            }
        }
        self.unlocked
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_password_starts_unlocked() {
        assert!(AccessGate::new(None).is_unlocked());
        assert!(AccessGate::new(Some(String::new())).is_unlocked());
    }

    #[test]
    fn test_password_flow() {
        let mut gate = AccessGate::new(Some("s3cret".to_string()));
        assert!(gate.requires_password());
        assert!(!gate.is_unlocked());
        assert!(!gate.submit("wrong"));
        assert!(!gate.submit("s3cre"));
        assert!(gate.submit("s3cret"));
        assert!(gate.is_unlocked());
    }
}
