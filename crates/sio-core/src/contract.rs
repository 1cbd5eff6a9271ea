use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// 取消原语，供宿主从其他线程打断读取循环。
///
/// # 设计背景（Why）
/// - 读取循环本身没有退出条件；需要优雅停机的宿主通过该令牌发出信号，
///   循环在每次进入等待之前检查一次。
///
/// # 逻辑解析（How）
/// - 内部使用 [`AtomicBool`] 表达取消状态，并通过 [`Arc`] 支持多方共享；
/// - `cancel` 在首次成功设置取消位时返回 `true`，重复调用返回 `false`。
///
/// # 契约说明（What）
/// - 构造时处于“未取消”状态；
/// - 一旦 `cancel` 成功，所有克隆出的令牌立即可见。
///
/// # 设计取舍与风险（Trade-offs）
/// - 不会唤醒正在 `poll` 中阻塞的线程；配合 [`SessionConfig::wait_timeout_ms`](crate::SessionConfig)
///   才能保证信号被及时观察到。
#[derive(Clone, Debug, Default)]
pub struct Cancellation {
    flag: Arc<AtomicBool>,
}

impl Cancellation {
    /// 创建处于“未取消”状态的取消令牌。
    pub fn new() -> Self {
        Self::default()
    }

    /// 查询当前是否已被标记取消。
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// 将当前令牌标记为取消。
    ///
    /// 返回值为 `true` 表示本次调用首次触发取消；返回 `false` 表示之前已被取消。
    pub fn cancel(&self) -> bool {
        self.flag
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_is_shared_and_reported_once() {
        let token = Cancellation::new();
        let observer = token.clone();
        assert!(!observer.is_cancelled());
        assert!(token.cancel());
        assert!(!token.cancel());
        assert!(observer.is_cancelled());
    }
}
