//! 会话配置。
//!
//! 可直接从 TOML 的 `[session]` 表反序列化，缺省字段取 [`SessionConfig::default`]。

use std::time::Duration;

use serde::{Deserialize, Serialize};
use sio_buffer::{BufferError, MIN_CAPACITY};

use crate::error::SessionError;

/// 默认接收缓冲容量（字节）。
pub const DEFAULT_CAPACITY: usize = 512;

/// 读到流结束（零字节读取）时的处理策略。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndOfStreamPolicy {
    /// 结束读取循环，交由宿主决定后续动作。
    #[default]
    Stop,
    /// 视同“本次无数据”，继续等待。
    Continue,
}

/// 读取会话的可调参数。
///
/// # 契约说明（What）
/// - `capacity`：接收缓冲总容量，至少为 2（一个可写字节加保留字节）；
/// - `flush_every_read`：每次回调返回后无条件清空缓冲，仅当每次读取恰好是一个完整单元时才可开启；
/// - `blocking`：设备是否以阻塞模式打开，仅作信息用途；
/// - `end_of_stream`：零字节读取的处理策略；
/// - `wait_timeout_ms`：单次就绪等待的上限，`None` 表示无限等待；`0` 会让空闲设备上的循环空转，
///   因此被拒绝。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub capacity: usize,
    pub flush_every_read: bool,
    pub blocking: bool,
    pub end_of_stream: EndOfStreamPolicy,
    pub wait_timeout_ms: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            flush_every_read: false,
            blocking: false,
            end_of_stream: EndOfStreamPolicy::Stop,
            wait_timeout_ms: None,
        }
    }
}

impl SessionConfig {
    pub fn wait_timeout(&self) -> Option<Duration> {
        self.wait_timeout_ms.map(Duration::from_millis)
    }

    /// 校验参数组合：容量下限与非零等待超时。
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.capacity < MIN_CAPACITY {
            return Err(BufferError::InvalidCapacity {
                capacity: self.capacity,
                minimum: MIN_CAPACITY,
            }
            .into());
        }
        if self.wait_timeout_ms == Some(0) {
            return Err(SessionError::InvalidWaitTimeout);
        }
        Ok(())
    }
}
