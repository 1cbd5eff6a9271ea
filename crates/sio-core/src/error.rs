//! # error 模块说明
//!
//! ## 角色定位（Why）
//! - 把原先“打印后直接退出进程”的致命路径收敛为可返回的错误值，
//!   宿主可以在监督边界选择终止会话而不是终止进程；
//! - 仍保持“不自动修复”的原则：会话在返回不可恢复错误后不应继续使用。
//!
//! ## 设计要求（What）
//! - 所有错误类型实现 `thiserror::Error`；
//! - `Display` 必须点名失败的操作，以便命令行外壳直接打印。

use std::io;

use sio_buffer::BufferError;
use thiserror::Error;

use crate::consumer::ConsumerError;

/// 读取会话的错误域。
#[derive(Debug, Error)]
pub enum SessionError {
    /// 缓冲层报告的错误，包括读取溢出与窗口损坏。
    #[error("receive buffer: {0}")]
    Buffer(#[from] BufferError),

    /// 除“暂无数据”之外的操作系统错误，不重试。
    #[error("{operation}() failed: {source}")]
    Io {
        operation: &'static str,
        #[source]
        source: io::Error,
    },

    /// 压缩之后缓冲仍被未消费数据占满，读取再也无法推进。
    ///
    /// 通常意味着解析器在等待一个比容量还大的帧。
    #[error("receive buffer of {capacity} bytes is full of unconsumed data")]
    Stalled { capacity: usize },

    /// 解析回调报告了致命状况。
    #[error("consumer callback failed: {0}")]
    Consumer(#[source] ConsumerError),

    #[error("wait timeout must be at least 1 ms; omit it to wait indefinitely")]
    InvalidWaitTimeout,
}

impl SessionError {
    pub(crate) fn io(operation: &'static str, source: io::Error) -> Self {
        SessionError::Io { operation, source }
    }

    /// 是否为不可恢复错误。
    ///
    /// 只有调用方参数类的缓冲错误（例如越界推进、容量过小）可以修正后重试；
    /// 其余情况对应原先直接终止进程的路径。
    pub fn is_unrecoverable(&self) -> bool {
        match self {
            SessionError::Buffer(err) => err.is_unrecoverable(),
            SessionError::Io { .. } | SessionError::Stalled { .. } | SessionError::Consumer(_) => {
                true
            }
            SessionError::InvalidWaitTimeout => false,
        }
    }
}
