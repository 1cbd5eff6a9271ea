//! 接收缓冲的错误域。

use thiserror::Error;

/// 接收缓冲操作失败的原因。
///
/// # 教案式说明
/// - **意图 (Why)**：把“调用方用错”与“内存/内核行为异常”区分开，
///   上层据此决定是把错误交还解析器，还是终止整个会话。
/// - **契约 (What)**：所有变体都携带触发时的数值现场，返回错误时缓冲内容保持不变。
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum BufferError {
    /// 容量过小，连一个可写字节都留不出来。
    #[error("receive buffer capacity {capacity} is below the minimum of {minimum} bytes")]
    InvalidCapacity { capacity: usize, minimum: usize },

    /// 请求推进的字节数超过窗口内的有效数据。
    #[error("cannot forward {requested} bytes: only {available} bytes are buffered")]
    OutOfRange { requested: usize, available: usize },

    /// 读取返回的字节数大于提供的空闲空间。
    ///
    /// 内核不会这样做；出现即说明读取实现或内存状态已损坏。
    #[error("read returned {returned} bytes but only {offered} bytes were offered")]
    Overrun { returned: usize, offered: usize },

    /// 窗口越过了存储末尾的保留字节。
    #[error(
        "receive window broken: offset {offset} + length {length} exceeds capacity {capacity} minus the reserved byte"
    )]
    InvariantViolated {
        offset: usize,
        length: usize,
        capacity: usize,
    },
}

impl BufferError {
    /// 是否属于不可恢复的损坏类错误。
    ///
    /// `Overrun` 与 `InvariantViolated` 意味着缓冲状态已不可信，宿主不应尝试修复；
    /// 其余变体是调用方参数问题，修正参数即可继续。
    pub fn is_unrecoverable(&self) -> bool {
        matches!(
            self,
            BufferError::Overrun { .. } | BufferError::InvariantViolated { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corruption_variants_are_unrecoverable() {
        assert!(
            BufferError::Overrun {
                returned: 8,
                offered: 4
            }
            .is_unrecoverable()
        );
        assert!(
            BufferError::InvariantViolated {
                offset: 9,
                length: 1,
                capacity: 10
            }
            .is_unrecoverable()
        );
        assert!(
            !BufferError::OutOfRange {
                requested: 3,
                available: 2
            }
            .is_unrecoverable()
        );
    }

    #[test]
    fn display_names_the_numbers() {
        let err = BufferError::OutOfRange {
            requested: 5,
            available: 2,
        };
        assert_eq!(
            err.to_string(),
            "cannot forward 5 bytes: only 2 bytes are buffered"
        );
    }
}
