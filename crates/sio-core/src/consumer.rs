use sio_buffer::ReceiveBuffer;

/// 解析回调返回的致命错误。
pub type ConsumerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// 解析回调契约，每次成功读取（长度非零）之后同步调用一次。
///
/// # 教案式说明
/// - **意图 (Why)**：把分帧逻辑留给调用方，核心只负责把字节送到窗口里。
/// - **契约 (What)**：
///   - 可读取 [`ReceiveBuffer::window`] 的任意子集，并通过
///     [`ReceiveBuffer::forward`]（或 `bytes::Buf` 的取数方法）标记已消费字节；
///   - 已消费字节不会再次出现；未消费字节保留到下一次调用；
///   - 缓冲只在调用期间借出，下一轮的压缩或清空可能移动内存，无法跨调用持有切片；
///   - 返回 `Ok(())` 表示本次处理未遇到致命状况，分发器不对其做其他分支；
///     返回 `Err` 将终止会话。
/// - **注意 (Trade-offs)**：回调在读取线程上内联执行，阻塞即意味着停止读取。
pub trait Consumer {
    fn consume(&mut self, buffer: &mut ReceiveBuffer) -> Result<(), ConsumerError>;
}

impl<F> Consumer for F
where
    F: FnMut(&mut ReceiveBuffer) -> Result<(), ConsumerError>,
{
    fn consume(&mut self, buffer: &mut ReceiveBuffer) -> Result<(), ConsumerError> {
        self(buffer)
    }
}
