use std::io::{self, Read};
use std::time::Duration;

use sio_buffer::ReceiveBuffer;
use tracing::{debug, trace};

use crate::config::{EndOfStreamPolicy, SessionConfig};
use crate::consumer::Consumer;
use crate::diagnostics::record_received;
use crate::error::SessionError;
use crate::event_loop::LoopState;

/// 单次 [`DeviceSession::read_once`] 的结果。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    /// 读到 `k` 字节并已调用解析回调。
    Received(usize),
    /// 本次无数据（`WouldBlock` 或被信号打断），未调用回调。
    WouldBlock,
    /// 零字节读取：对端已关闭，未调用回调。
    EndOfStream,
}

/// 会话运行期计数器，仅用于观测。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// 成功读取（且已调用回调）的次数。
    pub reads: u64,
    pub bytes_received: u64,
    /// 压缩次数。
    pub rewinds: u64,
    /// 刷新模式下的清空次数。
    pub flushes: u64,
    /// 醒来但没有读到数据的次数（等待超时、伪唤醒、`WouldBlock`）。
    pub idle_wakes: u64,
}

/// 一个设备的读取会话：独占设备句柄、接收缓冲与解析回调。
///
/// # 教案式注释
///
/// ## 意图 (Why)
/// - 把“设备 → 缓冲尾部 → 回调检查窗口 → 回调推进窗口”这条数据流封装在单一所有者里，
///   任何时刻只有读取线程能触碰缓冲。
///
/// ## 契约 (What)
/// - 设备由外部协作方打开并配置，会话只负责读取，不关闭、不还原设备；
/// - `flush_every_read` 开启时，每次回调返回后无条件丢弃窗口剩余字节；
/// - 返回不可恢复错误（见 [`SessionError::is_unrecoverable`]）之后不应继续驱动该会话。
///
/// ## 注意事项 (Trade-offs)
/// - 会话没有析构逻辑，停止驱动即停止读取；缓冲随会话一起释放。
#[derive(Debug)]
pub struct DeviceSession<D, C> {
    pub(crate) device: D,
    pub(crate) buffer: ReceiveBuffer,
    pub(crate) consumer: C,
    pub(crate) flush_every_read: bool,
    pub(crate) blocking: bool,
    pub(crate) end_of_stream: EndOfStreamPolicy,
    pub(crate) wait_timeout: Option<Duration>,
    pub(crate) state: LoopState,
    pub(crate) stats: SessionStats,
}

impl<D, C> DeviceSession<D, C> {
    /// 以已打开的设备和解析回调创建会话，缓冲初始为空。
    pub fn new(device: D, consumer: C, config: &SessionConfig) -> Result<Self, SessionError> {
        config.validate()?;
        let buffer = ReceiveBuffer::with_capacity(config.capacity)?;
        Ok(Self {
            device,
            buffer,
            consumer,
            flush_every_read: config.flush_every_read,
            blocking: config.blocking,
            end_of_stream: config.end_of_stream,
            wait_timeout: config.wait_timeout(),
            state: LoopState::Waiting,
            stats: SessionStats::default(),
        })
    }

    pub fn buffer(&self) -> &ReceiveBuffer {
        &self.buffer
    }

    /// 直接访问缓冲，例如在宿主侧检测到协议错误后调用 `reset`。
    pub fn buffer_mut(&mut self) -> &mut ReceiveBuffer {
        &mut self.buffer
    }

    pub fn consumer(&self) -> &C {
        &self.consumer
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn flush_every_read(&self) -> bool {
        self.flush_every_read
    }

    pub fn is_blocking(&self) -> bool {
        self.blocking
    }

    /// 拆出设备与回调，交还给外部协作方做还原或统计。
    pub fn into_parts(self) -> (D, C) {
        (self.device, self.consumer)
    }
}

impl<D, C> DeviceSession<D, C>
where
    D: Read,
    C: Consumer,
{
    /// 执行一次读取并分发。
    ///
    /// # 教案级注释
    ///
    /// ## 逻辑 (How)
    /// 1. 尾部空闲为零时先 `rewind` 回收头部空间；压缩后仍为零说明缓冲被未消费数据占满，
    ///    返回 [`SessionError::Stalled`]；
    /// 2. 向设备请求至多 `free_space()` 字节，写入尾部；
    /// 3. 零字节为流结束，`WouldBlock`/`Interrupted` 为本次无数据，均不调用回调；
    ///    其他错误直接返回，不重试；
    /// 4. 返回字节数超出提供空间视为损坏，绝不截断；
    /// 5. 增长窗口、记录诊断、调用回调；
    /// 6. 刷新模式下回调返回后清空缓冲。
    pub fn read_once(&mut self) -> Result<ReadOutcome, SessionError> {
        if self.buffer.free_space() == 0 {
            self.buffer.rewind();
            self.stats.rewinds += 1;
            debug!(
                length = self.buffer.len(),
                free = self.buffer.free_space(),
                "compacted receive window"
            );
            if self.buffer.free_space() == 0 {
                return Err(SessionError::Stalled {
                    capacity: self.buffer.capacity(),
                });
            }
        }

        let received = match self.device.read(self.buffer.tail_mut()) {
            Ok(0) => {
                debug!("read returned zero bytes, end of stream");
                return Ok(ReadOutcome::EndOfStream);
            }
            Ok(received) => received,
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                ) =>
            {
                trace!(kind = ?err.kind(), blocking = self.blocking, "no data available");
                return Ok(ReadOutcome::WouldBlock);
            }
            Err(err) => return Err(SessionError::io("read", err)),
        };

        self.buffer.commit(received)?;
        let window = self.buffer.window();
        record_received(&window[window.len() - received..]);
        self.stats.reads += 1;
        self.stats.bytes_received += received as u64;

        self.consumer
            .consume(&mut self.buffer)
            .map_err(SessionError::Consumer)?;
        self.buffer.check_invariant()?;

        if self.flush_every_read {
            if !self.buffer.is_empty() {
                debug!(discarded = self.buffer.len(), "flushing unconsumed bytes");
            }
            self.buffer.reset();
            self.stats.flushes += 1;
        }

        Ok(ReadOutcome::Received(received))
    }
}
