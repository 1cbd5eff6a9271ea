use bytes::Buf;

use crate::error::BufferError;

/// 尾部永久保留的字节数。
pub const RESERVED_TAIL: usize = 1;

/// 最小容量：一个可写字节加上保留字节。
pub const MIN_CAPACITY: usize = RESERVED_TAIL + 1;

/// 定长滑动窗口接收缓冲。
///
/// ```text
///  |------------------ capacity ------------------|
///  |-- offset --|------ length ------|-- free --|r|
///  ^            ^                    ^            ^
///  0          head                 tail       reserved
/// ```
///
/// # 教案式注释
///
/// ## 意图 (Why)
/// - 读取循环把每次 `read` 的结果追加到尾部，解析回调从头部消费；
///   未消费的半帧留在窗口中，等待下一次读取补齐。
///
/// ## 逻辑 (How)
/// - 存储在构造时一次性分配并清零，生命周期内容量不变；
/// - `commit` 在尾部增长窗口，`forward` 从头部收缩窗口；
/// - 尾部空闲耗尽时由 `rewind` 将窗口复制回起点，`reset` 无条件清空。
///
/// ## 契约 (What)
/// - 始终满足 `offset + length <= capacity - 1`；
/// - `tail_mut` 返回的切片长度恰为 `free_space()`，读取不得超出；
/// - `rewind`/`reset` 会移动或抹除数据，调用方不得跨调用保存窗口切片，
///   借用检查器已经保证了这一点。
#[derive(Debug)]
pub struct ReceiveBuffer {
    storage: Box<[u8]>,
    offset: usize,
    length: usize,
}

impl ReceiveBuffer {
    /// 分配容量为 `capacity` 字节的空缓冲。
    pub fn with_capacity(capacity: usize) -> Result<Self, BufferError> {
        if capacity < MIN_CAPACITY {
            return Err(BufferError::InvalidCapacity {
                capacity,
                minimum: MIN_CAPACITY,
            });
        }
        Ok(Self {
            storage: vec![0u8; capacity].into_boxed_slice(),
            offset: 0,
            length: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// 首个有效字节的下标。
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// 窗口内有效字节数。
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// 下一次写入的位置，即 `offset + length`。
    pub fn tail_index(&self) -> usize {
        self.offset + self.length
    }

    /// 尾部可写字节数，已扣除保留字节。
    pub fn free_space(&self) -> usize {
        self.capacity() - self.tail_index() - RESERVED_TAIL
    }

    /// 当前有效窗口 `[offset, offset + length)`。
    pub fn window(&self) -> &[u8] {
        &self.storage[self.offset..self.tail_index()]
    }

    /// 尾部可写区域，长度等于 [`free_space`](Self::free_space)。
    ///
    /// 写入后必须调用 [`commit`](Self::commit) 才会计入窗口。
    pub fn tail_mut(&mut self) -> &mut [u8] {
        let start = self.tail_index();
        let end = start + self.free_space();
        &mut self.storage[start..end]
    }

    /// 将尾部新写入的 `received` 字节并入窗口。
    ///
    /// # 契约 (What)
    /// - `received <= free_space()`，否则返回 [`BufferError::Overrun`]，窗口不变；
    /// - 该检查对应“内核返回的字节数多于提供空间”的损坏场景，绝不截断后继续。
    pub fn commit(&mut self, received: usize) -> Result<(), BufferError> {
        let offered = self.free_space();
        if received > offered {
            return Err(BufferError::Overrun {
                returned: received,
                offered,
            });
        }
        self.length += received;
        self.debug_assert_invariant();
        Ok(())
    }

    /// 标记头部 `consumed` 字节已被消费。
    ///
    /// # 教案式说明
    /// - **契约 (What)**：`consumed <= len()` 时 `offset += consumed`、`length -= consumed`，
    ///   剩余字节原位保留；超出时返回 [`BufferError::OutOfRange`]，窗口与数据均不变。
    /// - **取舍 (Trade-offs)**：不会因越界而静默清空缓冲，越界推进属于解析器缺陷，
    ///   由调用方决定如何处理。
    pub fn forward(&mut self, consumed: usize) -> Result<(), BufferError> {
        if consumed > self.length {
            return Err(BufferError::OutOfRange {
                requested: consumed,
                available: self.length,
            });
        }
        self.offset += consumed;
        self.length -= consumed;
        self.debug_assert_invariant();
        Ok(())
    }

    /// 把窗口复制回存储起点，`length` 不变。
    ///
    /// 这是唯一的压缩手段；窗口已在起点时不做任何事。
    pub fn rewind(&mut self) {
        if self.offset == 0 {
            return;
        }
        let tail = self.tail_index();
        self.storage.copy_within(self.offset..tail, 0);
        self.offset = 0;
        self.debug_assert_invariant();
    }

    /// 丢弃全部缓冲数据。
    pub fn reset(&mut self) {
        self.offset = 0;
        self.length = 0;
    }

    /// 校验窗口不变式。
    pub fn check_invariant(&self) -> Result<(), BufferError> {
        let limit = self.capacity() - RESERVED_TAIL;
        match self.offset.checked_add(self.length) {
            Some(tail) if tail <= limit => Ok(()),
            _ => Err(BufferError::InvariantViolated {
                offset: self.offset,
                length: self.length,
                capacity: self.capacity(),
            }),
        }
    }

    fn debug_assert_invariant(&self) {
        debug_assert!(
            self.check_invariant().is_ok(),
            "receive window invariant broken: offset={} length={} capacity={}",
            self.offset,
            self.length,
            self.capacity()
        );
    }
}

/// 以 `bytes::Buf` 的视角暴露窗口，取数即消费。
///
/// `advance` 越过窗口时按 `Buf` 约定 panic；需要可失败语义时使用
/// [`ReceiveBuffer::forward`]。
impl Buf for ReceiveBuffer {
    fn remaining(&self) -> usize {
        self.length
    }

    fn chunk(&self) -> &[u8] {
        self.window()
    }

    fn advance(&mut self, cnt: usize) {
        if let Err(err) = self.forward(cnt) {
            panic!("cannot advance receive window: {err}");
        }
    }
}
