#![deny(unsafe_code)]

//! `sio-buffer` 提供串口读取循环使用的定长接收缓冲。
//!
//! # 模块定位（Why）
//! - 串口驱动每次 `read` 只交付零散字节，解析器需要跨多次读取拼出完整帧；
//!   本 crate 负责在两次 I/O 事件之间保存尚未消费的字节，绝不丢失。
//! - 缓冲在会话建立时一次性分配，之后只移动窗口，不再申请内存。
//!
//! # 设计概要（How）
//! - [`ReceiveBuffer`] 在固定容量的存储中维护 `[offset, offset + length)` 有效窗口；
//! - 尾部永远预留一个字节，可写空间为 `capacity - offset - length - 1`；
//! - 尾部空间耗尽时通过 [`ReceiveBuffer::rewind`] 把窗口整体搬回存储起点，
//!   以复制压缩代替环形取模。
//! - 实现 [`bytes::Buf`]，解析回调可直接使用 `get_u16_le`、`get_u32` 等按端序取数的方法，
//!   取数同时推进窗口。
//!
//! # 契约（What）
//! - 任意操作之后都满足 `offset + length <= capacity - 1`；
//! - 越界推进、读取溢出等情况以 [`BufferError`] 返回，数据保持原样。

mod error;
mod receive_buffer;

pub use error::BufferError;
pub use receive_buffer::{MIN_CAPACITY, RESERVED_TAIL, ReceiveBuffer};
