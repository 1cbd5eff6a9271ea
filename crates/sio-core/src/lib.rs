#![deny(unsafe_code)]

//! `sio-core`：串口字节流接收核心。
//!
//! # 设计动机（Why）
//! - 终端或串口协议客户端需要把零散的 `read` 结果拼成应用层帧，
//!   且两次 I/O 事件之间不能丢失尚未消费的字节；
//! - 本 crate 只负责“等待可读 → 读一次 → 交给解析回调”这一条链路，
//!   设备打开、波特率配置与命令行均由外部协作方完成。
//!
//! # 核心契约（What）
//! - [`DeviceSession`] 独占设备句柄、[`ReceiveBuffer`] 与解析回调；
//! - [`DeviceSession::read_once`] 每次就绪通知只尝试一次读取，随后同步调用回调，
//!   可选地在回调返回后清空缓冲；
//! - [`DeviceSession::run`] 在单个描述符上执行阻塞式 `poll` 等待，直到取消、
//!   对端关闭或出现不可恢复错误。
//!
//! # 实现策略（How）
//! - 严格单线程：回调在读取线程上内联执行，读取与回调全序、无锁；
//! - 错误以 [`SessionError`] 返回而非终止进程，宿主可在监督边界自行决定退出；
//! - 诊断输出全部走 `tracing`，是否打印原始字节由订阅者的级别过滤决定。
//!
//! # 风险与考量（Trade-offs）
//! - 回调阻塞会阻塞全部后续读取；
//! - 未设置等待超时时，取消信号只能在下一次就绪后被观察到。

mod consumer;
mod contract;
mod diagnostics;
mod error;
mod event_loop;
mod session;

pub mod config;

pub use config::{EndOfStreamPolicy, SessionConfig};
pub use consumer::{Consumer, ConsumerError};
pub use contract::Cancellation;
pub use diagnostics::HexDump;
pub use error::SessionError;
pub use event_loop::{LoopExit, LoopState, Readiness, wait_readable};
pub use session::{DeviceSession, ReadOutcome, SessionStats};
pub use sio_buffer::{BufferError, ReceiveBuffer};
