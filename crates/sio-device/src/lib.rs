#![deny(unsafe_code)]

//! `sio-device`：把一个串口路径变成可供读取会话使用的描述符。
//!
//! # 设计动机（Why）
//! - 读取核心只要求 `Read + AsFd`，设备打开与线路规程配置交由本 crate 完成；
//! - 进程退出前必须把终端恢复成打开时的样子，否则交互终端会停留在原始模式。
//!
//! # 核心契约（What）
//! - [`SerialDevice::open`] 以 `O_NOCTTY` 打开设备，保存原 termios 后切换到原始模式；
//! - [`SerialDevice::restore`] 显式还原，`Drop` 兜底还原；
//! - [`baud_rate`] 把整数波特率映射为平台常量，未知值返回 `None`。

mod baud;
mod config;
mod error;
mod serial;

pub use baud::{SUPPORTED_BAUD_RATES, baud_rate};
pub use config::{DEFAULT_BAUD, DeviceConfig};
pub use error::DeviceError;
pub use serial::SerialDevice;
