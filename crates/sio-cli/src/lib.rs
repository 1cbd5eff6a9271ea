#![deny(unsafe_code)]

//! `sio-cli`：`sio-dump` 的参数解析、配置合并与打印回调。
//!
//! # 使用方法
//! ```bash
//! sio-dump -s 9600 -B 1024 -d /dev/ttyUSB0
//! sio-dump --config sio.toml -F
//! ```
//! - `-s`：波特率，默认 115200；
//! - `-B`：接收缓冲容量，默认 512；
//! - `-b`：以阻塞模式打开设备；
//! - `-F`：每次读取后清空缓冲；
//! - `-d`：可重复，逐级打开 `debug`/`trace` 日志，`RUST_LOG` 优先；
//! - `--config`：TOML 配置文件，命令行参数覆盖文件中的值。
//!
//! # 设计要点（Why）
//! - 二进制只负责装配：打开设备、构造会话、运行循环，全部错误带上下文返回给 `main`；
//! - 打印内容写 stdout，日志写 stderr，两者可以分别重定向。

mod cli;
mod config;
mod dump;

pub use cli::Cli;
pub use config::{AppConfig, ConfigError};
pub use dump::DumpConsumer;

use std::io;

use anyhow::Context;
use sio_core::{DeviceSession, LoopExit};
use sio_device::SerialDevice;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 根据 `-d` 次数选择缺省日志级别。
pub fn default_log_level(debug: u8) -> &'static str {
    match debug {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// 安装全局 `fmt` 订阅者：`RUST_LOG` 存在时以其为准，否则按 `-d` 次数取级别。
pub fn init_tracing(debug: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(debug)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// 按命令行参数运行一次完整的读取会话。
///
/// # 逻辑 (How)
/// 1. 读取配置文件（若有）并叠加命令行覆盖，校验合并结果；
/// 2. 打开并配置设备，构造以 [`DumpConsumer`] 为回调的会话；
/// 3. 运行读取循环直到流结束或出错；
/// 4. 正常结束时显式还原终端设置，失败同样作为错误返回。
pub fn run(cli: &Cli) -> anyhow::Result<LoopExit> {
    let config = AppConfig::resolve(cli)?;
    info!(
        path = %config.device.path.display(),
        baud = config.device.baud,
        capacity = config.session.capacity,
        "starting sio-dump"
    );

    let device = SerialDevice::open(&config.device)
        .with_context(|| format!("cannot open {}", config.device.path.display()))?;
    let consumer = DumpConsumer::new(io::stdout());
    let mut session = DeviceSession::new(device, consumer, &config.session)
        .context("cannot create read session")?;

    let exit = session.run().context("read loop aborted")?;
    info!(stats = ?session.stats(), "read loop finished");

    let (device, _) = session.into_parts();
    device
        .restore()
        .with_context(|| format!("cannot restore {}", device.path().display()))?;
    Ok(exit)
}
