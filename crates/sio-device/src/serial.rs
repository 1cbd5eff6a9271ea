use std::fs::{File, OpenOptions};
use std::io::{self, Read};
use std::os::fd::{AsFd, BorrowedFd};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use nix::fcntl::OFlag;
use nix::sys::termios::{
    LocalFlags, SetArg, SpecialCharacterIndices, Termios, cfmakeraw, cfsetispeed, cfsetospeed,
    tcgetattr, tcsetattr,
};
use tracing::{debug, warn};

use crate::baud::baud_rate;
use crate::config::DeviceConfig;
use crate::error::DeviceError;

/// 已打开并配置好的串口设备。
///
/// # 教案级注释
///
/// ## 契约 (What)
/// - 打开时保存的 termios 在 [`restore`](Self::restore) 或析构时写回；
/// - 非阻塞模式下读取可能返回 `WouldBlock`，由读取会话按“本次无数据”处理；
/// - `VMIN = 0`、`VTIME = 0`：读取不等待最小字节数，有多少返回多少。
///
/// ## 注意事项 (Trade-offs)
/// - 析构中的还原失败只记录告警，不会 panic；需要确认还原结果时请显式调用 `restore`。
#[derive(Debug)]
pub struct SerialDevice {
    file: File,
    original: Termios,
    path: PathBuf,
}

impl SerialDevice {
    /// 打开设备并切换到原始模式。
    ///
    /// # 逻辑 (How)
    /// 1. 先校验波特率，未知值在触碰设备之前就返回 [`DeviceError::UnsupportedBaudRate`]；
    /// 2. 以读写、`O_NOCTTY` 打开，非阻塞配置再叠加 `O_NONBLOCK`；
    /// 3. 读取并保存当前 termios，在副本上执行 `cfmakeraw`；
    /// 4. 阻塞模式开启 `ICANON`，否则关闭；设置 `VMIN`/`VTIME` 与收发速率；
    /// 5. 以 `TCSANOW` 立即生效。
    pub fn open(config: &DeviceConfig) -> Result<Self, DeviceError> {
        let rate = baud_rate(config.baud).ok_or(DeviceError::UnsupportedBaudRate(config.baud))?;

        let mut flags = OFlag::O_NOCTTY;
        if !config.blocking {
            flags |= OFlag::O_NONBLOCK;
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(flags.bits())
            .open(&config.path)
            .map_err(|source| DeviceError::Open {
                path: config.path.clone(),
                source,
            })?;

        let original = tcgetattr(file.as_fd()).map_err(DeviceError::termios("tcgetattr"))?;
        let mut raw = original.clone();
        cfmakeraw(&mut raw);
        if config.blocking {
            raw.local_flags.insert(LocalFlags::ICANON);
        } else {
            raw.local_flags.remove(LocalFlags::ICANON);
        }
        raw.control_chars[SpecialCharacterIndices::VMIN as usize] = 0;
        raw.control_chars[SpecialCharacterIndices::VTIME as usize] = 0;
        cfsetispeed(&mut raw, rate).map_err(DeviceError::termios("cfsetispeed"))?;
        cfsetospeed(&mut raw, rate).map_err(DeviceError::termios("cfsetospeed"))?;
        tcsetattr(file.as_fd(), SetArg::TCSANOW, &raw).map_err(DeviceError::termios("tcsetattr"))?;

        debug!(
            path = %config.path.display(),
            baud = config.baud,
            blocking = config.blocking,
            "serial device configured"
        );
        Ok(Self {
            file,
            original,
            path: config.path.clone(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 把打开时保存的 termios 写回设备。可重复调用。
    pub fn restore(&self) -> Result<(), DeviceError> {
        tcsetattr(self.file.as_fd(), SetArg::TCSANOW, &self.original)
            .map_err(DeviceError::termios("tcsetattr"))
    }
}

impl Read for SerialDevice {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl AsFd for SerialDevice {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.file.as_fd()
    }
}

impl Drop for SerialDevice {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            warn!(path = %self.path.display(), error = %err, "failed to restore terminal settings");
        }
    }
}
