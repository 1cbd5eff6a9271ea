use std::io;
use std::path::PathBuf;

use nix::errno::Errno;
use thiserror::Error;

/// 设备打开与线路配置阶段的错误。
///
/// 全部发生在读取循环开始之前，调用方通常直接终止进程。
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("unsupported baud rate {0}")]
    UnsupportedBaudRate(u32),
    #[error("open({path}) failed: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{operation}() failed: {source}")]
    Termios {
        operation: &'static str,
        #[source]
        source: Errno,
    },
}

impl DeviceError {
    pub(crate) fn termios(operation: &'static str) -> impl FnOnce(Errno) -> Self {
        move |source| Self::Termios { operation, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failing_call() {
        let err = DeviceError::termios("tcsetattr")(Errno::ENOTTY);
        assert!(err.to_string().starts_with("tcsetattr() failed"));
        assert_eq!(
            DeviceError::UnsupportedBaudRate(12345).to_string(),
            "unsupported baud rate 12345"
        );
    }
}
