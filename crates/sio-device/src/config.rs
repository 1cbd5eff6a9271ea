use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// 默认波特率。
pub const DEFAULT_BAUD: u32 = 115200;

/// 设备打开参数，对应 TOML 中的 `[device]` 表。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// 设备路径，例如 `/dev/ttyUSB0`。
    pub path: PathBuf,
    pub baud: u32,
    /// `true` 时以阻塞模式打开并开启规范模式。
    pub blocking: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            baud: DEFAULT_BAUD,
            blocking: false,
        }
    }
}
