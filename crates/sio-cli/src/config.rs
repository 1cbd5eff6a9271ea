use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sio_core::{SessionConfig, SessionError};
use sio_device::DeviceConfig;
use thiserror::Error;

use crate::cli::Cli;

/// 配置文件读取与合并阶段的错误。
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("no device given on the command line or in the configuration file")]
    MissingDevice,
    #[error("invalid session settings: {0}")]
    Invalid(#[from] SessionError),
}

/// `sio-dump` 的完整配置。
///
/// ```toml
/// [device]
/// path = "/dev/ttyUSB0"
/// baud = 9600
///
/// [session]
/// capacity = 1024
/// flush_every_read = true
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub device: DeviceConfig,
    pub session: SessionConfig,
}

impl AppConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// 读取 `--config`（若有）并叠加命令行参数，返回校验过的配置。
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply(cli);
        config.validate()?;
        Ok(config)
    }

    /// 命令行中出现的参数覆盖配置文件的值；开关类参数只能打开，不能关闭。
    pub fn apply(&mut self, cli: &Cli) {
        if let Some(path) = &cli.device {
            self.device.path = path.clone();
        }
        if let Some(speed) = cli.speed {
            self.device.baud = speed;
        }
        if let Some(capacity) = cli.buflen {
            self.session.capacity = capacity;
        }
        if cli.blocking {
            self.device.blocking = true;
        }
        if cli.flush {
            self.session.flush_every_read = true;
        }
        self.session.blocking = self.device.blocking;
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.device.path.as_os_str().is_empty() {
            return Err(ConfigError::MissingDevice);
        }
        self.session.validate()?;
        Ok(())
    }
}
