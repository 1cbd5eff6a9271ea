//! 原始字节诊断输出。纯观测，不影响控制流。

use std::fmt;

use tracing::{debug, trace};

/// 以 `%02x` 小写十六进制、单空格分隔的形式显示字节序列。
///
/// ```
/// use sio_core::HexDump;
/// assert_eq!(HexDump(&[0x0a, 0xff, 0x00]).to_string(), "0a ff 00");
/// ```
#[derive(Clone, Copy, Debug)]
pub struct HexDump<'a>(pub &'a [u8]);

impl fmt::Display for HexDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// 记录一次成功读取：长度走 `debug`，原始字节走 `trace`。
pub(crate) fn record_received(received: &[u8]) {
    let length = received.len();
    debug!(length, "received length={length}");
    trace!(bytes = %HexDump(received), "raw receive");
}
