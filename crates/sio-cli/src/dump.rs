use std::io::Write;

use sio_core::{Consumer, ConsumerError, HexDump, ReceiveBuffer};

/// 打印窗口内容并整体消费的解析回调。
///
/// 每次回调输出两行：`received total length=N` 与窗口的十六进制转储，随后推进整个窗口，
/// 因此缓冲在两次读取之间总是空的。
#[derive(Debug)]
pub struct DumpConsumer<W> {
    out: W,
}

impl<W: Write> DumpConsumer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Consumer for DumpConsumer<W> {
    fn consume(&mut self, buffer: &mut ReceiveBuffer) -> Result<(), ConsumerError> {
        let window = buffer.window();
        writeln!(self.out, "received total length={}", window.len())?;
        writeln!(self.out, "{}", HexDump(window))?;
        self.out.flush()?;
        buffer.forward(buffer.len())?;
        Ok(())
    }
}
