//! `event_loop_contract` 集成测试：在真实描述符上驱动读取循环。
//!
//! # 测试总览（Why）
//! - 用 `UnixStream::pair` 代替串口，走真实的 `poll` 与 `read`；
//! - 覆盖跨多次读取拼帧、流结束退出、取消令牌与等待超时的交互；
//! - 就绪后读到 `WouldBlock` 回到等待，描述符无效时等待失败为致命错误。

use std::io::{self, Read, Write};
use std::os::fd::{AsFd, BorrowedFd, RawFd};
use std::os::unix::net::UnixStream;
use std::thread;
use std::time::Duration;

use sio_core::{
    Cancellation, Consumer, ConsumerError, DeviceSession, EndOfStreamPolicy, LoopExit, LoopState,
    ReceiveBuffer, SessionConfig, SessionError,
};

/// 以换行分帧的解析器：只消费完整的行，半行留在窗口里。
#[derive(Debug, Default)]
struct LineCollector {
    lines: Vec<String>,
    calls: usize,
}

impl Consumer for LineCollector {
    fn consume(&mut self, buffer: &mut ReceiveBuffer) -> Result<(), ConsumerError> {
        self.calls += 1;
        while let Some(pos) = buffer.window().iter().position(|b| *b == b'\n') {
            let line = String::from_utf8(buffer.window()[..pos].to_vec())?;
            self.lines.push(line);
            buffer.forward(pos + 1)?;
        }
        Ok(())
    }
}

/// 描述符已就绪，但前 `pending` 次读取仍报告 `WouldBlock` 的设备。
#[derive(Debug)]
struct BusyDriver {
    stream: UnixStream,
    pending: usize,
}

impl Read for BusyDriver {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pending > 0 {
            self.pending -= 1;
            return Err(io::ErrorKind::WouldBlock.into());
        }
        self.stream.read(buf)
    }
}

impl AsFd for BusyDriver {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.stream.as_fd()
    }
}

/// 指向从未打开过的描述符号，`poll` 对它返回 `POLLNVAL`。
const NEVER_OPENED: RawFd = RawFd::MAX;

#[derive(Debug)]
struct ClosedDevice;

impl Read for ClosedDevice {
    fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::from_raw_os_error(9))
    }
}

impl AsFd for ClosedDevice {
    fn as_fd(&self) -> BorrowedFd<'_> {
        // SAFETY: 描述符只交给 `poll` 检查，不会被读写或关闭。
        unsafe { BorrowedFd::borrow_raw(NEVER_OPENED) }
    }
}

fn session(stream: UnixStream, config: SessionConfig) -> DeviceSession<UnixStream, LineCollector> {
    DeviceSession::new(stream, LineCollector::default(), &config).expect("session")
}

#[test]
fn frames_split_across_reads_are_reassembled() {
    let (reader, mut writer) = UnixStream::pair().expect("socket pair");
    let feeder = thread::spawn(move || {
        for chunk in [&b"HEL"[..], b"LO\nWOR", b"LD\n", b"tail"] {
            writer.write_all(chunk).expect("write");
            thread::sleep(Duration::from_millis(20));
        }
    });

    let mut session = session(reader, SessionConfig::default());
    let exit = session.run().expect("loop exits cleanly");
    feeder.join().expect("feeder thread");

    assert_eq!(exit, LoopExit::EndOfStream);
    assert_eq!(session.state(), LoopState::Waiting);
    assert_eq!(session.consumer().lines, vec!["HELLO", "WORLD"]);
    assert_eq!(session.buffer().window(), b"tail");
    assert_eq!(session.stats().bytes_received, 16);
}

#[test]
fn small_buffer_compacts_instead_of_losing_data() {
    let (reader, mut writer) = UnixStream::pair().expect("socket pair");
    writer.write_all(b"abcdefgh\nijklmnop\n").expect("write");
    drop(writer);

    let config = SessionConfig {
        capacity: 12,
        ..SessionConfig::default()
    };
    let mut session = session(reader, config);
    let exit = session.run().expect("loop exits cleanly");

    assert_eq!(exit, LoopExit::EndOfStream);
    assert_eq!(session.consumer().lines, vec!["abcdefgh", "ijklmnop"]);
    assert!(session.stats().rewinds >= 1);
}

#[test]
fn flush_mode_drops_partial_lines() {
    let (reader, mut writer) = UnixStream::pair().expect("socket pair");
    writer.write_all(b"one\ntwo").expect("write");
    drop(writer);

    let config = SessionConfig {
        flush_every_read: true,
        ..SessionConfig::default()
    };
    let mut session = session(reader, config);
    session.run().expect("loop exits cleanly");

    assert_eq!(session.consumer().lines, vec!["one"]);
    assert!(session.buffer().is_empty());
    assert_eq!(session.stats().flushes, session.stats().reads);
}

#[test]
fn cancelled_token_stops_before_waiting() {
    let (reader, _writer) = UnixStream::pair().expect("socket pair");
    let mut session = session(reader, SessionConfig::default());
    let cancel = Cancellation::new();
    cancel.cancel();

    let exit = session.run_until(&cancel).expect("cancelled");
    assert_eq!(exit, LoopExit::Cancelled);
    assert_eq!(session.consumer().calls, 0);
}

#[test]
fn wait_timeout_lets_cancellation_through_an_idle_device() {
    let (reader, _writer) = UnixStream::pair().expect("socket pair");
    let config = SessionConfig {
        wait_timeout_ms: Some(10),
        ..SessionConfig::default()
    };
    let mut session = session(reader, config);
    let cancel = Cancellation::new();
    let remote = cancel.clone();
    let canceller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(60));
        remote.cancel();
    });

    let exit = session.run_until(&cancel).expect("cancelled");
    canceller.join().expect("canceller thread");

    assert_eq!(exit, LoopExit::Cancelled);
    assert!(session.stats().idle_wakes > 0);
    assert_eq!(session.consumer().calls, 0);
}

#[test]
fn continue_policy_keeps_looping_after_end_of_stream() {
    let (reader, mut writer) = UnixStream::pair().expect("socket pair");
    writer.write_all(b"last\n").expect("write");
    drop(writer);

    let config = SessionConfig {
        end_of_stream: EndOfStreamPolicy::Continue,
        wait_timeout_ms: Some(5),
        ..SessionConfig::default()
    };
    let mut session = session(reader, config);
    let cancel = Cancellation::new();
    let remote = cancel.clone();
    let canceller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(40));
        remote.cancel();
    });

    let exit = session.run_until(&cancel).expect("cancelled");
    canceller.join().expect("canceller thread");

    assert_eq!(exit, LoopExit::Cancelled);
    assert_eq!(session.consumer().lines, vec!["last"]);
    assert!(session.stats().idle_wakes > 0);
}

#[test]
fn non_blocking_descriptor_reaches_end_of_stream() {
    let (reader, mut writer) = UnixStream::pair().expect("socket pair");
    reader.set_nonblocking(true).expect("non-blocking");
    writer.write_all(b"ping\n").expect("write");
    drop(writer);

    let config = SessionConfig {
        blocking: false,
        ..SessionConfig::default()
    };
    let mut session = session(reader, config);

    assert_eq!(session.run().expect("loop exits"), LoopExit::EndOfStream);
    assert!(!session.is_blocking());
    assert_eq!(session.consumer().lines, vec!["ping"]);
}

#[test]
fn would_block_after_readiness_returns_to_waiting() {
    let (reader, mut writer) = UnixStream::pair().expect("socket pair");
    writer.write_all(b"ping\n").expect("write");
    drop(writer);

    let device = BusyDriver {
        stream: reader,
        pending: 2,
    };
    let config = SessionConfig::default();
    let mut session =
        DeviceSession::new(device, LineCollector::default(), &config).expect("session");

    assert_eq!(session.run().expect("loop exits"), LoopExit::EndOfStream);
    assert!(session.stats().idle_wakes >= 2);
    assert_eq!(session.device().pending, 0);
    assert_eq!(session.consumer().lines, vec!["ping"]);
}

#[test]
fn invalid_descriptor_is_a_fatal_wait_error() {
    let config = SessionConfig::default();
    let mut session =
        DeviceSession::new(ClosedDevice, LineCollector::default(), &config).expect("session");

    let err = session.run().expect_err("poll must fail");

    assert!(err.is_unrecoverable());
    match err {
        SessionError::Io { operation, source } => {
            assert_eq!(operation, "poll");
            assert_eq!(source.raw_os_error(), Some(9));
        }
        other => panic!("expected a poll failure, got {other:?}"),
    }
    assert_eq!(session.consumer().calls, 0);
    assert_eq!(session.stats().reads, 0);
}
