use std::io::{self, Read};
use std::os::fd::{AsFd, BorrowedFd};
use std::time::Duration;

use nix::errno::Errno;
use nix::poll::{PollFd, PollFlags, PollTimeout, poll};
use tracing::{debug, info};

use crate::config::EndOfStreamPolicy;
use crate::consumer::Consumer;
use crate::contract::Cancellation;
use crate::error::SessionError;
use crate::session::{DeviceSession, ReadOutcome};

/// 读取循环所处的状态。正常运行时只在两者之间往返，没有终态。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    /// 阻塞在就绪等待上。
    Waiting,
    /// 正在执行一次读取与回调。
    Reading,
}

/// 读取循环正常退出的原因。不可恢复错误以 `Err` 返回。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopExit {
    /// 取消令牌在进入等待前被观察到。
    Cancelled,
    /// 读到流结束且策略为 [`EndOfStreamPolicy::Stop`]。
    EndOfStream,
}

/// 一次就绪等待的结果。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Readiness {
    /// 描述符可读，或已挂断/出错，需要一次读取来确认。
    Readable,
    /// 超时、伪唤醒或被信号打断，没有描述符就绪。
    Idle,
}

/// 在单个描述符上等待可读。
///
/// # 教案级注释
/// - **契约 (What)**：`timeout` 为 `None` 时无限等待；`POLLHUP`/`POLLERR` 同样报告为
///   [`Readiness::Readable`]，由随后的读取给出零字节或具体错误；`POLLNVAL` 说明描述符无效，
///   以 `poll` 操作错误返回。
/// - **逻辑 (How)**：`EINTR` 视同伪唤醒，其余 `poll` 失败一律返回错误，不重试。
/// - **取舍 (Trade-offs)**：超时以毫秒计并截断到 `u16::MAX`，单次等待上限约 65 秒；
///   需要更长的空闲间隔时循环会多醒几次，不影响语义。
pub fn wait_readable(
    fd: BorrowedFd<'_>,
    timeout: Option<Duration>,
) -> Result<Readiness, SessionError> {
    let timeout = match timeout {
        None => PollTimeout::NONE,
        Some(duration) => {
            PollTimeout::from(u16::try_from(duration.as_millis()).unwrap_or(u16::MAX))
        }
    };
    let mut fds = [PollFd::new(fd, PollFlags::POLLIN)];

    match poll(&mut fds, timeout) {
        Ok(0) => Ok(Readiness::Idle),
        Ok(_) => {
            let revents = fds[0].revents().unwrap_or_else(PollFlags::empty);
            if revents.contains(PollFlags::POLLNVAL) {
                return Err(SessionError::io("poll", io::Error::from(Errno::EBADF)));
            }
            if revents.intersects(PollFlags::POLLIN | PollFlags::POLLHUP | PollFlags::POLLERR) {
                Ok(Readiness::Readable)
            } else {
                Ok(Readiness::Idle)
            }
        }
        Err(Errno::EINTR) => Ok(Readiness::Idle),
        Err(errno) => Err(SessionError::io("poll", io::Error::from(errno))),
    }
}

impl<D, C> DeviceSession<D, C>
where
    D: Read + AsFd,
    C: Consumer,
{
    /// 无取消信号地运行读取循环，直到流结束或出现错误。
    pub fn run(&mut self) -> Result<LoopExit, SessionError> {
        self.run_until(&Cancellation::new())
    }

    /// 运行读取循环。
    ///
    /// # 教案级注释
    ///
    /// ## 逻辑 (How)
    /// 1. 每轮进入 `Waiting` 之前检查取消令牌；
    /// 2. 在设备描述符上等待可读，超时或伪唤醒直接进入下一轮；
    /// 3. 就绪后切换到 `Reading`，调用一次 [`read_once`](DeviceSession::read_once)，再回到 `Waiting`；
    /// 4. 流结束按 [`EndOfStreamPolicy`] 决定退出或继续。
    ///
    /// ## 契约 (What)
    /// - 读取与回调严格串行，一轮完整结束后才开始下一次等待；
    /// - 任何错误立即返回，循环不做自动恢复。
    pub fn run_until(&mut self, cancel: &Cancellation) -> Result<LoopExit, SessionError> {
        info!(
            capacity = self.buffer.capacity(),
            flush_every_read = self.flush_every_read,
            blocking = self.blocking,
            "entering read loop"
        );

        loop {
            self.state = LoopState::Waiting;
            if cancel.is_cancelled() {
                info!(stats = ?self.stats, "read loop cancelled");
                return Ok(LoopExit::Cancelled);
            }

            match wait_readable(self.device.as_fd(), self.wait_timeout)? {
                Readiness::Idle => {
                    self.stats.idle_wakes += 1;
                    continue;
                }
                Readiness::Readable => {}
            }

            self.state = LoopState::Reading;
            let outcome = self.read_once();
            self.state = LoopState::Waiting;

            match outcome? {
                ReadOutcome::Received(_) => {}
                ReadOutcome::WouldBlock => self.stats.idle_wakes += 1,
                ReadOutcome::EndOfStream => match self.end_of_stream {
                    EndOfStreamPolicy::Stop => {
                        info!(stats = ?self.stats, "device reached end of stream");
                        return Ok(LoopExit::EndOfStream);
                    }
                    EndOfStreamPolicy::Continue => {
                        debug!("ignoring end of stream");
                        self.stats.idle_wakes += 1;
                    }
                },
            }
        }
    }
}
