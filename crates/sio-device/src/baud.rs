use nix::sys::termios::BaudRate;

/// 所有平台都可用的波特率，按升序排列。
pub const SUPPORTED_BAUD_RATES: &[u32] = &[
    0, 50, 75, 110, 134, 150, 200, 300, 600, 1200, 1800, 2400, 4800, 9600, 19200, 38400, 57600,
    115200, 230400,
];

/// 把整数波特率映射为 termios 常量。
///
/// 纯函数；`0` 对应挂断速率 `B0`。BSD 系平台额外支持 7200、14400、28800、76800。
pub fn baud_rate(speed: u32) -> Option<BaudRate> {
    let rate = match speed {
        0 => BaudRate::B0,
        50 => BaudRate::B50,
        75 => BaudRate::B75,
        110 => BaudRate::B110,
        134 => BaudRate::B134,
        150 => BaudRate::B150,
        200 => BaudRate::B200,
        300 => BaudRate::B300,
        600 => BaudRate::B600,
        1200 => BaudRate::B1200,
        1800 => BaudRate::B1800,
        2400 => BaudRate::B2400,
        4800 => BaudRate::B4800,
        #[cfg(any(
            target_os = "dragonfly",
            target_os = "freebsd",
            target_os = "ios",
            target_os = "macos",
            target_os = "netbsd",
            target_os = "openbsd"
        ))]
        7200 => BaudRate::B7200,
        9600 => BaudRate::B9600,
        #[cfg(any(
            target_os = "dragonfly",
            target_os = "freebsd",
            target_os = "ios",
            target_os = "macos",
            target_os = "netbsd",
            target_os = "openbsd"
        ))]
        14400 => BaudRate::B14400,
        19200 => BaudRate::B19200,
        #[cfg(any(
            target_os = "dragonfly",
            target_os = "freebsd",
            target_os = "ios",
            target_os = "macos",
            target_os = "netbsd",
            target_os = "openbsd"
        ))]
        28800 => BaudRate::B28800,
        38400 => BaudRate::B38400,
        57600 => BaudRate::B57600,
        #[cfg(any(
            target_os = "dragonfly",
            target_os = "freebsd",
            target_os = "ios",
            target_os = "macos",
            target_os = "netbsd",
            target_os = "openbsd"
        ))]
        76800 => BaudRate::B76800,
        115200 => BaudRate::B115200,
        230400 => BaudRate::B230400,
        _ => return None,
    };
    Some(rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_rate_resolves() {
        for speed in SUPPORTED_BAUD_RATES {
            assert!(baud_rate(*speed).is_some(), "{speed} should be supported");
        }
    }

    #[test]
    fn common_rates_map_to_matching_constants() {
        assert_eq!(baud_rate(9600), Some(BaudRate::B9600));
        assert_eq!(baud_rate(115200), Some(BaudRate::B115200));
        assert_eq!(baud_rate(0), Some(BaudRate::B0));
    }

    #[test]
    fn unknown_rates_are_rejected() {
        assert_eq!(baud_rate(12345), None);
        assert_eq!(baud_rate(u32::MAX), None);
    }
}
