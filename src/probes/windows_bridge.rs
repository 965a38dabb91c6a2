//! Raw OS calls behind safe functions. Windows is the primary target; other
//! platforms get inert fallbacks so the crate builds and tests everywhere.

#[cfg(windows)]
mod imp {
    use winapi::um::sysinfoapi::GetTickCount;
    use winapi::um::winbase::{GetSystemPowerStatus, SYSTEM_POWER_STATUS};
    use winapi::um::winuser::{
        GetForegroundWindow, GetLastInputInfo, GetWindowTextW, GetWindowThreadProcessId,
        LASTINPUTINFO,
    };

    const TITLE_BUF_LEN: usize = 512;

    /// Pid and title of the window currently holding focus, if any.
    pub fn foreground_window() -> Option<(u32, String)> {
        unsafe {
            let hwnd = GetForegroundWindow();
            if hwnd.is_null() {
                return None;
            }

            let mut pid: u32 = 0;
            GetWindowThreadProcessId(hwnd, &mut pid);

            let mut buf = [0u16; TITLE_BUF_LEN];
            let len = GetWindowTextW(hwnd, buf.as_mut_ptr(), TITLE_BUF_LEN as i32);
            let title = String::from_utf16_lossy(&buf[..len.max(0) as usize]);

            Some((pid, title))
        }
    }

    /// Milliseconds since boot. Wraps around roughly every 49.7 days and
    /// resets on reboot, which the resume detector relies on.
    pub fn tick_count_ms() -> u64 {
        unsafe { u64::from(GetTickCount()) }
    }

    /// Tick count at the last keyboard/mouse input.
    pub fn last_input_tick_ms() -> Option<u64> {
        unsafe {
            let mut info = LASTINPUTINFO {
                cbSize: std::mem::size_of::<LASTINPUTINFO>() as u32,
                dwTime: 0,
            };
            if GetLastInputInfo(&mut info) == 0 {
                None
            } else {
                Some(u64::from(info.dwTime))
            }
        }
    }

    /// Battery charge percentage. 255 means "no battery" per the Win32 docs.
    pub fn battery_percent() -> Option<u8> {
        unsafe {
            let mut status: SYSTEM_POWER_STATUS = std::mem::zeroed();
            if GetSystemPowerStatus(&mut status) == 0 {
                return None;
            }
            match status.BatteryLifePercent {
                255 => None,
                pct => Some(pct),
            }
        }
    }
}

#[cfg(not(windows))]
mod imp {
    use std::sync::OnceLock;
    use std::time::Instant;

    fn process_epoch() -> Instant {
        static EPOCH: OnceLock<Instant> = OnceLock::new();
        *EPOCH.get_or_init(Instant::now)
    }

    pub fn foreground_window() -> Option<(u32, String)> {
        None
    }

    /// Monotonic millisecond counter anchored at process start. Good enough
    /// for the resume heuristic's forward-delta comparison off Windows.
    pub fn tick_count_ms() -> u64 {
        process_epoch().elapsed().as_millis() as u64
    }

    pub fn last_input_tick_ms() -> Option<u64> {
        None
    }

    pub fn battery_percent() -> Option<u8> {
        None
    }
}

pub use imp::{battery_percent, foreground_window, last_input_tick_ms, tick_count_ms};
