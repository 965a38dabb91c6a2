mod windows_bridge;

use chrono::{TimeZone, Utc};
use std::collections::BTreeSet;
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

/// One tick's worth of raw OS signals. Produced fresh each sample; carries no
/// identity beyond the tick that read it.
#[derive(Debug, Clone)]
pub struct RawSignals {
    pub active_app: String,
    pub window_title: String,
    pub idle_secs: f64,
    pub battery_percent: Option<u8>,
    pub boot_time: String,
    pub user_apps: Vec<String>,
}

/// Read-only view of the workstation, plus the monotonic tick counter the
/// resume detector watches. Trait seam so the loop can run against fakes.
pub trait SystemProbes {
    fn sample(&mut self) -> RawSignals;
    fn tick_count_ms(&mut self) -> u64;
}

/// Substituted whenever a pid cannot be resolved to a process name.
pub const UNKNOWN_APP: &str = "Unknown";

/// Substituted when the boot timestamp cannot be represented.
const UNKNOWN_BOOT_TIME: &str = "Unknown";

/// Executable-path fragments that mark a process as OS plumbing rather than
/// something the user launched.
const SYSTEM_PATH_MARKERS: [&str; 3] = ["windows", "microsoft", "system32"];

pub struct HostProbes {
    system: System,
    /// Our own pid so the agent never shows up in its own app list.
    own_pid: Pid,
}

impl HostProbes {
    pub fn new() -> Self {
        Self {
            system: System::new(),
            own_pid: Pid::from_u32(std::process::id()),
        }
    }

    fn active_window(&self) -> (String, String) {
        match windows_bridge::foreground_window() {
            Some((pid, title)) => {
                let name = self
                    .system
                    .process(Pid::from_u32(pid))
                    .map(|process| process.name().to_string_lossy().into_owned())
                    .unwrap_or_else(|| UNKNOWN_APP.to_string());
                (name, title)
            }
            None => (UNKNOWN_APP.to_string(), String::new()),
        }
    }

    fn idle_secs(&self) -> f64 {
        match windows_bridge::last_input_tick_ms() {
            Some(last_input) => {
                let now = windows_bridge::tick_count_ms();
                now.saturating_sub(last_input) as f64 / 1000.0
            }
            None => 0.0,
        }
    }

    /// Everything running that the user plausibly started: skips our own pid
    /// and anything installed under the OS vendor paths. A process without a
    /// resolvable executable path is skipped rather than guessed at.
    fn user_apps(&self) -> Vec<String> {
        let mut apps = BTreeSet::new();
        for (pid, process) in self.system.processes() {
            if *pid == self.own_pid {
                continue;
            }
            let Some(exe) = process.exe() else {
                continue;
            };
            let path = exe.to_string_lossy().to_lowercase();
            if SYSTEM_PATH_MARKERS.iter().any(|marker| path.contains(marker)) {
                continue;
            }
            apps.insert(process.name().to_string_lossy().into_owned());
        }
        apps.into_iter().collect()
    }

    fn boot_time_string() -> String {
        match Utc.timestamp_opt(System::boot_time() as i64, 0) {
            chrono::LocalResult::Single(boot) => boot.format("%Y-%m-%d %H:%M:%S").to_string(),
            _ => UNKNOWN_BOOT_TIME.to_string(),
        }
    }
}

impl Default for HostProbes {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemProbes for HostProbes {
    fn sample(&mut self) -> RawSignals {
        // everything() so process names and exe paths are populated.
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            ProcessRefreshKind::everything(),
        );

        let (active_app, window_title) = self.active_window();

        RawSignals {
            active_app,
            window_title,
            idle_secs: self.idle_secs(),
            battery_percent: windows_bridge::battery_percent(),
            boot_time: Self::boot_time_string(),
            user_apps: self.user_apps(),
        }
    }

    fn tick_count_ms(&mut self) -> u64 {
        windows_bridge::tick_count_ms()
    }
}
