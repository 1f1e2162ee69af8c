//! Readiness polling against the editor's windows.
//!
//! Every wait is a bounded loop: sample, succeed, otherwise sleep one poll
//! interval and try again until the deadline passes. Enumeration errors
//! count as failed samples and are only logged.

use std::time::Duration;

use tracing::{debug, trace};
use winops::{WinOps, WindowInfo, list_matching_windows};

use crate::clock::{Clock, Deadline};

/// Pause between window samples.
pub const WINDOW_POLL_INTERVAL: Duration = Duration::from_millis(200);
/// Pause between file-title samples.
pub const FILE_POLL_INTERVAL: Duration = Duration::from_millis(100);
/// Consecutive healthy samples required before the editor counts as responsive.
pub const REQUIRED_CONSECUTIVE_CHECKS: u32 = 3;

/// Counts consecutive successes; any failure resets the streak.
#[derive(Debug, Clone, Copy)]
pub struct Debounce {
    required: u32,
    streak: u32,
}

impl Debounce {
    /// Require `required` consecutive successes (at least one).
    pub fn new(required: u32) -> Self {
        Self {
            required: required.max(1),
            streak: 0,
        }
    }

    /// Record one sample; true once the streak reaches the requirement.
    pub fn observe(&mut self, ok: bool) -> bool {
        if ok {
            self.streak += 1;
        } else {
            self.streak = 0;
        }
        self.streak >= self.required
    }

    /// Current streak length.
    pub fn streak(&self) -> u32 {
        self.streak
    }
}

/// Window sampler for one application signature.
pub struct Poller<'a> {
    ops: &'a dyn WinOps,
    clock: &'a dyn Clock,
    signature: &'a str,
}

impl<'a> Poller<'a> {
    /// Poll windows whose title contains `signature`.
    pub fn new(ops: &'a dyn WinOps, clock: &'a dyn Clock, signature: &'a str) -> Self {
        Self {
            ops,
            clock,
            signature,
        }
    }

    /// Matching windows right now; errors are logged and read as "none".
    pub fn matching(&self) -> Vec<WindowInfo> {
        match list_matching_windows(self.ops, self.signature) {
            Ok(wins) => wins,
            Err(e) => {
                debug!("window enumeration failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Whether at least one matching window exists.
    pub fn any_window(&self) -> bool {
        !self.matching().is_empty()
    }

    /// Wait until a matching window appears.
    pub fn wait_for_appearance(&self, timeout: Duration) -> bool {
        let deadline = Deadline::start(self.clock, timeout);
        while !deadline.expired(self.clock) {
            if self.any_window() {
                debug!(
                    elapsed_ms = deadline.elapsed(self.clock).as_millis() as u64,
                    "editor window appeared"
                );
                return true;
            }
            self.clock.sleep(WINDOW_POLL_INTERVAL);
        }
        false
    }

    /// Wait until `required` consecutive samples show a window whose owner
    /// process can be queried.
    pub fn wait_for_responsive(&self, timeout: Duration, required: u32) -> bool {
        let deadline = Deadline::start(self.clock, timeout);
        let mut debounce = Debounce::new(required);
        while !deadline.expired(self.clock) {
            let healthy = self.sample_responsive();
            trace!(healthy, streak = debounce.streak(), "responsiveness sample");
            if debounce.observe(healthy) {
                debug!(
                    elapsed_ms = deadline.elapsed(self.clock).as_millis() as u64,
                    "editor responsive"
                );
                return true;
            }
            self.clock.sleep(WINDOW_POLL_INTERVAL);
        }
        false
    }

    /// Wait until some matching window's title contains `basename`
    /// (case-insensitive). An absent or empty basename fails immediately.
    pub fn wait_for_title_contains(&self, basename: Option<&str>, timeout: Duration) -> bool {
        let Some(name) = basename.filter(|n| !n.is_empty()) else {
            return false;
        };
        let needle = name.to_lowercase();
        let deadline = Deadline::start(self.clock, timeout);
        while !deadline.expired(self.clock) {
            if self
                .matching()
                .iter()
                .any(|w| w.title.to_lowercase().contains(&needle))
            {
                debug!(
                    elapsed_ms = deadline.elapsed(self.clock).as_millis() as u64,
                    "file '{}' visible in window title", name
                );
                return true;
            }
            self.clock.sleep(FILE_POLL_INTERVAL);
        }
        false
    }

    fn sample_responsive(&self) -> bool {
        let Some(first) = self.matching().into_iter().next() else {
            return false;
        };
        match self.ops.window_pid(first.id) {
            Ok(pid) => pid != 0,
            Err(e) => {
                trace!("pid query failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use winops::{Error as WinError, MockWinOps};

    use super::*;
    use crate::clock::ManualClock;

    fn editor() -> WindowInfo {
        MockWinOps::window(10, "main.rs - proj - Cursor")
    }

    #[test]
    fn debounce_resets_on_failure() {
        let mut d = Debounce::new(3);
        assert!(!d.observe(true));
        assert!(!d.observe(true));
        assert!(!d.observe(false));
        assert_eq!(d.streak(), 0);
        assert!(!d.observe(true));
        assert!(!d.observe(true));
        assert!(d.observe(true));
    }

    #[test]
    fn appearance_polls_until_window_shows_up() {
        let ops = MockWinOps::new();
        ops.push_frames([Ok(vec![]), Err(WinError::Unsupported), Ok(vec![])]);
        ops.set_windows(vec![editor()]);
        let clock = ManualClock::new();
        let poller = Poller::new(&ops, &clock, "cursor");
        assert!(poller.wait_for_appearance(Duration::from_secs(15)));
        assert_eq!(ops.list_calls(), 4);
        assert_eq!(clock.elapsed(), WINDOW_POLL_INTERVAL * 3);
    }

    #[test]
    fn appearance_gives_up_at_deadline() {
        let ops = MockWinOps::new();
        let clock = ManualClock::new();
        let poller = Poller::new(&ops, &clock, "cursor");
        assert!(!poller.wait_for_appearance(Duration::from_secs(1)));
        assert_eq!(ops.list_calls(), 5);
        assert_eq!(clock.elapsed(), Duration::from_secs(1));
    }

    #[test]
    fn zero_timeout_performs_no_checks() {
        let ops = MockWinOps::new();
        ops.set_windows(vec![editor()]);
        let clock = ManualClock::new();
        let poller = Poller::new(&ops, &clock, "cursor");
        assert!(!poller.wait_for_appearance(Duration::ZERO));
        assert!(!poller.wait_for_responsive(Duration::ZERO, 3));
        assert_eq!(ops.list_calls(), 0);
    }

    #[test]
    fn responsiveness_needs_an_unbroken_streak() {
        let ops = MockWinOps::new();
        ops.set_windows(vec![editor()]);
        ops.push_pid_samples([Ok(1), Ok(1), Ok(0), Ok(1), Ok(1), Ok(1)]);
        let clock = ManualClock::new();
        let poller = Poller::new(&ops, &clock, "cursor");
        assert!(poller.wait_for_responsive(Duration::from_millis(1200), 3));
        assert_eq!(clock.elapsed(), WINDOW_POLL_INTERVAL * 5);
    }

    #[test]
    fn responsiveness_times_out_when_streak_breaks_late() {
        let ops = MockWinOps::new();
        ops.set_windows(vec![editor()]);
        ops.push_pid_samples([
            Ok(1),
            Ok(1),
            Err(WinError::WindowGone(10)),
            Ok(1),
            Ok(1),
            Ok(1),
        ]);
        let clock = ManualClock::new();
        let poller = Poller::new(&ops, &clock, "cursor");
        assert!(!poller.wait_for_responsive(Duration::from_millis(1000), 3));
    }

    #[test]
    fn title_wait_matches_basename_case_insensitively() {
        let ops = MockWinOps::new();
        ops.push_frames([Ok(vec![MockWinOps::window(10, "Welcome - Cursor")])]);
        ops.set_windows(vec![MockWinOps::window(10, "MAIN.RS - proj - Cursor")]);
        let clock = ManualClock::new();
        let poller = Poller::new(&ops, &clock, "cursor");
        assert!(poller.wait_for_title_contains(Some("main.rs"), Duration::from_secs(8)));
        assert_eq!(clock.sleeps(), vec![FILE_POLL_INTERVAL]);
    }

    #[test]
    fn title_wait_survives_enumeration_error() {
        let ops = MockWinOps::new();
        ops.push_frames([
            Err(WinError::Unsupported),
            Ok(vec![MockWinOps::window(10, "main.rs - proj - Cursor")]),
        ]);
        let clock = ManualClock::new();
        let poller = Poller::new(&ops, &clock, "cursor");
        assert!(poller.wait_for_title_contains(Some("main.rs"), Duration::from_secs(8)));
        assert_eq!(ops.list_calls(), 2);
        assert_eq!(clock.sleeps(), vec![FILE_POLL_INTERVAL]);
    }

    #[test]
    fn title_wait_without_basename_fails_without_polling() {
        let ops = MockWinOps::new();
        ops.set_windows(vec![editor()]);
        let clock = ManualClock::new();
        let poller = Poller::new(&ops, &clock, "cursor");
        assert!(!poller.wait_for_title_contains(None, Duration::from_secs(8)));
        assert!(!poller.wait_for_title_contains(Some(""), Duration::from_secs(8)));
        assert_eq!(ops.list_calls(), 0);
        assert!(clock.sleeps().is_empty());
    }
}
