use std::fmt;

/// Default time a notice stays up, in seconds.
pub const DEFAULT_NOTICE_SECONDS: f64 = 3.0;
/// Time a submit result stays up, in seconds.
pub const SUBMIT_NOTICE_SECONDS: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Success,
}

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Success => "success",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a notice is being dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    Timeout,
    /// Interaction elsewhere on screen; notices ignore it.
    ClickAway,
    CloseButton,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
    pub duration: f64,
}

/// Single-slot transient message shown over whatever screen is active.
///
/// Showing a new notice replaces the current one; it hides itself once its
/// duration has passed on the clock given to [`NoticeBoard::tick`].
#[derive(Debug, Default)]
pub struct NoticeBoard {
    current: Option<Notice>,
    shown_at: Option<f64>,
}

impl NoticeBoard {
    pub const fn new() -> Self {
        Self {
            current: None,
            shown_at: None,
        }
    }

    pub fn show(&mut self, message: impl Into<String>, severity: Severity) {
        self.show_for(message, severity, DEFAULT_NOTICE_SECONDS);
    }

    pub fn show_for(&mut self, message: impl Into<String>, severity: Severity, duration: f64) {
        self.current = Some(Notice {
            message: message.into(),
            severity,
            duration,
        });
        self.shown_at = None;
    }

    pub fn dismiss(&mut self, reason: DismissReason) {
        if reason == DismissReason::ClickAway {
            return;
        }
        self.current = None;
        self.shown_at = None;
    }

    /// Advance the clock; the first tick after `show` starts the countdown.
    pub fn tick(&mut self, now_seconds: f64) {
        let Some(notice) = &self.current else {
            return;
        };
        let shown_at = *self.shown_at.get_or_insert(now_seconds);
        if now_seconds - shown_at >= notice.duration {
            self.dismiss(DismissReason::Timeout);
        }
    }

    pub const fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_hides_after_its_duration() {
        let mut board = NoticeBoard::new();
        board.show("saved", Severity::Success);
        board.tick(10.0);
        board.tick(12.9);
        assert!(board.current().is_some());
        board.tick(13.0);
        assert!(board.current().is_none());
    }

    #[test]
    fn newer_notice_replaces_and_restarts() {
        let mut board = NoticeBoard::new();
        board.show("first", Severity::Info);
        board.tick(0.0);
        board.tick(2.0);
        board.show_for("second", Severity::Error, SUBMIT_NOTICE_SECONDS);
        board.tick(4.0);
        board.tick(9.0);
        assert_eq!(
            board.current().map(|notice| notice.message.as_str()),
            Some("second")
        );
        board.tick(10.0);
        assert!(board.current().is_none());
    }

    #[test]
    fn click_away_is_ignored() {
        let mut board = NoticeBoard::new();
        board.show("stay", Severity::Warning);
        board.dismiss(DismissReason::ClickAway);
        assert!(board.current().is_some());
        board.dismiss(DismissReason::CloseButton);
        assert!(board.current().is_none());
    }
}
