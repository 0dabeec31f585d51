use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

// ==================== Notice Level ====================

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// Neutral activity, e.g. someone else voted
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Success => write!(f, "success"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

// ==================== Notice Position ====================

/// Screen corner a notice is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoticePosition {
    TopLeft,
    TopCenter,
    TopRight,
    BottomLeft,
    BottomCenter,
    #[default]
    BottomRight,
}

// ==================== Notice ====================

/// Default display time when none is given
pub const DEFAULT_NOTICE_MS: u64 = 4000;

/// A transient message shown to the user. No acknowledgement is expected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    #[serde(default)]
    pub position: NoticePosition,
    /// Display time in milliseconds
    pub duration_ms: u64,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            position: NoticePosition::default(),
            duration_ms: DEFAULT_NOTICE_MS,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    pub fn at(mut self, position: NoticePosition) -> Self {
        self.position = position;
        self
    }

    pub fn lasting(mut self, duration: Duration) -> Self {
        self.duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let notice = Notice::warning("Calm down, my guy").lasting(Duration::from_secs(3));
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert_eq!(notice.position, NoticePosition::BottomRight);
        assert_eq!(notice.duration(), Duration::from_millis(3000));
        assert_eq!(notice.to_string(), "[warning] Calm down, my guy");
    }

    #[test]
    fn test_position_wire_name() {
        let json = serde_json::to_string(&Notice::info("hi").at(NoticePosition::TopCenter)).unwrap();
        assert!(json.contains("\"position\":\"top-center\""));
    }
}
