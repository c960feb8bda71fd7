//! Modification timestamps with an explicit "unknown" state.

use std::fmt;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

/// A file or member modification time.
///
/// `Unknown` stands for "does not exist or could not be determined" and
/// orders before every known time, so a target compared against it always
/// looks out of date.
///
/// # Examples
///
/// ```
/// use armember_core::ModTime;
///
/// assert!(ModTime::Unknown < ModTime::Known(0));
/// assert!(ModTime::Known(1) < ModTime::Known(2));
/// assert_eq!(ModTime::Known(42).seconds(), Some(42));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ModTime {
    /// No timestamp is available.
    #[default]
    Unknown,

    /// Seconds since the Unix epoch.
    Known(i64),
}

impl ModTime {
    /// Returns `true` if a timestamp is available.
    #[must_use]
    pub const fn is_known(self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// Returns the timestamp in seconds, if known.
    #[must_use]
    pub const fn seconds(self) -> Option<i64> {
        match self {
            Self::Known(secs) => Some(secs),
            Self::Unknown => None,
        }
    }

    /// Converts a `SystemTime`, truncating to whole seconds.
    ///
    /// Times before the epoch are negative.
    #[must_use]
    pub fn from_system_time(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(after) => Self::Known(after.as_secs() as i64),
            Err(before) => Self::Known(-(before.duration().as_secs() as i64)),
        }
    }
}

impl fmt::Display for ModTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(secs) => write!(f, "{secs}"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_ordering() {
        assert!(ModTime::Unknown < ModTime::Known(i64::MIN));
        assert!(ModTime::Known(-1) < ModTime::Known(0));
    }

    #[test]
    fn test_from_system_time() {
        let t = UNIX_EPOCH + Duration::from_millis(5_900);
        assert_eq!(ModTime::from_system_time(t), ModTime::Known(5));

        let t = UNIX_EPOCH - Duration::from_secs(10);
        assert_eq!(ModTime::from_system_time(t), ModTime::Known(-10));
    }

    #[test]
    fn test_display() {
        assert_eq!(ModTime::Known(1_700_000_000).to_string(), "1700000000");
        assert_eq!(ModTime::Unknown.to_string(), "unknown");
        assert_eq!(ModTime::default(), ModTime::Unknown);
    }
}
