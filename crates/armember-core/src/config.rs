//! Limits applied while scanning archives.

/// Scanner configuration.
///
/// The limits bound how much work and memory a malformed or hostile archive
/// can cause. An archive that exceeds them is reported as invalid.
///
/// # Examples
///
/// ```
/// use armember_core::ScanConfig;
///
/// // Use defaults
/// let config = ScanConfig::default();
///
/// // Tighten for untrusted input
/// let strict = ScanConfig::default()
///     .with_max_members(1_000)
///     .with_max_name_table_size(64 * 1024);
/// assert_eq!(strict.max_members, 1_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Maximum number of members (symbol and name tables excluded).
    pub max_members: usize,

    /// Maximum size of a long-name table in bytes.
    pub max_name_table_size: u64,
}

impl Default for ScanConfig {
    /// Default values:
    /// - `max_members`: 100,000
    /// - `max_name_table_size`: 16 MB
    fn default() -> Self {
        Self {
            max_members: 100_000,
            max_name_table_size: 16 * 1024 * 1024, // 16 MB
        }
    }
}

impl ScanConfig {
    /// Sets the member count limit.
    #[must_use]
    pub const fn with_max_members(mut self, max: usize) -> Self {
        self.max_members = max;
        self
    }

    /// Sets the long-name table size limit.
    #[must_use]
    pub const fn with_max_name_table_size(mut self, max: u64) -> Self {
        self.max_name_table_size = max;
        self
    }
}
