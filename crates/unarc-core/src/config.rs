//! Extraction options.

/// How archive-internal names are joined onto the destination root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathPolicy {
    /// Normalize the name and reject any entry that would resolve outside
    /// the destination root.
    #[default]
    Contained,

    /// Join the name as stored: root and drive prefixes are stripped, but
    /// `..` components are honoured and may climb out of the destination.
    ///
    /// Only use for archives from a trusted source.
    Verbatim,
}

/// What happens when a single entry cannot be materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Abort the run on the first error.
    #[default]
    FailFast,

    /// Record entry-scoped errors as warnings and continue with the next
    /// entry. Decode and structural errors still abort the run.
    Continue,
}

/// Options controlling an extraction run.
///
/// # Examples
///
/// ```
/// use unarc_core::ExtractOptions;
/// use unarc_core::config::{ErrorPolicy, PathPolicy};
///
/// // Defaults: contained paths, fail fast, keep archive permissions.
/// let options = ExtractOptions::default();
/// assert_eq!(options.path_policy, PathPolicy::Contained);
///
/// let lenient = ExtractOptions::default()
///     .with_error_policy(ErrorPolicy::Continue)
///     .with_path_policy(PathPolicy::Verbatim);
/// assert_eq!(lenient.error_policy, ErrorPolicy::Continue);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Path joining policy.
    pub path_policy: PathPolicy,

    /// Entry error policy.
    pub error_policy: ErrorPolicy,

    /// Apply the permission bits stored in the archive to created files.
    pub preserve_permissions: bool,

    /// Mode used for every directory the run creates.
    pub dir_mode: u32,

    /// Mode used for files when permissions are not preserved.
    pub default_file_mode: u32,
}

impl Default for ExtractOptions {
    /// Default values:
    /// - `path_policy`: [`PathPolicy::Contained`]
    /// - `error_policy`: [`ErrorPolicy::FailFast`]
    /// - `preserve_permissions`: true
    /// - `dir_mode`: `0o755`
    /// - `default_file_mode`: `0o644`
    fn default() -> Self {
        Self {
            path_policy: PathPolicy::Contained,
            error_policy: ErrorPolicy::FailFast,
            preserve_permissions: true,
            dir_mode: 0o755,
            default_file_mode: 0o644,
        }
    }
}

impl ExtractOptions {
    /// Sets the path joining policy.
    #[must_use]
    pub fn with_path_policy(mut self, policy: PathPolicy) -> Self {
        self.path_policy = policy;
        self
    }

    /// Sets the entry error policy.
    #[must_use]
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Enables or disables permission preservation.
    #[must_use]
    pub fn with_preserve_permissions(mut self, preserve: bool) -> Self {
        self.preserve_permissions = preserve;
        self
    }

    /// Sets the mode for created directories.
    #[must_use]
    pub fn with_dir_mode(mut self, mode: u32) -> Self {
        self.dir_mode = mode;
        self
    }

    /// Returns the mode a file with archive mode `entry_mode` is created with.
    #[must_use]
    pub fn file_mode(&self, entry_mode: u32) -> u32 {
        if self.preserve_permissions {
            entry_mode
        } else {
            self.default_file_mode
        }
    }
}
