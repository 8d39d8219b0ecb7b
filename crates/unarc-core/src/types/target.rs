//! Resolution of archive names to destination paths.

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::ExtractionError;
use crate::Result;
use crate::config::PathPolicy;

use super::DestDir;

/// Absolute filesystem path an entry is materialized at.
///
/// Built only through [`ExtractionTarget::resolve`], which applies the
/// run's [`PathPolicy`].
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use unarc_core::config::PathPolicy;
/// use unarc_core::types::{DestDir, ExtractionTarget};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::create("/tmp/out", 0o755)?;
/// let target = ExtractionTarget::resolve(Path::new("./a/b.txt"), &dest, PathPolicy::Contained)?;
/// assert!(target.as_path().ends_with("a/b.txt"));
///
/// assert!(ExtractionTarget::resolve(Path::new("../x"), &dest, PathPolicy::Contained).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtractionTarget(PathBuf);

impl ExtractionTarget {
    /// Joins `name` onto `dest` under `policy`.
    ///
    /// Both policies drop `.` components and strip root and prefix
    /// components, so `/etc/x` lands at `<dest>/etc/x`. Under
    /// [`PathPolicy::Contained`], a `..` is folded into the preceding
    /// component and rejected if nothing is left to fold into. Under
    /// [`PathPolicy::Verbatim`] it is kept as written.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::PathTraversal`] if a contained name
    /// climbs above the destination root.
    pub fn resolve(name: &Path, dest: &DestDir, policy: PathPolicy) -> Result<Self> {
        let mut relative = PathBuf::new();
        let mut depth = 0usize;

        for component in name.components() {
            match component {
                Component::Normal(part) => {
                    relative.push(part);
                    depth += 1;
                }
                Component::ParentDir => match policy {
                    PathPolicy::Contained if depth == 0 => {
                        return Err(ExtractionError::PathTraversal {
                            path: name.to_path_buf(),
                        });
                    }
                    PathPolicy::Contained => {
                        relative.pop();
                        depth -= 1;
                    }
                    PathPolicy::Verbatim => relative.push(Component::ParentDir),
                },
                Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            }
        }

        Ok(Self(dest.join_path(&relative)))
    }

    /// Returns the resolved path.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Converts into the inner `PathBuf`.
    #[inline]
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl AsRef<Path> for ExtractionTarget {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}
