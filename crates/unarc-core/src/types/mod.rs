//! Core data types shared by the extractors and the materializer.
//!
//! - [`DestDir`]: canonical destination root
//! - [`EntryKind`], [`EntryHeader`], [`ArchiveEntry`]: what the structural
//!   extractors produce
//! - [`ExtractionTarget`]: an entry name joined onto the root under a
//!   [`PathPolicy`](crate::config::PathPolicy)

pub mod dest_dir;
pub mod entry;
pub mod entry_type;
pub mod target;

pub use dest_dir::DestDir;
pub use entry::ArchiveEntry;
pub use entry::EntryHeader;
pub use entry::EntryOrigin;
pub use entry::PERMISSION_MASK;
pub use entry_type::EntryKind;
pub use target::ExtractionTarget;
