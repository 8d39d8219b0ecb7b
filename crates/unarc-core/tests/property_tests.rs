//! Property-based tests for scheme resolution and path containment.
//!
//! These tests use proptest to generate arbitrary names and verify the
//! resolver and the path policies hold across a wide range of inputs.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;
use std::io::Cursor;
use std::path::Path;
use std::path::PathBuf;
use tempfile::TempDir;
use unarc_core::ExtractionError;
use unarc_core::PathPolicy;
use unarc_core::Scheme;
use unarc_core::copy::CopyBuffer;
use unarc_core::copy::copy_with_buffer;
use unarc_core::formats::ExtensionTable;
use unarc_core::formats::FormatResolver;
use unarc_core::formats::detect::STANDARD_EXTENSIONS;
use unarc_core::formats::extension_of;
use unarc_core::types::DestDir;
use unarc_core::types::ExtractionTarget;

fn create_test_dest() -> (TempDir, DestDir) {
    let temp = TempDir::new().expect("failed to create temp dir");
    let dest = DestDir::new(temp.path()).expect("failed to create dest");
    (temp, dest)
}

fn known_extension() -> impl Strategy<Value = (&'static str, Scheme)> {
    prop::sample::select(STANDARD_EXTENSIONS.to_vec())
}

proptest! {
    /// Any stem followed by a table extension resolves to that scheme.
    #[test]
    fn prop_table_extensions_resolve(
        stem in "[a-zA-Z0-9_ -]{0,20}(\\.[a-z0-9]{1,4}){0,2}",
        (ext, scheme) in known_extension(),
    ) {
        let resolver = FormatResolver::default();
        let name = format!("{stem}{ext}");
        prop_assert_eq!(resolver.resolve(Path::new(&name)).unwrap(), scheme);
    }

    /// Names whose last extension is not in the table are rejected, and the
    /// error carries that extension.
    #[test]
    fn prop_unknown_extensions_rejected(
        stem in "[a-z]{1,10}",
        ext in "\\.[a-z0-9]{1,6}",
    ) {
        let table = ExtensionTable::standard();
        prop_assume!(table.lookup(&ext).is_none());

        let name = format!("{stem}{ext}");
        let err = FormatResolver::new(table).resolve(Path::new(&name)).unwrap_err();
        let is_unsupported = matches!(
            err,
            ExtractionError::UnsupportedExtension { ref extension } if *extension == ext
        );
        prop_assert!(is_unsupported);
    }

    /// Only the final element of a path contributes its extension.
    #[test]
    fn prop_extension_ignores_directories(
        dir in "[a-z]{1,8}\\.[a-z]{1,3}",
        file in "[a-z]{1,8}",
    ) {
        let path = PathBuf::from(dir).join(file);
        prop_assert_eq!(extension_of(&path), "");
    }

    /// Names built from normal components stay under the destination.
    #[test]
    fn prop_normal_names_contained(
        components in prop::collection::vec("[a-zA-Z0-9_.-]{1,12}", 1..6)
    ) {
        prop_assume!(components.iter().all(|c| c != "." && c != ".."));
        let (_temp, dest) = create_test_dest();
        let name = components.join("/");

        let target = ExtractionTarget::resolve(Path::new(&name), &dest, PathPolicy::Contained)
            .unwrap();
        prop_assert!(target.as_path().starts_with(dest.as_path()));
        prop_assert!(target.as_path().ends_with(&name));
    }

    /// A name that climbs above its own depth is always rejected when
    /// contained.
    #[test]
    fn prop_escaping_names_rejected(
        prefix in prop::collection::vec("[a-z]{1,8}", 0..4),
        extra in 1usize..4,
        suffix in "[a-z]{1,8}",
    ) {
        let (_temp, dest) = create_test_dest();
        let climbs = prefix.len() + extra;
        let mut parts = prefix;
        parts.extend(std::iter::repeat_n("..".to_string(), climbs));
        parts.push(suffix);
        let name = parts.join("/");

        let result = ExtractionTarget::resolve(Path::new(&name), &dest, PathPolicy::Contained);
        let rejected = matches!(result, Err(ExtractionError::PathTraversal { .. }));
        prop_assert!(rejected, "{} should be rejected", name);
    }

    /// Whatever the name, a contained target never leaves the destination.
    #[test]
    fn prop_contained_targets_never_escape(
        parts in prop::collection::vec(
            prop_oneof!["[a-z]{1,6}", Just("..".to_string()), Just(".".to_string())],
            0..8,
        ),
        absolute in any::<bool>(),
    ) {
        let (_temp, dest) = create_test_dest();
        let mut name = parts.join("/");
        if absolute {
            name.insert(0, '/');
        }

        if let Ok(target) = ExtractionTarget::resolve(Path::new(&name), &dest, PathPolicy::Contained) {
            prop_assert!(target.as_path().starts_with(dest.as_path()));
            prop_assert!(target.as_path().components().all(|c| c != std::path::Component::ParentDir));
        }
    }

    /// Copying preserves the payload byte for byte.
    #[test]
    fn prop_copy_preserves_bytes(data in prop::collection::vec(any::<u8>(), 0..200_000)) {
        let mut buffer = CopyBuffer::new();
        let mut output = Vec::new();
        let copied = copy_with_buffer(&mut Cursor::new(&data), &mut output, &mut buffer).unwrap();
        prop_assert_eq!(copied, data.len() as u64);
        prop_assert_eq!(output, data);
    }
}
