//! Integration tests for unarc-core.
//!
//! These tests write real archives to a temporary directory and extract
//! them through the public API.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use tempfile::TempDir;
use unarc_core::ErrorPolicy;
use unarc_core::ExtractOptions;
use unarc_core::ExtractionError;
use unarc_core::PathPolicy;
use unarc_core::Scheme;
use unarc_core::extract_archive;
use unarc_core::extract_archive_with_options;
use unarc_core::extract_archive_with_progress;
use unarc_core::test_utils::RecordingProgress;
use unarc_core::test_utils::TarTestBuilder;
use unarc_core::test_utils::ZipTestBuilder;
use unarc_core::test_utils::compress;

fn write_archive(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, data).unwrap();
    path
}

fn sample_tar() -> Vec<u8> {
    TarTestBuilder::new()
        .add_directory("a/", 0o755)
        .add_file("a/b.txt", b"hello", 0o644)
        .build()
}

#[cfg(unix)]
fn mode_of(path: &Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path).unwrap().permissions().mode() & 0o777
}

#[test]
fn test_tar_round_trip() {
    let temp = TempDir::new().unwrap();
    let archive = write_archive(temp.path(), "sample.tar", &sample_tar());
    let out = temp.path().join("out");

    let report = extract_archive(&archive, &out).unwrap();

    assert!(out.join("a").is_dir());
    assert_eq!(fs::read_to_string(out.join("a/b.txt")).unwrap(), "hello");
    assert_eq!(report.files_extracted, 1);
    assert_eq!(report.directories_created, 1);
    assert_eq!(report.bytes_written, 5);
    #[cfg(unix)]
    assert_eq!(mode_of(&out.join("a/b.txt")), 0o644);
}

#[test]
fn test_every_tar_family_extension() {
    let tar = sample_tar();
    let cases = [
        ("s.tar", Scheme::Tar),
        ("s.tar.gz", Scheme::Gzip),
        ("s.tgz", Scheme::Gzip),
        ("s.taz", Scheme::Gzip),
        ("s.tar.bz2", Scheme::Bzip2),
        ("s.tz2", Scheme::Bzip2),
        ("s.tbz2", Scheme::Bzip2),
        ("s.tbz", Scheme::Bzip2),
        ("s.tar.xz", Scheme::Xz),
        ("s.tar.zst", Scheme::Zstd),
        ("s.tzst", Scheme::Zstd),
        ("s.tar.lzma", Scheme::Lzma),
        ("s.tlz", Scheme::Lzma),
    ];

    for (name, scheme) in cases {
        let temp = TempDir::new().unwrap();
        let archive = write_archive(temp.path(), name, &compress(scheme, &tar));
        let out = temp.path().join("out");

        let report = extract_archive(&archive, &out).unwrap_or_else(|e| panic!("{name}: {e}"));
        assert_eq!(report.scheme, Some(scheme), "{name}");
        assert_eq!(
            fs::read_to_string(out.join("a/b.txt")).unwrap(),
            "hello",
            "{name}"
        );
    }
}

#[test]
fn test_tgz_chains_gzip_into_tar() {
    let temp = TempDir::new().unwrap();
    let tar = TarTestBuilder::new().add_file("x.txt", b"data", 0o644).build();
    let archive = write_archive(temp.path(), "x.tgz", &compress(Scheme::Gzip, &tar));
    let out = temp.path().join("out");

    extract_archive(&archive, &out).unwrap();
    assert_eq!(fs::read_to_string(out.join("x.txt")).unwrap(), "data");
}

#[test]
fn test_concatenated_gzip_members() {
    let temp = TempDir::new().unwrap();
    let tar = sample_tar();
    let (head, tail) = tar.split_at(512);
    let mut data = compress(Scheme::Gzip, head);
    data.extend(compress(Scheme::Gzip, tail));
    let archive = write_archive(temp.path(), "multi.gz", &data);
    let out = temp.path().join("out");

    extract_archive(&archive, &out).unwrap();
    assert_eq!(fs::read_to_string(out.join("a/b.txt")).unwrap(), "hello");
}

#[test]
fn test_concatenated_xz_streams() {
    let temp = TempDir::new().unwrap();
    let tar = TarTestBuilder::new()
        .add_file("a.txt", b"first", 0o644)
        .add_file("b.txt", b"second", 0o644)
        .build();
    let (head, tail) = tar.split_at(1024);
    let mut data = compress(Scheme::Xz, head);
    data.extend(compress(Scheme::Xz, tail));
    let archive = write_archive(temp.path(), "multi.tar.xz", &data);
    let out = temp.path().join("out");

    let report = extract_archive(&archive, &out).unwrap();
    assert_eq!(report.files_extracted, 2);
    assert_eq!(fs::read_to_string(out.join("a.txt")).unwrap(), "first");
    assert_eq!(fs::read_to_string(out.join("b.txt")).unwrap(), "second");
}

#[test]
fn test_zip_round_trip() {
    let temp = TempDir::new().unwrap();
    let data = ZipTestBuilder::new()
        .add_directory("a/")
        .add_file("a/b.txt", b"hello")
        .add_file_with_method("a/raw.txt", b"stored", 0o600, zip::CompressionMethod::Stored)
        .build();
    let archive = write_archive(temp.path(), "sample.zip", &data);
    let out = temp.path().join("out");

    let report = extract_archive(&archive, &out).unwrap();
    assert_eq!(report.scheme, Some(Scheme::Zip));
    assert_eq!(fs::read_to_string(out.join("a/b.txt")).unwrap(), "hello");
    assert_eq!(fs::read_to_string(out.join("a/raw.txt")).unwrap(), "stored");
    #[cfg(unix)]
    {
        assert_eq!(mode_of(&out.join("a/b.txt")), 0o644);
        assert_eq!(mode_of(&out.join("a/raw.txt")), 0o600);
    }
}

#[test]
fn test_zip_without_directory_entries() {
    let temp = TempDir::new().unwrap();
    let data = ZipTestBuilder::new().add_file("deep/er/f.txt", b"f").build();
    let archive = write_archive(temp.path(), "flat.zip", &data);
    let out = temp.path().join("out");

    let mut progress = RecordingProgress::default();
    extract_archive_with_progress(&archive, &out, &ExtractOptions::default(), &mut progress)
        .unwrap();

    let root = out.canonicalize().unwrap();
    assert_eq!(
        progress.directories,
        [root.join("deep"), root.join("deep/er")]
    );
    assert!(out.join("deep/er/f.txt").is_file());
}

#[test]
fn test_corrupt_zip_creates_nothing() {
    let temp = TempDir::new().unwrap();
    let mut data = ZipTestBuilder::new()
        .add_file("one.txt", b"1")
        .add_file("two.txt", b"2")
        .build();
    // Damage the central directory signature.
    let cd = data
        .windows(4)
        .position(|w| w == b"PK\x01\x02")
        .expect("central directory present");
    data[cd] = b'X';
    let archive = write_archive(temp.path(), "broken.zip", &data);
    let out = temp.path().join("out");

    let err = extract_archive(&archive, &out).unwrap_err();
    assert!(matches!(
        err,
        ExtractionError::Structural {
            scheme: Scheme::Zip,
            ..
        }
    ));
    assert!(!out.join("one.txt").exists());
    assert!(!out.join("two.txt").exists());
}

#[test]
fn test_zip_with_undecodable_member_creates_nothing() {
    let temp = TempDir::new().unwrap();
    let mut data = ZipTestBuilder::new()
        .add_file_with_method("a.txt", b"a", 0o644, zip::CompressionMethod::Stored)
        .add_file_with_method("b.txt", b"b", 0o644, zip::CompressionMethod::Stored)
        .build();
    // Switch the second member to LZMA (method 14) in both of its headers.
    for (signature, offset) in [(b"PK\x03\x04", 8), (b"PK\x01\x02", 10)] {
        let at = data
            .windows(4)
            .enumerate()
            .filter(|(_, w)| *w == &signature[..])
            .nth(1)
            .map(|(i, _)| i)
            .expect("second header present");
        data[at + offset..at + offset + 2].copy_from_slice(&14u16.to_le_bytes());
    }
    let archive = write_archive(temp.path(), "lzma.zip", &data);
    let out = temp.path().join("out");

    let err = extract_archive(&archive, &out).unwrap_err();
    assert!(matches!(
        err,
        ExtractionError::Structural {
            scheme: Scheme::Zip,
            ..
        }
    ));
    assert!(!out.join("a.txt").exists());
    assert!(!out.join("b.txt").exists());
}

#[test]
fn test_extraction_is_idempotent_and_truncates() {
    let temp = TempDir::new().unwrap();
    let archive = write_archive(temp.path(), "sample.tar", &sample_tar());
    let out = temp.path().join("out");

    extract_archive(&archive, &out).unwrap();
    fs::write(out.join("a/b.txt"), "stale content that is longer").unwrap();

    let report = extract_archive(&archive, &out).unwrap();
    assert_eq!(fs::read_to_string(out.join("a/b.txt")).unwrap(), "hello");
    assert_eq!(report.directories_created, 0);
    assert_eq!(report.files_extracted, 1);
}

#[test]
fn test_tar_order_preserved() {
    let temp = TempDir::new().unwrap();
    let data = TarTestBuilder::new()
        .add_file("z.txt", b"z", 0o644)
        .add_file("a.txt", b"a", 0o644)
        .add_file("m.txt", b"m", 0o644)
        .build();
    let archive = write_archive(temp.path(), "order.tar", &data);
    let out = temp.path().join("out");

    let mut progress = RecordingProgress::default();
    extract_archive_with_progress(&archive, &out, &ExtractOptions::default(), &mut progress)
        .unwrap();

    let names: Vec<_> = progress
        .files
        .iter()
        .map(|(p, _)| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["z.txt", "a.txt", "m.txt"]);
}

#[test]
fn test_tar_symlink_skipped() {
    let temp = TempDir::new().unwrap();
    let data = TarTestBuilder::new()
        .add_symlink("link", "/etc/passwd")
        .add_file("after.txt", b"still here", 0o644)
        .build();
    let archive = write_archive(temp.path(), "links.tar", &data);
    let out = temp.path().join("out");

    let report = extract_archive(&archive, &out).unwrap();
    assert_eq!(report.entries_skipped, 1);
    assert!(fs::symlink_metadata(out.join("link")).is_err());
    assert_eq!(
        fs::read_to_string(out.join("after.txt")).unwrap(),
        "still here"
    );
}

#[test]
fn test_unsupported_extension() {
    let temp = TempDir::new().unwrap();
    let archive = write_archive(temp.path(), "data.rar", b"Rar!");

    let err = extract_archive(&archive, temp.path().join("out")).unwrap_err();
    assert!(matches!(
        err,
        ExtractionError::UnsupportedExtension { ref extension } if extension == ".rar"
    ));
}

#[test]
fn test_extensions_are_case_sensitive() {
    let temp = TempDir::new().unwrap();
    let archive = write_archive(temp.path(), "DATA.TAR", &sample_tar());
    assert!(extract_archive(&archive, temp.path().join("out")).is_err());
}

#[test]
fn test_missing_source() {
    let temp = TempDir::new().unwrap();
    let err = extract_archive(temp.path().join("absent.tar"), temp.path().join("out"))
        .unwrap_err();
    assert!(matches!(err, ExtractionError::SourceUnreadable { .. }));
}

#[test]
fn test_truncated_xz_is_decode_error() {
    let temp = TempDir::new().unwrap();
    // Poorly compressible payload so the cut lands inside the file data.
    let mut state = 0x2545_f491_u32;
    let payload: Vec<u8> = (0..16 * 1024)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state.to_le_bytes()[0]
        })
        .collect();
    let tar = TarTestBuilder::new()
        .add_file("noise.bin", &payload, 0o644)
        .build();
    let full = compress(Scheme::Xz, &tar);
    let archive = write_archive(temp.path(), "cut.xz", &full[..full.len() / 2]);

    let err = extract_archive(&archive, temp.path().join("out")).unwrap_err();
    assert!(matches!(
        err,
        ExtractionError::Decode {
            scheme: Scheme::Xz,
            ..
        }
    ));
}

#[test]
fn test_wrong_payload_for_zstd_fails_before_output() {
    let temp = TempDir::new().unwrap();
    let archive = write_archive(temp.path(), "plain.zst", &sample_tar());
    let out = temp.path().join("out");

    let err = extract_archive(&archive, &out).unwrap_err();
    assert_eq!(err.scheme(), Some(Scheme::Zstd));
    assert!(!out.exists());
}

#[test]
fn test_path_traversal_rejected_by_default() {
    let temp = TempDir::new().unwrap();
    let data = TarTestBuilder::new()
        .add_file("../escape.txt", b"x", 0o644)
        .build();
    let archive = write_archive(temp.path(), "evil.tar", &data);
    let out = temp.path().join("out");

    let err = extract_archive(&archive, &out).unwrap_err();
    assert!(matches!(err, ExtractionError::PathTraversal { .. }));
    assert!(!temp.path().join("escape.txt").exists());
}

#[test]
fn test_verbatim_policy_follows_parent_components() {
    let temp = TempDir::new().unwrap();
    let data = TarTestBuilder::new()
        .add_file("../beside.txt", b"x", 0o644)
        .build();
    let archive = write_archive(temp.path(), "evil.tar", &data);
    let out = temp.path().join("out");

    let options = ExtractOptions::default().with_path_policy(PathPolicy::Verbatim);
    extract_archive_with_options(&archive, &out, &options).unwrap();
    assert!(temp.path().join("beside.txt").exists());
}

#[test]
fn test_absolute_names_land_under_destination() {
    let temp = TempDir::new().unwrap();
    let data = TarTestBuilder::new()
        .add_file("/abs/file.txt", b"x", 0o644)
        .build();
    let archive = write_archive(temp.path(), "abs.tar", &data);
    let out = temp.path().join("out");

    extract_archive(&archive, &out).unwrap();
    assert!(out.join("abs/file.txt").exists());
}

#[test]
fn test_continue_policy_skips_failed_entries() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("out");
    fs::create_dir_all(out.join("blocked")).unwrap();

    let data = TarTestBuilder::new()
        .add_file("blocked", b"cannot replace a directory", 0o644)
        .add_file("../escape.txt", b"x", 0o644)
        .add_file("fine.txt", b"ok", 0o644)
        .build();
    let archive = write_archive(temp.path(), "mixed.tar", &data);

    let options = ExtractOptions::default().with_error_policy(ErrorPolicy::Continue);
    let report = extract_archive_with_options(&archive, &out, &options).unwrap();

    assert_eq!(report.entries_failed, 2);
    assert_eq!(report.warnings.len(), 2);
    assert_eq!(report.files_extracted, 1);
    assert_eq!(fs::read_to_string(out.join("fine.txt")).unwrap(), "ok");
}

#[test]
fn test_preserve_permissions_disabled() {
    let temp = TempDir::new().unwrap();
    let data = TarTestBuilder::new()
        .add_file("tool.sh", b"#!/bin/sh", 0o755)
        .build();
    let archive = write_archive(temp.path(), "tools.tar", &data);
    let out = temp.path().join("out");

    let options = ExtractOptions::default().with_preserve_permissions(false);
    extract_archive_with_options(&archive, &out, &options).unwrap();
    #[cfg(unix)]
    assert_eq!(mode_of(&out.join("tool.sh")), 0o644);
}
