use dlsort::actions::DryRunDeleter;
use dlsort::duplicates::{DuplicateResolver, Phase, ResolveError, ResolverConfig};
use dlsort::progress::ProgressCallback;
use dlsort::scanner::{HashAlgorithm, ListingOrder};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::tempdir;

fn by_name() -> ResolverConfig {
    ResolverConfig::default().with_order(ListingOrder::Name)
}

fn remaining(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_identical_pair_keeps_one() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "hello").unwrap();
    fs::write(dir.path().join("b.txt"), "hello").unwrap();

    let resolution = DuplicateResolver::permanent(ResolverConfig::default())
        .resolve(dir.path())
        .unwrap();

    assert_eq!(resolution.deleted.len(), 1);
    assert_eq!(remaining(dir.path()).len(), 1);
    assert_eq!(resolution.bytes_reclaimed, 5);
}

#[test]
fn test_distinct_files_untouched() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "hello").unwrap();
    fs::write(dir.path().join("b.txt"), "world").unwrap();

    let resolution = DuplicateResolver::with_defaults().resolve(dir.path()).unwrap();

    assert!(resolution.deleted.is_empty());
    assert!(resolution.groups.is_empty());
    assert_eq!(resolution.originals.len(), 2);
    assert_eq!(remaining(dir.path()), vec!["a.txt", "b.txt"]);
}

#[test]
fn test_three_copies_one_group() {
    let dir = tempdir().unwrap();
    for name in ["a.txt", "b.txt", "c.txt"] {
        fs::write(dir.path().join(name), "same").unwrap();
    }

    let resolution = DuplicateResolver::permanent(by_name())
        .resolve(dir.path())
        .unwrap();

    assert_eq!(resolution.groups.len(), 1);
    let group = resolution.groups.iter().next().unwrap();
    assert_eq!(group.original, dir.path().join("a.txt"));
    assert_eq!(
        group.duplicates,
        vec![dir.path().join("b.txt"), dir.path().join("c.txt")]
    );
    assert_eq!(remaining(dir.path()), vec!["a.txt"]);
}

#[test]
fn test_subdirectories_not_descended() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    fs::write(sub.join("a.txt"), "pair").unwrap();
    fs::write(dir.path().join("a.txt"), "pair").unwrap();
    fs::write(dir.path().join("b.txt"), "pair").unwrap();

    let resolution = DuplicateResolver::permanent(by_name())
        .resolve(dir.path())
        .unwrap();

    assert_eq!(resolution.files_scanned, 2);
    assert_eq!(resolution.deleted, vec![dir.path().join("b.txt")]);
    assert!(sub.join("a.txt").exists());
    assert_eq!(remaining(dir.path()), vec!["a.txt", "sub"]);
}

/// Removes `victim` as soon as the first file has been fingerprinted.
struct VanishingFile {
    victim: Mutex<Option<PathBuf>>,
}

impl ProgressCallback for VanishingFile {
    fn on_phase_start(&self, _phase: &str, _total: usize) {}

    fn on_progress(&self, _current: usize, _path: &str) {
        if let Some(victim) = self.victim.lock().unwrap().take() {
            fs::remove_file(victim).unwrap();
        }
    }

    fn on_phase_end(&self, _phase: &str) {}
}

#[test]
fn test_file_vanishing_mid_pass_aborts() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "x").unwrap();
    fs::write(dir.path().join("b.txt"), "y").unwrap();
    fs::write(dir.path().join("c.txt"), "x").unwrap();

    let callback = std::sync::Arc::new(VanishingFile {
        victim: Mutex::new(Some(dir.path().join("b.txt"))),
    });
    let resolver = DuplicateResolver::permanent(by_name().with_progress_callback(callback));

    let err = resolver.resolve(dir.path()).unwrap_err();
    assert!(matches!(err, ResolveError::Open { .. }));
    assert_eq!(err.path(), dir.path().join("b.txt"));
    assert_eq!(err.phase(), Phase::Fingerprinting);

    // c.txt duplicates a.txt but was never reached
    assert_eq!(remaining(dir.path()), vec!["a.txt", "c.txt"]);
}

#[cfg(unix)]
#[test]
fn test_broken_symlink_aborts_before_deleting() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "x").unwrap();
    fs::write(dir.path().join("b.txt"), "x").unwrap();
    std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("c.lnk")).unwrap();

    let err = DuplicateResolver::permanent(by_name())
        .resolve(dir.path())
        .unwrap_err();

    assert!(matches!(err, ResolveError::Open { .. }));
    assert_eq!(err.path(), dir.path().join("c.lnk"));
    assert!(dir.path().join("b.txt").exists());
}

#[cfg(unix)]
#[test]
fn test_directory_symlink_is_skipped() {
    let dir = tempdir().unwrap();
    let target = tempdir().unwrap();
    fs::write(target.path().join("inner.txt"), "x").unwrap();
    fs::write(dir.path().join("a.txt"), "x").unwrap();
    fs::write(dir.path().join("b.txt"), "x").unwrap();
    std::os::unix::fs::symlink(target.path(), dir.path().join("linked")).unwrap();

    let resolution = DuplicateResolver::permanent(by_name())
        .resolve(dir.path())
        .unwrap();

    assert_eq!(resolution.files_scanned, 2);
    assert_eq!(resolution.deleted, vec![dir.path().join("b.txt")]);
    assert_eq!(remaining(dir.path()), ["a.txt", "linked"]);
    assert!(dir.path().join("linked").is_dir());
    assert!(target.path().join("inner.txt").exists());
}

#[test]
fn test_delete_failure_stops_without_rollback() {
    let dir = tempdir().unwrap();
    for name in ["a.txt", "b.txt", "c.txt", "d.txt"] {
        fs::write(dir.path().join(name), "same").unwrap();
    }

    let blocked = dir.path().join("c.txt");
    let deleter = move |path: &Path| -> io::Result<()> {
        if path == blocked {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "locked"));
        }
        fs::remove_file(path)
    };

    let err = DuplicateResolver::new(by_name(), deleter)
        .resolve(dir.path())
        .unwrap_err();

    assert!(matches!(err, ResolveError::Delete { .. }));
    assert_eq!(err.path(), dir.path().join("c.txt"));
    assert!(err.to_string().contains("locked"));
    assert_eq!(remaining(dir.path()), vec!["a.txt", "c.txt", "d.txt"]);
}

#[test]
fn test_dry_run_leaves_files() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "same").unwrap();
    fs::write(dir.path().join("b.txt"), "same").unwrap();

    let resolver = DuplicateResolver::new(by_name(), DryRunDeleter);
    assert!(resolver.is_dry_run());

    let resolution = resolver.resolve(dir.path()).unwrap();
    assert!(resolution.dry_run);
    assert_eq!(resolution.deleted, vec![dir.path().join("b.txt")]);
    assert_eq!(remaining(dir.path()), vec!["a.txt", "b.txt"]);
}

#[test]
fn test_plan_does_not_delete() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "same").unwrap();
    fs::write(dir.path().join("b.txt"), "same").unwrap();

    let resolver = DuplicateResolver::permanent(by_name());
    let plan = resolver.plan(dir.path()).unwrap();
    assert!(!plan.is_empty());
    assert_eq!(remaining(dir.path()).len(), 2);

    let resolution = resolver.apply(plan).unwrap();
    assert_eq!(resolution.deleted.len(), 1);
    assert_eq!(remaining(dir.path()), vec!["a.txt"]);
}

#[test]
fn test_modified_order_keeps_oldest() {
    let dir = tempdir().unwrap();
    let newer = dir.path().join("a.txt");
    let older = dir.path().join("z.txt");
    fs::write(&newer, "same").unwrap();
    fs::write(&older, "same").unwrap();
    filetime::set_file_mtime(&older, filetime::FileTime::from_unix_time(1_000_000, 0)).unwrap();
    filetime::set_file_mtime(&newer, filetime::FileTime::from_unix_time(2_000_000, 0)).unwrap();

    let config = ResolverConfig::default().with_order(ListingOrder::Modified);
    DuplicateResolver::permanent(config)
        .resolve(dir.path())
        .unwrap();

    assert_eq!(remaining(dir.path()), vec!["z.txt"]);
}

#[test]
fn test_blake3_groups_the_same_files() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.bin"), [0u8; 100_000]).unwrap();
    fs::write(dir.path().join("b.bin"), [0u8; 100_000]).unwrap();
    fs::write(dir.path().join("c.bin"), [1u8; 100_000]).unwrap();

    let config = by_name().with_algorithm(HashAlgorithm::Blake3);
    let resolution = DuplicateResolver::new(config, DryRunDeleter)
        .resolve(dir.path())
        .unwrap();

    let group = resolution.groups.iter().next().unwrap();
    assert_eq!(group.fingerprint.algorithm(), HashAlgorithm::Blake3);
    assert_eq!(group.duplicates, vec![dir.path().join("b.bin")]);
    assert_eq!(resolution.bytes_reclaimed, 100_000);
}

#[test]
fn test_missing_directory_is_directory_read_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");

    let err = DuplicateResolver::with_defaults().resolve(&missing).unwrap_err();
    assert!(matches!(err, ResolveError::DirectoryRead { .. }));
    assert_eq!(err.phase(), Phase::Listing);
}

#[test]
fn test_empty_directory() {
    let dir = tempdir().unwrap();
    let resolution = DuplicateResolver::with_defaults().resolve(dir.path()).unwrap();
    assert_eq!(resolution.files_scanned, 0);
    assert!(resolution.originals.is_empty());
}
