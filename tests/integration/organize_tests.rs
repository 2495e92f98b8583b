use dlsort::actions::DryRunDeleter;
use dlsort::duplicates::{DuplicateResolver, ResolverConfig};
use dlsort::organize::{CategoryConfig, FolderStatus, Organizer};
use dlsort::scanner::ListingOrder;
use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tempfile::tempdir;

fn resolver() -> DuplicateResolver {
    DuplicateResolver::permanent(ResolverConfig::default().with_order(ListingOrder::Name))
}

fn status_of<'a>(report: &'a dlsort::organize::RunReport, category: &str) -> &'a FolderStatus {
    &report
        .folders
        .iter()
        .find(|f| f.category == category)
        .unwrap()
        .status
}

fn count_files(dir: &Path) -> usize {
    fs::read_dir(dir).unwrap().count()
}

#[test]
fn test_full_run_sorts_and_dedupes() {
    let dir = tempdir().unwrap();
    let base = dir.path();
    fs::write(base.join("a.jpg"), "pixels").unwrap();
    fs::write(base.join("b.JPG"), "pixels").unwrap();
    fs::write(base.join("report.pdf"), "text").unwrap();
    fs::write(base.join("notes.xyz"), "misc").unwrap();
    fs::write(base.join("README"), "no extension").unwrap();
    fs::create_dir(base.join("projects")).unwrap();
    fs::write(base.join("projects").join("main.go"), "package main").unwrap();

    let organizer = Organizer::new(CategoryConfig::with_defaults(base.to_path_buf()));
    let report = organizer.run(&resolver()).unwrap();

    assert_eq!(report.organize.moved.len(), 5);
    assert!(report.organize.failed.is_empty());
    assert!(!report.interrupted);
    assert!(!report.has_failures());

    assert!(base.join("Images").join("a.jpg").exists());
    assert!(!base.join("Images").join("b.JPG").exists());
    assert!(base.join("Documents").join("report.pdf").exists());
    assert!(base.join("Others").join("notes.xyz").exists());
    assert!(base.join("Others").join("README").exists());
    assert!(base.join("projects").join("main.go").exists());
    assert_eq!(report.duplicates_removed(), 1);
    assert_eq!(report.bytes_reclaimed(), 6);
}

#[test]
fn test_every_folder_is_processed() {
    let dir = tempdir().unwrap();
    let config = CategoryConfig::with_defaults(dir.path().to_path_buf());
    let expected: Vec<String> = config.folder_names().map(str::to_string).collect();

    let report = Organizer::new(config).run(&resolver()).unwrap();
    let processed: Vec<String> = report.folders.iter().map(|f| f.category.clone()).collect();

    assert_eq!(processed, expected);
    assert!(report
        .folders
        .iter()
        .all(|f| matches!(f.status, FolderStatus::Resolved(_))));
}

#[test]
fn test_existing_target_is_not_overwritten() {
    let dir = tempdir().unwrap();
    let base = dir.path();
    fs::create_dir(base.join("Documents")).unwrap();
    fs::write(base.join("Documents").join("cv.pdf"), "old").unwrap();
    fs::write(base.join("cv.pdf"), "new").unwrap();

    let organizer = Organizer::new(CategoryConfig::with_defaults(base.to_path_buf()));
    organizer.ensure_folders().unwrap();
    let summary = organizer.organize().unwrap();

    assert_eq!(summary.skipped, vec![base.join("cv.pdf")]);
    assert_eq!(
        fs::read_to_string(base.join("Documents").join("cv.pdf")).unwrap(),
        "old"
    );
    assert_eq!(fs::read_to_string(base.join("cv.pdf")).unwrap(), "new");
}

#[cfg(unix)]
#[test]
fn test_failing_folder_does_not_stop_others() {
    let dir = tempdir().unwrap();
    let base = dir.path();
    let config = CategoryConfig::with_defaults(base.to_path_buf());
    let organizer = Organizer::new(config);
    organizer.ensure_folders().unwrap();

    std::os::unix::fs::symlink(base.join("gone"), base.join("Images").join("broken.png"))
        .unwrap();
    fs::write(base.join("Music").join("a.mp3"), "tune").unwrap();
    fs::write(base.join("Music").join("b.mp3"), "tune").unwrap();

    let report = organizer.run(&resolver()).unwrap();

    assert!(matches!(status_of(&report, "Images"), FolderStatus::Failed(_)));
    assert!(matches!(status_of(&report, "Music"), FolderStatus::Resolved(_)));
    assert_eq!(count_files(&base.join("Music")), 1);
    assert!(report.has_failures());
}

#[test]
fn test_shutdown_skips_remaining_folders() {
    let dir = tempdir().unwrap();
    let base = dir.path();
    fs::write(base.join("a.zip"), "archive").unwrap();

    let flag = Arc::new(AtomicBool::new(true));
    let organizer =
        Organizer::new(CategoryConfig::with_defaults(base.to_path_buf())).with_shutdown_flag(flag);
    let report = organizer.run(&resolver()).unwrap();

    assert!(report.interrupted);
    assert!(report
        .folders
        .iter()
        .all(|f| matches!(f.status, FolderStatus::Skipped)));
    assert!(base.join("Compressed").join("a.zip").exists());
}

#[test]
fn test_dry_run_removes_nothing() {
    let dir = tempdir().unwrap();
    let base = dir.path();
    fs::write(base.join("a.txt"), "same").unwrap();
    fs::write(base.join("b.txt"), "same").unwrap();

    let organizer = Organizer::new(CategoryConfig::with_defaults(base.to_path_buf()));
    let report = organizer
        .run(&DuplicateResolver::new(ResolverConfig::default(), DryRunDeleter))
        .unwrap();

    assert_eq!(report.duplicates_removed(), 1);
    assert_eq!(count_files(&base.join("Documents")), 2);
}

#[test]
fn test_missing_base_directory() {
    let dir = tempdir().unwrap();
    let organizer = Organizer::new(CategoryConfig::with_defaults(dir.path().join("nope")));

    // ensure_folders creates the base directory along with the categories
    let report = organizer.run(&resolver()).unwrap();
    assert!(report.organize.moved.is_empty());
    assert!(dir.path().join("nope").join("Others").is_dir());
}
