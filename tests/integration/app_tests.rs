use clap::Parser;
use dlsort::cli::Cli;
use dlsort::error::ExitCode;
use dlsort::run_app;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn run(args: &[&str], config: &Path) -> anyhow::Result<ExitCode> {
    let mut argv = vec!["dlsort", "--quiet", "--no-color", "--config"];
    let config = config.to_string_lossy().into_owned();
    argv.push(&config);
    argv.extend_from_slice(args);
    run_app(Cli::try_parse_from(argv).unwrap())
}

#[test]
fn test_dedupe_reports_no_duplicates() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "hello").unwrap();
    fs::write(dir.path().join("b.txt"), "world").unwrap();
    let data = dir.path().to_string_lossy().into_owned();

    let code = run(&["dedupe", &data], &dir.path().join("none.toml")).unwrap();
    assert_eq!(code, ExitCode::NoDuplicates);
}

#[test]
fn test_dedupe_removes_duplicates() {
    let dir = tempdir().unwrap();
    let data_dir = dir.path().join("data");
    fs::create_dir(&data_dir).unwrap();
    fs::write(data_dir.join("a.txt"), "hello").unwrap();
    fs::write(data_dir.join("b.txt"), "hello").unwrap();
    let data = data_dir.to_string_lossy().into_owned();

    let code = run(
        &["dedupe", &data, "--order", "name", "--output", "json"],
        &dir.path().join("none.toml"),
    )
    .unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(data_dir.join("a.txt").exists());
    assert!(!data_dir.join("b.txt").exists());
}

#[test]
fn test_dedupe_dry_run_keeps_files() {
    let dir = tempdir().unwrap();
    let data_dir = dir.path().join("data");
    fs::create_dir(&data_dir).unwrap();
    fs::write(data_dir.join("a.txt"), "hello").unwrap();
    fs::write(data_dir.join("b.txt"), "hello").unwrap();
    let data = data_dir.to_string_lossy().into_owned();

    let code = run(&["dedupe", &data, "--dry-run"], &dir.path().join("none.toml")).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(data_dir.join("b.txt").exists());
}

#[test]
fn test_dedupe_missing_directory_is_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing").to_string_lossy().into_owned();

    let err = run(&["dedupe", &missing], &dir.path().join("none.toml")).unwrap_err();
    assert!(format!("{err:#}").contains("cannot read directory"));
}

#[test]
fn test_run_uses_config_base_dir() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("Downloads");
    fs::create_dir(&base).unwrap();
    fs::write(base.join("song.mp3"), "tune").unwrap();
    fs::write(base.join("song (1).mp3"), "tune").unwrap();

    let config_path = dir.path().join("config.toml");
    fs::write(
        &config_path,
        format!("base_dir = {:?}\nlisting_order = \"name\"\n", base.to_string_lossy()),
    )
    .unwrap();

    let code = run(&["run"], &config_path).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert_eq!(fs::read_dir(base.join("Music")).unwrap().count(), 1);
    assert!(base.join("Music").join("song (1).mp3").exists());
}

#[test]
fn test_organize_only_moves() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("dl");
    fs::create_dir(&base).unwrap();
    fs::write(base.join("a.zip"), "same").unwrap();
    fs::write(base.join("b.zip"), "same").unwrap();
    let base_arg = base.to_string_lossy().into_owned();

    let code = run(&["organize", &base_arg], &dir.path().join("none.toml")).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(base.join("Compressed").join("a.zip").exists());
    assert!(base.join("Compressed").join("b.zip").exists());
}

#[test]
fn test_hash_missing_file_is_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.bin").to_string_lossy().into_owned();

    let err = run(&["hash", &missing], &dir.path().join("none.toml")).unwrap_err();
    assert!(err.to_string().contains("cannot open"));
}

#[test]
fn test_hash_prints_fingerprint() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("a.txt");
    fs::write(&file, "hello").unwrap();
    let file_arg = file.to_string_lossy().into_owned();

    let code = run(&["hash", &file_arg], &dir.path().join("none.toml")).unwrap();
    assert_eq!(code, ExitCode::Success);
}

#[test]
fn test_init_config_refuses_overwrite() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("conf").join("config.toml");

    assert_eq!(run(&["init-config"], &config_path).unwrap(), ExitCode::Success);
    assert!(fs::read_to_string(&config_path)
        .unwrap()
        .contains("fallback_category = \"Others\""));

    let err = run(&["init-config"], &config_path).unwrap_err();
    assert!(err.to_string().contains("--force"));

    assert_eq!(
        run(&["init-config", "--force"], &config_path).unwrap(),
        ExitCode::Success
    );
}

#[test]
fn test_invalid_config_is_error() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "listing_order = \"random\"\n").unwrap();
    let data = dir.path().to_string_lossy().into_owned();

    let err = run(&["dedupe", &data], &config_path).unwrap_err();
    assert!(err.to_string().contains("Failed to load configuration"));
}

#[test]
fn test_run_refuses_fallback_outside_category_folders() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("dl");
    fs::create_dir(&base).unwrap();
    fs::write(base.join("a.unknown"), "same").unwrap();
    fs::write(base.join("b.unknown"), "same").unwrap();

    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "fallback_category = \"\"\n").unwrap();
    let base_arg = base.to_string_lossy().into_owned();

    let err = run(&["run", &base_arg], &config_path).unwrap_err();

    assert!(format!("{err:#}").contains("invalid category folder name"));
    assert!(base.join("a.unknown").exists());
    assert!(base.join("b.unknown").exists());
}
