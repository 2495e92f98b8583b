use dlsort::actions::DeleteMode;
use dlsort::config::{Config, ENV_PREFIX};
use dlsort::scanner::{HashAlgorithm, ListingOrder};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

#[test]
fn test_config_load_defaults() {
    // Use figment directly without Env to avoid interference from other tests
    let figment = Figment::from(Serialized::defaults(Config::default()));
    let config: Config = figment.extract().unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_load_from_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let toml_content = r#"
base_dir = "/srv/inbox"
listing_order = "name"
algorithm = "blake3"
delete_mode = "trash"
fallback_category = "Misc"

[categories]
Images = [".heic", "PNG"]
Fonts = [".ttf", ".otf"]
"#;
    fs::write(&config_path, toml_content).unwrap();

    let figment =
        Figment::from(Serialized::defaults(Config::default())).merge(Toml::file(&config_path));
    let config: Config = figment.extract().unwrap();

    assert_eq!(config.base_dir, Some(PathBuf::from("/srv/inbox")));
    assert_eq!(config.listing_order, ListingOrder::Name);
    assert_eq!(config.algorithm, HashAlgorithm::Blake3);
    assert_eq!(config.delete_mode, DeleteMode::Trash);
    assert_eq!(config.fallback_category, "Misc");

    // Listed categories replace the stock entry, the rest are kept
    assert_eq!(config.categories["Images"], vec![".heic", "PNG"]);
    assert_eq!(config.categories["Fonts"], vec![".ttf", ".otf"]);
    assert!(config.categories.contains_key("Music"));
    assert_eq!(config.categories.len(), 9);

    let categories = config.category_config(None).unwrap();
    assert_eq!(categories.base_dir, PathBuf::from("/srv/inbox"));
    assert_eq!(categories.category_for(Path::new("x.png")), "Images");
    assert_eq!(categories.category_for(Path::new("x.jpg")), "Misc");
    assert_eq!(categories.category_for(Path::new("x.OTF")), "Fonts");
}

#[test]
fn test_config_load_from_env() {
    std::env::set_var("DLSORTTEST_FALLBACK_CATEGORY", "Unsorted");

    let figment = Figment::from(Serialized::defaults(Config::default()))
        .merge(Env::prefixed("DLSORTTEST_").split("__"));
    let config: Config = figment.extract().unwrap();
    assert_eq!(config.fallback_category, "Unsorted");

    std::env::remove_var("DLSORTTEST_FALLBACK_CATEGORY");
    assert_eq!(ENV_PREFIX, "DLSORT_");
}

#[test]
fn test_load_from_missing_file_uses_defaults() {
    let temp_dir = tempdir().unwrap();
    let config = Config::load_from(Some(&temp_dir.path().join("absent.toml"))).unwrap();
    assert_eq!(config.categories.len(), 8);
}

#[test]
fn test_load_from_invalid_value_fails() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "algorithm = \"md5\"\n").unwrap();

    let err = Config::load_from(Some(&config_path)).unwrap_err();
    assert!(err.to_string().contains("invalid configuration"));
}

#[test]
fn test_save_writes_loadable_file() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("dlsort").join("config.toml");

    Config::default().save_to(&config_path).unwrap();
    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[categories]"));
    assert!(content.contains("algorithm = \"sha256\""));

    let loaded = Config::load_from(Some(&config_path)).unwrap();
    assert_eq!(loaded.categories, Config::default().categories);
}

#[test]
fn test_env_category_override_keeps_existing_case() {
    std::env::set_var("DLSORTCASE_CATEGORIES__IMAGES", "[\".heic\"]");
    std::env::set_var("DLSORTCASE_CATEGORIES__RAW", "[\".cr2\"]");
    std::env::set_var("DLSORTCASE_LISTING_ORDER", "name");

    let known = Config::default().categories.into_keys().collect();
    let figment = Figment::from(Serialized::defaults(Config::default()))
        .merge(Config::env_provider("DLSORTCASE_", known));
    let config: Config = figment.extract().unwrap();

    std::env::remove_var("DLSORTCASE_CATEGORIES__IMAGES");
    std::env::remove_var("DLSORTCASE_CATEGORIES__RAW");
    std::env::remove_var("DLSORTCASE_LISTING_ORDER");

    assert_eq!(config.categories["Images"], vec![".heic"]);
    assert!(!config.categories.contains_key("images"));
    assert!(!config.categories.contains_key("IMAGES"));
    assert_eq!(config.categories["RAW"], vec![".cr2"]);
    assert_eq!(config.categories.len(), 9);
    assert_eq!(config.listing_order, ListingOrder::Name);
}

#[test]
fn test_load_from_rejects_escaping_category_names() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "fallback_category = \"..\"\n").unwrap();

    // Loading succeeds; the folder names are checked when the table is built
    let config = Config::load_from(Some(&config_path)).unwrap();
    let err = config.category_config(Some(temp_dir.path())).unwrap_err();
    assert!(err.to_string().contains("invalid category folder name"));
}
