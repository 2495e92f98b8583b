//! Extension-to-category mapping.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

/// Name of the folder that receives files no category claims.
pub const DEFAULT_FALLBACK: &str = "Others";

/// The stock category table.
#[must_use]
pub fn default_categories() -> BTreeMap<String, Vec<String>> {
    let table: [(&str, &[&str]); 8] = [
        ("Books", &[".epub", ".mobi"]),
        ("Images", &[".jpg", ".jpeg", ".png", ".gif", ".svg"]),
        ("Videos", &[".mov", ".avi", ".mp4"]),
        (
            "Documents",
            &[
                ".doc", ".docx", ".txt", ".pdf", ".xlsx", ".xls", ".ppt", ".pptx", ".csv",
            ],
        ),
        ("Applications", &[".exe", ".pkg", ".deb", ".dmg", ".apk"]),
        ("Compressed", &[".zip", ".tar", ".bz2", ".rar"]),
        ("Music", &[".mp3", ".wav", ".ogg", ".midi"]),
        (
            "Code",
            &[
                ".go", ".py", ".ts", ".tsx", ".html", ".css", ".java", ".cpp", ".h", ".c", ".rb",
                ".php", ".json", ".sql",
            ],
        ),
    ];

    table
        .iter()
        .map(|(name, exts)| {
            (
                (*name).to_string(),
                exts.iter().map(|e| (*e).to_string()).collect(),
            )
        })
        .collect()
}

/// One category folder and the extensions it claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Folder name under the base directory
    pub name: String,
    /// Normalized extensions: lowercase, leading dot
    pub extensions: Vec<String>,
}

/// Where files go: base directory, categories, fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryConfig {
    /// Directory being organized
    pub base_dir: PathBuf,
    /// Categories in lookup order
    pub categories: Vec<Category>,
    /// Folder for files no category claims
    pub fallback: String,
}

impl CategoryConfig {
    /// Build a category table, normalizing every extension.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryError::InvalidName`] if a category or the fallback
    /// is not a single folder name, and [`CategoryError::FallbackIsCategory`]
    /// if the fallback is also a category.
    pub fn new(
        base_dir: PathBuf,
        categories: &BTreeMap<String, Vec<String>>,
        fallback: impl Into<String>,
    ) -> Result<Self, CategoryError> {
        let fallback = fallback.into();

        if let Some(bad) = categories
            .keys()
            .chain(std::iter::once(&fallback))
            .find(|name| !is_folder_name(name))
        {
            return Err(CategoryError::InvalidName(bad.clone()));
        }
        if categories.contains_key(&fallback) {
            return Err(CategoryError::FallbackIsCategory(fallback));
        }

        Ok(Self::build(base_dir, categories, fallback))
    }

    fn build(
        base_dir: PathBuf,
        categories: &BTreeMap<String, Vec<String>>,
        fallback: String,
    ) -> Self {
        let categories = categories
            .iter()
            .map(|(name, exts)| Category {
                name: name.clone(),
                extensions: exts
                    .iter()
                    .map(|e| normalize_extension(e))
                    .filter(|e| e.len() > 1)
                    .collect(),
            })
            .collect();

        Self {
            base_dir,
            categories,
            fallback,
        }
    }

    /// The stock table rooted at `base_dir`.
    #[must_use]
    pub fn with_defaults(base_dir: PathBuf) -> Self {
        Self::build(base_dir, &default_categories(), DEFAULT_FALLBACK.to_string())
    }

    /// Category name for a file, by case-insensitive extension.
    #[must_use]
    pub fn category_for(&self, path: &Path) -> &str {
        let Some(ext) = path.extension() else {
            return &self.fallback;
        };
        let ext = format!(".{}", ext.to_string_lossy().to_lowercase());

        self.categories
            .iter()
            .find(|c| c.extensions.iter().any(|e| *e == ext))
            .map_or(self.fallback.as_str(), |c| c.name.as_str())
    }

    /// Every folder name, categories first, fallback last.
    pub fn folder_names(&self) -> impl Iterator<Item = &str> {
        self.categories
            .iter()
            .map(|c| c.name.as_str())
            .chain(std::iter::once(self.fallback.as_str()))
    }

    /// Absolute folder path for a category name.
    #[must_use]
    pub fn folder(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }
}

/// A category table that would put folders outside the base directory.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CategoryError {
    /// Empty, `.`, `..`, absolute, or containing a separator.
    #[error("invalid category folder name {0:?}: expected a single folder name")]
    InvalidName(String),

    /// The fallback would be deduplicated twice.
    #[error("fallback category {0:?} is also a category")]
    FallbackIsCategory(String),
}

/// Whether `name` is exactly one normal path component.
fn is_folder_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Lowercase an extension and make sure it starts with a dot.
#[must_use]
pub fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{ext}")
    }
}
