//! Best-effort project images: one alternate filename, then a placeholder.

use std::path::{Component, Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

static EXTENSION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\.[a-zA-Z0-9]+)$").expect("valid extension regex"));

const ALT_SUFFIX: &str = "_1";

/// `projects/a.png` -> `projects/a_1.png`. Paths without an extension have
/// no alternate.
pub fn alternate_path(path: &str) -> Option<String> {
    if !EXTENSION_PATTERN.is_match(path) {
        return None;
    }
    Some(
        EXTENSION_PATTERN
            .replace(path, format!("{ALT_SUFFIX}$1").as_str())
            .into_owned(),
    )
}

/// Load-failure state for one image slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFallback {
    src: Option<String>,
    tried_alt: bool,
    failed: bool,
}

impl ImageFallback {
    pub fn new(src: Option<&str>) -> Self {
        let src = src.filter(|s| !s.is_empty()).map(str::to_string);
        Self {
            failed: src.is_none(),
            src,
            tried_alt: false,
        }
    }

    /// Source to request next, or `None` once the placeholder is showing.
    pub fn current(&self) -> Option<&str> {
        if self.failed {
            None
        } else {
            self.src.as_deref()
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.current().is_none()
    }

    /// Records a load failure of the current source.
    pub fn on_error(&mut self) {
        let Some(src) = self.src.as_deref().filter(|_| !self.failed) else {
            return;
        };
        let marker = format!("{ALT_SUFFIX}.");
        if !self.tried_alt && !src.contains(&marker) {
            if let Some(alt) = alternate_path(src) {
                self.tried_alt = true;
                self.src = Some(alt);
                return;
            }
        }
        self.failed = true;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageResolution {
    /// Asset-relative path that exists, or `None` for the placeholder.
    pub src: Option<String>,
    pub placeholder: bool,
    pub attempts: Vec<String>,
}

/// Resolves image paths against the asset directory on disk.
#[derive(Debug, Clone)]
pub struct AssetResolver {
    root: PathBuf,
}

impl AssetResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walks the fallback sequence, treating a missing file as a load failure.
    pub async fn resolve(&self, image: Option<&str>) -> ImageResolution {
        let mut fallback = ImageFallback::new(image);
        let mut attempts = Vec::new();

        while let Some(src) = fallback.current().map(str::to_string) {
            attempts.push(src.clone());
            if self.exists(&src).await {
                return ImageResolution {
                    src: Some(src),
                    placeholder: false,
                    attempts,
                };
            }
            debug!("Image '{src}' not found under {}", self.root.display());
            fallback.on_error();
        }

        ImageResolution {
            src: None,
            placeholder: fallback.is_placeholder(),
            attempts,
        }
    }

    async fn exists(&self, relative: &str) -> bool {
        let Some(path) = self.contained_path(relative) else {
            return false;
        };
        tokio::fs::metadata(&path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
    }

    /// Joins `relative` under the root, refusing anything that escapes it.
    fn contained_path(&self, relative: &str) -> Option<PathBuf> {
        let relative = Path::new(relative.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        (!escapes).then(|| self.root.join(relative))
    }
}
