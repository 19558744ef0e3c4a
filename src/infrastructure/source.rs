//! Company data sources: embedded sample and data directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::LOCAL_CONFIG_FILE;
use crate::domain::Company;
use crate::infrastructure::traits::{FileSystem, OrgSource};

/// Slug of the embedded sample company.
pub const BUILTIN_SLUG: &str = "general-hospital";

const BUILTIN_JSON: &str = include_str!("../../data/general-hospital.json");

/// Serves the embedded sample hierarchy.
#[derive(Debug, Default)]
pub struct BuiltinSource;

impl OrgSource for BuiltinSource {
    fn list(&self) -> ApplicationResult<Vec<String>> {
        Ok(vec![BUILTIN_SLUG.to_string()])
    }

    fn load(&self, slug: &str) -> ApplicationResult<Company> {
        if slug != BUILTIN_SLUG {
            return Err(ApplicationError::CompanyNotFound(slug.to_string()));
        }
        serde_json::from_str(BUILTIN_JSON)
            .with_path_context("parse embedded company", Path::new(BUILTIN_SLUG))
    }
}

/// File formats accepted in a data directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(Format::Json),
            "toml" => Some(Format::Toml),
            _ => None,
        }
    }
}

/// Reads `<slug>.json` or `<slug>.toml` files from a directory.
pub struct DirectorySource {
    fs: Arc<dyn FileSystem>,
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(fs: Arc<dyn FileSystem>, dir: impl Into<PathBuf>) -> Self {
        Self { fs, dir: dir.into() }
    }

    fn company_files(&self) -> ApplicationResult<Vec<PathBuf>> {
        if !self.fs.is_dir(&self.dir) {
            return Ok(Vec::new());
        }
        let files = self
            .fs
            .list_files(&self.dir)
            .with_path_context("list data directory", &self.dir)?;
        Ok(files
            .into_iter()
            .filter(|p| Format::of(p).is_some())
            .filter(|p| p.file_name().is_some_and(|n| n != LOCAL_CONFIG_FILE))
            .collect())
    }
}

impl OrgSource for DirectorySource {
    fn list(&self) -> ApplicationResult<Vec<String>> {
        let mut slugs: Vec<String> = self
            .company_files()?
            .iter()
            .filter_map(|p| p.file_stem()?.to_str().map(str::to_string))
            .filter(|s| !s.starts_with('.'))
            .collect();
        slugs.sort();
        slugs.dedup();
        Ok(slugs)
    }

    #[instrument(level = "debug", skip(self))]
    fn load(&self, slug: &str) -> ApplicationResult<Company> {
        if slug.is_empty() || slug.contains(['/', '\\']) || slug.starts_with('.') {
            return Err(ApplicationError::InvalidInput(format!(
                "invalid company name: {slug}"
            )));
        }
        for format in [Format::Json, Format::Toml] {
            let path = self.dir.join(match format {
                Format::Json => format!("{slug}.json"),
                Format::Toml => format!("{slug}.toml"),
            });
            if !self.fs.is_file(&path) {
                continue;
            }
            debug!("loading {}", path.display());
            let content = self
                .fs
                .read_to_string(&path)
                .with_path_context("read company file", &path)?;
            return match format {
                Format::Json => {
                    serde_json::from_str(&content).with_path_context("parse company file", &path)
                }
                Format::Toml => toml::from_str(&content).with_path_context("parse company file", &path),
            };
        }
        Err(ApplicationError::CompanyNotFound(slug.to_string()))
    }
}

/// Data directory first, embedded sample as fallback.
pub struct LayeredSource {
    layers: Vec<Arc<dyn OrgSource>>,
}

impl LayeredSource {
    pub fn new(layers: Vec<Arc<dyn OrgSource>>) -> Self {
        Self { layers }
    }
}

impl OrgSource for LayeredSource {
    fn list(&self) -> ApplicationResult<Vec<String>> {
        let mut slugs = Vec::new();
        for layer in &self.layers {
            slugs.extend(layer.list()?);
        }
        slugs.sort();
        slugs.dedup();
        Ok(slugs)
    }

    fn load(&self, slug: &str) -> ApplicationResult<Company> {
        for layer in &self.layers {
            match layer.load(slug) {
                Err(ApplicationError::CompanyNotFound(_)) => continue,
                other => return other,
            }
        }
        Err(ApplicationError::CompanyNotFound(slug.to_string()))
    }
}
