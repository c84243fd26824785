use std::path::PathBuf;

/// Common configuration shared by docadmin binaries.
///
/// The CLI fills this from its flags and hands it to storage and catalog
/// initialization. Every path falls back to a file under `data_dir`.
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    /// Directory holding the IAM database and catalog file.
    pub data_dir: Option<PathBuf>,

    /// Path to the SQLite database file.
    /// Defaults to `{data_dir}/iam.sqlite` if not specified.
    pub sqlite_path: Option<PathBuf>,

    /// Path to the catalog TOML (resource types + action categories).
    /// Defaults to `{data_dir}/catalog.toml` if not specified.
    pub catalog_path: Option<PathBuf>,
}

impl ServiceConfig {
    /// Resolve the SQLite database path, falling back to `{data_dir}/iam.sqlite`.
    pub fn resolve_sqlite_path(&self) -> PathBuf {
        self.sqlite_path
            .clone()
            .unwrap_or_else(|| self.resolve_data_subpath("iam.sqlite"))
    }

    /// Resolve the catalog file path, falling back to `{data_dir}/catalog.toml`.
    pub fn resolve_catalog_path(&self) -> PathBuf {
        self.catalog_path
            .clone()
            .unwrap_or_else(|| self.resolve_data_subpath("catalog.toml"))
    }

    fn resolve_data_subpath(&self, name: &str) -> PathBuf {
        self.data_dir
            .as_ref()
            .map(|d| d.join(name))
            .unwrap_or_else(|| PathBuf::from(name))
    }
}
