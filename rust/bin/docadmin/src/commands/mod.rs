pub mod attach;
pub mod catalog;
pub mod policy;
pub mod statements;

use std::io::Read;
use std::sync::Arc;

use anyhow::{Context, Result};
use docadmin_core::{ServiceConfig, ServiceError, error_code};
use docadmin_iam::editor::RawError;
use docadmin_iam::store::SqliteStore;
use docadmin_iam::{Catalogs, IamConfig, IamError, IamService};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Resolved paths and output mode shared by every command.
pub struct Env {
    config: ServiceConfig,
    pub json: bool,
}

impl Env {
    pub fn new(config: ServiceConfig, json: bool) -> Self {
        Self { config, json }
    }

    /// Load the catalogs from the config file, or the built-in ones.
    pub fn catalogs(&self) -> Result<Catalogs> {
        let path = self.config.resolve_catalog_path();
        let iam_config = IamConfig::load(&path)?;
        Ok(Catalogs::from_config(&iam_config)?)
    }

    /// Open the IAM database, creating the data dir if needed.
    pub fn service(&self) -> Result<Arc<IamService>> {
        if let Some(dir) = &self.config.data_dir {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create data dir {}", dir.display()))?;
        }
        let path = self.config.resolve_sqlite_path();
        debug!("opening IAM database at {}", path.display());
        let store = SqliteStore::open(&path).context("failed to open IAM database")?;
        Ok(IamService::new(Arc::new(store)))
    }
}

/// Read a file, or stdin for `-`.
pub fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("read {}", path))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ── Error reporting ──

/// The shared service error behind a command failure, if the IAM module
/// produced it. Context added on the way up is looked through.
pub fn service_error(err: &anyhow::Error) -> Option<ServiceError> {
    if let Some(e) = err.downcast_ref::<IamError>() {
        return Some(e.clone().into());
    }
    err.downcast_ref::<RawError>()
        .map(|e| IamError::Raw(e.clone()).into())
}

fn raw_error(err: &anyhow::Error) -> Option<&RawError> {
    match err.downcast_ref::<IamError>() {
        Some(IamError::Raw(e)) => Some(e),
        _ => err.downcast_ref::<RawError>(),
    }
}

/// `{"code": ..., "message": ...}` body for `-o json`, plus the statement
/// and field a raw-text error points at.
pub fn error_body(err: &anyhow::Error) -> Value {
    let service = service_error(err);
    let mut body = serde_json::json!({
        "code": service.as_ref().map_or(error_code::INTERNAL, ServiceError::error_code),
        "message": format!("{err:#}"),
        "retryable": service.as_ref().is_some_and(ServiceError::is_retryable),
    });
    if let Some(raw) = raw_error(err) {
        body["statement"] = serde_json::json!(raw.statement_index().map(|i| i + 1));
        body["field"] = serde_json::json!(raw.field().map(|f| f.as_str()));
    }
    body
}

/// Print a failed command: JSON body on stdout, or one line on stderr.
pub fn report_error(err: &anyhow::Error, json: bool) {
    if json {
        println!("{:#}", error_body(err));
        return;
    }
    match service_error(err) {
        Some(e) => {
            eprintln!("Error [{}]: {:#}", e.error_code(), err);
            if e.is_retryable() {
                eprintln!("The database may be busy; try the command again.");
            }
        }
        None => eprintln!("Error: {:#}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docadmin_iam::editor::parse_statements;

    #[test]
    fn test_env_uses_builtin_catalogs_without_config() {
        let dir = tempfile::tempdir().unwrap();
        let env = Env::new(
            ServiceConfig {
                data_dir: Some(dir.path().to_path_buf()),
                ..Default::default()
            },
            false,
        );
        let catalogs = env.catalogs().unwrap();
        assert_eq!(
            catalogs.resources.resolve("document", "42").unwrap(),
            "urn:docadmin:documents::document/42"
        );
    }

    #[test]
    fn test_env_reads_catalog_namespace_and_creates_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("nested").join("data");
        let catalog = dir.path().join("catalog.toml");
        std::fs::write(&catalog, "namespace = \"acme\"\n").unwrap();

        let env = Env::new(
            ServiceConfig {
                data_dir: Some(data_dir.clone()),
                catalog_path: Some(catalog),
                ..Default::default()
            },
            true,
        );
        assert_eq!(env.catalogs().unwrap().resources.label("urn:acme:iam::group/*"), "All Groups");

        let service = env.service().unwrap();
        assert!(data_dir.join("iam.sqlite").exists());
        assert!(service.attachable_policies("urn:acme:iam::user/u1").unwrap().is_empty());
    }

    #[test]
    fn test_read_input_reports_missing_file() {
        let err = read_input("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn test_iam_errors_carry_service_codes_through_context() {
        let err = anyhow::Error::new(IamError::AlreadyAttached {
            policy_id: "p1".into(),
            principal_urn: "urn:x:iam::user/u1".into(),
        })
        .context("attach p1");
        let service = service_error(&err).unwrap();
        assert_eq!(service.error_code(), error_code::ALREADY_EXISTS);
        assert!(!service.is_retryable());

        let body = error_body(&err);
        assert_eq!(body["code"], "ALREADY_EXISTS");
        assert_eq!(body["retryable"], false);
        assert!(body["message"].as_str().unwrap().starts_with("attach p1: "));
    }

    #[test]
    fn test_raw_errors_report_statement_and_field() {
        let raw = parse_statements(r#"[{"effect":"Allow","actions":["*"],"resources":[]}]"#)
            .unwrap_err();
        let err = anyhow::Error::new(raw).context("policy.json");
        let body = error_body(&err);
        assert_eq!(body["code"], "VALIDATION_FAILED");
        assert_eq!(body["statement"], 1);
        assert_eq!(body["field"], "resources");
    }

    #[test]
    fn test_storage_errors_are_retryable() {
        let err = anyhow::Error::new(IamError::Storage("database is locked".into()));
        assert!(service_error(&err).unwrap().is_retryable());
        assert_eq!(error_body(&err)["code"], "STORAGE_ERROR");
        assert_eq!(error_body(&err)["retryable"], true);
    }

    #[test]
    fn test_other_errors_have_no_service_code() {
        let err = read_input("/definitely/not/here.json").unwrap_err();
        assert_eq!(service_error(&err), None);
        assert_eq!(error_body(&err)["code"], "INTERNAL");
    }
}
