//! IAM module: policy statements, their editor, and policy attachments.
//!
//! # Parts
//!
//! - **Catalogs** - resource types with URN patterns, grouped actions
//! - **Validator** - the statement rules shared by every save path
//! - **Editor** - Visual/Raw dual representation of one statement list
//! - **Service** - policy lifecycle plus the attachment registry
//! - **Store** - in-memory and SQLite persistence
//!
//! # Usage
//!
//! ```ignore
//! use docadmin_iam::{Catalogs, IamConfig, IamService, PolicyEditor, store::SqliteStore};
//!
//! let catalogs = Catalogs::from_config(&IamConfig::load(path)?)?;
//! let service = IamService::new(Arc::new(SqliteStore::open(db)?));
//!
//! let mut editor = PolicyEditor::new(policy.statements.clone());
//! editor.switch_to_raw()?;
//! editor.edit_raw(text)?;
//! service.save_statements(&policy.id, editor.save()?)?;
//! ```

pub mod catalog;
pub mod config;
pub mod editor;
pub mod error;
pub mod model;
pub mod service;
pub mod store;
pub mod validate;

pub use catalog::{ActionCatalog, Catalogs, ResourceRegistry};
pub use config::IamConfig;
pub use editor::{EditorError, EditorMode, PolicyEditor};
pub use error::IamError;
pub use service::IamService;
pub use validate::{StatementField, ValidationError, validate_list, validate_statement};
