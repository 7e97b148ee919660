pub mod config;
pub mod error;
pub mod export;
pub mod history;
pub mod import;
pub mod models;
pub mod reconcile;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use config::{get_config_path, Settings};
pub use error::FeatureError;
pub use export::{export_to_path, to_delimited, to_json};
pub use history::{Snapshot, UndoManager};
pub use import::{
    import_from_path, resolve, resolve_detailed, ImportFormat, ImportReport, Resolution, RowError,
    RowIssue, Strategy,
};
pub use models::{
    sanitize_priority, sort_by_id, Draft, Feature, DEFAULT_FEATURE_NAME, DEFAULT_FEATURE_PRIORITY,
    MAX_PRIORITY, MIN_PRIORITY, UNSET_PRIORITY,
};
pub use reconcile::{merge as merge_import, IdChange, MergeOutcome};
pub use session::{FeatureSession, MergeImport};
pub use storage::{FileStore, LocalFileStore};
