//! Editing session over one folder of feature list files
//!
//! The session owns the live feature list, the undo history and the active
//! file. Every mutation snapshots the list first, and switching files clears
//! the history. Manual edits (add, delete, update) do not check ids for
//! uniqueness; only merge imports reconcile ids.

use log::info;
use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::error::{FeatureError, Result};
use crate::export::{export_to_path, to_json};
use crate::history::UndoManager;
use crate::import::{import_from_path, ImportFormat, RowError, Strategy};
use crate::models::{sanitize_priority, sort_by_id, Feature};
use crate::reconcile::{merge, IdChange};
use crate::storage::{FileStore, LocalFileStore};

/// Summary of a merge import into the live list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeImport {
    /// Number of records appended
    pub imported: usize,
    /// Original and assigned id of every appended record
    pub id_mapping: Vec<IdChange>,
    /// Rows the importer skipped
    pub skipped: Vec<RowError>,
    /// JSON strategy that applied, if the source was JSON
    pub strategy: Option<Strategy>,
}

pub struct FeatureSession {
    store: Box<dyn FileStore>,
    settings: Settings,
    folder: Option<PathBuf>,
    active_file: Option<String>,
    features: Vec<Feature>,
    history: UndoManager,
}

impl FeatureSession {
    pub fn new(store: Box<dyn FileStore>, settings: Settings) -> Self {
        Self {
            store,
            settings,
            folder: None,
            active_file: None,
            features: Vec::new(),
            history: UndoManager::new(),
        }
    }

    /// Session on the local file system
    pub fn local(settings: Settings) -> Self {
        Self::new(Box::new(LocalFileStore::new()), settings)
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn folder(&self) -> Option<&Path> {
        self.folder.as_deref()
    }

    pub fn active_file(&self) -> Option<&str> {
        self.active_file.as_deref()
    }

    /// Full path of the active file
    pub fn active_path(&self) -> Option<PathBuf> {
        let name = self.active_file.as_ref()?;
        Some(self.resolve_path(name))
    }

    fn resolve_path(&self, name: &str) -> PathBuf {
        match &self.folder {
            Some(folder) => folder.join(name),
            None => PathBuf::from(name),
        }
    }

    fn require_folder(&self) -> Result<&Path> {
        self.folder.as_deref().ok_or(FeatureError::NoFolder)
    }

    // =========================================================================
    // Files
    // =========================================================================

    /// Selects the folder that file names are resolved against
    pub fn set_folder<P: AsRef<Path>>(&mut self, folder: P) {
        self.folder = Some(folder.as_ref().to_path_buf());
    }

    /// Selects a folder and lists its feature files
    pub fn open_folder<P: AsRef<Path>>(&mut self, folder: P) -> Result<Vec<String>> {
        self.set_folder(folder);
        self.list_files()
    }

    /// Feature files in the current folder matching the configured pattern
    pub fn list_files(&self) -> Result<Vec<String>> {
        let folder = self.require_folder()?;
        self.store.list_files(folder, &self.settings.file_pattern)
    }

    /// Replaces the live list with the contents of `name`, sorted by id
    ///
    /// The history is cleared: undo never crosses file boundaries. On error
    /// the current list and active file stay as they were.
    pub fn load_file(&mut self, name: &str) -> Result<usize> {
        let path = self.resolve_path(name);
        let report = import_from_path(self.store.as_ref(), &path, None)?;

        let mut features = report.features;
        sort_by_id(&mut features);

        self.features = features;
        self.active_file = Some(name.to_string());
        self.history.clear();

        info!("Loaded {} feature(s) from {}", self.features.len(), path.display());
        Ok(self.features.len())
    }

    /// Writes the live list back to the active file
    pub fn save(&self) -> Result<PathBuf> {
        let path = self.active_path().ok_or(FeatureError::NoActiveFile)?;
        export_to_path(self.store.as_ref(), &path, &self.features)?;
        Ok(path)
    }

    /// Writes the live list to an arbitrary path
    pub fn export<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        export_to_path(self.store.as_ref(), path.as_ref(), &self.features)
    }

    /// Creates an empty list file with a free `NeueDatei[_n].json` name and
    /// makes it the active file
    pub fn create_new_file(&mut self) -> Result<String> {
        let folder = self.require_folder()?.to_path_buf();
        let stem = &self.settings.new_file_stem;

        let mut name = format!("{}.json", stem);
        let mut counter = 1;
        while self.store.exists(&folder.join(&name)) {
            name = format!("{}_{}.json", stem, counter);
            counter += 1;
        }

        self.store.write_file(&folder.join(&name), to_json(&[])?.as_bytes())?;

        self.features.clear();
        self.active_file = Some(name.clone());
        self.history.clear();

        info!("Created {}", folder.join(&name).display());
        Ok(name)
    }

    /// Renames a file in the current folder; the target must not exist
    pub fn rename_file(&mut self, old_name: &str, new_name: &str) -> Result<()> {
        let folder = self.require_folder()?;
        self.store.move_file(&folder.join(old_name), &folder.join(new_name))?;

        if self.active_file.as_deref() == Some(old_name) {
            self.active_file = Some(new_name.to_string());
        }
        Ok(())
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Appends a placeholder feature with id = current count + 1
    pub fn add_feature(&mut self) -> &Feature {
        self.history.save_state(&self.features);

        let feature = Feature::new(
            self.features.len() as i64 + 1,
            self.settings.new_feature_name.clone(),
            "",
            i64::from(self.settings.new_feature_priority),
        );
        self.features.push(feature);

        let last = self.features.len() - 1;
        &self.features[last]
    }

    /// Removes the feature at `index`
    pub fn delete_feature(&mut self, index: usize) -> Option<Feature> {
        if index >= self.features.len() {
            return None;
        }
        self.history.save_state(&self.features);
        Some(self.features.remove(index))
    }

    /// Removes the first feature with the given id
    pub fn delete_by_id(&mut self, id: i64) -> Option<Feature> {
        let index = self.features.iter().position(|f| f.id == id)?;
        self.delete_feature(index)
    }

    /// Replaces the feature at `index`; the priority is clamped, the id is
    /// taken as given
    pub fn update_feature(&mut self, index: usize, mut updated: Feature) -> bool {
        if index >= self.features.len() {
            return false;
        }
        self.history.save_state(&self.features);

        updated.priority = sanitize_priority(i64::from(updated.priority));
        self.features[index] = updated;
        true
    }

    /// Imports a file and appends its records, re-identifying collisions
    ///
    /// Nothing is snapshotted or changed when the file can't be read.
    pub fn import_merge<P: AsRef<Path>>(
        &mut self,
        path: P,
        hint: Option<ImportFormat>,
    ) -> Result<MergeImport> {
        let report = import_from_path(self.store.as_ref(), path.as_ref(), hint)?;

        self.history.save_state(&self.features);
        let outcome = merge(&self.features, &report.features);
        self.features = outcome.features;

        Ok(MergeImport {
            imported: report.features.len(),
            id_mapping: outcome.id_mapping,
            skipped: report.skipped,
            strategy: report.strategy,
        })
    }

    // =========================================================================
    // History
    // =========================================================================

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Restores the previous state; returns false when there was none
    pub fn undo(&mut self) -> bool {
        if !self.history.can_undo() {
            return false;
        }
        self.features = self.history.undo(&self.features);
        true
    }

    /// Re-applies an undone state; returns false when there was none
    pub fn redo(&mut self) -> bool {
        if !self.history.can_redo() {
            return false;
        }
        self.features = self.history.redo(&self.features);
        true
    }
}
