use anyhow::Result;
use inquire::{Confirm, CustomType, Editor, Select, Text};
use std::fmt;
use std::path::PathBuf;

use feature_core::{Feature, ImportFormat, MAX_PRIORITY};

/// Actions offered by the interactive editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    Add,
    Edit,
    Delete,
    Import,
    Undo,
    Redo,
    Save,
    Quit,
}

impl fmt::Display for EditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EditAction::Add => "Add feature",
            EditAction::Edit => "Edit feature",
            EditAction::Delete => "Delete feature",
            EditAction::Import => "Import and merge a file",
            EditAction::Undo => "Undo",
            EditAction::Redo => "Redo",
            EditAction::Save => "Save",
            EditAction::Quit => "Quit",
        };
        write!(f, "{}", label)
    }
}

/// Asks for the next action; undo/redo and the per-feature actions are
/// only offered when they can do something
pub fn prompt_action(has_features: bool, can_undo: bool, can_redo: bool) -> Result<EditAction> {
    let mut options = vec![EditAction::Add];
    if has_features {
        options.push(EditAction::Edit);
        options.push(EditAction::Delete);
    }
    options.push(EditAction::Import);
    if can_undo {
        options.push(EditAction::Undo);
    }
    if can_redo {
        options.push(EditAction::Redo);
    }
    options.push(EditAction::Save);
    options.push(EditAction::Quit);

    Ok(Select::new("Action:", options).prompt()?)
}

/// Lets the user pick a feature, returning its index in the list
pub fn prompt_select_feature(features: &[Feature]) -> Result<usize> {
    let options: Vec<String> = features
        .iter()
        .map(|f| format!("{} (priority {})", f, f.priority))
        .collect();
    let choice = Select::new("Feature:", options).raw_prompt()?;
    Ok(choice.index)
}

/// Prompts for every field of a feature, starting from its current values
pub fn prompt_edit_feature(feature: &Feature) -> Result<Feature> {
    let id = CustomType::<i64>::new("Id:")
        .with_default(feature.id)
        .with_error_message("Please enter a whole number")
        .prompt()?;

    let name = Text::new("Name:")
        .with_initial_value(&feature.name)
        .prompt()?;

    // Multiline input goes through the user's editor
    let description = Editor::new("Description:")
        .with_predefined_text(&feature.description)
        .prompt()?;
    let description = description.trim_end().to_string();

    let priority_prompt = format!("Priority (1-{}, anything else clears it):", MAX_PRIORITY);
    let priority = CustomType::<i64>::new(&priority_prompt)
        .with_default(i64::from(feature.priority))
        .with_error_message("Please enter a whole number")
        .prompt()?;

    Ok(Feature::new(id, name, description, priority))
}

/// Asks for a file to import and, optionally, its format
pub fn prompt_import_source() -> Result<(PathBuf, Option<ImportFormat>)> {
    let path = Text::new("File to import:").prompt()?;

    let formats = vec![
        "Detect from extension",
        "JSON",
        "Delimited text",
        "Spreadsheet",
    ];
    let format = match Select::new("Format:", formats).raw_prompt()?.index {
        1 => Some(ImportFormat::Json),
        2 => Some(ImportFormat::Delimited),
        3 => Some(ImportFormat::Spreadsheet),
        _ => None,
    };

    Ok((PathBuf::from(path.trim()), format))
}

/// Asks for confirmation before a feature is removed
pub fn confirm_delete(feature: &Feature) -> Result<bool> {
    Ok(Confirm::new(&format!("Delete {}?", feature))
        .with_default(false)
        .prompt()?)
}

pub fn confirm_discard() -> Result<bool> {
    Ok(Confirm::new("Discard unsaved changes?")
        .with_default(false)
        .prompt()?)
}
