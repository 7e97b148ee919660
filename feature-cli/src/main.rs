mod cli;
mod prompts;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use log::debug;
use std::path::Path;

use feature_core::{
    export_to_path, get_config_path, import_from_path, to_json, Feature, FeatureSession,
    ImportFormat, ImportReport, LocalFileStore, MergeImport, RowError, Settings,
};

use crate::cli::{Cli, Command, ConfigCommand};
use crate::prompts::EditAction;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = get_config_path()?;

    // Settings commands must work even with a broken settings file
    if let Command::Config(config_cmd) = &cli.command {
        return handle_config_command(config_cmd, &config_path);
    }

    let settings = Settings::load(&config_path)?;
    debug!("Using settings from {}", config_path.display());
    let folder = cli
        .folder
        .clone()
        .unwrap_or_else(|| settings.default_folder.clone());

    let mut session = FeatureSession::local(settings);
    session.set_folder(&folder);
    debug!("Feature folder: {}", folder.display());

    match &cli.command {
        Command::Files => {
            list_files(&session)?;
        }
        Command::New => {
            let name = session.create_new_file()?;
            println!("{} {}", "Created".green(), name);
        }
        Command::Rename { old, new } => {
            session.rename_file(old, new)?;
            println!("{} {} -> {}", "Renamed".green(), old, new);
        }
        Command::Show { file } => {
            session.load_file(file)?;
            print_features(session.features());
        }
        Command::Add {
            file,
            name,
            description,
            priority,
        } => {
            add_feature(&mut session, file, name, description, priority)?;
        }
        Command::Del { file, id } => {
            session.load_file(file)?;
            let removed = session
                .delete_by_id(*id)
                .with_context(|| format!("No feature with id {} in {}", id, file))?;
            session.save()?;
            println!("{} {}", "Deleted".green(), removed);
        }
        Command::Import {
            source,
            format,
            into,
            output,
        } => match into {
            Some(file) => merge_into(&mut session, source, *format, file)?,
            None => import_standalone(source, *format, output.as_deref())?,
        },
        Command::Export { file, output } => {
            session.load_file(file)?;
            session.export(output)?;
            println!(
                "{} {} features to {}",
                "Exported".green(),
                session.features().len(),
                output.display()
            );
        }
        Command::Edit { file } => {
            session.load_file(file)?;
            edit_interactive(&mut session)?;
        }
        // Handled before the settings are loaded
        Command::Config(_) => {}
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn list_files(session: &FeatureSession) -> Result<()> {
    let files = session.list_files()?;

    if files.is_empty() {
        let folder = session.folder().unwrap_or_else(|| Path::new("."));
        println!("{} {}", "No feature files in".yellow(), folder.display());
        return Ok(());
    }

    for file in files {
        println!("{}", file);
    }
    Ok(())
}

fn print_features(features: &[Feature]) {
    if features.is_empty() {
        println!("{}", "No features.".yellow());
        return;
    }

    println!(
        "{:>6} | {:<30} | {:>8} | {}",
        "Id", "Name", "Priority", "Description"
    );
    println!("{}", "-".repeat(80));

    for feature in features {
        let priority = if feature.has_priority() {
            feature.priority.to_string().normal()
        } else {
            "-".dimmed()
        };
        println!(
            "{:>6} | {:<30} | {:>8} | {}",
            feature.id, feature.name, priority, feature.description
        );
    }
}

fn print_skipped(skipped: &[RowError]) {
    if skipped.is_empty() {
        return;
    }
    eprintln!("{}", format!("Skipped {} rows:", skipped.len()).yellow());
    for row in skipped {
        eprintln!("  {}", row);
    }
}

fn add_feature(
    session: &mut FeatureSession,
    file: &str,
    name: &Option<String>,
    description: &Option<String>,
    priority: &Option<i64>,
) -> Result<()> {
    session.load_file(file)?;

    let mut feature = session.add_feature().clone();
    if let Some(name) = name {
        feature.name = name.clone();
    }
    if let Some(description) = description {
        feature.description = description.clone();
    }
    let priority = priority.unwrap_or_else(|| i64::from(feature.priority));
    let feature = Feature::new(feature.id, feature.name, feature.description, priority);

    let index = session.features().len() - 1;
    session.update_feature(index, feature.clone());
    session.save()?;

    println!("{} {}", "Feature added:".green(), feature);
    Ok(())
}

fn merge_into(
    session: &mut FeatureSession,
    source: &Path,
    format: Option<ImportFormat>,
    file: &str,
) -> Result<()> {
    session.load_file(file)?;
    let merged = session.import_merge(source, format)?;
    print_skipped(&merged.skipped);
    let path = session.save()?;
    report_merge(&merged);
    println!("Saved to {}", path.display());
    Ok(())
}

fn report_merge(merged: &MergeImport) {
    println!("{} {} features", "Imported".green(), merged.imported);
    if let Some(strategy) = merged.strategy {
        println!("  {} {}", "Layout:".dimmed(), strategy);
    }
    for change in merged.id_mapping.iter().filter(|c| c.original != c.assigned) {
        println!(
            "  {} {} -> {}",
            "Id reassigned:".yellow(),
            change.original,
            change.assigned
        );
    }
}

fn import_standalone(source: &Path, format: Option<ImportFormat>, output: Option<&Path>) -> Result<()> {
    let store = LocalFileStore::new();
    let report: ImportReport = import_from_path(&store, source, format)?;
    print_skipped(&report.skipped);

    match output {
        Some(path) => {
            export_to_path(&store, path, &report.features)?;
            println!(
                "{} {} features to {}",
                "Imported".green(),
                report.features.len(),
                path.display()
            );
        }
        None => println!("{}", to_json(&report.features)?),
    }
    Ok(())
}

fn edit_interactive(session: &mut FeatureSession) -> Result<()> {
    let mut dirty = false;

    loop {
        println!();
        if let Some(file) = session.active_file() {
            let marker = if dirty { " (modified)" } else { "" };
            println!("{}{}", file.blue().bold(), marker);
        }
        print_features(session.features());

        let action = prompts::prompt_action(
            !session.features().is_empty(),
            session.can_undo(),
            session.can_redo(),
        )?;

        match action {
            EditAction::Add => {
                let added = session.add_feature().clone();
                println!("{} {}", "Added".green(), added);
                dirty = true;
            }
            EditAction::Edit => {
                let index = prompts::prompt_select_feature(session.features())?;
                let current = session.features()[index].clone();
                let updated = prompts::prompt_edit_feature(&current)?;
                if updated != current && session.update_feature(index, updated) {
                    dirty = true;
                }
            }
            EditAction::Delete => {
                let index = prompts::prompt_select_feature(session.features())?;
                let target = session.features()[index].clone();
                if prompts::confirm_delete(&target)? {
                    if let Some(removed) = session.delete_feature(index) {
                        println!("{} {}", "Deleted".green(), removed);
                        dirty = true;
                    }
                }
            }
            EditAction::Import => {
                let (path, format) = prompts::prompt_import_source()?;
                match session.import_merge(&path, format) {
                    Ok(merged) => {
                        print_skipped(&merged.skipped);
                        report_merge(&merged);
                        dirty = true;
                    }
                    Err(e) => eprintln!("{} {}", "Import failed:".red(), e),
                }
            }
            EditAction::Undo => {
                if session.undo() {
                    dirty = true;
                }
            }
            EditAction::Redo => {
                if session.redo() {
                    dirty = true;
                }
            }
            EditAction::Save => {
                let path = session.save()?;
                println!("{} {}", "Saved to".green(), path.display());
                dirty = false;
            }
            EditAction::Quit => {
                if !dirty || prompts::confirm_discard()? {
                    return Ok(());
                }
            }
        }
    }
}

fn handle_config_command(cmd: &ConfigCommand, config_path: &Path) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let settings = Settings::load(config_path)?;
            println!("{}", "Settings:".blue().bold());
            println!("  {}: {}", "Folder".blue(), settings.default_folder.display());
            println!("  {}: {}", "File pattern".blue(), settings.file_pattern);
            println!("  {}: {}", "New file stem".blue(), settings.new_file_stem);
            println!("  {}: {}", "New feature name".blue(), settings.new_feature_name);
            println!(
                "  {}: {}",
                "New feature priority".blue(),
                settings.new_feature_priority
            );
        }
        ConfigCommand::Init => {
            if config_path.exists() {
                println!(
                    "{} {}",
                    "Settings file already exists:".yellow(),
                    config_path.display()
                );
            } else {
                Settings::create_default(config_path)?;
                println!("{} {}", "Created".green(), config_path.display());
            }
        }
        ConfigCommand::Path => {
            println!("{}", config_path.display());
        }
    }
    Ok(())
}
