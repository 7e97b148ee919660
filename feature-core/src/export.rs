use log::info;
use std::path::Path;

use crate::error::{FeatureError, Result};
use crate::import::delimited::DELIMITER;
use crate::import::ImportFormat;
use crate::models::Feature;
use crate::storage::FileStore;

/// Serializes features as the canonical, indented JSON array
pub fn to_json(features: &[Feature]) -> Result<String> {
    Ok(serde_json::to_string_pretty(features)?)
}

/// Serializes features as `Id;Name;Description;Priority` lines
///
/// Delimiters and line breaks inside text fields would split the record on
/// re-import, so they are replaced with `,` and a space.
pub fn to_delimited(features: &[Feature]) -> String {
    let clean = |text: &str| -> String {
        text.chars()
            .map(|c| match c {
                DELIMITER => ',',
                '\r' | '\n' => ' ',
                other => other,
            })
            .collect()
    };

    let mut output = String::new();
    for feature in features {
        output.push_str(&format!(
            "{id}{d}{name}{d}{description}{d}{priority}\n",
            id = feature.id,
            name = clean(&feature.name),
            description = clean(&feature.description),
            priority = feature.priority,
            d = DELIMITER,
        ));
    }
    output
}

/// Writes features to `path`, choosing the format from the extension
///
/// `.txt` and `.csv` produce delimited text; everything else gets the
/// canonical JSON. Spreadsheets can be read but not written.
pub fn export_to_path(store: &dyn FileStore, path: &Path, features: &[Feature]) -> Result<()> {
    let contents = match ImportFormat::from_path(path) {
        ImportFormat::Json => to_json(features)?,
        ImportFormat::Delimited => to_delimited(features),
        ImportFormat::Spreadsheet => {
            return Err(FeatureError::UnsupportedFormat(format!(
                "cannot write spreadsheets: {}",
                path.display()
            )))
        }
    };

    store.write_file(path, contents.as_bytes())?;

    info!("Exported {} feature(s) to {}", features.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::{delimited, import_from_path, resolve};
    use crate::models::sort_by_id;
    use crate::storage::LocalFileStore;
    use tempfile::tempdir;

    fn sample() -> Vec<Feature> {
        vec![
            Feature::new(2, "Search", "Find \"things\"", 7),
            Feature::new(1, "Login", "", 0),
            Feature::new(3, "", "Unnamed", 10),
        ]
    }

    #[test]
    fn test_json_is_indented_with_canonical_names() -> anyhow::Result<()> {
        let json = to_json(&[Feature::new(1, "A", "a", 3)])?;
        assert!(json.starts_with("[\n"));
        assert!(json.contains("\"Id\": 1"));
        assert!(json.contains("\"Name\": \"A\""));
        assert!(json.contains("\"Description\": \"a\""));
        assert!(json.contains("\"Priority\": 3"));
        Ok(())
    }

    #[test]
    fn test_json_round_trip() -> anyhow::Result<()> {
        let features = sample();
        let mut resolved = resolve(&to_json(&features)?);
        let mut expected = features;
        sort_by_id(&mut resolved);
        sort_by_id(&mut expected);
        assert_eq!(resolved, expected);
        Ok(())
    }

    #[test]
    fn test_empty_list_round_trip() -> anyhow::Result<()> {
        assert!(resolve(&to_json(&[])?).is_empty());
        Ok(())
    }

    #[test]
    fn test_delimited_round_trip() {
        let features = sample();
        let report = delimited::parse_delimited(&to_delimited(&features));
        assert!(report.is_clean());
        assert_eq!(report.features, features);
    }

    #[test]
    fn test_delimited_escapes_separators() {
        let text = to_delimited(&[Feature::new(1, "a;b", "line\nbreak", 2)]);
        assert_eq!(text, "1;a,b;line break;2\n");
    }

    #[test]
    fn test_export_to_path_by_extension() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let store = LocalFileStore::new();
        let features = sample();

        let json_path = dir.path().join("out.json");
        export_to_path(&store, &json_path, &features)?;
        let report = import_from_path(&store, &json_path, None)?;
        assert_eq!(report.features, features);

        let txt_path = dir.path().join("out.txt");
        export_to_path(&store, &txt_path, &features)?;
        let report = import_from_path(&store, &txt_path, None)?;
        assert_eq!(report.features, features);

        let xlsx_path = dir.path().join("out.xlsx");
        assert!(matches!(
            export_to_path(&store, &xlsx_path, &features),
            Err(FeatureError::UnsupportedFormat(_))
        ));
        assert!(!xlsx_path.exists());
        Ok(())
    }
}
