//! Loading and saving a localization project folder.
//!
//! A project folder contains one `<lang>.lproj` subdirectory per language,
//! each holding one `.strings` file per group:
//!
//! ```text
//! MyApp/
//!   en.lproj/Localizable.strings
//!   fr.lproj/Localizable.strings
//!   fr.lproj/Settings.strings
//! ```
//!
//! Individual files that fail to parse are logged and skipped; the loader
//! returns whatever parsed successfully.

use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};

use log::warn;
use unic_langid::LanguageIdentifier;

use crate::{
    error::Error,
    formats::StringsFormat,
    formats::strings::Pair,
    table::LocalizationTable,
    traits::Parser,
};

/// The result of scanning a project folder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedFolder {
    /// Folder name, used as the project title (e.g. for the snapshot file).
    pub title: String,

    /// Language codes with at least one successfully parsed file, sorted.
    pub languages: Vec<String>,

    /// Group names with at least one successfully parsed file, sorted. The
    /// first one is pre-selected as the table's active group.
    pub groups: Vec<String>,

    /// The populated table.
    pub table: LocalizationTable,
}

/// Scans `path` for `<lang>.lproj` subdirectories and parses every `.strings`
/// file found in them.
///
/// Returns [`Error::DirectoryNotFound`] when `path` does not exist or is not
/// a directory. Per-file failures never abort the load.
pub fn load_folder<P: AsRef<Path>>(path: P) -> Result<LoadedFolder, Error> {
    let path = path.as_ref();
    if !path.is_dir() {
        return Err(Error::DirectoryNotFound(path.to_path_buf()));
    }

    let title = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string();

    // Discover (language, group, file) triples first; only files that parse
    // successfully register their language and group.
    let mut files: Vec<(String, String, PathBuf)> = Vec::new();

    for dir_entry in fs::read_dir(path)? {
        let dir_entry = dir_entry?;
        let subdir = dir_entry.path();
        if !subdir.is_dir() {
            continue;
        }
        let Some(language) = language_from_dir_name(&subdir) else {
            continue;
        };

        if language.parse::<LanguageIdentifier>().is_err() {
            warn!(
                "{}: not a valid language identifier, keeping verbatim",
                language
            );
        }

        for file_entry in fs::read_dir(&subdir)? {
            let file = file_entry?.path();
            if file.extension().and_then(|ext| ext.to_str()) != Some("strings") {
                continue;
            }
            let Some(group) = file.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };

            files.push((language.clone(), group.to_string(), file));
        }
    }

    let mut languages = BTreeSet::new();
    let mut groups = BTreeSet::new();
    let mut parsed: Vec<(String, String, StringsFormat)> = Vec::new();

    for (language, group, file) in files {
        let format = match StringsFormat::read_from(&file) {
            Ok(format) => format,
            Err(err) => {
                warn!("skipping {}: {}", file.display(), err);
                continue;
            }
        };
        languages.insert(language.clone());
        groups.insert(group.clone());
        parsed.push((language, group, format));
    }

    let mut table = LocalizationTable::with_languages(languages.iter().cloned());
    for group in &groups {
        table.add_group(group);
    }

    for (language, group, format) in parsed {
        for pair in &format.pairs {
            table.upsert_entry(&group, &language, pair.to_entry());
        }
    }

    let groups: Vec<String> = groups.into_iter().collect();
    if let Some(first) = groups.first() {
        table.select_group(first)?;
    }

    Ok(LoadedFolder {
        title,
        languages: languages.into_iter().collect(),
        groups,
        table,
    })
}

/// Writes every group of `table` back as `<lang>.lproj/<group>.strings`
/// under `dir`, creating directories as needed.
pub fn save_folder<P: AsRef<Path>>(table: &LocalizationTable, dir: P) -> Result<(), Error> {
    let dir = dir.as_ref();

    for group_name in table.group_names() {
        let group = table
            .group(group_name)
            .ok_or_else(|| Error::UnknownGroup(group_name.to_string()))?;

        for language in table.languages() {
            let pairs: Vec<Pair> = group
                .keys()
                .iter()
                .filter_map(|key| group.entry(language, key))
                .map(Pair::from_entry)
                .collect();

            let lproj = dir.join(format!("{}.lproj", language));
            fs::create_dir_all(&lproj)?;
            let format = StringsFormat { pairs };
            format.write_to(lproj.join(format!("{}.strings", group_name)))?;
        }
    }

    Ok(())
}

// "en.lproj" -> "en"; anything else is not a language bundle.
fn language_from_dir_name(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    name.strip_suffix(".lproj").map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_language_from_dir_name() {
        assert_eq!(
            language_from_dir_name(&PathBuf::from("/tmp/en.lproj")),
            Some("en".to_string())
        );
        assert_eq!(language_from_dir_name(&PathBuf::from("/tmp/assets")), None);
    }

    #[test]
    fn test_load_folder_missing_directory() {
        let result = load_folder("/definitely/not/here");
        assert!(matches!(result, Err(Error::DirectoryNotFound(_))));
    }
}
