//! The in-memory localization table.
//!
//! A table holds an ordered list of languages, a set of named groups (one per
//! resource file), and an active group that edits and filtering apply to.
//! Language order is insertion order and drives snapshot column layout; key
//! order within a group is insertion order and drives row ordering. Edits
//! never reorder keys; deletion removes a key without touching its siblings.

use std::{
    collections::HashMap,
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    types::{Filter, LocalizationEntry},
};

/// A named subset of keys corresponding to one resource file, independent of
/// language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Group {
    name: String,

    /// Keys in insertion order.
    keys: Vec<String>,

    /// key -> language -> entry. A missing entry is equivalent to an empty
    /// value.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    #[serde(default)]
    entries: HashMap<String, HashMap<String, LocalizationEntry>>,
}

impl Group {
    fn new(name: &str) -> Self {
        Group {
            name: name.to_string(),
            keys: Vec::new(),
            entries: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn entry(&self, language: &str, key: &str) -> Option<&LocalizationEntry> {
        self.entries.get(key).and_then(|values| values.get(language))
    }

    /// First non-empty message attached to `key` across languages.
    pub fn message(&self, key: &str) -> Option<&str> {
        let values = self.entries.get(key)?;
        values
            .values()
            .find_map(|entry| entry.message.as_deref().filter(|m| !m.is_empty()))
    }

    pub(crate) fn set_entry(&mut self, language: &str, entry: LocalizationEntry) {
        let values = self.entries.entry(entry.key.clone()).or_default();
        if !self.keys.contains(&entry.key) {
            self.keys.push(entry.key.clone());
        }
        values.insert(language.to_string(), entry);
    }

    fn remove_key(&mut self, key: &str) {
        self.keys.retain(|k| k != key);
        self.entries.remove(key);
    }
}

/// Store of localization entries across languages and groups.
///
/// Created empty or by [`crate::folder::load_folder`]; mutated through the
/// edit operations below; snapshotted by the [`crate::snapshot`] codec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LocalizationTable {
    /// Language codes in insertion order.
    languages: Vec<String>,

    /// All groups, in discovery order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    groups: Vec<Group>,

    /// Name of the group edits and filtering apply to.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    active_group: Option<String>,
}

impl LocalizationTable {
    /// Creates a new, empty table with no languages or groups.
    pub fn new() -> Self {
        LocalizationTable::default()
    }

    /// Creates an empty table with the given languages pre-registered.
    pub fn with_languages<I, S>(languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = LocalizationTable::new();
        for language in languages {
            table.add_language(&language.into());
        }
        table
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn has_language(&self, language: &str) -> bool {
        self.languages.iter().any(|l| l == language)
    }

    /// Registers a language, appending it to the column order. Existing keys
    /// get an empty entry for the new language. Idempotent.
    pub fn add_language(&mut self, language: &str) {
        if self.has_language(language) {
            return;
        }
        self.languages.push(language.to_string());
        for group in &mut self.groups {
            for key in group.keys.clone() {
                let entry = LocalizationEntry::new(key.as_str(), "", None);
                group.set_entry(language, entry);
            }
        }
    }

    pub fn group_names(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.name.as_str()).collect()
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Adds an empty group. The first group added becomes the active group.
    /// Idempotent.
    pub fn add_group(&mut self, name: &str) {
        if self.group(name).is_none() {
            self.groups.push(Group::new(name));
        }
        if self.active_group.is_none() {
            self.active_group = Some(name.to_string());
        }
    }

    pub fn active_group(&self) -> Option<&str> {
        self.active_group.as_deref()
    }

    /// Switches the active group and returns the language list, so a caller
    /// can rebuild its view columns.
    pub fn select_group(&mut self, name: &str) -> Result<&[String], Error> {
        if self.group(name).is_none() {
            return Err(Error::UnknownGroup(name.to_string()));
        }
        self.active_group = Some(name.to_string());
        Ok(&self.languages)
    }

    fn active(&self) -> Option<&Group> {
        let name = self.active_group.as_deref()?;
        self.groups.iter().find(|g| g.name == name)
    }

    fn active_mut(&mut self) -> Result<&mut Group, Error> {
        let name = self.active_group.clone().ok_or(Error::NoActiveGroup)?;
        self.groups
            .iter_mut()
            .find(|g| g.name == name)
            .ok_or(Error::NoActiveGroup)
    }

    /// Adds a new key to the active group, with an empty value for every
    /// known language.
    pub fn add_key(&mut self, key: &str, message: Option<&str>) -> Result<(), Error> {
        if key.is_empty() {
            return Err(Error::EmptyKey);
        }
        let languages = self.languages.clone();
        let group = self.active_mut()?;
        if group.contains_key(key) {
            return Err(Error::DuplicateKey(key.to_string()));
        }
        if languages.is_empty() {
            // No languages yet: still record the key so it shows up in views.
            group.entries.entry(key.to_string()).or_default();
            group.keys.push(key.to_string());
        }
        for language in &languages {
            let entry = LocalizationEntry::new(key, "", message.map(str::to_string));
            group.set_entry(language, entry);
        }
        Ok(())
    }

    /// Overwrites the value (and, when given, the message) of an existing key
    /// for a registered language.
    ///
    /// Languages are never registered implicitly here; an unknown language is
    /// an error. Use [`LocalizationTable::add_language`] first.
    pub fn update_value(
        &mut self,
        language: &str,
        key: &str,
        value: &str,
        message: Option<&str>,
    ) -> Result<(), Error> {
        if !self.has_language(language) {
            return Err(Error::UnknownLanguage(language.to_string()));
        }
        let group = self.active_mut()?;
        if !group.contains_key(key) {
            return Err(Error::UnknownKey(key.to_string()));
        }
        let values = group.entries.entry(key.to_string()).or_default();
        let entry = values
            .entry(language.to_string())
            .or_insert_with(|| LocalizationEntry::new(key, "", None));
        entry.value = value.to_string();
        if let Some(message) = message {
            entry.message = Some(message.to_string());
        }
        Ok(())
    }

    /// Removes a key and all its per-language entries from the active group.
    /// Idempotent; sibling order is preserved.
    pub fn delete_key(&mut self, key: &str) {
        if let Ok(group) = self.active_mut() {
            group.remove_key(key);
        }
    }

    /// Entry for `key` in the active group, if present.
    pub fn entry(&self, language: &str, key: &str) -> Option<&LocalizationEntry> {
        self.active()?.entry(language, key)
    }

    /// Keys of the active group matching `filter` and `search`, in insertion
    /// order. The iterator is lazy and can be re-created at any time.
    ///
    /// `search` is a case-insensitive substring match over the key and all
    /// language values, applied on top of the mode filter.
    pub fn filtered_keys<'a>(
        &'a self,
        filter: Filter,
        search: &str,
    ) -> impl Iterator<Item = &'a str> {
        let term = search.to_lowercase();
        let languages: &'a [String] = &self.languages;
        self.active().into_iter().flat_map(move |group| {
            let term = term.clone();
            group
                .keys
                .iter()
                .filter(move |key| key_matches(group, languages, key, filter, &term))
                .map(String::as_str)
        })
    }

    /// Index of `key` within the current filtered ordering, used to scroll to
    /// a just-added key.
    pub fn row_for_key(&self, filter: Filter, search: &str, key: &str) -> Option<usize> {
        self.filtered_keys(filter, search).position(|k| k == key)
    }

    /// Caches the table to a JSON file.
    pub fn cache_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(Error::Io)?;
        }
        let writer = BufWriter::new(File::create(path).map_err(Error::Io)?);
        serde_json::to_writer(writer, self).map_err(Error::Cache)
    }

    /// Loads a table from a JSON cache file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let reader = BufReader::new(File::open(path).map_err(Error::Io)?);
        serde_json::from_reader(reader).map_err(Error::Cache)
    }

    /// Inserts an entry directly, creating the group and key slot as needed.
    /// The loader uses this after registering languages.
    pub(crate) fn upsert_entry(&mut self, group: &str, language: &str, entry: LocalizationEntry) {
        self.add_group(group);
        if let Some(g) = self.groups.iter_mut().find(|g| g.name == group) {
            g.set_entry(language, entry);
        }
    }
}

fn key_matches(
    group: &Group,
    languages: &[String],
    key: &str,
    filter: Filter,
    term: &str,
) -> bool {
    let values = group.entries.get(key);
    let mode_ok = match filter {
        Filter::All => true,
        Filter::Translated => languages.iter().all(|language| {
            values
                .and_then(|v| v.get(language))
                .is_some_and(LocalizationEntry::is_translated)
        }),
        Filter::Untranslated => languages.iter().any(|language| {
            values
                .and_then(|v| v.get(language))
                .is_none_or(|entry| !entry.is_translated())
        }),
    };
    if !mode_ok {
        return false;
    }
    if term.is_empty() {
        return true;
    }
    key.to_lowercase().contains(term)
        || values.is_some_and(|v| {
            v.values()
                .any(|entry| entry.value.to_lowercase().contains(term))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> LocalizationTable {
        let mut table = LocalizationTable::with_languages(["en", "fr"]);
        table.add_group("Localizable");
        table
    }

    #[test]
    fn test_add_key_creates_empty_entries() {
        let mut table = sample_table();
        table.add_key("hello", Some("Greeting")).unwrap();

        let entry = table.entry("en", "hello").unwrap();
        assert_eq!(entry.value, "");
        assert_eq!(entry.message.as_deref(), Some("Greeting"));
        assert!(table.entry("fr", "hello").is_some());
    }

    #[test]
    fn test_add_key_duplicate() {
        let mut table = sample_table();
        assert!(table.add_key("hello", None).is_ok());
        assert!(matches!(
            table.add_key("hello", None),
            Err(Error::DuplicateKey(_))
        ));
    }

    #[test]
    fn test_add_key_empty() {
        let mut table = sample_table();
        assert!(matches!(table.add_key("", None), Err(Error::EmptyKey)));
    }

    #[test]
    fn test_add_key_without_group() {
        let mut table = LocalizationTable::with_languages(["en"]);
        assert!(matches!(
            table.add_key("hello", None),
            Err(Error::NoActiveGroup)
        ));
    }

    #[test]
    fn test_update_value() {
        let mut table = sample_table();
        table.add_key("hello", None).unwrap();
        table.update_value("en", "hello", "Hi", None).unwrap();
        assert_eq!(table.entry("en", "hello").unwrap().value, "Hi");
    }

    #[test]
    fn test_update_value_unknown_key() {
        let mut table = sample_table();
        assert!(matches!(
            table.update_value("en", "missing", "Hi", None),
            Err(Error::UnknownKey(_))
        ));
    }

    #[test]
    fn test_update_value_rejects_unregistered_language() {
        let mut table = sample_table();
        table.add_key("hello", None).unwrap();
        assert!(matches!(
            table.update_value("de", "hello", "Hallo", None),
            Err(Error::UnknownLanguage(_))
        ));
    }

    #[test]
    fn test_delete_key_idempotent() {
        let mut table = sample_table();
        table.add_key("a", None).unwrap();
        table.add_key("b", None).unwrap();

        table.delete_key("a");
        let after_first: Vec<String> = table
            .filtered_keys(Filter::All, "")
            .map(str::to_string)
            .collect();
        table.delete_key("a");
        let after_second: Vec<String> = table
            .filtered_keys(Filter::All, "")
            .map(str::to_string)
            .collect();

        assert_eq!(after_first, ["b"]);
        assert_eq!(after_first, after_second);
    }

    #[test]
    fn test_delete_preserves_sibling_order() {
        let mut table = sample_table();
        for key in ["a", "b", "c"] {
            table.add_key(key, None).unwrap();
        }
        table.delete_key("b");
        let keys: Vec<_> = table.filtered_keys(Filter::All, "").collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn test_filter_translated_and_untranslated() {
        let mut table = sample_table();
        table.add_key("hello", None).unwrap();
        table.update_value("en", "hello", "Hi", None).unwrap();

        let untranslated: Vec<_> = table.filtered_keys(Filter::Untranslated, "").collect();
        assert_eq!(untranslated, vec!["hello"]);

        let translated: Vec<_> = table.filtered_keys(Filter::Translated, "").collect();
        assert!(translated.is_empty());

        table.update_value("fr", "hello", "Salut", None).unwrap();
        let translated: Vec<_> = table.filtered_keys(Filter::Translated, "").collect();
        assert_eq!(translated, vec!["hello"]);
    }

    #[test]
    fn test_filter_all_is_total() {
        let mut table = sample_table();
        for key in ["a", "b", "c"] {
            table.add_key(key, None).unwrap();
        }
        let all: Vec<_> = table.filtered_keys(Filter::All, "").collect();
        assert_eq!(all, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_search_matches_keys_and_values() {
        let mut table = sample_table();
        table.add_key("greeting", None).unwrap();
        table.add_key("farewell", None).unwrap();
        table
            .update_value("fr", "farewell", "Au revoir", None)
            .unwrap();

        let by_key: Vec<_> = table.filtered_keys(Filter::All, "GREET").collect();
        assert_eq!(by_key, vec!["greeting"]);

        let by_value: Vec<_> = table.filtered_keys(Filter::All, "revoir").collect();
        assert_eq!(by_value, vec!["farewell"]);

        let none: Vec<_> = table.filtered_keys(Filter::All, "missing").collect();
        assert!(none.is_empty());
    }

    #[test]
    fn test_row_for_key() {
        let mut table = sample_table();
        for key in ["a", "b", "c"] {
            table.add_key(key, None).unwrap();
        }
        assert_eq!(table.row_for_key(Filter::All, "", "b"), Some(1));
        assert_eq!(table.row_for_key(Filter::All, "", "missing"), None);
    }

    #[test]
    fn test_select_group_returns_languages() {
        let mut table = sample_table();
        table.add_group("Other");
        let languages = table.select_group("Other").unwrap().to_vec();
        assert_eq!(languages, vec!["en", "fr"]);
        assert_eq!(table.active_group(), Some("Other"));
    }

    #[test]
    fn test_select_group_unknown() {
        let mut table = sample_table();
        assert!(matches!(
            table.select_group("Nope"),
            Err(Error::UnknownGroup(_))
        ));
    }

    #[test]
    fn test_add_language_backfills_existing_keys() {
        let mut table = sample_table();
        table.add_key("hello", None).unwrap();
        table.add_language("de");

        assert_eq!(table.languages().to_vec(), vec!["en", "fr", "de"]);
        let entry = table.entry("de", "hello").unwrap();
        assert_eq!(entry.value, "");
    }

    #[test]
    fn test_cache_round_trip() {
        let mut table = sample_table();
        table.add_key("hello", Some("Greeting")).unwrap();
        table.update_value("en", "hello", "Hi", None).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        table.cache_to_file(&path).unwrap();

        let loaded = LocalizationTable::load_from_file(&path).unwrap();
        assert_eq!(loaded, table);
    }
}
