use locsheet::folder::LoadedFolder;
use locsheet::{Filter, LocalizationTable};

/// Print a table view of one group of a loaded project.
pub fn print_view(loaded: &LoadedFolder, group: &str, filter: Filter, search: &str) {
    let table = &loaded.table;

    println!("Project: {}", loaded.title);
    println!("Group: {}", group);
    println!("Languages: {}", table.languages().join(", "));

    let keys: Vec<&str> = table.filtered_keys(filter, search).collect();
    if keys.is_empty() {
        println!("No keys match filter `{}`", filter);
        return;
    }
    println!("Keys: {}", keys.len());

    for (i, key) in keys.iter().enumerate() {
        println!("\n  {}: {}", i + 1, key);
        if let Some(message) = table.group(group).and_then(|g| g.message(key)) {
            println!("    Message: {}", message);
        }
        for language in table.languages() {
            println!("    {}: {}", language, cell_text(table, language, key));
        }
    }
}

fn cell_text(table: &LocalizationTable, language: &str, key: &str) -> String {
    let value = table
        .entry(language, key)
        .map(|entry| entry.value.clone())
        .unwrap_or_default();
    if value.is_empty() {
        return "<untranslated>".to_string();
    }
    truncate(&value, 50)
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() > max {
        let prefix: String = value.chars().take(max).collect();
        format!("{}...", prefix)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_value() {
        assert_eq!(truncate("short", 50), "short");
    }

    #[test]
    fn test_truncate_long_value() {
        let long = "x".repeat(60);
        let truncated = truncate(&long, 50);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 53);
    }

    #[test]
    fn test_truncate_is_char_safe() {
        let value = "é".repeat(60);
        let truncated = truncate(&value, 50);
        assert!(truncated.ends_with("..."));
    }
}
