mod view;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use locsheet::snapshot::{self, ImportOptions};
use locsheet::{Filter, folder};

use crate::view::print_view;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// View the keys and translations of a localization project.
    View {
        /// The project folder containing <lang>.lproj subdirectories
        folder: PathBuf,

        /// Group to view (defaults to the first group found)
        #[arg(short, long)]
        group: Option<String>,

        /// Row filter: all, translated, or untranslated
        #[arg(short, long, default_value_t = Filter::All)]
        filter: Filter,

        /// Case-insensitive search over keys and values
        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// Export a group of a project as a CSV snapshot.
    Export {
        /// The project folder to export
        folder: PathBuf,

        /// Group to export (defaults to the first group found)
        #[arg(short, long)]
        group: Option<String>,

        /// Directory to write <title>.csv into (defaults to the current
        /// directory)
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Merge a CSV snapshot back into a project and rewrite its .strings
    /// files.
    Import {
        /// The project folder to update
        folder: PathBuf,

        /// The CSV snapshot to merge
        #[arg(short, long)]
        csv: PathBuf,

        /// Group to merge into (defaults to the first group found)
        #[arg(short, long)]
        group: Option<String>,

        /// Register languages present in the snapshot but not in the project
        #[arg(long)]
        allow_new_languages: bool,

        /// Report what would change without writing anything
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let result = match args.commands {
        Commands::View {
            folder,
            group,
            filter,
            search,
        } => run_view(&folder, group.as_deref(), filter, &search),
        Commands::Export {
            folder,
            group,
            output,
        } => run_export(&folder, group.as_deref(), &output),
        Commands::Import {
            folder,
            csv,
            group,
            allow_new_languages,
            dry_run,
        } => run_import(&folder, &csv, group.as_deref(), allow_new_languages, dry_run),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn select_group(
    loaded: &mut folder::LoadedFolder,
    group: Option<&str>,
) -> Result<String, locsheet::Error> {
    let name = match group {
        Some(name) => name.to_string(),
        None => loaded
            .table
            .active_group()
            .ok_or(locsheet::Error::NoActiveGroup)?
            .to_string(),
    };
    loaded.table.select_group(&name)?;
    Ok(name)
}

fn run_view(
    folder: &Path,
    group: Option<&str>,
    filter: Filter,
    search: &str,
) -> Result<(), locsheet::Error> {
    let mut loaded = folder::load_folder(folder)?;
    let group = select_group(&mut loaded, group)?;
    print_view(&loaded, &group, filter, search);
    Ok(())
}

fn run_export(
    folder: &Path,
    group: Option<&str>,
    output: &Path,
) -> Result<(), locsheet::Error> {
    let mut loaded = folder::load_folder(folder)?;
    let group = select_group(&mut loaded, group)?;
    let path = snapshot::export_snapshot(&loaded.table, &group, &loaded.title, output)?;
    println!("Exported {}", path.display());
    Ok(())
}

fn run_import(
    folder_path: &Path,
    csv: &Path,
    group: Option<&str>,
    allow_new_languages: bool,
    dry_run: bool,
) -> Result<(), locsheet::Error> {
    let mut loaded = folder::load_folder(folder_path)?;
    select_group(&mut loaded, group)?;

    let batch = snapshot::read_snapshot_from(csv)?;
    let options = ImportOptions {
        allow_new_languages,
    };

    if dry_run {
        // Merge into a copy so the report reflects the real outcome.
        let mut preview = loaded.table.clone();
        let report = snapshot::merge_snapshot(&mut preview, &batch, options)?;
        println!(
            "Would update {} cell(s), add {} key(s), add {} language(s)",
            report.updated, report.added_keys, report.added_languages
        );
        return Ok(());
    }

    let report = snapshot::merge_snapshot(&mut loaded.table, &batch, options)?;
    folder::save_folder(&loaded.table, folder_path)?;
    println!(
        "Updated {} cell(s), added {} key(s), added {} language(s)",
        report.updated, report.added_keys, report.added_languages
    );
    Ok(())
}
