use std::path::{Path, PathBuf};

use crate::path::find_child_case_insensitive;

pub const MASTER_INDEX: &str = "chitin.key";

const GAMES: &[&str] = &[
    "Baldur's Gate Enhanced Edition",
    "Baldur's Gate II Enhanced Edition",
    "Icewind Dale Enhanced Edition",
    "Planescape Torment Enhanced Edition",
    "Baldur's Gate",
    "Baldur's Gate 2",
    "Icewind Dale",
    "Icewind Dale 2",
    "Planescape Torment",
];

/// The game's master index inside `dir`, whatever its case on disk
pub fn find_master_index(dir: &Path) -> Option<PathBuf> {
    find_child_case_insensitive(dir, MASTER_INDEX).filter(|p| p.is_file())
}

/// First installed game found in the usual Steam and GOG library folders
pub fn game_folder_search() -> Option<PathBuf> {
    let home = dirs::home_dir()?;

    [
        home.join(".local/share/Steam/steamapps/common"),
        home.join("Library/Application Support/Steam/steamapps/common"),
        home.join("GOG Games"),
        PathBuf::from("C:\\Program Files (x86)\\Steam\\steamapps\\common"),
        PathBuf::from("C:\\GOG Games"),
    ]
    .iter()
    .flat_map(|root| GAMES.iter().map(move |game| root.join(game)))
    .find(|p| find_master_index(p).is_some())
}
