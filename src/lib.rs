pub mod commands;
pub mod error;
pub mod file_parsers;
pub mod game_folder;
pub mod path;
pub mod resource_manager;
pub mod resource_type;

#[cfg(test)]
mod test_utils;
