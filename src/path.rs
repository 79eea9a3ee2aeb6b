use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};

use crate::resource_type::{ResourceType, ResourceTypeError};

/// "abc.xyz" => "abc"
pub fn base_name(filename: &str) -> &str {
    filename
        .rsplit_once('.')
        .map_or(filename, |(base, _)| base)
}

/// "abc.xyz" => Some("xyz")
pub fn suffix(filename: &str) -> Option<&str> {
    filename.rsplit_once('.').map(|(_, ext)| ext)
}

/// Split a resource filename into its name and type
pub fn split_resource_name(filename: &str) -> Result<(&str, ResourceType), ResourceTypeError> {
    let ext = suffix(filename).unwrap_or_default();
    let ty = ResourceType::from_extension(ext)?;

    Ok((base_name(filename), ty))
}

/// Display name for an index entry, falling back to the hex tag for unknown types
pub fn resource_filename(name: &str, type_tag: u16) -> String {
    match ResourceType::from_tag(type_tag) {
        Ok(ty) => format!("{name}.{}", ty.extension()),
        Err(_) => format!("{name}.{type_tag:#06x}"),
    }
}

/// Bundle names are stored with `\` separators, e.g. "data\AREA000A.bif". Components that
/// would leave the game folder are dropped.
pub fn bundle_relative_path(name: &str) -> PathBuf {
    name.split(['\\', '/'])
        .filter(|c| !matches!(*c, "" | "." | ".."))
        .filter(|c| !c.contains(':'))
        .collect()
}

/// Folder holding the master index. A bare filename resolves to the working directory.
pub fn game_root(key_path: &Path) -> &Path {
    match key_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Try the name as given, then lower-cased
pub fn open_with_fallback(dir: &Path, relative: &Path) -> io::Result<(File, PathBuf)> {
    let exact = dir.join(relative);
    match File::open(&exact) {
        Ok(file) => Ok((file, exact)),
        Err(e) => {
            let lower = dir.join(relative.to_string_lossy().to_lowercase());
            if lower == exact {
                return Err(e);
            }
            File::open(&lower).map(|file| (file, lower))
        }
    }
}

/// Find a direct child of `dir` whose name matches ignoring ASCII case
pub fn find_child_case_insensitive(dir: &Path, name: &str) -> Option<PathBuf> {
    let exact = dir.join(name);
    if exact.exists() {
        return Some(exact);
    }

    fs::read_dir(dir)
        .ok()?
        .filter_map(Result::ok)
        .find(|entry| entry.file_name().to_string_lossy().eq_ignore_ascii_case(name))
        .map(|entry| entry.path())
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use super::*;

    #[test]
    fn test_base_name_and_suffix() {
        assert_eq!(base_name("abc.xyz"), "abc");
        assert_eq!(suffix("abc.xyz"), Some("xyz"));
        assert_eq!(base_name("abc"), "abc");
        assert_eq!(suffix("abc"), None);
        assert_eq!(base_name("a.b.2da"), "a.b");
        assert_eq!(suffix("a.b.2da"), Some("2da"));
    }

    #[test]
    fn test_split_resource_name() {
        assert_eq!(
            split_resource_name("ITEMTYPE.2DA"),
            Ok(("ITEMTYPE", ResourceType::Tda))
        );
        assert!(matches!(
            split_resource_name("foo.xyz"),
            Err(ResourceTypeError::UnknownExtension(_))
        ));
        assert!(split_resource_name("foo").is_err());
    }

    #[test]
    fn test_resource_filename() {
        assert_eq!(resource_filename("SW1H01", 0x3ed), "SW1H01.itm");
        assert_eq!(resource_filename("odd", 0x7777), "odd.0x7777");
    }

    #[test]
    fn test_bundle_relative_path() {
        assert_eq!(
            bundle_relative_path("data\\AREA000A.bif"),
            ["data", "AREA000A.bif"].iter().collect::<PathBuf>()
        );
        assert_eq!(bundle_relative_path("Default.bif"), PathBuf::from("Default.bif"));
    }

    #[test]
    fn test_bundle_path_stays_in_game_folder() {
        assert_eq!(
            bundle_relative_path("..\\..\\etc\\passwd"),
            ["etc", "passwd"].iter().collect::<PathBuf>()
        );
        assert_eq!(
            bundle_relative_path("data/./../cache\\x.bif"),
            ["data", "cache", "x.bif"].iter().collect::<PathBuf>()
        );
        assert_eq!(
            bundle_relative_path("/abs\\C:\\x.bif"),
            ["abs", "x.bif"].iter().collect::<PathBuf>()
        );
        assert!(bundle_relative_path("..").as_os_str().is_empty());
    }

    #[test]
    fn test_game_root() {
        assert_eq!(game_root(Path::new("chitin.key")), Path::new("."));
        assert_eq!(game_root(Path::new("game/chitin.key")), Path::new("game"));
        assert_eq!(game_root(Path::new("/chitin.key")), Path::new("/"));
    }

    #[test]
    fn test_open_with_fallback() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("data")).unwrap();
        fs::write(dir.path().join("data/area000a.bif"), b"x").unwrap();

        let (_, path) = open_with_fallback(dir.path(), &bundle_relative_path("DATA\\AREA000A.BIF"))
            .unwrap();
        assert_eq!(path, dir.path().join("data").join("area000a.bif"));

        assert!(open_with_fallback(dir.path(), &PathBuf::from("missing.bif")).is_err());
    }

    #[test]
    fn test_find_child_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("Override")).unwrap();

        assert_eq!(
            find_child_case_insensitive(dir.path(), "override"),
            Some(dir.path().join("Override"))
        );
        assert_eq!(find_child_case_insensitive(dir.path(), "music"), None);
    }
}
