//! Builders for synthetic game folders

use std::{fs, path::Path, path::PathBuf};

use tempfile::TempDir;

use crate::file_parsers::{
    bif::types::{FILE_ENTRY_SIZE, HEADER_SIZE as BIF_HEADER_SIZE},
    key::types::{BUNDLE_DESCRIPTOR_SIZE, HEADER_SIZE, Locator, RESOURCE_DESCRIPTOR_SIZE},
    tlk::types::{ENTRY_SIZE as TLK_ENTRY_SIZE, HEADER_SIZE as TLK_HEADER_SIZE},
};

/// Master index with the bundle table straight after the header, then the names, then the
/// resource table
#[derive(Default)]
pub struct KeyBuilder {
    bundles: Vec<String>,
    resources: Vec<(String, u16, Locator)>,
}

impl KeyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bundle(mut self, name: &str) -> Self {
        self.bundles.push(name.to_string());
        self
    }

    pub fn resource(mut self, name: &str, type_tag: u16, locator: Locator) -> Self {
        self.resources.push((name.to_string(), type_tag, locator));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let names_start = HEADER_SIZE + BUNDLE_DESCRIPTOR_SIZE * self.bundles.len();
        let names_len: usize = self.bundles.iter().map(|n| n.len() + 1).sum();
        let resources_start = names_start + names_len;

        let mut bytes = Vec::with_capacity(
            resources_start + RESOURCE_DESCRIPTOR_SIZE * self.resources.len(),
        );
        bytes.extend(b"KEY V1  ");
        bytes.extend((self.bundles.len() as u32).to_le_bytes());
        bytes.extend((self.resources.len() as u32).to_le_bytes());
        bytes.extend((HEADER_SIZE as u32).to_le_bytes());
        bytes.extend((resources_start as u32).to_le_bytes());

        let mut name_offset = names_start;
        for name in &self.bundles {
            bytes.extend(0_u32.to_le_bytes());
            bytes.extend((name_offset as u32).to_le_bytes());
            bytes.extend(((name.len() + 1) as u16).to_le_bytes());
            bytes.extend(1_u16.to_le_bytes());
            name_offset += name.len() + 1;
        }

        for name in &self.bundles {
            bytes.extend(name.as_bytes());
            bytes.push(0);
        }

        for (name, type_tag, locator) in &self.resources {
            let mut resref = [0; 8];
            let len = name.len().min(8);
            resref[..len].copy_from_slice(&name.as_bytes()[..len]);
            bytes.extend(resref);
            bytes.extend(type_tag.to_le_bytes());
            bytes.extend(locator.0.to_le_bytes());
        }

        bytes
    }
}

/// Uncompressed bundle: header, file data packed from offset 20, then the file table so the
/// bundle ends exactly at EOF. File i has locator i.
#[derive(Default)]
pub struct BundleBuilder {
    files: Vec<(u16, Vec<u8>)>,
}

impl BundleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, type_tag: u16, data: &[u8]) -> Self {
        self.files.push((type_tag, data.to_vec()));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let data_len: usize = self.files.iter().map(|(_, d)| d.len()).sum();
        let table_offset = BIF_HEADER_SIZE + data_len;

        let mut bytes = Vec::with_capacity(table_offset + FILE_ENTRY_SIZE * self.files.len());
        bytes.extend(b"BIFFV1  ");
        bytes.extend((self.files.len() as u32).to_le_bytes());
        bytes.extend(0_u32.to_le_bytes());
        bytes.extend((table_offset as u32).to_le_bytes());

        for (_, data) in &self.files {
            bytes.extend(data);
        }

        let mut offset = BIF_HEADER_SIZE;
        for (i, (type_tag, data)) in self.files.iter().enumerate() {
            bytes.extend((i as u32).to_le_bytes());
            bytes.extend((offset as u32).to_le_bytes());
            bytes.extend((data.len() as u32).to_le_bytes());
            bytes.extend(type_tag.to_le_bytes());
            bytes.extend(0_u16.to_le_bytes());
            offset += data.len();
        }

        bytes
    }
}

/// Header, 4 bytes of padding, "hello" at 24, file table at 29, one tileset after it
pub fn hello_bundle() -> Vec<u8> {
    let mut bytes = vec![];
    bytes.extend(b"BIFFV1  ");
    bytes.extend(1_u32.to_le_bytes());
    bytes.extend(1_u32.to_le_bytes());
    bytes.extend(29_u32.to_le_bytes());
    bytes.extend([0; 4]);
    bytes.extend(b"hello");

    bytes.extend(0_u32.to_le_bytes());
    bytes.extend(24_u32.to_le_bytes());
    bytes.extend(5_u32.to_le_bytes());
    bytes.extend(0x3f4_u16.to_le_bytes());
    bytes.extend(0_u16.to_le_bytes());

    bytes.extend((1_u32 << 14).to_le_bytes());
    bytes.extend(0_u32.to_le_bytes());
    bytes.extend(2_u32.to_le_bytes());
    bytes.extend(5120_u32.to_le_bytes());
    bytes.extend(0x3eb_u16.to_le_bytes());
    bytes.extend(0_u16.to_le_bytes());
    bytes
}

/// String table holding `strings` in order. The first string has sound "GREET1".
pub fn string_table(strings: &[&str]) -> Vec<u8> {
    let strings_start = TLK_HEADER_SIZE + TLK_ENTRY_SIZE * strings.len();

    let mut bytes = vec![];
    bytes.extend(b"TLK V1  ");
    bytes.extend(0_u16.to_le_bytes());
    bytes.extend((strings.len() as u32).to_le_bytes());
    bytes.extend((strings_start as u32).to_le_bytes());

    let mut start = 0;
    for (i, s) in strings.iter().enumerate() {
        bytes.extend(1_u16.to_le_bytes());
        let mut sound = [0_u8; 8];
        if i == 0 {
            sound[..6].copy_from_slice(b"GREET1");
        }
        bytes.extend(sound);
        bytes.extend(0_u32.to_le_bytes());
        bytes.extend(0_u32.to_le_bytes());
        bytes.extend((start as u32).to_le_bytes());
        bytes.extend((s.len() as u32).to_le_bytes());
        start += s.len();
    }

    for s in strings {
        bytes.extend(s.as_bytes());
    }

    bytes
}

/// Temporary game folder, removed on drop
pub struct GameDir {
    dir: TempDir,
}

impl GameDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn key_path(&self) -> PathBuf {
        self.path().join("chitin.key")
    }

    /// Write a file relative to the game folder, creating parent folders
    pub fn write(&self, relative: &str, contents: &[u8]) {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }
}
