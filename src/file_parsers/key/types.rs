use serde::Serialize;

pub const SIGNATURE: &[u8; 8] = b"KEY V1  ";
pub const HEADER_SIZE: usize = 24;
pub const BUNDLE_DESCRIPTOR_SIZE: usize = 12;
pub const RESOURCE_DESCRIPTOR_SIZE: usize = 14;

/// Packed position of a resource: bundle in bits 20-31, tileset in bits 14-19, file entry in
/// bits 0-13.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Locator(pub u32);

impl Locator {
    const BUNDLE_MASK: u32 = 0xFFF0_0000;
    const TILESET_MASK: u32 = 0x000F_C000;
    const ENTRY_MASK: u32 = 0x0000_3FFF;

    pub fn new(bundle_index: u32, tileset_index: u32, entry_index: u32) -> Self {
        Self(
            ((bundle_index << 20) & Self::BUNDLE_MASK)
                | ((tileset_index << 14) & Self::TILESET_MASK)
                | (entry_index & Self::ENTRY_MASK),
        )
    }

    pub fn bundle_index(self) -> usize {
        ((self.0 & Self::BUNDLE_MASK) >> 20) as usize
    }

    pub fn tileset_index(self) -> usize {
        ((self.0 & Self::TILESET_MASK) >> 14) as usize
    }

    pub fn entry_index(self) -> usize {
        (self.0 & Self::ENTRY_MASK) as usize
    }
}

/// Raw bundle table record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleDescriptor {
    pub size: u32,
    /// Absolute file offset of the NUL terminated name
    pub name_offset: u32,
    /// Includes the NUL
    pub name_length: u16,
    /// Media flags, e.g. which CD the bundle shipped on
    pub location: u16,
}

/// Bundle table record with its name resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleDetail {
    pub size: u32,
    /// Relative to the game root, usually with `\` separators
    pub name: String,
    pub location: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceDescriptor {
    pub name: String,
    pub type_tag: u16,
    pub locator: Locator,
}

#[derive(Debug, Serialize)]
pub struct KeyFile {
    pub bundle_descriptors: Vec<BundleDescriptor>,
    #[serde(skip)]
    pub name_blob: Vec<u8>,
    pub bundles: Vec<BundleDetail>,
    pub resources: Vec<ResourceDescriptor>,
}
