use winnow::{
    Parser,
    binary::{le_u16, le_u32},
    combinator::repeat,
    error::ContextError,
    token::take,
};

use super::types::*;
use crate::file_parsers::{
    FormatError,
    shared::{TraceHelper, WinnowParser, nul_terminated, position, resref, signature},
};

const FORMAT: &str = "KEY";

struct KeyHeader {
    bundle_count: u32,
    resource_count: u32,
    bundle_table_offset: u32,
    resource_table_offset: u32,
}

fn truncated(section: &'static str) -> impl FnOnce(ContextError) -> FormatError {
    move |_| FormatError::Truncated {
        format: FORMAT,
        section,
    }
}

fn header<'a>() -> impl WinnowParser<&'a [u8], KeyHeader> {
    (le_u32, le_u32, le_u32, le_u32)
        .map(
            |(bundle_count, resource_count, bundle_table_offset, resource_table_offset)| {
                KeyHeader {
                    bundle_count,
                    resource_count,
                    bundle_table_offset,
                    resource_table_offset,
                }
            },
        )
        .trace("key_header")
}

fn bundle_descriptor<'a>() -> impl WinnowParser<&'a [u8], BundleDescriptor> {
    (le_u32, le_u32, le_u16, le_u16)
        .map(|(size, name_offset, name_length, location)| BundleDescriptor {
            size,
            name_offset,
            name_length,
            location,
        })
        .trace("bundle_descriptor")
}

fn resource_descriptor<'a>() -> impl WinnowParser<&'a [u8], ResourceDescriptor> {
    (resref(), le_u16, le_u32)
        .map(|(name, type_tag, locator)| ResourceDescriptor {
            name,
            type_tag,
            locator: Locator(locator),
        })
        .trace("resource_descriptor")
}

/// Resolve a descriptor's name out of the blob that starts at `strings_start` in the file
fn bundle_detail(
    descriptor: &BundleDescriptor,
    name_blob: &[u8],
    strings_start: usize,
) -> Result<BundleDetail, FormatError> {
    let name = (descriptor.name_offset as usize)
        .checked_sub(strings_start)
        .and_then(|start| name_blob.get(start..))
        .map(nul_terminated)
        .ok_or(FormatError::BadStringOffset {
            format: FORMAT,
            offset: descriptor.name_offset,
        })?;

    Ok(BundleDetail {
        size: descriptor.size,
        name,
        location: descriptor.location,
    })
}

pub fn parse_key_bytes(contents: &[u8]) -> Result<KeyFile, FormatError> {
    let mut input = contents;

    let sig = signature()
        .parse_next(&mut input)
        .map_err(truncated("signature"))?;
    if sig != SIGNATURE {
        return Err(FormatError::bad_signature(FORMAT, sig));
    }

    let header = header()
        .parse_next(&mut input)
        .map_err(truncated("header"))?;

    // The bundle table directly follows the header
    let actual = position(contents, input);
    if actual != header.bundle_table_offset as usize {
        return Err(FormatError::MisplacedTable {
            format: FORMAT,
            section: "bundle table",
            declared: header.bundle_table_offset as usize,
            actual,
        });
    }

    let bundle_descriptors: Vec<_> = repeat(header.bundle_count as usize, bundle_descriptor())
        .parse_next(&mut input)
        .map_err(truncated("bundle table"))?;

    let strings_start = HEADER_SIZE + BUNDLE_DESCRIPTOR_SIZE * bundle_descriptors.len();
    let strings_len = (header.resource_table_offset as usize)
        .checked_sub(strings_start)
        .ok_or(FormatError::MisplacedTable {
            format: FORMAT,
            section: "resource table",
            declared: header.resource_table_offset as usize,
            actual: strings_start,
        })?;

    let name_blob = take(strings_len)
        .parse_next(&mut input)
        .map_err(truncated("bundle names"))?
        .to_vec();

    let bundles = bundle_descriptors
        .iter()
        .map(|d| bundle_detail(d, &name_blob, strings_start))
        .collect::<Result<Vec<_>, _>>()?;

    let resources: Vec<_> = repeat(header.resource_count as usize, resource_descriptor())
        .parse_next(&mut input)
        .map_err(truncated("resource table"))?;

    Ok(KeyFile {
        bundle_descriptors,
        name_blob,
        bundles,
        resources,
    })
}
