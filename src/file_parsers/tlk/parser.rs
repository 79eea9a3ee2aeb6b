use winnow::{
    Parser,
    binary::{le_u16, le_u32},
    combinator::repeat,
    error::ContextError,
};

use super::types::*;
use crate::file_parsers::{
    FormatError,
    shared::{TraceHelper, WinnowParser, position, resref, signature},
};

const FORMAT: &str = "TLK";

fn truncated(section: &'static str) -> impl FnOnce(ContextError) -> FormatError {
    move |_| FormatError::Truncated {
        format: FORMAT,
        section,
    }
}

fn string_entry<'a>() -> impl WinnowParser<&'a [u8], StringEntry> {
    (le_u16, resref(), le_u32, le_u32, le_u32, le_u32)
        .map(
            |(flags, sound, volume_variance, pitch_variance, start, length)| StringEntry {
                flags,
                sound,
                volume_variance,
                pitch_variance,
                start,
                length,
            },
        )
        .trace("string_entry")
}

pub fn parse_tlk_bytes(contents: &[u8]) -> Result<StringTable, FormatError> {
    let mut input = contents;

    let sig = signature()
        .parse_next(&mut input)
        .map_err(truncated("signature"))?;
    if sig != SIGNATURE {
        return Err(FormatError::bad_signature(FORMAT, sig));
    }

    let (language_id, string_count, strings_start) = (le_u16, le_u32, le_u32)
        .trace("tlk_header")
        .parse_next(&mut input)
        .map_err(truncated("header"))?;

    let entries: Vec<_> = repeat(string_count as usize, string_entry())
        .parse_next(&mut input)
        .map_err(truncated("string entries"))?;

    let actual = position(contents, input);
    if (strings_start as usize) < actual {
        return Err(FormatError::MisplacedTable {
            format: FORMAT,
            section: "string data",
            declared: strings_start as usize,
            actual,
        });
    }

    let strings = contents
        .get(strings_start as usize..)
        .ok_or(FormatError::OffsetOutOfBounds {
            format: FORMAT,
            section: "string data",
            offset: strings_start as u64,
        })?
        .to_vec();

    Ok(StringTable {
        language_id,
        entries,
        strings,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::parse_tlk_bytes;
    use crate::{
        file_parsers::{
            FormatError,
            tlk::types::{ENTRY_SIZE, HEADER_SIZE, StringTableError},
        },
        test_utils::string_table as build,
    };

    #[test]
    fn test_lookup() {
        let table = parse_tlk_bytes(&build(&["<NO TEXT>", "Long Sword", "Dagger"])).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.text(0).unwrap(), "<NO TEXT>");
        assert_eq!(table.text(1).unwrap(), "Long Sword");
        assert_eq!(table.text(2).unwrap(), "Dagger");
        assert_eq!(table.entry(0).unwrap().sound, "GREET1");
        assert_eq!(table.entry(1).unwrap().sound, "");
    }

    #[test]
    fn test_utf8_text() {
        let table = parse_tlk_bytes(&build(&["Épée", "Ça va"])).unwrap();
        assert_eq!(table.text(0).unwrap(), "Épée");
        assert_eq!(table.text(1).unwrap(), "Ça va");
    }

    #[test]
    fn test_out_of_range() {
        let table = parse_tlk_bytes(&build(&["one"])).unwrap();

        assert_eq!(
            table.text(1).unwrap_err(),
            StringTableError::IdOutOfRange { id: 1, count: 1 }
        );
        assert!(table.text(u32::MAX).is_err());
    }

    #[test]
    fn test_text_past_end() {
        let mut bytes = build(&["abc"]);
        bytes.truncate(bytes.len() - 1);
        let table = parse_tlk_bytes(&bytes).unwrap();

        assert_eq!(
            table.text(0).unwrap_err(),
            StringTableError::TextOutOfBounds {
                id: 0,
                start: 0,
                end: 3
            }
        );
    }

    #[test]
    fn test_bad_signature() {
        let mut bytes = build(&["abc"]);
        bytes[..8].copy_from_slice(b"KEY V1  ");
        assert!(parse_tlk_bytes(&bytes).unwrap_err().is_signature_mismatch());
    }

    #[test]
    fn test_truncated_entries() {
        let bytes = build(&["abc", "def"]);
        let err = parse_tlk_bytes(&bytes[..HEADER_SIZE + ENTRY_SIZE + 4]).unwrap_err();
        assert!(matches!(
            err,
            FormatError::Truncated {
                section: "string entries",
                ..
            }
        ));
    }
}
