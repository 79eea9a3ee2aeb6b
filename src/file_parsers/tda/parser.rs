use winnow::{
    Parser,
    ascii::{space0, space1},
    error::ContextError,
    token::literal,
};

use super::types::*;
use crate::file_parsers::{
    FormatError,
    shared::{TraceHelper, WinnowParser},
};

const FORMAT: &str = "2DA";

/// "2DA V1.0"
fn signature_line<'a>() -> impl WinnowParser<&'a str, ()> {
    (literal("2DA"), space1, literal("V1.0"), space0)
        .void()
        .trace("tda_signature")
}

fn row(line: &str) -> Option<Row> {
    let mut tokens = line.split_whitespace().map(String::from);
    let label = tokens.next()?;

    Some(Row {
        label,
        values: tokens.collect(),
    })
}

pub fn parse_tda_bytes(contents: &[u8]) -> Result<TableData, FormatError> {
    let text = String::from_utf8_lossy(contents);
    let mut lines = text.lines();

    let first = lines.next().unwrap_or_default().trim();
    signature_line()
        .parse_next(&mut &first[..])
        .map_err(|_: ContextError| FormatError::bad_signature(FORMAT, first.as_bytes()))?;

    let default_value = lines
        .next()
        .ok_or(FormatError::Truncated {
            format: FORMAT,
            section: "default value",
        })?
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string();

    let columns = lines
        .next()
        .ok_or(FormatError::Truncated {
            format: FORMAT,
            section: "column headers",
        })?
        .split_whitespace()
        .map(String::from)
        .collect();

    let rows = lines.filter_map(row).collect();

    Ok(TableData {
        default_value,
        columns,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::parse_tda_bytes;
    use crate::file_parsers::FormatError;

    const THAC0: &str = "2DA V1.0\r\n\
                         20\r\n\
                         \x20    1    2    3\r\n\
                         FIGHTER 20 19 18\r\n\
                         MAGE 20 20\r\n\
                         \r\n\
                         THIEF 20 20 19 19\r\n";

    #[test]
    fn test_parse() {
        let table = parse_tda_bytes(THAC0.as_bytes()).unwrap();

        assert_eq!(table.default_value, "20");
        assert_eq!(table.columns, vec!["1", "2", "3"]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[1].label, "MAGE");
        assert_eq!(table.rows[2].values, vec!["20", "20", "19", "19"]);
    }

    #[test]
    fn test_short_row_uses_default() {
        let table = parse_tda_bytes(THAC0.as_bytes()).unwrap();

        assert_eq!(table.value(0, 2), "18");
        assert_eq!(table.value(1, 1), "20");
        assert_eq!(table.value(1, 2), "20");
        assert_eq!(table.value(10, 0), "20");
    }

    #[test]
    fn test_labels_case_insensitive() {
        let table = parse_tda_bytes(THAC0.as_bytes()).unwrap();

        assert_eq!(table.value_by_label("fighter", "2"), Some("19"));
        assert_eq!(table.value_by_label("Thief", "3"), Some("19"));
        assert_eq!(table.value_by_label("cleric", "1"), None);
        assert_eq!(table.value_by_label("mage", "4"), None);
    }

    #[test]
    fn test_bad_signature() {
        let err = parse_tda_bytes(b"2DA V2.0\n0\nA\n").unwrap_err();
        assert!(err.is_signature_mismatch());

        let err = parse_tda_bytes(&[0xff, 0xff, 0x12, 0x34]).unwrap_err();
        assert!(err.is_signature_mismatch());
    }

    #[test]
    fn test_missing_header_lines() {
        assert!(matches!(
            parse_tda_bytes(b"2DA V1.0\n").unwrap_err(),
            FormatError::Truncated {
                section: "default value",
                ..
            }
        ));
        assert!(matches!(
            parse_tda_bytes(b"2DA V1.0\n*\n").unwrap_err(),
            FormatError::Truncated {
                section: "column headers",
                ..
            }
        ));
    }

    #[test]
    fn test_no_rows() {
        let table = parse_tda_bytes(b"2DA   V1.0\n*\nA B\n").unwrap();
        assert_eq!(table.default_value, "*");
        assert!(table.rows.is_empty());
        assert_eq!(table.value(0, 0), "*");
    }
}
