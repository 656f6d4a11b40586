//! Parser for the captured shader tables
//!
//! Both tables are plain comma-separated text with a header row:
//!
//! ```text
//! index,name,hash              shader,offset,type,name,componentcount
//! 0,DefaultVS,1A2B3C4D         DefaultVS,0,1,Position,3
//! 1,,                          DefaultVS,12,14,Color,1
//! ```
//!
//! Fields are not quoted. An empty hash marks a shader object that is not a
//! vertex shader (or could not be captured).

use crate::error::{LayoutError, Table};

const HASH_COLUMNS: usize = 3;
const INPUT_COLUMNS: usize = 5;

/// One row of the `shaderhashes` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashRow {
    /// 1-based line number in the source text
    pub line: usize,
    pub index: u32,
    pub name: String,
    /// `None` when the hash column is empty
    pub hash: Option<u32>,
}

/// One row of the `shaderinputs` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRow {
    /// 1-based line number in the source text
    pub line: usize,
    pub shader: String,
    pub offset: u32,
    /// Raw type code; validated against the closed table when the attribute is built
    pub type_code: u32,
    pub name: String,
    pub component_count: u32,
}

/// Parse the `shaderhashes` table (`index,name,hash`)
pub fn parse_hash_table(source: &str) -> Result<Vec<HashRow>, LayoutError> {
    let mut rows = Vec::new();

    for (line, content) in data_lines(source) {
        let row = RowReader::new(Table::Hashes, line, content, HASH_COLUMNS)?;
        let index = row.decimal(0, "index")?;
        let name = row.field(1).to_string();
        let hash = match row.field(2) {
            "" => None,
            hex => Some(row.hex(hex, "hash")?),
        };

        rows.push(HashRow {
            line,
            index,
            name,
            hash,
        });
    }

    Ok(rows)
}

/// Parse the `shaderinputs` table (`shader,offset,type,name,componentcount`)
pub fn parse_input_table(source: &str) -> Result<Vec<InputRow>, LayoutError> {
    let mut rows = Vec::new();

    for (line, content) in data_lines(source) {
        let row = RowReader::new(Table::Inputs, line, content, INPUT_COLUMNS)?;
        let shader = row.field(0).to_string();
        let offset = row.decimal(1, "offset")?;
        let type_code = row.decimal(2, "type")?;
        let name = row.field(3).to_string();
        let component_count = row.decimal(4, "componentcount")?;

        if shader.is_empty() {
            return Err(row.malformed("empty shader name".to_string()));
        }
        if name.is_empty() {
            return Err(row.malformed("empty attribute name".to_string()));
        }
        if component_count == 0 {
            return Err(row.malformed("componentcount must be positive".to_string()));
        }

        rows.push(InputRow {
            line,
            shader,
            offset,
            type_code,
            name,
            component_count,
        });
    }

    Ok(rows)
}

/// Non-blank lines after the header, with their 1-based line numbers
fn data_lines(source: &str) -> impl Iterator<Item = (usize, &str)> {
    source
        .lines()
        .enumerate()
        .skip(1)
        .map(|(i, content)| (i + 1, content.trim()))
        .filter(|(_, content)| !content.is_empty())
}

/// Split row with its location, for error reporting
struct RowReader<'a> {
    table: Table,
    line: usize,
    content: &'a str,
    fields: Vec<&'a str>,
}

impl<'a> RowReader<'a> {
    fn new(table: Table, line: usize, content: &'a str, columns: usize) -> Result<Self, LayoutError> {
        let fields: Vec<&str> = content.split(',').map(str::trim).collect();
        let row = Self {
            table,
            line,
            content,
            fields,
        };

        if row.fields.len() != columns {
            return Err(row.malformed(format!(
                "expected {} columns, found {}",
                columns,
                row.fields.len()
            )));
        }

        Ok(row)
    }

    fn field(&self, column: usize) -> &'a str {
        self.fields[column]
    }

    fn decimal(&self, column: usize, what: &str) -> Result<u32, LayoutError> {
        self.number(self.field(column), 10, what)
    }

    fn hex(&self, value: &str, what: &str) -> Result<u32, LayoutError> {
        self.number(value, 16, what)
    }

    /// Digits only; `from_str_radix` alone would accept a leading `+`
    fn number(&self, value: &str, radix: u32, what: &str) -> Result<u32, LayoutError> {
        if !value.chars().all(|c| c.is_digit(radix)) {
            return Err(self.malformed(format!(
                "invalid {} '{}': not a base {} number",
                what, value, radix
            )));
        }
        u32::from_str_radix(value, radix)
            .map_err(|e| self.malformed(format!("invalid {} '{}': {}", what, value, e)))
    }

    fn malformed(&self, reason: String) -> LayoutError {
        LayoutError::MalformedRow {
            table: self.table,
            line: self.line,
            reason,
            content: self.content.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hash_table() {
        let source = "index,name,hash\n0,DefaultVS,1A2B3C4D\n1,,\n2,PixelOnly,\n";
        let rows = parse_hash_table(source).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[0].name, "DefaultVS");
        assert_eq!(rows[0].hash, Some(0x1A2B3C4D));
        assert_eq!(rows[1].name, "");
        assert_eq!(rows[1].hash, None);
        assert_eq!(rows[2].index, 2);
        assert_eq!(rows[2].hash, None);
    }

    #[test]
    fn test_crlf_and_blank_lines() {
        let source = "index,name,hash\r\n0,Foo,ffffffff\r\n\r\n1,Bar,00000001\r\n";
        let rows = parse_hash_table(source).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].hash, Some(0xFFFF_FFFF));
        assert_eq!(rows[1].line, 4);
        assert_eq!(rows[1].hash, Some(1));
    }

    #[test]
    fn test_header_only() {
        assert!(parse_hash_table("index,name,hash\n").unwrap().is_empty());
        assert!(parse_input_table("").unwrap().is_empty());
    }

    #[test]
    fn test_bad_hash_is_malformed() {
        let err = parse_hash_table("index,name,hash\n0,Foo,XYZ\n").unwrap_err();
        match err {
            LayoutError::MalformedRow {
                table,
                line,
                content,
                ..
            } => {
                assert_eq!(table, Table::Hashes);
                assert_eq!(line, 2);
                assert_eq!(content, "0,Foo,XYZ");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        // Wider than 32 bits
        assert!(parse_hash_table("index,name,hash\n0,Foo,123456789\n").is_err());
    }

    #[test]
    fn test_signed_fields_are_malformed() {
        let err = parse_hash_table("index,name,hash\n0,Foo,+1234\n").unwrap_err();
        assert!(matches!(
            err,
            LayoutError::MalformedRow { line: 2, ref reason, .. } if reason.contains("invalid hash '+1234'")
        ));
        assert!(parse_hash_table("index,name,hash\n+0,Foo,1234\n").is_err());
        assert!(parse_input_table("h\nFoo,+12,1,Pos,3\n").is_err());
        assert!(parse_input_table("h\nFoo,0,+1,Pos,3\n").is_err());
        assert!(parse_input_table("h\nFoo,0,1,Pos,+3\n").is_err());
    }

    #[test]
    fn test_hash_without_name_is_kept() {
        let rows = parse_hash_table("index,name,hash\n0,,12345678\n").unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "");
        assert_eq!(rows[0].hash, Some(0x12345678));
    }

    #[test]
    fn test_parse_input_table() {
        let source = "shader,offset,type,name,componentcount\nFoo,0,1,Pos,3\nFoo, 12 ,14,Color,1\n";
        let rows = parse_input_table(source).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[1],
            InputRow {
                line: 3,
                shader: "Foo".to_string(),
                offset: 12,
                type_code: 14,
                name: "Color".to_string(),
                component_count: 1,
            }
        );
    }

    #[test]
    fn test_input_column_count() {
        let err = parse_input_table("h\nFoo,0,1,Pos\n").unwrap_err();
        assert!(matches!(
            err,
            LayoutError::MalformedRow { line: 2, ref reason, .. } if reason.contains("expected 5 columns, found 4")
        ));
    }

    #[test]
    fn test_input_numeric_fields() {
        assert!(parse_input_table("h\nFoo,-4,1,Pos,3\n").is_err());
        assert!(parse_input_table("h\nFoo,0,one,Pos,3\n").is_err());
        assert!(parse_input_table("h\nFoo,0,1,Pos,0\n").is_err());
        assert!(parse_input_table("h\nFoo,0x10,1,Pos,3\n").is_err());
    }

    #[test]
    fn test_unknown_type_code_passes_parsing() {
        // Range checking belongs to the catalog, where the shader is known
        let rows = parse_input_table("h\nFoo,0,99,Pos,3\n").unwrap();
        assert_eq!(rows[0].type_code, 99);
    }
}
