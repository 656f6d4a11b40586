//! Errors raised while ingesting the shader tables

use std::fmt;

/// Which source table a row came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    /// `shaderhashes` (index, name, hash)
    Hashes,
    /// `shaderinputs` (shader, offset, type, name, componentcount)
    Inputs,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Table::Hashes => f.write_str("shaderhashes"),
            Table::Inputs => f.write_str("shaderinputs"),
        }
    }
}

/// Fatal ingestion error. Every variant carries enough context to fix the source table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// Wrong column count or an unparsable field
    #[error("{table} line {line}: {reason} (row: {content:?})")]
    MalformedRow {
        table: Table,
        line: usize,
        reason: String,
        content: String,
    },

    /// An input row names a shader that the hash table never declared
    #[error("shaderinputs line {line}: unknown shader '{shader}'")]
    UnknownShaderReference { shader: String, line: usize },

    /// Type code outside the closed 1-14 table
    #[error("shaderinputs line {line}: unknown type code {code} for {shader}.{attribute}")]
    UnknownTypeCode {
        code: u32,
        shader: String,
        attribute: String,
        line: usize,
    },
}
