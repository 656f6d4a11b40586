//! Catalog builder
//!
//! Merges the parsed hash table and input table into a [`Catalog`]. Rows are
//! applied in table order; each attribute is alias-resolved and given its code
//! name as it is appended, so the result depends only on row order.

pub mod alias;
pub mod naming;

use tracing::{debug, warn};

use crate::error::LayoutError;
use crate::model::{Catalog, InputAttribute, ShaderRecord, TypeCode};
use crate::tables::{HashRow, InputRow};

/// Build the catalog from already parsed rows
pub fn build(hash_rows: &[HashRow], input_rows: &[InputRow]) -> Result<Catalog, LayoutError> {
    let mut catalog = Catalog::default();

    for row in hash_rows {
        let Some(hash) = row.hash else {
            continue;
        };

        if !catalog.insert(ShaderRecord::new(row.index, row.name.clone(), hash)) {
            warn!(
                shader = %row.name,
                line = row.line,
                "duplicate shader name in hash table; input rows bind to the first record"
            );
        }
    }

    for row in input_rows {
        add_input(&mut catalog, row)?;
    }

    Ok(catalog)
}

/// Append one input row to the shader it names
fn add_input(catalog: &mut Catalog, row: &InputRow) -> Result<(), LayoutError> {
    let shader = catalog.find_by_name_mut(&row.shader).ok_or_else(|| {
        LayoutError::UnknownShaderReference {
            shader: row.shader.clone(),
            line: row.line,
        }
    })?;

    let type_code =
        TypeCode::from_code(row.type_code).ok_or_else(|| LayoutError::UnknownTypeCode {
            code: row.type_code,
            shader: row.shader.clone(),
            attribute: row.name.clone(),
            line: row.line,
        })?;

    let index = shader.push_input(row.offset, type_code, &row.name, row.component_count);
    let attr = &shader.inputs()[index];

    if let Some(source) = attr.alias_of {
        debug!(
            shader = %shader.name,
            attribute = %attr.code_name,
            alias_of = %shader.inputs()[source].code_name,
            offset = attr.offset,
            "aliased attribute"
        );
    }
    if attr.code_name != attr.raw_name {
        debug!(
            shader = %shader.name,
            raw_name = %attr.raw_name,
            code_name = %attr.code_name,
            "renamed colliding attribute"
        );
    }

    Ok(())
}

impl ShaderRecord {
    /// Append an attribute, resolving its alias and code name. Returns its index.
    pub(crate) fn push_input(
        &mut self,
        offset: u32,
        type_code: TypeCode,
        raw_name: &str,
        component_count: u32,
    ) -> usize {
        let alias_of = alias::resolve(&self.inputs, offset);
        let code_name = self.names.assign(raw_name);

        self.inputs.push(InputAttribute {
            offset,
            type_code,
            raw_name: raw_name.to_string(),
            code_name,
            component_count,
            alias_of,
        });
        self.inputs.len() - 1
    }
}
