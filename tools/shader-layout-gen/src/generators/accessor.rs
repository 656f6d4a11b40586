//! Python accessor generator
//!
//! One class per shader with inputs. Instances read and write a single vertex
//! through a bit stream exposing `tell`, `seek` and typed `readX`/`writeX`
//! methods. Only canonical attributes own a backing field; accessors of an
//! alias go through the field of the attribute it aliases.

use anyhow::Result;
use std::fmt::Write as FmtWrite;

use super::safe_name;
use crate::layout::SizedShader;
use crate::model::InputAttribute;

/// Class name generated for a shader
pub fn class_name(shader_name: &str) -> String {
    format!("Shader{}InputLayout", safe_name(shader_name))
}

/// Generate the accessor module from the sized layouts
pub fn generate_accessors(layouts: &[SizedShader<'_>]) -> Result<String> {
    let mut output = String::new();

    writeln!(output, "# GENERATED FILE - DO NOT EDIT")?;
    writeln!(output, "# Generator: tools/shader-layout-gen")?;
    writeln!(output)?;
    writeln!(output)?;

    for layout in layouts {
        write_class(&mut output, layout)?;
    }

    writeln!(output, "def getShaderInputLayoutByHash( hash ):")?;
    for layout in layouts {
        writeln!(output, "    if hash == 0x{:08X}:", layout.shader.hash)?;
        writeln!(output, "        return {}()", class_name(&layout.shader.name))?;
    }
    writeln!(output, "    return None")?;
    writeln!(output)?;
    writeln!(output)?;

    writeln!(output, "def getShaderInputLayoutByName( name ):")?;
    for layout in layouts {
        writeln!(output, "    if name == {}:", py_string(&layout.shader.name))?;
        writeln!(output, "        return {}()", class_name(&layout.shader.name))?;
    }
    writeln!(output, "    return None")?;

    Ok(output)
}

fn write_class(output: &mut String, layout: &SizedShader<'_>) -> Result<()> {
    let shader = layout.shader;

    writeln!(output, "class {}:", class_name(&shader.name))?;

    writeln!(output, "    def __init__(self):")?;
    for attr in shader.canonical_inputs() {
        writeln!(output, "        self._{} = 0", attr.code_name)?;
    }
    writeln!(output)?;

    writeln!(output, "    def read(self, bs):")?;
    writeln!(output, "        p = bs.tell()")?;
    for attr in shader.canonical_inputs() {
        writeln!(output, "        bs.seek( p + {} )", attr.offset)?;
        writeln!(output, "        self._{} = {}", attr.code_name, read_expr(attr))?;
    }
    writeln!(output, "        bs.seek( p + {} )", layout.size)?;
    writeln!(output)?;

    writeln!(output, "    def write(self, bs):")?;
    writeln!(output, "        p = bs.tell()")?;
    for attr in shader.canonical_inputs() {
        let method = attr.type_code.stream_method();
        writeln!(output, "        bs.seek( p + {} )", attr.offset)?;
        if attr.component_count == 1 {
            writeln!(output, "        bs.write{}( self._{} )", method, attr.code_name)?;
        } else {
            writeln!(output, "        for v in self._{}:", attr.code_name)?;
            writeln!(output, "            bs.write{}( v )", method)?;
        }
    }
    writeln!(output, "        bs.seek( p + {} )", layout.size)?;
    writeln!(output)?;

    for (index, attr) in shader.inputs().iter().enumerate() {
        let source = shader.canonical(index);

        writeln!(output, "    def get{}(self):", attr.code_name)?;
        writeln!(output, "        return self._{}", source.code_name)?;
        writeln!(output)?;

        writeln!(output, "    def set{}(self, value):", attr.code_name)?;
        writeln!(output, "        self._{} = value", source.code_name)?;
        writeln!(output)?;
    }
    writeln!(output)?;

    Ok(())
}

/// Expression reading every component of an attribute
fn read_expr(attr: &InputAttribute) -> String {
    let method = attr.type_code.stream_method();
    if attr.component_count == 1 {
        format!("bs.read{}()", method)
    } else {
        format!(
            "[bs.read{}() for _ in range( {} )]",
            method, attr.component_count
        )
    }
}

/// Single-quoted Python string literal
fn py_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout;

    fn render(hashes: &str, inputs: &str) -> String {
        let catalog = crate::build_catalog(hashes, inputs).unwrap();
        generate_accessors(&layout::plan(&catalog)).unwrap()
    }

    const HASHES: &str = "index,name,hash\n0,Foo,12345678\n1,Empty,ABCDEF01\n";

    #[test]
    fn test_position_color_class() {
        let py = render(HASHES, "h\nFoo,0,1,Pos,3\nFoo,12,14,Color,1\n");

        let expected = "class ShaderFooInputLayout:
    def __init__(self):
        self._Pos = 0
        self._Color = 0

    def read(self, bs):
        p = bs.tell()
        bs.seek( p + 0 )
        self._Pos = [bs.readFloat() for _ in range( 3 )]
        bs.seek( p + 12 )
        self._Color = bs.readUInt()
        bs.seek( p + 16 )

    def write(self, bs):
        p = bs.tell()
        bs.seek( p + 0 )
        for v in self._Pos:
            bs.writeFloat( v )
        bs.seek( p + 12 )
        bs.writeUInt( self._Color )
        bs.seek( p + 16 )

    def getPos(self):
        return self._Pos

    def setPos(self, value):
        self._Pos = value

    def getColor(self):
        return self._Color

    def setColor(self, value):
        self._Color = value

";
        assert!(py.contains(expected), "{py}");
    }

    #[test]
    fn test_alias_delegates_to_canonical() {
        let py = render(HASHES, "h\nFoo,0,1,Pos,3\nFoo,0,2,Pos,3\n");

        // One backing field, two accessor pairs
        assert!(py.contains("        self._Pos = 0\n"));
        assert!(!py.contains("self._Pos_2 = 0"));
        assert_eq!(py.matches("bs.seek( p + 0 )").count(), 2);
        assert!(py.contains("    def getPos_2(self):\n        return self._Pos\n"));
        assert!(py.contains("    def setPos_2(self, value):\n        self._Pos = value\n"));
    }

    #[test]
    fn test_lookups() {
        let py = render(HASHES, "h\nFoo,0,1,Pos,3\n");

        assert!(py.contains(
            "def getShaderInputLayoutByHash( hash ):\n    if hash == 0x12345678:\n        return ShaderFooInputLayout()\n    return None\n"
        ));
        assert!(py.contains(
            "def getShaderInputLayoutByName( name ):\n    if name == 'Foo':\n        return ShaderFooInputLayout()\n    return None\n"
        ));
        assert!(!py.contains("Empty"));
    }

    #[test]
    fn test_reserved_characters_in_names() {
        let py = render("index,name,hash\n0,VS$Skin,00000001\n", "h\nVS$Skin,0,8,Index,4\n");

        assert!(py.contains("class ShaderVS_DOLLAR_SkinInputLayout:\n"));
        // Lookup by name compares against the raw name
        assert!(py.contains("    if name == 'VS$Skin':\n        return ShaderVS_DOLLAR_SkinInputLayout()\n"));
        assert!(py.contains("[bs.readUByte() for _ in range( 4 )]"));
    }

    #[test]
    fn test_py_string() {
        assert_eq!(py_string("Foo"), "'Foo'");
        assert_eq!(py_string("a'b\\c"), "'a\\'b\\\\c'");
    }
}
