//! Binary template generator
//!
//! Emits a hex-editor binary template: a hash enum over every shader, one
//! positional struct per shader with inputs, and a `ReadVertexBuffer` routine
//! that picks the struct from the active shader's hash. Field order follows the
//! input table, not byte offsets; tooling built on the template depends on it.

use anyhow::Result;
use std::fmt::Write as FmtWrite;

use super::safe_name;
use crate::config::TemplateConfig;
use crate::layout::SizedShader;
use crate::model::Catalog;

/// Only the low 20 bits of a hash identify a shader at runtime
pub const HASH_ENUM_MASK: u32 = 0x000F_FFFF;

const ENUM_NAME: &str = "rShaderObjectHash";
const ENUM_MEMBER_PREFIX: &str = "SHADER_";
const STRUCT_PREFIX: &str = "rVertexShaderInputLayout_";

/// Value stored in the hash enum
pub fn masked_hash(hash: u32) -> u32 {
    hash & HASH_ENUM_MASK
}

/// Enum member identifier for a shader
pub fn enum_member(name: &str) -> String {
    format!("{}{}", ENUM_MEMBER_PREFIX, safe_name(name))
}

/// Struct typedef name for a shader
pub fn struct_name(name: &str) -> String {
    format!("{}{}", STRUCT_PREFIX, safe_name(name))
}

/// Generate the binary template from the catalog and its sized layouts
pub fn generate_template(
    catalog: &Catalog,
    layouts: &[SizedShader<'_>],
    config: &TemplateConfig,
) -> Result<String> {
    let mut output = String::new();

    writeln!(output, "// GENERATED FILE - DO NOT EDIT")?;
    writeln!(output, "// Generator: tools/shader-layout-gen")?;
    writeln!(output)?;

    writeln!(output, "#ifndef {}", config.include_guard)?;
    writeln!(output, "#define {}", config.include_guard)?;
    writeln!(output, "#include \"{}\"", config.include)?;
    writeln!(output)?;

    // Hash enum, including shaders without inputs
    writeln!(output, "typedef enum<uint> {{")?;
    for shader in catalog.shaders() {
        writeln!(
            output,
            " {} = 0x{:08X}, // 0x{:08X}",
            enum_member(&shader.name),
            masked_hash(shader.hash),
            shader.hash
        )?;
    }
    writeln!(output, "}} {} <read={}ToString>;", ENUM_NAME, ENUM_NAME)?;
    writeln!(output)?;

    for layout in layouts {
        write_struct(&mut output, layout)?;
    }

    // Dispatch
    writeln!(
        output,
        "void ReadVertexBuffer( {} shader, int vertexCount ) {{",
        ENUM_NAME
    )?;
    writeln!(output, " switch ( shader ) {{")?;
    for layout in layouts {
        let name = &layout.shader.name;
        writeln!(
            output,
            "  case {}: {} VertexBuffer[ vertexCount ] <optimize=false>; break;",
            enum_member(name),
            struct_name(name)
        )?;
    }
    writeln!(output, " }}")?;
    writeln!(output, "}}")?;
    writeln!(output)?;

    writeln!(output, "#endif")?;

    Ok(output)
}

fn write_struct(output: &mut String, layout: &SizedShader<'_>) -> Result<()> {
    let shader = layout.shader;

    writeln!(output, "/* size = {} */", layout.size)?;
    writeln!(output, "typedef struct {{")?;
    writeln!(output, " local int64 p = FTell();")?;

    for attr in shader.inputs() {
        write!(
            output,
            " FSeek( p + {} ); /* {} */ {} {}[{}];",
            attr.offset,
            attr.type_code.code(),
            attr.type_code.display_name(),
            attr.code_name,
            attr.component_count
        )?;
        if let Some(source) = attr.alias_of {
            write!(output, " /* alias of {} */", shader.inputs()[source].code_name)?;
        }
        writeln!(output)?;
    }

    writeln!(output, " FSeek( p + {} );", layout.size)?;
    writeln!(output, "}} {};", struct_name(&shader.name))?;
    writeln!(output)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout;

    fn render(hashes: &str, inputs: &str) -> String {
        let catalog = crate::build_catalog(hashes, inputs).unwrap();
        let layouts = layout::plan(&catalog);
        generate_template(&catalog, &layouts, &TemplateConfig::default()).unwrap()
    }

    const HASHES: &str = "index,name,hash\n0,Foo,12345678\n1,Empty,ABCDEF01\n";

    #[test]
    fn test_hash_masking() {
        assert_eq!(masked_hash(0x12345678), 0x00045678);
        assert_eq!(masked_hash(0xFFFFFFFF), 0x000FFFFF);

        let bt = render(HASHES, "h\nFoo,0,1,Pos,3\n");
        assert!(bt.contains(" SHADER_Foo = 0x00045678, // 0x12345678\n"));
        assert!(bt.contains(" SHADER_Empty = 0x000DEF01, // 0xABCDEF01\n"));
    }

    #[test]
    fn test_position_color_struct() {
        let bt = render(HASHES, "h\nFoo,0,1,Pos,3\nFoo,12,14,Color,1\n");

        let expected = "/* size = 16 */
typedef struct {
 local int64 p = FTell();
 FSeek( p + 0 ); /* 1 */ f32 Pos[3];
 FSeek( p + 12 ); /* 14 */ color32 Color[1];
 FSeek( p + 16 );
} rVertexShaderInputLayout_Foo;
";
        assert!(bt.contains(expected), "{bt}");
        assert!(bt.contains(
            "  case SHADER_Foo: rVertexShaderInputLayout_Foo VertexBuffer[ vertexCount ] <optimize=false>; break;\n"
        ));
    }

    #[test]
    fn test_empty_shader_only_in_enum() {
        let bt = render(HASHES, "h\nFoo,0,1,Pos,3\n");

        assert!(bt.contains("SHADER_Empty ="));
        assert!(!bt.contains("rVertexShaderInputLayout_Empty"));
        assert!(!bt.contains("case SHADER_Empty"));
    }

    #[test]
    fn test_declared_order_and_aliases() {
        let bt = render(HASHES, "h\nFoo,16,2,Uv,2\nFoo,0,1,Pos,3\nFoo,0,5,Pos,4\n");

        let uv = bt.find("f16 Uv[2];").unwrap();
        let pos = bt.find("f32 Pos[3];").unwrap();
        assert!(uv < pos, "fields must follow table order");
        assert!(bt.contains(" FSeek( p + 0 ); /* 5 */ fs16 Pos_2[4]; /* alias of Pos */\n"));
        assert!(bt.contains(" FSeek( p + 20 );\n"));
    }

    #[test]
    fn test_reserved_characters_in_names() {
        let bt = render("index,name,hash\n0,VS$Skin,00000010\n", "h\nVS$Skin,0,1,Pos,3\n");

        assert!(bt.contains(" SHADER_VS_DOLLAR_Skin = 0x00000010, // 0x00000010\n"));
        assert!(bt.contains("} rVertexShaderInputLayout_VS_DOLLAR_Skin;\n"));
        assert!(!bt.contains('$'));
    }

    #[test]
    fn test_unnamed_shader() {
        let bt = render("index,name,hash\n0,,00000020\n", "h\n");

        assert!(bt.contains(" SHADER__EMPTY_ = 0x00000020, // 0x00000020\n"));
    }

    #[test]
    fn test_include_guard_and_config() {
        let catalog = crate::build_catalog(HASHES, "h\n").unwrap();
        let config = TemplateConfig {
            include_guard: "UMVC3_LAYOUTS_BT".to_string(),
            include: "umvc3.bt".to_string(),
        };
        let bt = generate_template(&catalog, &[], &config).unwrap();

        assert!(bt.contains("#ifndef UMVC3_LAYOUTS_BT\n#define UMVC3_LAYOUTS_BT\n#include \"umvc3.bt\"\n"));
        assert!(bt.contains("} rShaderObjectHash <read=rShaderObjectHashToString>;\n"));
        assert!(bt.ends_with("#endif\n"));
    }
}
