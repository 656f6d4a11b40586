//! Artifact generators
//!
//! Both backends render the same normalized catalog and sized layouts; neither
//! looks at the source tables.

pub mod accessor;
pub mod template;

/// Characters that cannot appear in generated identifiers, with their replacements
const RESERVED_CHARS: &[(char, &str)] = &[('$', "_DOLLAR_")];

/// Stand-in for a shader captured without a name
const EMPTY_NAME: &str = "_EMPTY_";

/// Shader name made safe for use inside a generated identifier
pub fn safe_name(name: &str) -> String {
    if name.is_empty() {
        return EMPTY_NAME.to_string();
    }

    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match RESERVED_CHARS.iter().find(|(reserved, _)| *reserved == c) {
            Some((_, token)) => out.push_str(token),
            None => out.push(c),
        }
    }
    out
}
