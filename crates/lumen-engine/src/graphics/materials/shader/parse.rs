//! Reads the `struct Uniforms` block out of WGSL material source.

use super::super::{MaterialError, UniformKind, UniformLayout, UniformSet};

/// Layout of the `struct Uniforms` declared in `source`.
///
/// Line comments are ignored. Field attributes (`@align`, `@size`) are not
/// supported and reported as malformed fields.
pub fn parse_uniform_struct(source: &str) -> Result<UniformLayout, MaterialError> {
    let code: String = source
        .lines()
        .map(|l| l.split_once("//").map_or(l, |(code, _)| code))
        .collect::<Vec<_>>()
        .join("\n");

    let start = find_struct(&code).ok_or(MaterialError::MissingUniformStruct)?;
    let rest = &code[start..];
    let open = rest.find('{').ok_or(MaterialError::MissingUniformStruct)?;
    let close = rest[open..].find('}').ok_or(MaterialError::MissingUniformStruct)? + open;
    let body = &rest[open + 1..close];

    let mut fields = Vec::new();
    for raw in body.split(',') {
        let item = raw.trim();
        if item.is_empty() {
            continue;
        }
        let Some((name, ty)) = item.split_once(':') else {
            return Err(MaterialError::MalformedField(item.to_string()));
        };
        let name = name.trim();
        if name.is_empty() || name.starts_with('@') || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(MaterialError::MalformedField(item.to_string()));
        }
        let kind = UniformKind::from_wgsl(ty.trim()).ok_or_else(|| MaterialError::UnsupportedType {
            field: name.to_string(),
            ty: ty.trim().to_string(),
        })?;
        fields.push((name, kind));
    }

    if !code.contains("fn shade(") {
        return Err(MaterialError::MissingShadeFn);
    }
    Ok(UniformLayout::new(fields))
}

/// `struct Uniforms` as a whole word.
fn find_struct(code: &str) -> Option<usize> {
    code.match_indices("struct").find_map(|(i, _)| {
        let after = code[i + "struct".len()..].trim_start();
        let ident: String = after.chars().take_while(|c| c.is_alphanumeric() || *c == '_').collect();
        (ident == "Uniforms").then_some(i)
    })
}

/// Every declared field has an initial value of the same kind and every
/// initial value is declared.
pub fn check_uniforms(layout: &UniformLayout, initial: &UniformSet) -> Result<(), MaterialError> {
    for field in layout.fields() {
        match initial.get(&field.name) {
            None => return Err(MaterialError::Uninitialized(field.name.clone())),
            Some(v) if v.kind() != field.kind => {
                return Err(MaterialError::UniformKind {
                    name: field.name.clone(),
                    expected: field.kind,
                    found: v.kind(),
                });
            }
            Some(_) => {}
        }
    }
    match initial.names().find(|n| layout.field(n).is_none()) {
        Some(name) => Err(MaterialError::Undeclared(name.to_string())),
        None => Ok(()),
    }
}
