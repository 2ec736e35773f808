//! Identity-keyed merging of declarations

use crate::declaration::Declaration;
use nxschema_fs::NormalizedPath;
use std::collections::HashMap;

/// Identity of a declaration: absolute schema path and export name.
///
/// Two declarations with the same identity describe the same artifact
/// request, however their paths were spelled.
pub fn identity_key(declaration: &Declaration, base: &NormalizedPath) -> String {
    let schema = NormalizedPath::new(&declaration.schema).absolutize(base);
    format!("{}:{}", schema, declaration.export_name_or_default())
}

/// Collapse declarations that share an identity.
///
/// Output order follows the first occurrence of each identity. Within a
/// group, later declarations win: `schema`, `exportName` and `outPath` are
/// replaced when the later one sets them, and `options` are overlaid key by
/// key.
pub fn merge_declarations(declarations: &[Declaration], base: &NormalizedPath) -> Vec<Declaration> {
    let mut merged: Vec<Declaration> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for declaration in declarations {
        let key = identity_key(declaration, base);
        match index.get(&key) {
            Some(&slot) => {
                tracing::debug!(identity = %key, "merging duplicate declaration");
                let existing = &mut merged[slot];
                existing.schema = declaration.schema.clone();
                if declaration.export_name.is_some() {
                    existing.export_name = declaration.export_name.clone();
                }
                if declaration.out_path.is_some() {
                    existing.out_path = declaration.out_path.clone();
                }
                existing.options = existing.options.overlay(&declaration.options);
            }
            None => {
                index.insert(key, merged.len());
                merged.push(declaration.clone());
            }
        }
    }

    merged
}
