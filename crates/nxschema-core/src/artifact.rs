//! Computing, rendering and comparing artifact documents

use crate::{Error, Result};
use nxschema_convert::NxSchemaConverter;
use nxschema_meta::ResolvedDeclaration;
use nxschema_module::ModuleResolver;
use serde_json::Value;

/// Load a declaration's schema export and convert it into an artifact document.
///
/// # Errors
///
/// - [`Error::Module`] if the module or export cannot be resolved
/// - [`Error::Conversion`] if the conversion fails, attributed to the artifact
pub fn expected_artifact(
    resolver: &ModuleResolver,
    converter: &NxSchemaConverter,
    declaration: &ResolvedDeclaration,
) -> Result<Value> {
    let source = resolver.load_export(&declaration.schema, &declaration.export_name)?;
    converter
        .convert(&source, &declaration.options)
        .map_err(|e| Error::conversion(declaration.out_path.to_native(), e))
}

/// Render an artifact as it is written to disk: two-space indentation,
/// sorted keys, trailing newline.
pub fn render_artifact(document: &Value) -> Result<String> {
    let mut content = serde_json::to_string_pretty(document)?;
    content.push('\n');
    Ok(content)
}

/// Structural comparison of an expected document against artifact text.
///
/// Formatting and key order never count as a difference. Text that is not
/// valid JSON never matches.
pub fn artifact_matches(expected: &Value, actual: &str) -> bool {
    match serde_json::from_str::<Value>(actual) {
        Ok(actual) => &actual == expected,
        Err(e) => {
            tracing::debug!(error = %e, "artifact is not valid JSON");
            false
        }
    }
}
