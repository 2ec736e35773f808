//! One-shot generation of artifacts
//!
//! Unlike a sync run, generation writes every artifact unconditionally and
//! never deletes anything. Declarations are independent: one failure does
//! not stop the others.

use crate::artifact::{expected_artifact, render_artifact};
use crate::format::Formatter;
use crate::{Error, Result};
use nxschema_convert::NxSchemaConverter;
use nxschema_fs::{NormalizedPath, io};
use nxschema_meta::ResolvedDeclaration;
use nxschema_module::ModuleResolver;
use std::path::Path;

/// Result of generating one artifact
#[derive(Debug)]
pub struct GenerateResult {
    pub schema: NormalizedPath,
    pub export_name: String,
    pub artifact: NormalizedPath,
    pub error: Option<Error>,
}

impl GenerateResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Results of a generation run, in declaration order
#[derive(Debug, Default)]
pub struct GenerateReport {
    pub results: Vec<GenerateResult>,
}

impl GenerateReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &GenerateResult> {
        self.results.iter().filter(|r| r.is_ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = &GenerateResult> {
        self.results.iter().filter(|r| !r.is_ok())
    }

    /// Fail if any artifact failed to generate.
    pub fn ensure_success(&self) -> Result<()> {
        let failed = self.failed().count();
        if failed == 0 {
            Ok(())
        } else {
            Err(Error::GenerationFailed {
                failed,
                total: self.results.len(),
            })
        }
    }
}

/// Collaborators shared by every artifact of a [`generate_all`] run
pub struct Generator<'a> {
    pub resolver: &'a ModuleResolver,
    pub converter: &'a NxSchemaConverter,
    pub formatter: Option<Formatter>,
    /// Directory the formatter runs from
    pub work_dir: &'a Path,
}

/// Convert and write every declaration's artifact.
pub fn generate_all(generator: &Generator<'_>, declarations: &[ResolvedDeclaration]) -> GenerateReport {
    let results = declarations
        .iter()
        .map(|declaration| {
            let error = generate_one(generator, declaration).err();
            match &error {
                None => tracing::info!(artifact = %declaration.out_path, "Generated {}", declaration.out_path),
                Some(e) => tracing::warn!(
                    artifact = %declaration.out_path,
                    "Failed to generate {}: {}",
                    declaration.out_path,
                    e
                ),
            }
            GenerateResult {
                schema: declaration.schema.clone(),
                export_name: declaration.export_name.clone(),
                artifact: declaration.out_path.clone(),
                error,
            }
        })
        .collect();
    GenerateReport { results }
}

fn generate_one(generator: &Generator<'_>, declaration: &ResolvedDeclaration) -> Result<()> {
    let document = expected_artifact(generator.resolver, generator.converter, declaration)?;
    io::write_text(&declaration.out_path, &render_artifact(&document)?)?;
    if let Some(formatter) = &generator.formatter {
        formatter.format(&declaration.out_path, generator.work_dir);
    }
    Ok(())
}
