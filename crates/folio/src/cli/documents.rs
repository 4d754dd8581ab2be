//! Document listing and validation handlers.

use folio::{DocumentRegistry, DocumentSpec, FolioResult, StepKind};
use std::path::Path;

/// Print built-in document identifiers and names.
pub fn list_documents() -> FolioResult<()> {
    let registry = DocumentRegistry::builtin()?;
    for spec in registry.iter() {
        println!("{:<20} {} ({} steps)", spec.id(), spec.name(), spec.steps().len());
    }
    Ok(())
}

/// Print the steps of a built-in document.
pub fn show_document(id: &str) -> FolioResult<()> {
    let registry = DocumentRegistry::builtin()?;
    print_spec(registry.get(id)?);
    Ok(())
}

/// Load, validate and summarize a TOML document definition.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn validate_document(path: &Path) -> FolioResult<()> {
    let spec = DocumentSpec::from_file(path)?;
    println!("{} is valid", path.display());
    print_spec(&spec);
    Ok(())
}

fn print_spec(spec: &DocumentSpec) {
    println!("{} ({})", spec.name(), spec.id());
    println!("System role: {}", spec.system_role());
    for (index, step) in spec.steps().iter().enumerate() {
        println!("{:>2}. {:<28} {}", index + 1, step.key(), step.kind());
        match step.kind() {
            StepKind::ImageBatch { slots, .. } => {
                for slot in slots {
                    println!("      - {} ({})", slot.name(), slot.size());
                }
            }
            StepKind::TextBatch { members } => {
                for member in members {
                    println!("      - {}", member.name());
                }
            }
            StepKind::Text { .. } | StepKind::Table { .. } => {}
        }
        if !step.depends_on().is_empty() {
            println!("      uses: {}", step.depends_on().join(", "));
        }
    }
}
