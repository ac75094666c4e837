use super::descriptor::DropDescriptor;
use crate::domain::{DomainError, DomainResult};

/// Validates all DropDescriptor invariants
pub fn validate_descriptor(descriptor: &DropDescriptor) -> DomainResult<()> {
    validate_source_tag(descriptor)?;
    validate_no_nul_bytes(descriptor)?;
    Ok(())
}

/// Every descriptor says where it came from
fn validate_source_tag(descriptor: &DropDescriptor) -> DomainResult<()> {
    if descriptor.source_tag().trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Drop descriptor must carry a source tag".to_string(),
        ));
    }
    Ok(())
}

/// NUL can never be part of a host path
fn validate_no_nul_bytes(descriptor: &DropDescriptor) -> DomainResult<()> {
    let fields = [
        ("name", Some(descriptor.name())),
        ("rawPath", descriptor.raw_path()),
        ("url", descriptor.url()),
        ("relativePath", descriptor.relative_path()),
    ];

    for (field, value) in fields {
        if value.is_some_and(|v| v.contains('\0')) {
            return Err(DomainError::InvariantViolation(format!(
                "Drop descriptor field {} contains a NUL byte",
                field
            )));
        }
    }
    Ok(())
}

/// Drop Descriptor invariants:
///
/// 1. `name` is always present (it may be empty; the engine then reports EXTRACTION_EMPTY)
/// 2. Path-like fields are optional and may be populated together
/// 3. The descriptor is immutable once built
