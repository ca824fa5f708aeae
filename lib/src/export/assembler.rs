use super::selector::ExportTypeSelector;
use crate::error::{ProfileError, Result};
use crate::models::{Environment, ExportDocument, ProfileSource};
use crate::transport::{strip_forbidden_chars, MAX_FILE_NAME_LEN};

/// Builds export documents from the live profile and the current selection
#[derive(Debug, Clone)]
pub struct ExportAssembler {
    environment: Environment,
}

impl ExportAssembler {
    pub fn new(environment: Environment) -> Self {
        Self { environment }
    }

    pub fn assemble(
        &self,
        source: &ProfileSource,
        selection: &ExportTypeSelector,
        file_name_hint: &str,
    ) -> Result<ExportDocument> {
        if selection.is_empty() {
            return Err(ProfileError::Validation(
                "select at least one category to export".to_string(),
            ));
        }
        validate_file_name(file_name_hint)?;

        let mut doc = ExportDocument::new(self.environment.clone());
        for &category in selection.selected() {
            log::debug!("Including {} in export", category);
            doc.include(category, source);
        }
        debug_assert!(doc.is_symmetric());
        Ok(doc)
    }
}

/// The hint must be non-empty and at most `MAX_FILE_NAME_LEN` characters once stripped
pub fn validate_file_name(file_name_hint: &str) -> Result<String> {
    let stripped = strip_forbidden_chars(file_name_hint.trim());
    if stripped.is_empty() {
        return Err(ProfileError::Validation("file name is empty".to_string()));
    }
    let len = stripped.chars().count();
    if len > MAX_FILE_NAME_LEN {
        return Err(ProfileError::Validation(format!(
            "file name is {} characters long (maximum {})",
            len, MAX_FILE_NAME_LEN
        )));
    }
    Ok(stripped)
}
