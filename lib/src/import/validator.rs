use crate::models::{
    Category, Environment, ExportDetails, ExportDocument, ExportPayload, ProfileDetail,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Schema name the import path validates against
pub const PROFILE_SCHEMA: &str = "userProfileObject";

/// Counts and diagnostics from one validation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationStatus {
    pub success: usize,
    pub error: usize,
    pub critical_error: usize,
    pub messages: Vec<String>,
}

impl ValidationStatus {
    fn error(&mut self, message: String) {
        self.error += 1;
        self.messages.push(message);
    }

    fn critical(&mut self, message: String) {
        self.critical_error += 1;
        self.messages.push(message);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    /// The accepted part of the candidate
    pub valid_object: ExportDocument,
    pub status: ValidationStatus,
}

/// Decides whether a decoded object is a well-formed profile export
///
/// `None` means "not a recognized profile export". Implementations must not
/// panic on arbitrary input.
pub trait StructuralValidator {
    fn validate(&self, candidate: &Value, schema_name: &str) -> Option<ValidationResult>;
}

/// Built-in validator for the `userProfileObject` schema
///
/// Keeps every category that is listed in `exportType` and whose slice
/// decodes. Unknown tags and orphan slices are errors; listed categories with
/// a missing or malformed slice are critical errors. A candidate with no
/// surviving category is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator;

impl SchemaValidator {
    fn details(
        details: &Map<String, Value>,
        status: &mut ValidationStatus,
    ) -> (String, Vec<Category>, Environment) {
        let timestamp = match details.get("timestampCreation").and_then(Value::as_str) {
            Some(ts) => ts.to_string(),
            None => {
                status.error("details.timestampCreation is missing".to_string());
                String::new()
            }
        };

        let mut categories = Vec::new();
        match details.get("exportType").and_then(Value::as_array) {
            Some(tags) => {
                for tag in tags {
                    match tag.as_str().and_then(Category::from_tag) {
                        Some(c) if !categories.contains(&c) => categories.push(c),
                        Some(_) => {}
                        None => status.error(format!("unknown export type {} ignored", tag)),
                    }
                }
            }
            None => status.critical("details.exportType is missing".to_string()),
        }

        let environment = serde_json::from_value::<Environment>(Value::Object(details.clone()))
            .unwrap_or_default();

        (timestamp, categories, environment)
    }
}

impl StructuralValidator for SchemaValidator {
    fn validate(&self, candidate: &Value, schema_name: &str) -> Option<ValidationResult> {
        if schema_name != PROFILE_SCHEMA {
            log::warn!("Unknown validation schema '{}'", schema_name);
            return None;
        }

        let root = candidate.as_object()?;
        let details = root.get("details")?.as_object()?;
        let export = root.get("export")?.as_object()?;

        let mut status = ValidationStatus::default();
        let (timestamp, listed, environment) = Self::details(details, &mut status);
        let mixed = listed.iter().any(|c| c.is_whole_profile())
            && listed.iter().any(|c| !c.is_whole_profile());
        if mixed {
            status.error("exportType mixes whole-profile and partial categories".to_string());
        }

        let mut payload = ExportPayload::default();
        let mut accepted = Vec::new();

        for &category in &listed {
            match export.get(category.tag()) {
                None | Some(Value::Null) => {
                    status.critical(format!("{} is listed but has no data; skipped", category))
                }
                Some(slice) => match payload.insert_value(category, slice.clone()) {
                    Ok(()) => {
                        status.success += 1;
                        accepted.push(category);
                    }
                    Err(e) => status.critical(format!("{} is malformed ({}); skipped", category, e)),
                },
            }
        }

        for key in export.keys() {
            if key == "profileDetail" {
                continue;
            }
            match Category::from_tag(key) {
                // Listed categories were already counted above
                Some(c) if listed.contains(&c) => {}
                Some(c) => status.error(format!("{} is not listed in exportType; ignored", c)),
                None => status.error(format!("unknown entry '{}' ignored", key)),
            }
        }

        if accepted.is_empty() {
            log::debug!("Validation found no usable category: {:?}", status.messages);
            return None;
        }

        payload.profile_detail = match export.get("profileDetail") {
            Some(detail) => match serde_json::from_value::<ProfileDetail>(detail.clone()) {
                Ok(detail) => Some(detail),
                Err(e) => {
                    status.error(format!("profileDetail is malformed ({})", e));
                    None
                }
            },
            None => {
                status.error("profileDetail is missing".to_string());
                None
            }
        };

        Some(ValidationResult {
            valid_object: ExportDocument {
                details: ExportDetails {
                    timestamp_creation: timestamp,
                    export_type: accepted,
                    environment,
                },
                export: payload,
            },
            status,
        })
    }
}
