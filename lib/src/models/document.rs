use super::category::Category;
use super::profile::{ActivityEntry, BookmarkNode, Profile, ProfileDetail, ProfileSource};
use crate::error::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Host metadata stamped into every export
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Environment {
    pub browser_name: String,
    pub browser_version: String,
    pub os_name: String,
    pub extension_version: String,
}

impl Environment {
    /// Describe the running host
    pub fn detect() -> Self {
        Self {
            browser_name: "bukurs".to_string(),
            browser_version: env!("CARGO_PKG_VERSION").to_string(),
            os_name: std::env::consts::OS.to_string(),
            extension_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDetails {
    /// ISO-8601 creation time
    pub timestamp_creation: String,
    /// Included categories, in selection order
    pub export_type: Vec<Category>,
    #[serde(flatten)]
    pub environment: Environment,
}

/// The `export` mapping of a document: one optional slice per category
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_detail: Option<ProfileDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_profiles: Option<Vec<Profile>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_all_profile: Option<Profile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_bookmarks: Option<Vec<BookmarkNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_folder_style: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_bookmarks_style: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_settings: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_user_activity_log: Option<Vec<ActivityEntry>>,
}

// A null slice would deserialize back as an absent one
fn object_or_empty(value: &Value) -> Value {
    match value {
        Value::Null => Value::Object(Default::default()),
        other => other.clone(),
    }
}

impl ExportPayload {
    pub fn contains(&self, category: Category) -> bool {
        match category {
            Category::AllProfiles => self.all_profiles.is_some(),
            Category::CurrentAllProfile => self.current_all_profile.is_some(),
            Category::CurrentBookmarks => self.current_bookmarks.is_some(),
            Category::DefaultFolderStyle => self.default_folder_style.is_some(),
            Category::DefaultBookmarksStyle => self.default_bookmarks_style.is_some(),
            Category::UserSettings => self.user_settings.is_some(),
            Category::CurrentUserActivityLog => self.current_user_activity_log.is_some(),
        }
    }

    /// Copy the category's slice out of the source by value
    pub fn insert_from(&mut self, category: Category, source: &ProfileSource) {
        let active = &source.active;
        match category {
            Category::AllProfiles => self.all_profiles = Some(source.all.clone()),
            Category::CurrentAllProfile => self.current_all_profile = Some(active.clone()),
            Category::CurrentBookmarks => self.current_bookmarks = Some(active.bookmarks.clone()),
            Category::DefaultFolderStyle => {
                self.default_folder_style = Some(object_or_empty(&active.default_folder_style))
            }
            Category::DefaultBookmarksStyle => {
                self.default_bookmarks_style =
                    Some(object_or_empty(&active.default_bookmarks_style))
            }
            Category::UserSettings => {
                self.user_settings = Some(object_or_empty(&active.user_settings))
            }
            Category::CurrentUserActivityLog => {
                self.current_user_activity_log = Some(active.user_activity_log.clone())
            }
        }
    }

    /// Decode a raw JSON slice into the category's typed field
    pub fn insert_value(&mut self, category: Category, value: Value) -> Result<()> {
        match category {
            Category::AllProfiles => self.all_profiles = Some(serde_json::from_value(value)?),
            Category::CurrentAllProfile => {
                self.current_all_profile = Some(serde_json::from_value(value)?)
            }
            Category::CurrentBookmarks => {
                self.current_bookmarks = Some(serde_json::from_value(value)?)
            }
            Category::DefaultFolderStyle => self.default_folder_style = Some(value),
            Category::DefaultBookmarksStyle => self.default_bookmarks_style = Some(value),
            Category::UserSettings => self.user_settings = Some(value),
            Category::CurrentUserActivityLog => {
                self.current_user_activity_log = Some(serde_json::from_value(value)?)
            }
        }
        Ok(())
    }

    pub fn remove(&mut self, category: Category) {
        match category {
            Category::AllProfiles => self.all_profiles = None,
            Category::CurrentAllProfile => self.current_all_profile = None,
            Category::CurrentBookmarks => self.current_bookmarks = None,
            Category::DefaultFolderStyle => self.default_folder_style = None,
            Category::DefaultBookmarksStyle => self.default_bookmarks_style = None,
            Category::UserSettings => self.user_settings = None,
            Category::CurrentUserActivityLog => self.current_user_activity_log = None,
        }
    }

    /// Categories with a slice present, in `Category::ALL` order
    pub fn categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.contains(*c))
            .collect()
    }
}

/// The canonical export artifact payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub details: ExportDetails,
    pub export: ExportPayload,
}

impl ExportDocument {
    /// Empty document stamped with the current time
    pub fn new(environment: Environment) -> Self {
        Self::with_timestamp(environment, Utc::now())
    }

    pub fn with_timestamp(environment: Environment, created: DateTime<Utc>) -> Self {
        Self {
            details: ExportDetails {
                timestamp_creation: created.to_rfc3339_opts(SecondsFormat::Millis, true),
                export_type: Vec::new(),
                environment,
            },
            export: ExportPayload::default(),
        }
    }

    /// Add a category, keeping `exportType` and the `export` keys in step
    pub fn include(&mut self, category: Category, source: &ProfileSource) {
        self.export.insert_from(category, source);
        if !self.details.export_type.contains(&category) {
            self.details.export_type.push(category);
        }
        if self.export.profile_detail.is_none() {
            self.export.profile_detail = Some(source.active.detail());
        }
    }

    /// Drop a category's slice and its `exportType` entry together
    pub fn exclude(&mut self, category: Category) {
        self.export.remove(category);
        self.details.export_type.retain(|c| *c != category);
        if self.details.export_type.is_empty() {
            self.export.profile_detail = None;
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.details.export_type
    }

    pub fn is_empty(&self) -> bool {
        self.details.export_type.is_empty()
    }

    /// `export` keys (besides `profileDetail`) match `exportType` exactly
    pub fn is_symmetric(&self) -> bool {
        let listed: BTreeSet<Category> = self.details.export_type.iter().copied().collect();
        let present: BTreeSet<Category> = self.export.categories().into_iter().collect();
        listed.len() == self.details.export_type.len() && listed == present
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Creation time, when `timestampCreation` is valid RFC 3339
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.details.timestamp_creation)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}
