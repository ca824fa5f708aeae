use super::classifier::{classify, ArtifactKind};
use super::merge::{merge_into, MergeOutcome, MergeSelection, PlacementNotice};
use super::validator::{SchemaValidator, StructuralValidator, ValidationResult, PROFILE_SCHEMA};
use crate::crypto::{CryptoCodec, Password};
use crate::error::{ProfileError, Result};
use crate::lock::SessionLock;
use crate::models::{Category, ProfileId};
use crate::store::ProfileStore;
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingPassword,
    Validating,
    AwaitingSelection,
    Applying,
    Done,
    Error,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::AwaitingPassword => "awaiting a password",
            SessionState::Validating => "validating",
            SessionState::AwaitingSelection => "awaiting a selection",
            SessionState::Applying => "applying",
            SessionState::Done => "done",
            SessionState::Error => "in error",
        };
        f.write_str(name)
    }
}

/// What a successful apply did
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyReport {
    pub applied: Vec<Category>,
    pub created_profiles: Vec<ProfileId>,
    pub bookmarks_imported: usize,
}

/// One review-and-apply flow for an imported artifact
///
/// Idle -> AwaitingPassword (encrypted only) -> Validating -> AwaitingSelection
/// -> Applying -> Done, with Error reachable from the loading steps.
pub struct ImportSession {
    lock: SessionLock,
    validator: Box<dyn StructuralValidator>,
    state: SessionState,
    encrypted: Option<String>,
    result: Option<ValidationResult>,
    selection: MergeSelection,
    last_error: Option<String>,
}

impl ImportSession {
    pub fn new(lock: SessionLock, validator: Box<dyn StructuralValidator>) -> Self {
        Self {
            lock,
            validator,
            state: SessionState::Idle,
            encrypted: None,
            result: None,
            selection: MergeSelection::default(),
            last_error: None,
        }
    }

    /// Session using the built-in `SchemaValidator`
    pub fn with_schema_validator(lock: SessionLock) -> Self {
        Self::new(lock, Box::new(SchemaValidator))
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn validation(&self) -> Option<&ValidationResult> {
        self.result.as_ref()
    }

    pub fn selection(&self) -> &MergeSelection {
        &self.selection
    }

    /// Return to Idle, dropping any artifact, password-protected text and selection
    pub fn reset(&mut self) {
        self.state = SessionState::Idle;
        self.encrypted = None;
        self.result = None;
        self.selection = MergeSelection::default();
        self.last_error = None;
    }

    /// Start over with the text of a newly selected artifact
    pub fn load(&mut self, raw: &str) -> Result<SessionState> {
        let _guard = self.lock.try_acquire()?;
        self.reset();

        let kind = match classify(raw) {
            Ok(kind) => kind,
            Err(e) => return Err(self.fail(e)),
        };
        log::info!("Artifact classified as {}", kind.name());

        match kind {
            ArtifactKind::Plain(value) => self.validate(&value),
            ArtifactKind::Encrypted => {
                self.encrypted = Some(raw.to_string());
                self.state = SessionState::AwaitingPassword;
                Ok(self.state)
            }
            ArtifactKind::Unsupported => Err(self.fail(ProfileError::UnsupportedFormat)),
        }
    }

    /// Decrypt a pending artifact; a wrong password leaves the session waiting
    pub fn unlock(&mut self, password: &Password) -> Result<SessionState> {
        if self.state != SessionState::AwaitingPassword {
            return Err(ProfileError::InvalidState(self.state.to_string()));
        }
        let _guard = self.lock.try_acquire()?;

        let text = self.encrypted.as_deref().unwrap_or_default();
        let plain = match CryptoCodec::decode_text(text, password) {
            Ok(plain) => plain,
            Err(e) => {
                log::warn!("Decryption failed");
                self.last_error = Some(e.to_string());
                return Err(e);
            }
        };
        let value: Value = match serde_json::from_str(&plain) {
            Ok(value) => value,
            Err(_) => {
                self.last_error = Some(ProfileError::DecryptionFailure.to_string());
                return Err(ProfileError::DecryptionFailure);
            }
        };

        self.encrypted = None;
        self.validate(&value)
    }

    fn validate(&mut self, candidate: &Value) -> Result<SessionState> {
        self.state = SessionState::Validating;

        let result = match self.validator.validate(candidate, PROFILE_SCHEMA) {
            Some(result) => result,
            None => return Err(self.fail(ProfileError::NotRecognizedExport)),
        };
        log::info!(
            "Validated import: {} ok, {} error(s), {} critical",
            result.status.success,
            result.status.error,
            result.status.critical_error
        );

        self.selection = MergeSelection::for_categories(result.valid_object.categories());
        self.result = Some(result);
        self.state = SessionState::AwaitingSelection;
        Ok(self.state)
    }

    /// Let the caller switch the permitted destination of each category
    pub fn unlock_defaults(&mut self) {
        self.selection.unlock_defaults();
    }

    pub fn set_apply_to_current(
        &mut self,
        category: Category,
        value: bool,
    ) -> std::result::Result<(), PlacementNotice> {
        self.selection.set_apply_to_current(category, value)
    }

    pub fn set_apply_to_new(
        &mut self,
        category: Category,
        value: bool,
    ) -> std::result::Result<(), PlacementNotice> {
        self.selection.set_apply_to_new(category, value)
    }

    /// Merge the enabled categories into `store` and persist
    ///
    /// On failure the store's unsaved changes are discarded and the session
    /// stays in AwaitingSelection so the user can retry.
    pub fn apply(&mut self, store: &mut dyn ProfileStore) -> Result<ApplyReport> {
        if self.state != SessionState::AwaitingSelection {
            return Err(ProfileError::InvalidState(self.state.to_string()));
        }
        let categories = self.selection.enabled();
        if categories.is_empty() {
            return Err(ProfileError::NothingSelected);
        }
        let document = match &self.result {
            Some(result) => &result.valid_object,
            None => return Err(ProfileError::InvalidState(self.state.to_string())),
        };
        let _guard = self.lock.try_acquire()?;
        self.state = SessionState::Applying;

        let outcome = match store.active_profile() {
            Ok(active) => merge_into(document, &categories, active),
            Err(e) => {
                self.state = SessionState::AwaitingSelection;
                return Err(e);
            }
        };

        match Self::commit(store, &outcome) {
            Ok(created_profiles) => {
                log::info!("Import applied: {:?}", outcome.applied);
                self.state = SessionState::Done;
                self.result = None;
                self.selection = MergeSelection::default();
                Ok(ApplyReport {
                    applied: outcome.applied,
                    created_profiles,
                    bookmarks_imported: outcome.bookmarks_imported,
                })
            }
            Err(e) => {
                if let Err(discard_err) = store.discard() {
                    log::error!("Failed to discard unsaved changes: {}", discard_err);
                }
                self.state = SessionState::AwaitingSelection;
                let reason = match e {
                    ProfileError::PersistFailed(reason) => reason,
                    other => other.to_string(),
                };
                self.last_error = Some(reason.clone());
                Err(ProfileError::PersistFailed(reason))
            }
        }
    }

    fn commit(store: &mut dyn ProfileStore, outcome: &MergeOutcome) -> Result<Vec<ProfileId>> {
        let mut created = Vec::with_capacity(outcome.new_profiles.len());
        for profile in &outcome.new_profiles {
            created.push(store.create_profile(profile.clone())?);
        }
        if outcome.touches_active() {
            store.update_profile(outcome.active.clone())?;
        }
        if !store.persist()? {
            return Err(ProfileError::PersistFailed(
                "the profile store did not save the changes".to_string(),
            ));
        }
        Ok(created)
    }

    fn fail(&mut self, error: ProfileError) -> ProfileError {
        log::warn!("Import rejected: {}", error);
        self.state = SessionState::Error;
        self.last_error = Some(error.to_string());
        error
    }
}

impl fmt::Debug for ImportSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportSession")
            .field("state", &self.state)
            .field("categories", &self.result.as_ref().map(|r| r.valid_object.categories()))
            .field("selection", &self.selection)
            .finish()
    }
}
