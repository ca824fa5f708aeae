pub mod assembler;
pub mod selector;

pub use assembler::{validate_file_name, ExportAssembler};
pub use selector::{ExportTypeSelector, Toggle};

use crate::crypto::{CryptoCodec, Password};
use crate::error::Result;
use crate::lock::SessionLock;
use crate::models::{Category, Environment, ExportDocument, ProfileSource};
use crate::transport::Artifact;

/// Draft state of one export: selected categories, file name, password
#[derive(Debug)]
pub struct ExportSession {
    lock: SessionLock,
    assembler: ExportAssembler,
    selector: ExportTypeSelector,
    file_name: String,
    password: Password,
}

impl ExportSession {
    pub fn new(lock: SessionLock, environment: Environment) -> Self {
        Self {
            lock,
            assembler: ExportAssembler::new(environment),
            selector: ExportTypeSelector::new(),
            file_name: String::new(),
            password: Password::default(),
        }
    }

    pub fn set_category(&mut self, category: Category, enabled: bool) -> bool {
        self.selector.set_category(category, enabled)
    }

    pub fn selector(&self) -> &ExportTypeSelector {
        &self.selector
    }

    pub fn set_file_name(&mut self, hint: &str) {
        self.file_name = hint.to_string();
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// An empty password produces a plain JSON artifact
    pub fn set_password(&mut self, password: Password) {
        self.password = password;
    }

    /// Build the document; rejected while another session holds the lock
    pub fn assemble(&self, source: &ProfileSource) -> Result<ExportDocument> {
        let _guard = self.lock.try_acquire()?;
        self.assembler
            .assemble(source, &self.selector, &self.file_name)
    }

    /// Assemble, encode and wrap the result as a downloadable artifact
    pub fn export(&self, source: &ProfileSource, extension: &str) -> Result<Artifact> {
        let doc = self.assemble(source)?;
        let file_name = validate_file_name(&self.file_name)?;
        let content = CryptoCodec::encode(&doc, &self.password)?;
        log::info!(
            "Exported {} categor{} ({})",
            doc.categories().len(),
            if doc.categories().len() == 1 { "y" } else { "ies" },
            if self.password.is_empty() { "plain" } else { "encrypted" }
        );
        Ok(Artifact::new(&file_name, extension, content))
    }
}
