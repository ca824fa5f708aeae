use super::{parse_categories, AppContext, ProfileCommand};
use crate::output::colorize::{Colorize, ColorizeSelector, Palette};
use bukurs_profile::crypto::Password;
use bukurs_profile::error::{ProfileError, Result};
use bukurs_profile::export::ExportSession;
use bukurs_profile::models::ProfileSource;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportCommand {
    pub categories: Vec<String>,
    pub name: Option<String>,
    pub encrypt: bool,
    pub out: Option<PathBuf>,
}

impl ExportCommand {
    fn prompt_password() -> Result<Password> {
        let password = rpassword::prompt_password("Export password: ")?;
        let confirm = rpassword::prompt_password("Confirm password: ")?;
        if password != confirm {
            return Err(ProfileError::Validation("Passwords do not match".to_string()));
        }
        if password.is_empty() {
            eprintln!("Empty password, the artifact will not be encrypted");
        }
        Ok(Password::new(password))
    }
}

impl ProfileCommand for ExportCommand {
    fn execute(&self, ctx: &mut AppContext) -> Result<()> {
        let palette = Palette::new(ctx.color);
        let mut session = ExportSession::new(ctx.lock.clone(), ctx.config.environment());

        for category in parse_categories(&self.categories)? {
            if !session.set_category(category, true) && !session.selector().is_selected(category)
            {
                eprintln!(
                    "{}",
                    palette.warn(&format!("{} cannot be combined with the selection", category))
                );
            }
        }
        eprint!("{}", ColorizeSelector(session.selector()).render(&palette));

        let name = self
            .name
            .clone()
            .unwrap_or_else(|| ctx.config.default_file_name.clone());
        session.set_file_name(&name);

        if self.encrypt {
            session.set_password(Self::prompt_password()?);
        }

        let source = ProfileSource::load(&*ctx.store)?;
        let artifact = session.export(&source, &ctx.config.file_extension)?;

        let dir = self.out.clone().unwrap_or_else(|| ctx.config.export_dir());
        let path = artifact.write_to(&dir)?;
        eprintln!(
            "{}",
            palette.ok(&format!("Exported profile to {}", path.display()))
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bukurs_profile::config::Config;
    use bukurs_profile::lock::SessionLock;
    use bukurs_profile::models::{Category, ExportDocument};
    use bukurs_profile::store::SqliteProfileStore;
    use tempfile::TempDir;

    #[test]
    fn test_export_writes_plain_artifact() {
        let dir = TempDir::new().unwrap();
        let mut store = SqliteProfileStore::init_in_memory().unwrap();
        let config = Config::default();
        let mut ctx = AppContext {
            store: &mut store,
            config: &config,
            lock: SessionLock::new(),
            color: false,
        };

        let cmd = ExportCommand {
            categories: vec!["userSettings".to_string(), "currentBookmarks".to_string()],
            name: Some("backup".to_string()),
            encrypt: false,
            out: Some(dir.path().to_path_buf()),
        };
        cmd.execute(&mut ctx).unwrap();

        let content = std::fs::read_to_string(dir.path().join("backup.txt")).unwrap();
        let doc = ExportDocument::from_json(&content).unwrap();
        assert_eq!(
            doc.categories(),
            &[Category::UserSettings, Category::CurrentBookmarks]
        );
    }

    #[test]
    fn test_export_rejects_unknown_category() {
        let mut store = SqliteProfileStore::init_in_memory().unwrap();
        let config = Config::default();
        let mut ctx = AppContext {
            store: &mut store,
            config: &config,
            lock: SessionLock::new(),
            color: false,
        };

        let cmd = ExportCommand {
            categories: vec!["colorTheme".to_string()],
            name: None,
            encrypt: false,
            out: None,
        };
        assert!(matches!(
            cmd.execute(&mut ctx),
            Err(ProfileError::Validation(_))
        ));
    }
}
