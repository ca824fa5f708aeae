use super::{parse_categories, AppContext, ProfileCommand};
use crate::output::colorize::{
    Colorize, ColorizeApplyReport, ColorizeSelection, ColorizeValidation, Palette,
};
use bukurs_profile::crypto::Password;
use bukurs_profile::error::{ProfileError, Result};
use bukurs_profile::import::{ImportSession, SessionState};
use bukurs_profile::transport::read_artifact;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const PASSWORD_ATTEMPTS: usize = 3;

/// Load `file` into a fresh session, prompting for the password if needed
fn open_session(ctx: &AppContext, file: &Path, palette: &Palette) -> Result<ImportSession> {
    let raw = read_artifact(file)?;
    let mut session = ImportSession::with_schema_validator(ctx.lock.clone());

    let mut state = session.load(&raw)?;
    let mut attempts = 0;
    while state == SessionState::AwaitingPassword {
        if attempts == PASSWORD_ATTEMPTS {
            return Err(ProfileError::DecryptionFailure);
        }
        attempts += 1;

        let password = Password::new(rpassword::prompt_password("Artifact password: ")?);
        state = match session.unlock(&password) {
            Ok(state) => state,
            Err(ProfileError::DecryptionFailure) => {
                eprintln!("{}", palette.warn("Wrong password, try again"));
                SessionState::AwaitingPassword
            }
            Err(e) => return Err(e),
        };
    }

    if let Some(result) = session.validation() {
        eprint!("{}", ColorizeValidation(result).render(palette));
    }
    Ok(session)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportCommand {
    pub file: PathBuf,
    pub exclude: Vec<String>,
}

impl ImportCommand {
    fn exclude(&self, session: &mut ImportSession, palette: &Palette) -> Result<()> {
        let excluded = parse_categories(&self.exclude)?;
        if excluded.is_empty() {
            return Ok(());
        }

        session.unlock_defaults();
        for category in excluded {
            let outcome = if category.is_whole_profile() {
                session.set_apply_to_new(category, false)
            } else {
                session.set_apply_to_current(category, false)
            };
            if let Err(notice) = outcome {
                eprintln!("{}", palette.warn(&notice.to_string()));
            }
        }
        Ok(())
    }
}

impl ProfileCommand for ImportCommand {
    fn execute(&self, ctx: &mut AppContext) -> Result<()> {
        let palette = Palette::new(ctx.color);
        let mut session = open_session(ctx, &self.file, &palette)?;
        self.exclude(&mut session, &palette)?;
        eprint!("{}", ColorizeSelection(session.selection()).render(&palette));

        let report = session.apply(&mut *ctx.store)?;
        eprint!("{}", ColorizeApplyReport(&report).render(&palette));
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectCommand {
    pub file: PathBuf,
}

impl ProfileCommand for InspectCommand {
    fn execute(&self, ctx: &mut AppContext) -> Result<()> {
        let palette = Palette::new(ctx.color);
        let session = open_session(ctx, &self.file, &palette)?;
        eprint!("{}", ColorizeSelection(session.selection()).render(&palette));

        let whole = session
            .selection()
            .entries()
            .iter()
            .filter(|(c, _)| c.is_whole_profile())
            .count();
        if whole > 0 {
            eprintln!(
                "{} categor{} would be imported as new profiles",
                whole,
                if whole == 1 { "y" } else { "ies" }
            );
        }
        Ok(())
    }
}
