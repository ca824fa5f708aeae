use super::{AppContext, ProfileCommand};
use crate::output::colorize::{Colorize, ColorizeProfile, Palette};
use bukurs_profile::error::{ProfileError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilesCommand {
    pub use_id: Option<String>,
}

impl ProfileCommand for ProfilesCommand {
    fn execute(&self, ctx: &mut AppContext) -> Result<()> {
        if let Some(id) = &self.use_id {
            let _guard = ctx.lock.try_acquire()?;
            ctx.store.set_active(id)?;
            if !ctx.store.persist()? {
                ctx.store.discard()?;
                return Err(ProfileError::PersistFailed(
                    "the active profile was not saved".to_string(),
                ));
            }
            log::info!("Active profile is now {}", id);
        }

        let palette = Palette::new(ctx.color);
        let active = ctx.store.active_profile()?;
        for profile in ctx.store.profiles()? {
            print!(
                "{}",
                ColorizeProfile {
                    profile: &profile,
                    active: profile.id == active.id,
                }
                .render(&palette)
            );
        }
        Ok(())
    }
}
