use bukurs_profile::config::Config;
use bukurs_profile::error::Result;
use bukurs_profile::lock::SessionLock;
use bukurs_profile::models::Category;
use bukurs_profile::store::ProfileStore;

pub struct AppContext<'a> {
    pub store: &'a mut dyn ProfileStore,
    pub config: &'a Config,
    pub lock: SessionLock,
    pub color: bool,
}

pub mod export;
pub mod import;
pub mod profiles;

pub trait ProfileCommand {
    fn execute(&self, ctx: &mut AppContext) -> Result<()>;
}

/// Enum-based dispatch for commands (avoids Box<dyn ProfileCommand>)
pub enum CommandEnum {
    Export(export::ExportCommand),
    Import(import::ImportCommand),
    Inspect(import::InspectCommand),
    Profiles(profiles::ProfilesCommand),
}

impl CommandEnum {
    pub fn execute(&self, ctx: &mut AppContext) -> Result<()> {
        match self {
            Self::Export(cmd) => cmd.execute(ctx),
            Self::Import(cmd) => cmd.execute(ctx),
            Self::Inspect(cmd) => cmd.execute(ctx),
            Self::Profiles(cmd) => cmd.execute(ctx),
        }
    }
}

/// Parse category tags given on the command line
pub fn parse_categories(tags: &[String]) -> Result<Vec<Category>> {
    tags.iter().map(|tag| tag.parse::<Category>()).collect()
}
