use crate::commands::{
    export::ExportCommand, import::ImportCommand, import::InspectCommand,
    profiles::ProfilesCommand, AppContext, CommandEnum,
};
use bukurs_profile::config::Config;
use bukurs_profile::error::Result;
use bukurs_profile::lock::SessionLock;
use bukurs_profile::store::ProfileStore;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None, disable_version_flag = true)]
pub struct Cli {
    /// Show the program version and exit
    #[arg(short = 'v', long = "version")]
    pub version: bool,

    /// Optional custom profile database path
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Optional custom configuration file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Disable color output
    #[arg(long)]
    pub nc: bool,

    /// Show debug information
    #[arg(short = 'g', long = "debug")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export categories of the active profile to an artifact
    Export {
        /// Category tags, in selection order (e.g. currentBookmarks)
        #[arg(short, long = "category", required = true)]
        categories: Vec<String>,

        /// Artifact file name, without extension
        #[arg(long)]
        name: Option<String>,

        /// Prompt for a password and encrypt the artifact
        #[arg(short, long)]
        encrypt: bool,

        /// Output directory
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Import an artifact into the profile store
    Import {
        file: PathBuf,

        /// Category tags to leave out of the merge
        #[arg(short = 'x', long)]
        exclude: Vec<String>,
    },

    /// Classify and validate an artifact without merging it
    Inspect { file: PathBuf },

    /// List stored profiles
    Profiles {
        /// Make the profile with this id the active one
        #[arg(long = "use")]
        use_id: Option<String>,
    },
}

impl Commands {
    fn into_command(self) -> CommandEnum {
        match self {
            Commands::Export {
                categories,
                name,
                encrypt,
                out,
            } => CommandEnum::Export(ExportCommand {
                categories,
                name,
                encrypt,
                out,
            }),
            Commands::Import { file, exclude } => {
                CommandEnum::Import(ImportCommand { file, exclude })
            }
            Commands::Inspect { file } => CommandEnum::Inspect(InspectCommand { file }),
            Commands::Profiles { use_id } => CommandEnum::Profiles(ProfilesCommand { use_id }),
        }
    }
}

pub fn handle_args(cli: Cli, store: &mut dyn ProfileStore, config: &Config) -> Result<()> {
    let command = match cli.command {
        Some(command) => command.into_command(),
        None => CommandEnum::Profiles(ProfilesCommand { use_id: None }),
    };

    let mut ctx = AppContext {
        store,
        config,
        lock: SessionLock::new(),
        color: !cli.nc,
    };
    command.execute(&mut ctx)
}
