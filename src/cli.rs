use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for zenforge
#[derive(Parser, Debug)]
#[command(name = "zenforge")]
#[command(version, about = "Apply the zenforge editor profile, its themes and fonts")]
pub struct Cli {
    /// User settings.json of the editor
    #[arg(long, global = true, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Workspace settings.json to consult when backing up
    #[arg(long, global = true, value_name = "PATH")]
    pub workspace_settings: Option<PathBuf>,

    /// File holding the settings backup
    #[arg(long, global = true, value_name = "PATH")]
    pub state: Option<PathBuf>,

    /// Directory with the bundled font files
    #[arg(long, global = true, value_name = "DIR")]
    pub fonts: Option<PathBuf>,

    /// Install fonts here instead of the platform font directory
    #[arg(long, global = true, value_name = "DIR")]
    pub font_destination: Option<PathBuf>,

    /// Editor executable used to manage extensions
    #[arg(long, global = true, value_name = "COMMAND")]
    pub editor: Option<String>,

    /// Verbose mode (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Back up current settings, then apply the profile, extensions and fonts
    Apply {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,

        /// Apply this profile file instead of the bundled one
        #[arg(long, value_name = "PATH")]
        profile: Option<PathBuf>,

        /// Skip the Neovim / which-key settings unless the editor enables them
        #[arg(long)]
        no_neovim: bool,
    },

    /// Write the backed-up settings back
    Restore {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Copy the bundled fonts into the font directory
    InstallFonts,

    /// Show the stored settings backup
    Backup,

    /// List the profile's settings and their groups
    Profile {
        /// Show this profile file instead of the bundled one
        #[arg(long, value_name = "PATH")]
        profile: Option<PathBuf>,
    },
}
