//! User-facing workflows
//!
//! - [`ConsentController`] - ask, back up, apply, provision, install fonts
//! - [`RestoreController`] - ask, then write the backup back
//! - [`FontController`] - the font step on its own
//!
//! Controllers drive the library components over a [`Collaborators`] bundle
//! and turn their results into messages for the user.

mod consent;
mod fonts;
mod restore;

pub use consent::{ConsentController, RunReport, RunState};
pub use fonts::FontController;
pub use restore::RestoreController;

use crate::extensions::ExtensionRegistry;
use crate::fonts::Filesystem;
use crate::prompt::Prompt;
use crate::state::StateSlot;
use crate::store::ConfigStore;

/// Editor setting that enables the Neovim / which-key group
pub const APPLY_NEOVIM_KEY: &str = "zenforge.applyNeovimSettings";

/// Answer that grants consent
pub const YES: &str = "Yes";

/// Answers offered for every confirmation, affirmative first
pub const CONFIRM_OPTIONS: [&str; 2] = [YES, "No"];

/// Host services a workflow runs against
pub struct Collaborators<'a> {
    pub store: &'a mut dyn ConfigStore,
    pub state: &'a mut dyn StateSlot,
    pub registry: &'a mut dyn ExtensionRegistry,
    pub prompt: &'a mut dyn Prompt,
    pub fs: &'a mut dyn Filesystem,
}

/// Ask a yes/no question. A dismissal or a broken prompt counts as "no".
fn confirmed(prompt: &mut dyn Prompt, message: &str) -> bool {
    match prompt.confirm(message, &CONFIRM_OPTIONS) {
        Ok(answer) => answer.as_deref() == Some(YES),
        Err(e) => {
            log::warn!("Treating failed prompt as declined: {e}");
            false
        }
    }
}
