//! Fixed content arrays for every mini-game.
//!
//! Content is compiled in. Each function builds a fresh vector so a run can
//! own its challenges without sharing state with other players.

mod drills;
mod exploitation;
mod investigation;
mod logs;
mod puzzles;

pub use drills::{drill_commands, memory_icons, typing_commands};
pub use exploitation::{pwn_challenges, reverse_challenges, web_challenges};
pub use investigation::{forensics_challenges, osint_challenges};
pub use logs::log_scenarios;
pub use puzzles::{cipher_challenges, hardware_challenges, misc_challenges};

use tracing::{debug, instrument};

use crate::{Challenge, GameKind};

/// The challenge array for a challenge game, `None` for the games that are
/// not played as a sequence of challenges (memory, drills, log analysis).
#[instrument]
pub fn challenges_for(kind: GameKind) -> Option<Vec<Challenge>> {
    let challenges = match kind {
        GameKind::Cipher => cipher_challenges(),
        GameKind::Web => web_challenges(),
        GameKind::Reverse => reverse_challenges(),
        GameKind::Pwn => pwn_challenges(),
        GameKind::Forensics => forensics_challenges(),
        GameKind::Osint => osint_challenges(),
        GameKind::Hardware => hardware_challenges(),
        GameKind::Misc => misc_challenges(),
        GameKind::Memory | GameKind::Command | GameKind::Typing | GameKind::LogAnalysis => {
            return None;
        }
    };
    debug!(count = challenges.len(), "Loaded challenge content");
    Some(challenges)
}
