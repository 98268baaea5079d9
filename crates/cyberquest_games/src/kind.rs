//! The catalogue of mini-games.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Every mini-game offered on the quick-game page.
///
/// The string form is the id used in URLs and in the `game_type` column of
/// game history rows.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GameKind {
    /// Classical cipher breaking.
    #[serde(rename = "crypto")]
    #[strum(serialize = "crypto")]
    Cipher,
    /// Web exploitation payloads.
    Web,
    /// Reading decompiled code for flags.
    Reverse,
    /// Binary exploitation payloads.
    Pwn,
    /// Evidence decoding.
    Forensics,
    /// Open source intelligence.
    Osint,
    /// Embedded protocol decoding.
    Hardware,
    /// Riddles and steganography.
    Misc,
    /// Card matching.
    Memory,
    /// Retype security commands against the clock.
    Command,
    /// Typing speed with accuracy tracking.
    Typing,
    /// Log triage scenarios.
    #[serde(rename = "logs")]
    #[strum(serialize = "logs")]
    LogAnalysis,
}

impl GameKind {
    /// Display title shown on the game picker.
    pub fn title(self) -> &'static str {
        match self {
            Self::Cipher => "Cryptography",
            Self::Web => "Web Security",
            Self::Reverse => "Reverse Engineering",
            Self::Pwn => "Binary Exploitation",
            Self::Forensics => "Digital Forensics",
            Self::Osint => "OSINT",
            Self::Hardware => "Hardware Security",
            Self::Misc => "Miscellaneous",
            Self::Memory => "Cyber Memory",
            Self::Command => "Command Master",
            Self::Typing => "Speed Hacker",
            Self::LogAnalysis => "Log Analysis",
        }
    }

    /// One-line pitch shown under the title.
    pub fn description(self) -> &'static str {
        match self {
            Self::Cipher => "Break ciphers and decode encrypted messages",
            Self::Web => "Exploit web vulnerabilities and secure applications",
            Self::Reverse => "Analyze and understand compiled programs",
            Self::Pwn => "Exploit buffer overflows and memory corruption",
            Self::Forensics => "Investigate digital evidence and recover data",
            Self::Osint => "Gather intelligence from open sources",
            Self::Hardware => "Hack embedded systems and IoT devices",
            Self::Misc => "Solve various unique security challenges",
            Self::Memory => "Match security tools and concepts",
            Self::Command => "Learn essential security commands",
            Self::Typing => "Type commands at lightning speed",
            Self::LogAnalysis => "Analyze system logs to detect intrusions",
        }
    }

    /// Whether the game is played as a sequence of [`crate::ChallengeRun`] challenges.
    pub fn is_challenge_game(self) -> bool {
        matches!(
            self,
            Self::Cipher
                | Self::Web
                | Self::Reverse
                | Self::Pwn
                | Self::Forensics
                | Self::Osint
                | Self::Hardware
                | Self::Misc
        )
    }

    /// All games in picker order.
    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }
}
