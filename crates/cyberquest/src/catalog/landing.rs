//! Landing page content and the quick-game picker.

use cyberquest_games::GameKind;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A feature card on the landing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Feature {
    title: String,
    description: String,
    /// Route inside the site, or an absolute URL for external features.
    path: String,
    color: String,
}

impl Feature {
    /// Whether the card links off-site.
    pub fn is_external(&self) -> bool {
        self.path.starts_with("http://") || self.path.starts_with("https://")
    }
}

/// A headline number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct HeroStat {
    value: String,
    label: String,
}

/// Everything the landing page shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Landing {
    headline: String,
    features: Vec<Feature>,
    stats: Vec<HeroStat>,
}

fn feature(title: &str, description: &str, path: &str, color: &str) -> Feature {
    Feature {
        title: title.to_string(),
        description: description.to_string(),
        path: path.to_string(),
        color: color.to_string(),
    }
}

fn stat(value: &str, label: &str) -> HeroStat {
    HeroStat {
        value: value.to_string(),
        label: label.to_string(),
    }
}

/// The landing page.
pub fn landing() -> Landing {
    Landing {
        headline: "Master Ethical Hacking".to_string(),
        features: vec![
            feature(
                "EchoFrame",
                "Master the Art of exploitation by A.I",
                "https://ember-forge-genesis-40.lovable.app/",
                "blue",
            ),
            feature(
                "fsociety Labs",
                "Join the revolution with real-world hacking environments",
                "/labs",
                "green",
            ),
            feature(
                "Dark Army Challenges",
                "Elite hacking scenarios inspired by Mr. Robot",
                "/ctf",
                "red",
            ),
            feature(
                "Live Operations",
                "Real-time attack simulations",
                "/quick-game",
                "purple",
            ),
        ],
        stats: vec![
            stat("100+", "Active Hackers"),
            stat("500+", "Challenges"),
            stat("24/7", "Live Labs"),
            stat("98%", "Success Rate"),
        ],
    }
}

/// A game on the quick-game picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GameListing {
    id: GameKind,
    title: String,
    description: String,
}

/// All twelve games in picker order.
pub fn game_listings() -> Vec<GameListing> {
    GameKind::all()
        .into_iter()
        .map(|kind| GameListing {
            id: kind,
            title: kind.title().to_string(),
            description: kind.description().to_string(),
        })
        .collect()
}
