//! Capture-the-flag listings.

use cyberquest_games::Difficulty;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Category value that disables filtering.
pub const ALL_CATEGORIES: &str = "all";

/// A listed CTF challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct CtfChallenge {
    id: String,
    title: String,
    description: String,
    difficulty: Difficulty,
    points: u32,
    category: String,
}

fn challenge(
    id: &str,
    title: &str,
    description: &str,
    difficulty: Difficulty,
    points: u32,
    category: &str,
) -> CtfChallenge {
    CtfChallenge {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        difficulty,
        points,
        category: category.to_string(),
    }
}

/// Every CTF challenge.
pub fn ctf_challenges() -> Vec<CtfChallenge> {
    vec![
        challenge(
            "1",
            "Hidden Flag",
            "Find the hidden flag in the website source code.",
            Difficulty::Beginner,
            100,
            "Web",
        ),
        challenge(
            "2",
            "Broken Authentication",
            "Bypass the login mechanism to access admin panel.",
            Difficulty::Intermediate,
            250,
            "Web Security",
        ),
        challenge(
            "3",
            "Packet Analysis",
            "Analyze network traffic to find the secret message.",
            Difficulty::Advanced,
            500,
            "Network",
        ),
    ]
}

/// `"all"` followed by each category once, in listing order.
pub fn ctf_categories() -> Vec<String> {
    let mut categories = vec![ALL_CATEGORIES.to_string()];
    for c in ctf_challenges() {
        if !categories.contains(&c.category) {
            categories.push(c.category);
        }
    }
    categories
}

/// Challenges in `category`; `"all"` returns everything.
pub fn filter_ctf(category: &str) -> Vec<CtfChallenge> {
    ctf_challenges()
        .into_iter()
        .filter(|c| category == ALL_CATEGORIES || c.category == category)
        .collect()
}
