//! Forensics evidence and OSINT investigations.

use crate::{AnswerCheck, Challenge, Difficulty};

/// The three forensics challenges. Untimed, flat points.
pub fn forensics_challenges() -> Vec<Challenge> {
    vec![
        Challenge::untimed(
            "file-header",
            "File Header Analysis",
            "Find the hidden string in this simple binary",
            Difficulty::Beginner,
            150,
            "48 65 6c 6c 6f 20 57 6f 72 6c 64 21 20\n\
             54 68 65 20 66 6c 61 67 20 69 73 3a 20\n\
             48 34 63 6b 33 72 5f 46 6c 34 67",
            "Convert hex to ASCII",
            "H4ck3r_Fl4g",
            AnswerCheck::IgnoreCase,
        ),
        Challenge::untimed(
            "metadata",
            "Hidden Metadata",
            "Extract hidden information from file metadata",
            Difficulty::Intermediate,
            200,
            "Creator: John Doe\n\
             Created: 2024-03-15T10:30:00Z\n\
             Software: Adobe Photoshop\n\
             Comment: VGhpcyBpcyBhIHNlY3JldCBtZXNzYWdl",
            "Check for base64 encoded strings",
            "This is a secret message",
            AnswerCheck::IgnoreCase,
        ),
        Challenge::untimed(
            "network",
            "Network Packet Analysis",
            "Find suspicious traffic in the packet capture",
            Difficulty::Advanced,
            300,
            "POST /api/login HTTP/1.1\n\
             Host: example.com\n\
             Content-Type: application/json\n\n\
             {\"username\":\"admin\",\"password\":\"d4rk4rm0r\"}",
            "Look for sensitive data in HTTP requests",
            "d4rk4rm0r",
            AnswerCheck::IgnoreCase,
        ),
    ]
}

fn osint_check(accepted: &[&str], keywords: &[&str]) -> AnswerCheck {
    AnswerCheck::Osint {
        accepted: accepted.iter().map(|s| s.to_string()).collect(),
        keywords: keywords.iter().map(|s| s.to_string()).collect(),
    }
}

/// The three OSINT investigations.
///
/// Answers are free text judged by [`AnswerCheck::Osint`]. The stored
/// solution is the canonical accepted answer.
pub fn osint_challenges() -> Vec<Challenge> {
    vec![
        Challenge::timed(
            "social-basic",
            "Social Media Investigation - Beginner",
            "Learn basic social media OSINT techniques",
            Difficulty::Beginner,
            100,
            300,
            "Instagram Profile Analysis\n\
             A suspicious Instagram account has been reported for potential scam activities.\n\n\
             Username: tech.guru.2024\n\
             Bio: Tech Enthusiast | Investor | DM for exclusive crypto deals!\n\
             Joined: 2024-01  Location: Silicon Valley, CA\n\
             Posts: 12  Followers: 15432  Following: 127\n\n\
             - Posted about a \"guaranteed 1000% return\" crypto investment\n\
             - Multiple users reporting suspicious DMs\n\
             - Account shows sudden follower growth\n\n\
             Is this account legitimate?",
            "Check the follower to following ratio",
            "scam",
            osint_check(
                &[
                    "scam",
                    "fake account",
                    "fraudulent",
                    "crypto scam",
                    "investment scam",
                    "suspicious account",
                    "scammer",
                ],
                &["scam", "fake", "fraud", "suspicious"],
            ),
        )
        .with_tutorial(
            "Compare account age against claimed expertise, look for unusual follower\n\
             ratios, and watch for promises of unrealistic returns.",
        ),
        Challenge::timed(
            "facebook-investigation",
            "Facebook Profile Analysis",
            "Advanced social media investigation techniques",
            Difficulty::Intermediate,
            200,
            420,
            "Missing Person Investigation\n\
             Help locate a missing person using their last known Facebook activity.\n\n\
             Name: Alex Thompson  Last seen: 2024-03-10\n\
             Workplace: Coffee Bean & Tea Leaf  Location: Downtown Seattle\n\n\
             - Can't wait for the hiking trip this weekend! Mount Rainier here I come!\n\
             - New job starting next week, time for a change\n\
             - Anyone know any good apartments in Portland?\n\n\
             Where is the person most likely now?",
            "Look for location patterns in posts",
            "portland",
            osint_check(
                &[
                    "portland",
                    "portland oregon",
                    "portland, or",
                    "portland or",
                    "moving to portland",
                    "relocated to portland",
                ],
                &["portland", "oregon", "moving", "relocate"],
            ),
        )
        .with_tutorial(
            "Build a timeline of activity, note sudden changes and life events,\n\
             and track locations mentioned in posts and photos.",
        ),
        Challenge::timed(
            "linkedin-research",
            "Professional Network Analysis",
            "Corporate intelligence gathering",
            Difficulty::Advanced,
            300,
            600,
            "Company Research\n\
             Investigate a suspicious startup company claiming breakthrough technology.\n\n\
             Company: QuantumTech Solutions  Founded: 2023\n\
             CEO: Claims 20 years quantum computing experience, unverifiable credentials\n\
             CTO: No technical publications, 50+ connections\n\
             Location: Multiple conflicting addresses\n\
             Funding: $50M claimed seed round\n\
             Product: Revolutionary quantum encryption\n\n\
             Is this company legitimate?",
            "Research executive background",
            "fraudulent",
            osint_check(
                &[
                    "fraudulent",
                    "fake company",
                    "scam company",
                    "shell company",
                    "fraudulent startup",
                    "fake startup",
                    "not legitimate",
                    "illegitimate",
                ],
                &["fraud", "fake", "scam", "shell", "illegitimate"],
            ),
        )
        .with_tutorial(
            "Check business registration records, verify executive backgrounds\n\
             and search patents before trusting technology claims.",
        ),
    ]
}
