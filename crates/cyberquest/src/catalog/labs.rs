//! Hands-on labs.

use cyberquest_games::Difficulty;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A task inside a lab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct LabChallenge {
    title: String,
    description: String,
    points: u32,
    hint: String,
}

/// A guided lab environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Lab {
    id: String,
    title: String,
    description: String,
    difficulty: Difficulty,
    duration: String,
    tools: Vec<String>,
    category: String,
    reward: u32,
    challenges: Vec<LabChallenge>,
}

impl Lab {
    /// Id stored in `completed_courses` once challenge `index` is done.
    ///
    /// Prefixed so it never collides with course module ids.
    pub fn challenge_id(&self, index: usize) -> String {
        format!("lab-{}-{}", self.id, index)
    }
}

fn challenges(raw: &[(&str, &str, u32, &str)]) -> Vec<LabChallenge> {
    raw.iter()
        .map(|(title, description, points, hint)| LabChallenge {
            title: title.to_string(),
            description: description.to_string(),
            points: *points,
            hint: hint.to_string(),
        })
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn lab(
    id: &str,
    title: &str,
    description: &str,
    difficulty: Difficulty,
    duration: &str,
    tools: &[&str],
    category: &str,
    reward: u32,
    challenges: Vec<LabChallenge>,
) -> Lab {
    Lab {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        difficulty,
        duration: duration.to_string(),
        tools: tools.iter().map(|t| t.to_string()).collect(),
        category: category.to_string(),
        reward,
        challenges,
    }
}

/// The three labs, easiest first.
pub fn labs() -> Vec<Lab> {
    vec![
        lab(
            "1",
            "Network Scanning Basics",
            "Learn to use Nmap for network reconnaissance and port scanning.",
            Difficulty::Beginner,
            "45 minutes",
            &["Nmap", "Wireshark"],
            "Network Security",
            200,
            challenges(&[
                ("Basic Port Scan", "Perform a basic TCP SYN scan", 50, "Use nmap -sS for SYN scan"),
                ("Service Detection", "Identify running services", 75, "Add -sV flag for version detection"),
                ("OS Fingerprinting", "Determine target OS", 75, "Use -O flag for OS detection"),
            ]),
        ),
        lab(
            "2",
            "Web Application Testing",
            "Practice identifying and exploiting common web vulnerabilities.",
            Difficulty::Intermediate,
            "1 hour",
            &["Burp Suite", "OWASP ZAP"],
            "Web Security",
            300,
            challenges(&[
                (
                    "SQL Injection",
                    "Find and exploit SQL injection vulnerability",
                    100,
                    "Try single quotes in input fields",
                ),
                (
                    "XSS Detection",
                    "Identify Cross-Site Scripting vulnerabilities",
                    100,
                    "Test with <script> tags",
                ),
                ("CSRF Testing", "Test for Cross-Site Request Forgery", 100, "Check for CSRF tokens"),
            ]),
        ),
        lab(
            "3",
            "Malware Analysis Lab",
            "Analyze malicious software in a controlled environment.",
            Difficulty::Advanced,
            "2 hours",
            &["IDA Pro", "Ghidra"],
            "Malware Analysis",
            500,
            challenges(&[
                (
                    "Static Analysis",
                    "Perform static analysis of malware sample",
                    150,
                    "Look for suspicious strings and imports",
                ),
                (
                    "Dynamic Analysis",
                    "Analyze malware behavior in sandbox",
                    175,
                    "Monitor network connections and file operations",
                ),
                (
                    "Reverse Engineering",
                    "Reverse engineer key functions",
                    175,
                    "Focus on main function and crypto routines",
                ),
            ]),
        ),
    ]
}

/// The lab with `id`.
pub fn find_lab(id: &str) -> Option<Lab> {
    labs().into_iter().find(|l| l.id == id)
}
