//! The learning roadmap: levels, sections, topics and items.

use cyberquest_games::Difficulty;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Further reading attached to an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Resource {
    title: String,
    url: String,
}

/// A single thing to learn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct RoadmapItem {
    /// `{section}-{topic index}-{item index}`, fixed by the unfiltered layout.
    id: String,
    name: String,
    difficulty: Difficulty,
    estimated_time: String,
    resources: Vec<Resource>,
}

impl RoadmapItem {
    /// Points for completing the item.
    pub fn points(&self) -> u32 {
        item_points(self.difficulty)
    }
}

/// Points awarded per item difficulty.
pub fn item_points(difficulty: Difficulty) -> u32 {
    match difficulty {
        Difficulty::Beginner => 50,
        Difficulty::Intermediate => 100,
        Difficulty::Advanced => 150,
    }
}

/// Items grouped under a heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct RoadmapTopic {
    title: String,
    items: Vec<RoadmapItem>,
}

/// A collapsible section of a level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct RoadmapSection {
    id: String,
    title: String,
    topics: Vec<RoadmapTopic>,
}

/// One tier of the roadmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct RoadmapLevel {
    level: String,
    description: String,
    color: String,
    sections: Vec<RoadmapSection>,
}

type ItemSpec<'a> = (&'a str, Difficulty, &'a str, &'a [(&'a str, &'a str)]);

fn section(id: &str, title: &str, topics: &[(&str, &[ItemSpec<'_>])]) -> RoadmapSection {
    let topics = topics
        .iter()
        .enumerate()
        .map(|(topic_index, (topic_title, items))| RoadmapTopic {
            title: topic_title.to_string(),
            items: items
                .iter()
                .enumerate()
                .map(|(item_index, (name, difficulty, time, resources))| RoadmapItem {
                    id: format!("{}-{}-{}", id, topic_index, item_index),
                    name: name.to_string(),
                    difficulty: *difficulty,
                    estimated_time: time.to_string(),
                    resources: resources
                        .iter()
                        .map(|(title, url)| Resource {
                            title: title.to_string(),
                            url: url.to_string(),
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect();
    RoadmapSection {
        id: id.to_string(),
        title: title.to_string(),
        topics,
    }
}

fn level(name: &str, description: &str, color: &str, sections: Vec<RoadmapSection>) -> RoadmapLevel {
    RoadmapLevel {
        level: name.to_string(),
        description: description.to_string(),
        color: color.to_string(),
        sections,
    }
}

/// The full roadmap.
pub fn roadmap() -> Vec<RoadmapLevel> {
    use Difficulty::{Advanced, Beginner, Intermediate};

    vec![
        level(
            "Beginner Level",
            "Cybersecurity Fundamentals",
            "green",
            vec![
                section(
                    "intro",
                    "Introduction to Cybersecurity",
                    &[(
                        "Core Concepts",
                        &[
                            (
                                "What is Cybersecurity?",
                                Beginner,
                                "30 mins",
                                &[
                                    ("NIST Cybersecurity Framework", "https://www.nist.gov/cyberframework"),
                                    (
                                        "Introduction to Cybersecurity",
                                        "https://www.cybrary.it/course/intro-to-cyber-security",
                                    ),
                                ],
                            ),
                            (
                                "History of Cyber Attacks",
                                Beginner,
                                "1 hour",
                                &[(
                                    "Notable Cyber Attacks",
                                    "https://www.csoonline.com/article/2130877/the-biggest-data-breaches-of-the-21st-century.html",
                                )],
                            ),
                            ("Ethical Hacking vs. Black Hat Hacking", Beginner, "45 mins", &[]),
                            ("Cyber Laws and Compliance", Intermediate, "2 hours", &[]),
                        ],
                    )],
                ),
                section(
                    "networks",
                    "Understanding Computer Networks",
                    &[(
                        "Network Fundamentals",
                        &[
                            (
                                "TCP/IP Protocol Suite",
                                Beginner,
                                "2 hours",
                                &[("TCP/IP Guide", "http://www.tcpipguide.com/")],
                            ),
                            ("IP Addressing & Subnetting", Intermediate, "3 hours", &[]),
                            ("Network Security Devices", Intermediate, "2 hours", &[]),
                        ],
                    )],
                ),
            ],
        ),
        level(
            "Intermediate Level",
            "Offensive & Defensive Security",
            "yellow",
            vec![section(
                "webapp",
                "Web Application Security & Bug Bounty",
                &[(
                    "Web Security",
                    &[
                        ("SQL Injection (SQLi)", Intermediate, "4 hours", &[]),
                        ("Cross-Site Scripting (XSS)", Intermediate, "3 hours", &[]),
                        ("Cross-Site Request Forgery (CSRF)", Intermediate, "2 hours", &[]),
                        ("Remote Code Execution (RCE)", Advanced, "4 hours", &[]),
                        ("File Upload Vulnerabilities", Intermediate, "2 hours", &[]),
                        ("Using Burp Suite for Web Testing", Intermediate, "5 hours", &[]),
                    ],
                )],
            )],
        ),
        level(
            "Advanced Level",
            "Red Teaming & Advanced Pentesting",
            "red",
            vec![section(
                "advanced-web",
                "Advanced Web Hacking Techniques",
                &[(
                    "Advanced Techniques",
                    &[
                        ("Exploiting Authentication Mechanisms", Advanced, "6 hours", &[]),
                        ("SSRF (Server-Side Request Forgery)", Advanced, "4 hours", &[]),
                        ("Advanced Burp Suite Techniques", Advanced, "8 hours", &[]),
                        ("Bypassing WAF (Web Application Firewall)", Advanced, "6 hours", &[]),
                    ],
                )],
            )],
        ),
    ]
}

/// Keeps items whose name contains `search` (ignoring case) and whose
/// difficulty matches. Topics, sections and levels left empty are dropped.
#[instrument(skip(levels))]
pub fn filter_roadmap(
    levels: Vec<RoadmapLevel>,
    search: &str,
    difficulty: Option<Difficulty>,
) -> Vec<RoadmapLevel> {
    let needle = search.to_lowercase();
    let keep = |item: &RoadmapItem| {
        item.name.to_lowercase().contains(&needle)
            && difficulty.is_none_or(|d| item.difficulty == d)
    };

    let filtered: Vec<RoadmapLevel> = levels
        .into_iter()
        .filter_map(|mut level| {
            level.sections = level
                .sections
                .into_iter()
                .filter_map(|mut section| {
                    section.topics = section
                        .topics
                        .into_iter()
                        .filter_map(|mut topic| {
                            topic.items.retain(|item| keep(item));
                            (!topic.items.is_empty()).then_some(topic)
                        })
                        .collect();
                    (!section.topics.is_empty()).then_some(section)
                })
                .collect();
            (!level.sections.is_empty()).then_some(level)
        })
        .collect();
    debug!(levels = filtered.len(), "Filtered roadmap");
    filtered
}

/// The item with `id` and the title of the section holding it.
pub fn find_item(id: &str) -> Option<(RoadmapItem, String)> {
    roadmap().into_iter().find_map(|level| {
        level.sections.into_iter().find_map(|section| {
            let title = section.title;
            section
                .topics
                .into_iter()
                .flat_map(|topic| topic.items)
                .find(|item| item.id == id)
                .map(|item| (item, title.clone()))
        })
    })
}

/// Number of items on the unfiltered roadmap.
pub fn total_items() -> usize {
    roadmap()
        .iter()
        .flat_map(|level| &level.sections)
        .flat_map(|section| &section.topics)
        .map(|topic| topic.items.len())
        .sum()
}
