//! The course catalog.

use cyberquest_games::Difficulty;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::Profile;

/// What a module asks the learner to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ModuleActivity {
    /// Knowledge check.
    Quiz,
    /// Hands-on lab.
    Lab,
    /// Capture the flag.
    Ctf,
    /// A mini-game.
    Game,
    /// A graded project.
    Project,
}

/// The module's hands-on part and its point reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Interactive {
    #[serde(rename = "type")]
    kind: ModuleActivity,
    reward: u32,
}

/// One module of a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct CourseModule {
    title: String,
    topics: Vec<String>,
    duration: String,
    /// Locked modules open once the module before them is complete.
    locked: bool,
    interactive: Interactive,
}

/// Who teaches a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Instructor {
    name: String,
    title: String,
}

/// A course with its modules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct Course {
    id: String,
    title: String,
    description: String,
    level: Difficulty,
    duration: String,
    /// Points for finishing every module.
    reward: u32,
    certification: String,
    instructor: Instructor,
    rating: f32,
    students_enrolled: u32,
    last_updated: String,
    is_premium: bool,
    requirements: Vec<String>,
    learning_outcomes: Vec<String>,
    modules: Vec<CourseModule>,
}

impl Course {
    /// Id stored in `completed_courses` when module `index` is done.
    pub fn module_id(&self, index: usize) -> String {
        format!("{}-{}", self.id, index)
    }

    /// Whether `profile` has completed module `index`.
    pub fn is_module_complete(&self, profile: &Profile, index: usize) -> bool {
        profile.has_completed(&self.module_id(index))
    }

    /// Whether module `index` can be played given `profile`'s progress.
    pub fn is_module_unlocked(&self, profile: &Profile, index: usize) -> bool {
        match self.modules.get(index) {
            Some(module) if module.locked => {
                index == 0 || self.is_module_complete(profile, index - 1)
            }
            Some(_) => true,
            None => false,
        }
    }

    /// Whether every module is in the profile's completed list.
    pub fn is_complete_for(&self, profile: &Profile) -> bool {
        (0..self.modules.len()).all(|index| self.is_module_complete(profile, index))
    }

    /// Completed modules as a whole percentage.
    pub fn progress_for(&self, profile: &Profile) -> u32 {
        if self.modules.is_empty() {
            return 0;
        }
        let done = (0..self.modules.len())
            .filter(|index| self.is_module_complete(profile, *index))
            .count();
        ((done as f64 / self.modules.len() as f64) * 100.0).round() as u32
    }
}

fn strings(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

fn module(
    title: &str,
    topics: &[&str],
    duration: &str,
    locked: bool,
    kind: ModuleActivity,
    reward: u32,
) -> CourseModule {
    CourseModule {
        title: title.to_string(),
        topics: strings(topics),
        duration: duration.to_string(),
        locked,
        interactive: Interactive { kind, reward },
    }
}

/// Both courses in catalog order.
pub fn courses() -> Vec<Course> {
    vec![
        Course {
            id: "1".to_string(),
            title: "Introduction to Cybersecurity".to_string(),
            description: "Learn the fundamentals of cybersecurity and basic security concepts."
                .to_string(),
            level: Difficulty::Beginner,
            duration: "4 weeks".to_string(),
            reward: 1000,
            certification: "Cybersecurity Fundamentals".to_string(),
            instructor: Instructor {
                name: "Dr. Sarah Chen".to_string(),
                title: "Senior Security Researcher".to_string(),
            },
            rating: 4.8,
            students_enrolled: 12500,
            last_updated: "2025-02-15".to_string(),
            is_premium: false,
            requirements: strings(&[
                "Basic understanding of computer networks",
                "Familiarity with operating systems",
                "No prior security knowledge required",
            ]),
            learning_outcomes: strings(&[
                "Understand core cybersecurity principles",
                "Identify common security threats",
                "Implement basic security measures",
                "Develop security-first mindset",
            ]),
            modules: vec![
                module(
                    "Security Basics",
                    &[
                        "What is Cybersecurity?",
                        "CIA Triad",
                        "Basic Security Terms",
                        "Security Frameworks",
                        "Risk Management Basics",
                    ],
                    "1 week",
                    false,
                    ModuleActivity::Quiz,
                    100,
                ),
                module(
                    "Network Security",
                    &[
                        "Network Fundamentals",
                        "Common Network Attacks",
                        "Defense Strategies",
                        "Firewall Configuration",
                        "IDS/IPS Systems",
                    ],
                    "1 week",
                    false,
                    ModuleActivity::Lab,
                    150,
                ),
                module(
                    "Web Security",
                    &[
                        "Web Application Security",
                        "OWASP Top 10",
                        "Secure Coding Practices",
                        "Input Validation",
                        "Authentication Security",
                    ],
                    "1 week",
                    false,
                    ModuleActivity::Ctf,
                    200,
                ),
                module(
                    "Cryptography",
                    &[
                        "Basic Cryptography",
                        "Encryption Types",
                        "Digital Signatures",
                        "PKI Infrastructure",
                        "Hashing Functions",
                    ],
                    "1 week",
                    true,
                    ModuleActivity::Game,
                    250,
                ),
            ],
        },
        Course {
            id: "2".to_string(),
            title: "Advanced Penetration Testing".to_string(),
            description: "Master the art of ethical hacking and penetration testing with \
                          hands-on labs and real-world scenarios."
                .to_string(),
            level: Difficulty::Advanced,
            duration: "8 weeks".to_string(),
            reward: 2000,
            certification: "Advanced Penetration Tester".to_string(),
            instructor: Instructor {
                name: "Marcus Williams".to_string(),
                title: "Principal Security Engineer".to_string(),
            },
            rating: 4.9,
            students_enrolled: 8750,
            last_updated: "2025-03-01".to_string(),
            is_premium: true,
            requirements: strings(&[
                "Strong understanding of networking protocols",
                "Proficiency in Linux command line",
                "Basic scripting knowledge (Python/Bash)",
                "Completion of Introduction to Cybersecurity course",
            ]),
            learning_outcomes: strings(&[
                "Master advanced penetration testing techniques",
                "Conduct thorough security assessments",
                "Exploit and document vulnerabilities",
                "Develop custom security tools",
                "Write professional pentest reports",
            ]),
            modules: vec![
                module(
                    "Advanced Reconnaissance",
                    &[
                        "OSINT Techniques",
                        "Network Mapping",
                        "Service Enumeration",
                        "Vulnerability Assessment",
                        "Custom Reconnaissance Tools",
                    ],
                    "2 weeks",
                    false,
                    ModuleActivity::Lab,
                    300,
                ),
                module(
                    "Exploitation Techniques",
                    &[
                        "Exploit Development",
                        "Buffer Overflows",
                        "Web Application Exploitation",
                        "Privilege Escalation",
                        "Post-Exploitation",
                    ],
                    "2 weeks",
                    false,
                    ModuleActivity::Ctf,
                    400,
                ),
                module(
                    "Advanced Web Attacks",
                    &[
                        "Advanced XSS Techniques",
                        "SQL Injection Mastery",
                        "Authentication Bypasses",
                        "File Upload Vulnerabilities",
                        "API Security Testing",
                    ],
                    "2 weeks",
                    true,
                    ModuleActivity::Lab,
                    350,
                ),
                module(
                    "Mobile Application Testing",
                    &[
                        "Android App Testing",
                        "iOS Security Assessment",
                        "Mobile API Testing",
                        "Reverse Engineering Apps",
                        "Mobile Malware Analysis",
                    ],
                    "2 weeks",
                    true,
                    ModuleActivity::Project,
                    450,
                ),
            ],
        },
    ]
}

/// The course with `id`.
pub fn find_course(id: &str) -> Option<Course> {
    courses().into_iter().find(|c| c.id == id)
}
