//! The quiz question bank.

use cyberquest_games::Difficulty;
use derive_getters::Getters;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Most questions a quiz asks.
pub const MAX_QUESTIONS: usize = 15;

/// Categories offered on the quiz setup screen.
pub const QUIZ_CATEGORIES: [&str; 8] = [
    "Network Security",
    "Web Security",
    "Cryptography",
    "Application Security",
    "Cloud Security",
    "Mobile Security",
    "IoT Security",
    "Malware Analysis",
];

/// A multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Question {
    id: String,
    question: String,
    options: Vec<String>,
    /// Index into `options`. Not sent to players before they answer.
    #[serde(skip_serializing)]
    correct_answer: usize,
    category: String,
    difficulty: Difficulty,
    explanation: String,
}

fn question(
    id: &str,
    text: &str,
    options: [&str; 4],
    correct_answer: usize,
    category: &str,
    difficulty: Difficulty,
    explanation: &str,
) -> Question {
    Question {
        id: id.to_string(),
        question: text.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        correct_answer,
        category: category.to_string(),
        difficulty,
        explanation: explanation.to_string(),
    }
}

/// Every question, grouped by category.
pub fn question_bank() -> Vec<Question> {
    use Difficulty::{Advanced, Beginner, Intermediate};

    vec![
        question(
            "net1",
            "What is a Man-in-the-Middle (MITM) attack?",
            [
                "An attacker intercepting communication between two parties",
                "A denial of service attack",
                "A brute force attack on passwords",
                "A social engineering technique",
            ],
            0,
            "Network Security",
            Intermediate,
            "A MITM attack occurs when an attacker secretly intercepts and possibly alters \
             communication between two parties who believe they are directly communicating \
             with each other.",
        ),
        question(
            "net2",
            "What is the purpose of Network Address Translation (NAT)?",
            [
                "To encrypt network traffic",
                "To map private IP addresses to public IP addresses",
                "To block malicious traffic",
                "To compress network data",
            ],
            1,
            "Network Security",
            Beginner,
            "NAT allows multiple devices on a private network to share a single public IP \
             address, providing both address conservation and an additional layer of security.",
        ),
        question(
            "net3",
            "What is a zero-day exploit?",
            [
                "An exploit that takes zero days to execute",
                "An exploit for a vulnerability unknown to the software vendor",
                "A type of DDoS attack",
                "An exploit that occurs at system startup",
            ],
            1,
            "Network Security",
            Intermediate,
            "A zero-day exploit targets a vulnerability that is unknown to the software vendor \
             and has zero days of patches or fixes available.",
        ),
        question(
            "web1",
            "What is Content Security Policy (CSP)?",
            [
                "A web caching mechanism",
                "A security standard that helps prevent XSS and other injection attacks",
                "A content delivery network",
                "A web server configuration tool",
            ],
            1,
            "Web Security",
            Intermediate,
            "CSP is a security standard that helps prevent various types of attacks including \
             XSS by specifying which content sources are trusted.",
        ),
        question(
            "web2",
            "What is Same-Origin Policy (SOP)?",
            [
                "A policy requiring all web content to be from the same server",
                "A security mechanism that restricts how documents/scripts from one origin can \
                 interact with resources from another origin",
                "A policy for sharing cookies between domains",
                "A web hosting requirement",
            ],
            1,
            "Web Security",
            Intermediate,
            "Same-Origin Policy is a critical security mechanism that restricts how documents \
             or scripts loaded from one origin can interact with resources from other origins.",
        ),
        question(
            "web3",
            "What is HTTP Public Key Pinning (HPKP)?",
            [
                "A method to pin websites to the browser toolbar",
                "A security policy that tells browsers to only accept specific public keys for a \
                 website",
                "A way to encrypt HTTP traffic",
                "A password protection mechanism",
            ],
            1,
            "Web Security",
            Advanced,
            "HPKP is a security feature that tells browsers to only accept certain public keys \
             for a website's SSL/TLS certificates.",
        ),
        question(
            "app1",
            "What is Input Validation?",
            [
                "Checking user credentials",
                "Verifying and sanitizing user input before processing",
                "Validating application license",
                "Testing application performance",
            ],
            1,
            "Application Security",
            Beginner,
            "Input validation is the process of verifying that user input meets specified \
             requirements and is safe to process.",
        ),
        question(
            "cloud1",
            "What is Cloud Service Provider (CSP) lock-in?",
            [
                "A security feature that locks cloud services",
                "The difficulty of moving from one cloud provider to another due to dependencies",
                "A method of securing cloud resources",
                "A cloud backup strategy",
            ],
            1,
            "Cloud Security",
            Intermediate,
            "CSP lock-in refers to the situation where an organization becomes dependent on a \
             specific cloud provider's services and faces difficulties in switching providers.",
        ),
        question(
            "mob1",
            "What is Mobile Device Management (MDM)?",
            [
                "A mobile app store",
                "Software for managing and securing mobile devices in an organization",
                "A mobile payment system",
                "A mobile testing framework",
            ],
            1,
            "Mobile Security",
            Intermediate,
            "MDM allows organizations to enforce security policies and manage mobile devices \
             used to access corporate resources.",
        ),
        question(
            "crypt1",
            "What is Perfect Forward Secrecy (PFS)?",
            [
                "A perfect encryption algorithm",
                "A property where compromise of long-term keys does not compromise past session \
                 keys",
                "A method of storing passwords",
                "A type of symmetric encryption",
            ],
            1,
            "Cryptography",
            Advanced,
            "Perfect Forward Secrecy ensures that even if an attacker obtains the long-term key, \
             they cannot decrypt past communications.",
        ),
        question(
            "iot1",
            "Why are factory-default credentials a major risk for IoT devices?",
            [
                "They slow down firmware updates",
                "They are widely published, so attackers can log in to exposed devices at scale",
                "They disable device encryption",
                "They prevent the device from joining a network",
            ],
            1,
            "IoT Security",
            Beginner,
            "Default usernames and passwords are documented publicly. Botnets such as Mirai \
             scan the internet and take over devices that still use them.",
        ),
        question(
            "iot2",
            "What does secure boot protect on an embedded device?",
            [
                "It encrypts all network traffic",
                "It ensures only firmware signed by a trusted key is executed at startup",
                "It speeds up the boot sequence",
                "It backs up the device configuration",
            ],
            1,
            "IoT Security",
            Advanced,
            "Secure boot verifies the signature of each boot stage, so tampered or unsigned \
             firmware is refused before it can run.",
        ),
        question(
            "mal1",
            "What is the main difference between static and dynamic malware analysis?",
            [
                "Static analysis runs the sample, dynamic analysis does not",
                "Static analysis inspects the sample without running it, dynamic analysis \
                 observes it while it executes",
                "Static analysis only works on scripts",
                "There is no difference",
            ],
            1,
            "Malware Analysis",
            Beginner,
            "Static analysis looks at strings, imports and disassembly of a sample at rest. \
             Dynamic analysis executes it in a sandbox and watches its behaviour.",
        ),
        question(
            "mal2",
            "Why do malware authors pack their executables?",
            [
                "To make the file run faster",
                "To hide the real code from signature scanners and static analysis",
                "To add a digital signature",
                "To make the program portable across operating systems",
            ],
            1,
            "Malware Analysis",
            Intermediate,
            "Packing compresses or encrypts the payload and unpacks it at runtime, which hides \
             recognisable code from antivirus signatures and analysts.",
        ),
    ]
}

/// Picks up to [`MAX_QUESTIONS`] shuffled questions matching the optional
/// category and difficulty. With neither filter every question is a
/// candidate.
#[instrument(skip(bank, rng))]
pub fn select_questions<R: Rng + ?Sized>(
    bank: &[Question],
    category: Option<&str>,
    difficulty: Option<Difficulty>,
    rng: &mut R,
) -> Vec<Question> {
    let mut selected: Vec<Question> = bank
        .iter()
        .filter(|q| category.is_none_or(|c| q.category == c))
        .filter(|q| difficulty.is_none_or(|d| q.difficulty == d))
        .cloned()
        .collect();
    selected.shuffle(rng);
    selected.truncate(MAX_QUESTIONS);
    debug!(count = selected.len(), "Selected quiz questions");
    selected
}
