//! Cipher, hardware and miscellaneous puzzles.

use crate::{AnswerCheck, Challenge, Difficulty};

/// The four cipher challenges, one per classical technique.
///
/// Answers are the plaintext. Input is compared without regard to case
/// since the board upper-cases everything the player types.
pub fn cipher_challenges() -> Vec<Challenge> {
    vec![
        Challenge::timed(
            "caesar",
            "Caesar Cipher",
            "Learn the basics of letter substitution with the Caesar Cipher",
            Difficulty::Beginner,
            100,
            120,
            "KHOOR",
            "Caesar Cipher - Shift each letter 3 positions to the right in the alphabet",
            "HELLO",
            AnswerCheck::IgnoreCase,
        )
        .with_tutorial(
            "The Caesar Cipher shifts each letter by a fixed number of positions.\n\
             With a shift of 3: A → D, B → E, C → F.\n\
             To decrypt, count 3 positions back for each letter.",
        ),
        Challenge::timed(
            "reverse",
            "Text Reversal",
            "Master text reversal techniques",
            Difficulty::Beginner,
            150,
            90,
            "REBYC",
            "Reverse the text - Read it backwards",
            "CYBER",
            AnswerCheck::IgnoreCase,
        )
        .with_tutorial(
            "The simplest transformation: read the text from the last letter to the first.\n\
             Example: HELLO → OLLEH",
        ),
        Challenge::timed(
            "atbash",
            "Atbash Cipher",
            "Learn alphabet substitution with the Atbash Cipher",
            Difficulty::Intermediate,
            200,
            180,
            "ZGGZXP",
            "Atbash Cipher - Replace each letter with its opposite position in the alphabet (A→Z, B→Y, etc.)",
            "ATTACK",
            AnswerCheck::IgnoreCase,
        )
        .with_tutorial(
            "Letters are replaced with their mirror in the alphabet: A ↔ Z, B ↔ Y, C ↔ X.\n\
             Find each letter's position from the start and count the same position from the end.",
        ),
        Challenge::timed(
            "vigenere",
            "Vigenère Cipher",
            "Master the Vigenère Cipher, a more complex encryption method",
            Difficulty::Advanced,
            300,
            240,
            "CIAEVC",
            "Vigenère Cipher with key 'KEY' - Multiple shift cipher using a keyword",
            "SECURE",
            AnswerCheck::IgnoreCase,
        )
        .with_tutorial(
            "A polyalphabetic cipher driven by a keyword.\n\
             Repeat the keyword under the message and shift each letter by its key letter\n\
             (K = 10, E = 4, Y = 24). Decrypt by shifting back.",
        ),
    ]
}

/// The two embedded protocol puzzles. Untimed, flat points.
pub fn hardware_challenges() -> Vec<Challenge> {
    vec![
        Challenge::untimed(
            "uart",
            "UART Analysis",
            "Identify and decode UART communication",
            Difficulty::Intermediate,
            200,
            "Baud Rate: 9600\nData: 0x48 0x45 0x4C 0x4C 0x4F",
            "Convert hex to ASCII",
            "HELLO",
            AnswerCheck::IgnoreCase,
        ),
        Challenge::untimed(
            "i2c",
            "I2C Protocol",
            "Analyze I2C communication between devices",
            Difficulty::Advanced,
            300,
            "SDA: |-_-_--|_-_-|\nSCL: |--|--|--|--|\nAddress: 0x50",
            "Look at the timing diagram",
            "0x50",
            AnswerCheck::IgnoreCase,
        ),
    ]
}

/// Steganography and a riddle. Untimed, flat points.
pub fn misc_challenges() -> Vec<Challenge> {
    vec![
        Challenge::untimed(
            "steganography",
            "Hidden Message",
            "Find the message hidden in plain sight",
            Difficulty::Intermediate,
            200,
            "look carefully at this text...\n\
             sHe Is Deeply DEcoding eNigmatic Files, Looking At Grids\n\
             can you spot the pattern?",
            "Pay attention to letter case",
            "HIDDENFLAG",
            AnswerCheck::IgnoreCase,
        ),
        Challenge::untimed(
            "riddle",
            "Logic Puzzle",
            "Solve the cybersecurity riddle",
            Difficulty::Advanced,
            300,
            "I am essential for security,\n\
             But too many of me cause complexity.\n\
             I change regularly,\n\
             But shouldn't be shared carelessly.\n\
             What am I?",
            "Think about authentication basics",
            "password",
            AnswerCheck::IgnoreCase,
        ),
    ]
}
