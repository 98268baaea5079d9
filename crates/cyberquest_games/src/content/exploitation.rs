//! Web, reverse engineering and binary exploitation challenges.

use crate::{AnswerCheck, Challenge, Difficulty};

/// Every web challenge gets the same five minutes.
const WEB_TIME_LIMIT_SECS: u32 = 300;

/// The three web exploitation challenges.
///
/// A payload is accepted when it contains the expected snippet, so
/// surrounding markup or whitespace does not matter.
pub fn web_challenges() -> Vec<Challenge> {
    vec![
        Challenge::timed(
            "xss-basic",
            "Cross-Site Scripting (XSS) - Basic",
            "Learn how to identify and exploit basic XSS vulnerabilities",
            Difficulty::Beginner,
            100,
            WEB_TIME_LIMIT_SECS,
            "A blog website allows users to post comments without proper sanitization.\n\n\
             <form onsubmit=\"addComment()\">\n  \
             <input type=\"text\" id=\"comment\">\n  \
             <button type=\"submit\">Post</button>\n\
             </form>\n\
             <script>\n\
             function addComment() {\n  \
             const comment = document.getElementById('comment').value;\n  \
             document.getElementById('comments').innerHTML += comment;\n\
             }\n\
             </script>",
            "Try injecting a simple <script> tag with an alert() function. The website directly inserts user input into the DOM.",
            r#"<script>alert("hacked")</script>"#,
            AnswerCheck::ContainsIgnoreCase,
        )
        .with_tutorial(
            "XSS injects scripts into pages viewed by other users.\n\
             Reflected, stored and DOM-based variants exist.\n\
             Prevent it with output encoding and a Content Security Policy.",
        ),
        Challenge::timed(
            "sqli-basic",
            "SQL Injection - Basic",
            "Learn how to perform basic SQL injection attacks",
            Difficulty::Beginner,
            150,
            WEB_TIME_LIMIT_SECS,
            "A login form is vulnerable to SQL injection. Try to bypass the authentication.\n\n\
             $query = \"SELECT * FROM users\n         \
             WHERE username = '$username'\n         \
             AND password = '$password'\";",
            "The login query can be manipulated using single quotes and SQL OR operator. Try making the WHERE clause always true.",
            "admin' OR '1'='1",
            AnswerCheck::ContainsIgnoreCase,
        )
        .with_tutorial(
            "SQL injection manipulates a query by smuggling SQL through user input.\n\
             A quote closes the string literal and OR with an always-true condition\n\
             bypasses the check. Prepared statements prevent it.",
        ),
        Challenge::timed(
            "csrf-basic",
            "Cross-Site Request Forgery (CSRF) - Basic",
            "Learn how to identify and exploit CSRF vulnerabilities",
            Difficulty::Beginner,
            200,
            WEB_TIME_LIMIT_SECS,
            "A website allows users to change their email address but does not implement CSRF protection.\n\n\
             POST /email/change HTTP/1.1\n\
             Host: target.com\n\
             Cookie: session=...\n\n\
             email=user@example.com",
            "Build a hidden form that posts to the email change endpoint and submit it automatically with JavaScript.",
            "<form action=\"http://target.com/email/change\" method=\"POST\" id=\"csrf-form\">\n  \
             <input type=\"hidden\" name=\"email\" value=\"hacker@evil.com\">\n\
             </form>\n\
             <script>document.getElementById(\"csrf-form\").submit();</script>",
            AnswerCheck::ContainsIgnoreCase,
        )
        .with_tutorial(
            "CSRF tricks an authenticated browser into sending a request the user never meant to.\n\
             Anti-CSRF tokens and SameSite cookies prevent it.",
        ),
    ]
}

/// The three reverse engineering challenges.
pub fn reverse_challenges() -> Vec<Challenge> {
    vec![
        Challenge::timed(
            "strings-basic",
            "Basic String Analysis",
            "Find the hidden flag in this simple program",
            Difficulty::Beginner,
            100,
            300,
            "void main() {\n  \
             char flag[] = \"flag{my_first_rev}\";\n  \
             printf(\"Welcome to the game!\");\n\
             }",
            "Look for string literals in the code. The flag format is flag{...}",
            "flag{my_first_rev}",
            AnswerCheck::IgnoreCase,
        )
        .with_tutorial(
            "One of the first things to look for in a program are string literals.\n\
             Check text between quotes and look for common flag formats.",
        ),
        Challenge::timed(
            "xor-basic",
            "Simple XOR Encryption",
            "The flag is encrypted with a simple XOR operation",
            Difficulty::Beginner,
            150,
            420,
            "char encrypted[] = {0x7B, 0x76, 0x7F, 0x7F, 0x7C};\n\
             char key = 0x13;\n\n\
             void decrypt() {\n  \
             for(int i = 0; i < 5; i++) {\n    \
             printf(\"%c\", encrypted[i] ^ key);\n  \
             }\n\
             }",
            "XOR each byte with the key (0x13). XOR is its own inverse!",
            "hello",
            AnswerCheck::IgnoreCase,
        )
        .with_tutorial(
            "Each byte is XORed with a key. XOR again with the same key to decrypt,\n\
             since a ^ b ^ b = a. For example 0x7B ^ 0x13 = 'h'.",
        ),
        Challenge::timed(
            "loop-analysis",
            "Loop Analysis",
            "Figure out what this loop does to reveal the flag",
            Difficulty::Intermediate,
            200,
            600,
            "char input[] = \"synt{erireg_vf_sha}\";\n\n\
             void transform() {\n  \
             for(int i = 0; input[i]; i++) {\n    \
             if(input[i] >= 'a' && input[i] <= 'z') {\n      \
             input[i] = ((input[i] - 'a' + 13) % 26) + 'a';\n    \
             }\n  \
             }\n  \
             printf(\"%s\\n\", input);\n\
             }",
            "This is a ROT13 cipher. Each letter is rotated 13 positions in the alphabet.",
            "flag{revert_is_fun}",
            AnswerCheck::IgnoreCase,
        )
        .with_tutorial(
            "Trace what the loop does to each character. Letters are rotated by 13,\n\
             which undoes itself when applied twice.",
        ),
    ]
}

/// The three binary exploitation challenges. Payloads must match exactly.
pub fn pwn_challenges() -> Vec<Challenge> {
    vec![
        Challenge::timed(
            "stack-intro",
            "Stack Introduction",
            "Learn about stack memory and how it can be manipulated",
            Difficulty::Beginner,
            100,
            300,
            "void vulnerable_function(char *input) {\n    \
             char buffer[16];\n    \
             strcpy(buffer, input);  // No bounds checking!\n    \
             printf(\"Input received: %s\\n\", buffer);\n\
             }",
            "The buffer is 16 bytes, but strcpy() will copy everything. What happens if we write more?",
            "A".repeat(20),
            AnswerCheck::Exact,
        )
        .with_tutorial(
            "Local variables live on the stack next to the saved frame pointer and return address.\n\
             Writing past the end of a 16-byte buffer overwrites what sits above it.",
        ),
        Challenge::timed(
            "format-string",
            "Format String Vulnerability",
            "Discover how format strings can be exploited",
            Difficulty::Beginner,
            150,
            420,
            "void print_message(char *msg) {\n    \
             printf(msg);  // Vulnerable: direct format string\n\
             }",
            "What happens if we use format specifiers like %x or %p in our input?",
            "%x %x %x %x",
            AnswerCheck::Exact,
        )
        .with_tutorial(
            "printf(user_input) lets the input choose the format.\n\
             %x leaks stack words, %n writes to memory. printf(\"%s\", user_input) is safe.",
        ),
        Challenge::timed(
            "shellcode-intro",
            "Introduction to Shellcode",
            "Learn how to execute custom code through buffer overflows",
            Difficulty::Intermediate,
            250,
            600,
            "void vulnerable_function(char *input) {\n    \
             char buffer[64];\n    \
             strcpy(buffer, input);\n    \
             printf(\"Data copied to buffer\\n\");\n\
             }",
            "First overflow the buffer, then redirect execution to your shellcode. Look for NOP sleds!",
            format!("{}shellcode", r"\x90".repeat(32)),
            AnswerCheck::Exact,
        )
        .with_tutorial(
            "Shellcode is machine code injected through an overflow. A sled of NOP (\\x90)\n\
             instructions in front of it makes the jump target forgiving.",
        ),
    ]
}
