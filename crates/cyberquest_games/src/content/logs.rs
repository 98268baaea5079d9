//! Log triage scenarios.

use crate::{Difficulty, LogQuestion, LogScenario};

fn lines(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

fn questions(raw: &[(&str, &str)]) -> Vec<LogQuestion> {
    raw.iter()
        .map(|(question, answer)| LogQuestion::new(question.to_string(), answer.to_string()))
        .collect()
}

/// The three log analysis scenarios, three questions each.
pub fn log_scenarios() -> Vec<LogScenario> {
    vec![
        LogScenario::new(
            "ssh-bruteforce".to_string(),
            "SSH Brute Force Attack".to_string(),
            "Analyze SSH logs to identify a brute force attack attempt".to_string(),
            Difficulty::Beginner,
            100,
            300,
            lines(&[
                "Jan 15 08:23:01 server sshd[12345]: Failed password for root from 192.168.1.100 port 54321",
                "Jan 15 08:23:03 server sshd[12346]: Failed password for root from 192.168.1.100 port 54322",
                "Jan 15 08:23:05 server sshd[12347]: Failed password for root from 192.168.1.100 port 54323",
                "Jan 15 08:23:07 server sshd[12348]: Failed password for root from 192.168.1.100 port 54324",
                "Jan 15 08:23:09 server sshd[12349]: Successful login for root from 192.168.1.100 port 54325",
                "Jan 15 08:24:01 server sshd[12350]: New session opened for root from 192.168.1.100",
            ]),
            questions(&[
                ("What is the attacking IP address?", "192.168.1.100"),
                ("How many failed login attempts were there?", "4"),
                ("Did the attacker eventually succeed?", "yes"),
            ]),
            lines(&[
                "Look for patterns in failed login attempts",
                "Check the timestamps between attempts",
                "Notice the transition from failed to successful logins",
            ]),
        ),
        LogScenario::new(
            "web-attack".to_string(),
            "Web Server Attack".to_string(),
            "Identify a SQL injection attempt in web server logs".to_string(),
            Difficulty::Intermediate,
            200,
            420,
            lines(&[
                r#"192.168.1.50 - - [15/Jan/2024:10:15:01 -0500] "GET /login.php HTTP/1.1" 200 1234"#,
                r#"192.168.1.50 - - [15/Jan/2024:10:15:05 -0500] "POST /login.php?username=admin'--&password=anything HTTP/1.1" 403 789"#,
                r#"192.168.1.50 - - [15/Jan/2024:10:15:08 -0500] "GET /admin.php HTTP/1.1" 403 567"#,
                r#"192.168.1.50 - - [15/Jan/2024:10:15:12 -0500] "POST /login.php?username=admin' OR '1'='1&password=test HTTP/1.1" 403 789"#,
                r#"192.168.1.51 - - [15/Jan/2024:10:16:01 -0500] "GET /index.php HTTP/1.1" 200 2345"#,
                r#"192.168.1.50 - - [15/Jan/2024:10:16:15 -0500] "GET /phpinfo.php HTTP/1.1" 404 234"#,
            ]),
            questions(&[
                ("What type of attack is being attempted?", "sql injection"),
                ("What page is the attacker targeting?", "login.php"),
                ("Is the attacker trying to access sensitive information?", "yes"),
            ]),
            lines(&[
                "Look for special SQL characters in URLs",
                "Check for attempts to bypass authentication",
                "Notice patterns in failed requests",
            ]),
        ),
        LogScenario::new(
            "malware-activity".to_string(),
            "Malware Activity Detection".to_string(),
            "Analyze system logs to identify malware behavior".to_string(),
            Difficulty::Advanced,
            300,
            600,
            lines(&[
                "Jan 15 12:00:01 server process[1234]: New process created: svchost.exe",
                "Jan 15 12:00:02 server network[5678]: Connection established to 185.128.43.21:443",
                r"Jan 15 12:00:03 server file[9012]: File created: C:\Windows\System32\temp\xyz.dll",
                r"Jan 15 12:00:04 server registry[3456]: Registry key modified: HKLM\Software\Microsoft\Windows\CurrentVersion\Run",
                "Jan 15 12:00:05 server process[1234]: Process attempting to modify system files",
                "Jan 15 12:00:06 server network[5678]: Large data transfer to external IP: 185.128.43.21",
                "Jan 15 12:00:07 server security[7890]: Antivirus detection: Trojan.Generic.123",
            ]),
            questions(&[
                ("What is the suspicious IP address?", "185.128.43.21"),
                ("What type of malware was detected?", "trojan"),
                ("Is data exfiltration occurring?", "yes"),
            ]),
            lines(&[
                "Look for suspicious network connections",
                "Check for system modifications",
                "Identify unusual process behavior",
            ]),
        ),
    ]
}
