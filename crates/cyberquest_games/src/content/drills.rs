//! Memory icons and drill commands.

use crate::{DrillCommand, MemoryIcon};

fn icons(raw: &[(&str, &str)]) -> Vec<MemoryIcon> {
    raw.iter()
        .map(|(name, description)| MemoryIcon::new(name.to_string(), description.to_string()))
        .collect()
}

fn commands(raw: &[(&str, &str)]) -> Vec<DrillCommand> {
    raw.iter()
        .map(|(command, description)| {
            DrillCommand::new(command.to_string(), description.to_string())
        })
        .collect()
}

/// The sixteen card faces of the memory game.
pub fn memory_icons() -> Vec<MemoryIcon> {
    icons(&[
        ("Shield", "Network Defense"),
        ("Bug", "Vulnerability"),
        ("Lock", "Encryption"),
        ("Key", "Authentication"),
        ("Wifi", "Wireless Security"),
        ("Database", "Data Protection"),
        ("Cloud", "Cloud Security"),
        ("Server", "Server Security"),
        ("Terminal", "Command Line"),
        ("Globe", "Web Security"),
        ("Laptop", "Endpoint Security"),
        ("Network", "Network Protocol"),
        ("Alert", "Threat Detection"),
        ("FileKey", "File Encryption"),
        ("Fingerprint", "Biometrics"),
        ("Virus", "Malware Analysis"),
    ])
}

/// The eight commands of the command drill.
pub fn drill_commands() -> Vec<DrillCommand> {
    commands(&[
        ("nmap -sS target.com", "Perform a SYN scan"),
        ("sqlmap --url http://target.com", "Test for SQL injection"),
        ("dirb http://target.com", "Directory enumeration"),
        ("hydra -l admin -P wordlist.txt target.com ssh", "Brute force SSH"),
        ("wireshark -i eth0", "Capture network traffic"),
        ("john --wordlist=passwords.txt hash.txt", "Crack password hashes"),
        ("nikto -h target.com", "Web server security scan"),
        ("tcpdump -i eth0 port 80", "Capture HTTP traffic"),
    ])
}

/// The twelve longer commands of the typing drill.
pub fn typing_commands() -> Vec<DrillCommand> {
    commands(&[
        ("nmap -sS -sV -O target.com", "Service and OS detection scan"),
        (
            r#"sqlmap -u "http://target.com/page.php?id=1" --dbs"#,
            "Database enumeration",
        ),
        ("hydra -l admin -P wordlist.txt ssh://target.com", "SSH brute force"),
        (
            "gobuster dir -u http://target.com -w wordlist.txt",
            "Directory enumeration",
        ),
        ("wireshark -i eth0 -w capture.pcap", "Network packet capture"),
        ("hashcat -m 0 -a 0 hash.txt wordlist.txt", "Hash cracking"),
        (
            r#"msfconsole -q -x "use exploit/multi/handler""#,
            "Metasploit handler",
        ),
        ("john --wordlist=rockyou.txt hash.txt", "Password cracking"),
        ("tcpdump -i eth0 -n -w capture.pcap", "Packet capture"),
        ("dirb http://target.com -r -w", "Web content scanning"),
        ("nikto -h target.com -C all", "Web server scanning"),
        ("wpscan --url http://target.com --enumerate u", "WordPress scanning"),
    ])
}
