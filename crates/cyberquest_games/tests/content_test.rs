//! Tests that the compiled-in content is consistent with the puzzles it
//! describes.

use cyberquest_games::{GameKind, cipher, content};

#[test]
fn test_content_sizes() {
    assert_eq!(content::cipher_challenges().len(), 4);
    assert_eq!(content::web_challenges().len(), 3);
    assert_eq!(content::reverse_challenges().len(), 3);
    assert_eq!(content::pwn_challenges().len(), 3);
    assert_eq!(content::forensics_challenges().len(), 3);
    assert_eq!(content::osint_challenges().len(), 3);
    assert_eq!(content::hardware_challenges().len(), 2);
    assert_eq!(content::misc_challenges().len(), 2);
    assert_eq!(content::log_scenarios().len(), 3);
    assert_eq!(content::memory_icons().len(), 16);
    assert_eq!(content::drill_commands().len(), 8);
    assert_eq!(content::typing_commands().len(), 12);
}

#[test]
fn test_challenges_for_covers_challenge_games_only() {
    for kind in GameKind::all() {
        assert_eq!(
            content::challenges_for(kind).is_some(),
            kind.is_challenge_game(),
            "{kind}"
        );
    }
}

#[test]
fn test_cipher_ciphertexts_match_transforms() {
    let challenges = content::cipher_challenges();
    let material: Vec<&str> = challenges.iter().map(|c| c.material().as_str()).collect();
    assert_eq!(material[0], cipher::caesar("HELLO", 3));
    assert_eq!(material[1], cipher::reverse("CYBER"));
    assert_eq!(material[2], cipher::atbash("ATTACK"));
    assert_eq!(material[3], cipher::vigenere_encrypt("SECURE", "KEY").unwrap());
}

#[test]
fn test_every_challenge_is_solved_by_its_solution() {
    for kind in GameKind::all() {
        let Some(challenges) = content::challenges_for(kind) else {
            continue;
        };
        for challenge in challenges {
            assert!(
                challenge.is_solved_by(challenge.solution()),
                "{} does not accept its own solution",
                challenge.id()
            );
        }
    }
}

#[test]
fn test_reverse_material_decodes_to_solutions() {
    assert_eq!(cipher::rot13("synt{erireg_vf_sha}"), "flag{revert_is_fun}");
    let xor = cipher::xor_bytes(&[0x7B, 0x76, 0x7F, 0x7F, 0x7C], 0x13);
    assert_eq!(String::from_utf8(xor).unwrap(), "hello");
}

#[test]
fn test_forensics_and_hardware_material_decodes() {
    let forensics = content::forensics_challenges();
    let decoded = cipher::hex_to_ascii(forensics[0].material()).unwrap();
    assert!(decoded.ends_with(forensics[0].solution().as_str()));

    let hardware = content::hardware_challenges();
    let dump = hardware[0].material().split("Data: ").nth(1).unwrap();
    assert_eq!(cipher::hex_to_ascii(dump).unwrap(), "HELLO");
}

#[test]
fn test_steganography_solution_is_the_uppercase_letters() {
    let misc = content::misc_challenges();
    assert_eq!(cipher::uppercase_letters(misc[0].material()), "HIDDENFLAG");
}

#[test]
fn test_pwn_shellcode_is_literal_escape_text() {
    let pwn = content::pwn_challenges();
    let solution = pwn[2].solution();
    assert!(solution.starts_with(r"\x90\x90"));
    assert!(solution.ends_with("shellcode"));
    assert_eq!(solution.len(), 4 * 32 + "shellcode".len());
    assert!(!pwn[0].is_solved_by(&"a".repeat(20)), "pwn answers are exact");
}

#[test]
fn test_osint_accepts_fuzzy_answers() {
    let osint = content::osint_challenges();
    assert!(osint[0].is_solved_by("  Crypto Scam "));
    assert!(osint[0].is_solved_by("this is a scam account"));
    assert!(!osint[0].is_solved_by("legit influencer"));
    assert!(osint[1].is_solved_by("Portland"));
    assert!(osint[1].is_solved_by("probably moving to portland"));
    assert!(!osint[1].is_solved_by("seattle"));
    assert!(osint[2].is_solved_by("a shell company"));
}

#[test]
fn test_challenge_json_hides_solution() {
    let challenge = &content::cipher_challenges()[0];
    let json = serde_json::to_value(challenge).unwrap();
    assert!(json.get("solution").is_none());
    assert!(json.get("check").is_none());
    assert_eq!(json["difficulty"], "beginner");
}
