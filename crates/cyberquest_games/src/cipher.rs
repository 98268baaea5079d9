//! Toy string transforms used as puzzle content.
//!
//! None of these are meant to protect anything. They exist so the cipher,
//! reverse engineering and forensics challenges can be generated and checked
//! from the same code that explains them.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tracing::instrument;

use crate::GameError;

fn shift_letter(c: char, shift: i32) -> char {
    let base = if c.is_ascii_uppercase() {
        b'A'
    } else if c.is_ascii_lowercase() {
        b'a'
    } else {
        return c;
    };
    let offset = (c as u8 - base) as i32;
    let shifted = (offset + shift).rem_euclid(26) as u8;
    (base + shifted) as char
}

/// Shifts every ASCII letter by `shift` positions, preserving case.
pub fn caesar(text: &str, shift: i32) -> String {
    text.chars().map(|c| shift_letter(c, shift)).collect()
}

/// ROT13, its own inverse.
pub fn rot13(text: &str) -> String {
    caesar(text, 13)
}

/// Reverses the characters of `text`.
pub fn reverse(text: &str) -> String {
    text.chars().rev().collect()
}

/// Maps each letter to its mirror in the alphabet (A↔Z, B↔Y).
pub fn atbash(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_ascii_uppercase() {
                (b'Z' - (c as u8 - b'A')) as char
            } else if c.is_ascii_lowercase() {
                (b'z' - (c as u8 - b'a')) as char
            } else {
                c
            }
        })
        .collect()
}

fn vigenere_shifts(key: &str) -> Result<Vec<i32>, GameError> {
    let shifts: Vec<i32> = key
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| (c.to_ascii_uppercase() as u8 - b'A') as i32)
        .collect();
    if shifts.is_empty() {
        return Err(GameError::new("Vigenère key must contain at least one letter"));
    }
    Ok(shifts)
}

fn vigenere(text: &str, key: &str, direction: i32) -> Result<String, GameError> {
    let shifts = vigenere_shifts(key)?;
    let mut key_index = 0;
    Ok(text
        .chars()
        .map(|c| {
            if c.is_ascii_alphabetic() {
                let shift = shifts[key_index % shifts.len()] * direction;
                key_index += 1;
                shift_letter(c, shift)
            } else {
                c
            }
        })
        .collect())
}

/// Vigenère encryption. The key only advances on letters.
///
/// # Errors
///
/// Returns [`GameError`] if the key has no letters.
#[instrument(skip(text))]
pub fn vigenere_encrypt(text: &str, key: &str) -> Result<String, GameError> {
    vigenere(text, key, 1)
}

/// Vigenère decryption, the inverse of [`vigenere_encrypt`].
///
/// # Errors
///
/// Returns [`GameError`] if the key has no letters.
#[instrument(skip(text))]
pub fn vigenere_decrypt(text: &str, key: &str) -> Result<String, GameError> {
    vigenere(text, key, -1)
}

/// XORs every byte with a single-byte key.
pub fn xor_bytes(bytes: &[u8], key: u8) -> Vec<u8> {
    bytes.iter().map(|b| b ^ key).collect()
}

/// Decodes whitespace-separated hex bytes (`48 65 6c` or `0x48 0x45`) as text.
///
/// # Errors
///
/// Returns [`GameError`] if a token is not hex or the bytes are not UTF-8.
#[instrument(skip(dump))]
pub fn hex_to_ascii(dump: &str) -> Result<String, GameError> {
    let joined: String = dump
        .split_whitespace()
        .map(|token| token.trim_start_matches("0x").trim_start_matches("0X"))
        .collect();
    let bytes = hex::decode(&joined).map_err(|e| GameError::new(format!("Invalid hex: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| GameError::new(format!("Not UTF-8: {}", e)))
}

/// Decodes standard base64 as text.
///
/// # Errors
///
/// Returns [`GameError`] if the input is not base64 or not UTF-8.
#[instrument]
pub fn base64_to_ascii(encoded: &str) -> Result<String, GameError> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| GameError::new(format!("Invalid base64: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| GameError::new(format!("Not UTF-8: {}", e)))
}

/// Keeps only the uppercase letters of `text`, the trick behind the
/// mixed-case steganography puzzle.
pub fn uppercase_letters(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_uppercase()).collect()
}
