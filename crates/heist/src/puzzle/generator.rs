//! Random puzzle generation.
//!
//! Each defense has a fixed rule set mapping what the player sees to the
//! answer they must type. The same rules are explained on the training page.

use heist_common::{DefenseSystem, Puzzle};
use rand::Rng;
use rand::seq::IndexedRandom;

const FIREWALL_LEADS: &[u8] = b"ABCD";
const FIREWALL_LETTERS: &[u8] = b"ABCDEF";
const OTHER_WIRES: &[&str] = &["blue", "green", "yellow"];

/// Generate a puzzle for a uniformly chosen defense
pub fn generate(rng: &mut impl Rng) -> Puzzle {
    match rng.random_range(0..3) {
        0 => wires(rng),
        1 => keypad(rng),
        _ => firewall(rng),
    }
}

/// Wire panel: four layouts, each with a fixed instruction
pub fn wires(rng: &mut impl Rng) -> Puzzle {
    let (description, expected) = match rng.random_range(0..4) {
        0 => (
            "Indicators: 2 lights | wires: red, blue".to_string(),
            "connect red blue".to_string(),
        ),
        1 => (
            "Indicators: 2 lights | wires: green, yellow".to_string(),
            "cut green".to_string(),
        ),
        2 => (
            "Indicators: 3 lights | any pair shown".to_string(),
            "disconnect all".to_string(),
        ),
        _ => {
            let other = OTHER_WIRES.choose(rng).copied().unwrap_or("blue");
            (
                format!("Indicators: 1 light | wires: red, {}", other),
                format!("cut {}", other),
            )
        }
    };

    Puzzle {
        system: DefenseSystem::Wires,
        description,
        expected,
    }
}

/// Keypad: code derived from a single indicator digit
pub fn keypad(rng: &mut impl Rng) -> Puzzle {
    let n: u32 = rng.random_range(1..=9);
    Puzzle {
        system: DefenseSystem::Keypad,
        description: format!("Indicator number: {}", n),
        expected: keypad_code(n),
    }
}

pub fn keypad_code(n: u32) -> String {
    if n == 9 {
        "999".to_string()
    } else if n % 2 == 0 {
        (n * 2).to_string()
    } else {
        (n + 3).to_string()
    }
}

/// Firewall: a three-letter pattern transformed by its first letter
pub fn firewall(rng: &mut impl Rng) -> Puzzle {
    let mut pattern = String::with_capacity(3);
    pattern.push(pick_letter(FIREWALL_LEADS, rng));
    for _ in 0..2 {
        pattern.push(pick_letter(FIREWALL_LETTERS, rng));
    }

    Puzzle {
        system: DefenseSystem::Firewall,
        description: format!("Firewall pattern: {}", pattern),
        expected: firewall_answer(&pattern),
    }
}

fn pick_letter(letters: &[u8], rng: &mut impl Rng) -> char {
    letters.choose(rng).copied().unwrap_or(b'A') as char
}

/// A: reverse, B: repeat, C: drop the middle letter, anything else: unchanged
pub fn firewall_answer(pattern: &str) -> String {
    match pattern.chars().next() {
        Some('A') => pattern.chars().rev().collect(),
        Some('B') => pattern.repeat(2),
        Some('C') => {
            let mid = pattern.chars().count() / 2;
            pattern
                .chars()
                .enumerate()
                .filter(|(i, _)| *i != mid)
                .map(|(_, c)| c)
                .collect()
        }
        _ => pattern.to_string(),
    }
}
