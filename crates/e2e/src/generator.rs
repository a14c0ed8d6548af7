//! Random test data
//!
//! Each `random_*` function draws from the thread-local RNG; the matching
//! `*_with` function takes any [`Rng`] so callers (and tests) can seed it.
//! Values are realistic enough for the product's validation rules: emails
//! are well-formed, passwords satisfy the sign-up policy and project names
//! are unlikely to collide within a run.

use crate::constants;
use rand::seq::SliceRandom;
use rand::Rng;

const FIRST_NAMES: &[&str] = &[
    "Alice", "Bruno", "Chen", "Dana", "Elif", "Farah", "Gustavo", "Hana", "Ivan", "Jonas",
    "Keiko", "Liam", "Maya", "Nikhil", "Olga", "Pablo", "Quinn", "Rosa", "Samir", "Tara",
];

const LAST_NAMES: &[&str] = &[
    "Anderson", "Bianchi", "Costa", "Dubois", "Eriksen", "Fischer", "Garcia", "Hoffmann",
    "Ito", "Jensen", "Kowalski", "Larsen", "Moreau", "Nakamura", "Okafor", "Petrov",
];

const APP_WORDS: &[&str] = &[
    "Aurora", "Beacon", "Cascade", "Drift", "Ember", "Falcon", "Granite", "Harbor", "Indigo",
    "Juniper", "Kestrel", "Lumen", "Meridian", "Nimbus", "Orbit", "Pioneer", "Quartz",
    "Ridge", "Summit", "Tundra",
];

const EMAIL_DOMAINS: &[&str] = &["example.com", "example.org", "test.example.net"];

const SENTENCES: &[&str] = &[
    "This project explores a simple workflow for small teams.",
    "Users can sign in and manage their own records.",
    "The interface favours clarity over decoration.",
    "Data is stored in a relational database with daily backups.",
    "Every screen is designed to work well on mobile devices.",
    "The first release focuses on the core editing experience.",
    "Notifications keep collaborators informed about changes.",
    "An admin area allows configuration without redeploying.",
    "Search results update as the user types.",
    "The API exposes the same features as the web client.",
];

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SPECIALS: &[u8] = b"!@#$%^&*";

/// Password length bounds, inclusive
pub const PASSWORD_LENGTH: (usize, usize) = (8, 12);

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

fn pick_byte<R: Rng + ?Sized>(rng: &mut R, set: &[u8]) -> char {
    char::from(set.choose(rng).copied().unwrap_or(b'x'))
}

/// `first.last<3 digits>@domain`, lowercase
pub fn random_email_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "{}.{}{:03}@{}",
        pick(rng, FIRST_NAMES).to_lowercase(),
        pick(rng, LAST_NAMES).to_lowercase(),
        rng.gen_range(0..1000),
        pick(rng, EMAIL_DOMAINS)
    )
}

/// 8-12 characters with at least one upper, lower, digit and special
pub fn random_password_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let len = rng.gen_range(PASSWORD_LENGTH.0..=PASSWORD_LENGTH.1);
    let mut chars = vec![
        pick_byte(rng, UPPERCASE),
        pick_byte(rng, LOWERCASE),
        pick_byte(rng, DIGITS),
        pick_byte(rng, SPECIALS),
    ];
    let all: Vec<u8> = [LOWERCASE, UPPERCASE, DIGITS, SPECIALS].concat();
    while chars.len() < len {
        chars.push(pick_byte(rng, &all));
    }
    chars.shuffle(rng);
    chars.into_iter().collect()
}

/// `First Last`
pub fn random_name_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, LAST_NAMES))
}

/// `Project <Word> <4 digits>`
pub fn random_project_name_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "Project {} {:04}",
        pick(rng, APP_WORDS),
        rng.gen_range(0..10_000)
    )
}

/// A paragraph of 3-5 sentences
pub fn random_project_description_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let count = rng.gen_range(3..=5);
    SENTENCES
        .choose_multiple(rng, count)
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

/// One of the product's prompt templates
pub fn random_prompt_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    pick(rng, &constants::PROMPTS).to_string()
}

pub fn random_email() -> String {
    random_email_with(&mut rand::thread_rng())
}

pub fn random_password() -> String {
    random_password_with(&mut rand::thread_rng())
}

pub fn random_name() -> String {
    random_name_with(&mut rand::thread_rng())
}

pub fn random_project_name() -> String {
    random_project_name_with(&mut rand::thread_rng())
}

pub fn random_project_description() -> String {
    random_project_description_with(&mut rand::thread_rng())
}

pub fn random_prompt() -> String {
    random_prompt_with(&mut rand::thread_rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn is_valid_email(email: &str) -> bool {
        match email.split_once('@') {
            Some((local, domain)) => !local.is_empty() && domain.contains('.'),
            None => false,
        }
    }

    mod generator_tests {
        use super::*;

        #[test]
        fn test_project_name_shape() {
            let name = random_project_name();
            let parts: Vec<&str> = name.split(' ').collect();
            assert_eq!(parts.len(), 3, "{name}");
            assert_eq!(parts[0], "Project");
            assert!(APP_WORDS.contains(&parts[1]));
            assert_eq!(parts[2].len(), 4);
            assert!(parts[2].chars().all(|c| c.is_ascii_digit()));
        }

        #[test]
        fn test_prompt_is_a_template() {
            assert!(constants::PROMPTS.contains(&random_prompt().as_str()));
        }

        #[test]
        fn test_name_has_two_parts() {
            assert_eq!(random_name().split(' ').count(), 2);
        }
    }

    proptest! {
        #[test]
        fn prop_password_policy(seed in any::<u64>()) {
            let password = random_password_with(&mut StdRng::seed_from_u64(seed));
            prop_assert!((PASSWORD_LENGTH.0..=PASSWORD_LENGTH.1).contains(&password.len()));
            prop_assert!(password.chars().any(|c| c.is_ascii_uppercase()));
            prop_assert!(password.chars().any(|c| c.is_ascii_lowercase()));
            prop_assert!(password.chars().any(|c| c.is_ascii_digit()));
            prop_assert!(password.bytes().any(|b| SPECIALS.contains(&b)));
        }

        #[test]
        fn prop_email_is_well_formed(seed in any::<u64>()) {
            let email = random_email_with(&mut StdRng::seed_from_u64(seed));
            prop_assert!(is_valid_email(&email), "{}", email);
            prop_assert_eq!(email.to_lowercase(), email);
        }

        #[test]
        fn prop_description_sentence_count(seed in any::<u64>()) {
            let description = random_project_description_with(&mut StdRng::seed_from_u64(seed));
            let sentences = description.matches(". ").count() + 1;
            prop_assert!((3..=5).contains(&sentences), "{}", description);
            prop_assert!(description.ends_with('.'));
        }
    }
}
