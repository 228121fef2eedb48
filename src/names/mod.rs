// ABOUTME: Name Generator — Docker-style `adjective-noun` session names with a uniqueness callback

mod wordlist;

use thiserror::Error;

use wordlist::{ADJECTIVES, NOUNS};

#[derive(Error, Debug)]
#[error("exhausted {0} attempts without finding a unique name")]
pub struct Exhausted(pub usize);

/// Emits `<adjective>-<noun>` pairs, retrying until `exists` reports `false` or
/// `max_attempts` runs out.
pub fn generate_unique(
    mut exists: impl FnMut(&str) -> bool,
    max_attempts: usize,
) -> Result<String, Exhausted> {
    for _ in 0..max_attempts {
        let name = random_name();
        if !exists(&name) {
            return Ok(name);
        }
    }
    Err(Exhausted(max_attempts))
}

fn random_name() -> String {
    let adjective = ADJECTIVES[random_index(ADJECTIVES.len())];
    let noun = NOUNS[random_index(NOUNS.len())];
    format!("{adjective}-{noun}")
}

/// `uuid::Uuid::new_v4` already pulls from the OS RNG; reusing it here avoids adding a
/// `rand` dependency just for two array indices.
fn random_index(len: usize) -> usize {
    let bytes = uuid::Uuid::new_v4();
    let n = u32::from_le_bytes(bytes.as_bytes()[0..4].try_into().unwrap());
    (n as usize) % len
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generate_unique_respects_exists_callback() {
        let mut seen: HashSet<String> = HashSet::new();
        seen.insert("a".to_string());

        let name = generate_unique(|n| seen.contains(n), 100).unwrap();
        assert!(!seen.contains(&name));
        assert!(name.contains('-'));
    }

    #[test]
    fn generate_unique_exhausts_when_everything_taken() {
        let result = generate_unique(|_| true, 5);
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().0, 5);
    }

    #[test]
    fn wordlists_have_at_least_a_hundred_entries() {
        assert!(ADJECTIVES.len() >= 100);
        assert!(NOUNS.len() >= 100);
    }
}
