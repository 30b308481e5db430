//! Orthographic and phonetic closeness between a mnemonic word and its target word.
//!
//! Everything here is deterministic and case-insensitive. Scores are in [0, 1], with 1
//! meaning identical spelling and rhythm.

/// Share of the word score taken by normalized edit distance; the rest is syllable closeness.
pub const ORTHOGRAPHIC_SHARE: f64 = 0.7;

/// `1 - distance / longer_length` on the normalized words; two empty strings are identical.
pub fn orthographic_similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(&normalize(a), &normalize(b))
}

/// Vowel-group count, at least one for any non-empty word. A trailing silent `e` is
/// dropped when the word has another vowel group.
pub fn estimate_syllables(word: &str) -> usize {
    let word = normalize(word);
    if word.is_empty() {
        return 0;
    }

    let mut groups = 0;
    let mut in_vowel = false;
    for c in word.chars() {
        let vowel = matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
        if vowel && !in_vowel {
            groups += 1;
        }
        in_vowel = vowel;
    }

    if groups > 1 && word.ends_with('e') && !word.ends_with("le") && !word.ends_with("ee") {
        groups -= 1;
    }

    groups.max(1)
}

pub fn syllable_closeness(a: &str, b: &str) -> f64 {
    let sa = estimate_syllables(a);
    let sb = estimate_syllables(b);
    let most = sa.max(sb);
    if most == 0 {
        return 1.0;
    }
    1.0 - sa.abs_diff(sb) as f64 / most as f64
}

/// Combined word score used by the fitness evaluator.
pub fn word_similarity(mnemonic: &str, target: &str) -> f64 {
    ORTHOGRAPHIC_SHARE * orthographic_similarity(mnemonic, target)
        + (1.0 - ORTHOGRAPHIC_SHARE) * syllable_closeness(mnemonic, target)
}

fn normalize(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
