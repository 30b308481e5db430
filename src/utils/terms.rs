use crate::engines::generation::genome::initial_letter;

pub const DEFAULT_TOPIC: &str = "planets in order";

pub const DEFAULT_TERMS: [&str; 8] = [
    "Mercury", "Venus", "Earth", "Mars", "Jupiter", "Saturn", "Uranus", "Neptune",
];

/// One term per line. Surrounding whitespace is trimmed and blank lines are skipped.
pub fn parse_terms(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Upper-cased first letter of each term. Blank terms are skipped.
pub fn first_letters(terms: &[String]) -> Vec<char> {
    terms.iter().filter_map(|t| initial_letter(t)).collect()
}

pub fn default_terms() -> Vec<String> {
    DEFAULT_TERMS.iter().map(|t| t.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_terms_skips_blank_lines() {
        let terms = parse_terms("  Mercury\n\nVenus  \r\n   \nEarth\n");
        assert_eq!(terms, vec!["Mercury", "Venus", "Earth"]);
    }

    #[test]
    fn test_first_letters_of_planets() {
        let letters = first_letters(&default_terms());
        assert_eq!(letters, vec!['M', 'V', 'E', 'M', 'J', 'S', 'U', 'N']);
    }

    #[test]
    fn test_first_letters_lowercase_input() {
        let terms = parse_terms("oxygen\nhydrogen");
        assert_eq!(first_letters(&terms), vec!['O', 'H']);
    }
}
