// File: src/core/normalizer.rs
use crate::config::AffixRules;

/// Canonicalizes words and gloss tokens before they are compared.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    rules: AffixRules,
}

impl Normalizer {
    pub fn new(rules: AffixRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &AffixRules {
        &self.rules
    }

    /// Lower-cases, drops everything but letters, whitespace and hyphens, then
    /// strips notation affixes (`-neg`, `ix-`, ...) and surrounding whitespace.
    ///
    /// Affix stripping repeats until nothing changes, so the result is a fixed
    /// point: `normalize(normalize(x)) == normalize(x)`.
    pub fn normalize(&self, word: &str) -> String {
        let mut current: String = word
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_lowercase() || c.is_whitespace() || *c == '-')
            .collect();
        current = current.trim().to_string();

        loop {
            let stripped = self.strip_affixes_once(&current);
            if stripped == current {
                return current;
            }
            current = stripped;
        }
    }

    // Each suffix, then each prefix, removed at most once per pass.
    fn strip_affixes_once(&self, word: &str) -> String {
        let mut out = word;
        for suffix in &self.rules.suffixes {
            if let Some(rest) = out.strip_suffix(suffix.as_str()) {
                out = rest;
            }
        }
        for prefix in &self.rules.prefixes {
            if let Some(rest) = out.strip_prefix(prefix.as_str()) {
                out = rest;
            }
        }
        out.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(word: &str) -> String {
        Normalizer::default().normalize(word)
    }

    #[test]
    fn test_affixes_and_case_fold() {
        assert_eq!(normalize("IX-HOUSE-NEG"), "house");
        assert_eq!(normalize("IX-HOUSE-NEG"), normalize("house"));
        assert_eq!(normalize("nms-think"), "think");
        assert_eq!(normalize("PCL-car"), "car");
        assert_eq!(normalize("mime-drink"), "drink");
    }

    #[test]
    fn test_punctuation_and_digits_removed() {
        assert_eq!(normalize("don't!"), "dont");
        assert_eq!(normalize("  hello, world 2 "), "hello world");
        assert_eq!(normalize("café"), "caf");
    }

    #[test]
    fn test_empty_and_affix_only_inputs() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("ix-"), "");
        assert_eq!(normalize("-neg"), "");
        assert_eq!(normalize("123"), "");
    }

    #[test]
    fn test_idempotent() {
        for word in [
            "IX-HOUSE-NEG",
            "ix-nms-house",
            " house-neg ",
            "house-neg-neg",
            "nms- ix-go",
            "Re-Do",
            "a b-c",
        ] {
            let once = normalize(word);
            assert_eq!(normalize(&once), once, "not idempotent for {word:?}");
        }
    }

    #[test]
    fn test_custom_rules() {
        let normalizer = Normalizer::new(AffixRules {
            suffixes: vec!["-q".into()],
            prefixes: vec!["poss-".into()],
        });
        assert_eq!(normalizer.normalize("POSS-home-q"), "home");
        // Default affixes no longer apply
        assert_eq!(normalizer.normalize("ix-home"), "ix-home");
    }
}
