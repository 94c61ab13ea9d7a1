/// Splits a raw artist credit such as `"Tyler, The Creator, Drake"` into
/// individual names.
///
/// Credits are joined with `", "`, which is ambiguous for names that contain
/// that separator themselves. Names on the exception list are shielded behind
/// a placeholder before splitting and restored afterwards. Comma-bearing names
/// that are not on the list still get split apart.
#[derive(Debug, Clone, Default)]
pub struct ArtistTokenizer {
    exceptions: Vec<String>,
}

const SEPARATOR: &str = ", ";

impl ArtistTokenizer {
    pub fn new<I, S>(exceptions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut exceptions: Vec<String> = exceptions
            .into_iter()
            .map(Into::into)
            .filter(|name| !name.is_empty())
            .collect();
        // Longest first so a name that contains another listed name wins
        exceptions.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        exceptions.dedup();
        Self { exceptions }
    }

    /// Names in credit order. Empty segments are dropped.
    pub fn split(&self, raw: &str) -> Vec<String> {
        if self.exceptions.is_empty() || !raw.contains(SEPARATOR) {
            return raw
                .split(SEPARATOR)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }

        let mut shielded = raw.to_string();
        let mut used = Vec::new();
        for (i, name) in self.exceptions.iter().enumerate() {
            if shielded.contains(name.as_str()) {
                let token = placeholder(i);
                shielded = shielded.replace(name.as_str(), &token);
                used.push((token, name.as_str()));
            }
        }

        shielded
            .split(SEPARATOR)
            .filter(|s| !s.is_empty())
            .map(|part| {
                used.iter()
                    .fold(part.to_string(), |acc, (token, name)| acc.replace(token, name))
            })
            .collect()
    }
}

/// Private-use code points never occur in real credits
fn placeholder(index: usize) -> String {
    format!("\u{E000}{index}\u{E001}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenizer() -> ArtistTokenizer {
        ArtistTokenizer::new(["Tyler, The Creator"])
    }

    #[test]
    fn test_exception_name_kept_intact() {
        assert_eq!(
            tokenizer().split("Tyler, The Creator, Drake"),
            vec!["Tyler, The Creator", "Drake"]
        );
        assert_eq!(
            tokenizer().split("Kali Uchis, Tyler, The Creator"),
            vec!["Kali Uchis", "Tyler, The Creator"]
        );
        assert_eq!(tokenizer().split("Tyler, The Creator"), vec!["Tyler, The Creator"]);
    }

    #[test]
    fn test_plain_credits_split_on_separator() {
        assert_eq!(
            tokenizer().split("Drake, Future, 21 Savage"),
            vec!["Drake", "Future", "21 Savage"]
        );
        assert_eq!(tokenizer().split("Adele"), vec!["Adele"]);
    }

    #[test]
    fn test_unlisted_comma_names_are_split() {
        assert_eq!(
            tokenizer().split("Earth, Wind & Fire"),
            vec!["Earth", "Wind & Fire"]
        );
        let custom = ArtistTokenizer::new(["Earth, Wind & Fire", "Tyler, The Creator"]);
        assert_eq!(
            custom.split("Earth, Wind & Fire, Tyler, The Creator"),
            vec!["Earth, Wind & Fire", "Tyler, The Creator"]
        );
    }

    #[test]
    fn test_empty_credit_yields_no_names() {
        assert!(tokenizer().split("").is_empty());
        assert!(ArtistTokenizer::default().split("").is_empty());
    }

    #[test]
    fn test_repeated_exception_restored_everywhere() {
        assert_eq!(
            tokenizer().split("Tyler, The Creator, Tyler, The Creator"),
            vec!["Tyler, The Creator", "Tyler, The Creator"]
        );
    }

    #[test]
    fn test_longer_exception_wins_over_contained_one() {
        let expected = vec!["A, B, C", "D"];
        assert_eq!(ArtistTokenizer::new(["A, B", "A, B, C"]).split("A, B, C, D"), expected);
        assert_eq!(ArtistTokenizer::new(["A, B, C", "A, B"]).split("A, B, C, D"), expected);
        assert_eq!(ArtistTokenizer::new(["A, B", "A, B, C"]).split("A, B, D"), vec!["A, B", "D"]);
    }
}
