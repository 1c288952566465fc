use std::fmt;

/// Hostname wildcard stored in an allowed-sender entry.
///
/// `*` matches any run of characters (including dots and the empty run) and
/// `?` matches exactly one character. Comparison ignores ASCII case. There is
/// no escape character, so a backslash matches itself.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct HostPattern {
    text: String,
}

impl HostPattern {
    /// Wraps `text` as a pattern. The text is stored verbatim.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Returns the pattern text as configured.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns `true` if the text contains `*` or `?`.
    #[must_use]
    pub fn has_wildcards(&self) -> bool {
        contains_wildcard(&self.text)
    }

    /// Matches `hostname` against the pattern.
    #[must_use]
    pub fn matches(&self, hostname: &str) -> bool {
        wildcard_match(self.text.as_bytes(), hostname.as_bytes())
    }
}

impl fmt::Display for HostPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

pub(crate) fn contains_wildcard(text: &str) -> bool {
    text.contains(['*', '?'])
}

fn wildcard_match(pattern: &[u8], text: &[u8]) -> bool {
    let mut pat_index = 0usize;
    let mut text_index = 0usize;
    let mut star_index: Option<usize> = None;
    let mut match_index = 0usize;

    while text_index < text.len() {
        if pat_index < pattern.len()
            && (pattern[pat_index] == b'?'
                || pattern[pat_index].eq_ignore_ascii_case(&text[text_index]))
        {
            pat_index += 1;
            text_index += 1;
        } else if pat_index < pattern.len() && pattern[pat_index] == b'*' {
            // Remember the star and first try matching it against nothing.
            star_index = Some(pat_index);
            pat_index += 1;
            match_index = text_index;
        } else if let Some(star_pos) = star_index {
            // Let the last star swallow one more character and retry.
            pat_index = star_pos + 1;
            match_index += 1;
            text_index = match_index;
        } else {
            return false;
        }
    }

    while pat_index < pattern.len() && pattern[pat_index] == b'*' {
        pat_index += 1;
    }

    pat_index == pattern.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_star_requires_the_dot() {
        let pattern = HostPattern::new("*.example.com");
        assert!(pattern.matches("a.example.com"));
        assert!(pattern.matches("x.y.example.com"));
        assert!(!pattern.matches("example.com"));
        assert!(!pattern.matches("evil.com"));
        assert!(!pattern.matches("a.example.com.evil.com"));
    }

    #[test]
    fn matching_ignores_case() {
        let pattern = HostPattern::new("*.Example.COM");
        assert!(pattern.matches("WWW.example.com"));
        assert!(pattern.matches("mail.EXAMPLE.com"));
    }

    #[test]
    fn question_mark_matches_exactly_one_character() {
        let pattern = HostPattern::new("web?.example.net");
        assert!(pattern.matches("web1.example.net"));
        assert!(pattern.matches("webX.example.net"));
        assert!(!pattern.matches("web.example.net"));
        assert!(!pattern.matches("web12.example.net"));
    }

    #[test]
    fn star_matches_empty_run_and_dots() {
        let pattern = HostPattern::new("db*");
        assert!(pattern.matches("db"));
        assert!(pattern.matches("db01.internal.example"));
        assert!(HostPattern::new("*").matches("anything.at.all"));
    }

    #[test]
    fn empty_hostname_only_matches_star_patterns() {
        assert!(!HostPattern::new("?").matches(""));
        assert!(!HostPattern::new("host").matches(""));
        assert!(HostPattern::new("**").matches(""));
    }

    #[test]
    fn backslash_is_literal() {
        let pattern = HostPattern::new("a\\*");
        assert!(pattern.matches("a\\b"));
        assert!(!pattern.matches("ab"));
    }

    #[test]
    fn wildcard_detection() {
        assert!(HostPattern::new("*.example.com").has_wildcards());
        assert!(HostPattern::new("host?").has_wildcards());
        assert!(!HostPattern::new("host.example.com").has_wildcards());
    }

    #[test]
    fn display_renders_text_verbatim() {
        assert_eq!(HostPattern::new("*.Example.org").to_string(), "*.Example.org");
    }
}
