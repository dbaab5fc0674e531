use unicode_normalization::UnicodeNormalization;

/// Canonicalize free text: NFKC, lowercase, anything outside `[a-z0-9]` and
/// whitespace becomes a space, whitespace runs collapse to one space, trimmed.
///
/// Idempotent: `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    let lowered: String = text.nfkc().flat_map(char::to_lowercase).collect();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_space = false;
    for c in lowered.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_and_case() {
        assert_eq!(normalize("  Noise-Cancelling   HEADPHONES!! "), "noise cancelling headphones");
    }

    #[test]
    fn compatibility_forms_fold() {
        // fullwidth letters and the "ﬁ" ligature decompose under NFKC
        assert_eq!(normalize("ＡＢＣ ﬁne"), "abc fine");
    }

    #[test]
    fn non_ascii_letters_become_separators() {
        assert_eq!(normalize("café au lait"), "caf au lait");
    }

    #[test]
    fn idempotent_on_samples() {
        for s in ["", "   ", "a\tb\nc", "Ünïcödé — text", "x-1_y.2", "ＡＢＣ"] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once);
            assert!(once.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == ' '));
            assert!(!once.starts_with(' ') && !once.ends_with(' ') && !once.contains("  "));
        }
    }
}
