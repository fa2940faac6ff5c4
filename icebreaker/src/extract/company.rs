//! Company inference from headline text.
//!
//! Applied only after the badge and experience-entry tiers came up empty.

use std::sync::OnceLock;

use super::clean::clean_company_name;

fn at_pattern() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex::Regex::new(r"(?:at|@)\s+([A-Z][A-Za-z0-9\s&.,'-]+?)(?:\s*[|\u{b7}]|\s*-\s*|$)")
            .unwrap_or_else(|e| panic!("invalid headline pattern: {e}"))
    })
}

fn excluded_word() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex::Regex::new(
            r"(?i)^(at|in|the|and|or|for|we|are|senior|junior|lead|principal|staff|manager|director|engineer|developer|designer|analyst|specialist|consultant|coordinator|assistant|executive|vice|chief|head|hiring|recruiting|closing|looking|seeking)$",
        )
        .unwrap_or_else(|e| panic!("invalid exclusion pattern: {e}"))
    })
}

/// Split the headline on " at " or " @ " and clean the trailing part.
pub(super) fn from_headline_split(headline: &str) -> String {
    for marker in [" at ", " @ "] {
        if headline.to_lowercase().contains(marker) {
            if let Some((_, tail)) = headline.rsplit_once(marker) {
                let candidate = tail.split('|').next().unwrap_or("").trim();
                let cleaned = clean_company_name(candidate);
                if cleaned.chars().count() >= 2 {
                    return cleaned;
                }
            }
        }
    }
    String::new()
}

/// Match an "at Capitalized…" or "@ Capitalized…" run in the headline.
pub(super) fn from_headline_pattern(headline: &str) -> String {
    if let Some(captures) = at_pattern().captures(headline) {
        if let Some(candidate) = captures.get(1) {
            let cleaned = clean_company_name(candidate.as_str().trim());
            if cleaned.chars().count() >= 2 {
                return cleaned;
            }
        }
    }
    String::new()
}

/// Last resort: scan headline words for a capitalized token that is not a
/// generic role or connective word.
pub(super) fn from_capitalized_words(headline: &str) -> String {
    for word in headline.split_whitespace() {
        if word.chars().count() > 2
            && word.chars().next().is_some_and(|c| c.is_ascii_uppercase())
            && !excluded_word().is_match(word)
        {
            let cleaned = clean_company_name(word);
            if cleaned.chars().count() >= 2 {
                return cleaned;
            }
        }
    }
    String::new()
}
