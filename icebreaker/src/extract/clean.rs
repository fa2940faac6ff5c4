//! Company-name cleaning.
//!
//! Scraped company fields carry employment metadata ("Google · Full-time"),
//! separators, and generic role words. `clean_company_name` reduces such raw
//! text to a plausible company name or rejects it outright.

/// Employment-type and work-arrangement vocabulary. A candidate containing
/// any of these is metadata, not a company.
const EMPLOYMENT_METADATA: &[&str] = &[
    "full-time",
    "part-time",
    "contract",
    "freelance",
    "internship",
    "self-employed",
    "apprenticeship",
    "seasonal",
    "temporary",
    "full time",
    "part time",
    "self employed",
    "remote",
    "hybrid",
    "on-site",
    "onsite",
];

/// Role and hiring words that are rejected only on exact match.
const JOB_KEYWORDS: &[&str] = &[
    "closing",
    "hiring",
    "recruiting",
    "looking",
    "seeking",
    "available",
    "open to",
    "actively",
    "searching",
    "team",
    "lead",
    "manager",
    "director",
    "senior",
    "junior",
    "principal",
    "staff",
    "chief",
];

const COMMON_ACRONYMS: &[&str] = &[
    "AI", "IT", "HR", "PR", "QA", "UI", "UX", "ML", "VP", "CEO", "CTO", "CFO",
];

/// Separators after which everything is metadata. Scraped markup shows the
/// middot both as proper UTF-8 and as the mojibake byte pair.
const SEPARATORS: &[&str] = &["\u{c2}\u{b7}", "\u{b7}", "|", " - ", "@"];

/// Clean a raw company string. Returns an empty string when the input is not
/// a usable company name.
pub fn clean_company_name(raw: &str) -> String {
    let mut cleaned = raw.trim();
    for sep in SEPARATORS {
        if let Some((head, _)) = cleaned.split_once(sep) {
            cleaned = head.trim();
        }
    }

    let lower = cleaned.to_lowercase();
    if EMPLOYMENT_METADATA.iter().any(|meta| lower.contains(meta)) {
        return String::new();
    }
    if JOB_KEYWORDS.iter().any(|keyword| lower == *keyword) {
        return String::new();
    }
    if cleaned.chars().count() < 2 || cleaned.chars().all(|c| c.is_ascii_digit()) {
        return String::new();
    }
    let upper = cleaned.to_uppercase();
    if COMMON_ACRONYMS.contains(&upper.as_str()) {
        return String::new();
    }

    cleaned.to_string()
}
