//! DOM helpers and repeatable-section extraction.
//!
//! Profile markup changes often, so every lookup is a cascade of selectors
//! tried in order of specificity. Sections are located by anchor id first
//! and by heading keyword as a fallback.

use scraper::{ElementRef, Html, Selector};

use super::clean::clean_company_name;
use crate::models::{
    Certification, EducationEntry, ExperienceEntry, LanguageEntry, Project, Recommendation,
};

pub(super) fn selector(source: &str) -> Selector {
    Selector::parse(source).unwrap_or_else(|e| panic!("invalid selector {source:?}: {e}"))
}

/// Concatenated text of an element with whitespace collapsed.
pub(super) fn text_of(el: ElementRef<'_>) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// First non-empty text produced by any selector in the cascade.
pub(super) fn first_text(scope: ElementRef<'_>, selectors: &[&str]) -> String {
    for source in selectors {
        let sel = selector(source);
        for el in scope.select(&sel) {
            let text = text_of(el);
            if !text.is_empty() {
                return text;
            }
        }
    }
    String::new()
}

pub(super) fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Nearest `section` ancestor of an element.
pub(super) fn enclosing_section(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == "section")
}

/// Locate a profile section by its anchor id, falling back to scanning all
/// sections for a heading containing one of `keywords`.
pub(super) fn section_for_anchor<'a>(
    doc: &'a Html,
    anchor: &str,
    keywords: &[&str],
) -> Option<ElementRef<'a>> {
    let anchor_sel = selector(&format!("#{anchor}"));
    if let Some(el) = doc.select(&anchor_sel).next() {
        if let Some(section) = enclosing_section(el) {
            return Some(section);
        }
    }

    let section_sel = selector("section");
    let h2_sel = selector("h2");
    for section in doc.select(&section_sel) {
        if let Some(h2) = section.select(&h2_sel).next() {
            let heading = text_of(h2).to_lowercase();
            if keywords.iter().any(|k| heading.contains(k)) {
                return Some(section);
            }
        }
    }
    None
}

/// Whether a "see more" affordance may be expanded: its enclosing section
/// heading must not belong to an activity or post feed.
pub(super) fn expansion_is_safe(button: ElementRef<'_>) -> bool {
    let Some(section) = enclosing_section(button) else {
        return true;
    };
    let h2_sel = selector("h2");
    let heading = section
        .select(&h2_sel)
        .next()
        .map(|h| text_of(h).to_lowercase())
        .unwrap_or_default();
    !heading.contains("activity") && !heading.contains("post")
}

/// Direct `li` children of the first list in the section. Going through the
/// first `ul` only keeps nested sub-component lists out of the item set.
pub(super) fn list_items(section: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let ul_sel = selector("ul");
    let Some(ul) = section.select(&ul_sel).next() else {
        return Vec::new();
    };
    ul.children()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "li")
        .collect()
}

/// Company from one experience item, trying specific caption selectors
/// before falling back to splitting the caption line on middots.
pub(super) fn company_from_experience_item(item: ElementRef<'_>) -> String {
    let cascades = [
        "span.t-14.t-normal > span[aria-hidden=\"true\"]:first-child",
        ".pvs-entity__caption-wrapper span[aria-hidden=\"true\"]:first-child",
        ".t-14.t-normal span[aria-hidden=\"true\"]:first-child",
        ".t-14 span[aria-hidden=\"true\"]:first-child",
    ];
    for source in cascades {
        let sel = selector(source);
        for el in item.select(&sel) {
            let cleaned = clean_company_name(&text_of(el));
            if cleaned.chars().count() >= 2 {
                return cleaned;
            }
        }
    }

    let caption_sel = selector(".t-14.t-normal");
    if let Some(caption) = item.select(&caption_sel).next() {
        let full = text_of(caption);
        for part in full.split('\u{b7}') {
            let cleaned = clean_company_name(part.trim().trim_end_matches('\u{c2}').trim());
            if cleaned.chars().count() >= 2 {
                return cleaned;
            }
        }
    }
    String::new()
}

pub(super) fn experience_entries(section: ElementRef<'_>) -> Vec<ExperienceEntry> {
    let mut entries = Vec::new();
    for item in list_items(section).into_iter().take(5) {
        let title = first_text(
            item,
            &[
                "div.t-bold span[aria-hidden=\"true\"]",
                ".t-bold span[aria-hidden=\"true\"]",
                ".t-bold",
            ],
        );
        let company = company_from_experience_item(item);
        let duration = first_text(
            item,
            &[
                ".t-14.t-normal.t-black--light span[aria-hidden=\"true\"]",
                ".t-black--light span[aria-hidden=\"true\"]",
            ],
        );
        let description = {
            let direct = first_text(item, &[".inline-show-more-text"]);
            if direct.is_empty() {
                let sub_sel = selector(".pvs-entity__sub-components");
                item.select(&sub_sel)
                    .next()
                    .map(|sub| first_text(sub, &["span[aria-hidden=\"true\"]"]))
                    .unwrap_or_default()
            } else {
                direct
            }
        };

        if !title.is_empty() || !company.is_empty() {
            entries.push(ExperienceEntry {
                title: non_empty_or(title, "N/A"),
                company: non_empty_or(company, "N/A"),
                duration: non_empty_or(duration, "N/A"),
                description,
            });
        }
    }
    entries
}

pub(super) fn education_entries(section: ElementRef<'_>) -> Vec<EducationEntry> {
    let mut entries = Vec::new();
    for item in list_items(section).into_iter().take(3) {
        let school = first_text(
            item,
            &[
                ".t-bold span[aria-hidden=\"true\"]",
                ".mr1.hoverable-link-text.t-bold span[aria-hidden=\"true\"]",
                ".display-flex .t-bold span",
                ".pvs-entity__path-node",
                ".t-bold",
            ],
        );
        if school.is_empty() {
            continue;
        }

        let degree_raw = first_text(
            item,
            &[
                ".t-14.t-normal span[aria-hidden=\"true\"]",
                ".t-14.t-normal",
                ".pvs-entity__secondary-title",
            ],
        );
        let duration = first_text(
            item,
            &[
                ".t-14.t-normal.t-black--light span[aria-hidden=\"true\"]",
                ".t-black--light.t-14",
                ".pvs-entity__caption-wrapper",
            ],
        );

        let (degree, field) = split_degree(&degree_raw);
        entries.push(EducationEntry {
            school,
            degree: non_empty_or(degree, "N/A"),
            field,
            duration: non_empty_or(duration, "N/A"),
        });
    }
    entries
}

/// Split a combined degree string into degree and field on a comma or an
/// " in " connective.
pub(super) fn split_degree(raw: &str) -> (String, String) {
    if let Some((degree, field)) = raw.split_once(',') {
        return (degree.trim().to_string(), field.trim().to_string());
    }
    if let Some((degree, field)) = raw.split_once(" in ") {
        return (degree.trim().to_string(), field.trim().to_string());
    }
    (raw.trim().to_string(), String::new())
}

pub(super) fn skill_entries(section: ElementRef<'_>) -> Vec<String> {
    let cascades = [
        ".mr1.hoverable-link-text.t-bold span[aria-hidden=\"true\"]",
        ".pvs-entity__path-node",
        ".hoverable-link-text.t-bold span",
    ];
    for source in cascades {
        let sel = selector(source);
        let skills: Vec<String> = section
            .select(&sel)
            .map(|el| text_of(el))
            .filter(|s| !s.is_empty() && s.chars().count() < 100)
            .take(20)
            .collect();
        if !skills.is_empty() {
            return skills;
        }
    }
    Vec::new()
}

pub(super) fn certification_entries(section: ElementRef<'_>) -> Vec<Certification> {
    let mut entries = Vec::new();
    for item in list_items(section).into_iter().take(10) {
        let name = first_text(
            item,
            &[
                ".t-bold span[aria-hidden=\"true\"]",
                ".mr1 span[aria-hidden=\"true\"]",
            ],
        );
        if name.is_empty() {
            continue;
        }
        let issuer = first_text(
            item,
            &[".t-14 span[aria-hidden=\"true\"]", ".t-14.t-normal"],
        );
        let date = first_text(item, &[".t-black--light span[aria-hidden=\"true\"]"]);
        entries.push(Certification {
            name,
            issuer: non_empty_or(issuer, "N/A"),
            date: non_empty_or(date, "N/A"),
        });
    }
    entries
}

pub(super) fn project_entries(section: ElementRef<'_>) -> Vec<Project> {
    let mut entries = Vec::new();
    for item in list_items(section).into_iter().take(10) {
        let name = first_text(item, &[".t-bold span[aria-hidden=\"true\"]"]);
        if name.is_empty() {
            continue;
        }
        let description = first_text(
            item,
            &[".inline-show-more-text", ".pvs-list__outer-container"],
        );
        let date = first_text(item, &[".t-black--light span[aria-hidden=\"true\"]"]);
        entries.push(Project {
            name,
            description,
            date: non_empty_or(date, "N/A"),
        });
    }
    entries
}

pub(super) fn recommendation_entries(section: ElementRef<'_>) -> Vec<Recommendation> {
    let mut entries = Vec::new();
    for item in list_items(section).into_iter().take(5) {
        let text = first_text(
            item,
            &[
                ".inline-show-more-text",
                ".pvs-list__outer-container",
                "span[aria-hidden=\"true\"]",
            ],
        );
        if text.is_empty() {
            continue;
        }
        let author = first_text(item, &[".t-bold"]);
        entries.push(Recommendation {
            text: truncate_chars(&text, 500),
            author: non_empty_or(author, "Unknown"),
        });
    }
    entries
}

pub(super) fn interest_entries(section: ElementRef<'_>) -> Vec<String> {
    list_items(section)
        .into_iter()
        .take(20)
        .filter_map(|item| {
            let interest = first_text(
                item,
                &[
                    ".t-bold span[aria-hidden=\"true\"]",
                    "span[aria-hidden=\"true\"]",
                ],
            );
            if interest.is_empty() {
                None
            } else {
                Some(truncate_chars(&interest, 200))
            }
        })
        .collect()
}

pub(super) fn language_entries(section: ElementRef<'_>) -> Vec<LanguageEntry> {
    let mut entries = Vec::new();
    for item in list_items(section).into_iter().take(10) {
        let language = first_text(item, &[".t-bold span[aria-hidden=\"true\"]"]);
        if language.is_empty() {
            continue;
        }
        let proficiency = first_text(item, &[".t-14 span[aria-hidden=\"true\"]"]);
        entries.push(LanguageEntry {
            language,
            proficiency: non_empty_or(proficiency, "N/A"),
        });
    }
    entries
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}
