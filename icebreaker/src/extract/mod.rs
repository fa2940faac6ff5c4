//! Profile page extraction.
//!
//! Turns the HTML of a professional networking profile page into a
//! [`ProfileRecord`]. Extraction is best-effort: only a missing name or an
//! unrecognized page shape is an error, every other miss leaves its field
//! empty. Company is resolved through four tiers, from the profile badge
//! down to headline heuristics.

pub mod clean;
mod company;
mod sections;

pub use clean::clean_company_name;

use scraper::Html;

use crate::error::{IcebreakerError, Result};
use crate::models::ProfileRecord;
use sections::{
    certification_entries, education_entries, expansion_is_safe, experience_entries, first_text,
    interest_entries, language_entries, project_entries, recommendation_entries,
    section_for_anchor, selector, skill_entries,
};

const MAIN_SELECTORS: &[&str] = &[
    "main.scaffold-layout__main",
    ".scaffold-layout__main",
    "section[data-member-id]",
    ".profile-page",
];

/// Capability for expanding a truncated "see more" region. The extractor
/// consults it only for the About section and only after checking that the
/// affordance does not belong to an activity or post feed.
pub trait SectionExpander {
    /// Given the truncated section text, return the full text if available.
    fn expand(&self, section_text: &str) -> Option<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileExtractor;

impl ProfileExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, html: &str) -> Result<ProfileRecord> {
        self.parse_with_expander(html, None)
    }

    pub fn parse_with_expander(
        &self,
        html: &str,
        expander: Option<&dyn SectionExpander>,
    ) -> Result<ProfileRecord> {
        let doc = Html::parse_document(html);
        let root = doc.root_element();

        if !MAIN_SELECTORS
            .iter()
            .any(|s| doc.select(&selector(s)).next().is_some())
        {
            return Err(IcebreakerError::Extraction(
                "Unable to detect a profile page. Please make sure the page has fully loaded and try again."
                    .to_string(),
            ));
        }

        let mut record = ProfileRecord {
            name: first_text(
                root,
                &[
                    "h1.text-heading-xlarge",
                    "h1.inline.t-24",
                    ".pv-text-details__left-panel h1",
                    "[data-generated-suggestion-target] h1",
                ],
            ),
            headline: first_text(
                root,
                &[
                    ".text-body-medium.break-words",
                    ".pv-text-details__left-panel .text-body-medium",
                    "div.text-body-medium[data-generated-suggestion-target]",
                ],
            ),
            ..Default::default()
        };

        // Tier one: the company badge next to the profile name.
        let badge = first_text(
            root,
            &[
                ".pv-text-details__right-panel .hoverable-link-text",
                ".pv-top-card--list-bullet .hoverable-link-text",
                "[data-field=\"experience_company_logo\"] + div",
                ".pv-text-details__right-panel-item-link",
            ],
        );
        let badge_company = clean_company_name(&badge);
        if badge_company.chars().count() >= 2 {
            tracing::debug!(company = %badge_company, "company from profile badge");
            record.company = badge_company;
        }

        // Tier two: " at X" or " @ X" in the headline.
        if record.company.is_empty() {
            record.company = company::from_headline_split(&record.headline);
        }

        record.location = first_text(
            root,
            &[
                ".text-body-small.inline.t-black--light.break-words",
                ".pv-text-details__left-panel .text-body-small",
                "span.text-body-small[data-generated-suggestion-target]",
            ],
        );

        if let Some(section) = section_for_anchor(&doc, "about", &["about"]) {
            record.about = first_text(
                section,
                &[
                    ".inline-show-more-text",
                    ".pv-about__summary-text",
                    ".display-flex.ph5.pv3",
                    ".pvs-list__outer-container",
                    ".visually-hidden",
                    "div[class*=\"about\"] span[aria-hidden=\"true\"]",
                ],
            );

            let button_sel = selector(".inline-show-more-text__button");
            if let (Some(button), Some(exp)) = (section.select(&button_sel).next(), expander) {
                if expansion_is_safe(button) {
                    if let Some(expanded) = exp.expand(&record.about) {
                        tracing::debug!("expanded truncated about section");
                        record.about = expanded;
                    }
                } else {
                    tracing::debug!("skipped see-more affordance inside activity feed");
                }
            }
        }

        if let Some(section) = section_for_anchor(&doc, "experience", &["experience"]) {
            record.experience = experience_entries(section);
        }

        // Tier three: first experience entry's company.
        if record.company.is_empty() {
            if let Some(first) = record.experience.first() {
                if first.company != "N/A" {
                    let cleaned = clean_company_name(&first.company);
                    if cleaned.chars().count() >= 2 {
                        tracing::debug!(company = %cleaned, "company from first experience entry");
                        record.company = cleaned;
                    }
                }
            }
        }

        if let Some(section) = section_for_anchor(&doc, "education", &["education"]) {
            record.education = education_entries(section);
        }
        if let Some(section) = section_for_anchor(&doc, "skills", &["skill"]) {
            record.skills = skill_entries(section);
        }
        if let Some(section) = section_for_anchor(
            &doc,
            "licenses_and_certifications",
            &["licens", "certification"],
        ) {
            record.certifications = certification_entries(section);
        }
        if let Some(section) = section_for_anchor(&doc, "projects", &["project"]) {
            record.projects = project_entries(section);
        }
        if let Some(section) = section_for_anchor(&doc, "recommendations", &["recommendation"]) {
            record.recommendations = recommendation_entries(section);
        }
        if let Some(section) = section_for_anchor(&doc, "interests", &["interest"]) {
            record.interests = interest_entries(section);
        }
        if let Some(section) = section_for_anchor(&doc, "languages", &["language"]) {
            record.languages = language_entries(section);
        }

        if record.name.is_empty() {
            return Err(IcebreakerError::Extraction(
                "Could not extract profile name. The page may not be fully loaded or the layout may have changed. Please refresh and try again."
                    .to_string(),
            ));
        }

        // Tier four: last-resort heuristics.
        if record.company.is_empty() {
            let top_card = first_text(
                root,
                &[
                    ".pv-text-details__left-panel .text-body-small",
                    ".mt1 .text-body-small",
                ],
            );
            let cleaned = clean_company_name(&top_card);
            if cleaned.chars().count() >= 2 {
                record.company = cleaned;
            }
        }
        if record.company.is_empty() {
            record.company = company::from_headline_pattern(&record.headline);
        }
        if record.company.is_empty() {
            record.company = company::from_capitalized_words(&record.headline);
        }

        tracing::debug!(
            name = %record.name,
            company = %record.company,
            experience = record.experience.len(),
            skills = record.skills.len(),
            "extracted profile"
        );

        Ok(record)
    }
}
