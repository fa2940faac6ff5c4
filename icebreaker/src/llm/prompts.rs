//! Prompt templates for template filling.
//!
//! The model's only job is substituting `[BRACKETED]` placeholders, so both
//! prompts repeat the preservation rules aggressively. Absent profile fields
//! render as "Not provided" rather than being omitted, keeping the prompt
//! shape stable.

use crate::models::{EducationEntry, ExperienceEntry, ProfileRecord, SenderProfile};

const SYSTEM_PROMPT_RULES: &str = r#"You are a template filling assistant. Your ONLY job is to replace text inside [BRACKETS] with real information.

CRITICAL RULES - FOLLOW EXACTLY:
1. ONLY replace text that is inside [BRACKETS] like [COMPANY] or [AREAS_OF_INTEREST]
2. Keep EVERYTHING else EXACTLY as written - word for word, character for character
3. Do NOT add any new sentences, paragraphs, or content
4. Do NOT remove any sentences, paragraphs, or content
5. Do NOT rewrite or paraphrase ANY text outside of [BRACKETS]
6. Do NOT change the greeting, closing, line breaks, or formatting
7. Keep the closing signature exactly as written"#;

/// System prompt for the fill operation. The sender-aware variant warns the
/// model that a second profile is present for context only.
pub fn fill_system_prompt(has_sender: bool) -> String {
    if has_sender {
        format!(
            r#"{SYSTEM_PROMPT_RULES}

EXAMPLE:
Template: "Hi, I saw your work at [COMPANY] in [AREAS_OF_INTEREST].\n\nBest regards,\nSam"
Target: Works at Google, interested in AI
CORRECT OUTPUT: "Hi, I saw your work at Google in AI.\n\nBest regards,\nSam"
WRONG OUTPUT: "Hello! I was impressed by your work at Google in AI and ML..."

You will receive:
- TARGET person's profile (their company, interests, etc.)
- YOUR profile (for context only - do not add info from here unless template asks)
- TEMPLATE (the exact format to preserve)

Output ONLY the template with [BRACKETS] filled in. Nothing more, nothing less."#
        )
    } else {
        format!(
            r#"{SYSTEM_PROMPT_RULES}

Output ONLY the template with [BRACKETS] filled in. Nothing more, nothing less."#
        )
    }
}

/// User prompt carrying the target profile, the optional sender profile, and
/// the template to fill.
pub fn fill_user_prompt(
    target: &ProfileRecord,
    sender: Option<&SenderProfile>,
    template: &str,
) -> String {
    let target_block = format!(
        r#"Name: {name}
Headline: {headline}
Company: {company}
Location: {location}

About:
{about}

Experience:
{experience}

Education:
{education}

Skills:
{skills}"#,
        name = target.name,
        headline = or_not_provided(&target.headline),
        company = or_not_provided(&target.company),
        location = or_not_provided(&target.location),
        about = or_not_provided(&target.about),
        experience = experience_block(&target.experience),
        education = education_block(&target.education),
        skills = join_or_not_provided(&target.skills),
    );

    match sender {
        Some(sender) => format!(
            r#"=== TARGET PERSON'S PROFILE (who you're contacting) ===

{target_block}

=== YOUR PROFILE (the sender) ===

Name: {sender_name}
Current Role: {current_role}
Status: {status}
Looking For: {looking_for}

Education: {sender_education}

Top Skills: {top_skills}

Key Projects:
{key_projects}

Recent Experience:
{recent_experience}

What You Bring:
{value_props}

=== TEMPLATE TO FILL IN (KEEP EXACT STRUCTURE) ===

{template}

=== YOUR TASK ===

Replace ONLY the text inside [BRACKETS] in the template above:
- [COMPANY] -> Replace with their actual company name from TARGET's profile
- [AREAS_OF_INTEREST] -> Replace with specific areas from TARGET's profile (e.g., "AI and machine learning", "product development")
- Any other [PLACEHOLDER] -> Fill with relevant info from TARGET's profile

CRITICAL RULES:
- Do NOT change ANY text outside of [BRACKETS]
- Do NOT add new sentences or paragraphs
- Do NOT remove any sentences or paragraphs
- Do NOT rewrite or paraphrase anything
- Keep the closing signature exactly as is
- Keep all line breaks, punctuation, and formatting exactly as provided

Output the template with ONLY [BRACKETS] replaced. Everything else must remain identical."#,
            sender_name = or_not_provided(&sender.name),
            current_role = or_not_provided(&sender.current_role),
            status = or_not_provided(&sender.status),
            looking_for = or_not_provided(&sender.looking_for),
            sender_education = or_not_provided(&sender.education),
            top_skills = join_or_not_provided(&sender.top_skills),
            key_projects = bullets_or_not_provided(&sender.key_projects),
            recent_experience = bullets_or_not_provided(&sender.recent_experience),
            value_props = bullets_or_not_provided(&sender.value_props),
        ),
        None => format!(
            r#"Here is the profile data:

{target_block}

---

Here is the template to customize:

{template}

---

Now, fill in ONLY the [BRACKETS] in the template above using information from the profile data. Keep everything else EXACTLY the same."#
        ),
    }
}

fn or_not_provided(value: &str) -> &str {
    if value.trim().is_empty() {
        "Not provided"
    } else {
        value
    }
}

fn join_or_not_provided(items: &[String]) -> String {
    if items.is_empty() {
        "Not provided".to_string()
    } else {
        items.join(", ")
    }
}

fn bullets_or_not_provided(items: &[String]) -> String {
    if items.is_empty() {
        "Not provided".to_string()
    } else {
        items
            .iter()
            .map(|item| format!("- {item}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn experience_block(entries: &[ExperienceEntry]) -> String {
    if entries.is_empty() {
        return "Not provided".to_string();
    }
    entries
        .iter()
        .map(|exp| {
            format!(
                "- {} at {} ({})\n  {}",
                exp.title, exp.company, exp.duration, exp.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn education_block(entries: &[EducationEntry]) -> String {
    if entries.is_empty() {
        return "Not provided".to_string();
    }
    entries
        .iter()
        .map(|edu| {
            let field = if edu.field.is_empty() {
                String::new()
            } else {
                format!("in {} ", edu.field)
            };
            format!(
                "- {} {}from {} ({})",
                edu.degree, field, edu.school, edu.duration
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExperienceEntry;

    fn target() -> ProfileRecord {
        ProfileRecord {
            name: "Alice Example".to_string(),
            headline: "Engineer at Acme".to_string(),
            company: "Acme".to_string(),
            skills: vec!["Rust".to_string(), "Distributed systems".to_string()],
            experience: vec![ExperienceEntry {
                title: "Engineer".to_string(),
                company: "Acme".to_string(),
                duration: "2021 - Present".to_string(),
                description: "Built the platform".to_string(),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn system_prompt_mentions_sender_context_only_when_present() {
        let with_sender = fill_system_prompt(true);
        let without = fill_system_prompt(false);
        assert!(with_sender.contains("YOUR profile"));
        assert!(!without.contains("YOUR profile"));
        assert!(with_sender.contains("closing signature"));
        assert!(without.contains("closing signature"));
    }

    #[test]
    fn user_prompt_includes_target_fields() {
        let prompt = fill_user_prompt(&target(), None, "Hi [NAME], greetings from afar.");
        assert!(prompt.contains("Alice Example"));
        assert!(prompt.contains("Rust, Distributed systems"));
        assert!(prompt.contains("- Engineer at Acme (2021 - Present)"));
        assert!(prompt.contains("Hi [NAME], greetings from afar."));
    }

    #[test]
    fn missing_fields_render_as_not_provided() {
        let prompt = fill_user_prompt(&target(), None, "template body here");
        assert!(prompt.contains("Location: Not provided"));
        assert!(prompt.contains("About:\nNot provided"));
        assert!(prompt.contains("Education:\nNot provided"));
    }

    #[test]
    fn sender_section_present_only_with_sender() {
        let sender = SenderProfile {
            name: "Sam Sender".to_string(),
            top_skills: vec!["Rust".to_string()],
            value_props: vec!["ships fast".to_string()],
            ..Default::default()
        };

        let with_sender = fill_user_prompt(&target(), Some(&sender), "template");
        assert!(with_sender.contains("=== YOUR PROFILE (the sender) ==="));
        assert!(with_sender.contains("Sam Sender"));
        assert!(with_sender.contains("- ships fast"));

        let without = fill_user_prompt(&target(), None, "template");
        assert!(!without.contains("YOUR PROFILE"));
    }
}
