use std::cell::Cell;

use pretty_assertions::assert_eq;

use icebreaker::error::IcebreakerError;
use icebreaker::extract::{ProfileExtractor, SectionExpander};

fn page(body: &str) -> String {
    format!("<html><body><main class=\"scaffold-layout__main\">{body}</main></body></html>")
}

fn top_card(name: &str, headline: &str) -> String {
    format!(
        concat!(
            "<h1 class=\"text-heading-xlarge\">{}</h1>",
            "<div class=\"text-body-medium break-words\">{}</div>",
            "<span class=\"text-body-small inline t-black--light break-words\">Berlin, Germany</span>",
        ),
        name, headline
    )
}

fn experience_section(items: &str) -> String {
    format!(
        "<section><div id=\"experience\"></div><h2>Experience</h2><ul>{items}</ul></section>"
    )
}

fn experience_item(title: &str, company_caption: &str, duration: &str) -> String {
    format!(
        concat!(
            "<li><div class=\"t-bold\"><span aria-hidden=\"true\">{}</span></div>",
            "<span class=\"t-14 t-normal\"><span aria-hidden=\"true\">{}</span></span>",
            "<span class=\"t-14 t-normal t-black--light\"><span aria-hidden=\"true\">{}</span></span></li>",
        ),
        title, company_caption, duration
    )
}

#[test]
fn unrecognized_page_is_an_error() {
    let extractor = ProfileExtractor::new();
    let result = extractor.parse("<html><body><p>hello</p></body></html>");
    match result {
        Err(IcebreakerError::Extraction(msg)) => assert!(msg.contains("profile page")),
        other => panic!("expected extraction error, got {other:?}"),
    }
}

#[test]
fn missing_name_is_an_error() {
    let extractor = ProfileExtractor::new();
    let html = page("<div class=\"text-body-medium break-words\">Engineer at Acme Corp</div>");
    match extractor.parse(&html) {
        Err(IcebreakerError::Extraction(msg)) => assert!(msg.contains("profile name")),
        other => panic!("expected extraction error, got {other:?}"),
    }
}

#[test]
fn extracts_top_card_fields() {
    let extractor = ProfileExtractor::new();
    let html = page(&top_card("Alice Example", "Senior Engineer at Acme Corp"));
    let record = extractor.parse(&html).expect("parse");

    assert_eq!(record.name, "Alice Example");
    assert_eq!(record.headline, "Senior Engineer at Acme Corp");
    assert_eq!(record.location, "Berlin, Germany");
    assert_eq!(record.company, "Acme Corp");
}

#[test]
fn badge_company_beats_headline() {
    let extractor = ProfileExtractor::new();
    let body = format!(
        concat!(
            "{}",
            "<div class=\"pv-text-details__right-panel\">",
            "<span class=\"hoverable-link-text\">Fireworks AI</span></div>",
        ),
        top_card("Alice Example", "Senior Engineer at Acme Corp")
    );
    let record = extractor.parse(&page(&body)).expect("parse");
    assert_eq!(record.company, "Fireworks AI");
}

#[test]
fn badge_with_employment_metadata_falls_through_to_headline() {
    let extractor = ProfileExtractor::new();
    let body = format!(
        concat!(
            "{}",
            "<div class=\"pv-text-details__right-panel\">",
            "<span class=\"hoverable-link-text\">Full-time</span></div>",
        ),
        top_card("Alice Example", "Engineer at Acme Corp")
    );
    let record = extractor.parse(&page(&body)).expect("parse");
    assert_eq!(record.company, "Acme Corp");
}

#[test]
fn experience_entries_are_parsed_and_capped() {
    let extractor = ProfileExtractor::new();
    let items: String = (0..8)
        .map(|i| {
            experience_item(
                &format!("Role {i}"),
                "Acme Corp \u{b7} Full-time",
                "2021 - Present",
            )
        })
        .collect();
    let body = format!("{}{}", top_card("Alice Example", "Engineer"), experience_section(&items));
    let record = extractor.parse(&page(&body)).expect("parse");

    assert_eq!(record.experience.len(), 5);
    assert_eq!(record.experience[0].title, "Role 0");
    assert_eq!(record.experience[0].company, "Acme Corp");
    assert_eq!(record.experience[0].duration, "2021 - Present");
}

#[test]
fn company_falls_back_to_first_experience_entry() {
    let extractor = ProfileExtractor::new();
    let body = format!(
        "{}{}",
        top_card("Alice Example", "Engineer and mentor"),
        experience_section(&experience_item(
            "Engineer",
            "Initech \u{b7} Contract",
            "2020 - 2023"
        ))
    );
    let record = extractor.parse(&page(&body)).expect("parse");
    assert_eq!(record.company, "Initech");
}

#[test]
fn company_from_headline_strips_trailing_segments() {
    let extractor = ProfileExtractor::new();
    let html = page(&top_card(
        "Alice Example",
        "Building data pipelines at Streamhouse - views my own",
    ));
    let record = extractor.parse(&html).expect("parse");
    assert_eq!(record.company, "Streamhouse");
}

#[test]
fn education_degree_and_field_are_split() {
    let extractor = ProfileExtractor::new();
    let body = format!(
        concat!(
            "{}",
            "<section><div id=\"education\"></div><h2>Education</h2><ul>",
            "<li><div class=\"t-bold\"><span aria-hidden=\"true\">Tech University</span></div>",
            "<span class=\"t-14 t-normal\"><span aria-hidden=\"true\">BSc, Computer Science</span></span></li>",
            "</ul></section>",
        ),
        top_card("Alice Example", "Engineer at Acme Corp")
    );
    let record = extractor.parse(&page(&body)).expect("parse");

    assert_eq!(record.education.len(), 1);
    assert_eq!(record.education[0].school, "Tech University");
    assert_eq!(record.education[0].degree, "BSc");
    assert_eq!(record.education[0].field, "Computer Science");
}

#[test]
fn skills_are_collected_and_capped() {
    let extractor = ProfileExtractor::new();
    let skills: String = (0..25)
        .map(|i| {
            format!(
                "<div class=\"mr1 hoverable-link-text t-bold\"><span aria-hidden=\"true\">Skill {i}</span></div>"
            )
        })
        .collect();
    let body = format!(
        "{}<section><div id=\"skills\"></div><h2>Skills</h2>{skills}</section>",
        top_card("Alice Example", "Engineer at Acme Corp")
    );
    let record = extractor.parse(&page(&body)).expect("parse");

    assert_eq!(record.skills.len(), 20);
    assert_eq!(record.skills[0], "Skill 0");
}

#[test]
fn about_section_is_extracted() {
    let extractor = ProfileExtractor::new();
    let body = format!(
        concat!(
            "{}",
            "<section><div id=\"about\"></div><h2>About</h2>",
            "<div class=\"inline-show-more-text\">Engineer who enjoys distributed systems.</div>",
            "</section>",
        ),
        top_card("Alice Example", "Engineer at Acme Corp")
    );
    let record = extractor.parse(&page(&body)).expect("parse");
    assert_eq!(record.about, "Engineer who enjoys distributed systems.");
}

struct RecordingExpander {
    called: Cell<bool>,
}

impl RecordingExpander {
    fn new() -> Self {
        Self {
            called: Cell::new(false),
        }
    }
}

impl SectionExpander for RecordingExpander {
    fn expand(&self, _section_text: &str) -> Option<String> {
        self.called.set(true);
        Some("Full expanded about text.".to_string())
    }
}

#[test]
fn expander_is_consulted_for_truncated_about() {
    let extractor = ProfileExtractor::new();
    let body = format!(
        concat!(
            "{}",
            "<section><div id=\"about\"></div><h2>About</h2>",
            "<div class=\"inline-show-more-text\">Truncated about…</div>",
            "<button class=\"inline-show-more-text__button\">see more</button>",
            "</section>",
        ),
        top_card("Alice Example", "Engineer at Acme Corp")
    );
    let expander = RecordingExpander::new();
    let record = extractor
        .parse_with_expander(&page(&body), Some(&expander))
        .expect("parse");

    assert!(expander.called.get());
    assert_eq!(record.about, "Full expanded about text.");
}

#[test]
fn expander_is_skipped_inside_activity_section() {
    let extractor = ProfileExtractor::new();
    // The anchor marks this section as About, but its heading reveals an
    // activity feed; the see-more affordance must not be followed.
    let body = format!(
        concat!(
            "{}",
            "<section><div id=\"about\"></div><h2>Recent Activity</h2>",
            "<div class=\"inline-show-more-text\">Post preview…</div>",
            "<button class=\"inline-show-more-text__button\">see more</button>",
            "</section>",
        ),
        top_card("Alice Example", "Engineer at Acme Corp")
    );
    let expander = RecordingExpander::new();
    let record = extractor
        .parse_with_expander(&page(&body), Some(&expander))
        .expect("parse");

    assert!(!expander.called.get());
    assert_eq!(record.about, "Post preview…");
}

#[test]
fn no_expander_leaves_truncated_text() {
    let extractor = ProfileExtractor::new();
    let body = format!(
        concat!(
            "{}",
            "<section><div id=\"about\"></div><h2>About</h2>",
            "<div class=\"inline-show-more-text\">Truncated about…</div>",
            "<button class=\"inline-show-more-text__button\">see more</button>",
            "</section>",
        ),
        top_card("Alice Example", "Engineer at Acme Corp")
    );
    let record = extractor.parse(&page(&body)).expect("parse");
    assert_eq!(record.about, "Truncated about…");
}

#[test]
fn recommendations_are_truncated() {
    let extractor = ProfileExtractor::new();
    let long_text = "x".repeat(600);
    let body = format!(
        concat!(
            "{}",
            "<section><div id=\"recommendations\"></div><h2>Recommendations</h2><ul>",
            "<li><div class=\"inline-show-more-text\">{}</div>",
            "<div class=\"t-bold\">Bob Reviewer</div></li>",
            "</ul></section>",
        ),
        top_card("Alice Example", "Engineer at Acme Corp"),
        long_text
    );
    let record = extractor.parse(&page(&body)).expect("parse");

    assert_eq!(record.recommendations.len(), 1);
    assert_eq!(record.recommendations[0].text.chars().count(), 500);
    assert_eq!(record.recommendations[0].author, "Bob Reviewer");
}

#[test]
fn languages_and_interests_are_parsed() {
    let extractor = ProfileExtractor::new();
    let body = format!(
        concat!(
            "{}",
            "<section><div id=\"languages\"></div><h2>Languages</h2><ul>",
            "<li><div class=\"t-bold\"><span aria-hidden=\"true\">German</span></div>",
            "<span class=\"t-14\"><span aria-hidden=\"true\">Professional working proficiency</span></span></li>",
            "</ul></section>",
            "<section><div id=\"interests\"></div><h2>Interests</h2><ul>",
            "<li><div class=\"t-bold\"><span aria-hidden=\"true\">Open source</span></div></li>",
            "</ul></section>",
        ),
        top_card("Alice Example", "Engineer at Acme Corp")
    );
    let record = extractor.parse(&page(&body)).expect("parse");

    assert_eq!(record.languages.len(), 1);
    assert_eq!(record.languages[0].language, "German");
    assert_eq!(
        record.languages[0].proficiency,
        "Professional working proficiency"
    );
    assert_eq!(record.interests, vec!["Open source"]);
}
