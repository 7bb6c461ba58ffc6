use askama::Template;

use crate::search::{SimilarityOutcome, VerseMatch};

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate<'a> {
    pub user_input: &'a str,
    pub submitted: bool,
    pub matches: &'a [VerseMatch],
    pub error: &'a str,
}

impl<'a> IndexTemplate<'a> {
    /// Empty form, shown before anything is submitted
    pub fn blank() -> Self {
        Self {
            user_input: "",
            submitted: false,
            matches: &[],
            error: "",
        }
    }

    pub fn with_outcome(user_input: &'a str, outcome: &'a SimilarityOutcome) -> Self {
        let (matches, error): (&[VerseMatch], &str) = match outcome {
            SimilarityOutcome::Matches(matches) => (matches.as_slice(), ""),
            SimilarityOutcome::Failed(message) => (&[], message.as_str()),
        };
        Self {
            user_input,
            submitted: true,
            matches,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_outcome_renders_error_message() {
        let outcome = SimilarityOutcome::Failed("Corpus contains no verses".to_string());
        let html = IndexTemplate::with_outcome("light", &outcome).render().unwrap();

        assert!(html.contains(r#"<p class="error">Corpus contains no verses</p>"#));
        assert!(!html.contains("<ol class=\"results\">"));
        assert!(html.contains(">light</textarea>"));
    }

    #[test]
    fn matches_render_as_list() {
        let outcome = SimilarityOutcome::Matches(vec![VerseMatch {
            reference: "Genesis 1:3".to_string(),
            text: "And God said, Let there be light".to_string(),
        }]);
        let html = IndexTemplate::with_outcome("light", &outcome).render().unwrap();

        assert!(html.contains("<ol class=\"results\">"));
        assert!(html.contains("Genesis 1:3"));
        assert!(!html.contains("class=\"error\""));
    }
}
