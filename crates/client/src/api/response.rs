//! Backend response types and normalization.

use coursefind_core::{Course, Error, ProfessorMatch, Suggestions};
use serde::Deserialize;
use serde_json::Value;

/// Raw response from `/search_by_title` and `/search_by_code`.
#[derive(Debug, Deserialize)]
pub struct CourseSearchResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub courses: Option<Vec<Course>>,
}

/// Raw response from `/search_by_professor`.
///
/// Results stay untyped until the suggestion shape has been ruled out.
#[derive(Debug, Deserialize)]
pub struct ProfessorSearchResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub results: Option<Vec<Value>>,
}

/// Raw response from `/ask_question`.
#[derive(Debug, Clone, Deserialize)]
pub struct AskResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub relevant_courses: Option<Vec<Value>>,
}

impl AskResponse {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }
}

/// Validated search results, shaped by the mode that produced them.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPayload {
    /// Title or code search results. May be empty.
    Courses(Vec<Course>),
    /// Professor search results. May be empty.
    Matches(Vec<ProfessorMatch>),
    /// Professor search found no match and offers alternative terms instead.
    Suggestions(Suggestions),
}

impl SearchPayload {
    /// Suggestions are a prompt, not results, and are never cached.
    pub fn is_cacheable(&self) -> bool {
        !matches!(self, SearchPayload::Suggestions(_))
    }
}

fn server_error(status: Option<&str>, message: Option<String>) -> Option<Error> {
    (status == Some("error")).then(|| Error::Server(message.unwrap_or_else(|| "Unknown error".to_string())))
}

impl CourseSearchResponse {
    /// Validate into a payload, surfacing `status: "error"` as [`Error::Server`].
    pub fn into_payload(self) -> Result<SearchPayload, Error> {
        if let Some(err) = server_error(self.status.as_deref(), self.message) {
            return Err(err);
        }
        Ok(SearchPayload::Courses(self.courses.unwrap_or_default()))
    }
}

impl ProfessorSearchResponse {
    /// Validate into a payload, surfacing `status: "error"` as [`Error::Server`].
    pub fn into_payload(self) -> Result<SearchPayload, Error> {
        if let Some(err) = server_error(self.status.as_deref(), self.message) {
            return Err(err);
        }
        Ok(classify_professor_results(self.results.unwrap_or_default()))
    }
}

/// Split professor results into a suggestion prompt or a list of matches.
///
/// Only the first element is checked for the suggestion shape. Entries that
/// are not a `{professor, courses}` match are skipped.
pub fn classify_professor_results(results: Vec<Value>) -> SearchPayload {
    if let Some(first) = results.first()
        && first.get("suggestions").is_some_and(Value::is_array)
    {
        return match Suggestions::deserialize(first) {
            Ok(suggestions) => SearchPayload::Suggestions(suggestions),
            Err(e) => {
                tracing::debug!("malformed suggestion payload: {}", e);
                SearchPayload::Matches(Vec::new())
            }
        };
    }

    let matches = results
        .into_iter()
        .filter_map(|value| serde_json::from_value::<ProfessorMatch>(value).ok())
        .collect();
    SearchPayload::Matches(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_course_response_success() {
        let raw: CourseSearchResponse = serde_json::from_value(json!({
            "status": "success",
            "courses": [{"title": "Intro", "course_number": "CS101", "prerequisites": "None",
                         "instructors": [], "equivalencies": []}]
        }))
        .unwrap();
        match raw.into_payload().unwrap() {
            SearchPayload::Courses(courses) => assert_eq!(courses[0].course_number, "CS101"),
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn test_course_response_missing_courses_is_empty() {
        let raw: CourseSearchResponse =
            serde_json::from_value(json!({"status": "success", "message": "No results found", "results": []}))
                .unwrap();
        assert_eq!(raw.into_payload().unwrap(), SearchPayload::Courses(vec![]));
    }

    #[test]
    fn test_course_response_server_error() {
        let raw: CourseSearchResponse =
            serde_json::from_value(json!({"status": "error", "message": "Location not set"})).unwrap();
        let err = raw.into_payload().unwrap_err();
        assert!(matches!(err, Error::Server(msg) if msg == "Location not set"));
    }

    #[test]
    fn test_professor_suggestions_detected() {
        let payload = classify_professor_results(vec![json!({
            "message": "No exact match. Did you mean:",
            "suggestions": ["Calculus", "Smithson"]
        })]);
        match payload {
            SearchPayload::Suggestions(s) => {
                assert_eq!(s.suggestions, vec!["Calculus", "Smithson"]);
                assert!(!SearchPayload::Suggestions(s).is_cacheable());
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn test_professor_matches_skip_unknown_entries() {
        let payload = classify_professor_results(vec![
            json!({"professor": "Smith", "courses": [{"courseString": "MATH 150", "title": "Calculus I"}]}),
            json!({"unexpected": true}),
            json!({"professor": "Lee", "courses": []}),
        ]);
        match payload {
            SearchPayload::Matches(matches) => {
                assert_eq!(matches.len(), 2);
                assert_eq!(matches[1].professor, "Lee");
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn test_suggestions_only_checked_on_first_result() {
        let payload = classify_professor_results(vec![
            json!({"professor": "Smith", "courses": []}),
            json!({"message": "x", "suggestions": ["A"]}),
        ]);
        assert!(matches!(payload, SearchPayload::Matches(m) if m.len() == 1));
    }

    #[test]
    fn test_malformed_suggestions_yield_no_matches() {
        let payload = classify_professor_results(vec![
            json!({"suggestions": [1, 2]}),
            json!({"professor": "Smith", "courses": []}),
        ]);
        assert_eq!(payload, SearchPayload::Matches(vec![]));
    }

    #[test]
    fn test_course_with_null_title_keeps_other_courses() {
        let raw: CourseSearchResponse = serde_json::from_value(json!({
            "status": "success",
            "courses": [
                {"title": "Intro", "course_number": "CS101", "prerequisites": "None"},
                {"title": null, "course_number": null, "prerequisites": "CS101"}
            ]
        }))
        .unwrap();
        let SearchPayload::Courses(courses) = raw.into_payload().unwrap() else {
            panic!("expected courses");
        };
        assert_eq!(courses.len(), 2);
        assert_eq!(courses[0].title, "Intro");
        assert_eq!(courses[1].title, "");
        assert_eq!(courses[1].course_number, "");
    }

    #[test]
    fn test_ask_response() {
        let raw: AskResponse = serde_json::from_value(json!({"status": "success", "answer": "Yes"})).unwrap();
        assert!(raw.is_success());
        assert!(raw.relevant_courses.is_none());
    }
}
