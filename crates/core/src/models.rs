//! Search modes and the payload types exchanged with the backend.
//!
//! Field names follow the backend's JSON exactly (`synopsisUrl`, `Distance`,
//! `courseString`) so cached entries keep the wire shape.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Which index a search runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Title,
    Professor,
    Code,
}

impl SearchMode {
    pub const ALL: [SearchMode; 3] = [SearchMode::Title, SearchMode::Professor, SearchMode::Code];

    pub fn as_str(self) -> &'static str {
        match self {
            SearchMode::Title => "title",
            SearchMode::Professor => "professor",
            SearchMode::Code => "code",
        }
    }

    /// Hint shown in an empty search box.
    pub fn placeholder(self) -> &'static str {
        match self {
            SearchMode::Title => "Enter course title (e.g., Calculus)",
            SearchMode::Professor => "Enter professor last name (e.g., Smith)",
            SearchMode::Code => "Enter last 3 digits of course code (e.g., 101)",
        }
    }

    /// Backend path this mode posts to.
    pub fn endpoint(self) -> &'static str {
        match self {
            SearchMode::Title => "/search_by_title",
            SearchMode::Professor => "/search_by_professor",
            SearchMode::Code => "/search_by_code",
        }
    }

    /// Title and code searches answer with a `courses` array.
    pub fn returns_courses(self) -> bool {
        matches!(self, SearchMode::Title | SearchMode::Code)
    }

    /// Parse a mode name, falling back to [`SearchMode::Title`] for anything unknown.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "title" => SearchMode::Title,
            "professor" => SearchMode::Professor,
            "code" => SearchMode::Code,
            other => {
                tracing::debug!(mode = other, "unrecognized search mode, using title");
                SearchMode::Title
            }
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Treat JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A course returned by title or code search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub course_number: String,
    #[serde(rename = "synopsisUrl", default, skip_serializing_if = "Option::is_none")]
    pub synopsis_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub prerequisites: String,
    /// Grouped per section; rendered flattened in the order received.
    #[serde(default, deserialize_with = "null_as_default")]
    pub instructors: Vec<Vec<Instructor>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub equivalencies: Vec<Equivalency>,
}

impl Course {
    /// Catalog link, if the backend supplied a non-blank one.
    pub fn catalog_url(&self) -> Option<&str> {
        self.synopsis_url.as_deref().filter(|url| !url.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instructor {
    pub name: String,
}

/// A community college course accepted in place of a catalog course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equivalency {
    pub community_college: String,
    #[serde(rename = "Distance", default)]
    pub distance: Distance,
    pub code: String,
    pub name: String,
}

/// Distance to a college in miles. The backend sends either a number or text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Distance {
    Miles(serde_json::Number),
    Text(String),
}

impl Default for Distance {
    fn default() -> Self {
        Distance::Text(String::new())
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Miles(n) => write!(f, "{n}"),
            Distance::Text(s) => f.write_str(s),
        }
    }
}

/// A professor and the courses they teach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfessorMatch {
    pub professor: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub courses: Vec<ProfessorCourse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfessorCourse {
    #[serde(rename = "courseString", default, deserialize_with = "null_as_default")]
    pub course_string: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
}

/// Alternative search terms offered when a professor name has no match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestions {
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    pub suggestions: Vec<String>,
}

/// Last known position, persisted so the user is not prompted on every start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub latitude: f64,
    pub longitude: f64,
    /// Epoch milliseconds at capture time.
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_endpoints() {
        assert_eq!(SearchMode::Title.endpoint(), "/search_by_title");
        assert_eq!(SearchMode::Professor.endpoint(), "/search_by_professor");
        assert_eq!(SearchMode::Code.endpoint(), "/search_by_code");
    }

    #[test]
    fn test_mode_from_name_is_lenient() {
        assert_eq!(SearchMode::from_name("Professor"), SearchMode::Professor);
        assert_eq!(SearchMode::from_name(" code "), SearchMode::Code);
        assert_eq!(SearchMode::from_name("department"), SearchMode::Title);
        assert_eq!(SearchMode::from_name(""), SearchMode::Title);
    }

    #[test]
    fn test_mode_placeholders() {
        assert!(SearchMode::Professor.placeholder().contains("Smith"));
        assert!(SearchMode::Code.placeholder().contains("101"));
    }

    #[test]
    fn test_course_deserialize_full() {
        let json = r#"{
            "title": "Calculus I",
            "course_number": "MATH 150",
            "synopsisUrl": "https://catalog.example.edu/math150",
            "prerequisites": "MATH 120",
            "instructors": [[{"name": "Smith"}], [{"name": "Lee"}, {"name": "Smith"}]],
            "equivalencies": [
                {"community_college": "Valley CC", "Distance": 12.5, "code": "MATH 1A", "name": "Calculus"}
            ]
        }"#;
        let course: Course = serde_json::from_str(json).unwrap();
        assert_eq!(course.catalog_url(), Some("https://catalog.example.edu/math150"));
        assert_eq!(course.instructors.len(), 2);
        assert_eq!(course.equivalencies[0].distance.to_string(), "12.5");
    }

    #[test]
    fn test_course_deserialize_nulls_and_missing() {
        let json = r#"{"title": "Intro", "course_number": "CS101", "synopsisUrl": "  ", "prerequisites": null}"#;
        let course: Course = serde_json::from_str(json).unwrap();
        assert_eq!(course.catalog_url(), None);
        assert_eq!(course.prerequisites, "");
        assert!(course.instructors.is_empty());
        assert!(course.equivalencies.is_empty());
    }

    #[test]
    fn test_null_titles_and_codes_read_as_empty() {
        let course: Course = serde_json::from_str(r#"{"title": null, "course_number": null}"#).unwrap();
        assert_eq!(course.title, "");
        assert_eq!(course.course_number, "");

        let m: ProfessorMatch =
            serde_json::from_str(r#"{"professor": "Lee", "courses": [{"courseString": null, "title": null}]}"#).unwrap();
        assert_eq!(m.courses[0].course_string, "");
        assert_eq!(m.courses[0].title, "");

        let m: ProfessorMatch = serde_json::from_str(r#"{"professor": "Lee", "courses": null}"#).unwrap();
        assert!(m.courses.is_empty());
    }

    #[test]
    fn test_course_keeps_wire_field_names() {
        let course = Course {
            title: "Intro".into(),
            course_number: "CS101".into(),
            synopsis_url: Some("https://x".into()),
            prerequisites: "None".into(),
            instructors: vec![],
            equivalencies: vec![Equivalency {
                community_college: "Valley CC".into(),
                distance: Distance::Text("7".into()),
                code: "CS 1".into(),
                name: "Intro".into(),
            }],
        };
        let value = serde_json::to_value(&course).unwrap();
        assert!(value.get("synopsisUrl").is_some());
        assert_eq!(value["equivalencies"][0]["Distance"], "7");
    }

    #[test]
    fn test_professor_match_deserialize() {
        let json = r#"{"professor": "Smith", "courses": [{"courseString": "MATH 150", "title": "Calculus I"}]}"#;
        let m: ProfessorMatch = serde_json::from_str(json).unwrap();
        assert_eq!(m.courses[0].course_string, "MATH 150");
    }
}
