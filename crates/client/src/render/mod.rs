//! Pure conversion from validated search results to views.
//!
//! Nothing here performs I/O. A [`View`] describes what a surface should show;
//! how it is drawn (terminal, HTML) is up to the surface.

mod text;

use coursefind_core::{Course, ProfessorMatch, Suggestions};

use crate::api::SearchPayload;

pub const EMPTY_TERM_MESSAGE: &str = "Please enter a search term.";
pub const SEARCH_FAILED_MESSAGE: &str = "An error occurred while searching. Please try again.";
pub const NO_COURSES_MESSAGE: &str = "No courses found matching your search.";
pub const NO_PROFESSORS_MESSAGE: &str = "No professors found matching your search.";
pub const PROFESSOR_WITHOUT_COURSES: &str = "No courses found for this professor.";

/// Everything a search can put on screen.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Courses(Vec<CourseCard>),
    Professors(Vec<ProfessorCard>),
    Suggestions(SuggestionList),
    NoResults(String),
    Error(String),
}

/// One course, with its sections in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseCard {
    pub title: String,
    pub course_number: String,
    pub details: DetailsLink,
    pub sections: Vec<Section>,
}

impl CourseCard {
    pub fn prerequisites(&self) -> Option<&str> {
        self.sections.iter().find_map(|s| match s {
            Section::Prerequisites(text) => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn has_equivalencies(&self) -> bool {
        self.sections.iter().any(|s| matches!(s, Section::Equivalencies(_)))
    }
}

/// Link to the external catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailsLink {
    Catalog(String),
    /// Shown greyed out and not clickable.
    Unavailable,
}

impl DetailsLink {
    pub fn label(&self) -> &'static str {
        match self {
            DetailsLink::Catalog(_) => "Course Details",
            DetailsLink::Unavailable => "Details Not Available",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    Professors(Vec<String>),
    Prerequisites(String),
    Equivalencies(Vec<EquivalencyLine>),
}

impl Section {
    pub fn title(&self) -> &'static str {
        match self {
            Section::Professors(_) => "Professors",
            Section::Prerequisites(_) => "Prerequisites",
            Section::Equivalencies(_) => "Community College Equivalencies",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EquivalencyLine {
    pub college: String,
    /// `"<Distance> miles"`
    pub distance: String,
    /// `"<code> <name>"`
    pub course: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfessorCard {
    pub professor: String,
    /// `"<courseString> - <title>"` per course.
    pub lines: Vec<String>,
}

/// Alternative search terms; choosing one re-runs a professor search.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionList {
    pub message: String,
    pub suggestions: Vec<String>,
}

/// Render a validated payload.
pub fn render(data: &SearchPayload) -> View {
    match data {
        SearchPayload::Courses(courses) => render_courses(courses),
        SearchPayload::Matches(matches) => render_professors(matches),
        SearchPayload::Suggestions(suggestions) => render_suggestions(suggestions),
    }
}

pub fn render_courses(courses: &[Course]) -> View {
    if courses.is_empty() {
        return View::NoResults(NO_COURSES_MESSAGE.to_string());
    }
    View::Courses(courses.iter().map(course_card).collect())
}

pub fn render_professors(matches: &[ProfessorMatch]) -> View {
    if matches.is_empty() {
        return View::NoResults(NO_PROFESSORS_MESSAGE.to_string());
    }
    View::Professors(matches.iter().map(professor_card).collect())
}

pub fn render_suggestions(suggestions: &Suggestions) -> View {
    View::Suggestions(SuggestionList {
        message: suggestions.message.clone(),
        suggestions: suggestions.suggestions.clone(),
    })
}

fn course_card(course: &Course) -> CourseCard {
    let details = match course.catalog_url() {
        Some(url) => DetailsLink::Catalog(url.to_string()),
        None => DetailsLink::Unavailable,
    };

    let mut sections = Vec::with_capacity(3);

    if !course.instructors.is_empty() {
        let names = course
            .instructors
            .iter()
            .flatten()
            .map(|instructor| instructor.name.clone())
            .collect();
        sections.push(Section::Professors(names));
    }

    sections.push(Section::Prerequisites(course.prerequisites.clone()));

    if !course.equivalencies.is_empty() {
        let lines = course
            .equivalencies
            .iter()
            .map(|eq| EquivalencyLine {
                college: eq.community_college.clone(),
                distance: format!("{} miles", eq.distance),
                course: format!("{} {}", eq.code, eq.name),
            })
            .collect();
        sections.push(Section::Equivalencies(lines));
    }

    CourseCard { title: course.title.clone(), course_number: course.course_number.clone(), details, sections }
}

fn professor_card(m: &ProfessorMatch) -> ProfessorCard {
    let lines = if m.courses.is_empty() {
        vec![PROFESSOR_WITHOUT_COURSES.to_string()]
    } else {
        m.courses
            .iter()
            .map(|c| format!("{} - {}", c.course_string, c.title))
            .collect()
    };
    ProfessorCard { professor: m.professor.clone(), lines }
}
