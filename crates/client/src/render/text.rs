//! Plain-text layout of views for terminals and logs.

use std::fmt;

use super::{CourseCard, DetailsLink, ProfessorCard, Section, SuggestionList, View};

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Courses(cards) => write_blocks(f, cards),
            View::Professors(cards) => write_blocks(f, cards),
            View::Suggestions(list) => fmt::Display::fmt(list, f),
            View::NoResults(message) | View::Error(message) => writeln!(f, "{message}"),
        }
    }
}

fn write_blocks<T: fmt::Display>(f: &mut fmt::Formatter<'_>, blocks: &[T]) -> fmt::Result {
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            writeln!(f)?;
        }
        fmt::Display::fmt(block, f)?;
    }
    Ok(())
}

impl fmt::Display for CourseCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}  {}", self.title, self.course_number)?;
        match &self.details {
            DetailsLink::Catalog(url) => writeln!(f, "  {}: {url}", self.details.label())?,
            DetailsLink::Unavailable => writeln!(f, "  ({})", self.details.label())?,
        }
        for section in &self.sections {
            match section {
                Section::Prerequisites(text) => writeln!(f, "  {}: {text}", section.title())?,
                Section::Professors(names) => {
                    writeln!(f, "  {}:", section.title())?;
                    for name in names {
                        writeln!(f, "    - {name}")?;
                    }
                }
                Section::Equivalencies(lines) => {
                    writeln!(f, "  {}:", section.title())?;
                    for line in lines {
                        writeln!(f, "    - {} ({}) {}", line.college, line.distance, line.course)?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for ProfessorCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.professor)?;
        for line in &self.lines {
            writeln!(f, "  {line}")?;
        }
        Ok(())
    }
}

impl fmt::Display for SuggestionList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.message)?;
        for (i, suggestion) in self.suggestions.iter().enumerate() {
            writeln!(f, "  [{}] {suggestion}", i + 1)?;
        }
        Ok(())
    }
}
