//! Search and sort for the student, parent and teacher directories.

use crate::{Parent, Student, Teacher};

pub trait Person {
    fn first_name(&self) -> &str;
    fn last_name(&self) -> &str;

    fn display_name(&self) -> String {
        format!("{} {}", self.first_name(), self.last_name())
    }

    /// Lower-cased text the directory search matches against
    fn search_text(&self) -> String {
        self.display_name().to_lowercase()
    }
}

impl Person for Student {
    fn first_name(&self) -> &str {
        &self.first_name
    }

    fn last_name(&self) -> &str {
        &self.last_name
    }
}

impl Person for Parent {
    fn first_name(&self) -> &str {
        &self.first_name
    }

    fn last_name(&self) -> &str {
        &self.last_name
    }

    fn search_text(&self) -> String {
        let mut text = self.display_name().to_lowercase();
        if let Some(email) = &self.email {
            text.push(' ');
            text.push_str(&email.to_lowercase());
        }
        if let Some(phone) = &self.phone {
            text.push(' ');
            text.push_str(phone);
        }
        text
    }
}

impl Person for Teacher {
    fn first_name(&self) -> &str {
        &self.first_name
    }

    fn last_name(&self) -> &str {
        &self.last_name
    }

    fn search_text(&self) -> String {
        let mut text = self.display_name().to_lowercase();
        for subject in &self.assigned_subjects {
            text.push(' ');
            text.push_str(&subject.subject_name.to_lowercase());
        }
        text
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Last name, then first name, A to Z
    #[default]
    LastNameAsc,
    LastNameDesc,
    FirstNameAsc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 3] = [SortOrder::LastNameAsc, SortOrder::LastNameDesc, SortOrder::FirstNameAsc];

    pub fn label(self) -> &'static str {
        match self {
            SortOrder::LastNameAsc => "Last name (A–Z)",
            SortOrder::LastNameDesc => "Last name (Z–A)",
            SortOrder::FirstNameAsc => "First name (A–Z)",
        }
    }
}

/// Case-insensitive substring filter followed by a stable sort
pub fn filter_and_sort<'a, P: Person>(people: &'a [P], query: &str, order: SortOrder) -> Vec<&'a P> {
    let query = query.trim().to_lowercase();
    let mut matches: Vec<&P> = people
        .iter()
        .filter(|person| query.is_empty() || person.search_text().contains(&query))
        .collect();

    let key = |person: &&P| {
        (
            person.last_name().to_lowercase(),
            person.first_name().to_lowercase(),
        )
    };
    match order {
        SortOrder::LastNameAsc => matches.sort_by_key(key),
        SortOrder::LastNameDesc => {
            matches.sort_by_key(key);
            matches.reverse();
        }
        SortOrder::FirstNameAsc => matches.sort_by_key(|person| {
            (
                person.first_name().to_lowercase(),
                person.last_name().to_lowercase(),
            )
        }),
    }
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parent(first: &str, last: &str, email: Option<&str>) -> Parent {
        Parent {
            id: format!("{}-{}", first, last),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.map(str::to_string),
            phone: None,
            student_ids: Vec::new(),
        }
    }

    fn parents() -> Vec<Parent> {
        vec![
            parent("Zora", "Babic", None),
            parent("ana", "Horvat", Some("ana.h@example.org")),
            parent("Marko", "babic", None),
        ]
    }

    #[test]
    fn test_sort_by_last_name_ignores_case() {
        let all = parents();
        let names: Vec<String> = filter_and_sort(&all, "", SortOrder::LastNameAsc)
            .iter()
            .map(|p| p.display_name())
            .collect();
        assert_eq!(names, vec!["Marko babic", "Zora Babic", "ana Horvat"]);
    }

    #[test]
    fn test_descending_and_first_name_orders() {
        let all = parents();
        let desc: Vec<&str> = filter_and_sort(&all, "", SortOrder::LastNameDesc)
            .iter()
            .map(|p| p.first_name.as_str())
            .collect();
        assert_eq!(desc, vec!["ana", "Zora", "Marko"]);

        let by_first: Vec<&str> = filter_and_sort(&all, "", SortOrder::FirstNameAsc)
            .iter()
            .map(|p| p.first_name.as_str())
            .collect();
        assert_eq!(by_first, vec!["ana", "Marko", "Zora"]);
    }

    #[test]
    fn test_filter_matches_email() {
        let all = parents();
        let found = filter_and_sort(&all, " EXAMPLE.org", SortOrder::default());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].last_name, "Horvat");

        assert!(filter_and_sort(&all, "nobody", SortOrder::default()).is_empty());
    }
}
