//! Catalog query engine

use dpo_common::Course;

/// Sentinel category that matches every course.
pub const ALL_CATEGORIES: &str = "all";

/// Filter the catalog by free-text search and category.
///
/// A course passes when the search text is empty or is a case-insensitive
/// substring of its title or description, and the category is the
/// [`ALL_CATEGORIES`] sentinel or equals the course category exactly.
/// The relative order of `courses` is preserved; no sorting is applied.
/// Pure function, safe to call on every keystroke.
pub fn filter_courses(courses: &[Course], search_text: &str, category: &str) -> Vec<Course> {
    courses
        .iter()
        .filter(|course| {
            let matches_search = search_text.is_empty()
                || contains_ignore_case(&course.title, search_text)
                || contains_ignore_case(&course.description, search_text);

            let matches_category = category == ALL_CATEGORIES || course.category == category;

            matches_search && matches_category
        })
        .cloned()
        .collect()
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
