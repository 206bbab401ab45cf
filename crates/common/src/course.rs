//! Course catalog records

use serde::{Deserialize, Serialize};

/// A course in the catalog.
///
/// Immutable once loaded; identity is the `id` field. Records are created by
/// the catalog store (remote read or embedded fallback) and only ever
/// replaced wholesale on reload, never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Unique course identifier (remote document id or fallback id)
    pub id: String,

    /// Course title
    pub title: String,

    /// Full course description
    pub description: String,

    /// Category label, matched exactly by the catalog filter
    pub category: String,

    /// Human-readable duration label, e.g. "3 месяца"
    pub duration: String,

    /// Price in rubles
    pub price: f64,

    /// Instructor name
    pub instructor: String,

    /// Total hour count
    pub hours: u32,

    /// Ordered syllabus topics
    pub syllabus: Vec<String>,

    /// Ordered entry requirements
    pub requirements: Vec<String>,

    /// Contact email for the course
    pub contact_email: String,
}

impl Course {
    /// Price formatted for display, e.g. "15000 ₽"
    pub fn formatted_price(&self) -> String {
        format!("{:.0} ₽", self.price)
    }
}
