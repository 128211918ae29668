use std::fmt;

/// Named document collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Classes,
    Grades,
    Attendance,
    Conversations,
    Messages,
    Events,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Classes => "classes",
            Collection::Grades => "grades",
            Collection::Attendance => "attendance",
            Collection::Conversations => "conversations",
            Collection::Messages => "messages",
            Collection::Events => "events",
        }
    }

    /// Top-level string fields that must be unique (case-insensitively)
    /// within the collection. Must match the unique indexes in `migrations/`.
    pub fn unique_fields(&self) -> &'static [&'static str] {
        match self {
            Collection::Users => &["email"],
            _ => &[],
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
