//! Resolved conversation handle.

use serde::{Deserialize, Serialize};

/// A resolved source or destination (channel, group or user).
///
/// Only identity and display data live here; clients keep whatever backend object they need
/// to address the conversation, keyed by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: i64,
    /// Title for channels and groups, first name for users.
    pub title: Option<String>,
    pub username: Option<String>,
}

impl Conversation {
    pub fn new(id: i64, title: Option<String>, username: Option<String>) -> Self {
        Self {
            id,
            title: title.filter(|t| !t.is_empty()),
            username: username.filter(|u| !u.is_empty()),
        }
    }

    /// Title, else username, else the numeric id.
    pub fn display_name(&self) -> String {
        self.title
            .clone()
            .or_else(|| self.username.clone())
            .unwrap_or_else(|| self.id.to_string())
    }

    /// One line of the dialog listing, e.g. `  3. News  (id=1001, @news)`.
    pub fn listing_line(&self, index: usize) -> String {
        let handle = self
            .username
            .as_ref()
            .map(|u| format!(", @{}", u))
            .unwrap_or_default();
        format!("{:3}. {}  (id={}{})", index, self.display_name(), self.id, handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_fallbacks() {
        let titled = Conversation::new(1, Some("News".into()), Some("news".into()));
        assert_eq!(titled.display_name(), "News");

        let handle_only = Conversation::new(2, Some(String::new()), Some("alice".into()));
        assert_eq!(handle_only.display_name(), "alice");

        let bare = Conversation::new(3, None, None);
        assert_eq!(bare.display_name(), "3");
    }

    #[test]
    fn test_listing_line() {
        let conv = Conversation::new(1001, Some("News".into()), Some("news".into()));
        assert_eq!(conv.listing_line(3), "  3. News  (id=1001, @news)");

        let no_handle = Conversation::new(42, Some("Family".into()), None);
        assert_eq!(no_handle.listing_line(12), " 12. Family  (id=42)");
    }
}
