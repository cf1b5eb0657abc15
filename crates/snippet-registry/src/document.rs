//! Document types and defaults.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Name given to documents on creation.
pub const DEFAULT_NAME: &str = "Untitled Document";

/// Name given to documents inserted by a peer handoff.
pub const RECEIVED_NAME: &str = "Received Document";

/// Unique identifier for a document, stable for the document's lifetime.
///
/// Ids are current-time-millisecond strings, matching the persisted layout;
/// the registry bumps the value on collision so rapid creation stays unique.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// A fresh timestamp-based id. Uniqueness against an existing set is the
    /// registry's job.
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        Self(millis.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named, ordered, persisted unit of rich-text content.
///
/// The body is a serialized rich-text markup string; the registry never
/// rewrites it beyond create and receive, only the editing surface does.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    pub id: DocumentId,
    pub name: String,
    pub content: String,
}

/// Persisted list entry: id, name and position only. Content lives under its
/// own per-document key.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: String,
    pub name: String,
}

impl From<&Document> for DocumentRecord {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id.0.clone(),
            name: doc.name.clone(),
        }
    }
}

/// Welcome body seeded into newly created documents.
pub fn initial_body() -> &'static str {
    INITIAL_BODY
}

const INITIAL_BODY: &str = "\
<h1>Welcome to snippet.today! \u{2728}</h1>\
<p>Your minimalist, privacy-focused open source writing companion that works entirely in your browser.</p>\
<h2>\u{1F3AF} Core Features</h2>\
<ul>\
<li><strong>Multiple Documents</strong> - Create, rename, and manage multiple documents from the sidebar</li>\
<li><strong>Auto-Save</strong> - Your work is automatically saved as you type</li>\
<li><strong>Word Counter</strong> - Real-time word and character count</li>\
<li><strong>Export Options</strong> - Save your work as markdown files</li>\
</ul>\
<h2>\u{1F916} AI Assistant</h2>\
<ul>\
<li><strong>Writing Help</strong> - Get suggestions to improve your writing</li>\
<li><strong>Grammar Check</strong> - Fix grammar and style issues</li>\
<li><strong>Content Ideas</strong> - Generate ideas and overcome writer's block</li>\
</ul>\
<h2>\u{1F512} Privacy First</h2>\
<ul>\
<li><strong>Local Storage</strong> - All data stays in your browser</li>\
<li><strong>No Account Needed</strong> - Start writing immediately</li>\
<li><strong>Your API Key</strong> - Use your own OpenAI key for AI features</li>\
</ul>\
<blockquote><p><strong>Pro Tip:</strong> All your documents are automatically saved as you type.</p></blockquote>\
<p>Start writing now! Happy writing! \u{270D}\u{FE0F}</p>";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_is_timestamp_string() {
        let id = DocumentId::now();
        assert!(id.as_str().chars().all(|c| c.is_ascii_digit()));
        assert!(id.as_str().len() >= 13); // millisecond precision
    }

    #[test]
    fn test_record_excludes_content() {
        let doc = Document {
            id: DocumentId::from_string("1"),
            name: "Untitled Document".to_string(),
            content: "<p>secret body</p>".to_string(),
        };
        let record = DocumentRecord::from(&doc);
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("secret body"));
        assert!(json.contains("Untitled Document"));
    }

    #[test]
    fn test_initial_body_is_rich_markup() {
        assert!(initial_body().starts_with("<h1>"));
        assert!(!initial_body().trim().is_empty());
    }
}
