//! Persisted key layout.
//!
//! The layout mirrors a single browser profile: the document list key holds
//! ids, names and ordering (content excluded), the active-document key holds
//! a bare document id, and each document owns one content key and one chat
//! history key derived from a stable prefix plus its id.

/// Serialized document list: ids, names and ordering only.
pub const DOCUMENT_LIST: &str = "snippet-documents";

/// Id of the currently active document, persisted separately from the list.
pub const ACTIVE_DOCUMENT: &str = "snippet-active-doc";

const CONTENT_PREFIX: &str = "snippet-content-";
const CHAT_PREFIX: &str = "snippet-chat-";

/// Key holding a document's serialized body.
pub fn content(document_id: &str) -> String {
    format!("{CONTENT_PREFIX}{document_id}")
}

/// Key holding a document's chat history.
pub fn chat(document_id: &str) -> String {
    format!("{CHAT_PREFIX}{document_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_document_keys() {
        assert_eq!(content("1"), "snippet-content-1");
        assert_eq!(chat("1700000000000"), "snippet-chat-1700000000000");
    }

    #[test]
    fn test_keys_are_disjoint() {
        // The fixed keys must never collide with derived per-document keys.
        assert!(!DOCUMENT_LIST.starts_with(CONTENT_PREFIX));
        assert!(!ACTIVE_DOCUMENT.starts_with(CONTENT_PREFIX));
        assert_ne!(content("x"), chat("x"));
    }
}
