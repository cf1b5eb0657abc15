//! High-level workspace client.
//!
//! A [`Workspace`] wires a document registry to a storage backend and exposes
//! the application-level operations on top of it: sharing the active document
//! with a peer, receiving one from a share link, chatting with a writing
//! assistant about the active document, and exporting it as Markdown.

use crate::assistant::{AssistantClient, AssistantError, AssistantRequest, Message};
use crate::error::{Result, SdkError};
use crate::export::{self, MarkdownExport};
use crate::text;
use snippet_handoff::{PeerEndpoint, ReceiverSession, SenderSession, ShareLink};
use snippet_registry::{DocumentId, DocumentRegistry};
use snippet_store::{keys, MemoryStorage, Storage};
use std::sync::Arc;
use tracing::debug;

/// Workspace-wide settings.
#[derive(Clone, Debug)]
pub struct WorkspaceConfig {
    /// Origin used when building share links.
    pub origin: String,
    /// Documents over this many words are refused by the assistant path.
    pub word_limit: usize,
    /// How many trailing chat messages travel with each assistant request.
    pub context_messages: usize,
    /// API key forwarded to the assistant backend.
    pub api_key: Option<String>,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            origin: "https://snippet.today".to_string(),
            word_limit: 750,
            context_messages: 10,
            api_key: None,
        }
    }
}

/// Builder for workspace configuration.
pub struct WorkspaceConfigBuilder {
    config: WorkspaceConfig,
}

impl WorkspaceConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: WorkspaceConfig::default(),
        }
    }

    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.config.origin = origin.into();
        self
    }

    pub fn word_limit(mut self, limit: usize) -> Self {
        self.config.word_limit = limit;
        self
    }

    pub fn context_messages(mut self, count: usize) -> Self {
        self.config.context_messages = count;
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn build(self) -> WorkspaceConfig {
        self.config
    }
}

impl Default for WorkspaceConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A sender-side share of the active document, ready to run.
///
/// Holds the open session and the link to hand to the receiving side. The
/// document snapshot is taken when the share is created, so later edits do
/// not leak into an in-flight transfer.
pub struct ActiveShare<E: PeerEndpoint> {
    session: SenderSession<E>,
    link: ShareLink,
    document_id: DocumentId,
    content: String,
}

impl<E: PeerEndpoint> ActiveShare<E> {
    pub fn link(&self) -> &ShareLink {
        &self.link
    }

    pub fn document_id(&self) -> &DocumentId {
        &self.document_id
    }

    /// Watch handle for the sending session's status.
    pub fn status(&self) -> tokio::sync::watch::Receiver<snippet_handoff::HandoffStatus> {
        self.session.status()
    }

    /// Wait for a peer, transfer the snapshot, and tear the session down.
    pub async fn send(self) -> Result<()> {
        self.session
            .run(self.document_id.as_str(), &self.content)
            .await?;
        Ok(())
    }
}

/// Word and character counts for a document's visible text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextCounts {
    pub words: usize,
    pub characters: usize,
}

/// The main entry point: one user's documents plus the operations over them.
pub struct Workspace<S: Storage> {
    storage: Arc<S>,
    registry: DocumentRegistry<S>,
    config: WorkspaceConfig,
}

impl Workspace<MemoryStorage> {
    /// A workspace over fresh in-memory storage, for tests and demos.
    pub fn in_memory(config: WorkspaceConfig) -> Result<Self> {
        Self::open(Arc::new(MemoryStorage::new()), config)
    }
}

impl<S: Storage> Workspace<S> {
    /// Open a workspace over existing storage, seeding the welcome document
    /// on first run.
    pub fn open(storage: Arc<S>, config: WorkspaceConfig) -> Result<Self> {
        let registry = DocumentRegistry::open(Arc::clone(&storage))?;
        Ok(Self {
            storage,
            registry,
            config,
        })
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    pub fn registry(&self) -> &DocumentRegistry<S> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut DocumentRegistry<S> {
        &mut self.registry
    }

    /// Snapshot the active document and open a sending session for it.
    ///
    /// The returned [`ActiveShare`] carries the share link; call
    /// [`ActiveShare::send`] to wait for the peer and transfer.
    pub async fn share_active<E: PeerEndpoint>(&self, endpoint: E) -> Result<ActiveShare<E>> {
        let active = self.registry.active()?;
        let document_id = active.id.clone();
        let content = active.content.clone();

        let mut session = SenderSession::new(endpoint);
        let peer_id = session.open().await?;
        debug!(peer = %peer_id, document = %document_id, "opened share");
        let link = ShareLink::new(&self.config.origin, peer_id);

        Ok(ActiveShare {
            session,
            link,
            document_id,
            content,
        })
    }

    /// Receive a document from a share link and make it active.
    pub async fn receive<E: PeerEndpoint>(
        &mut self,
        endpoint: E,
        link_url: &str,
    ) -> Result<DocumentId> {
        let link = ShareLink::parse(link_url)?;
        let session = ReceiverSession::new(endpoint, link.peer_id().clone());
        let id = session.run(&mut self.registry).await?;
        Ok(id)
    }

    /// Export the active document as Markdown, named after the document.
    pub fn export_active_markdown(&self) -> Result<MarkdownExport> {
        let active = self.registry.active()?;
        let markdown = export::html_to_markdown(&active.content);
        Ok(MarkdownExport::new(&active.name, markdown))
    }

    /// Word and character counts for the active document.
    pub fn active_counts(&self) -> Result<TextCounts> {
        let active = self.registry.active()?;
        Ok(TextCounts {
            words: text::word_count(&active.content),
            characters: text::char_count(&active.content),
        })
    }

    /// Load a document's persisted chat history. Missing history is an
    /// empty conversation.
    pub fn chat_history(&self, id: &DocumentId) -> Result<Vec<Message>> {
        let key = keys::chat(id.as_str());
        match self.storage.load(&key)? {
            Some(raw) => {
                serde_json::from_str(&raw).map_err(|e| SdkError::CorruptChatHistory {
                    document_id: id.as_str().to_string(),
                    reason: e.to_string(),
                })
            }
            None => Ok(Vec::new()),
        }
    }

    fn save_chat_history(&self, id: &DocumentId, history: &[Message]) -> Result<()> {
        let key = keys::chat(id.as_str());
        let raw = serde_json::to_string(history).map_err(|e| SdkError::CorruptChatHistory {
            document_id: id.as_str().to_string(),
            reason: e.to_string(),
        })?;
        self.storage.save(&key, &raw)?;
        Ok(())
    }

    /// Send one chat message about the active document and persist both it
    /// and the assistant's reply in the document's history.
    ///
    /// The request carries the document's plain text plus the trailing
    /// `context_messages` entries of the history. Documents over the word
    /// limit are refused before anything leaves the workspace.
    pub async fn send_chat_message(
        &mut self,
        assistant: &dyn AssistantClient,
        message: &str,
    ) -> Result<Message> {
        let api_key = self
            .config
            .api_key
            .clone()
            .ok_or(AssistantError::MissingApiKey)?;

        let active = self.registry.active()?;
        let document_id = active.id.clone();
        let document_text = text::plain_text(&active.content);

        let words = text::word_count(&active.content);
        if words > self.config.word_limit {
            return Err(AssistantError::WordLimitExceeded {
                words,
                limit: self.config.word_limit,
            }
            .into());
        }

        let mut history = self.chat_history(&document_id)?;
        let user_message = Message::user(message);

        let context_start = history.len().saturating_sub(self.config.context_messages);
        let mut context: Vec<Message> = history[context_start..].to_vec();
        context.push(user_message.clone());

        let reply_text = assistant
            .complete(AssistantRequest {
                messages: context,
                document_text,
                api_key,
            })
            .await?;
        let reply = Message::assistant(reply_text);

        history.push(user_message);
        history.push(reply.clone());
        self.save_chat_history(&document_id, &history)?;
        debug!(document = %document_id, turns = history.len(), "chat turn stored");

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use snippet_registry::DEFAULT_NAME;

    /// Replies with a fixed script and records every request it sees.
    struct ScriptedAssistant {
        replies: Mutex<Vec<String>>,
        requests: Mutex<Vec<AssistantRequest>>,
    }

    impl ScriptedAssistant {
        fn new(replies: &[&str]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().rev().map(|s| s.to_string()).collect()),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AssistantClient for ScriptedAssistant {
        async fn complete(&self, request: AssistantRequest) -> std::result::Result<String, AssistantError> {
            self.requests.lock().push(request);
            self.replies.lock().pop().ok_or(AssistantError::Api {
                status: 500,
                message: "script exhausted".to_string(),
            })
        }
    }

    fn workspace_with_key() -> Workspace<MemoryStorage> {
        let config = WorkspaceConfigBuilder::new().api_key("sk-test").build();
        Workspace::in_memory(config).unwrap()
    }

    #[test]
    fn test_open_seeds_welcome_document() {
        let workspace = Workspace::in_memory(WorkspaceConfig::default()).unwrap();
        let active = workspace.registry().active().unwrap();
        assert_eq!(active.name, DEFAULT_NAME);
        assert!(!active.content.is_empty());
    }

    #[test]
    fn test_builder_overrides_defaults() {
        let config = WorkspaceConfigBuilder::new()
            .origin("http://localhost:3000")
            .word_limit(10)
            .context_messages(2)
            .build();
        assert_eq!(config.origin, "http://localhost:3000");
        assert_eq!(config.word_limit, 10);
        assert_eq!(config.context_messages, 2);
        assert!(config.api_key.is_none());
    }

    #[tokio::test]
    async fn test_chat_turn_persists_history() {
        let mut workspace = workspace_with_key();
        let assistant = ScriptedAssistant::new(&["tighten the intro"]);

        let reply = workspace
            .send_chat_message(&assistant, "how is my draft?")
            .await
            .unwrap();
        assert_eq!(reply, Message::assistant("tighten the intro"));

        let id = workspace.registry().active_id().clone();
        let history = workspace.chat_history(&id).unwrap();
        assert_eq!(
            history,
            vec![
                Message::user("how is my draft?"),
                Message::assistant("tighten the intro"),
            ]
        );

        // The request carried the document's plain text and the key.
        let requests = assistant.requests.lock();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].api_key, "sk-test");
        assert!(requests[0].document_text.contains("snippet.today"));
    }

    #[tokio::test]
    async fn test_chat_context_is_trailing_window() {
        let config = WorkspaceConfigBuilder::new()
            .api_key("sk-test")
            .context_messages(2)
            .build();
        let mut workspace = Workspace::in_memory(config).unwrap();
        let assistant = ScriptedAssistant::new(&["r1", "r2", "r3"]);

        workspace.send_chat_message(&assistant, "m1").await.unwrap();
        workspace.send_chat_message(&assistant, "m2").await.unwrap();
        workspace.send_chat_message(&assistant, "m3").await.unwrap();

        let requests = assistant.requests.lock();
        // Third request: the last two history entries plus the new message.
        let context: Vec<&str> = requests[2]
            .messages
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(context, vec!["m2", "r2", "m3"]);
    }

    #[tokio::test]
    async fn test_word_limit_refuses_before_sending() {
        let config = WorkspaceConfigBuilder::new()
            .api_key("sk-test")
            .word_limit(3)
            .build();
        let mut workspace = Workspace::in_memory(config).unwrap();
        let id = workspace.registry().active_id().clone();
        workspace
            .registry_mut()
            .update_content(&id, "<p>one two three four five</p>")
            .unwrap();

        let assistant = ScriptedAssistant::new(&["never sent"]);
        let err = workspace
            .send_chat_message(&assistant, "summarize")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SdkError::Assistant(AssistantError::WordLimitExceeded { words: 5, limit: 3 })
        ));
        // Nothing reached the backend and nothing was persisted.
        assert!(assistant.requests.lock().is_empty());
        assert!(workspace.chat_history(&id).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_api_key_is_refused() {
        let mut workspace = Workspace::in_memory(WorkspaceConfig::default()).unwrap();
        let assistant = ScriptedAssistant::new(&["never sent"]);
        let err = workspace
            .send_chat_message(&assistant, "hello")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SdkError::Assistant(AssistantError::MissingApiKey)
        ));
    }

    #[tokio::test]
    async fn test_backend_failure_leaves_history_untouched() {
        let mut workspace = workspace_with_key();
        let assistant = ScriptedAssistant::new(&[]);
        let err = workspace
            .send_chat_message(&assistant, "hello")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SdkError::Assistant(AssistantError::Api { status: 500, .. })
        ));
        let id = workspace.registry().active_id().clone();
        assert!(workspace.chat_history(&id).unwrap().is_empty());
    }

    #[test]
    fn test_chat_history_survives_reopen() {
        let storage = Arc::new(MemoryStorage::new());
        let id;
        {
            let workspace =
                Workspace::open(Arc::clone(&storage), WorkspaceConfig::default()).unwrap();
            id = workspace.registry().active_id().clone();
            workspace
                .save_chat_history(&id, &[Message::user("hi"), Message::assistant("hello")])
                .unwrap();
        }
        let workspace = Workspace::open(storage, WorkspaceConfig::default()).unwrap();
        assert_eq!(workspace.chat_history(&id).unwrap().len(), 2);
    }

    #[test]
    fn test_corrupt_chat_history_is_reported() {
        let workspace = Workspace::in_memory(WorkspaceConfig::default()).unwrap();
        let id = workspace.registry().active_id().clone();
        workspace
            .storage
            .save(&keys::chat(id.as_str()), "not json")
            .unwrap();
        assert!(matches!(
            workspace.chat_history(&id),
            Err(SdkError::CorruptChatHistory { .. })
        ));
    }

    #[test]
    fn test_export_names_file_after_active_document() {
        let mut workspace = Workspace::in_memory(WorkspaceConfig::default()).unwrap();
        let id = workspace.registry().active_id().clone();
        workspace.registry_mut().rename(&id, "Notes").unwrap();
        workspace
            .registry_mut()
            .update_content(&id, "<h1>Plan</h1><p>ship it</p>")
            .unwrap();

        let export = workspace.export_active_markdown().unwrap();
        assert_eq!(export.file_name, "Notes.md");
        assert_eq!(export.markdown, "# Plan\n\nship it");
    }

    #[test]
    fn test_active_counts() {
        let mut workspace = Workspace::in_memory(WorkspaceConfig::default()).unwrap();
        let id = workspace.registry().active_id().clone();
        workspace
            .registry_mut()
            .update_content(&id, "<p>two words</p>")
            .unwrap();
        let counts = workspace.active_counts().unwrap();
        assert_eq!(counts.words, 2);
        assert_eq!(counts.characters, "two words".len());
    }
}
