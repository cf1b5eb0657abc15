//! Share link construction and parsing.
//!
//! Format: `<origin>/receive?peerId=<rendezvous-id>` - a single query
//! parameter carrying the sender's rendezvous identifier.

use crate::error::{HandoffError, Result};
use crate::transport::PeerId;

const RECEIVE_PATH: &str = "/receive";
const PEER_ID_PARAM: &str = "peerId";

/// A shareable receive link, rendered as a URL or QR payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareLink {
    origin: String,
    peer_id: PeerId,
}

impl ShareLink {
    pub fn new(origin: &str, peer_id: PeerId) -> Self {
        Self {
            origin: origin.trim_end_matches('/').to_string(),
            peer_id,
        }
    }

    pub fn peer_id(&self) -> &PeerId {
        &self.peer_id
    }

    pub fn url(&self) -> String {
        format!(
            "{}{}?{}={}",
            self.origin, RECEIVE_PATH, PEER_ID_PARAM, self.peer_id
        )
    }

    /// Parse a receive URL back into its origin and rendezvous id.
    pub fn parse(url: &str) -> Result<Self> {
        let (base, query) = url
            .split_once('?')
            .ok_or_else(|| invalid("missing query string"))?;
        let origin = base
            .strip_suffix(RECEIVE_PATH)
            .ok_or_else(|| invalid("not a receive link"))?;

        let peer_id = query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(name, _)| *name == PEER_ID_PARAM)
            .map(|(_, value)| value)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| invalid("missing peerId parameter"))?;

        Ok(Self {
            origin: origin.to_string(),
            peer_id: PeerId::new(peer_id),
        })
    }
}

impl std::fmt::Display for ShareLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url())
    }
}

fn invalid(reason: &str) -> HandoffError {
    HandoffError::InvalidLink(reason.to_string())
}
