//! Integration test common infrastructure.
//!
//! Builds hosts over an in-memory store and helpers for asserting on the
//! events a message produces.

#![allow(dead_code)]

use blockgate::config::Config;
use blockgate::db::{BlockRecord, BlockStore, MemoryStore};
use blockgate::gate::{Notice, Verdict};
use blockgate::{Host, HostEvent, InboundMessage};
use std::sync::Arc;

pub const PLATFORM: &str = "qq";

/// Authority high enough to run every administrative command.
pub const ADMIN: u8 = 4;

/// A host plus a handle on its store for direct inspection.
pub struct TestHost {
    pub host: Host,
    pub store: Arc<MemoryStore>,
}

impl TestHost {
    pub fn new(config: Config) -> Self {
        Self::with_records(config, [])
    }

    pub fn with_records(config: Config, records: impl IntoIterator<Item = BlockRecord>) -> Self {
        let store = Arc::new(MemoryStore::with_records(records));
        let shared: Arc<dyn BlockStore> = store.clone();
        let host = Host::new(Arc::new(config), shared);
        Self { host, store }
    }

    /// Send `content` from `user` in `channel` with default authority.
    pub async fn say(&self, channel: &str, user: &str, content: &str) -> Vec<HostEvent> {
        self.host
            .handle(InboundMessage::new(PLATFORM, channel, user, content))
            .await
    }

    /// Send `content` from an administrator.
    pub async fn admin(&self, channel: &str, user: &str, content: &str) -> Vec<HostEvent> {
        self.host
            .handle(InboundMessage::new(PLATFORM, channel, user, content).with_authority(ADMIN))
            .await
    }
}

/// The verdict of a dispatched message, or `None` if it produced no dispatch.
pub fn dispatched(events: &[HostEvent]) -> Option<Verdict> {
    events.iter().find_map(|event| match event {
        HostEvent::Dispatch { verdict, .. } => Some(*verdict),
        _ => None,
    })
}

/// Assert that exactly one reply carrying `notice` was sent.
pub fn assert_reply(events: &[HostEvent], notice: Notice) {
    match events {
        [HostEvent::Send { content, .. }] => assert_eq!(content, &notice.to_string()),
        other => panic!("expected a single reply with {notice:?}, got {other:?}"),
    }
}
