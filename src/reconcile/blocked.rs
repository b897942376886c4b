use std::collections::BTreeMap;

use log::info;

use crate::api::{BlockPathRequest, StarApi};
use crate::error::ApiResult;
use crate::graph::{BlockedPathEntry, StarId};

/// Order-independent key for an undirected edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
	low: StarId,
	high: StarId,
}

impl EdgeKey {
	pub fn new(a: StarId, b: StarId) -> Self {
		if a <= b {
			Self { low: a, high: b }
		} else {
			Self { low: b, high: a }
		}
	}

	pub fn endpoints(&self) -> (StarId, StarId) {
		(self.low, self.high)
	}
}

/// Read-through cache of the server's blocked paths. Never patched locally:
/// every change is confirmed by the server and followed by a full re-fetch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlockedEdgeSet {
	entries: BTreeMap<EdgeKey, BlockedPathEntry>,
}

impl BlockedEdgeSet {
	pub fn new() -> Self {
		Self::default()
	}

	/// Replaces the whole set. Later duplicates of the same key win.
	pub fn set_blocked(&mut self, entries: impl IntoIterator<Item = BlockedPathEntry>) {
		self.entries = entries
			.into_iter()
			.map(|e| (EdgeKey::new(e.from, e.to), e))
			.collect();
	}

	pub fn is_blocked(&self, a: StarId, b: StarId) -> bool {
		self.entries.contains_key(&EdgeKey::new(a, b))
	}

	pub fn contains(&self, key: &EdgeKey) -> bool {
		self.entries.contains_key(key)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn clear(&mut self) {
		self.entries.clear();
	}

	pub fn iter(&self) -> impl Iterator<Item = (&EdgeKey, &BlockedPathEntry)> {
		self.entries.iter()
	}

	/// Pulls the current list from the server. On failure the set is untouched.
	pub async fn refresh<A: StarApi>(&mut self, api: &A) -> ApiResult<()> {
		let entries = api.blocked_paths().await?;
		self.set_blocked(entries);
		Ok(())
	}

	/// Asks the server to block or unblock `a`-`b`, then re-fetches.
	/// Returns the server's confirmation text.
	pub async fn toggle<A: StarApi>(
		&mut self,
		api: &A,
		a: StarId,
		b: StarId,
		should_block: bool,
	) -> ApiResult<String> {
		let request = BlockPathRequest::new(a, b, should_block);
		let fallback = if should_block {
			"Path blocked"
		} else {
			"Path unblocked"
		};
		let message = api.block_path(&request).await?.confirm(fallback)?;
		info!("path {a}-{b} block={should_block}: {message}");
		self.refresh(api).await?;
		Ok(message)
	}
}
