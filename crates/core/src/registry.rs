//! Local cache of the sessions this client has open.
//!
//! A name moves Unknown -> Open on insert and Open -> Terminated on remove.
//! A terminated handle is never reinserted; reopening the same name yields a
//! fresh [`DebugSession`].

use std::collections::HashMap;
use std::sync::Arc;

use dsc_runtime::{Error, Result};
use regex::Regex;

use crate::session::DebugSession;

#[derive(Default)]
pub(crate) struct SessionRegistry {
	sessions: HashMap<String, Arc<DebugSession>>,
}

impl SessionRegistry {
	pub fn contains(&self, name: &str) -> bool {
		self.sessions.contains_key(name)
	}

	/// Fails with [`Error::AlreadyOpen`] if the name is present.
	pub fn ensure_absent(&self, name: &str) -> Result<()> {
		if self.contains(name) {
			return Err(Error::AlreadyOpen { name: name.to_string() });
		}
		Ok(())
	}

	pub fn insert(&mut self, session: Arc<DebugSession>) -> Result<Arc<DebugSession>> {
		self.ensure_absent(session.name())?;
		self.sessions.insert(session.name().to_string(), Arc::clone(&session));
		Ok(session)
	}

	pub fn get(&self, name: &str) -> Result<Arc<DebugSession>> {
		self.sessions
			.get(name)
			.cloned()
			.ok_or_else(|| Error::NotOpen { name: name.to_string() })
	}

	pub fn remove(&mut self, name: &str) -> Option<Arc<DebugSession>> {
		self.sessions.remove(name)
	}

	/// Open names, sorted for stable output.
	pub fn names(&self) -> Vec<String> {
		let mut names: Vec<String> = self.sessions.keys().cloned().collect();
		names.sort();
		names
	}

	pub fn len(&self) -> usize {
		self.sessions.len()
	}
}

/// Picks the single candidate that `pattern` matches.
///
/// The pattern is a regular expression searched anywhere in each candidate,
/// so `"M3"` matches `"XDS110/Cortex_M3_0"`. Exactly one match is required.
pub fn resolve_name(pattern: &str, candidates: &[String]) -> Result<String> {
	let regex = Regex::new(pattern).map_err(|e| Error::InvalidPattern {
		pattern: pattern.to_string(),
		reason: e.to_string(),
	})?;

	let mut matches: Vec<String> = candidates.iter().filter(|c| regex.is_match(c)).cloned().collect();
	match matches.len() {
		0 => Err(Error::NameResolution { pattern: pattern.to_string() }),
		1 => Ok(matches.remove(0)),
		_ => Err(Error::AmbiguousName {
			pattern: pattern.to_string(),
			matches,
		}),
	}
}
