//! Turns SSH config text into the host rows shown in the picker.

use super::block::{directive_value, host_aliases, is_wildcard};

/// One selectable alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEntry {
    pub name: String,
    /// `user@hostname`, `hostname`, or empty.
    pub display_hint: String,
}

impl HostEntry {
    pub fn new(name: impl Into<String>, display_hint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_hint: display_hint.into(),
        }
    }
}

#[derive(Default)]
struct PendingBlock {
    aliases: Vec<String>,
    hostname: Option<String>,
    user: Option<String>,
}

impl PendingBlock {
    fn display_hint(&self) -> String {
        match (&self.user, &self.hostname) {
            (Some(user), Some(hostname)) => format!("{user}@{hostname}"),
            (None, Some(hostname)) => hostname.clone(),
            _ => String::new(),
        }
    }

    fn flush(self, entries: &mut Vec<HostEntry>) {
        let hint = self.display_hint();
        entries.extend(
            self.aliases
                .into_iter()
                .filter(|alias| !is_wildcard(alias))
                .map(|alias| HostEntry::new(alias, hint.clone())),
        );
    }
}

/// Parse config text into host entries, in file order.
///
/// Every non-wildcard alias of every `Host` line yields an entry, so an alias
/// defined twice shows up twice. Within a block the first `Hostname` and
/// first `User` win. Lines that are not understood are skipped.
pub fn parse(text: &str) -> Vec<HostEntry> {
    let mut entries = Vec::new();
    let mut pending: Option<PendingBlock> = None;

    for line in text.lines() {
        if let Some(aliases) = host_aliases(line) {
            if let Some(block) = pending.take() {
                block.flush(&mut entries);
            }
            pending = Some(PendingBlock {
                aliases: aliases.into_iter().map(String::from).collect(),
                ..PendingBlock::default()
            });
            continue;
        }

        let Some(block) = pending.as_mut() else {
            continue;
        };
        if block.hostname.is_none() {
            block.hostname = directive_value(line, "hostname").map(String::from);
        }
        if block.user.is_none() {
            block.user = directive_value(line, "user").map(String::from);
        }
    }

    if let Some(block) = pending {
        block.flush(&mut entries);
    }

    tracing::debug!("Parsed {} host entries", entries.len());
    entries
}
