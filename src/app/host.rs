use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::app::App;
use crate::ssh_config::HostEntry;

/// Rows moved by Page Up/Down.
const PAGE_JUMP: usize = 10;

/// Indices of hosts matching `query`, best match first. Ties keep file order.
pub fn filter_hosts(matcher: &SkimMatcherV2, hosts: &[HostEntry], query: &str) -> Vec<usize> {
    if query.is_empty() {
        return (0..hosts.len()).collect();
    }

    let mut scored: Vec<(i64, usize)> = hosts
        .iter()
        .enumerate()
        .filter_map(|(i, host)| matcher.fuzzy_match(&host.name, query).map(|score| (score, i)))
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, i)| i).collect()
}

impl App {
    /// Host under the cursor, if any row is visible.
    pub fn highlighted_host(&self) -> Option<&HostEntry> {
        let row = self.host_list_state.selected()?;
        self.visible_hosts
            .get(row)
            .and_then(|&idx| self.hosts.get(idx))
    }

    /// Replace the host list. The cursor keeps its row, clamped.
    pub fn set_hosts(&mut self, hosts: Vec<HostEntry>) {
        // Old indices are meaningless against the new list.
        self.visible_hosts.clear();
        self.hosts = hosts;
        self.apply_filter();
    }

    /// Recompute the visible rows, keeping the cursor on the same alias when
    /// it is still listed.
    pub fn apply_filter(&mut self) {
        let previous_name = self.highlighted_host().map(|h| h.name.clone());
        let previous_row = self.host_list_state.selected().unwrap_or(0);

        self.visible_hosts = filter_hosts(&self.matcher, &self.hosts, &self.filter.query);

        let row = previous_name
            .and_then(|name| {
                self.visible_hosts
                    .iter()
                    .position(|&idx| self.hosts[idx].name == name)
            })
            .unwrap_or_else(|| previous_row.min(self.visible_hosts.len().saturating_sub(1)));

        if self.visible_hosts.is_empty() {
            self.select_row(None);
        } else {
            self.select_row(Some(row));
        }
    }

    fn select_row(&mut self, row: Option<usize>) {
        self.host_list_state.select(row);
        self.refresh_info();
    }

    /// Rebuild the info panel from the config as it is on disk right now.
    pub fn refresh_info(&mut self) {
        let Some(name) = self.highlighted_host().map(|h| h.name.clone()) else {
            self.info_panel.clear();
            return;
        };

        self.info_panel = match self.ssh_config.host_info(&name) {
            Ok(info) => info.to_string(),
            Err(e) => {
                tracing::error!("Failed to read host info for {}: {}", name, e);
                "Error: Could not read SSH config".to_string()
            }
        };
    }

    pub fn select_next(&mut self) {
        let total = self.visible_hosts.len();
        if total == 0 {
            return;
        }
        let current = self.host_list_state.selected().unwrap_or(0);
        self.select_row(Some((current + 1) % total));
    }

    pub fn select_previous(&mut self) {
        let total = self.visible_hosts.len();
        if total == 0 {
            return;
        }
        let current = self.host_list_state.selected().unwrap_or(0);
        self.select_row(Some((current + total - 1) % total));
    }

    pub fn select_first(&mut self) {
        if !self.visible_hosts.is_empty() {
            self.select_row(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if let Some(last) = self.visible_hosts.len().checked_sub(1) {
            self.select_row(Some(last));
        }
    }

    pub fn page_down(&mut self) {
        if let Some(last) = self.visible_hosts.len().checked_sub(1) {
            let current = self.host_list_state.selected().unwrap_or(0);
            self.select_row(Some((current + PAGE_JUMP).min(last)));
        }
    }

    pub fn page_up(&mut self) {
        if !self.visible_hosts.is_empty() {
            let current = self.host_list_state.selected().unwrap_or(0);
            self.select_row(Some(current.saturating_sub(PAGE_JUMP)));
        }
    }

    pub fn start_filter(&mut self) {
        self.filter.editing = true;
    }

    pub fn clear_filter(&mut self) {
        self.filter = Default::default();
        self.apply_filter();
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.filter.query.push(c);
        self.apply_filter();
    }

    pub fn pop_filter_char(&mut self) {
        if self.filter.query.pop().is_some() {
            self.apply_filter();
        }
    }

    /// Delete the highlighted host's whole block from the config and reload.
    ///
    /// On failure the list stays as it was; the error only goes to the log.
    pub fn delete_highlighted(&mut self) {
        let Some(name) = self.highlighted_host().map(|h| h.name.clone()) else {
            tracing::warn!("Delete pressed but no host selected.");
            return;
        };

        match self.ssh_config.delete_host(&name) {
            Ok(hosts) => {
                tracing::info!("Removed {}, {} hosts left", name, hosts.len());
                self.set_hosts(hosts);
            }
            Err(e) => {
                tracing::error!("Failed to delete {}: {}", name, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hosts(names: &[&str]) -> Vec<HostEntry> {
        names.iter().map(|n| HostEntry::new(*n, "")).collect()
    }

    #[test]
    fn test_empty_query_keeps_everything_in_order() {
        let matcher = SkimMatcherV2::default();
        assert_eq!(
            filter_hosts(&matcher, &hosts(&["b", "a", "c"]), ""),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_fuzzy_query_drops_non_matches() {
        let matcher = SkimMatcherV2::default();
        let list = hosts(&["prod-db", "staging-web", "prod-web", "bastion"]);
        let visible = filter_hosts(&matcher, &list, "pw");
        assert_eq!(visible, vec![2]);

        let visible = filter_hosts(&matcher, &list, "prod");
        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|&i| list[i].name.starts_with("prod")));
    }

    #[test]
    fn test_no_matches() {
        let matcher = SkimMatcherV2::default();
        assert!(filter_hosts(&matcher, &hosts(&["alpha"]), "zzz").is_empty());
    }
}
