//! Host block segmentation over the raw lines of an SSH config.
//!
//! A block starts at a `Host` directive and runs until the next top-level
//! line (non-empty, not indented) or the next `Host` directive. Lines are kept
//! verbatim so they can be shown to the user exactly as written.

/// Characters that turn a `Host` alias into a pattern rather than a name.
pub const WILDCARD_CHARS: [char; 5] = ['*', '?', '[', ']', '!'];

pub fn is_wildcard(alias: &str) -> bool {
    alias.contains(&WILDCARD_CHARS[..])
}

/// Returns true when the trimmed line is `<keyword> <something>`, ignoring
/// the keyword's case. A single literal space must follow the keyword.
pub(crate) fn starts_with_directive(trimmed: &str, keyword: &str) -> bool {
    let n = keyword.len();
    trimmed
        .get(..n)
        .is_some_and(|head| head.eq_ignore_ascii_case(keyword))
        && trimmed.as_bytes().get(n) == Some(&b' ')
}

/// Value of `keyword` on this line: the first token after the keyword.
pub(crate) fn directive_value<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let trimmed = line.trim();
    if !starts_with_directive(trimmed, keyword) {
        return None;
    }
    trimmed.split_whitespace().nth(1)
}

/// Aliases of a `Host` directive line, or `None` if the line is something else.
pub fn host_aliases(line: &str) -> Option<Vec<&str>> {
    let trimmed = line.trim();
    if !starts_with_directive(trimmed, "host") {
        return None;
    }
    Some(trimmed.split_whitespace().skip(1).collect())
}

/// A top-level line is non-empty and starts with neither a space nor a tab.
/// A lone `\r` left over from CRLF files counts as empty.
pub fn is_top_level(line: &str) -> bool {
    let line = line.strip_suffix('\r').unwrap_or(line);
    !line.is_empty() && !line.starts_with(&[' ', '\t'][..])
}

fn ends_block(line: &str) -> bool {
    is_top_level(line) || host_aliases(line).is_some()
}

/// One `Host` block exactly as it appears in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostBlock {
    name: String,
    aliases: Vec<String>,
    raw_lines: Vec<String>,
}

impl HostBlock {
    /// The alias this block is known by in the current view: the queried name
    /// for [`get_block`], the first alias for [`get_all_blocks`].
    pub fn name(&self) -> &str {
        &self.name
    }

    #[cfg(test)]
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Verbatim lines, starting with the `Host` line.
    #[cfg(test)]
    pub fn raw_lines(&self) -> &[String] {
        &self.raw_lines
    }

    /// First value of `keyword` inside the block.
    pub fn directive(&self, keyword: &str) -> Option<&str> {
        self.raw_lines
            .iter()
            .skip(1)
            .find_map(|line| directive_value(line, keyword))
    }

    #[cfg(test)]
    pub fn hostname(&self) -> Option<&str> {
        self.directive("hostname")
    }

    #[cfg(test)]
    pub fn user(&self) -> Option<&str> {
        self.directive("user")
    }

    pub fn proxy_jump(&self) -> Option<&str> {
        self.directive("proxyjump")
    }

    /// Lines to show for this block: everything but the `Host` line and blank
    /// lines, unmodified (comments and unknown directives included).
    pub fn body(&self) -> impl Iterator<Item = &str> {
        self.raw_lines
            .iter()
            .skip(1)
            .map(String::as_str)
            .filter(|line| !line.trim().is_empty())
    }
}

/// Every block in file order, one per `Host` directive, named by its first alias.
pub fn get_all_blocks<S: AsRef<str>>(lines: &[S]) -> Vec<HostBlock> {
    let mut blocks = Vec::new();
    let mut current: Option<HostBlock> = None;

    for line in lines.iter().map(AsRef::as_ref) {
        if let Some(aliases) = host_aliases(line) {
            blocks.extend(current.take());
            current = Some(HostBlock {
                name: aliases[0].to_string(),
                aliases: aliases.iter().map(|a| a.to_string()).collect(),
                raw_lines: vec![line.to_string()],
            });
            continue;
        }

        if current.is_some() && ends_block(line) {
            blocks.extend(current.take());
        } else if let Some(block) = current.as_mut() {
            block.raw_lines.push(line.to_string());
        }
    }

    blocks.extend(current);
    blocks
}

/// The first block whose `Host` line lists `name` as an exact token.
///
/// No pattern matching is done: `Host web-*` is not returned for `web-1`.
pub fn get_block<S: AsRef<str>>(lines: &[S], name: &str) -> Option<HostBlock> {
    get_all_blocks(lines)
        .into_iter()
        .find(|block| block.aliases.iter().any(|alias| alias == name))
        .map(|block| HostBlock {
            name: name.to_string(),
            ..block
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<&str> {
        text.split('\n').collect()
    }

    const CONFIG: &str = "\
# global
Host bastion
    Hostname 10.0.0.1
    User ops

Host web1 web2
    HostName 10.0.1.5
    # app servers
    ProxyJump bastion
Match all
    User nobody
Host *
    ForwardAgent yes";

    #[test]
    fn test_wildcard_detection() {
        for alias in ["*", "web-?", "[ab]", "!prod", "db*"] {
            assert!(is_wildcard(alias), "{alias}");
        }
        assert!(!is_wildcard("prod-db.example.com"));
    }

    #[test]
    fn test_host_aliases_is_case_insensitive() {
        assert_eq!(host_aliases("HOST a b"), Some(vec!["a", "b"]));
        assert_eq!(host_aliases("  host a"), Some(vec!["a"]));
        assert_eq!(host_aliases("Hostname 1.2.3.4"), None);
        assert_eq!(host_aliases("Host"), None);
    }

    #[test]
    fn test_get_block_collects_until_top_level_line() {
        let block = get_block(&lines(CONFIG), "web2").unwrap();
        assert_eq!(block.name(), "web2");
        assert_eq!(block.aliases(), ["web1", "web2"]);
        assert_eq!(
            block.raw_lines(),
            [
                "Host web1 web2",
                "    HostName 10.0.1.5",
                "    # app servers",
                "    ProxyJump bastion",
            ]
        );
        assert_eq!(block.hostname(), Some("10.0.1.5"));
        assert_eq!(block.proxy_jump(), Some("bastion"));
        assert_eq!(block.user(), None);
    }

    #[test]
    fn test_get_block_keeps_blank_lines_inside_block() {
        let block = get_block(&lines(CONFIG), "bastion").unwrap();
        assert_eq!(block.raw_lines().len(), 4);
        assert_eq!(block.raw_lines()[3], "");
        assert_eq!(
            block.body().collect::<Vec<_>>(),
            ["    Hostname 10.0.0.1", "    User ops"]
        );
    }

    #[test]
    fn test_get_block_exact_token_match() {
        assert!(get_block(&lines(CONFIG), "web").is_none());
        assert!(get_block(&lines(CONFIG), "Bastion").is_none());
        assert!(get_block(&lines(CONFIG), "anything").is_none());
        assert!(get_block(&lines(CONFIG), "*").is_some());
    }

    #[test]
    fn test_get_block_returns_first_occurrence() {
        let text = "Host dup\n  User first\nHost dup\n  User second";
        let block = get_block(&lines(text), "dup").unwrap();
        assert_eq!(block.user(), Some("first"));
    }

    #[test]
    fn test_first_directive_wins() {
        let text = "Host a\n  Hostname one\n  HOSTNAME two";
        let block = get_block(&lines(text), "a").unwrap();
        assert_eq!(block.hostname(), Some("one"));
    }

    #[test]
    fn test_get_all_blocks_one_per_host_directive() {
        let blocks = get_all_blocks(&lines(CONFIG));
        let names: Vec<_> = blocks.iter().map(HostBlock::name).collect();
        assert_eq!(names, ["bastion", "web1", "*"]);
        // `Match all` ends the web block and is not part of any block.
        assert!(blocks[1].raw_lines().iter().all(|l| !l.contains("Match")));
        assert_eq!(blocks[2].directive("forwardagent"), Some("yes"));
    }

    #[test]
    fn test_crlf_blank_line_does_not_end_block() {
        let text = "Host a\r\n  User me\r\n\r\n  Hostname h\r\n";
        let block = get_block(&lines(text), "a").unwrap();
        assert_eq!(block.hostname(), Some("h"));
    }
}
