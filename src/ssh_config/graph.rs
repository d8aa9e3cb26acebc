//! ProxyJump relationships between host blocks.
//!
//! Nothing here is cached. Callers pass the current file lines on every query
//! so a deletion is reflected immediately.

use std::fmt;

use super::block::{get_all_blocks, get_block, HostBlock};

const RULE_WIDTH: usize = 20;

/// The jump host `name` connects through, one hop only.
///
/// For `a -> b -> c` this returns `b`'s block when asked about `a`.
pub fn resolve_proxy_chain<S: AsRef<str>>(lines: &[S], name: &str) -> Option<HostBlock> {
    let block = get_block(lines, name)?;
    let jump = block.proxy_jump()?;
    get_block(lines, jump)
}

/// Blocks whose `ProxyJump` is exactly `name`, in file order.
pub fn find_dependents<S: AsRef<str>>(lines: &[S], name: &str) -> Vec<HostBlock> {
    get_all_blocks(lines)
        .into_iter()
        .filter(|block| block.proxy_jump() == Some(name))
        .collect()
}

/// Everything the info panel shows for one host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
    pub name: String,
    pub block: Option<HostBlock>,
    pub jump_host: Option<HostBlock>,
    pub dependents: Vec<HostBlock>,
}

impl HostInfo {
    pub fn collect<S: AsRef<str>>(lines: &[S], name: &str) -> Self {
        let block = get_block(lines, name);
        let (jump_host, dependents) = if block.is_some() {
            (
                resolve_proxy_chain(lines, name),
                find_dependents(lines, name),
            )
        } else {
            (None, Vec::new())
        };

        Self {
            name: name.to_string(),
            block,
            jump_host,
            dependents,
        }
    }
}

fn write_body(f: &mut fmt::Formatter<'_>, block: &HostBlock) -> fmt::Result {
    for line in block.body() {
        writeln!(f, "{line}")?;
    }
    Ok(())
}

impl fmt::Display for HostInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "─".repeat(RULE_WIDTH);

        let Some(block) = &self.block else {
            return write!(f, "Host: {}\n\nNo config found", self.name);
        };

        if let Some(jump) = &self.jump_host {
            writeln!(f, "Jump Host: {}", jump.name())?;
            writeln!(f, "{rule}")?;
            write_body(f, jump)?;
            writeln!(f)?;
        }

        writeln!(f, "Host: {}", self.name)?;
        writeln!(f, "{rule}")?;
        write_body(f, block)?;

        if !self.dependents.is_empty() {
            writeln!(f)?;
            writeln!(f, "Jumped by:")?;
            writeln!(f, "{rule}")?;
            for dependent in &self.dependents {
                writeln!(f, "Host: {}", dependent.name())?;
                write_body(f, dependent)?;
                writeln!(f)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(text: &str) -> Vec<&str> {
        text.split('\n').collect()
    }

    const CHAIN: &str = "\
Host a
    Hostname 10.0.0.1
    ProxyJump b
Host b
    Hostname 10.0.0.2
    ProxyJump c
Host c
    Hostname 10.0.0.3
Host d
    ProxyJump b
    # via b
Host e e-alt
    ProxyJump c";

    #[test]
    fn test_resolve_is_single_hop() {
        let jump = resolve_proxy_chain(&lines(CHAIN), "a").unwrap();
        assert_eq!(jump.name(), "b");
        assert_eq!(jump.hostname(), Some("10.0.0.2"));
    }

    #[test]
    fn test_resolve_without_jump() {
        assert!(resolve_proxy_chain(&lines(CHAIN), "c").is_none());
        assert!(resolve_proxy_chain(&lines(CHAIN), "missing").is_none());
    }

    #[test]
    fn test_resolve_unknown_jump_target() {
        let text = "Host a\n  ProxyJump nowhere";
        assert!(resolve_proxy_chain(&lines(text), "a").is_none());
    }

    #[test]
    fn test_find_dependents_in_file_order() {
        let deps = find_dependents(&lines(CHAIN), "b");
        let names: Vec<_> = deps.iter().map(HostBlock::name).collect();
        assert_eq!(names, ["a", "d"]);

        let deps = find_dependents(&lines(CHAIN), "c");
        let names: Vec<_> = deps.iter().map(HostBlock::name).collect();
        assert_eq!(names, ["b", "e"]);

        assert!(find_dependents(&lines(CHAIN), "a").is_empty());
    }

    #[test]
    fn test_render_full_info() {
        let info = HostInfo::collect(&lines(CHAIN), "b");
        let expected = "\
Jump Host: c
────────────────────
    Hostname 10.0.0.3

Host: b
────────────────────
    Hostname 10.0.0.2
    ProxyJump c

Jumped by:
────────────────────
Host: a
    Hostname 10.0.0.1
    ProxyJump b

Host: d
    ProxyJump b
    # via b

";
        assert_eq!(info.to_string(), expected);
    }

    #[test]
    fn test_render_missing_host() {
        let info = HostInfo::collect(&lines(CHAIN), "ghost");
        assert_eq!(info.to_string(), "Host: ghost\n\nNo config found");
        assert!(info.dependents.is_empty());
    }

    #[test]
    fn test_render_plain_host() {
        let info = HostInfo::collect(&lines("Host solo\n\n  User me\n"), "solo");
        assert_eq!(info.to_string(), "Host: solo\n────────────────────\n  User me\n");
    }
}
