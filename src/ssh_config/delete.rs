//! Removing host blocks from config text without disturbing anything else.

use std::borrow::Cow;

use super::block::{host_aliases, is_top_level};

/// Which of `lines` survive removing every block whose `Host` line lists `name`.
///
/// Deletion is per block: removing `b` from `Host a b c` removes `a` and `c`
/// too. The line that ends a removed block is kept, since it belongs to
/// whatever follows.
fn retained<S: AsRef<str>>(lines: &[S], name: &str) -> Vec<bool> {
    let mut skipping = false;

    lines
        .iter()
        .map(|line| {
            let line: &str = line.as_ref();
            if let Some(aliases) = host_aliases(line) {
                skipping = aliases.contains(&name);
            } else if skipping && is_top_level(line) {
                skipping = false;
            }
            !skipping
        })
        .collect()
}

/// Drop every block whose `Host` line lists `name`, keeping all other lines
/// as they are. An unknown name leaves the input unchanged.
pub fn delete_block<S: AsRef<str>>(lines: &[S], name: &str) -> Vec<String> {
    lines
        .iter()
        .zip(retained(lines, name))
        .filter(|(_, keep)| *keep)
        .map(|(line, _)| line.as_ref().to_string())
        .collect()
}

/// [`delete_block`] over raw file contents, split and re-joined on `\n`.
///
/// Lines are only decoded to decide what to drop; every kept line is copied
/// back byte for byte, so bytes that are not UTF-8 survive untouched.
pub fn delete_host(contents: &[u8], name: &str) -> Vec<u8> {
    let raw: Vec<&[u8]> = contents.split(|&b| b == b'\n').collect();
    let decoded: Vec<Cow<'_, str>> = raw.iter().map(|line| String::from_utf8_lossy(line)).collect();

    raw.iter()
        .zip(retained(&decoded, name))
        .filter_map(|(line, keep)| keep.then_some(*line))
        .collect::<Vec<_>>()
        .join(&b'\n')
}
