use log::debug;

use crate::block::{Block, BlockKind};

const FENCE: &str = "```";

/// Split a document into trimmed, non-empty blocks separated by blank lines.
pub fn split_into_blocks(markdown: &str) -> Vec<String> {
    let markdown = markdown.replace("\r\n", "\n");
    markdown
        .split("\n\n")
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(str::to_string)
        .collect()
}

/// Classify a single block. The first matching rule wins:
/// heading, code, quote, unordered list, ordered list, paragraph.
pub fn classify(block: &str) -> BlockKind {
    let lines: Vec<&str> = block.lines().collect();
    let (Some(first), Some(last)) = (lines.first(), lines.last()) else {
        return BlockKind::Paragraph;
    };

    if let Some(level) = heading_level(first) {
        return BlockKind::Heading(level);
    }
    if first.starts_with(FENCE) && last.starts_with(FENCE) {
        return BlockKind::Code;
    }
    if lines.iter().all(|line| line.starts_with('>')) {
        return BlockKind::Quote;
    }
    if ["- ", "* "]
        .iter()
        .any(|marker| lines.iter().all(|line| line.starts_with(marker)))
    {
        return BlockKind::UnorderedList;
    }
    if lines
        .iter()
        .enumerate()
        .all(|(i, line)| line.starts_with(&ordered_marker(i + 1)))
    {
        return BlockKind::OrderedList;
    }
    BlockKind::Paragraph
}

/// Split and classify a whole document.
pub fn parse(markdown: &str) -> Vec<Block> {
    split_into_blocks(markdown)
        .into_iter()
        .map(|raw| {
            let kind = classify(&raw);
            debug!("classified block as {:?}", kind);
            Block { raw, kind }
        })
        .collect()
}

/// `#` count when the line opens with one to six `#` followed by a space.
fn heading_level(line: &str) -> Option<u8> {
    let hashes = line.bytes().take_while(|&b| b == b'#').count();
    if (1..=6).contains(&hashes) && line[hashes..].starts_with(' ') {
        Some(hashes as u8)
    } else {
        None
    }
}

/// The `"{n}. "` prefix expected on line `n` of an ordered list.
pub(crate) fn ordered_marker(n: usize) -> String {
    format!("{n}. ")
}
