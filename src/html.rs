use log::debug;

use crate::block::{Block, BlockKind, SpanKind, TextSpan};
use crate::config::RenderConfig;
use crate::inline::{ParseError, tokenize};
use crate::node::Node;
use crate::parser::{self, ordered_marker};

/// Build the `<div>` root for a document, rendering every block kind.
pub fn build_document(markdown: &str) -> Result<Node, ParseError> {
    build_document_with(markdown, &RenderConfig::default())
}

/// Build the `<div>` root for a document with explicit render settings.
pub fn build_document_with(markdown: &str, config: &RenderConfig) -> Result<Node, ParseError> {
    let mut children = Vec::new();
    for block in parser::parse(markdown) {
        if config.paragraphs_only && block.kind != BlockKind::Paragraph {
            debug!("skipping {:?} block", block.kind);
            continue;
        }
        children.push(block_to_node(&block)?);
    }
    Ok(Node::parent("div", children))
}

fn block_to_node(block: &Block) -> Result<Node, ParseError> {
    let raw = block.raw.as_str();
    match block.kind {
        BlockKind::Paragraph => Ok(Node::parent("p", inline_nodes(raw)?)),
        BlockKind::Heading(level) => {
            let text = raw[usize::from(level)..].trim_start_matches(' ');
            Ok(Node::parent(format!("h{level}"), inline_nodes(text)?))
        }
        BlockKind::Code => Ok(code_block(raw)),
        BlockKind::Quote => {
            let text = raw
                .lines()
                .map(|line| {
                    let line = line.strip_prefix('>').unwrap_or(line);
                    line.strip_prefix(' ').unwrap_or(line)
                })
                .collect::<Vec<_>>()
                .join("\n");
            Ok(Node::parent("blockquote", inline_nodes(&text)?))
        }
        BlockKind::UnorderedList => {
            let items: Vec<Node> = raw
                .lines()
                .map(|line| list_item(line.get(2..).unwrap_or_default()))
                .collect::<Result<_, _>>()?;
            Ok(Node::parent("ul", items))
        }
        BlockKind::OrderedList => {
            let items: Vec<Node> = raw
                .lines()
                .enumerate()
                .map(|(i, line)| {
                    let marker = ordered_marker(i + 1);
                    list_item(line.strip_prefix(marker.as_str()).unwrap_or(line))
                })
                .collect::<Result<_, _>>()?;
            Ok(Node::parent("ol", items))
        }
    }
}

fn list_item(text: &str) -> Result<Node, ParseError> {
    Ok(Node::parent("li", inline_nodes(text)?))
}

/// `<pre><code>` with the fence lines removed. No inline markup applies.
fn code_block(raw: &str) -> Node {
    let lines: Vec<&str> = raw.lines().collect();
    let (info, body) = match lines.as_slice() {
        [line] => {
            let inner = line.trim_start_matches('`').trim_end_matches('`');
            ("", inner.to_string())
        }
        [first, inner @ .., _] => {
            let mut body = inner.join("\n");
            if !body.is_empty() {
                body.push('\n');
            }
            (first.trim_start_matches('`').trim(), body)
        }
        [] => ("", String::new()),
    };

    let mut code = Node::leaf("code", body);
    if let Some(language) = info.split_whitespace().next() {
        code = code.with_attr("class", format!("language-{language}"));
    }
    Node::parent("pre", vec![code])
}

fn inline_nodes(text: &str) -> Result<Vec<Node>, ParseError> {
    Ok(tokenize(text)?.iter().map(span_to_node).collect())
}

/// Map one inline span to its HTML node.
pub fn span_to_node(span: &TextSpan) -> Node {
    let text = span.text();
    let url = span.url().unwrap_or_default();
    match span.kind() {
        SpanKind::Plain => Node::text(text),
        SpanKind::Bold => Node::leaf("b", text),
        SpanKind::Italic => Node::leaf("i", text),
        SpanKind::Code => Node::leaf("code", text),
        SpanKind::Link => Node::leaf("a", text).with_attr("href", url),
        SpanKind::Image => Node::leaf("img", "")
            .with_attr("src", url)
            .with_attr("alt", text),
    }
}
