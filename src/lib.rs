mod block;
mod config;
mod html;
mod inline;
mod node;
mod parser;
pub mod site;

pub use block::{Block, BlockKind, SpanKind, TextSpan};
pub use config::{Config, ConfigError, RenderConfig, SiteConfig};
pub use html::{build_document, build_document_with, span_to_node};
pub use inline::{ParseError, tokenize};
pub use node::{Attributes, Node, StructuralError, render_attrs};
pub use parser::{classify, split_into_blocks};

/// Failure converting a markdown document to HTML.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Structure(#[from] StructuralError),
}

/// Split and classify markdown text into blocks.
pub fn parse(markdown: &str) -> Vec<Block> {
    parser::parse(markdown)
}

/// Convert markdown to an HTML fragment rooted at a `<div>`.
pub fn markdown_to_html(markdown: &str) -> Result<String, Error> {
    markdown_to_html_with(markdown, &RenderConfig::default())
}

/// Convert markdown to an HTML fragment with custom render settings.
pub fn markdown_to_html_with(markdown: &str, config: &RenderConfig) -> Result<String, Error> {
    let root = build_document_with(markdown, config)?;
    Ok(root.render()?)
}
