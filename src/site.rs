//! Page generation around the converter: static asset mirroring, template
//! filling and walking a content tree.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use thiserror::Error;

use crate::config::{RenderConfig, SiteConfig};

const TITLE_PLACEHOLDER: &str = "{{ Title }}";
const CONTENT_PLACEHOLDER: &str = "{{ Content }}";

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("{}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("{}: no `# ` title line", path.display())]
    MissingTitle { path: PathBuf },

    #[error("{}: {source}", path.display())]
    Convert { path: PathBuf, source: crate::Error },
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> SiteError + '_ {
    move |source| SiteError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Text after the first line that starts with `# `, trimmed.
pub fn extract_title(markdown: &str) -> Option<String> {
    markdown
        .lines()
        .find_map(|line| line.strip_prefix("# "))
        .map(|title| title.trim().to_string())
}

/// Substitute the title and rendered content into a template. Neither value
/// is escaped.
pub fn fill_template(template: &str, title: &str, content: &str) -> String {
    template
        .replace(TITLE_PLACEHOLDER, title)
        .replace(CONTENT_PLACEHOLDER, content)
}

/// Convert one markdown file into a full HTML page at `dest`.
pub fn generate_page(
    from: &Path,
    template_path: &Path,
    dest: &Path,
    config: &RenderConfig,
) -> Result<(), SiteError> {
    info!(
        "Generating page from {} to {} using {}",
        from.display(),
        dest.display(),
        template_path.display()
    );

    let markdown = fs::read_to_string(from).map_err(io_err(from))?;
    let template = fs::read_to_string(template_path).map_err(io_err(template_path))?;

    let content =
        crate::markdown_to_html_with(&markdown, config).map_err(|source| SiteError::Convert {
            path: from.to_path_buf(),
            source,
        })?;
    let title = extract_title(&markdown).ok_or_else(|| SiteError::MissingTitle {
        path: from.to_path_buf(),
    })?;

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(io_err(parent))?;
    }
    fs::write(dest, fill_template(&template, &title, &content)).map_err(io_err(dest))
}

/// Generate a page for every `.md` file under `content_dir`, mirroring the
/// directory layout under `dest_dir`. Returns the written paths in visit
/// order. Stops at the first failure; pages already written are kept.
pub fn generate_pages_recursive(
    content_dir: &Path,
    template_path: &Path,
    dest_dir: &Path,
    config: &RenderConfig,
) -> Result<Vec<PathBuf>, SiteError> {
    let mut written = Vec::new();
    walk_content(content_dir, template_path, dest_dir, config, &mut written)?;
    Ok(written)
}

fn walk_content(
    dir: &Path,
    template_path: &Path,
    dest_dir: &Path,
    config: &RenderConfig,
    written: &mut Vec<PathBuf>,
) -> Result<(), SiteError> {
    debug!("Checking directory: {}", dir.display());
    for entry in sorted_entries(dir)? {
        let Some(name) = entry.file_name() else {
            continue;
        };
        let dest = dest_dir.join(name);

        if entry.is_dir() {
            walk_content(&entry, template_path, &dest, config, written)?;
        } else if entry.extension().is_some_and(|ext| ext == "md") {
            let dest = dest.with_extension("html");
            generate_page(&entry, template_path, &dest, config)?;
            written.push(dest);
        } else {
            debug!("ignoring {}", entry.display());
        }
    }
    Ok(())
}

/// Replace `dest` with a fresh copy of `src`. A missing `src` leaves an
/// empty `dest`.
pub fn copy_static(src: &Path, dest: &Path) -> Result<(), SiteError> {
    if dest.exists() {
        fs::remove_dir_all(dest).map_err(io_err(dest))?;
        debug!("Deleted {}", dest.display());
    }
    fs::create_dir_all(dest).map_err(io_err(dest))?;

    if !src.exists() {
        info!("No static directory at {}", src.display());
        return Ok(());
    }
    info!("Copying {} to {}", src.display(), dest.display());
    copy_tree(src, dest)
}

fn copy_tree(src: &Path, dest: &Path) -> Result<(), SiteError> {
    for entry in sorted_entries(src)? {
        let Some(name) = entry.file_name() else {
            continue;
        };
        let target = dest.join(name);
        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(io_err(&target))?;
            copy_tree(&entry, &target)?;
        } else {
            fs::copy(&entry, &target).map_err(io_err(&entry))?;
            debug!("Copied {}", target.display());
        }
    }
    Ok(())
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, SiteError> {
    let mut entries = fs::read_dir(dir)
        .map_err(io_err(dir))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_err(dir))?;
    entries.sort();
    Ok(entries)
}

/// Copy static assets, then generate every page.
pub fn build_site(site: &SiteConfig, render: &RenderConfig) -> Result<Vec<PathBuf>, SiteError> {
    copy_static(&site.static_dir, &site.output_dir)?;
    generate_pages_recursive(&site.content_dir, &site.template, &site.output_dir, render)
}
