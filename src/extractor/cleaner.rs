use kuchiki::{NodeRef, traits::TendrilSink};
use tracing::warn;

use crate::extractor::{
    boilerplate::{has_footer_marker, is_boilerplate_snippet},
    errors::ExtractError,
    model::{normalize_whitespace, truncate_content},
};

const NOISE_TAGS: &str = "script, style, head, footer, meta, link, noscript";
const HEADINGS: &str = "h1, h2, h3, h4, h5, h6";

/// Placeholder text node standing for a blank line in front of a heading.
/// Flattening turns it into an empty line; it never reaches the output.
const SECTION_BREAK: &str = "\u{2029}";

/// Clean one message down to readable text.
///
/// HTML is preferred whenever it is non-empty; plain text is used verbatim
/// otherwise. If the HTML cannot be processed the result is empty, there is
/// no fallback to the plain rendition.
pub fn clean_content(html: &str, plain: &str, max_length: usize) -> String {
    let content = if html.is_empty() {
        plain.to_string()
    } else {
        match strip_html(html) {
            Ok(text) => text,
            Err(err) => {
                warn!("Error extracting main content from HTML: {}", err);
                String::new()
            }
        }
    };

    if content.is_empty() {
        return content;
    }

    truncate_content(normalize_whitespace(&content), max_length)
}

/// Strip newsletter HTML down to text, one text node per line.
///
/// The passes run in a fixed order and each one only sees what the previous
/// ones left in the tree.
pub fn strip_html(html: &str) -> Result<String, ExtractError> {
    let document = kuchiki::parse_html().one(html);

    for node in select_nodes(&document, NOISE_TAGS)? {
        node.detach();
    }
    remove_marked_blocks(&document);
    linearize_links(&document)?;
    space_headings(&document)?;
    remove_boilerplate_snippets(&document);

    Ok(flatten_text(&document))
}

fn select_nodes(document: &NodeRef, selector: &str) -> Result<Vec<NodeRef>, ExtractError> {
    let selected = document
        .select(selector)
        .map_err(|()| ExtractError::Parse(format!("invalid selector '{}'", selector)))?;
    Ok(selected.map(|element| element.as_node().clone()).collect())
}

fn remove_marked_blocks(document: &NodeRef) {
    let nodes: Vec<NodeRef> = document.descendants().collect();
    for node in nodes {
        let marked = node.as_element().is_some_and(has_footer_marker);
        if marked {
            node.detach();
        }
    }
}

/// `<a href="u">text</a>` becomes the text node `[text](u)`. Anchors without
/// a usable href or without text keep their text and lose the link.
///
/// The link text is the anchor's full text with whitespace runs collapsed to
/// one space, so `<a href="u"><b>Read</b> more</a>` gives `[Read more](u)`.
/// Stripping each descendant string and concatenating them would give
/// `[Readmore](u)` instead.
fn linearize_links(document: &NodeRef) -> Result<(), ExtractError> {
    for anchor in select_nodes(document, "a")? {
        let href = anchor
            .as_element()
            .and_then(|element| element.attributes.borrow().get("href").map(str::to_string))
            .unwrap_or_default();
        let text = visible_text(&anchor);

        if !href.is_empty() && !href.starts_with('#') && !text.is_empty() {
            anchor.insert_before(NodeRef::new_text(format!("[{}]({})", text, href)));
            anchor.detach();
        }
    }
    Ok(())
}

fn visible_text(node: &NodeRef) -> String {
    node.text_contents()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn space_headings(document: &NodeRef) -> Result<(), ExtractError> {
    for heading in select_nodes(document, HEADINGS)? {
        heading.insert_before(NodeRef::new_text(SECTION_BREAK));
        heading.insert_after(NodeRef::new_text("\n"));
    }
    Ok(())
}

/// Drop the parent element of every short text node that reads like a
/// footer line.
fn remove_boilerplate_snippets(document: &NodeRef) {
    let text_nodes: Vec<NodeRef> = document
        .descendants()
        .filter(|node| node.as_text().is_some())
        .collect();

    for node in text_nodes {
        let snippet = node
            .as_text()
            .is_some_and(|text| is_boilerplate_snippet(&text.borrow()));
        if snippet && let Some(parent) = node.parent() {
            parent.detach();
        }
    }
}

fn flatten_text(document: &NodeRef) -> String {
    let mut lines: Vec<String> = Vec::new();

    for node in document.descendants() {
        let Some(text) = node.as_text() else {
            continue;
        };
        let text = text.borrow();
        if text.as_str() == SECTION_BREAK {
            lines.push(String::new());
            continue;
        }
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
    }

    lines.join("\n")
}
