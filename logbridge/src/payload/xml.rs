//! First-level XML element extraction (N1MM style broadcasts).
//!
//! N1MM Logger+ sends documents like
//! `<contactinfo><call>K1ABC</call><band>20m</band>...</contactinfo>`.
//! Only the direct children of the root become fields; anything nested
//! deeper stays inside `data_raw`.

use roxmltree::{Document, Node, ParsingOptions};

use super::{ExtractError, FieldMap};

/// Extract the direct children of the root element.
///
/// Keys are local tag names, values the element's leading text (empty when
/// the element has none). A repeated tag keeps its last value.
pub fn extract_xml(text: &str) -> Result<FieldMap, ExtractError> {
    let mut options = ParsingOptions::default();
    options.allow_dtd = true;
    let doc = Document::parse_with_options(text, options)?;

    let fields = doc
        .root_element()
        .children()
        .filter(|node| node.is_element())
        .map(|child| {
            // roxmltree resolves namespaces; name() never carries the `{uri}` part
            let key = child.tag_name().name().to_string();
            (key, leading_text(child))
        })
        .collect();

    Ok(fields)
}

/// Text before the first child element, with comments and processing
/// instructions skipped rather than ending the run.
fn leading_text(element: Node<'_, '_>) -> String {
    let mut text = String::new();
    for node in element.children() {
        if node.is_element() {
            break;
        }
        if node.is_text() {
            text.push_str(node.text().unwrap_or_default());
        }
    }
    text
}
