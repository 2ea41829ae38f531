//! The include-and-highlight operation: fetch a resource synchronously,
//! inject it into the named container, and move the menu highlight.

use crate::dom::{Document, NodeId};
use crate::fetch::Fetcher;
use crate::menu;
use crate::parse;

/// Diagnostic fragment shown when the fetch capability is absent or the
/// fetch fails. Byte-for-byte the text the original site shipped.
pub const FALLBACK_HTML: &str = "<div id='paragraph'><h1>Failure</h1> \
<p>Sorry, your browser does not support \
XMLHTTPRequest objects or it is not able to load \
local files. This page has only been tested on \
Firefox (Linux and Windows). Other compatible \
browsers may also exist.</p>\
<p>To make this page work in Chrome you can launch \
it with the flag <i>--allow-file-access-from-files</i> \
enabled to allow it reading from local files.</p>\
<p>You may still look at the Protocol \
Specification and the License text, which are \
included as PDF files.</p></div>";

/// Outcome of one include call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludeOutcome {
    /// The resource was fetched and injected.
    Loaded,
    /// The fetch was unavailable or failed; the fallback fragment was
    /// injected instead.
    Fallback,
}

/// Fetch `uri` and place its content into the element with the given id,
/// then mark `menu_entry` as the active menu element.
///
/// A missing container id is an error carrying the user-facing message;
/// nothing is mutated in that case. A failed or unavailable fetch is not
/// an error: the container receives [`FALLBACK_HTML`] and highlighting
/// still runs.
pub fn include_into(
    doc: &mut Document,
    id: &str,
    uri: &str,
    menu_entry: NodeId,
    fetcher: &Fetcher,
) -> Result<IncludeOutcome, String> {
    let target = doc.element_by_id(id).ok_or_else(|| missing_target(id))?;

    let outcome = match fetcher.fetch(uri) {
        Ok(result) => {
            let content = parse::parse_fragment(doc, &result.body);
            doc.replace_children(target, content);
            IncludeOutcome::Loaded
        }
        Err(_) => {
            let content = parse::parse_fragment(doc, FALLBACK_HTML);
            doc.replace_children(target, content);
            IncludeOutcome::Fallback
        }
    };

    menu::activate(doc, menu_entry);
    Ok(outcome)
}

/// The alert text for a container id that resolves to no element.
pub fn missing_target(id: &str) -> String {
    format!(
        "Bad id {} passed to clientSideInclude. \
         You need a div or span element with this id in your page.",
        id
    )
}
