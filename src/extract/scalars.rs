use url::Url;

use crate::graph::Graph;

/// Recipe title, trimmed. Always yields a value: an archive without a name
/// converts to an empty title rather than failing.
pub fn name(graph: &Graph) -> String {
    graph.string("name").map(str::trim).unwrap_or_default().to_string()
}

/// Parse the `source` field as a URL. On success returns the raw field text
/// (kept byte-for-byte for `source_url`) and the host with one leading
/// `www.` stripped (for `source`). Unparseable text yields nothing.
pub fn source(graph: &Graph) -> Option<(String, Option<String>)> {
    let raw = graph.string("source")?;
    let url = Url::parse(raw).ok()?;
    let host = url
        .host_str()
        .map(|h| h.strip_prefix("www.").unwrap_or(h).to_string());
    Some((raw.to_string(), host))
}

pub fn servings(graph: &Graph) -> Option<&str> {
    graph.string("servings")
}

pub fn notes(graph: &Graph) -> Option<&str> {
    graph.string("notes")
}

/// Total time as display text. A stored zero means "no time recorded", so
/// both zero and absence yield nothing.
pub fn total_time(graph: &Graph) -> Option<String> {
    let seconds = graph.int("time")?;
    if seconds == 0 {
        return None;
    }
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours > 0 {
        Some(format!("{hours} hr {minutes} min"))
    } else {
        Some(format!("{minutes} min"))
    }
}

/// True only for a present, non-zero `favorite` flag.
pub fn favorite(graph: &Graph) -> bool {
    graph.int("favorite").is_some_and(|f| f != 0)
}
