pub mod images;
pub mod lists;
pub mod scalars;

use serde_yaml::{Mapping, Value};

use crate::error::ConvertError;
use crate::graph::Graph;
use crate::yaml;
use images::Fetcher;

/// Build the output record from a decoded archive. Fields are inserted in a
/// fixed order and only when present; an optional field with no source data
/// has no entry at all, never a null.
///
/// `fetcher` is `None` when images are excluded, which skips the whole
/// image step including any network access.
pub fn assemble(
    graph: &Graph,
    fetcher: Option<&dyn Fetcher>,
) -> Result<Mapping, ConvertError> {
    let mut recipe = Mapping::new();
    recipe.insert("name".into(), scalars::name(graph).into());
    recipe.insert("ingredients".into(), lists::ingredients(graph)?.into());
    recipe.insert("directions".into(), lists::directions(graph)?.into());

    if let Some((source_url, host)) = scalars::source(graph) {
        if let Some(host) = host {
            recipe.insert("source".into(), host.into());
        }
        recipe.insert("source_url".into(), source_url.into());
    }
    if let Some(servings) = scalars::servings(graph) {
        recipe.insert("servings".into(), servings.into());
    }
    if let Some(total_time) = scalars::total_time(graph) {
        recipe.insert("total_time".into(), total_time.into());
    }
    if scalars::favorite(graph) {
        recipe.insert("on_favorites".into(), "yes".into());
    }
    if let Some(fetcher) = fetcher {
        if let Some(photo) = images::resolve(graph, fetcher) {
            recipe.insert("photo".into(), yaml::blob(&photo));
        }
    }
    if let Some(notes) = scalars::notes(graph) {
        recipe.insert("notes".into(), notes.into());
    }

    Ok(recipe)
}
