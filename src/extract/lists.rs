use crate::error::ConvertError;
use crate::graph::Graph;

/// Fetch a required structural list and sort it by display order. The sort
/// is stable, so entries sharing an order keep their archive order. Missing
/// list, non-mapping element, or an entry without `displayOrder` all mean
/// the archive cannot be converted.
fn sorted_entries<'a>(graph: &'a Graph, key: &str) -> Result<Vec<&'a Graph>, ConvertError> {
    let mut entries = graph
        .entries(key)
        .ok_or_else(|| ConvertError::Malformed(format!("missing `{key}` list")))?;
    if entries.iter().any(|e| e.int("displayOrder").is_none()) {
        return Err(ConvertError::Malformed(format!(
            "`{key}` entry without displayOrder"
        )));
    }
    entries.sort_by_key(|e| e.int("displayOrder"));
    Ok(entries)
}

/// Ingredient lines in display order, one per entry that carries text.
/// Textless entries vanish entirely instead of leaving blank lines.
pub fn ingredients(graph: &Graph) -> Result<String, ConvertError> {
    let entries = sorted_entries(graph, "Ingredient")?;
    Ok(entries
        .iter()
        .filter_map(|e| e.string("text"))
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Direction steps in display order, renumbered per section.
///
/// An entry whose text ends in `:` is a section header: it is emitted
/// verbatim and the steps after it restart from its display order. Every
/// other entry is numbered `displayOrder - section_start + 1`, so a section
/// whose steps follow their header contiguously numbers from 1.
pub fn directions(graph: &Graph) -> Result<String, ConvertError> {
    let entries = sorted_entries(graph, "Direction")?;

    let mut section_start = 0i64;
    let mut steps = Vec::with_capacity(entries.len());
    for entry in entries {
        let order = entry.int("displayOrder").unwrap_or(0);
        let text = entry.string("text").ok_or_else(|| {
            ConvertError::Malformed("`Direction` entry without text".into())
        })?;
        if text.ends_with(':') {
            section_start = order + 1;
            steps.push(text.to_string());
        } else {
            steps.push(format!("{}. {}", order - section_start + 1, text));
        }
    }
    Ok(steps.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Node;

    fn entry(order: i64, text: Option<&str>) -> Node {
        let mut g = Graph::new();
        g.insert("displayOrder", Node::Int(order));
        if let Some(text) = text {
            g.insert("text", Node::String(text.into()));
        }
        Node::Graph(g)
    }

    fn list(key: &str, entries: Vec<Node>) -> Graph {
        let mut g = Graph::new();
        g.insert(key, Node::List(entries));
        g
    }

    #[test]
    fn ingredients_sorted_by_display_order() {
        let g = list(
            "Ingredient",
            vec![
                entry(2, Some("1 cup flour")),
                entry(0, Some("2 eggs")),
                entry(1, Some("1 tsp salt")),
            ],
        );
        assert_eq!(ingredients(&g).unwrap(), "2 eggs\n1 tsp salt\n1 cup flour");
    }

    #[test]
    fn textless_ingredients_leave_no_blank_lines() {
        let g = list(
            "Ingredient",
            vec![entry(0, Some("2 eggs")), entry(1, None), entry(2, Some("milk"))],
        );
        assert_eq!(ingredients(&g).unwrap(), "2 eggs\nmilk");
    }

    #[test]
    fn empty_ingredient_list_is_empty_string() {
        let g = list("Ingredient", vec![]);
        assert_eq!(ingredients(&g).unwrap(), "");
    }

    #[test]
    fn missing_ingredient_list_is_malformed() {
        assert!(matches!(
            ingredients(&Graph::new()),
            Err(ConvertError::Malformed(_))
        ));
    }

    #[test]
    fn non_mapping_ingredient_element_is_malformed() {
        let g = list("Ingredient", vec![Node::Int(7)]);
        assert!(matches!(
            ingredients(&g),
            Err(ConvertError::Malformed(_))
        ));
    }

    #[test]
    fn ingredient_without_display_order_is_malformed() {
        let mut e = Graph::new();
        e.insert("text", Node::String("2 eggs".into()));
        let g = list("Ingredient", vec![Node::Graph(e)]);
        assert!(matches!(
            ingredients(&g),
            Err(ConvertError::Malformed(_))
        ));
    }

    #[test]
    fn directions_numbered_from_one() {
        let g = list(
            "Direction",
            vec![
                entry(0, Some("Preheat the oven.")),
                entry(1, Some("Mix everything.")),
                entry(2, Some("Bake for an hour.")),
            ],
        );
        assert_eq!(
            directions(&g).unwrap(),
            "1. Preheat the oven.\n\n2. Mix everything.\n\n3. Bake for an hour."
        );
    }

    #[test]
    fn header_resets_numbering_for_following_steps() {
        let g = list(
            "Direction",
            vec![
                entry(0, Some("Dough:")),
                entry(1, Some("Knead.")),
                entry(2, Some("Rest.")),
                entry(3, Some("Sauce:")),
                entry(4, Some("Simmer.")),
                entry(5, Some("Strain.")),
            ],
        );
        assert_eq!(
            directions(&g).unwrap(),
            "Dough:\n\n1. Knead.\n\n2. Rest.\n\nSauce:\n\n1. Simmer.\n\n2. Strain."
        );
    }

    #[test]
    fn display_order_gaps_carry_into_numbering() {
        let g = list(
            "Direction",
            vec![entry(0, Some("Chop.")), entry(1, Some("Fry.")), entry(3, Some("Serve."))],
        );
        assert_eq!(
            directions(&g).unwrap(),
            "1. Chop.\n\n2. Fry.\n\n4. Serve."
        );
    }

    #[test]
    fn directions_sorted_before_numbering() {
        let g = list(
            "Direction",
            vec![entry(1, Some("Second.")), entry(0, Some("First."))],
        );
        assert_eq!(directions(&g).unwrap(), "1. First.\n\n2. Second.");
    }

    #[test]
    fn direction_without_text_is_malformed() {
        let g = list("Direction", vec![entry(0, None)]);
        assert!(matches!(
            directions(&g),
            Err(ConvertError::Malformed(_))
        ));
    }

    #[test]
    fn missing_direction_list_is_malformed() {
        assert!(matches!(
            directions(&Graph::new()),
            Err(ConvertError::Malformed(_))
        ));
    }
}
