use std::io::Cursor;

use plist::Value;

use crate::error::ConvertError;
use crate::graph::{Graph, Node};

/// Archives store object references as UIDs into a flat pool; a chain longer
/// than this means the pool references itself.
const MAX_DEPTH: usize = 64;

/// Decode a keyed archive (binary or XML property list) into an object
/// graph.
///
/// A keyed archive is a property-list dictionary with an `$objects` pool and
/// a `$top.root` entry pointing into it. Values reference each other by UID;
/// collections are wrapped (`NS.keys`/`NS.objects` for dictionaries,
/// `NS.objects` for arrays, `NS.data`/`NS.string` for data and string
/// objects). This flattens the pool into nested [`Graph`] mappings.
pub fn decode(bytes: &[u8]) -> Result<Graph, ConvertError> {
    let value = Value::from_reader(Cursor::new(bytes))?;
    let archive = value
        .as_dictionary()
        .ok_or(ConvertError::Decode("top level is not a dictionary"))?;

    let objects = archive
        .get("$objects")
        .and_then(Value::as_array)
        .ok_or(ConvertError::Decode("missing $objects pool"))?;
    let root = archive
        .get("$top")
        .and_then(Value::as_dictionary)
        .and_then(|top| top.get("root"))
        .ok_or(ConvertError::Decode("missing $top.root reference"))?;

    match materialize(root, objects, 0)? {
        Some(Node::Graph(graph)) => Ok(graph),
        _ => Err(ConvertError::Decode("root object is not a dictionary")),
    }
}

/// Resolve one pool value into a [`Node`]. `None` means the value is the
/// archive's `$null` marker (or something we deliberately drop, like dates).
fn materialize(
    value: &Value,
    objects: &[Value],
    depth: usize,
) -> Result<Option<Node>, ConvertError> {
    if depth > MAX_DEPTH {
        return Err(ConvertError::Decode("reference cycle in object pool"));
    }

    match value {
        Value::Uid(uid) => {
            let target = objects
                .get(uid.get() as usize)
                .ok_or(ConvertError::Decode("dangling object reference"))?;
            if matches!(target, Value::String(s) if s == "$null") {
                return Ok(None);
            }
            materialize(target, objects, depth + 1)
        }
        Value::String(s) => Ok(Some(Node::String(s.clone()))),
        Value::Boolean(b) => Ok(Some(Node::Bool(*b))),
        Value::Integer(i) => {
            let i = i
                .as_signed()
                .ok_or(ConvertError::Decode("integer out of i64 range"))?;
            Ok(Some(Node::Int(i)))
        }
        // Times in recipe archives are whole seconds; a real here is the
        // same field written by an older exporter.
        Value::Real(r) => Ok(Some(Node::Int(*r as i64))),
        Value::Data(data) => Ok(Some(Node::Blob(data.clone()))),
        Value::Dictionary(dict) => materialize_object(dict, objects, depth),
        Value::Array(items) => {
            let mut list = Vec::with_capacity(items.len());
            for item in items {
                if let Some(node) = materialize(item, objects, depth + 1)? {
                    list.push(node);
                }
            }
            Ok(Some(Node::List(list)))
        }
        _ => Ok(None),
    }
}

fn materialize_object(
    dict: &plist::Dictionary,
    objects: &[Value],
    depth: usize,
) -> Result<Option<Node>, ConvertError> {
    // NSDictionary: parallel key/value UID arrays.
    if let (Some(keys), Some(values)) = (
        dict.get("NS.keys").and_then(Value::as_array),
        dict.get("NS.objects").and_then(Value::as_array),
    ) {
        let mut graph = Graph::new();
        for (key, value) in keys.iter().zip(values) {
            let key = match materialize(key, objects, depth + 1)? {
                Some(Node::String(s)) => s,
                _ => return Err(ConvertError::Decode("non-string dictionary key")),
            };
            if let Some(node) = materialize(value, objects, depth + 1)? {
                graph.insert(key, node);
            }
        }
        return Ok(Some(Node::Graph(graph)));
    }

    // NSArray / NSSet: member UIDs only.
    if let Some(items) = dict.get("NS.objects").and_then(Value::as_array) {
        let mut list = Vec::with_capacity(items.len());
        for item in items {
            if let Some(node) = materialize(item, objects, depth + 1)? {
                list.push(node);
            }
        }
        return Ok(Some(Node::List(list)));
    }

    // NSMutableData / NSMutableString wrappers around a single payload.
    if let Some(data) = dict.get("NS.data") {
        return materialize(data, objects, depth + 1);
    }
    if let Some(s) = dict.get("NS.string") {
        return materialize(s, objects, depth + 1);
    }

    // Any other keyed object: take its fields, skipping archiver bookkeeping.
    let mut graph = Graph::new();
    for (key, value) in dict.iter() {
        if key.starts_with('$') {
            continue;
        }
        if let Some(node) = materialize(value, objects, depth + 1)? {
            graph.insert(key.clone(), node);
        }
    }
    Ok(Some(Node::Graph(graph)))
}
