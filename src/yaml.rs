use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_yaml::value::{Tag, TaggedValue};
use serde_yaml::Value;

/// Local tag marking a base64 scalar that stands in for raw bytes. The YAML
/// core schema spells the same idea `tag:yaml.org,2002:binary`, which decode
/// accepts too.
const BINARY_TAG: &str = "binary";

pub fn encode(value: &Value) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(value)
}

pub fn decode(text: &str) -> Result<Value, serde_yaml::Error> {
    serde_yaml::from_str(text)
}

/// Wrap raw bytes as a tagged base64 scalar for embedding in a value tree.
pub fn blob(bytes: &[u8]) -> Value {
    Value::Tagged(Box::new(TaggedValue {
        tag: Tag::new(BINARY_TAG),
        value: Value::String(BASE64.encode(bytes)),
    }))
}

/// Recover raw bytes from a value produced by [`blob`] (or by another tool
/// writing core-schema `!!binary` scalars).
pub fn as_blob(value: &Value) -> Option<Vec<u8>> {
    let tagged = match value {
        Value::Tagged(t) => t,
        _ => return None,
    };
    if tagged.tag != BINARY_TAG && !tagged.tag.to_string().ends_with(":binary") {
        return None;
    }
    let text: String = tagged
        .value
        .as_str()?
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    BASE64.decode(text).ok()
}
