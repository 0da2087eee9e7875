use super::PackFormat;
use crate::error::PackError;
use serde_json::{Map, Value};

/// Return a copy of `template` with `pack.pack_format` and `pack.description` set.
///
/// Every other key, including ones this tool does not know about, passes
/// through untouched and in its original order.
pub fn inject(template: &Value, format: PackFormat, description: &str) -> Result<Value, PackError> {
    let mut document = template.clone();
    let pack = pack_section(&mut document)?;
    pack.insert("pack_format".to_string(), Value::from(format.get()));
    pack.insert(
        "description".to_string(),
        Value::String(description.to_string()),
    );
    Ok(document)
}

fn pack_section(document: &mut Value) -> Result<&mut Map<String, Value>, PackError> {
    let root = document
        .as_object_mut()
        .ok_or_else(|| malformed("top level is not a JSON object"))?;
    match root.get_mut("pack") {
        Some(Value::Object(pack)) => Ok(pack),
        Some(_) => Err(malformed("\"pack\" is not an object")),
        None => Err(malformed("missing \"pack\" section")),
    }
}

fn malformed(reason: &str) -> PackError {
    PackError::MalformedTemplate {
        path: None,
        reason: reason.to_string(),
    }
}
