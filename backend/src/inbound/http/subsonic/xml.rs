//! XML rendering of the response envelope.
//!
//! Follows the Subsonic layout: scalar fields become attributes of the
//! enclosing element, objects become child elements, arrays repeat the child
//! element once per item, and `null` fields are dropped.

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use serde_json::{Map, Value};

use super::encode::EncodeError;
use crate::domain::{Envelope, XMLNS};

const ROOT: &str = "subsonic-response";

/// Serialise `envelope` to XML bytes without a declaration.
pub(crate) fn to_vec(envelope: &Envelope) -> Result<Vec<u8>, EncodeError> {
    let response = &envelope.response;
    let mut root = Map::new();
    root.insert(
        "status".to_owned(),
        Value::String(response.status.as_str().to_owned()),
    );
    root.insert("version".to_owned(), Value::String(response.version.clone()));
    root.insert("xmlns".to_owned(), Value::String(XMLNS.to_owned()));
    if let Some(error) = &response.error {
        let mut fields = Map::new();
        fields.insert("code".to_owned(), Value::from(error.code));
        fields.insert("message".to_owned(), Value::String(error.message.clone()));
        root.insert("error".to_owned(), Value::Object(fields));
    }
    for (key, value) in response.payload.iter() {
        if root.contains_key(key) {
            return Err(EncodeError::ReservedName(key.clone()));
        }
        root.insert(key.clone(), value.clone());
    }

    let mut writer = Writer::new(Vec::new());
    write_object(&mut writer, ROOT, &root)?;
    Ok(writer.into_inner())
}

fn write_object(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    fields: &Map<String, Value>,
) -> Result<(), EncodeError> {
    let name = checked_name(name)?;
    let mut start = BytesStart::new(name);
    let mut children = Vec::new();
    for (key, value) in fields {
        match value {
            Value::Null => {}
            Value::Array(items) if items.is_empty() => {}
            Value::Object(_) | Value::Array(_) => children.push((key.as_str(), value)),
            scalar => {
                let text = scalar_text(scalar);
                start.push_attribute((checked_name(key)?, text.as_str()));
            }
        }
    }

    if children.is_empty() {
        emit(writer, Event::Empty(start))?;
        return Ok(());
    }
    emit(writer, Event::Start(start))?;
    for (key, value) in children {
        write_value(writer, key, value)?;
    }
    emit(writer, Event::End(BytesEnd::new(name)))
}

fn write_value(writer: &mut Writer<Vec<u8>>, name: &str, value: &Value) -> Result<(), EncodeError> {
    match value {
        Value::Null => Ok(()),
        Value::Object(fields) => write_object(writer, name, fields),
        Value::Array(items) => {
            for item in items {
                write_value(writer, name, item)?;
            }
            Ok(())
        }
        scalar => {
            let name = checked_name(name)?;
            let text = scalar_text(scalar);
            emit(writer, Event::Start(BytesStart::new(name)))?;
            emit(writer, Event::Text(BytesText::new(&text)))?;
            emit(writer, Event::End(BytesEnd::new(name)))
        }
    }
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), EncodeError> {
    writer
        .write_event(event)
        .map_err(|error| EncodeError::Xml(error.to_string()))
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn checked_name(name: &str) -> Result<&str, EncodeError> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|first| first.is_alphabetic() || first == '_' || first == ':');
    let valid_rest =
        chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | ':' | '-' | '.'));
    if valid_start && valid_rest {
        Ok(name)
    } else {
        Err(EncodeError::InvalidName(name.to_owned()))
    }
}
