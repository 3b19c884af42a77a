//! JSON codec for [`DataDoc`] trees.
//!
//! The structural mapping is symmetric in both directions:
//!
//! - a single-value item ⇄ a typed JSON scalar
//! - a multi-value item ⇄ a JSON array of typed scalars
//! - a named child-document group ⇄ a JSON array of objects
//!
//! On load, types are inferred from the JSON token kinds: whole numbers
//! become `Integer` items, numbers with a fractional part become `Double`,
//! and every item's title is derived from its field name via
//! [`name_to_title`].

use serde_json::{Map, Number, Value};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::debug;

use strata_data::types::{create_double, create_int, create_long, name_to_title, str_to_bool};
use strata_data::{DataDoc, DataItem, DataType};

use crate::error::CodecError;

/// Saves and loads data documents as JSON objects.
#[derive(Debug, Default)]
pub struct DataDocJson;

impl DataDocJson {
    pub fn new() -> Self {
        DataDocJson
    }

    // ------------------------------------------------------------------
    // Save
    // ------------------------------------------------------------------

    /// Encodes the document as a JSON value tree. Items without values are
    /// omitted; child groups follow the items as arrays of objects.
    pub fn to_value(&self, doc: &DataDoc) -> Result<Value, CodecError> {
        let mut object = Map::new();
        for item in doc.items() {
            if item.is_value_assigned() {
                object.insert(item.name().to_string(), item_to_value(item)?);
            }
        }
        for (name, group) in doc.child_docs() {
            let children = group
                .iter()
                .map(|child| self.to_value(child))
                .collect::<Result<Vec<_>, _>>()?;
            object.insert(name.clone(), Value::Array(children));
        }
        Ok(Value::Object(object))
    }

    /// Encodes the document as pretty-printed JSON text.
    pub fn save_to_string(&self, doc: &DataDoc) -> Result<String, CodecError> {
        let value = self.to_value(doc)?;
        Ok(serde_json::to_string_pretty(&value)?)
    }

    /// Writes the document as UTF-8 JSON to the writer.
    pub fn save_to_writer<W: Write>(&self, writer: W, doc: &DataDoc) -> Result<(), CodecError> {
        let value = self.to_value(doc)?;
        serde_json::to_writer_pretty(writer, &value)?;
        Ok(())
    }

    /// Writes the document as UTF-8 JSON to the file, creating or
    /// truncating it.
    pub fn save_to_file(&self, path: impl AsRef<Path>, doc: &DataDoc) -> Result<(), CodecError> {
        let path = path.as_ref();
        let file = File::create(path)?;
        self.save_to_writer(BufWriter::new(file), doc)?;
        debug!(path = %path.display(), items = doc.count(), "saved document as JSON");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Load
    // ------------------------------------------------------------------

    /// Decodes a document from JSON text.
    pub fn load_from_str(&self, json: &str) -> Result<DataDoc, CodecError> {
        if json.is_empty() {
            return Err(CodecError::malformed("JSON string is empty"));
        }
        let value: Value = serde_json::from_str(json)?;
        self.from_value(&value)
    }

    /// Decodes a document from a UTF-8 JSON stream.
    pub fn load_from_reader<R: Read>(&self, reader: R) -> Result<DataDoc, CodecError> {
        let value: Value = serde_json::from_reader(reader)?;
        self.from_value(&value)
    }

    /// Decodes a document from a JSON file.
    pub fn load_from_file(&self, path: impl AsRef<Path>) -> Result<DataDoc, CodecError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CodecError::resource_unavailable(path));
        }
        let file = File::open(path)?;
        let doc = self.load_from_reader(BufReader::new(file))?;
        debug!(path = %path.display(), items = doc.count(), "loaded document from JSON");
        Ok(doc)
    }

    /// Decodes a document from an already-parsed JSON value tree. The root
    /// must be an object.
    pub fn from_value(&self, value: &Value) -> Result<DataDoc, CodecError> {
        let object = value
            .as_object()
            .ok_or_else(|| CodecError::malformed("top-level JSON value is not an object"))?;
        let mut doc = DataDoc::new("json_document");
        self.load_object(object, &mut doc)?;
        Ok(doc)
    }

    fn load_object(
        &self,
        object: &Map<String, Value>,
        parent: &mut DataDoc,
    ) -> Result<(), CodecError> {
        for (name, value) in object {
            let title = name_to_title(name);
            match value {
                // A null field is consumed and dropped.
                Value::Null => {}
                Value::Bool(_) | Value::Number(_) | Value::String(_) => {
                    let mut item = DataItem::titled(name.as_str(), title);
                    add_scalar(&mut item, value)?;
                    parent.add(item);
                }
                Value::Array(elements) => {
                    if matches!(elements.first(), Some(Value::Object(_))) {
                        // Repeated child-document group.
                        for element in elements {
                            let child_object = element.as_object().ok_or_else(|| {
                                CodecError::malformed(format!(
                                    "array '{}' mixes objects with other values",
                                    name
                                ))
                            })?;
                            let mut child = DataDoc::new(name.as_str());
                            self.load_object(child_object, &mut child)?;
                            parent.add_child(child);
                        }
                    } else {
                        // One multi-value item, typed from its first element.
                        let mut item = DataItem::titled(name.as_str(), title);
                        for element in elements {
                            add_scalar(&mut item, element)?;
                        }
                        parent.add(item);
                    }
                }
                Value::Object(child_object) => {
                    let mut child = DataDoc::new(name.as_str());
                    self.load_object(child_object, &mut child)?;
                    parent.add_child(child);
                }
            }
        }
        Ok(())
    }
}

fn add_scalar(item: &mut DataItem, value: &Value) -> Result<(), CodecError> {
    match value {
        Value::Bool(flag) => item.add_value(*flag),
        Value::Number(number) => {
            if item.data_type() == DataType::Undefined {
                item.set_type(if number.is_f64() {
                    DataType::Double
                } else {
                    DataType::Integer
                });
            }
            item.add_value(number.to_string());
        }
        Value::String(text) => item.add_value(text.as_str()),
        other => {
            return Err(CodecError::malformed(format!(
                "non-primitive JSON value for item '{}': {}",
                item.name(),
                other
            )))
        }
    }
    Ok(())
}

fn item_to_value(item: &DataItem) -> Result<Value, CodecError> {
    let mut scalars = Vec::with_capacity(item.values().len());
    for raw in item.values() {
        scalars.push(scalar_value(item.data_type(), raw)?);
    }
    if scalars.len() == 1 {
        Ok(scalars.pop().unwrap())
    } else {
        Ok(Value::Array(scalars))
    }
}

fn scalar_value(data_type: DataType, raw: &str) -> Result<Value, CodecError> {
    let value = match data_type {
        DataType::Integer => Value::from(create_int(raw)),
        DataType::Long => Value::from(create_long(raw)),
        DataType::Float | DataType::Double => {
            let number = create_double(raw)?;
            Number::from_f64(number)
                .map(Value::Number)
                .ok_or_else(|| CodecError::malformed(format!("'{}' is not a finite number", raw)))?
        }
        DataType::Boolean => Value::Bool(str_to_bool(raw)),
        _ => Value::String(raw.to_string()),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_number_kinds_on_load() {
        let codec = DataDocJson::new();
        let doc = codec
            .load_from_str(r#"{"count": 3, "ratio": 0.5, "label": "x", "on": true}"#)
            .unwrap();
        assert_eq!(doc.item_by_name("count").unwrap().data_type(), DataType::Integer);
        assert_eq!(doc.item_by_name("ratio").unwrap().data_type(), DataType::Double);
        assert_eq!(doc.item_by_name("label").unwrap().data_type(), DataType::Text);
        assert_eq!(doc.item_by_name("on").unwrap().data_type(), DataType::Boolean);
    }

    #[test]
    fn test_titles_derive_from_field_names() {
        let codec = DataDocJson::new();
        let doc = codec.load_from_str(r#"{"employee_name": "Ada"}"#).unwrap();
        let item = doc.item_by_name("employee_name").unwrap();
        assert_eq!(item.title(), "Employee Name");
    }

    #[test]
    fn test_null_fields_are_dropped() {
        let codec = DataDocJson::new();
        let doc = codec.load_from_str(r#"{"a": null, "b": 1}"#).unwrap();
        assert_eq!(doc.count(), 1);
        assert!(doc.item_by_name_optional("a").is_none());
    }

    #[test]
    fn test_scalar_array_becomes_multi_value_item() {
        let codec = DataDocJson::new();
        let doc = codec.load_from_str(r#"{"a": [1, 2, 3]}"#).unwrap();
        assert_eq!(doc.count(), 1);
        let item = doc.item_by_name("a").unwrap();
        assert_eq!(item.data_type(), DataType::Integer);
        assert!(item.is_multi_value());
        assert_eq!(item.values_as_i32(), [1, 2, 3]);
    }

    #[test]
    fn test_object_array_becomes_child_group() {
        let codec = DataDocJson::new();
        let doc = codec
            .load_from_str(r#"{"id": 7, "line_items": [{"sku": "A"}, {"sku": "B"}]}"#)
            .unwrap();
        assert_eq!(doc.count(), 1);
        let group = doc.child_docs_by_name("line_items").unwrap();
        assert_eq!(group.len(), 2);
        assert_eq!(group[1].value_by_name("sku"), "B");
    }

    #[test]
    fn test_nested_object_becomes_child() {
        let codec = DataDocJson::new();
        let doc = codec
            .load_from_str(r#"{"address": {"city": "Boston"}}"#)
            .unwrap();
        let group = doc.child_docs_by_name("address").unwrap();
        assert_eq!(group[0].value_by_name("city"), "Boston");
    }

    #[test]
    fn test_single_vs_multi_value_emission() {
        let codec = DataDocJson::new();
        let mut doc = DataDoc::new("doc");
        doc.add(DataItem::new(DataType::Integer, "single").with_value(1));
        doc.add(
            DataItem::new(DataType::Integer, "multi")
                .with_value(1)
                .with_value(2),
        );
        doc.add(DataItem::new(DataType::Text, "empty"));

        let value = codec.to_value(&doc).unwrap();
        assert_eq!(value["single"], Value::from(1));
        assert_eq!(value["multi"], Value::from(vec![1, 2]));
        assert!(value.get("empty").is_none());
    }

    #[test]
    fn test_top_level_must_be_object() {
        let codec = DataDocJson::new();
        assert!(matches!(
            codec.load_from_str("[1, 2]"),
            Err(CodecError::Malformed(_))
        ));
        assert!(matches!(
            codec.load_from_str(""),
            Err(CodecError::Malformed(_))
        ));
        assert!(matches!(
            codec.load_from_str("{not json"),
            Err(CodecError::Json(_))
        ));
    }
}
