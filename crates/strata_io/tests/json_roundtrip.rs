//! Round-trip tests for the JSON codec.

use strata_data::{DataDoc, DataItem, DataType};
use strata_io::DataDocJson;

fn flat_doc() -> DataDoc {
    let mut doc = DataDoc::new("dish");
    doc.add(DataItem::new(DataType::Text, "name").with_value("pork"));
    doc.add(DataItem::new(DataType::Boolean, "vegetarian").with_value(false));
    doc.add(DataItem::new(DataType::Integer, "calories").with_value(800));
    doc.add(
        DataItem::new(DataType::Text, "tags")
            .with_value("meat")
            .with_value("grilled"),
    );
    doc.add(DataItem::new(DataType::Double, "rating").with_value(4.5));
    doc
}

fn flattened(doc: &DataDoc) -> Vec<(String, String)> {
    doc.items()
        .map(|item| (item.name().to_string(), item.collapsed_values()))
        .collect()
}

#[test]
fn flat_document_round_trips() {
    let codec = DataDocJson::new();
    let original = flat_doc();

    let json = codec.save_to_string(&original).unwrap();
    let reloaded = codec.load_from_str(&json).unwrap();

    assert_eq!(flattened(&original), flattened(&reloaded));
}

#[test]
fn scalar_array_loads_as_one_multi_value_item() {
    let codec = DataDocJson::new();
    let doc = codec.load_from_str(r#"{"a": [1, 2, 3]}"#).unwrap();

    assert_eq!(doc.count(), 1);
    let item = doc.item_by_name("a").unwrap();
    assert_eq!(item.data_type(), DataType::Integer);
    assert_eq!(item.values(), ["1", "2", "3"]);
    assert_eq!(item.collapsed_values(), "1|2|3");
}

#[test]
fn child_document_groups_round_trip() {
    let codec = DataDocJson::new();

    let mut order = DataDoc::new("order");
    order.add(DataItem::new(DataType::Integer, "id").with_value(7));
    for (sku, qty) in [("A-1", 2), ("B-9", 1)] {
        let mut line = DataDoc::new("line_items");
        line.add(DataItem::new(DataType::Text, "sku").with_value(sku));
        line.add(DataItem::new(DataType::Integer, "qty").with_value(qty));
        order.add_child(line);
    }

    let json = codec.save_to_string(&order).unwrap();
    let reloaded = codec.load_from_str(&json).unwrap();

    assert_eq!(reloaded.value_as_i32("id").unwrap(), 7);
    let group = reloaded.child_docs_by_name("line_items").unwrap();
    assert_eq!(group.len(), 2);
    assert_eq!(group[0].value_by_name("sku"), "A-1");
    assert_eq!(group[1].value_as_i32("qty").unwrap(), 1);

    // A second pass produces identical text - the mapping is symmetric.
    assert_eq!(codec.save_to_string(&reloaded).unwrap(), json);
}

#[test]
fn nested_single_object_round_trips_as_group_of_one() {
    let codec = DataDocJson::new();
    let doc = codec
        .load_from_str(r#"{"address": {"city": "Boston", "zip": "02134"}}"#)
        .unwrap();

    let json = codec.save_to_string(&doc).unwrap();
    let reloaded = codec.load_from_str(&json).unwrap();
    let group = reloaded.child_docs_by_name("address").unwrap();
    assert_eq!(group.len(), 1);
    assert_eq!(group[0].value_by_name("city"), "Boston");
    // Leading zeros survive because the field loads as text.
    assert_eq!(group[0].value_by_name("zip"), "02134");
}

#[test]
fn file_save_and_load() {
    let codec = DataDocJson::new();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dish.json");

    let original = flat_doc();
    codec.save_to_file(&path, &original).unwrap();
    let reloaded = codec.load_from_file(&path).unwrap();
    assert_eq!(flattened(&original), flattened(&reloaded));
}

#[test]
fn missing_file_is_resource_unavailable() {
    let codec = DataDocJson::new();
    let err = codec.load_from_file("/no/such/file.json").unwrap_err();
    assert!(matches!(
        err,
        strata_io::CodecError::ResourceUnavailable { .. }
    ));
}
