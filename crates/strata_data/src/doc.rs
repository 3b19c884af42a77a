//! An ordered collection of items plus named groups of child documents.

use indexmap::IndexMap;
use std::fmt;

use crate::error::DataError;
use crate::item::DataItem;
use crate::types::DataValue;

/// A data document manages an insertion-ordered, name-keyed collection of
/// [`DataItem`]s and a name-keyed collection of ordered child-document
/// lists.
///
/// Children are grouped under the child document's own name at insertion
/// time, so several child documents can share one logical name (e.g.
/// repeated `line_items`). Children never reference their parent; ownership
/// is strictly downward, which makes cycles impossible by construction and
/// lets [`Clone`] hand out fully independent deep copies.
#[derive(Debug, Clone)]
pub struct DataDoc {
    name: String,
    title: String,
    action: String,
    items: IndexMap<String, DataItem>,
    child_docs: IndexMap<String, Vec<DataDoc>>,
}

impl DataDoc {
    /// Constructs a data document with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        DataDoc {
            name: name.into(),
            title: String::new(),
            action: String::new(),
            items: IndexMap::new(),
            child_docs: IndexMap::new(),
        }
    }

    /// Constructs a data document with the given name and title.
    pub fn titled(name: impl Into<String>, title: impl Into<String>) -> Self {
        let mut doc = Self::new(name);
        doc.set_title(&title.into());
        doc
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Assigns a name. Assigning an empty string is a no-op.
    pub fn set_name(&mut self, name: &str) {
        if !name.is_empty() {
            self.name = name.to_string();
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Assigns a title. Assigning an empty string is a no-op.
    pub fn set_title(&mut self, title: &str) {
        if !title.is_empty() {
            self.title = title.to_string();
        }
    }

    /// Free-form change marker - see `ACTION_ADD` / `ACTION_UPDATE` /
    /// `ACTION_DELETE` in [`types`](crate::types).
    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn set_action(&mut self, action: &str) {
        if !action.is_empty() {
            self.action = action.to_string();
        }
    }

    // ------------------------------------------------------------------
    // Item access
    // ------------------------------------------------------------------

    /// Returns the item matching the name, failing with
    /// [`DataError::NotFound`] when absent. Callers that prefer a tolerant
    /// lookup use [`item_by_name_optional`](Self::item_by_name_optional).
    pub fn item_by_name(&self, name: &str) -> Result<&DataItem, DataError> {
        self.items.get(name).ok_or_else(|| DataError::not_found(name))
    }

    pub fn item_by_name_mut(&mut self, name: &str) -> Result<&mut DataItem, DataError> {
        self.items
            .get_mut(name)
            .ok_or_else(|| DataError::not_found(name))
    }

    /// Returns the item matching the name, or `None` when absent.
    pub fn item_by_name_optional(&self, name: &str) -> Option<&DataItem> {
        self.items.get(name)
    }

    pub fn item_by_name_optional_mut(&mut self, name: &str) -> Option<&mut DataItem> {
        self.items.get_mut(name)
    }

    /// Assigns a value to the named item. A no-op when the name is absent.
    pub fn set_value_by_name(&mut self, name: &str, value: impl DataValue) {
        if let Some(item) = self.items.get_mut(name) {
            item.set_value(value);
        }
    }

    /// Adds a value to the named item. A no-op when the name is absent.
    pub fn add_value_by_name(&mut self, name: &str, value: impl DataValue) {
        if let Some(item) = self.items.get_mut(name) {
            item.add_value(value);
        }
    }

    /// First value of the named item, or the empty string when the name is
    /// absent.
    pub fn value_by_name(&self, name: &str) -> String {
        self.item_by_name_optional(name)
            .map(|item| item.value().to_string())
            .unwrap_or_default()
    }

    /// Typed read of the named item; fails with [`DataError::NotFound`]
    /// when the name is absent.
    pub fn value_as_bool(&self, name: &str) -> Result<bool, DataError> {
        Ok(self.item_by_name(name)?.value_as_bool())
    }

    pub fn value_as_i32(&self, name: &str) -> Result<i32, DataError> {
        Ok(self.item_by_name(name)?.value_as_i32())
    }

    pub fn value_as_i64(&self, name: &str) -> Result<i64, DataError> {
        Ok(self.item_by_name(name)?.value_as_i64())
    }

    pub fn value_as_f32(&self, name: &str) -> Result<f32, DataError> {
        self.item_by_name(name)?.value_as_f32()
    }

    pub fn value_as_f64(&self, name: &str) -> Result<f64, DataError> {
        self.item_by_name(name)?.value_as_f64()
    }

    // ------------------------------------------------------------------
    // Item mutation
    // ------------------------------------------------------------------

    /// Adds an item, keyed by its name. Re-adding a name overwrites the
    /// existing item in place, preserving its position.
    pub fn add(&mut self, item: DataItem) {
        self.items.insert(item.name().to_string(), item);
    }

    /// Updates an item by name - the same upsert as [`add`](Self::add).
    pub fn update(&mut self, item: DataItem) {
        self.add(item);
    }

    /// Removes the named item, preserving the order of the rest.
    pub fn remove(&mut self, name: &str) {
        self.items.shift_remove(name);
    }

    /// Count of items in the document.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in insertion order.
    pub fn items(&self) -> impl Iterator<Item = &DataItem> {
        self.items.values()
    }

    pub fn items_mut(&mut self) -> impl Iterator<Item = &mut DataItem> {
        self.items.values_mut()
    }

    // ------------------------------------------------------------------
    // Child documents
    // ------------------------------------------------------------------

    /// Adds a child document, grouped under the child's own name at the
    /// time of insertion.
    pub fn add_child(&mut self, doc: DataDoc) {
        if doc.name().is_empty() {
            return;
        }
        self.child_docs
            .entry(doc.name().to_string())
            .or_default()
            .push(doc);
    }

    /// Deletes the whole child group registered under the name.
    pub fn delete_child(&mut self, name: &str) {
        self.child_docs.shift_remove(name);
    }

    /// Count of child groups (not of individual child documents).
    pub fn children_count(&self) -> usize {
        self.child_docs.len()
    }

    /// The name-to-group map of child documents.
    pub fn child_docs(&self) -> &IndexMap<String, Vec<DataDoc>> {
        &self.child_docs
    }

    /// The ordered group of child documents registered under the name.
    pub fn child_docs_by_name(&self, name: &str) -> Option<&[DataDoc]> {
        self.child_docs.get(name).map(Vec::as_slice)
    }

    /// All child documents across every group, flattened in group order.
    pub fn children(&self) -> impl Iterator<Item = &DataDoc> {
        self.child_docs.values().flatten()
    }
}

impl fmt::Display for DataDoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{} items]", self.name, self.items.len())?;
        if !self.child_docs.is_empty() {
            write!(f, "[{} children]", self.child_docs.len())?;
        }
        if !self.title.is_empty() {
            write!(f, ", t = {}", self.title)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataType;

    fn sample_doc() -> DataDoc {
        let mut doc = DataDoc::titled("dish", "Menu Dish");
        doc.add(DataItem::new(DataType::Text, "name").with_value("pork"));
        doc.add(DataItem::new(DataType::Boolean, "vegetarian").with_value(false));
        doc.add(DataItem::new(DataType::Integer, "calories").with_value(800));
        doc
    }

    #[test]
    fn test_items_keep_insertion_order() {
        let doc = sample_doc();
        let names: Vec<&str> = doc.items().map(|item| item.name()).collect();
        assert_eq!(names, ["name", "vegetarian", "calories"]);
    }

    #[test]
    fn test_add_overwrites_in_place() {
        let mut doc = sample_doc();
        doc.update(DataItem::new(DataType::Boolean, "vegetarian").with_value(true));
        let names: Vec<&str> = doc.items().map(|item| item.name()).collect();
        assert_eq!(names, ["name", "vegetarian", "calories"]);
        assert!(doc.value_as_bool("vegetarian").unwrap());
        assert_eq!(doc.count(), 3);
    }

    #[test]
    fn test_strict_vs_optional_access() {
        let doc = sample_doc();
        assert!(doc.item_by_name("calories").is_ok());
        let err = doc.item_by_name("missing").unwrap_err();
        assert_eq!(err, DataError::not_found("missing"));
        assert!(doc.item_by_name_optional("missing").is_none());
    }

    #[test]
    fn test_value_setters_are_tolerant() {
        let mut doc = sample_doc();
        // Absent names are silently ignored.
        doc.set_value_by_name("missing", "x");
        doc.add_value_by_name("missing", "y");
        assert_eq!(doc.count(), 3);
        assert_eq!(doc.value_by_name("missing"), "");

        doc.set_value_by_name("calories", 700);
        assert_eq!(doc.value_as_i32("calories").unwrap(), 700);
    }

    #[test]
    fn test_typed_getters_fail_on_missing_name() {
        let doc = sample_doc();
        assert!(doc.value_as_i32("missing").is_err());
        assert!(doc.value_as_bool("missing").is_err());
    }

    #[test]
    fn test_remove() {
        let mut doc = sample_doc();
        doc.remove("vegetarian");
        let names: Vec<&str> = doc.items().map(|item| item.name()).collect();
        assert_eq!(names, ["name", "calories"]);
    }

    #[test]
    fn test_children_group_by_own_name() {
        let mut order = DataDoc::new("order");
        for sku in ["A-1", "A-2"] {
            let mut line = DataDoc::new("line_items");
            line.add(DataItem::new(DataType::Text, "sku").with_value(sku));
            order.add_child(line);
        }
        let mut shipping = DataDoc::new("shipping");
        shipping.add(DataItem::new(DataType::Text, "carrier").with_value("ups"));
        order.add_child(shipping);

        assert_eq!(order.children_count(), 2);
        assert_eq!(order.child_docs_by_name("line_items").unwrap().len(), 2);
        assert_eq!(order.children().count(), 3);

        order.delete_child("line_items");
        assert_eq!(order.children_count(), 1);
    }

    #[test]
    fn test_clone_is_deep_and_independent() {
        let mut original = sample_doc();
        let mut child = DataDoc::new("notes");
        child.add(DataItem::new(DataType::Text, "text").with_value("spicy"));
        original.add_child(child);

        let mut cloned = original.clone();
        for (left, right) in cloned.items().zip(original.items()) {
            assert!(left.is_equal(right));
        }

        cloned.set_value_by_name("calories", 100);
        cloned
            .item_by_name_optional_mut("name")
            .unwrap()
            .add_value("beef");
        assert_eq!(original.value_as_i32("calories").unwrap(), 800);
        assert_eq!(original.item_by_name("name").unwrap().values(), ["pork"]);
        assert_eq!(cloned.value_as_i32("calories").unwrap(), 100);
    }

    #[test]
    fn test_display_summary() {
        let mut doc = sample_doc();
        doc.add_child(DataDoc::new("notes"));
        assert_eq!(doc.to_string(), "dish [3 items][1 children], t = Menu Dish");
    }
}
