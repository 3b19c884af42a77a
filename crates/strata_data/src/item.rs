//! A single named, typed, possibly multi-value field with metadata.

use chrono::NaiveDateTime;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::DataError;
use crate::types::{
    create_date, create_double, create_float, create_int, create_long, str_to_bool, DataType,
    DataValue, STRING_TRUE, VALUE_SEPARATOR_CHAR,
};

/// A data item captures a field's type, name, title, features, values and
/// transient properties. Data items describe schema metadata and manage the
/// serialization of data values.
///
/// Values are stored in their canonical string form regardless of the
/// declared type; the typed getters parse on read. An item created without
/// an explicit type starts as [`DataType::Undefined`] and takes its type
/// from the first value assigned to it.
pub struct DataItem {
    name: String,
    title: String,
    data_type: DataType,
    values: Vec<String>,
    default_value: String,
    stored_size: u32,
    display_size: u32,
    is_stored: bool,
    is_required: bool,
    is_visible: bool,
    features: HashMap<String, String>,
    // Transient runtime state: never serialized, never cloned.
    properties: HashMap<String, Box<dyn Any>>,
}

impl DataItem {
    /// Constructs a data item with the given type and name.
    pub fn new(data_type: DataType, name: impl Into<String>) -> Self {
        let mut item = Self::empty();
        item.data_type = data_type;
        item.set_name(&name.into());
        item
    }

    /// Constructs an untyped data item with the given name and title. The
    /// type stays [`DataType::Undefined`] until a first value resolves it.
    pub fn titled(name: impl Into<String>, title: impl Into<String>) -> Self {
        let mut item = Self::empty();
        item.set_name(&name.into());
        item.set_title(&title.into());
        item
    }

    fn empty() -> Self {
        DataItem {
            name: String::new(),
            title: String::new(),
            data_type: DataType::Undefined,
            values: Vec::new(),
            default_value: String::new(),
            stored_size: 0,
            display_size: 0,
            is_stored: false,
            is_required: false,
            is_visible: true,
            features: HashMap::new(),
            properties: HashMap::new(),
        }
    }

    // ------------------------------------------------------------------
    // Fluent configuration
    // ------------------------------------------------------------------

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.set_title(&title.into());
        self
    }

    pub fn with_default_value(mut self, value: impl DataValue) -> Self {
        self.set_default_value(value);
        self
    }

    pub fn with_stored_size(mut self, size: u32) -> Self {
        self.stored_size = size;
        self
    }

    pub fn with_display_size(mut self, size: u32) -> Self {
        self.display_size = size;
        self
    }

    pub fn with_stored(mut self, is_stored: bool) -> Self {
        self.is_stored = is_stored;
        self
    }

    pub fn with_required(mut self, is_required: bool) -> Self {
        self.is_required = is_required;
        self
    }

    pub fn with_visible(mut self, is_visible: bool) -> Self {
        self.is_visible = is_visible;
        self
    }

    /// Adds a value, resolving an `Undefined` type from the value.
    pub fn with_value(mut self, value: impl DataValue) -> Self {
        self.add_value(value);
        self
    }

    /// Adds each non-empty value as text.
    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for value in values {
            self.add_value(value.into());
        }
        self
    }

    // ------------------------------------------------------------------
    // Identity and metadata
    // ------------------------------------------------------------------

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

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn set_type(&mut self, data_type: DataType) {
        self.data_type = data_type;
    }

    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    pub fn set_default_value(&mut self, value: impl DataValue) {
        self.default_value = value.to_value_string();
    }

    pub fn stored_size(&self) -> u32 {
        self.stored_size
    }

    pub fn set_stored_size(&mut self, size: u32) {
        self.stored_size = size;
    }

    pub fn display_size(&self) -> u32 {
        self.display_size
    }

    pub fn set_display_size(&mut self, size: u32) {
        self.display_size = size;
    }

    pub fn is_stored(&self) -> bool {
        self.is_stored
    }

    pub fn set_stored(&mut self, is_stored: bool) {
        self.is_stored = is_stored;
    }

    pub fn is_required(&self) -> bool {
        self.is_required
    }

    pub fn set_required(&mut self, is_required: bool) {
        self.is_required = is_required;
    }

    pub fn is_visible(&self) -> bool {
        self.is_visible
    }

    pub fn set_visible(&mut self, is_visible: bool) {
        self.is_visible = is_visible;
    }

    // ------------------------------------------------------------------
    // Values
    // ------------------------------------------------------------------

    /// Replaces the value list with a single value. An empty canonical
    /// string is a no-op. Resolves an `Undefined` type from the value.
    pub fn set_value(&mut self, value: impl DataValue) {
        let canonical = value.to_value_string();
        if canonical.is_empty() {
            return;
        }
        if self.data_type == DataType::Undefined {
            self.data_type = value.data_type();
        }
        self.values.clear();
        self.values.push(canonical);
    }

    /// Appends a value. An empty canonical string is a no-op. Resolves an
    /// `Undefined` type from the value.
    pub fn add_value(&mut self, value: impl DataValue) {
        let canonical = value.to_value_string();
        if canonical.is_empty() {
            return;
        }
        if self.data_type == DataType::Undefined {
            self.data_type = value.data_type();
        }
        self.values.push(canonical);
    }

    /// Appends a value only if it is not already present (linear scan,
    /// order preserving).
    pub fn add_value_unique(&mut self, value: impl DataValue) {
        let canonical = value.to_value_string();
        if canonical.is_empty() {
            return;
        }
        if self.data_type == DataType::Undefined {
            self.data_type = value.data_type();
        }
        if !self.values.iter().any(|v| *v == canonical) {
            self.values.push(canonical);
        }
    }

    /// Replaces the value list wholesale. Resolves an `Undefined` type to
    /// text.
    pub fn set_values(&mut self, values: Vec<String>) {
        self.values = values;
        if self.data_type == DataType::Undefined {
            self.data_type = DataType::Text;
        }
    }

    /// First value, or the empty string when unassigned.
    pub fn value(&self) -> &str {
        self.values.first().map(String::as_str).unwrap_or("")
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn clear_values(&mut self) {
        self.values.clear();
    }

    /// True when more than one value is assigned.
    pub fn is_multi_value(&self) -> bool {
        self.values.len() > 1
    }

    pub fn is_value_assigned(&self) -> bool {
        !self.values.is_empty()
    }

    pub fn is_value_empty(&self) -> bool {
        self.value().is_empty()
    }

    pub fn is_value_not_empty(&self) -> bool {
        !self.is_value_empty()
    }

    /// Values joined with the default `|` separator.
    pub fn collapsed_values(&self) -> String {
        self.collapsed_values_with(VALUE_SEPARATOR_CHAR)
    }

    /// Values joined with the given separator character.
    pub fn collapsed_values_with(&self, separator: char) -> String {
        self.values.join(&separator.to_string())
    }

    // ------------------------------------------------------------------
    // Typed getters - parse the canonical string form on read
    // ------------------------------------------------------------------

    /// First value through the tolerant digits-only `i32` parser.
    pub fn value_as_i32(&self) -> i32 {
        create_int(self.value())
    }

    pub fn values_as_i32(&self) -> Vec<i32> {
        self.values.iter().map(|v| create_int(v)).collect()
    }

    /// First value through the tolerant digits-only `i64` parser.
    pub fn value_as_i64(&self) -> i64 {
        create_long(self.value())
    }

    pub fn values_as_i64(&self) -> Vec<i64> {
        self.values.iter().map(|v| create_long(v)).collect()
    }

    pub fn value_as_f32(&self) -> Result<f32, DataError> {
        create_float(self.value())
    }

    pub fn values_as_f32(&self) -> Result<Vec<f32>, DataError> {
        self.values.iter().map(|v| create_float(v)).collect()
    }

    pub fn value_as_f64(&self) -> Result<f64, DataError> {
        create_double(self.value())
    }

    pub fn values_as_f64(&self) -> Result<Vec<f64>, DataError> {
        self.values.iter().map(|v| create_double(v)).collect()
    }

    pub fn value_as_bool(&self) -> bool {
        str_to_bool(self.value())
    }

    pub fn values_as_bool(&self) -> Vec<bool> {
        self.values.iter().map(|v| str_to_bool(v)).collect()
    }

    pub fn value_as_datetime(&self) -> Option<NaiveDateTime> {
        create_date(self.value())
    }

    /// True if the first value is a recognized truthy token.
    pub fn is_value_true(&self) -> bool {
        str_to_bool(self.value())
    }

    pub fn is_value_false(&self) -> bool {
        !self.is_value_true()
    }

    // ------------------------------------------------------------------
    // Features - open-ended named capabilities
    // ------------------------------------------------------------------

    /// Adds or replaces a feature. Well-known names live in
    /// [`types`](crate::types) (`FEATURE_IS_PRIMARY_KEY`, …); callers may
    /// define their own.
    pub fn add_feature(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.features.insert(name.into(), value.into());
    }

    /// Adds the feature with a value of `"true"`.
    pub fn enable_feature(&mut self, name: impl Into<String>) {
        self.features.insert(name.into(), STRING_TRUE.to_string());
    }

    /// Removes the feature entirely.
    pub fn disable_feature(&mut self, name: &str) {
        self.features.remove(name);
    }

    pub fn is_feature_assigned(&self, name: &str) -> bool {
        self.features.contains_key(name)
    }

    /// True when the feature is present with a truthy value.
    pub fn is_feature_true(&self, name: &str) -> bool {
        self.feature(name).map(str_to_bool).unwrap_or(false)
    }

    /// True when the feature is absent or present with a non-truthy value.
    pub fn is_feature_false(&self, name: &str) -> bool {
        !self.is_feature_true(name)
    }

    /// Case-insensitive comparison of the feature value.
    pub fn is_feature_equal(&self, name: &str, value: &str) -> bool {
        self.feature(name)
            .map(|v| v.eq_ignore_ascii_case(value))
            .unwrap_or(false)
    }

    pub fn feature(&self, name: &str) -> Option<&str> {
        self.features.get(name).map(String::as_str)
    }

    pub fn feature_as_i32(&self, name: &str) -> i32 {
        create_int(self.feature(name).unwrap_or(""))
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    pub fn clear_features(&mut self) {
        self.features.clear();
    }

    pub fn features(&self) -> &HashMap<String, String> {
        &self.features
    }

    // ------------------------------------------------------------------
    // Properties - transient, opaque runtime state
    // ------------------------------------------------------------------

    /// Attaches an application-defined property. Properties are transient:
    /// they survive neither cloning nor serialization.
    pub fn add_property(&mut self, name: impl Into<String>, value: impl Any) {
        self.properties.insert(name.into(), Box::new(value));
    }

    pub fn property(&self, name: &str) -> Option<&dyn Any> {
        self.properties.get(name).map(Box::as_ref)
    }

    pub fn update_property(&mut self, name: impl Into<String>, value: impl Any) {
        self.properties.insert(name.into(), Box::new(value));
    }

    pub fn delete_property(&mut self, name: &str) {
        self.properties.remove(name);
    }

    pub fn clear_properties(&mut self) {
        self.properties.clear();
    }

    // ------------------------------------------------------------------
    // Comparison
    // ------------------------------------------------------------------

    /// True when the collapsed value strings match.
    pub fn is_value_equal(&self, other: &DataItem) -> bool {
        self.collapsed_values() == other.collapsed_values()
    }

    /// True when both the name and the collapsed value strings match.
    pub fn is_equal(&self, other: &DataItem) -> bool {
        self.name == other.name && self.is_value_equal(other)
    }
}

impl Clone for DataItem {
    /// Deep-copies values and features but not transient properties.
    fn clone(&self) -> Self {
        DataItem {
            name: self.name.clone(),
            title: self.title.clone(),
            data_type: self.data_type,
            values: self.values.clone(),
            default_value: self.default_value.clone(),
            stored_size: self.stored_size,
            display_size: self.display_size,
            is_stored: self.is_stored,
            is_required: self.is_required,
            is_visible: self.is_visible,
            features: self.features.clone(),
            properties: HashMap::new(),
        }
    }
}

impl PartialEq for DataItem {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal(other)
    }
}

impl Eq for DataItem {}

impl Hash for DataItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.collapsed_values().hash(state);
    }
}

impl fmt::Display for DataItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] n = {}", self.data_type, self.name)?;
        if self.is_value_assigned() {
            write!(f, ", v = {}", self.collapsed_values())?;
        }
        if !self.default_value.is_empty() {
            write!(f, ", dv = {}", self.default_value)?;
        }
        if !self.title.is_empty() {
            write!(f, ", t = {}", self.title)?;
        }
        Ok(())
    }
}

impl fmt::Debug for DataItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataItem")
            .field("data_type", &self.data_type)
            .field("name", &self.name)
            .field("title", &self.title)
            .field("values", &self.values)
            .field("default_value", &self.default_value)
            .field("features", &self.features)
            .finish_non_exhaustive()
    }
}
