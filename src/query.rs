use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Name under which free text is reported.
pub const TEXT_FIELD: &str = "text";

/// Structured result of parsing one query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub(crate) text: Vec<String>,
    pub(crate) fields: Vec<(String, Field)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Keyword(KeywordValue),
    Range(RangeValue),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum KeywordValue {
    Scalar(String),
    List(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeValue {
    pub from: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TextValue<'a> {
    Scalar(&'a str),
    List(&'a [String]),
}

impl Query {
    /// Free text, if any was seen. A single entry is reported as a scalar.
    pub fn text(&self) -> Option<TextValue<'_>> {
        match self.text.as_slice() {
            [] => None,
            [single] => Some(TextValue::Scalar(single)),
            all => Some(TextValue::List(all)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|(field_name, _)| field_name == name)
            .map(|(_, field)| field)
    }

    pub fn keyword(&self, name: &str) -> Option<&KeywordValue> {
        match self.get(name)? {
            Field::Keyword(value) => Some(value),
            Field::Range(_) => None,
        }
    }

    pub fn range(&self, name: &str) -> Option<&RangeValue> {
        match self.get(name)? {
            Field::Range(value) => Some(value),
            Field::Keyword(_) => None,
        }
    }

    /// Named fields in the order they were first seen.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.fields.is_empty()
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields
            .iter_mut()
            .find(|(field_name, _)| field_name == name)
            .map(|(_, field)| field)
    }

    /// Replaces the value of `name`, keeping its original position.
    pub(crate) fn set(&mut self, name: &str, field: Field) {
        match self.get_mut(name) {
            Some(existing) => *existing = field,
            None => self.fields.push((name.to_string(), field)),
        }
    }
}

impl KeywordValue {
    pub fn as_slice(&self) -> &[String] {
        match self {
            Self::Scalar(value) => std::slice::from_ref(value),
            Self::List(values) => values,
        }
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Field::Keyword(value) => value.serialize(serializer),
            Field::Range(value) => value.serialize(serializer),
        }
    }
}

impl Serialize for Query {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let text = self.text();
        let len = self.fields.len() + usize::from(text.is_some());

        let mut map = serializer.serialize_map(Some(len))?;
        if let Some(text) = text {
            map.serialize_entry(TEXT_FIELD, &text)?;
        }
        for (name, field) in &self.fields {
            map.serialize_entry(name, field)?;
        }
        map.end()
    }
}
