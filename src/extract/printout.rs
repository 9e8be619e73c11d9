use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A property value array as returned by the semantic query API.
///
/// Absent and present-but-empty are kept apart while decoding; callers decide
/// how each collapses into a domain default.
#[derive(Debug, Clone, PartialEq)]
pub enum Printout<T> {
    Absent,
    Empty,
    Values(Vec<T>),
}

impl<T> Default for Printout<T> {
    fn default() -> Self {
        Printout::Absent
    }
}

impl<T> Printout<T> {
    pub fn first(&self) -> Option<&T> {
        match self {
            Printout::Values(values) => values.first(),
            Printout::Absent | Printout::Empty => None,
        }
    }

    pub fn into_first(self) -> Option<T> {
        match self {
            Printout::Values(values) => values.into_iter().next(),
            Printout::Absent | Printout::Empty => None,
        }
    }

    /// Whole array; absent and empty both become an empty vec
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Printout::Values(values) => values,
            Printout::Absent | Printout::Empty => Vec::new(),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Printout::Absent)
    }
}

impl<T: Default> Printout<T> {
    /// First value, or the zero value when there is none
    pub fn first_or_default(self) -> T {
        self.into_first().unwrap_or_default()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Printout<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Vec::<T>::deserialize(deserializer)?;
        Ok(if values.is_empty() {
            Printout::Empty
        } else {
            Printout::Values(values)
        })
    }
}

/// One property of a record subobject: `{"label", "key", "typeid", "item": [...]}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Field<T> {
    #[serde(default)]
    pub item: Printout<T>,
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field {
            item: Printout::Absent,
        }
    }
}

impl<T> Field<T> {
    pub fn into_first(self) -> Option<T> {
        self.item.into_first()
    }
}

impl<T: Default> Field<T> {
    pub fn first_or_default(self) -> T {
        self.item.first_or_default()
    }
}

/// A reference to another page
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PageRef {
    pub fulltext: String,
}

/// Free text that upstream sometimes emits as a number or boolean
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Text(pub String);

impl Text {
    pub fn into_string(self) -> String {
        self.0
    }
}

impl<'de> Deserialize<'de> for Text {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(Text(s)),
            Value::Number(n) => Ok(Text(n.to_string())),
            Value::Bool(b) => Ok(Text(b.to_string())),
            other => Err(serde::de::Error::custom(format!(
                "expected text, found {}",
                other
            ))),
        }
    }
}

/// Integer from a JSON number or a decimal string; anything else is `None`
pub fn parse_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
