//! Entry structure for key-value pairs

/// Represents a single entry in the store
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<V> {
    /// The key
    pub key: String,

    /// The value, stored without inspection
    pub value: V,
}

impl<V> Entry<V> {
    /// Create a new entry
    pub fn new(key: impl Into<String>, value: V) -> Self {
        Entry {
            key: key.into(),
            value,
        }
    }

    /// Replace the value, returning the previous one
    pub fn replace(&mut self, value: V) -> V {
        std::mem::replace(&mut self.value, value)
    }
}
