//! Key-value store port - persistence abstraction
//!
//! Values are strings; the stores above this port encode them as JSON.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::result::Result;

/// A single mutation inside a [`WriteBatch`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    Set { key: String, value: String },
    Remove { key: String },
}

impl WriteOp {
    pub fn key(&self) -> &str {
        match self {
            WriteOp::Set { key, .. } | WriteOp::Remove { key } => key,
        }
    }
}

/// Ordered set of writes committed together
///
/// Implementations must apply either every op or none of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.ops.push(WriteOp::Set {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Encode `value` as JSON and queue it
    pub fn set_json<T: Serialize + ?Sized>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<&mut Self> {
        let encoded = serde_json::to_string(value)?;
        Ok(self.set(key, encoded))
    }

    pub fn remove(&mut self, key: impl Into<String>) -> &mut Self {
        self.ops.push(WriteOp::Remove { key: key.into() });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }
}

/// Persisted string map
///
/// This is the only shared resource of the stores. Single operations are
/// last-writer-wins; multi-key updates go through [`KeyValueStore::apply`].
pub trait KeyValueStore: Send + Sync {
    /// Read a value
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or replace a value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value; deleting a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;

    /// List keys starting with `prefix`, sorted
    fn keys(&self, prefix: &str) -> Result<Vec<String>>;

    /// Atomically apply a batch of writes in order
    fn apply(&self, batch: WriteBatch) -> Result<()>;
}

/// JSON helpers for every [`KeyValueStore`]
pub trait KeyValueStoreExt: KeyValueStore {
    /// Read and decode a JSON value
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Read a JSON value, falling back to `T::default()` when absent
    fn get_json_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
        Ok(self.get_json(key)?.unwrap_or_default())
    }

    /// Encode and store a JSON value
    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let encoded = serde_json::to_string(value)?;
        self.set(key, &encoded)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_preserves_order() {
        let mut batch = WriteBatch::new();
        batch.set("a", "1").remove("b");
        batch.set_json("c", &vec![1, 2]).unwrap();

        assert_eq!(batch.len(), 3);
        assert_eq!(batch.ops()[0].key(), "a");
        assert_eq!(batch.ops()[1], WriteOp::Remove { key: "b".to_string() });
        assert_eq!(
            batch.ops()[2],
            WriteOp::Set { key: "c".to_string(), value: "[1,2]".to_string() }
        );
    }
}
