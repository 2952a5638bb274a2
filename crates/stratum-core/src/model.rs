//! Model handles: a validated schema bound to a prefix-scoped store.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::codec;
use crate::error::{Result, ValueError};
use crate::record::Record;
use crate::schema::ModelSchema;
use crate::store::Store;
use crate::value::FieldValue;

/// A model bound to its slice of a store.
///
/// Binding scopes the store under `"{prefix}-"`, so two models with
/// different prefixes never collide even with identical key bytes. The
/// schema is shared behind an `Arc` and never mutated after binding.
pub struct Model<S: Store> {
    schema: Arc<ModelSchema>,
    store: S,
}

impl<S: Store> Model<S> {
    /// Bind a validated schema to `store`.
    pub fn bind(store: &S, schema: ModelSchema) -> Self {
        let scope = format!("{}-", schema.prefix());
        debug!(model = schema.name(), scope = %scope, "binding model");
        Self {
            store: store.scoped(scope.as_bytes()),
            schema: Arc::new(schema),
        }
    }

    pub fn schema(&self) -> &Arc<ModelSchema> {
        &self.schema
    }

    /// Build a record for this model from values in declaration order.
    pub fn record(&self, values: Vec<FieldValue>) -> Result<Record> {
        Record::new(&self.schema, values)
    }

    /// Build a record for this model from named values.
    pub fn record_from_named(&self, pairs: Vec<(&str, FieldValue)>) -> Result<Record> {
        Record::from_named(&self.schema, pairs)
    }

    /// Serialize and write `record`: a full overwrite of the stored value
    /// under the record's key bytes.
    pub fn save(&self, record: &Record) -> Result<()> {
        if record.schema() != self.schema.as_ref() {
            return Err(ValueError::SchemaMismatch {
                expected: self.schema.name().to_string(),
                actual: record.schema().name().to_string(),
            }
            .into());
        }
        let key = record.key_bytes()?;
        let value = record.to_bytes()?;
        trace!(
            model = self.schema.name(),
            key_len = key.len(),
            value_len = value.len(),
            "save"
        );
        self.store.put(&key, &value)?;
        Ok(())
    }

    /// Fetch one record by key value. `Ok(None)` when the key is absent;
    /// a present-but-unreadable value is a corruption error.
    pub fn get(&self, key: impl Into<FieldValue>) -> Result<Option<Record>> {
        let key = key.into();
        let key_bytes = codec::serialize_key(&self.schema.key_field().spec, &key)?;
        match self.store.get(&key_bytes)? {
            Some(data) => {
                trace!(model = self.schema.name(), "get hit");
                Ok(Some(Record::parse(&self.schema, key, &data)?))
            }
            None => Ok(None),
        }
    }

    /// Start building a range iteration over this model's records.
    pub fn iter(&self) -> IterBuilder<'_, S> {
        IterBuilder {
            model: self,
            start: None,
            stop: None,
        }
    }
}

/// Builder for a forward range scan over a model's keys.
///
/// Bounds are key values and use the key field's encoding. `start` is
/// inclusive; `stop` follows the underlying store's convention (exclusive
/// for [`MemoryStore`](crate::store::MemoryStore)).
pub struct IterBuilder<'a, S: Store> {
    model: &'a Model<S>,
    start: Option<FieldValue>,
    stop: Option<FieldValue>,
}

impl<'a, S: Store> IterBuilder<'a, S> {
    /// Inclusive lower bound on the key.
    pub fn start(mut self, key: impl Into<FieldValue>) -> Self {
        self.start = Some(key.into());
        self
    }

    /// Upper bound on the key.
    pub fn stop(mut self, key: impl Into<FieldValue>) -> Self {
        self.stop = Some(key.into());
        self
    }

    fn bounds(&self) -> Result<(Option<Vec<u8>>, Option<Vec<u8>>)> {
        let spec = &self.model.schema.key_field().spec;
        let start = match &self.start {
            Some(v) => Some(codec::serialize_key(spec, v)?),
            None => None,
        };
        let stop = match &self.stop {
            Some(v) => Some(codec::serialize_key(spec, v)?),
            None => None,
        };
        Ok((start, stop))
    }

    /// Parse every pair in the range into records, lazily. A single forward
    /// pass; not restartable.
    pub fn records(self) -> Result<RecordIter<S>> {
        let (start, stop) = self.bounds()?;
        trace!(model = self.model.schema.name(), "iterate records");
        let range = self
            .model
            .store
            .range(start.as_deref(), stop.as_deref())?;
        Ok(RecordIter {
            schema: Arc::clone(&self.model.schema),
            range,
            done: false,
        })
    }

    /// Decode keys only; stored values are never read or parsed, so a
    /// corrupt value cannot surface here.
    pub fn keys(self) -> Result<KeyIter<S>> {
        let (start, stop) = self.bounds()?;
        trace!(model = self.model.schema.name(), "iterate keys");
        let range = self
            .model
            .store
            .range_keys(start.as_deref(), stop.as_deref())?;
        Ok(KeyIter {
            schema: Arc::clone(&self.model.schema),
            range,
            done: false,
        })
    }
}

/// Lazy record iterator in store key order. Fuses after a store error; a
/// corrupt record is reported for its own item and iteration continues.
pub struct RecordIter<S: Store> {
    schema: Arc<ModelSchema>,
    range: S::Range,
    done: bool,
}

impl<S: Store> Iterator for RecordIter<S> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let (key_bytes, value_bytes) = match self.range.next()? {
            Ok(pair) => pair,
            Err(e) => {
                self.done = true;
                return Some(Err(e.into()));
            }
        };
        Some(parse_pair(&self.schema, &key_bytes, &value_bytes))
    }
}

fn parse_pair(schema: &Arc<ModelSchema>, key_bytes: &[u8], value_bytes: &[u8]) -> Result<Record> {
    let key = codec::deserialize_key(&schema.key_field().spec, key_bytes)?;
    Record::parse(schema, key, value_bytes)
}

/// Lazy key iterator in store key order. Fuses after a store error.
pub struct KeyIter<S: Store> {
    schema: Arc<ModelSchema>,
    range: S::KeyRange,
    done: bool,
}

impl<S: Store> Iterator for KeyIter<S> {
    type Item = Result<FieldValue>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let key_bytes = match self.range.next()? {
            Ok(bytes) => bytes,
            Err(e) => {
                self.done = true;
                return Some(Err(e.into()));
            }
        };
        let key = codec::deserialize_key(&self.schema.key_field().spec, &key_bytes);
        Some(key.map_err(Into::into))
    }
}
