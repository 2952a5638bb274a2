//! # Stratum
//!
//! A typed record-mapping layer over an ordered key-value store.
//!
//! Models are declared as an ordered list of typed fields, exactly one of
//! which is the key. Non-key fields serialize to a fixed binary layout in
//! declaration order, each field padded to a 4-byte boundary; the key
//! field's raw encoding becomes the store key, scoped under a per-model
//! prefix so models never collide. Range iteration yields records in the
//! store's key order.
//!
//! ## Quick Start
//!
//! ```
//! use stratum_core::{field, FieldSpec, MemoryStore, Model, ModelSchema};
//!
//! let schema = ModelSchema::define(
//!     "Animal",
//!     "animal",
//!     vec![
//!         field("name", FieldSpec::string().key()),
//!         field("sound", FieldSpec::string()),
//!         field("shouts", FieldSpec::boolean()),
//!     ],
//! )
//! .unwrap();
//!
//! let store = MemoryStore::new();
//! let animals = Model::bind(&store, schema);
//!
//! let cow = animals
//!     .record(vec!["cow".into(), "moo".into(), true.into()])
//!     .unwrap();
//! animals.save(&cow).unwrap();
//!
//! let back = animals.get("cow").unwrap().unwrap();
//! assert_eq!(back, cow);
//! ```

pub mod codec;
pub mod error;
pub mod model;
pub mod record;
pub mod schema;
pub mod store;
pub mod value;

pub use codec::TextEncoding;
pub use error::{CorruptError, Error, Result, SchemaError, StoreError, ValueError};
pub use model::{IterBuilder, KeyIter, Model, RecordIter};
pub use record::Record;
pub use schema::{field, Field, FieldKind, FieldSpec, ModelSchema};
pub use store::{MemoryStore, Store};
pub use value::FieldValue;
