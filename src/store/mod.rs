//! Entity Store
//!
//! Lazily synthesizes values for `(type, key, field)` triples, remembers
//! them, and lets callers override them.
//!
//! ## Storage
//!
//! ```text
//! type name ─┬─ key ── entity { field slot -> value }
//!            └─ key ── entity { ... }
//! ```
//!
//! - A field slot is the field name, or `field:<canonical args>` when the field
//!   was queried with arguments (see [`crate::args`]).
//! - Object-typed values are always stored as [`Ref`]s. Nested records given
//!   to `set` are inserted as their own entities first.
//! - Once a slot holds a value, lazy generation never recomputes it.
//! - Entities are copy-on-write (`Arc<Record>`), so snapshots handed out by
//!   [`MockStore::entity`] never change under the caller.
//! - A failed `get`/`set` leaves the store exactly as it was. Each call
//!   journals the prior snapshot of every entity it touches and puts those
//!   back on error; reads that hit the cache touch nothing.

mod request;
mod shared;

pub use request::{GetArgs, SetArgs};
pub use shared::SharedMockStore;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

use crate::args::{field_name_in_store, FieldArgs};
use crate::config::{KeyFieldPolicy, MockConfig, TypePolicy};
use crate::error::{MockError, Result};
use crate::mocks::{random_uuid, Generators, Mocks, TypeMock};
use crate::schema::{NamedType, OutputType, Schema};
use crate::value::{Key, Record, Ref, Value, REF_KEY};

/// Meta field dropped from inserted records
const TYPENAME_FIELD: &str = "__typename";

type Entities = HashMap<String, HashMap<Key, Arc<Record>>>;

/// Prior snapshot of every entity touched by the running call (`None`: it did not exist)
type Journal = HashMap<(String, Key), Option<Arc<Record>>>;

/// The mock entity store
pub struct MockStore {
    schema: Schema,
    generators: Generators,
    config: MockConfig,
    /// Explicit key field policies, indexed by type
    key_policies: HashMap<String, KeyFieldPolicy>,
    rng: StdRng,
    entities: Entities,
    /// Open while a public call runs
    journal: Option<Journal>,
}

impl MockStore {
    /// Store over `schema` with default generators and configuration
    pub fn new(schema: Schema) -> Self {
        let config = MockConfig::default();
        Self {
            schema,
            generators: Generators::default(),
            key_policies: config.policies_by_type(),
            rng: rng_for(&config),
            config,
            entities: HashMap::new(),
            journal: None,
        }
    }

    /// Layer caller mocks over the default generators
    pub fn with_mocks(mut self, mocks: Mocks) -> Self {
        self.generators = Generators::new(mocks);
        self
    }

    /// Apply a configuration (seed, list bounds, key policies, root key)
    pub fn with_config(mut self, config: MockConfig) -> Result<Self> {
        config.validate()?;
        self.rng = rng_for(&config);
        self.key_policies = config.policies_by_type();
        self.config = config;
        Ok(self)
    }

    /// Reseed the RNG
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.generation.seed = Some(seed);
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Set the key field policy of one type
    pub fn with_type_policy(mut self, type_name: impl Into<String>, policy: KeyFieldPolicy) -> Self {
        let config = std::mem::take(&mut self.config);
        self.config = config.with_type_policy(TypePolicy::new(type_name, policy));
        self.key_policies = self.config.policies_by_type();
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn config(&self) -> &MockConfig {
        &self.config
    }

    /// Identity of the root read and write types
    pub fn root_key(&self) -> Key {
        Key::String(self.config.generation.root_key.clone())
    }

    // =========================================================================
    // Public get / set
    // =========================================================================

    /// Read a value, generating and storing it first if the slot is empty.
    ///
    /// - no field: reference to the entity (inserted if needed, seeded with
    ///   `default_value`); when `key` is omitted, the root key for root
    ///   types and a fresh identity otherwise
    /// - one field: the stored or generated value
    /// - a path: follow references field by field
    pub fn get(&mut self, args: GetArgs) -> Result<Value> {
        self.atomically(|store| store.get_impl(args))
    }

    /// Write a value. Object and list-of-object values are normalized into
    /// references; nested records become entities of their own.
    pub fn set(&mut self, args: SetArgs) -> Result<()> {
        self.atomically(|store| store.set_impl(args))
    }

    /// Shorthand for `get(GetArgs::new(type).key(key).field(field))`
    pub fn get_field(&mut self, type_name: &str, key: impl Into<Key>, field_name: &str) -> Result<Value> {
        self.get(GetArgs::new(type_name).key(key).field(field_name))
    }

    /// Shorthand for a field read with arguments
    pub fn get_with_args(
        &mut self,
        type_name: &str,
        key: impl Into<Key>,
        field_name: &str,
        field_args: impl Into<FieldArgs>,
    ) -> Result<Value> {
        self.get(
            GetArgs::new(type_name)
                .key(key)
                .field(field_name)
                .args(field_args),
        )
    }

    /// Shorthand for a multi-hop read
    pub fn get_path<I, S>(&mut self, type_name: &str, key: impl Into<Key>, path: I) -> Result<Value>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.get(GetArgs::new(type_name).key(key).path(path))
    }

    /// Reference to an entity, inserting an empty one if needed.
    /// Without a key a new entity with a fresh identity is created, except
    /// for the root types, which always resolve to the root entity.
    pub fn get_ref(&mut self, type_name: &str, key: Option<Key>) -> Result<Ref> {
        self.atomically(|store| {
            let key = key.or_else(|| store.root_key_for(type_name));
            store.insert(type_name, key, Record::new(), true)
        })
    }

    /// Shorthand for `set(SetArgs::new(type, key).field(field).value(value))`
    pub fn set_field(
        &mut self,
        type_name: &str,
        key: impl Into<Key>,
        field_name: &str,
        value: impl Into<Value>,
    ) -> Result<()> {
        self.set(SetArgs::new(type_name, key).field(field_name).value(value))
    }

    /// Shorthand for a field write with arguments
    pub fn set_with_args(
        &mut self,
        type_name: &str,
        key: impl Into<Key>,
        field_name: &str,
        field_args: impl Into<FieldArgs>,
        value: impl Into<Value>,
    ) -> Result<()> {
        self.set(
            SetArgs::new(type_name, key)
                .field(field_name)
                .args(field_args)
                .value(value),
        )
    }

    /// Shorthand for setting several fields from a record
    pub fn set_record(&mut self, type_name: &str, key: impl Into<Key>, record: impl Into<Value>) -> Result<()> {
        self.set(SetArgs::new(type_name, key).value(record))
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Whether a value is stored for this slot (no generation)
    pub fn has(&self, type_name: &str, key: &Key, field_name: &str, field_args: Option<&FieldArgs>) -> bool {
        self.stored(type_name, key, &field_name_in_store(field_name, field_args))
            .is_some()
    }

    /// Snapshot of an entity's stored slots
    pub fn entity(&self, type_name: &str, key: &Key) -> Option<Arc<Record>> {
        self.entities.get(type_name)?.get(key).cloned()
    }

    /// Number of entities stored under a type
    pub fn entity_count(&self, type_name: &str) -> usize {
        self.entities.get(type_name).map_or(0, HashMap::len)
    }

    /// Drop every entity. Mocks, configuration and RNG state are kept.
    pub fn reset(&mut self) {
        debug!("resetting mock store");
        self.entities.clear();
    }

    // =========================================================================
    // Key field policy
    // =========================================================================

    /// Field whose value is the identity of `type_name` entities, if any
    pub fn key_field_name(&self, type_name: &str) -> Result<Option<String>> {
        match self.key_policies.get(type_name) {
            Some(KeyFieldPolicy::Field(name)) => return Ok(Some(name.clone())),
            Some(KeyFieldPolicy::Disabled) => return Ok(None),
            Some(KeyFieldPolicy::Infer) | None => {}
        }

        let object = self.schema.object_type(type_name)?;
        Ok(self
            .config
            .key_fields
            .preference
            .iter()
            .find(|name| object.has_field(name))
            .cloned())
    }

    pub fn is_key_field(&self, type_name: &str, field_name: &str) -> Result<bool> {
        Ok(self.key_field_name(type_name)?.as_deref() == Some(field_name))
    }

    // =========================================================================
    // get
    // =========================================================================

    fn get_impl(&mut self, args: GetArgs) -> Result<Value> {
        let GetArgs {
            type_name,
            key,
            field_path,
            field_args,
            default_value,
        } = args;

        let Some((field_name, rest)) = field_path.split_first() else {
            let seed = match default_value {
                None | Some(Value::Unset) => Record::new(),
                Some(Value::Record(record)) => record,
                Some(other) => {
                    return Err(MockError::ExpectedRecord {
                        type_name,
                        value: other,
                    })
                }
            };
            let key = key.or_else(|| self.root_key_for(&type_name));
            return self.insert(&type_name, key, seed, true).map(Value::Ref);
        };

        let key = match key {
            Some(key) => key,
            None => self.implicit_key(&type_name, field_name)?,
        };

        if rest.is_empty() {
            return self.get_slot(&type_name, key, field_name, field_args.as_ref(), default_value);
        }

        let reference = match self.get_slot(&type_name, key, field_name, None, None)? {
            Value::Ref(reference) => reference,
            other => {
                return Err(MockError::NotARef {
                    type_name,
                    field_name: field_name.clone(),
                    value: other,
                })
            }
        };
        let next_type = self
            .schema
            .field_type(&type_name, field_name)?
            .named_type()
            .to_string();

        self.get_impl(GetArgs {
            type_name: next_type,
            key: Some(reference.key),
            field_path: rest.to_vec(),
            field_args,
            default_value,
        })
    }

    /// The root key, if `type_name` is a root type
    fn root_key_for(&self, type_name: &str) -> Option<Key> {
        self.schema
            .is_root_type(type_name)
            .then(|| self.root_key())
    }

    /// Root types may omit the key; everything else must name one
    fn implicit_key(&self, type_name: &str, field_name: &str) -> Result<Key> {
        if self.schema.is_root_type(type_name) {
            Ok(self.root_key())
        } else {
            Err(MockError::MissingKey {
                type_name: type_name.to_string(),
                field_name: field_name.to_string(),
            })
        }
    }

    fn get_slot(
        &mut self,
        type_name: &str,
        key: Key,
        field_name: &str,
        field_args: Option<&FieldArgs>,
        default_value: Option<Value>,
    ) -> Result<Value> {
        self.schema.field(type_name, field_name)?;
        let slot = field_name_in_store(field_name, field_args);

        if let Some(value) = self.stored(type_name, &key, &slot) {
            trace!(type_name, key = %key, slot = %slot, "cache hit");
            return Ok(value.clone());
        }
        trace!(type_name, key = %key, slot = %slot, "cache miss");

        let value = match default_value {
            Some(default) if !default.is_unset() => default,
            _ if self.is_key_field(type_name, field_name)? => key.to_value(),
            _ => {
                let (value, siblings) = self.generate_field_value(type_name, field_name)?;
                for (sibling, sibling_value) in self.declared_siblings(type_name, siblings)? {
                    self.set_slot(type_name, &key, &sibling, None, sibling_value, true)?;
                }
                value
            }
        };

        self.set_slot(type_name, &key, field_name, field_args, value, true)?;
        Ok(self
            .stored(type_name, &key, &slot)
            .cloned()
            .unwrap_or(Value::Null))
    }

    // =========================================================================
    // set
    // =========================================================================

    fn set_impl(&mut self, args: SetArgs) -> Result<()> {
        let SetArgs {
            type_name,
            key,
            field_name,
            field_args,
            value,
            no_override,
        } = args;

        if let Some(field_name) = field_name {
            return self.set_slot(&type_name, &key, &field_name, field_args.as_ref(), value, no_override);
        }

        match value {
            Value::Record(record) => {
                for (field_name, value) in record {
                    if field_name == REF_KEY || field_name == TYPENAME_FIELD {
                        continue;
                    }
                    self.set_slot(&type_name, &key, &field_name, None, value, no_override)?;
                }
                Ok(())
            }
            Value::Unset => Ok(()),
            other => Err(MockError::ExpectedRecord {
                type_name,
                value: other,
            }),
        }
    }

    fn set_slot(
        &mut self,
        type_name: &str,
        key: &Key,
        field_name: &str,
        field_args: Option<&FieldArgs>,
        value: Value,
        no_override: bool,
    ) -> Result<()> {
        let field_type = self.schema.field_type(type_name, field_name)?.clone();
        self.check_root_key(type_name, key)?;

        if self.is_key_field(type_name, field_name)? && Key::from_value(&value).as_ref() != Some(key) {
            return Err(MockError::KeyFieldMismatch {
                type_name: type_name.to_string(),
                field_name: field_name.to_string(),
                key: key.to_string(),
                value,
            });
        }

        let slot = field_name_in_store(field_name, field_args);
        let current = self.stored(type_name, key, &slot).cloned();
        if no_override && current.is_some() {
            trace!(type_name, key = %key, slot = %slot, "slot already set, keeping it");
            return Ok(());
        }

        let normalized = self.normalize(type_name, field_name, &field_type, value, current, no_override)?;
        self.write(type_name, key, slot, normalized);
        Ok(())
    }

    fn check_root_key(&self, type_name: &str, key: &Key) -> Result<()> {
        let root_key = &self.config.generation.root_key;
        if self.schema.is_root_type(type_name) && key.as_str() != Some(root_key.as_str()) {
            return Err(MockError::RootKeyMismatch {
                type_name: type_name.to_string(),
                expected: root_key.clone(),
                key: key.to_string(),
            });
        }
        Ok(())
    }

    /// Turn object and list-of-object values into references
    fn normalize(
        &mut self,
        type_name: &str,
        field_name: &str,
        field_type: &OutputType,
        value: Value,
        current: Option<Value>,
        no_override: bool,
    ) -> Result<Value> {
        let shape_error = |expected: String, value: Value| MockError::ShapeMismatch {
            type_name: type_name.to_string(),
            field_name: field_name.to_string(),
            expected,
            value,
        };

        if self.schema.is_object_output(field_type) {
            let target = field_type.named_type().to_string();
            return match value {
                Value::Unset | Value::Null => Ok(value),
                Value::Ref(reference) if reference.type_name == target => Ok(Value::Ref(reference)),
                Value::Record(record) => {
                    let existing = self.existing_key(&target, current.as_ref(), &record)?;
                    self.insert(&target, existing, record, no_override).map(Value::Ref)
                }
                other => Err(shape_error(format!("a {} record, reference or null", target), other)),
            };
        }

        if let OutputType::List(element) = field_type {
            if self.schema.is_object_output(element) {
                let target = element.named_type().to_string();
                let items = match value {
                    Value::Unset | Value::Null => return Ok(value),
                    Value::List(items) => items,
                    other => return Err(shape_error(format!("a list of {}", target), other)),
                };
                let current_items = match current {
                    Some(Value::List(items)) => items,
                    _ => Vec::new(),
                };

                let mut normalized = Vec::with_capacity(items.len());
                for (index, item) in items.into_iter().enumerate() {
                    let record = match item {
                        Value::Null => {
                            normalized.push(Value::Null);
                            continue;
                        }
                        Value::Ref(reference) if reference.type_name == target => {
                            normalized.push(Value::Ref(reference));
                            continue;
                        }
                        // unoccupied slot: generate something
                        Value::Unset => Record::new(),
                        Value::Record(record) => record,
                        other => {
                            return Err(shape_error(
                                format!("{} records, references or nulls as list elements", target),
                                other,
                            ))
                        }
                    };
                    let existing = self.existing_key(&target, current_items.get(index), &record)?;
                    normalized.push(Value::Ref(self.insert(&target, existing, record, no_override)?));
                }
                return Ok(Value::List(normalized));
            }
        }

        Ok(value)
    }

    /// Key of the entity a partial record should merge into: the one already
    /// referenced from the slot, unless the record names its own identity.
    fn existing_key(&self, type_name: &str, current: Option<&Value>, record: &Record) -> Result<Option<Key>> {
        if record.contains_key(REF_KEY) {
            return Ok(None);
        }
        if let Some(key_field) = self.key_field_name(type_name)? {
            if record.contains_key(&key_field) {
                return Ok(None);
            }
        }
        Ok(current
            .and_then(Value::as_ref_value)
            .map(|reference| reference.key.clone()))
    }

    // =========================================================================
    // Identity & insertion
    // =========================================================================

    /// Insert (or reuse) an entity and apply `values` to it
    fn insert(&mut self, type_name: &str, key: Option<Key>, mut values: Record, no_override: bool) -> Result<Ref> {
        self.schema.object_type(type_name)?;
        let key_field = self.key_field_name(type_name)?;
        let explicit_ref = values.remove(REF_KEY);
        values.remove(TYPENAME_FIELD);

        let mut siblings = Record::new();
        let key = match (key, explicit_ref) {
            (Some(key), _) => key,
            (None, Some(Value::Ref(reference))) => reference.key,
            (None, Some(other)) => Key::from_value(&other).ok_or_else(|| MockError::InvalidKey {
                type_name: type_name.to_string(),
                value: other.clone(),
            })?,
            (None, None) => match key_field.as_deref().and_then(|field| values.get(field)) {
                Some(value) => Key::from_value(value).ok_or_else(|| MockError::InvalidKey {
                    type_name: type_name.to_string(),
                    value: value.clone(),
                })?,
                None => self.generate_key(type_name, key_field.as_deref(), &mut siblings)?,
            },
        };

        let exists = self
            .entities
            .get(type_name)
            .map_or(false, |entities| entities.contains_key(&key));
        if !exists {
            debug!(type_name, key = %key, "inserting entity");
            self.entity_mut(type_name, &key);
        }

        // courtesy values first, caller values on top
        let mut to_insert = self.declared_siblings(type_name, siblings)?;
        to_insert.extend(values);
        for (field_name, value) in to_insert {
            self.set_slot(type_name, &key, &field_name, None, value, no_override)?;
        }

        Ok(Ref::new(type_name, key))
    }

    fn generate_key(&mut self, type_name: &str, key_field: Option<&str>, siblings: &mut Record) -> Result<Key> {
        let Some(key_field) = key_field else {
            let key = Key::String(random_uuid(&mut self.rng));
            debug!(type_name, key = %key, "generated opaque identity");
            return Ok(key);
        };

        let (value, generated) = self.generate_field_value(type_name, key_field)?;
        *siblings = generated;
        Key::from_value(&value).ok_or_else(|| MockError::InvalidKey {
            type_name: type_name.to_string(),
            value,
        })
    }

    /// Drop sibling values for the key field or for fields the type doesn't declare
    fn declared_siblings(&self, type_name: &str, siblings: Record) -> Result<Record> {
        if siblings.is_empty() {
            return Ok(siblings);
        }
        let object = self.schema.object_type(type_name)?;
        let key_field = self.key_field_name(type_name)?;

        Ok(siblings
            .into_iter()
            .filter(|(field_name, _)| {
                if key_field.as_deref() == Some(field_name.as_str()) {
                    return false;
                }
                let declared = object.has_field(field_name);
                if !declared {
                    warn!(type_name, field_name = %field_name, "mock produced a field the type does not declare");
                }
                declared
            })
            .collect())
    }

    // =========================================================================
    // Value generation
    // =========================================================================

    /// Value for a field with an empty slot, plus any sibling values a
    /// whole-type mock produced along the way
    fn generate_field_value(&mut self, type_name: &str, field_name: &str) -> Result<(Value, Record)> {
        let (mocked, siblings) = self.value_from_mocks(type_name, field_name)?;
        if mocked.is_truthy() {
            return Ok((mocked, siblings));
        }
        if !mocked.is_unset() {
            warn!(type_name, field_name, value = %mocked, "falsy mock value ignored, generating from type");
        }

        let field_type = self.schema.field_type(type_name, field_name)?.clone();
        let value = self.generate_value_from_type(&field_type)?;
        Ok((value, siblings))
    }

    fn value_from_mocks(&mut self, type_name: &str, field_name: &str) -> Result<(Value, Record)> {
        let Some(mock) = self.generators.type_mock(type_name) else {
            return Ok((Value::Unset, Record::new()));
        };

        match mock {
            TypeMock::WholeType(generator) => match generator(&mut self.rng) {
                Value::Record(mut values) => {
                    let value = values.remove(field_name).unwrap_or(Value::Unset);
                    let siblings = values
                        .into_iter()
                        .filter(|(name, v)| !v.is_unset() && name != REF_KEY && name != TYPENAME_FIELD)
                        .collect();
                    Ok((value, siblings))
                }
                other => Err(MockError::MalformedMock {
                    type_name: type_name.to_string(),
                    value: other,
                }),
            },
            TypeMock::PerField(fields) => {
                let value = fields
                    .get(field_name)
                    .map(|generator| generator(&mut self.rng))
                    .unwrap_or(Value::Unset);
                Ok((value, Record::new()))
            }
        }
    }

    /// Default generation, dispatched on the declared output type
    fn generate_value_from_type(&mut self, ty: &OutputType) -> Result<Value> {
        match ty {
            OutputType::NonNull(inner) => self.generate_value_from_type(inner),
            OutputType::List(inner) => {
                let length = self.random_list_length();
                (0..length)
                    .map(|_| self.generate_value_from_type(inner))
                    .collect::<Result<Vec<_>>>()
                    .map(Value::List)
            }
            OutputType::Named(name) => {
                let object_name = match self.schema.named_type(name)? {
                    NamedType::Scalar(scalar) => {
                        let generator = self.generators.scalar(&scalar.name).ok_or_else(|| {
                            MockError::MissingGenerator {
                                scalar: scalar.name.clone(),
                            }
                        })?;
                        return Ok(generator(&mut self.rng));
                    }
                    NamedType::Enum(enum_type) => {
                        if let Some(generator) = self.generators.scalar(&enum_type.name) {
                            return Ok(generator(&mut self.rng));
                        }
                        return Ok(enum_type
                            .values
                            .choose(&mut self.rng)
                            .cloned()
                            .map(Value::String)
                            .unwrap_or(Value::Null));
                    }
                    NamedType::Object(object) => object.name.clone(),
                };
                self.insert(&object_name, None, Record::new(), false)
                    .map(Value::Ref)
            }
        }
    }

    fn random_list_length(&mut self) -> usize {
        let generation = &self.config.generation;
        self.rng
            .gen_range(generation.list_length_min..=generation.list_length_max)
    }

    // =========================================================================
    // Raw storage
    // =========================================================================

    fn stored(&self, type_name: &str, key: &Key, slot: &str) -> Option<&Value> {
        self.entities.get(type_name)?.get(key)?.get(slot)
    }

    /// Copy-on-write update of one slot. `Unset` clears the slot.
    fn write(&mut self, type_name: &str, key: &Key, slot: String, value: Value) {
        let record = Arc::make_mut(self.entity_mut(type_name, key));
        if value.is_unset() {
            record.remove(&slot);
        } else {
            record.insert(slot, value);
        }
    }

    /// Entity about to be modified, created if missing. Journals its prior
    /// snapshot the first time the running call touches it.
    fn entity_mut(&mut self, type_name: &str, key: &Key) -> &mut Arc<Record> {
        if let Some(journal) = self.journal.as_mut() {
            let touched = (type_name.to_string(), key.clone());
            if !journal.contains_key(&touched) {
                let prior = self
                    .entities
                    .get(type_name)
                    .and_then(|entities| entities.get(key))
                    .cloned();
                journal.insert(touched, prior);
            }
        }

        self.entities
            .entry(type_name.to_string())
            .or_default()
            .entry(key.clone())
            .or_default()
    }

    /// Run `op`, restoring the entities it touched if it fails
    fn atomically<T>(&mut self, op: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.journal.is_some() {
            return op(self);
        }

        self.journal = Some(Journal::new());
        let result = op(self);
        let journal = self.journal.take().unwrap_or_default();
        if result.is_err() {
            self.rollback(journal);
        }
        result
    }

    fn rollback(&mut self, journal: Journal) {
        trace!(entities = journal.len(), "rolling back failed call");
        for ((type_name, key), prior) in journal {
            match prior {
                Some(entity) => {
                    self.entities
                        .entry(type_name)
                        .or_default()
                        .insert(key, entity);
                }
                None => {
                    if let Some(entities) = self.entities.get_mut(&type_name) {
                        entities.remove(&key);
                        if entities.is_empty() {
                            self.entities.remove(&type_name);
                        }
                    }
                }
            }
        }
    }
}

fn rng_for(config: &MockConfig) -> StdRng {
    match config.generation.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

impl fmt::Debug for MockStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut counts: Vec<_> = self
            .entities
            .iter()
            .map(|(type_name, entities)| (type_name.as_str(), entities.len()))
            .collect();
        counts.sort();
        f.debug_struct("MockStore")
            .field("generators", &self.generators)
            .field("config", &self.config)
            .field("entities", &counts)
            .finish()
    }
}
