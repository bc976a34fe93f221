//! Value Generators
//!
//! Two tables, both built once when a store is created:
//! - leaf generators keyed by scalar (or enum) name, defaults layered under
//!   caller overrides
//! - type mocks keyed by object type name, either a whole-type generator
//!   returning a record or a map of per-field generators
//!
//! Every generator receives the store RNG, so a seeded store reproduces the
//! same values run after run.

use rand::{Rng, RngCore};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::value::Value;

/// Produces a leaf value (scalar or enum member)
pub type ScalarGenerator = Arc<dyn Fn(&mut dyn RngCore) -> Value + Send + Sync>;

/// Produces the value of one field
pub type FieldGenerator = Arc<dyn Fn(&mut dyn RngCore) -> Value + Send + Sync>;

/// Produces a record of field values for a whole type
pub type RecordGenerator = Arc<dyn Fn(&mut dyn RngCore) -> Value + Send + Sync>;

/// Placeholder every default `String` field gets
pub const DEFAULT_STRING: &str = "Hello World";

// =============================================================================
// Type Mock
// =============================================================================

/// Caller-supplied mock for an object type
#[derive(Clone)]
pub enum TypeMock {
    /// Called once per generation; must return a record. The requested field
    /// is taken from it and the other entries are offered as siblings.
    WholeType(RecordGenerator),
    /// One generator per field; fields without one use default generation
    PerField(HashMap<String, FieldGenerator>),
}

impl fmt::Debug for TypeMock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeMock::WholeType(_) => write!(f, "WholeType(..)"),
            TypeMock::PerField(fields) => {
                let mut names: Vec<_> = fields.keys().collect();
                names.sort();
                f.debug_tuple("PerField").field(&names).finish()
            }
        }
    }
}

// =============================================================================
// Mocks (caller overrides)
// =============================================================================

/// Caller overrides, handed to the store at construction
///
/// ```
/// use familiar_mocks::{Mocks, Value};
///
/// let mocks = Mocks::new()
///     .scalar("DateTime", |_| Value::from("2024-01-01T00:00:00Z"))
///     .field("User", "name", |_| Value::from("Superman"));
/// ```
#[derive(Clone, Default)]
pub struct Mocks {
    scalars: HashMap<String, ScalarGenerator>,
    types: HashMap<String, TypeMock>,
}

impl Mocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generator for a scalar, or for an enum in place of a random member
    pub fn scalar<F>(mut self, name: impl Into<String>, generator: F) -> Self
    where
        F: Fn(&mut dyn RngCore) -> Value + Send + Sync + 'static,
    {
        self.scalars.insert(name.into(), Arc::new(generator));
        self
    }

    /// Whole-type mock returning a record of field values
    pub fn whole_type<F>(mut self, type_name: impl Into<String>, generator: F) -> Self
    where
        F: Fn(&mut dyn RngCore) -> Value + Send + Sync + 'static,
    {
        self.types
            .insert(type_name.into(), TypeMock::WholeType(Arc::new(generator)));
        self
    }

    /// Per-field mock. Replaces a whole-type mock registered for the same type.
    pub fn field<F>(mut self, type_name: impl Into<String>, field_name: impl Into<String>, generator: F) -> Self
    where
        F: Fn(&mut dyn RngCore) -> Value + Send + Sync + 'static,
    {
        let type_name = type_name.into();
        let entry = self
            .types
            .entry(type_name.clone())
            .or_insert_with(|| TypeMock::PerField(HashMap::new()));

        if let TypeMock::WholeType(_) = entry {
            tracing::warn!(type_name = %type_name, "per-field mock replaces whole-type mock");
            *entry = TypeMock::PerField(HashMap::new());
        }
        if let TypeMock::PerField(fields) = entry {
            fields.insert(field_name.into(), Arc::new(generator));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.scalars.is_empty() && self.types.is_empty()
    }
}

impl fmt::Debug for Mocks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut scalars: Vec<_> = self.scalars.keys().collect();
        scalars.sort();
        f.debug_struct("Mocks")
            .field("scalars", &scalars)
            .field("types", &self.types)
            .finish()
    }
}

// =============================================================================
// Defaults
// =============================================================================

/// Random UUID v4 drawn from `rng`
pub fn random_uuid(rng: &mut dyn RngCore) -> String {
    let bytes: [u8; 16] = rng.gen();
    uuid::Builder::from_random_bytes(bytes).into_uuid().to_string()
}

/// Generators for the built-in scalars
pub fn default_scalars() -> HashMap<String, ScalarGenerator> {
    let mut scalars: HashMap<String, ScalarGenerator> = HashMap::new();
    scalars.insert(
        "Int".to_string(),
        Arc::new(|rng: &mut dyn RngCore| Value::Int(rng.gen_range(-100..=100))),
    );
    scalars.insert(
        "Float".to_string(),
        Arc::new(|rng: &mut dyn RngCore| Value::Float(rng.gen_range(-100.0..100.0))),
    );
    scalars.insert(
        "String".to_string(),
        Arc::new(|_: &mut dyn RngCore| Value::from(DEFAULT_STRING)),
    );
    scalars.insert(
        "Boolean".to_string(),
        Arc::new(|rng: &mut dyn RngCore| Value::Bool(rng.gen_bool(0.5))),
    );
    scalars.insert(
        "ID".to_string(),
        Arc::new(|rng: &mut dyn RngCore| Value::String(random_uuid(rng))),
    );
    scalars
}

// =============================================================================
// Generators (defaults + overrides)
// =============================================================================

/// Defaults layered under caller overrides. Owned by the store.
#[derive(Clone)]
pub struct Generators {
    scalars: HashMap<String, ScalarGenerator>,
    types: HashMap<String, TypeMock>,
}

impl Generators {
    pub fn new(mocks: Mocks) -> Self {
        let mut scalars = default_scalars();
        scalars.extend(mocks.scalars);
        Self {
            scalars,
            types: mocks.types,
        }
    }

    pub fn scalar(&self, name: &str) -> Option<&ScalarGenerator> {
        self.scalars.get(name)
    }

    pub fn type_mock(&self, type_name: &str) -> Option<&TypeMock> {
        self.types.get(type_name)
    }
}

impl Default for Generators {
    fn default() -> Self {
        Self::new(Mocks::default())
    }
}

impl fmt::Debug for Generators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut scalars: Vec<_> = self.scalars.keys().collect();
        scalars.sort();
        f.debug_struct("Generators")
            .field("scalars", &scalars)
            .field("types", &self.types)
            .finish()
    }
}
