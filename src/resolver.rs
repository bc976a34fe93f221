//! Field resolution hook
//!
//! Bridges a query executor to the store. The executor hands over the parent
//! type, the field being resolved, its arguments and the parent value it
//! already holds:
//!
//! - parent value is a reference: read the field from that entity
//! - no parent value and the parent is a root type: read from the root entity
//! - anything else: the executor resolves the field itself
//!   (e.g. a property of a plain record)

use crate::args::FieldArgs;
use crate::error::Result;
use crate::store::{GetArgs, MockStore};
use crate::value::Value;

/// What the executor knows about the field it is resolving
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    pub parent_type: &'a str,
    pub field_name: &'a str,
    pub args: Option<&'a FieldArgs>,
    /// Value the parent field resolved to, if any
    pub source: Option<&'a Value>,
}

impl<'a> FieldContext<'a> {
    pub fn new(parent_type: &'a str, field_name: &'a str) -> Self {
        Self {
            parent_type,
            field_name,
            args: None,
            source: None,
        }
    }

    pub fn with_args(mut self, args: Option<&'a FieldArgs>) -> Self {
        self.args = args;
        self
    }

    pub fn with_source(mut self, source: Option<&'a Value>) -> Self {
        self.source = source;
        self
    }
}

/// Outcome of [`resolve_field`]
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Value read from the store
    Value(Value),
    /// Not a store-backed field; use default resolution
    Delegate,
}

/// Resolve one field against the store
pub fn resolve_field(store: &mut MockStore, ctx: &FieldContext<'_>) -> Result<Resolution> {
    let key = match ctx.source {
        Some(Value::Ref(reference)) => {
            let mut args = GetArgs::new(reference.type_name.clone())
                .key(reference.key.clone())
                .field(ctx.field_name);
            args.field_args = ctx.args.cloned();
            return store.get(args).map(Resolution::Value);
        }
        None if store.schema().is_root_type(ctx.parent_type) => store.root_key(),
        _ => return Ok(Resolution::Delegate),
    };

    let mut args = GetArgs::new(ctx.parent_type)
        .key(key)
        .field(ctx.field_name);
    args.field_args = ctx.args.cloned();
    store.get(args).map(Resolution::Value)
}
