//! Loader plugin contract
//!
//! Loaders decompose an application object into a primitive, transfer-safe
//! representation before it crosses the deferred-execution boundary, and
//! reconstruct it on the worker side. Objects already enter the pipeline as
//! [`serde_json::Value`], so the built-in loader is a passthrough; custom
//! loaders exist for applications whose decompose/load is not identity
//! (e.g. replacing a record with its primary key and refetching it later).

use serde_json::Value;

use crate::Result;

pub trait Loader: Send + Sync {
    /// Decompose an application object into primitive data safe to enqueue.
    fn decompose(&self, object: &Value) -> Result<Value>;

    /// Reconstruct the application object from its decomposed form.
    fn load(&self, primitive: Value) -> Result<Value>;
}

/// Identity loader, registered as `"simple"`.
#[derive(Debug, Default)]
pub struct PassthroughLoader;

impl Loader for PassthroughLoader {
    fn decompose(&self, object: &Value) -> Result<Value> {
        Ok(object.clone())
    }

    fn load(&self, primitive: Value) -> Result<Value> {
        Ok(primitive)
    }
}
