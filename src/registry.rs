//! Plugin and client registries
//!
//! Explicit registration maps from identifier to factory, populated at
//! startup and open for custom registrations. Lookups return a typed
//! [`PipecastError::UnknownPlugin`] failure instead of reflecting into the
//! type system. The client registry maps pipe-instance names to built
//! clients so the deferred worker can re-resolve the same configuration on
//! its side of the execution boundary.

use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;

use crate::client::Client;
use crate::codec::{Codec, JsonCodec};
use crate::config::{Config, TransportSelector};
use crate::loader::{Loader, PassthroughLoader};
use crate::transports::{HttpTransport, LogTransport, MultiTransport, QueueTransport, Transport};
use crate::{PipecastError, Result};

pub type CodecFactory = Box<dyn Fn() -> Arc<dyn Codec> + Send + Sync>;
pub type LoaderFactory = Box<dyn Fn() -> Arc<dyn Loader> + Send + Sync>;
pub type TransportFactory = Box<dyn Fn(&Config) -> Result<Arc<dyn Transport>> + Send + Sync>;

static CODECS: Lazy<DashMap<String, CodecFactory>> = Lazy::new(|| {
    let map: DashMap<String, CodecFactory> = DashMap::new();
    map.insert("json".to_string(), Box::new(|| Arc::new(JsonCodec) as Arc<dyn Codec>));
    map
});

static LOADERS: Lazy<DashMap<String, LoaderFactory>> = Lazy::new(|| {
    let map: DashMap<String, LoaderFactory> = DashMap::new();
    map.insert(
        "simple".to_string(),
        Box::new(|| Arc::new(PassthroughLoader) as Arc<dyn Loader>),
    );
    map
});

static TRANSPORTS: Lazy<DashMap<String, TransportFactory>> = Lazy::new(|| {
    let map: DashMap<String, TransportFactory> = DashMap::new();
    map.insert(
        "https".to_string(),
        Box::new(|config: &Config| {
            let options = config.http.clone().ok_or_else(|| {
                PipecastError::Config("the https transport requires http options".to_string())
            })?;
            Ok(Arc::new(HttpTransport::new(options)?) as Arc<dyn Transport>)
        }),
    );
    map.insert(
        "log".to_string(),
        Box::new(|_: &Config| Ok(Arc::new(LogTransport) as Arc<dyn Transport>)),
    );
    map.insert(
        "queue".to_string(),
        Box::new(|config: &Config| {
            let queue = config.payload_queue.clone().ok_or_else(|| {
                PipecastError::Config("the queue transport requires a payload_queue".to_string())
            })?;
            Ok(Arc::new(QueueTransport::new(&config.queue_name, queue)) as Arc<dyn Transport>)
        }),
    );
    map
});

static CLIENTS: Lazy<DashMap<String, Arc<Client>>> = Lazy::new(DashMap::new);

pub fn register_codec(name: &str, factory: CodecFactory) {
    CODECS.insert(name.to_string(), factory);
}

pub fn register_loader(name: &str, factory: LoaderFactory) {
    LOADERS.insert(name.to_string(), factory);
}

pub fn register_transport(name: &str, factory: TransportFactory) {
    TRANSPORTS.insert(name.to_string(), factory);
}

pub fn resolve_codec(name: &str) -> Result<Arc<dyn Codec>> {
    CODECS
        .get(name)
        .map(|entry| (entry.value())())
        .ok_or_else(|| PipecastError::UnknownPlugin {
            kind: "codec",
            name: name.to_string(),
        })
}

pub fn resolve_loader(name: &str) -> Result<Arc<dyn Loader>> {
    LOADERS
        .get(name)
        .map(|entry| (entry.value())())
        .ok_or_else(|| PipecastError::UnknownPlugin {
            kind: "loader",
            name: name.to_string(),
        })
}

fn resolve_named_transport(name: &str, config: &Config) -> Result<Arc<dyn Transport>> {
    let entry = TRANSPORTS.get(name).ok_or_else(|| PipecastError::UnknownPlugin {
        kind: "transport",
        name: name.to_string(),
    })?;
    (entry.value())(config)
}

/// Resolve the configured transport set: a single transport as-is, several
/// as an ordered fan-out composite.
pub fn resolve_transport(config: &Config) -> Result<Arc<dyn Transport>> {
    let mut legs: Vec<(String, Arc<dyn Transport>)> = Vec::with_capacity(config.transports.len());
    for selector in &config.transports {
        let transport = match selector {
            TransportSelector::Named(key) => resolve_named_transport(key, config)?,
            TransportSelector::Instance(transport) => Arc::clone(transport),
        };
        legs.push((selector.tag(), transport));
    }

    match legs.len() {
        0 => Err(PipecastError::Config(
            "at least one transport must be configured".to_string(),
        )),
        1 => Ok(legs.remove(0).1),
        _ => Ok(Arc::new(MultiTransport::new(legs))),
    }
}

/// Register a built client under its configured pipe-instance name.
pub fn register_client(client: Arc<Client>) {
    CLIENTS.insert(client.config().client_name.clone(), client);
}

/// Re-resolve a client by name (worker side of the deferred path).
pub fn lookup_client(name: &str) -> Result<Arc<Client>> {
    CLIENTS
        .get(name)
        .map(|entry| Arc::clone(entry.value()))
        .ok_or_else(|| PipecastError::UnknownClient(name.to_string()))
}

/// Drop a client registration (shutdown, tests).
pub fn unregister_client(name: &str) -> Option<Arc<Client>> {
    CLIENTS.remove(name).map(|(_, client)| client)
}
