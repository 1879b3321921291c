use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use kindstore_kv::{KeyPattern, KvBackend};
use kindstore_types::{validate_id, EntryKey, Object, KEY_SEPARATOR};

use crate::config::StoreConfig;
use crate::context::Context;
use crate::error::{StoreError, StoreResult};
use crate::registry::KindRegistry;
use crate::traits::ObjectDb;

/// A raw backend key located by id, with the kind segment in front of it.
struct Located {
    key: String,
    kind: String,
}

/// [`ObjectDb`] over a flat key-value namespace.
///
/// Each record is stored under `<kind>:<id>` with a JSON payload. Ids come
/// from a single counter key in the same backend, so they are unique across
/// kinds. Lookups by id and by name are key scans; there is no secondary
/// index, so both cost O(total entries).
pub struct KvObjectDb<B: ?Sized = dyn KvBackend> {
    backend: Arc<B>,
    registry: KindRegistry,
    config: StoreConfig,
}

impl<B: KvBackend + ?Sized> KvObjectDb<B> {
    /// Store over `backend` with the built-in kinds and default settings.
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            registry: KindRegistry::with_builtin(),
            config: StoreConfig::default(),
        }
    }

    /// Store over `backend` with an explicit registry and settings.
    pub fn with_registry(
        backend: Arc<B>,
        registry: KindRegistry,
        config: StoreConfig,
    ) -> StoreResult<Self> {
        config.validate()?;
        Ok(Self {
            backend,
            registry,
            config,
        })
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    pub fn registry(&self) -> &KindRegistry {
        &self.registry
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    async fn allocate_id(&self, ctx: &Context) -> StoreResult<String> {
        let next = ctx.run(self.backend.incr(&self.config.counter_key)).await??;
        Ok(next.to_string())
    }

    /// The key to overwrite if `id` already names a live entry of `kind`.
    async fn existing_key(
        &self,
        ctx: &Context,
        kind: &str,
        id: &str,
    ) -> StoreResult<Option<EntryKey>> {
        if id.is_empty() {
            return Ok(None);
        }
        let Ok(key) = EntryKey::new(kind, id) else {
            return Ok(None);
        };
        let live = ctx.run(self.backend.exists(&key.to_string())).await??;
        Ok(live.then_some(key))
    }

    /// Find the first key ending in `:<id>`.
    async fn locate(&self, ctx: &Context, id: &str) -> StoreResult<Located> {
        // An id that is not a valid key component can never have been stored.
        if validate_id(id).is_err() {
            return Err(StoreError::not_found_id(id));
        }
        let suffix = EntryKey::id_suffix(id);
        let keys = ctx
            .run(self.backend.keys(&KeyPattern::suffix(suffix.as_str())))
            .await??;
        if keys.len() > 1 {
            warn!(id, matched = keys.len(), "id matches more than one key, using the first");
        }
        let key = keys
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::not_found_id(id))?;
        let kind = key
            .strip_suffix(suffix.as_str())
            .unwrap_or_default()
            .to_string();
        Ok(Located { key, kind })
    }

    async fn write(
        &self,
        ctx: &Context,
        key: &EntryKey,
        object: &dyn Object,
    ) -> StoreResult<usize> {
        let payload = object.encode().map_err(StoreError::Encode)?;
        ctx.run(self.backend.set(&key.to_string(), &payload)).await??;
        Ok(payload.len())
    }

    async fn read_payload(&self, ctx: &Context, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(ctx.run(self.backend.get(key)).await??)
    }
}

#[async_trait]
impl<B: KvBackend + ?Sized> ObjectDb for KvObjectDb<B> {
    async fn store(&self, ctx: &Context, object: &mut dyn Object) -> StoreResult<()> {
        ctx.check()?;
        let kind = object.kind().to_string();
        if !self.registry.contains(&kind) {
            return Err(StoreError::UnknownKind(kind));
        }

        let current_id = object.id().to_string();
        let key = match self.existing_key(ctx, &kind, &current_id).await? {
            Some(key) => {
                debug!(%key, "overwriting stored object in place");
                key
            }
            None => {
                let id = self.allocate_id(ctx).await?;
                let key = EntryKey::new(kind, id.as_str())?;
                object.set_id(id);
                key
            }
        };

        match self.write(ctx, &key, object).await {
            Ok(bytes) => {
                debug!(%key, bytes, "stored object");
                Ok(())
            }
            Err(e) => {
                // Nothing was written, so the caller keeps the id it came with.
                object.set_id(current_id);
                Err(e)
            }
        }
    }

    async fn get_object_by_id(&self, ctx: &Context, id: &str) -> StoreResult<Box<dyn Object>> {
        ctx.check()?;
        let Located { key, kind } = self.locate(ctx, id).await?;
        if !self.registry.contains(&kind) {
            return Err(StoreError::UnknownKind(kind));
        }
        let data = self
            .read_payload(ctx, &key)
            .await?
            .ok_or_else(|| StoreError::not_found_id(id))?;
        let object = self.registry.decode(&kind, &key, &data)?;
        debug!(%key, "fetched object by id");
        Ok(object)
    }

    async fn get_object_by_name(
        &self,
        ctx: &Context,
        name: &str,
    ) -> StoreResult<Box<dyn Object>> {
        ctx.check()?;
        let keys = ctx.run(self.backend.keys(&KeyPattern::All)).await??;
        debug!(name, scanned = keys.len(), "scanning for object by name");

        for key in keys {
            ctx.check()?;
            if key == self.config.counter_key {
                continue;
            }
            let kind = key.split(KEY_SEPARATOR).next().unwrap_or_default();
            if !self.registry.contains(kind) {
                warn!(%key, "skipping key of unregistered kind");
                continue;
            }
            let Some(data) = self.read_payload(ctx, &key).await? else {
                debug!(%key, "key vanished during scan");
                continue;
            };
            let object = self.registry.decode(kind, &key, &data)?;
            if object.name() == name {
                return Ok(object);
            }
        }

        Err(StoreError::not_found_name(name))
    }

    async fn list_objects(&self, ctx: &Context, kind: &str) -> StoreResult<Vec<Box<dyn Object>>> {
        ctx.check()?;
        if !self.registry.contains(kind) {
            return Err(StoreError::UnknownKind(kind.to_string()));
        }
        let prefix = EntryKey::kind_prefix(kind);
        let keys = ctx.run(self.backend.keys(&KeyPattern::prefix(prefix))).await??;

        let mut objects = Vec::with_capacity(keys.len());
        for key in keys {
            ctx.check()?;
            let Some(data) = self.read_payload(ctx, &key).await? else {
                debug!(%key, "key vanished during scan");
                continue;
            };
            objects.push(self.registry.decode(kind, &key, &data)?);
        }
        debug!(kind, count = objects.len(), "listed objects");
        Ok(objects)
    }

    async fn delete_object(&self, ctx: &Context, id: &str) -> StoreResult<()> {
        ctx.check()?;
        let Located { key, .. } = self.locate(ctx, id).await?;
        let removed = ctx.run(self.backend.delete(&key)).await??;
        if !removed {
            return Err(StoreError::not_found_id(id));
        }
        debug!(%key, "deleted object");
        Ok(())
    }
}

impl<B: ?Sized> std::fmt::Debug for KvObjectDb<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvObjectDb")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish()
    }
}
