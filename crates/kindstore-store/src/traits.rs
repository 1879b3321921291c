use async_trait::async_trait;
use kindstore_types::Object;

use crate::context::Context;
use crate::error::StoreResult;

/// Polymorphic object store.
///
/// Records of any registered kind share one store and one id space.
/// Implementations must satisfy these invariants:
/// - Ids assigned by `store` are unique across all kinds.
/// - A record fetched by id compares equal, field for field, to what was
///   stored under that id.
/// - Every operation gives up promptly once `ctx` is cancelled or past its
///   deadline, returning [`StoreError::Cancelled`] or
///   [`StoreError::DeadlineExceeded`].
/// - Reads are not isolated from concurrent writes.
///
/// [`StoreError::Cancelled`]: crate::StoreError::Cancelled
/// [`StoreError::DeadlineExceeded`]: crate::StoreError::DeadlineExceeded
#[async_trait]
pub trait ObjectDb: Send + Sync {
    /// Persist `object`, assigning it an id.
    ///
    /// The id is written back into `object` via `set_id`. A record whose id
    /// already names a live entry of its kind is overwritten in place;
    /// otherwise a fresh id is allocated. On failure `object` keeps the id
    /// it came in with.
    ///
    /// The in-place check and the write are separate backend calls: a
    /// `delete_object` for the same id that lands between them succeeds, and
    /// the write then brings the entry back.
    async fn store(&self, ctx: &Context, object: &mut dyn Object) -> StoreResult<()>;

    /// Fetch the record stored under `id`, whatever its kind.
    async fn get_object_by_id(&self, ctx: &Context, id: &str) -> StoreResult<Box<dyn Object>>;

    /// Fetch the first record whose name equals `name`.
    ///
    /// This is a linear scan over every stored entry.
    async fn get_object_by_name(&self, ctx: &Context, name: &str)
        -> StoreResult<Box<dyn Object>>;

    /// List every record of `kind`, in backend enumeration order.
    async fn list_objects(&self, ctx: &Context, kind: &str) -> StoreResult<Vec<Box<dyn Object>>>;

    /// Delete the record stored under `id`.
    ///
    /// Not idempotent: deleting a missing id fails with `NotFound`.
    async fn delete_object(&self, ctx: &Context, id: &str) -> StoreResult<()>;
}
