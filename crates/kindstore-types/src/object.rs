use std::any::Any;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CodecResult;

/// Type-erasure helper so `dyn Object` values can be downcast.
///
/// Implemented for every `'static` type; record variants never implement it
/// by hand.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// The capability set every storable record exposes.
///
/// The store only ever looks at `kind`, `id` and `name`. Everything else a
/// variant carries is opaque and travels inside the encoded payload.
pub trait Object: AsAny + fmt::Debug + Send + Sync {
    /// Kind tag, constant per variant and never empty.
    fn kind(&self) -> &str;

    /// Current identifier. Empty until the record is first stored.
    fn id(&self) -> &str;

    /// Display name. Not required to be unique.
    fn name(&self) -> &str;

    /// Overwrite the identifier. Reserved for the store.
    fn set_id(&mut self, id: String);

    fn set_name(&mut self, name: String);

    /// Encode the full record, kind tag included, into a payload.
    fn encode(&self) -> CodecResult<Vec<u8>>;
}

/// A concrete record variant that the kind registry can decode into.
pub trait Record: Object + Serialize + DeserializeOwned + Sized + 'static {
    /// Kind tag shared by every value of this variant.
    const KIND: &'static str;
}

impl dyn Object {
    /// Returns `true` if the boxed record is a `T`.
    pub fn is<T: Object + 'static>(&self) -> bool {
        AsAny::as_any(self).is::<T>()
    }

    pub fn downcast_ref<T: Object + 'static>(&self) -> Option<&T> {
        AsAny::as_any(self).downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Object + 'static>(&mut self) -> Option<&mut T> {
        AsAny::as_any_mut(self).downcast_mut::<T>()
    }

    /// Recover the concrete variant from a boxed record.
    ///
    /// Returns `None` (dropping the record) if the variant does not match.
    pub fn downcast<T: Object + 'static>(self: Box<Self>) -> Option<Box<T>> {
        AsAny::into_any(self).downcast::<T>().ok()
    }
}
