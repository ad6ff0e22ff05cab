//! Opaque handles to engine instances.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::id::InstanceId;
use crate::name::TypeName;
use crate::types::unit::LoadedUnit;

// Fields drop in declaration order: the state's drop glue may live in the
// library anchored by the unit's table, so it must go before the unit.
struct Instance {
    id: InstanceId,
    state: Box<dyn Any + Send + Sync>,
    unit: Arc<LoadedUnit>,
}

/// A reference to an object that lives inside a loading domain.
///
/// The host can see which unit the object belongs to, but never the type of
/// its state: only engine code that knows the concrete type can downcast it.
/// Cloning a handle clones the reference, never the object.
#[derive(Clone)]
pub struct Handle(Arc<Instance>);

impl Handle {
    /// Create a handle for a new instance of `unit`.
    ///
    /// Engine code normally goes through
    /// [`CallContext::instantiate`](crate::types::CallContext::instantiate)
    /// so the unit is resolved through the defining domain.
    pub fn new<S: Any + Send + Sync>(unit: Arc<LoadedUnit>, state: S) -> Self {
        Self(Arc::new(Instance {
            id: InstanceId::new(),
            state: Box::new(state),
            unit,
        }))
    }

    /// The instance id.
    pub fn id(&self) -> InstanceId {
        self.0.id
    }

    /// The unit this object is an instance of.
    pub fn unit(&self) -> &Arc<LoadedUnit> {
        &self.0.unit
    }

    /// The runtime type name of this object.
    pub fn type_name(&self) -> &TypeName {
        self.0.unit.name()
    }

    /// Downcast the instance state.
    pub fn state<S: Any>(&self) -> Option<&S> {
        self.0.state.downcast_ref::<S>()
    }

    /// Check whether two handles refer to the very same object.
    pub fn ptr_eq(a: &Handle, b: &Handle) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}@{})", self.0.unit.name(), self.0.id.short())
    }
}
