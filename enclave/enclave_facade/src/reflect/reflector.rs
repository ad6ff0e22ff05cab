//! Name-keyed dispatch over a loading domain.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::trace;

use enclave_core::error::{DispatchCause, DispatchError, Error, Result};
use enclave_core::types::shape::display_params;
use enclave_core::{
    CallContext, DynamicInvoke, Handle, LoadedUnit, Member, MemberKind, Shape, TypeName, UnitId,
    Value,
};
use enclave_domain::LoadingDomain;

type LookupKey = (UnitId, MemberKind, String, Vec<Shape>);

/// Reflective invoker over a [`LoadingDomain`].
///
/// Owner types are resolved through the domain, and member bodies run with
/// the domain as their resolver. Successful member lookups are memoized per
/// unit and signature; failed lookups are not.
pub struct Reflector {
    domain: Arc<LoadingDomain>,
    lookups: DashMap<LookupKey, Member>,
}

impl Reflector {
    /// Create a reflector for a domain.
    pub fn new(domain: Arc<LoadingDomain>) -> Self {
        Self {
            domain,
            lookups: DashMap::new(),
        }
    }

    /// The domain calls are resolved in.
    pub fn domain(&self) -> &Arc<LoadingDomain> {
        &self.domain
    }

    /// Number of memoized member lookups.
    pub fn cached_lookups(&self) -> usize {
        self.lookups.len()
    }

    fn lookup(
        &self,
        unit: &LoadedUnit,
        kind: MemberKind,
        name: &str,
        params: &[Shape],
    ) -> std::result::Result<Member, DispatchCause> {
        let key = (unit.id(), kind, name.to_string(), params.to_vec());
        if let Some(member) = self.lookups.get(&key).map(|entry| entry.value().clone()) {
            return Ok(member);
        }

        let table = unit.table();
        match table.find(kind, name, params) {
            Some(member) => {
                let member = member.clone();
                self.lookups.insert(key, member.clone());
                Ok(member)
            }
            None => match table.find_any(name, params) {
                Some(other) => Err(DispatchCause::WrongKind {
                    expected: kind.as_str(),
                    actual: other.kind().as_str(),
                }),
                None => Err(DispatchCause::NoSuchMember(display_params(params))),
            },
        }
    }

    fn dispatch(
        &self,
        unit: &Arc<LoadedUnit>,
        receiver: Option<&Handle>,
        kind: MemberKind,
        name: &str,
        params: &[Shape],
        args: Vec<Value>,
    ) -> Result<Value> {
        let fail = |cause: DispatchCause| -> Error {
            DispatchError::new(unit.name().as_str(), name, cause).into()
        };

        let member = self.lookup(unit, kind, name, params).map_err(fail)?;

        if args.len() != params.len() {
            return Err(fail(DispatchCause::Arity {
                expected: params.len(),
                actual: args.len(),
            }));
        }
        for (index, (shape, arg)) in params.iter().zip(&args).enumerate() {
            if !shape.accepts(arg) {
                return Err(fail(DispatchCause::ArgumentShape {
                    index,
                    expected: shape.to_string(),
                    actual: arg.describe(),
                }));
            }
        }

        trace!(owner = %unit.name(), member = name, params = %display_params(params), "invoke");
        let ctx = CallContext::new(&*self.domain, unit, receiver);
        let value = member
            .call(&ctx, args)
            .map_err(|fault| fail(DispatchCause::Faulted(fault)))?;

        if !member.returns().accepts(&value) {
            return Err(fail(DispatchCause::ReturnShape {
                expected: member.returns().to_string(),
                actual: value.describe(),
            }));
        }
        Ok(value)
    }
}

impl DynamicInvoke for Reflector {
    fn invoke(
        &self,
        target: &Handle,
        member: &str,
        params: &[Shape],
        args: Vec<Value>,
    ) -> Result<Value> {
        let unit = Arc::clone(target.unit());
        self.dispatch(&unit, Some(target), MemberKind::Instance, member, params, args)
    }

    fn invoke_static(
        &self,
        owner: &TypeName,
        member: &str,
        params: &[Shape],
        args: Vec<Value>,
    ) -> Result<Value> {
        let unit = self.domain.resolve_type(owner)?;
        self.dispatch(&unit, None, MemberKind::Static, member, params, args)
    }

    fn construct(&self, owner: &TypeName, params: &[Shape], args: Vec<Value>) -> Result<Handle> {
        let unit = self.domain.resolve_type(owner)?;
        let value = self.dispatch(
            &unit,
            None,
            MemberKind::Constructor,
            enclave_core::CONSTRUCTOR,
            params,
            args,
        )?;
        match value {
            Value::Object(handle) if handle.unit().is_a(owner) => Ok(handle),
            other => Err(DispatchError::new(
                owner.as_str(),
                enclave_core::CONSTRUCTOR,
                DispatchCause::ReturnShape {
                    expected: owner.to_string(),
                    actual: other.describe(),
                },
            )
            .into()),
        }
    }
}

impl fmt::Debug for Reflector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reflector")
            .field("session", &self.domain.session())
            .field("cached_lookups", &self.lookups.len())
            .finish()
    }
}
