//! Loaded units and their members.
//!
//! A [`LoadedUnit`] is what a domain hands out for a resolved type name. It
//! couples the name and its origin with a [`MemberTable`]: the constructors,
//! static members and instance members the type exposes, each declared with
//! parameter and return [`Shape`]s.
//!
//! Tables are immutable and shared. Defining a type from an archive creates a
//! new unit (with a new [`UnitId`]) around the archive's table, so two
//! domains built from the same archive still see two distinct units.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::{ArchiveError, Fault, Result};
use crate::id::UnitId;
use crate::name::TypeName;
use crate::traits::UnitResolver;
use crate::types::handle::Handle;
use crate::types::shape::{display_params, Shape};
use crate::types::tier::Tier;
use crate::types::value::Value;

/// Name under which constructors are registered.
pub const CONSTRUCTOR: &str = "<init>";

/// The body of a member.
pub type MemberFn =
    Arc<dyn Fn(&CallContext<'_>, Vec<Value>) -> std::result::Result<Value, Fault> + Send + Sync>;

/// Where a unit was defined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    /// The tier that supplied the definition.
    pub tier: Tier,

    /// The archive or registry location.
    pub location: String,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.tier, self.location)
    }
}

/// The kind of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// Creates a new instance of the owner.
    Constructor,

    /// Called without a receiver.
    Static,

    /// Called on an instance.
    Instance,
}

impl MemberKind {
    /// Get the name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Constructor => "a constructor",
            Self::Static => "static",
            Self::Instance => "an instance member",
        }
    }
}

/// A constructor or method of a unit.
#[derive(Clone)]
pub struct Member {
    kind: MemberKind,
    name: String,
    params: Vec<Shape>,
    returns: Shape,
    body: MemberFn,
}

impl Member {
    /// The member kind.
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// The member name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared parameter shapes.
    pub fn params(&self) -> &[Shape] {
        &self.params
    }

    /// Declared return shape.
    pub fn returns(&self) -> &Shape {
        &self.returns
    }

    /// Run the body.
    pub fn call(&self, ctx: &CallContext<'_>, args: Vec<Value>) -> std::result::Result<Value, Fault> {
        (self.body)(ctx, args)
    }

    /// Render as `name(a, b) -> r`.
    pub fn signature(&self) -> String {
        format!(
            "{}({}) -> {}",
            self.name,
            display_params(&self.params),
            self.returns
        )
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("kind", &self.kind)
            .field("signature", &self.signature())
            .finish()
    }
}

/// The members of a type, plus the contracts it implements.
#[derive(Default)]
pub struct MemberTable {
    contracts: Vec<TypeName>,
    members: Vec<Member>,
    _anchor: Option<Arc<dyn Any + Send + Sync>>,
}

impl MemberTable {
    /// Start declaring a table.
    pub fn builder() -> MemberTableBuilder {
        MemberTableBuilder::default()
    }

    /// Contracts (other than its own name) the type implements.
    pub fn contracts(&self) -> &[TypeName] {
        &self.contracts
    }

    /// All members.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Find a member by kind, name and exact parameter shapes.
    pub fn find(&self, kind: MemberKind, name: &str, params: &[Shape]) -> Option<&Member> {
        self.members
            .iter()
            .find(|m| m.kind == kind && m.name == name && m.params == params)
    }

    /// Find any member by name and exact parameter shapes, whatever its kind.
    pub fn find_any(&self, name: &str, params: &[Shape]) -> Option<&Member> {
        self.members
            .iter()
            .find(|m| m.name == name && m.params == params)
    }
}

impl fmt::Debug for MemberTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberTable")
            .field("contracts", &self.contracts)
            .field("members", &self.members)
            .finish()
    }
}

/// Builder for [`MemberTable`].
///
/// Shapes are given as descriptors; the first malformed descriptor is
/// reported by [`build`](MemberTableBuilder::build).
#[derive(Default)]
pub struct MemberTableBuilder {
    table: MemberTable,
    error: Option<ArchiveError>,
}

impl MemberTableBuilder {
    /// Declare a contract the type implements.
    pub fn implements(mut self, contract: &str) -> Self {
        match TypeName::new(contract) {
            Ok(name) => self.table.contracts.push(name),
            Err(e) => self.fail(contract, e.to_string()),
        }
        self
    }

    /// Declare a constructor.
    pub fn constructor<F>(self, params: &[&str], body: F) -> Self
    where
        F: Fn(&CallContext<'_>, Vec<Value>) -> std::result::Result<Value, Fault>
            + Send
            + Sync
            + 'static,
    {
        self.member(MemberKind::Constructor, CONSTRUCTOR, params, "any", body)
    }

    /// Declare a static member.
    pub fn static_method<F>(self, name: &str, params: &[&str], returns: &str, body: F) -> Self
    where
        F: Fn(&CallContext<'_>, Vec<Value>) -> std::result::Result<Value, Fault>
            + Send
            + Sync
            + 'static,
    {
        self.member(MemberKind::Static, name, params, returns, body)
    }

    /// Declare an instance member.
    pub fn method<F>(self, name: &str, params: &[&str], returns: &str, body: F) -> Self
    where
        F: Fn(&CallContext<'_>, Vec<Value>) -> std::result::Result<Value, Fault>
            + Send
            + Sync
            + 'static,
    {
        self.member(MemberKind::Instance, name, params, returns, body)
    }

    /// Keep `anchor` alive for as long as any unit uses this table.
    ///
    /// Used by archives whose member bodies live in a loaded library.
    pub fn anchor(mut self, anchor: Arc<dyn Any + Send + Sync>) -> Self {
        self.table._anchor = Some(anchor);
        self
    }

    /// Finish the table.
    pub fn build(self) -> Result<MemberTable> {
        match self.error {
            Some(e) => Err(e.into()),
            None => Ok(self.table),
        }
    }

    fn member<F>(mut self, kind: MemberKind, name: &str, params: &[&str], returns: &str, body: F) -> Self
    where
        F: Fn(&CallContext<'_>, Vec<Value>) -> std::result::Result<Value, Fault>
            + Send
            + Sync
            + 'static,
    {
        let parsed = Shape::parse_all(params).and_then(|p| Ok((p, returns.parse::<Shape>()?)));
        match parsed {
            Ok((params, returns)) => self.table.members.push(Member {
                kind,
                name: name.to_string(),
                params,
                returns,
                body: Arc::new(body),
            }),
            Err(e) => self.fail(name, e.to_string()),
        }
        self
    }

    fn fail(&mut self, member: &str, reason: String) {
        if self.error.is_none() {
            self.error = Some(ArchiveError::InvalidDeclaration {
                member: member.to_string(),
                reason,
            });
        }
    }
}

/// A type resolved through a domain.
pub struct LoadedUnit {
    id: UnitId,
    name: TypeName,
    origin: Origin,
    table: Arc<MemberTable>,
}

impl LoadedUnit {
    /// Define a unit from a shared table.
    pub fn define(name: TypeName, table: Arc<MemberTable>, origin: Origin) -> Self {
        Self {
            id: UnitId::new(),
            name,
            origin,
            table,
        }
    }

    /// The unit id. Distinct for every definition.
    pub fn id(&self) -> UnitId {
        self.id
    }

    /// The type name.
    pub fn name(&self) -> &TypeName {
        &self.name
    }

    /// Where the unit was defined.
    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// The member table.
    pub fn table(&self) -> &MemberTable {
        &self.table
    }

    /// Check whether the unit is, or implements, the named contract.
    pub fn is_a(&self, contract: &TypeName) -> bool {
        &self.name == contract || self.table.contracts.iter().any(|c| c == contract)
    }
}

impl fmt::Debug for LoadedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedUnit")
            .field("name", &self.name)
            .field("origin", &self.origin)
            .field("id", &self.id.short())
            .finish()
    }
}

/// What a member body sees while it runs.
pub struct CallContext<'a> {
    resolver: &'a dyn UnitResolver,
    owner: &'a Arc<LoadedUnit>,
    receiver: Option<&'a Handle>,
}

impl<'a> CallContext<'a> {
    /// Create a context for a call on `owner`.
    pub fn new(
        resolver: &'a dyn UnitResolver,
        owner: &'a Arc<LoadedUnit>,
        receiver: Option<&'a Handle>,
    ) -> Self {
        Self {
            resolver,
            owner,
            receiver,
        }
    }

    /// The unit that declares the running member.
    pub fn owner(&self) -> &Arc<LoadedUnit> {
        self.owner
    }

    /// The receiver of an instance call.
    pub fn this(&self) -> std::result::Result<&Handle, Fault> {
        self.receiver
            .ok_or_else(|| Fault::from(format!("{} called without a receiver", self.owner.name())))
    }

    /// Downcast the receiver's state.
    pub fn state<S: Any>(&self) -> std::result::Result<&S, Fault> {
        let this = self.this()?;
        this.state::<S>().ok_or_else(|| {
            Fault::from(format!(
                "receiver {} does not carry the expected state",
                this.type_name()
            ))
        })
    }

    /// Create an instance of the owner.
    pub fn instantiate_owner<S: Any + Send + Sync>(&self, state: S) -> Handle {
        Handle::new(Arc::clone(self.owner), state)
    }

    /// Create an instance of another type, resolved through the domain that
    /// defined the owner.
    pub fn instantiate<S: Any + Send + Sync>(
        &self,
        type_name: &str,
        state: S,
    ) -> std::result::Result<Handle, Fault> {
        let name = TypeName::new(type_name).map_err(|e| Fault::from(e.to_string()))?;
        let unit = self
            .resolver
            .resolve_unit(&name)
            .map_err(|e| Fault::from(e.to_string()))?;
        Ok(Handle::new(unit, state))
    }

    /// The resolver the owner was defined through.
    pub fn resolver(&self) -> &dyn UnitResolver {
        self.resolver
    }

    /// Call an instance method on another object, such as a host callback
    /// passed in as an argument.
    pub fn invoke(
        &self,
        target: &Handle,
        method: &str,
        params: &[Shape],
        args: Vec<Value>,
    ) -> std::result::Result<Value, Fault> {
        let unit = target.unit();
        let member = unit
            .table()
            .find(MemberKind::Instance, method, params)
            .ok_or_else(|| {
                Fault::from(format!(
                    "{} has no method {}({})",
                    unit.name(),
                    method,
                    display_params(params)
                ))
            })?;
        member.call(&CallContext::new(self.resolver, unit, Some(target)), args)
    }
}
