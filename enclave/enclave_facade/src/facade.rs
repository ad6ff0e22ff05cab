//! The engine session.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use enclave_core::error::Result;
use enclave_core::utils::ShutdownHook;
use enclave_core::{
    DynamicInvoke, EnclaveConfig, Handle, LoadedUnit, MemberTable, Origin, SessionId, Tier,
    TypeName, UnitProvider, Value,
};
use enclave_domain::{Archive, ArchiveSet, LazyDomain, LoadingDomain};
use enclave_policy::DelegationPolicy;

use crate::boundary::{list, wrap_value, FromValue, IntoValue, Wrapper};
use crate::reflect::{contract, Call, Reflector};
use crate::wrappers::{
    EnvironmentBuilder, ExecutionContext, Marker, NamedStyles, ParserBuilder, ParserKind,
    ProjectProvenanceBuilder, ResourceLoader, SourceFile, TreeSerializer, TypeCache,
};

/// Type name of the host objects that receive engine errors.
const ERROR_LISTENER: &str = "enclave.host.ErrorListener";

/// Entry point to an isolated engine.
///
/// The loading domain is built on first use. All calls made until
/// [`shutdown`](EngineFacade::shutdown) share one domain and one
/// [`Reflector`]; the next call after a shutdown starts a new session.
pub struct EngineFacade {
    domain: LazyDomain,
    session: Mutex<Option<Arc<Reflector>>>,
    properties: BTreeMap<String, String>,
    shutdown_hooks: Vec<ShutdownHook>,
}

impl EngineFacade {
    /// Create a facade over domains built by `factory`.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Result<LoadingDomain> + Send + Sync + 'static,
    {
        Self {
            domain: LazyDomain::new(factory),
            session: Mutex::new(None),
            properties: BTreeMap::new(),
            shutdown_hooks: Vec::new(),
        }
    }

    /// Start building a facade from configuration.
    pub fn builder(config: EnclaveConfig) -> FacadeBuilder {
        FacadeBuilder {
            config,
            system: None,
            host: None,
            archives: Vec::new(),
        }
    }

    /// Create a facade from configuration alone.
    pub fn from_config(config: EnclaveConfig) -> Self {
        Self::builder(config).build()
    }

    /// Set the cleanup members run at shutdown.
    pub fn with_shutdown_hooks(mut self, hooks: Vec<ShutdownHook>) -> Self {
        self.shutdown_hooks = hooks;
        self
    }

    /// Set the default environment properties.
    pub fn with_properties(mut self, properties: BTreeMap<String, String>) -> Self {
        self.properties = properties;
        self
    }

    /// The default environment properties.
    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    /// The current domain, building it if needed.
    pub fn domain(&self) -> Result<Arc<LoadingDomain>> {
        self.domain.get()
    }

    /// The current session, if one is running.
    pub fn session(&self) -> Option<SessionId> {
        self.session.lock().as_ref().map(|r| r.domain().session())
    }

    /// The invoker for the current session.
    pub fn invoker(&self) -> Result<Arc<dyn DynamicInvoke>> {
        Ok(self.reflector()? as Arc<dyn DynamicInvoke>)
    }

    fn reflector(&self) -> Result<Arc<Reflector>> {
        let domain = self.domain.get()?;
        let mut session = self.session.lock();
        if let Some(reflector) = session.as_ref() {
            if Arc::ptr_eq(reflector.domain(), &domain) {
                return Ok(Arc::clone(reflector));
            }
        }
        info!("Opened engine session {}", domain.session());
        let reflector = Arc::new(Reflector::new(domain));
        *session = Some(Arc::clone(&reflector));
        Ok(reflector)
    }

    fn call_static<T: FromValue>(&self, call: &Call, args: Vec<Value>) -> Result<T> {
        let invoker = self.invoker()?;
        let value = invoker.invoke_static(&call.owner_name()?, call.member, &call.shapes()?, args)?;
        T::from_value(value, &invoker)
    }

    pub(crate) fn construct<W: Wrapper>(&self, call: &Call, args: Vec<Value>) -> Result<W> {
        let invoker = self.invoker()?;
        let handle = invoker.construct(&call.owner_name()?, &call.shapes()?, args)?;
        wrap_value(Value::Object(handle), &invoker)
    }

    /// Construct an engine object the facade has no wrapper for.
    pub(crate) fn construct_object(&self, call: &Call, args: Vec<Value>) -> Result<Handle> {
        self.invoker()?
            .construct(&call.owner_name()?, &call.shapes()?, args)
    }

    /// Start configuring an environment.
    pub fn environment_builder(
        &self,
        properties: &BTreeMap<String, String>,
    ) -> Result<EnvironmentBuilder> {
        self.call_static(
            &contract::ENVIRONMENT_BUILDER_NEW,
            vec![crate::boundary::properties(properties)],
        )
    }

    /// A loader for a recipe declaration document.
    pub fn resource_loader(
        &self,
        bytes: Vec<u8>,
        source: &str,
        properties: &BTreeMap<String, String>,
    ) -> Result<ResourceLoader> {
        self.construct(
            &contract::YAML_RESOURCE_LOADER_NEW,
            vec![bytes.into(), source.into_value(), crate::boundary::properties(properties)],
        )
    }

    /// A fresh execution context.
    pub fn execution_context(&self) -> Result<ExecutionContext> {
        self.construct(&contract::EXECUTION_CONTEXT_NEW, vec![])
    }

    /// A fresh execution context that hands each error it records to
    /// `on_error` as it happens.
    pub fn execution_context_with<F>(&self, on_error: F) -> Result<ExecutionContext>
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let listener = error_listener(on_error)?;
        self.construct(
            &contract::EXECUTION_CONTEXT_WITH_ON_ERROR,
            vec![Value::Object(listener)],
        )
    }

    /// Load a named style from a checkstyle configuration file.
    pub fn load_checkstyle_config(
        &self,
        path: &Path,
        properties: &BTreeMap<String, String>,
    ) -> Result<NamedStyles> {
        self.call_static(
            &contract::LOAD_CHECKSTYLE_CONFIG,
            vec![path.into_value(), crate::boundary::properties(properties)],
        )
    }

    /// Start describing the project the sources belong to.
    pub fn project_provenance_builder(&self) -> ProjectProvenanceBuilder<'_> {
        ProjectProvenanceBuilder::new(self)
    }

    /// Start configuring a parser.
    pub fn parser_builder(&self, kind: ParserKind) -> Result<ParserBuilder> {
        self.call_static(&kind.builder_call(), vec![])
    }

    /// A fresh type cache.
    pub fn type_cache(&self) -> Result<TypeCache> {
        self.construct(&contract::TYPE_CACHE_NEW, vec![])
    }

    /// Build a source set marker describing a named compilation unit set.
    pub fn java_source_set(
        &self,
        name: &str,
        classpath: &[PathBuf],
        ctx: &ExecutionContext,
    ) -> Result<Marker> {
        self.call_static(
            &contract::JAVA_SOURCE_SET_BUILD,
            vec![name.into_value(), list(classpath), ctx.into_value()],
        )
    }

    /// A fresh tree serializer.
    pub fn tree_serializer(&self) -> Result<TreeSerializer> {
        self.construct(&contract::TREE_SERIALIZER_NEW, vec![])
    }

    /// Serialize source trees to bytes.
    pub fn serialize(&self, sources: &[SourceFile]) -> Result<Vec<u8>> {
        self.tree_serializer()?.write(sources)
    }

    /// Read source trees back from bytes.
    pub fn deserialize(&self, bytes: Vec<u8>) -> Result<Vec<SourceFile>> {
        self.tree_serializer()?.read_list(bytes)
    }

    /// End the session.
    ///
    /// Runs each shutdown hook in order. An optional hook whose owner the
    /// engine does not define is skipped; every other failure is logged and
    /// the first one is returned after the session has ended regardless.
    pub fn shutdown(&self) -> Result<()> {
        let mut first_error = None;

        if self.domain.is_initialized() {
            let invoker = self.invoker()?;
            for hook in &self.shutdown_hooks {
                let owner = match TypeName::new(&hook.owner) {
                    Ok(owner) => owner,
                    Err(e) => {
                        first_error.get_or_insert(e);
                        continue;
                    }
                };
                match invoker.invoke_static(&owner, &hook.member, &[], vec![]) {
                    Ok(_) => debug!("Ran shutdown hook {}#{}", hook.owner, hook.member),
                    Err(e) if hook.optional && e.is_type_not_found() => {
                        debug!("Skipping optional shutdown hook {}: not defined", hook.owner)
                    }
                    Err(e) => {
                        warn!("Shutdown hook {}#{} failed: {}", hook.owner, hook.member, e);
                        first_error.get_or_insert(e);
                    }
                }
            }
        }

        self.session.lock().take();
        self.domain.reset();
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// A host object implementing the engine's error consumer contract.
fn error_listener<F>(on_error: F) -> Result<Handle>
where
    F: Fn(&str) + Send + Sync + 'static,
{
    let accept = &contract::ERROR_CONSUMER_ACCEPT;
    let table = MemberTable::builder()
        .implements(contract::types::ERROR_CONSUMER)
        .method(accept.member, accept.params, "void", move |_, args| {
            if let Some(message) = args.first().and_then(Value::as_str) {
                on_error(message);
            }
            Ok(Value::Null)
        })
        .build()?;
    let unit = LoadedUnit::define(
        TypeName::new(ERROR_LISTENER)?,
        Arc::new(table),
        Origin {
            tier: Tier::Host,
            location: "host:facade".to_string(),
        },
    );
    Ok(Handle::new(Arc::new(unit), ()))
}

impl std::fmt::Debug for EngineFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineFacade")
            .field("session", &self.session())
            .field("shutdown_hooks", &self.shutdown_hooks.len())
            .finish()
    }
}

/// Builds an [`EngineFacade`] from configuration plus in-process providers.
pub struct FacadeBuilder {
    config: EnclaveConfig,
    system: Option<Arc<dyn UnitProvider>>,
    host: Option<Arc<dyn UnitProvider>>,
    archives: Vec<Arc<dyn Archive>>,
}

impl FacadeBuilder {
    /// Set the system tier provider.
    pub fn system(mut self, provider: Arc<dyn UnitProvider>) -> Self {
        self.system = Some(provider);
        self
    }

    /// Set the host tier provider.
    pub fn host(mut self, provider: Arc<dyn UnitProvider>) -> Self {
        self.host = Some(provider);
        self
    }

    /// Append an already opened archive after the configured ones.
    pub fn archive(mut self, archive: Arc<dyn Archive>) -> Self {
        self.archives.push(archive);
        self
    }

    /// Finish the facade. Archives are opened when the first session starts.
    pub fn build(self) -> EngineFacade {
        let Self {
            config,
            system,
            host,
            archives,
        } = self;
        let paths = config.domain.archives.clone();
        let policy = config.domain.policy.clone();

        let factory = move || -> Result<LoadingDomain> {
            let mut set = ArchiveSet::open(&paths)?;
            for archive in &archives {
                set.push(Arc::clone(archive));
            }
            let mut builder = LoadingDomain::builder()
                .policy(DelegationPolicy::from_config(&policy))
                .archives(set);
            if let Some(system) = &system {
                builder = builder.system(Arc::clone(system));
            }
            if let Some(host) = &host {
                builder = builder.host(Arc::clone(host));
            }
            Ok(builder.build())
        };

        EngineFacade::new(factory)
            .with_properties(config.domain.properties)
            .with_shutdown_hooks(config.engine.shutdown_hooks)
    }
}
