//! # Enclave Facade
//!
//! `enclave_facade` lets the host drive an engine it never links against.
//! Engine objects live in a [`LoadingDomain`](enclave_domain::LoadingDomain)
//! and are reached through a [`Reflector`], which calls members by name and
//! parameter shapes. On top of that sit typed wrappers, one per engine
//! contract, so consumers write `recipe.run(&sources)` rather than
//! name-keyed calls.
//!
//! ```no_run
//! use enclave_core::EnclaveConfig;
//! use enclave_facade::{EngineFacade, ParserKind};
//!
//! # fn main() -> enclave_core::Result<()> {
//! let facade = EngineFacade::from_config(EnclaveConfig::default());
//! let env = facade
//!     .environment_builder(facade.properties())?
//!     .scan_runtime(&["engine.text"])?
//!     .build()?;
//! let recipe = env.activate_recipes(&["engine.text.UpperCase"])?;
//!
//! let ctx = facade.execution_context()?;
//! let parser = facade.parser_builder(ParserKind::Java)?.build()?;
//! let sources = parser.parse(&["A.java".into()], ".".as_ref(), &ctx)?;
//! let results = recipe.run_with_context(&sources, &ctx)?;
//! facade.shutdown()?;
//! # let _ = results;
//! # Ok(())
//! # }
//! ```

#[macro_use]
mod macros;

pub mod boundary;
pub mod facade;
pub mod reflect;
pub mod results;
pub mod wrappers;

pub use boundary::{FromValue, IntoValue, Remote, Wrapper};
pub use facade::{EngineFacade, FacadeBuilder};
pub use reflect::{Call, Reflector};
pub use results::{MovedPath, ResultsContainer, ResultsSummary};
pub use wrappers::*;
