//! Wrapper declaration macro.

/// Declare a wrapper type around one engine handle.
///
/// The wrapper gets `Clone`, `Debug`, [`Wrapper`](crate::boundary::Wrapper)
/// with the given contract, [`FromValue`](crate::boundary::FromValue) and
/// `IntoValue` for references (passing a wrapper back in hands the engine
/// the very same object).
macro_rules! wrapper {
    ($(#[$meta:meta])* $name:ident => $contract:expr) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name {
            remote: $crate::boundary::Remote,
        }

        impl $crate::boundary::Wrapper for $name {
            const CONTRACT: &'static str = $contract;

            fn from_remote(remote: $crate::boundary::Remote) -> Self {
                Self { remote }
            }

            fn remote(&self) -> &$crate::boundary::Remote {
                &self.remote
            }
        }

        impl $crate::boundary::FromValue for $name {
            fn from_value(
                value: enclave_core::Value,
                invoker: &std::sync::Arc<dyn enclave_core::DynamicInvoke>,
            ) -> enclave_core::Result<Self> {
                $crate::boundary::wrap_value(value, invoker)
            }
        }

        impl $crate::boundary::IntoValue for &$name {
            fn into_value(self) -> enclave_core::Value {
                enclave_core::Value::Object(self.remote.handle().clone())
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_tuple(stringify!($name))
                    .field(self.remote.handle())
                    .finish()
            }
        }
    };
}
