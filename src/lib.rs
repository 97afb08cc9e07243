//! tinvoke: Compile-Time Typed Command Dispatch
//!
//! A registry maps command names to their argument and response shapes, and a
//! single call site ([`Dispatcher::call`] or the [`tinvoke!`] macro) accepts
//! exactly the call shapes each entry permits. Values are handed to an
//! underlying invocation primitive ([`Invoke`]) after deciding which of them
//! are arguments and which are invocation options.
//!
//! The registry is open: any downstream crate adds entries by implementing
//! [`Command`], usually through [`commands!`].

pub mod cli;
pub mod config;
pub mod declaration;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod options;
pub mod registry;
pub mod router;
pub mod transport;

pub use dispatch::{resolve, Dispatcher, Invocation, Params, Slot, WithOptions};
pub use error::InvokeError;
pub use options::{AbortController, AbortSignal, InvokeOptions, OPTION_MARKERS};
pub use registry::{Command, DeclaredArgs, NoArgs, RouteInfo, RouteManifest};
pub use router::Router;
pub use transport::{FnTransport, Invoke};
