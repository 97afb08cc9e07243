//! In-Process Router
//!
//! An invocation primitive that serves commands from handlers living in the same
//! process. Handlers are registered against registry entries, so they receive
//! exactly the argument shape callers were typed against and must produce the
//! declared response shape.
//!
//! The router honours `timeout` and `signal` from [`InvokeOptions`]; headers are
//! accepted and ignored.

use crate::error::InvokeError;
use crate::options::InvokeOptions;
use crate::registry::{Command, DeclaredArgs, NoArgs, RouteManifest};
use crate::transport::Invoke;
use async_trait::async_trait;
use futures::future::{self, BoxFuture, FutureExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;
use ts_rs::TS;

/// How a handler receives a command's arguments.
pub trait HandlerArgs: Sized {
    /// Value handed to the handler: `()` for [`NoArgs`], the shape otherwise.
    type Input: Send;

    fn decode(command: &str, args: Option<Value>) -> Result<Self::Input, InvokeError>;
}

impl HandlerArgs for NoArgs {
    type Input = ();

    fn decode(_command: &str, _args: Option<Value>) -> Result<(), InvokeError> {
        Ok(())
    }
}

impl<A: DeserializeOwned + Send> HandlerArgs for A {
    type Input = A;

    fn decode(command: &str, args: Option<Value>) -> Result<A, InvokeError> {
        serde_json::from_value(args.unwrap_or(Value::Null))
            .map_err(|e| InvokeError::rejected(command, format!("invalid arguments: {}", e)))
    }
}

type BoxedHandler =
    Arc<dyn Fn(Option<Value>) -> BoxFuture<'static, Result<Value, InvokeError>> + Send + Sync>;

/// Name → handler table.
#[derive(Clone, Default)]
pub struct Router {
    handlers: HashMap<&'static str, BoxedHandler>,
    manifest: RouteManifest,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handler for one command. Each name is served once, even
    /// when two `commands!` blocks declare it.
    pub fn route<C, H, Fut>(mut self, _command: C, handler: H) -> Result<Self, InvokeError>
    where
        C: Command,
        C::Args: HandlerArgs + DeclaredArgs,
        C::Response: Serialize + TS,
        H: Fn(<C::Args as HandlerArgs>::Input) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<C::Response, InvokeError>> + Send + 'static,
    {
        self.manifest.register::<C>()?;

        let boxed: BoxedHandler = Arc::new(move |args: Option<Value>| {
            let input = match <C::Args as HandlerArgs>::decode(C::NAME, args) {
                Ok(input) => input,
                Err(e) => return future::ready(Err(e)).boxed(),
            };
            let pending = handler(input);
            async move {
                let response = pending.await?;
                serde_json::to_value(response).map_err(InvokeError::Encode)
            }
            .boxed()
        });
        self.handlers.insert(C::NAME, boxed);

        debug!(command = C::NAME, "Registered route");
        Ok(self)
    }

    /// Entries this router serves.
    pub fn manifest(&self) -> &RouteManifest {
        &self.manifest
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.manifest.routes())
            .finish()
    }
}

fn elapsed_ms(limit: std::time::Duration) -> u64 {
    u64::try_from(limit.as_millis()).unwrap_or(u64::MAX)
}

#[async_trait]
impl Invoke for Router {
    async fn invoke(
        &self,
        command: &str,
        args: Option<Value>,
        options: Option<InvokeOptions>,
    ) -> Result<Value, InvokeError> {
        let handler = self
            .handlers
            .get(command)
            .cloned()
            .ok_or_else(|| InvokeError::rejected(command, "command not found"))?;
        let InvokeOptions {
            timeout, signal, ..
        } = options.unwrap_or_default();

        let call = async {
            let pending = handler(args);
            match timeout {
                Some(limit) => tokio::time::timeout(limit, pending)
                    .await
                    .map_err(|_| InvokeError::Timeout {
                        command: command.to_string(),
                        elapsed_ms: elapsed_ms(limit),
                    })?,
                None => pending.await,
            }
        };

        match signal {
            Some(signal) => {
                tokio::select! {
                    biased;
                    _ = signal.aborted() => Err(InvokeError::Aborted(command.to_string())),
                    result = call => result,
                }
            }
            None => call.await,
        }
    }
}
