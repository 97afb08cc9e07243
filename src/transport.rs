//! Invocation Primitive
//!
//! The seam between the dispatcher and whatever actually performs a named call.
//! The dispatcher makes exactly one [`Invoke::invoke`] call per dispatch and
//! hands back the primitive's result untouched.

use crate::error::InvokeError;
use crate::options::InvokeOptions;
use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// Underlying invocation primitive.
#[async_trait]
pub trait Invoke: Send + Sync {
    /// Perform the named call. `args` and `options` are `None` when absent.
    async fn invoke(
        &self,
        command: &str,
        args: Option<Value>,
        options: Option<InvokeOptions>,
    ) -> Result<Value, InvokeError>;
}

#[async_trait]
impl<T: Invoke + ?Sized> Invoke for Arc<T> {
    async fn invoke(
        &self,
        command: &str,
        args: Option<Value>,
        options: Option<InvokeOptions>,
    ) -> Result<Value, InvokeError> {
        (**self).invoke(command, args, options).await
    }
}

#[async_trait]
impl<'a, T: Invoke + ?Sized> Invoke for &'a T {
    async fn invoke(
        &self,
        command: &str,
        args: Option<Value>,
        options: Option<InvokeOptions>,
    ) -> Result<Value, InvokeError> {
        (**self).invoke(command, args, options).await
    }
}

#[async_trait]
impl<T: Invoke + ?Sized> Invoke for Box<T> {
    async fn invoke(
        &self,
        command: &str,
        args: Option<Value>,
        options: Option<InvokeOptions>,
    ) -> Result<Value, InvokeError> {
        (**self).invoke(command, args, options).await
    }
}

/// Primitive backed by a closure.
pub struct FnTransport<F> {
    f: F,
}

impl<F, Fut> FnTransport<F>
where
    F: Fn(String, Option<Value>, Option<InvokeOptions>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, InvokeError>> + Send + 'static,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> Invoke for FnTransport<F>
where
    F: Fn(String, Option<Value>, Option<InvokeOptions>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, InvokeError>> + Send + 'static,
{
    async fn invoke(
        &self,
        command: &str,
        args: Option<Value>,
        options: Option<InvokeOptions>,
    ) -> Result<Value, InvokeError> {
        (self.f)(command.to_string(), args, options).await
    }
}
