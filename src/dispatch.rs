//! Typed Dispatch
//!
//! A single call site for every registered command. Which values may follow the
//! command is decided by the type checker through [`Params`]:
//!
//! | shape                         | allowed when            | params value           |
//! |-------------------------------|-------------------------|------------------------|
//! | `call(name)`                  | `Args = NoArgs`         | `()`                   |
//! | `call(name, options)`         | `Args = NoArgs`         | [`InvokeOptions`]      |
//! | `call(name, args)`            | `Args != NoArgs`        | `C::Args`              |
//! | `call(name, args, options)`   | `Args != NoArgs`        | [`WithOptions`]        |
//!
//! The [`tinvoke!`](crate::tinvoke) macro spells these with one to three
//! positional values. Whatever shape was selected, the body lowers the values
//! into positional [`Slot`]s and runs one runtime disambiguation ([`resolve`]),
//! which is also what untyped callers go through ([`Dispatcher::call_dynamic`]).
//!
//! ```
//! use serde::Serialize;
//! use serde_json::json;
//! use tinvoke::{tinvoke, Dispatcher, FnTransport, InvokeOptions};
//!
//! #[derive(Debug, Serialize)]
//! pub struct DeleteItemArgs {
//!     #[serde(rename = "itemId")]
//!     pub item_id: u64,
//! }
//!
//! tinvoke::commands! {
//!     pub ListFiles => "list_files": Vec<String>;
//!     pub DeleteItem => "delete_item": bool, DeleteItemArgs;
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), tinvoke::InvokeError> {
//! let client = Dispatcher::new(FnTransport::new(|command, _args, _options| async move {
//!     Ok(match command.as_str() {
//!         "list_files" => json!(["a.txt", "b.txt"]),
//!         _ => json!(true),
//!     })
//! }));
//!
//! let options = InvokeOptions::new().header("Authorization", "Bearer token");
//!
//! let files: Vec<String> = tinvoke!(client, ListFiles).await?;
//! let files_again: Vec<String> = tinvoke!(client, ListFiles, options.clone()).await?;
//! let deleted: bool = tinvoke!(client, DeleteItem, DeleteItemArgs { item_id: 123 }).await?;
//! let deleted_again: bool =
//!     tinvoke!(client, DeleteItem, DeleteItemArgs { item_id: 123 }, options).await?;
//!
//! assert_eq!(files, files_again);
//! assert!(deleted && deleted_again);
//! # Ok(())
//! # }
//! ```
//!
//! Passing arguments to a command that takes none does not compile:
//!
//! ```compile_fail
//! # use tinvoke::{Dispatcher, FnTransport};
//! # #[derive(serde::Serialize)]
//! # pub struct SomeArgs { pub some_param: String }
//! # tinvoke::commands! { pub ListFiles => "list_files": Vec<String>; }
//! # async fn run() {
//! # let client = Dispatcher::new(FnTransport::new(|_, _, _| async { Ok(serde_json::Value::Null) }));
//! let _ = client.call(ListFiles, SomeArgs { some_param: "value".into() }).await;
//! # }
//! ```
//!
//! Omitting required arguments does not compile:
//!
//! ```compile_fail
//! # use tinvoke::{Dispatcher, FnTransport};
//! # #[derive(serde::Serialize)]
//! # pub struct DeleteItemArgs { pub item_id: u64 }
//! # tinvoke::commands! { pub DeleteItem => "delete_item": bool, DeleteItemArgs; }
//! # async fn run() {
//! # let client = Dispatcher::new(FnTransport::new(|_, _, _| async { Ok(serde_json::Value::Null) }));
//! let _ = tinvoke::tinvoke!(client, DeleteItem).await;
//! # }
//! ```
//!
//! Options alone are not arguments either:
//!
//! ```compile_fail
//! # use tinvoke::{Dispatcher, FnTransport, InvokeOptions};
//! # #[derive(serde::Serialize)]
//! # pub struct DeleteItemArgs { pub item_id: u64 }
//! # tinvoke::commands! { pub DeleteItem => "delete_item": bool, DeleteItemArgs; }
//! # async fn run() {
//! # let client = Dispatcher::new(FnTransport::new(|_, _, _| async { Ok(serde_json::Value::Null) }));
//! let _ = client.call(DeleteItem, InvokeOptions::new()).await;
//! # }
//! ```
//!
//! A wrong argument shape does not compile:
//!
//! ```compile_fail
//! # use tinvoke::{Dispatcher, FnTransport};
//! # #[derive(serde::Serialize)]
//! # pub struct DeleteItemArgs { pub item_id: u64 }
//! # #[derive(serde::Serialize)]
//! # pub struct WrongArgs { pub id: u64 }
//! # tinvoke::commands! { pub DeleteItem => "delete_item": bool, DeleteItemArgs; }
//! # async fn run() {
//! # let client = Dispatcher::new(FnTransport::new(|_, _, _| async { Ok(serde_json::Value::Null) }));
//! let _ = client.call(DeleteItem, WrongArgs { id: 123 }).await;
//! # }
//! ```
//!
//! Nor does an untyped JSON value in place of the declared shape:
//!
//! ```compile_fail
//! # use tinvoke::{Dispatcher, FnTransport};
//! # #[derive(serde::Serialize)]
//! # pub struct DeleteItemArgs { pub item_id: u64 }
//! # tinvoke::commands! { pub DeleteItem => "delete_item": bool, DeleteItemArgs; }
//! # async fn run() {
//! # let client = Dispatcher::new(FnTransport::new(|_, _, _| async { Ok(serde_json::Value::Null) }));
//! let _ = client.call(DeleteItem, serde_json::json!({"itemId": 123})).await;
//! # }
//! ```
//!
//! Nor does a command that is not in the registry:
//!
//! ```compile_fail
//! # use tinvoke::{Dispatcher, FnTransport};
//! # pub struct InvalidCommand;
//! # async fn run() {
//! # let client = Dispatcher::new(FnTransport::new(|_, _, _| async { Ok(serde_json::Value::Null) }));
//! let _ = client.call(InvalidCommand, ()).await;
//! # }
//! ```

use crate::error::InvokeError;
use crate::options::{InvokeOptions, OPTION_MARKERS};
use crate::registry::{Command, NoArgs};
use crate::transport::Invoke;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

/// One positional value supplied after the command name.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    /// A typed options value.
    Options(InvokeOptions),
    /// An untyped value: typed arguments after encoding, or raw caller input.
    Json(Value),
}

impl Slot {
    /// Whether this value is taken as options when it is the only one supplied.
    pub fn looks_like_options(&self) -> bool {
        match self {
            Slot::Options(options) => options.has_marker(),
            Slot::Json(value) => is_options_object(value),
        }
    }

    fn into_args(self) -> Value {
        match self {
            Slot::Json(value) => value,
            Slot::Options(options) => options.to_json(),
        }
    }

    fn into_options(self) -> InvokeOptions {
        match self {
            Slot::Options(options) => options,
            Slot::Json(value) => {
                if value.get("signal").is_some() {
                    debug!("signal field in raw options has no runtime form; forwarded as JSON");
                }
                InvokeOptions::from_json(value)
            }
        }
    }
}

/// A non-null JSON object carrying at least one of [`OPTION_MARKERS`].
pub fn is_options_object(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|map| OPTION_MARKERS.iter().any(|key| map.contains_key(*key)))
}

/// The disambiguated triple handed to the primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub command: String,
    pub args: Option<Value>,
    pub options: Option<InvokeOptions>,
}

/// Decide which positional values are arguments and which are options.
///
/// - two values: arguments then options, whatever their shape
/// - one value: options if [`Slot::looks_like_options`], arguments otherwise
/// - none: both absent
///
/// Any other count falls through to "both absent", same as the name-only call.
/// Nothing is rejected: options that do not fit the typed form are forwarded
/// through [`InvokeOptions::extra`] and [`InvokeOptions::raw`].
pub fn resolve(command: &str, slots: Vec<Slot>) -> Invocation {
    let mut slots = slots.into_iter();
    let (args, options) = match (slots.next(), slots.next(), slots.len()) {
        (None, _, _) => (None, None),
        (Some(only), None, _) => {
            if only.looks_like_options() {
                (None, Some(only.into_options()))
            } else {
                (Some(only.into_args()), None)
            }
        }
        (Some(args), Some(options), 0) => (Some(args.into_args()), Some(options.into_options())),
        (Some(_), Some(_), rest) => {
            warn!(
                command,
                arity = rest + 3,
                "Unexpected call arity; forwarding without arguments or options"
            );
            (None, None)
        }
    };

    Invocation {
        command: command.to_string(),
        args,
        options,
    }
}

/// Values that may follow a command whose argument shape is `A`.
///
/// Implemented for `()` and [`InvokeOptions`] when `A` is [`NoArgs`], and for
/// `A` itself and [`WithOptions<A>`] when `A` is a serializable shape. No other
/// combination exists, which is what turns call-shape misuse into type errors.
pub trait Params<A> {
    fn into_slots(self) -> Result<Vec<Slot>, InvokeError>;
}

impl Params<NoArgs> for () {
    fn into_slots(self) -> Result<Vec<Slot>, InvokeError> {
        Ok(Vec::new())
    }
}

impl Params<NoArgs> for InvokeOptions {
    fn into_slots(self) -> Result<Vec<Slot>, InvokeError> {
        Ok(vec![Slot::Options(self)])
    }
}

impl<A: Serialize> Params<A> for A {
    fn into_slots(self) -> Result<Vec<Slot>, InvokeError> {
        let args = serde_json::to_value(&self).map_err(InvokeError::Encode)?;
        Ok(vec![Slot::Json(args)])
    }
}

/// Arguments together with options: the three-value call shape.
#[derive(Debug, Clone)]
pub struct WithOptions<A>(pub A, pub InvokeOptions);

impl<A: Serialize> Params<A> for WithOptions<A> {
    fn into_slots(self) -> Result<Vec<Slot>, InvokeError> {
        let WithOptions(args, options) = self;
        let args = serde_json::to_value(&args).map_err(InvokeError::Encode)?;
        Ok(vec![Slot::Json(args), Slot::Options(options)])
    }
}

/// Typed front of an invocation primitive.
///
/// Holds nothing but the primitive; every call is independent.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher<T> {
    transport: T,
}

impl<T: Invoke> Dispatcher<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Invoke a registered command and decode its response.
    pub async fn call<C, P>(&self, _command: C, params: P) -> Result<C::Response, InvokeError>
    where
        C: Command,
        P: Params<C::Args>,
    {
        let slots = params.into_slots()?;
        let value = self.dispatch(C::NAME, slots).await?;
        serde_json::from_value(value).map_err(|source| InvokeError::Decode {
            command: C::NAME.to_string(),
            source,
        })
    }

    /// Invoke by name with raw positional values, as an untyped caller would.
    pub async fn call_dynamic(
        &self,
        command: &str,
        values: Vec<Value>,
    ) -> Result<Value, InvokeError> {
        let slots = values.into_iter().map(Slot::Json).collect();
        self.dispatch(command, slots).await
    }

    async fn dispatch(&self, command: &str, slots: Vec<Slot>) -> Result<Value, InvokeError> {
        let arity = slots.len() + 1;
        let invocation = resolve(command, slots);
        debug!(
            command = %invocation.command,
            arity,
            has_args = invocation.args.is_some(),
            has_options = invocation.options.is_some(),
            "Dispatching command"
        );

        self.transport
            .invoke(&invocation.command, invocation.args, invocation.options)
            .await
    }
}

/// Call a registered command with one to three positional values.
///
/// ```ignore
/// tinvoke!(client, ListFiles)
/// tinvoke!(client, ListFiles, options)
/// tinvoke!(client, DeleteItem, args)
/// tinvoke!(client, DeleteItem, args, options)
/// ```
///
/// Expands to a [`Dispatcher::call`] future.
#[macro_export]
macro_rules! tinvoke {
    ($dispatcher:expr, $command:expr $(,)?) => {
        $dispatcher.call($command, ())
    };
    ($dispatcher:expr, $command:expr, $params:expr $(,)?) => {
        $dispatcher.call($command, $params)
    };
    ($dispatcher:expr, $command:expr, $args:expr, $options:expr $(,)?) => {
        $dispatcher.call($command, $crate::dispatch::WithOptions($args, $options))
    };
}
