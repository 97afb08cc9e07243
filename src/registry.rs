//! Command Registry
//!
//! The registry is the open mapping from command name to `{response, args}`.
//! Each entry is a marker type implementing [`Command`]; any downstream module
//! extends the registry by adding its own impls, without touching this crate.
//!
//! Uniqueness holds at three levels. A second `Command` impl for the same
//! marker is rejected by coherence. A name repeated inside one [`commands!`](crate::commands)
//! block fails const evaluation. Two markers declared in different blocks or
//! crates may still carry the same name; the type system cannot see across
//! them, so [`RouteManifest`] and the router reject the second registration
//! with [`InvokeError::DuplicateRoute`].

use crate::declaration::TypeDecl;
use crate::error::InvokeError;
use serde::de::DeserializeOwned;
use std::any::TypeId;
use ts_rs::TS;

/// Argument shape of a command that takes no arguments.
///
/// Uninhabited and implementing neither `Serialize` nor `Deserialize`, so it
/// never unifies with `()`, `Option<_>`, `serde_json::Value` or a struct shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoArgs {}

/// A registry entry.
pub trait Command: Send + Sync + 'static {
    /// Name forwarded to the invocation primitive.
    const NAME: &'static str;

    /// Shape a successful invocation resolves to.
    type Response: DeserializeOwned + Send + 'static;

    /// Argument shape, or [`NoArgs`].
    type Args: Send + 'static;
}

/// Declare registry entries.
///
/// Each line declares a unit marker type and its [`Command`] impl. The
/// argument type is optional and defaults to [`NoArgs`]:
///
/// ```
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Serialize)]
/// pub struct DeleteItemArgs {
///     #[serde(rename = "itemId")]
///     pub item_id: u64,
/// }
///
/// tinvoke::commands! {
///     pub ListFiles => "list_files": Vec<String>;
///     pub DeleteItem => "delete_item": bool, DeleteItemArgs;
/// }
///
/// use tinvoke::Command;
/// assert_eq!(ListFiles::NAME, "list_files");
/// assert_eq!(DeleteItem::NAME, "delete_item");
/// ```
///
/// Repeating a name inside one block fails to compile:
///
/// ```compile_fail
/// tinvoke::commands! {
///     pub ListFiles => "list_files": Vec<String>;
///     pub ListFilesAgain => "list_files": Vec<String>;
/// }
/// ```
#[macro_export]
macro_rules! commands {
    ($(
        $(#[$meta:meta])*
        $vis:vis $marker:ident => $name:literal : $response:ty $(, $args:ty)? ;
    )*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
            $vis struct $marker;

            impl $crate::registry::Command for $marker {
                const NAME: &'static str = $name;
                type Response = $response;
                type Args = $crate::__command_args!($($args)?);
            }
        )*

        const _: () = $crate::registry::assert_unique_names(&[$($name),*]);
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __command_args {
    () => {
        $crate::registry::NoArgs
    };
    ($args:ty) => {
        $args
    };
}

/// Fails const evaluation when a name repeats.
#[doc(hidden)]
pub const fn assert_unique_names(names: &[&str]) {
    let mut i = 0;
    while i < names.len() {
        let mut j = i + 1;
        while j < names.len() {
            if str_eq(names[i], names[j]) {
                panic!("duplicate command name in commands! block");
            }
            j += 1;
        }
        i += 1;
    }
}

const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// Argument shapes that can be described on the TypeScript side.
///
/// [`NoArgs`] has no declaration; every other shape is described through `ts-rs`.
pub trait DeclaredArgs {
    fn declaration() -> Option<TypeDecl>;
}

impl DeclaredArgs for NoArgs {
    fn declaration() -> Option<TypeDecl> {
        None
    }
}

impl<A: TS + 'static> DeclaredArgs for A {
    fn declaration() -> Option<TypeDecl> {
        Some(TypeDecl::of::<A>())
    }
}

/// Whether a command's argument shape is the [`NoArgs`] marker.
pub fn takes_args<C: Command>() -> bool {
    TypeId::of::<C::Args>() != TypeId::of::<NoArgs>()
}

/// Description of one registry entry.
#[derive(Debug, Clone)]
pub struct RouteInfo {
    pub name: &'static str,
    pub takes_args: bool,
    pub response: TypeDecl,
    pub args: Option<TypeDecl>,
}

impl RouteInfo {
    pub fn of<C>() -> Self
    where
        C: Command,
        C::Response: TS,
        C::Args: DeclaredArgs,
    {
        Self {
            name: C::NAME,
            takes_args: takes_args::<C>(),
            response: TypeDecl::of::<C::Response>(),
            args: <C::Args as DeclaredArgs>::declaration(),
        }
    }
}

/// Append-only list of registry entries known to one component.
///
/// Trait impls cannot be enumerated, so anything that needs the entries at
/// runtime (a router, the declaration emitter) collects them here.
#[derive(Debug, Clone, Default)]
pub struct RouteManifest {
    routes: Vec<RouteInfo>,
}

impl RouteManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an entry. Names must be unique within the manifest, whichever
    /// `commands!` block declared them.
    pub fn register<C>(&mut self) -> Result<&mut Self, InvokeError>
    where
        C: Command,
        C::Response: TS,
        C::Args: DeclaredArgs,
    {
        self.insert(RouteInfo::of::<C>())?;
        Ok(self)
    }

    /// Builder form of [`RouteManifest::register`].
    pub fn with<C>(mut self) -> Result<Self, InvokeError>
    where
        C: Command,
        C::Response: TS,
        C::Args: DeclaredArgs,
    {
        self.register::<C>()?;
        Ok(self)
    }

    pub fn insert(&mut self, info: RouteInfo) -> Result<(), InvokeError> {
        if self.contains(info.name) {
            return Err(InvokeError::DuplicateRoute(info.name.to_string()));
        }
        self.routes.push(info);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&RouteInfo> {
        self.routes.iter().find(|route| route.name == name)
    }

    pub fn routes(&self) -> &[RouteInfo] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
