//! Invocation Options
//!
//! Pass-through configuration for the invocation primitive. The dispatcher never
//! reads these values; it only needs to tell an options object apart from an
//! arguments object when a single positional value is supplied.
//!
//! [`OPTION_MARKERS`] is the contract between this crate and anyone designing
//! command argument shapes: an argument object that carries one of these field
//! names is read as options when it is the only value after the command name.
//! Use the three-value call shape for such commands.
//!
//! Reading options from raw JSON never fails. Fields that do not fit the typed
//! form stay in [`InvokeOptions::extra`], and a value that is not an object is
//! kept whole in [`InvokeOptions::raw`]. Both are forwarded unchanged.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Field names that mark a lone positional JSON object as options.
pub const OPTION_MARKERS: [&str; 3] = ["headers", "timeout", "signal"];

/// Header collection forwarded to the primitive.
pub type Headers = BTreeMap<String, String>;

/// Options attached to one invocation.
///
/// `timeout` travels as milliseconds in its JSON form. `signal` has no JSON
/// form; a `signal` field found in raw JSON is kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvokeOptions {
    pub headers: Option<Headers>,
    pub timeout: Option<Duration>,
    pub signal: Option<AbortSignal>,
    /// Fields without a typed reading, forwarded as given.
    pub extra: Map<String, Value>,
    /// A non-object value supplied where options were expected.
    pub raw: Option<Value>,
}

impl InvokeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one header, creating the collection if needed.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(Headers::new)
            .insert(name.into(), value.into());
        self
    }

    /// Replace the header collection.
    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers = Some(
            headers
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn signal(mut self, signal: AbortSignal) -> Self {
        self.signal = Some(signal);
        self
    }

    /// Attach a field the primitive understands but this crate does not.
    pub fn field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.extra.insert(name.into(), value);
        self
    }

    /// Read options from raw JSON without losing anything.
    ///
    /// `headers` is typed only when every value is a string and `timeout` only
    /// when it is a whole number of milliseconds. Anything else is kept in
    /// `extra` under its original name.
    pub fn from_json(value: Value) -> Self {
        let Value::Object(mut fields) = value else {
            return Self {
                raw: Some(value),
                ..Self::default()
            };
        };

        let headers = take_headers(&mut fields);
        let timeout = take_timeout(&mut fields);
        Self {
            headers,
            timeout,
            signal: None,
            extra: fields,
            raw: None,
        }
    }

    /// JSON form handed to primitives and tooling.
    pub fn to_json(&self) -> Value {
        if let Some(raw) = &self.raw {
            return raw.clone();
        }

        let mut fields = self.extra.clone();
        if let Some(headers) = &self.headers {
            let headers = headers
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect();
            fields.insert("headers".to_string(), Value::Object(headers));
        }
        if let Some(timeout) = self.timeout {
            let ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
            fields.insert("timeout".to_string(), Value::from(ms));
        }
        Value::Object(fields)
    }

    /// Whether any marker field is set, typed or carried in `extra`.
    pub fn has_marker(&self) -> bool {
        self.headers.is_some()
            || self.timeout.is_some()
            || self.signal.is_some()
            || OPTION_MARKERS.iter().any(|key| self.extra.contains_key(*key))
    }
}

fn take_headers(fields: &mut Map<String, Value>) -> Option<Headers> {
    let headers = fields
        .get("headers")?
        .as_object()?
        .iter()
        .map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_string())))
        .collect::<Option<Headers>>()?;
    fields.remove("headers");
    Some(headers)
}

fn take_timeout(fields: &mut Map<String, Value>) -> Option<Duration> {
    let ms = fields.get("timeout")?.as_u64()?;
    fields.remove("timeout");
    Some(Duration::from_millis(ms))
}

impl Serialize for InvokeOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for InvokeOptions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_json)
    }
}

#[derive(Debug, Default)]
struct AbortState {
    aborted: AtomicBool,
    notify: Notify,
}

/// Owner side of a cancellation signal.
#[derive(Debug, Clone, Default)]
pub struct AbortController {
    state: Arc<AbortState>,
}

impl AbortController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signal(&self) -> AbortSignal {
        AbortSignal {
            state: Arc::clone(&self.state),
        }
    }

    /// Abort every invocation holding a signal from this controller. Idempotent.
    pub fn abort(&self) {
        if !self.state.aborted.swap(true, Ordering::SeqCst) {
            self.state.notify.notify_waiters();
        }
    }
}

/// Cancellation signal handed to the primitive through [`InvokeOptions`].
#[derive(Debug, Clone)]
pub struct AbortSignal {
    state: Arc<AbortState>,
}

impl AbortSignal {
    pub fn is_aborted(&self) -> bool {
        self.state.aborted.load(Ordering::SeqCst)
    }

    /// Resolves once the controller aborts.
    pub async fn aborted(&self) {
        loop {
            let notified = self.state.notify.notified();
            if self.is_aborted() {
                return;
            }
            notified.await;
        }
    }
}

impl PartialEq for AbortSignal {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}
