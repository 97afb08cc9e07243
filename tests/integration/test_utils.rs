//! Shared test utilities for integration tests
//!
//! A recording primitive plus the registry used across dispatch tests, and
//! isolated XDG directories for configuration tests.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tinvoke::{Invocation, InvokeError, InvokeOptions};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
pub struct User {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
pub struct CreateTaskArgs {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
pub struct DeleteItemArgs {
    #[serde(rename = "itemId")]
    pub item_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
pub struct UpdateSettingsArgs {
    pub theme: String,
}

tinvoke::commands! {
    pub GetUser => "get_user": User;
    pub ListFiles => "list_files": Vec<String>;
    pub CreateTask => "create_task": Value, CreateTaskArgs;
    pub DeleteItem => "delete_item": bool, DeleteItemArgs;
    pub UpdateSettings => "update_settings": (), UpdateSettingsArgs;
}

/// Primitive that records every triple it receives and answers from a fixed map.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    calls: Arc<Mutex<Vec<Invocation>>>,
    replies: Arc<Mutex<Vec<(String, Result<Value, String>)>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `command` with `value`.
    pub fn reply(self, command: &str, value: Value) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push((command.to_string(), Ok(value)));
        self
    }

    /// Fail `command` with a transport error carrying `message`.
    pub fn fail(self, command: &str, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push((command.to_string(), Err(message.to_string())));
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last(&self) -> Invocation {
        self.calls().pop().expect("no invocation recorded")
    }
}

#[async_trait::async_trait]
impl tinvoke::Invoke for RecordingTransport {
    async fn invoke(
        &self,
        command: &str,
        args: Option<Value>,
        options: Option<InvokeOptions>,
    ) -> Result<Value, InvokeError> {
        self.calls.lock().unwrap().push(Invocation {
            command: command.to_string(),
            args,
            options,
        });

        let replies = self.replies.lock().unwrap();
        match replies.iter().find(|(name, _)| name == command) {
            Some((_, Ok(value))) => Ok(value.clone()),
            Some((_, Err(message))) => Err(InvokeError::Transport(message.clone())),
            None => Ok(Value::Null),
        }
    }
}

static XDG_ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Run `f` with HOME and XDG_CONFIG_HOME pointed into `test_dir`, restoring
/// the previous values afterwards.
pub fn with_xdg_env<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = XDG_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let saved: Vec<(&str, Option<String>)> = ["HOME", "XDG_CONFIG_HOME", "TINVOKE_ENV"]
        .into_iter()
        .map(|key| (key, std::env::var(key).ok()))
        .collect();

    let home = test_dir.path().join("home");
    let config_home = test_dir.path().join("config");
    std::fs::create_dir_all(&home).unwrap();
    std::fs::create_dir_all(&config_home).unwrap();
    std::env::set_var("HOME", &home);
    std::env::set_var("XDG_CONFIG_HOME", &config_home);
    std::env::remove_var("TINVOKE_ENV");

    let result = f();

    for (key, value) in saved {
        match value {
            Some(v) => std::env::set_var(key, v),
            None => std::env::remove_var(key),
        }
    }
    result
}
