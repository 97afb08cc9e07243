//! Typed dispatcher over the in-process router.

use super::test_utils::*;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tinvoke::{tinvoke, AbortController, Dispatcher, InvokeError, InvokeOptions, Router};

tinvoke::commands! {
    Sleep => "sleep": ();
}

fn router(settings: Arc<Mutex<Option<String>>>) -> Router {
    Router::new()
        .route(GetUser, |()| async {
            Ok(User {
                id: 1,
                name: "Ada".to_string(),
            })
        })
        .unwrap()
        .route(ListFiles, |()| async { Ok(vec!["Cargo.toml".to_string()]) })
        .unwrap()
        .route(CreateTask, |args: CreateTaskArgs| async move {
            Ok(json!({"title": args.title, "done": false}))
        })
        .unwrap()
        .route(DeleteItem, |args: DeleteItemArgs| async move { Ok(args.item_id % 2 == 1) })
        .unwrap()
        .route(UpdateSettings, move |args: UpdateSettingsArgs| {
            let settings = Arc::clone(&settings);
            async move {
                *settings.lock().unwrap() = Some(args.theme);
                Ok(())
            }
        })
        .unwrap()
        .route(Sleep, |()| async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        })
        .unwrap()
}

#[tokio::test]
async fn test_every_shape_round_trips() {
    let settings = Arc::new(Mutex::new(None));
    let dispatcher = Dispatcher::new(router(Arc::clone(&settings)));

    let user = tinvoke!(dispatcher, GetUser).await.unwrap();
    assert_eq!(user.name, "Ada");

    let files = tinvoke!(dispatcher, ListFiles, InvokeOptions::new().header("X", "y"))
        .await
        .unwrap();
    assert_eq!(files, vec!["Cargo.toml".to_string()]);

    let task = tinvoke!(
        dispatcher,
        CreateTask,
        CreateTaskArgs {
            title: "T".to_string(),
            description: "D".to_string()
        },
        InvokeOptions::new()
    )
    .await
    .unwrap();
    assert_eq!(task, json!({"title": "T", "done": false}));

    assert!(tinvoke!(dispatcher, DeleteItem, DeleteItemArgs { item_id: 123 }).await.unwrap());
    assert!(!tinvoke!(dispatcher, DeleteItem, DeleteItemArgs { item_id: 4 }).await.unwrap());

    tinvoke!(
        dispatcher,
        UpdateSettings,
        UpdateSettingsArgs {
            theme: "dark".to_string()
        }
    )
    .await
    .unwrap();
    assert_eq!(settings.lock().unwrap().as_deref(), Some("dark"));
}

#[tokio::test]
async fn test_unknown_route_rejected() {
    let dispatcher = Dispatcher::new(router(Arc::default()));
    let err = dispatcher
        .call_dynamic("invalid_command", Vec::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        InvokeError::Rejected { ref command, .. } if command == "invalid_command"
    ));
}

#[tokio::test]
async fn test_dynamic_call_reaches_typed_handler() {
    let dispatcher = Dispatcher::new(router(Arc::default()));
    let value: Value = dispatcher
        .call_dynamic("delete_item", vec![json!({"itemId": 3})])
        .await
        .unwrap();
    assert_eq!(value, json!(true));
}

#[tokio::test(start_paused = true)]
async fn test_timeout_through_dispatcher() {
    let dispatcher = Dispatcher::new(router(Arc::default()));
    let err = dispatcher
        .call(Sleep, InvokeOptions::new().timeout(Duration::from_secs(2)))
        .await
        .unwrap_err();
    assert!(matches!(err, InvokeError::Timeout { elapsed_ms: 2000, .. }));
}

#[tokio::test]
async fn test_abort_through_dispatcher() {
    let dispatcher = Dispatcher::new(router(Arc::default()));
    let controller = AbortController::new();
    let options = InvokeOptions::new().signal(controller.signal());

    let pending = dispatcher.call(Sleep, options);
    let abort = async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        controller.abort();
    };
    let (result, ()) = tokio::join!(pending, abort);
    assert!(matches!(result, Err(InvokeError::Aborted(ref name)) if name == "sleep"));
}

#[test]
fn test_router_manifest_matches_registrations() {
    let router = router(Arc::default());
    let manifest = router.manifest();
    assert_eq!(manifest.len(), 6);
    assert!(manifest.get("get_user").is_some_and(|r| !r.takes_args));
    assert!(manifest.get("delete_item").is_some_and(|r| r.takes_args));
}
