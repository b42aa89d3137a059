//! The deferred flush under a tokio runtime.

use std::rc::Rc;
use std::time::Duration;

use fontsync::config::ENABLED_KEY;
use fontsync::testing::{MemorySettings, MemoryTracker, RecordingTarget};
use fontsync::{FontManager, ScopeId, flush, run_flush_loop};
use serde_json::json;
use tokio::task::{LocalSet, spawn_local, yield_now};
use tokio::time::timeout;

async fn settle() {
    for _ in 0..4 {
        yield_now().await;
    }
}

#[tokio::test]
async fn test_same_turn_writes_collapse() {
    let local = LocalSet::new();
    local
        .run_until(async {
            let target = RecordingTarget::new();
            let log = target.log();
            let (ctx, receiver) = flush::channel();
            let manager = FontManager::new(Box::new(target), ctx);
            manager.set_settings(Some(Rc::new(
                MemorySettings::new().with_value(ENABLED_KEY, json!(true)),
            )));
            spawn_local(run_flush_loop(receiver, manager.downgrade()));

            manager.set_code_font_size(None, Some("14px")).unwrap();
            manager.set_code_font_size(None, Some("15px")).unwrap();
            manager.set_code_line_height(None, Some("1.5")).unwrap();
            assert_eq!(log.write_count(), 0);

            settle().await;

            assert_eq!(log.writes_for(&ScopeId::Global).len(), 1);
            assert_eq!(
                log.live(&ScopeId::Global).as_deref(),
                Some(":root {\n  --jp-code-font-size: 15px;\n  --jp-code-line-height: 1.5;\n}\n")
            );
        })
        .await;
}

#[tokio::test]
async fn test_one_write_per_scope_per_turn() {
    let local = LocalSet::new();
    local
        .run_until(async {
            let target = RecordingTarget::new();
            let log = target.log();
            let (ctx, receiver) = flush::channel();
            let manager = FontManager::new(Box::new(target), ctx);
            manager.set_settings(Some(Rc::new(MemorySettings::new())));
            let tracker = MemoryTracker::new();
            manager.connect_tracker(&tracker);
            spawn_local(run_flush_loop(receiver, manager.downgrade()));

            tracker.open("a");
            tracker.open("b");
            manager.set_code_font_size(Some("a"), Some("16px")).unwrap();
            manager.set_code_font_size(Some("b"), Some("17px")).unwrap();
            manager.set_code_font_size(Some("a"), Some("18px")).unwrap();
            settle().await;

            let a = ScopeId::Document("a".to_string());
            let b = ScopeId::Document("b".to_string());
            assert_eq!(log.writes_for(&a).len(), 1);
            assert_eq!(log.writes_for(&b).len(), 1);
            assert_eq!(
                log.live(&a).as_deref(),
                Some("#a {\n  --jp-code-font-size: 18px;\n}\n")
            );

            // Nothing changed, so nothing is written on later turns.
            let live = log.live(&a).unwrap();
            manager.set_code_font_size(Some("a"), Some("18px")).unwrap();
            settle().await;
            assert!(Rc::ptr_eq(&live, &log.live(&a).unwrap()));
            assert_eq!(log.write_count(), 2);
        })
        .await;
}

#[tokio::test]
async fn test_loop_stops_without_senders() {
    let local = LocalSet::new();
    local
        .run_until(async {
            let (ctx, receiver) = flush::channel();
            let (other, _other_receiver) = flush::channel();
            let manager = FontManager::new(Box::new(RecordingTarget::new()), other);
            drop(ctx);

            // Completes instead of waiting forever.
            run_flush_loop(receiver, manager.downgrade()).await;
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_loop_ends_when_manager_is_dropped() {
    let local = LocalSet::new();
    local
        .run_until(async {
            let (ctx, receiver) = flush::channel();
            let manager = FontManager::new(Box::new(RecordingTarget::new()), ctx);
            let settings = Rc::new(MemorySettings::new().with_value(ENABLED_KEY, json!(true)));
            manager.set_settings(Some(settings.clone()));
            let handle = spawn_local(run_flush_loop(receiver, manager.downgrade()));

            manager.set_code_font_size(None, Some("14px")).unwrap();
            settle().await;
            assert_eq!(settings.listener_count(), 1);

            drop(manager);
            assert_eq!(settings.listener_count(), 0);

            // The paused clock fails this quickly if the loop keeps running.
            timeout(Duration::from_secs(5), handle)
                .await
                .expect("flush loop should stop")
                .unwrap();
        })
        .await;
}
