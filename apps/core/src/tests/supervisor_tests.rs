//! Supervisor Tests
//!
//! Per-conversation session handling behind the supervisor actor.

use crate::actors::messages::{ActorError, AppError};
use crate::actors::supervisor::SupervisorHandle;
use crate::brain::{Intent, Responder, Route};
use std::num::NonZeroUsize;
use tokio::time::Duration;

fn spawn_supervisor(capacity: usize) -> SupervisorHandle {
    let responder = Responder::with_defaults().unwrap();
    SupervisorHandle::new(
        responder,
        NonZeroUsize::new(capacity).unwrap(),
        Duration::from_secs(5),
    )
}

#[tokio::test]
async fn test_conversations_do_not_share_state() {
    let handle = spawn_supervisor(16);

    handle
        .process_message("alice".to_string(), "My name is Priya".to_string())
        .await
        .unwrap();
    handle
        .process_message("alice".to_string(), "What classes do you offer?".to_string())
        .await
        .unwrap();

    // bob has neither alice's name nor her topic
    let greeting = handle
        .process_message("bob".to_string(), "hello".to_string())
        .await
        .unwrap();
    assert_eq!(greeting, "Hello! How can I assist you today? What can I help you with?");

    let fees = handle
        .process_message_with_route("bob".to_string(), "what are the fees".to_string())
        .await
        .unwrap();
    assert_eq!(fees.route, Route::Answer(Intent::Fees));

    let alice = handle.session_snapshot("alice".to_string()).await.unwrap().unwrap();
    assert_eq!(alice.known_name(), Some("Priya"));
    assert_eq!(alice.last_topic(), Some(Intent::Classes));

    let bob = handle.session_snapshot("bob".to_string()).await.unwrap().unwrap();
    assert_eq!(bob.known_name(), None);
    assert_eq!(bob.last_topic(), Some(Intent::Fees));
}

#[tokio::test]
async fn test_concurrent_conversations() {
    let handle = spawn_supervisor(64);

    let mut tasks = Vec::new();
    for i in 0..20 {
        let handle = handle.clone();
        tasks.push(tokio::spawn(async move {
            let id = format!("user-{}", i);
            handle
                .process_message(id.clone(), "What classes do you offer?".to_string())
                .await
                .unwrap();
            handle
                .process_message_with_route(id, "what are the fees".to_string())
                .await
                .unwrap()
        }));
    }

    for task in tasks {
        let reply = task.await.unwrap();
        assert_eq!(reply.route, Route::FollowUp(crate::brain::FollowUp::Fees));
    }
    assert_eq!(handle.session_count().await.unwrap(), 20);
}

#[tokio::test]
async fn test_start_returns_welcome_and_keeps_state() {
    let handle = spawn_supervisor(4);
    handle
        .process_message("c".to_string(), "My name is Priya".to_string())
        .await
        .unwrap();

    let welcome = handle.start_conversation("c".to_string()).await.unwrap();
    assert_eq!(
        welcome,
        "Welcome to Englishfirm chatbot! I'm here to assist you with any queries you have."
    );

    let session = handle.session_snapshot("c".to_string()).await.unwrap().unwrap();
    assert_eq!(session.known_name(), Some("Priya"));
}

#[tokio::test]
async fn test_reset_forgets_conversation() {
    let handle = spawn_supervisor(4);
    handle
        .process_message("c".to_string(), "My name is Priya".to_string())
        .await
        .unwrap();

    assert!(handle.reset_conversation("c".to_string()).await.unwrap());
    assert!(!handle.reset_conversation("c".to_string()).await.unwrap());
    assert!(handle.session_snapshot("c".to_string()).await.unwrap().is_none());

    let reply = handle
        .process_message("c".to_string(), "hello".to_string())
        .await
        .unwrap();
    assert!(reply.starts_with("Hello! How can I assist you today?"));
}

#[tokio::test]
async fn test_least_recently_active_conversation_evicted() {
    let handle = spawn_supervisor(2);
    for id in ["a", "b"] {
        handle
            .process_message(id.to_string(), "My name is Priya".to_string())
            .await
            .unwrap();
    }
    // touch "a" so "b" becomes the least recently active
    handle
        .process_message("a".to_string(), "hello".to_string())
        .await
        .unwrap();
    handle
        .process_message("c".to_string(), "hello".to_string())
        .await
        .unwrap();

    assert_eq!(handle.session_count().await.unwrap(), 2);
    assert!(handle.session_snapshot("a".to_string()).await.unwrap().is_some());
    assert!(handle.session_snapshot("b".to_string()).await.unwrap().is_none());
    assert!(handle.session_snapshot("c".to_string()).await.unwrap().is_some());
}

#[tokio::test]
async fn test_session_keeps_start_time_across_messages() {
    let handle = spawn_supervisor(4);
    handle
        .process_message("c".to_string(), "hello".to_string())
        .await
        .unwrap();
    let first = handle.session_snapshot("c".to_string()).await.unwrap().unwrap();

    tokio::time::sleep(Duration::from_millis(10)).await;
    handle
        .process_message("c".to_string(), "bye".to_string())
        .await
        .unwrap();
    let second = handle.session_snapshot("c".to_string()).await.unwrap().unwrap();

    assert_eq!(second.started_at, first.started_at);
    assert!(second.last_active > first.last_active);
    assert_eq!(second.replies(), 2);
}

#[tokio::test]
async fn test_calls_after_shutdown_fail() {
    let handle = spawn_supervisor(2);
    handle.shutdown().await.unwrap();

    // Give the runner a moment to drop its receiver.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let result = handle
        .process_message("c".to_string(), "hello".to_string())
        .await;
    assert!(matches!(
        result,
        Err(AppError::Actor(ActorError::Unavailable(_)))
    ));
}
