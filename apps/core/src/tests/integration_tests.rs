//! Integration Tests
//!
//! A scripted console session driven end to end: transport, supervisor and
//! responder together.

use crate::actors::supervisor::SupervisorHandle;
use crate::brain::{Responder, SelectionStrategy};
use crate::models::KnowledgeBase;
use crate::transport::{serve, ConsoleTransport};
use std::num::NonZeroUsize;
use tokio::io::BufReader;
use tokio::time::Duration;

async fn run_script(script: &str, strategy: SelectionStrategy) -> Vec<String> {
    let responder = Responder::new(&KnowledgeBase::default(), strategy).unwrap();
    let supervisor =
        SupervisorHandle::new(responder, NonZeroUsize::new(8).unwrap(), Duration::from_secs(5));

    let mut transport = ConsoleTransport::new(BufReader::new(script.as_bytes()), Vec::new());
    serve(&mut transport, &supervisor).await.unwrap();
    supervisor.shutdown().await.unwrap();

    String::from_utf8(transport.into_writer())
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_console_conversation() {
    let script = "/start\nHi\nWhat classes do you offer?\nwhat are the fees\nMy name is Priya\nhello\nbye\n";
    let kb = KnowledgeBase::default();

    let output = run_script(script, SelectionStrategy::First).await;

    assert_eq!(output.len(), 7);
    assert_eq!(output[0], kb.welcome);
    assert_eq!(output[1], "Hello! How can I assist you today? What can I help you with?");
    assert!(output[2].starts_with("We offer IELTS, PTE"));
    assert_eq!(output[3], kb.follow_ups.fees);
    assert_eq!(output[4], "Nice to meet you, Priya! How can I assist you today?");
    assert_eq!(output[5], "Hello again, Priya! How can I assist you?");
    assert_eq!(output[6], "Goodbye! Have a great day!");
}

#[tokio::test]
async fn test_invalid_utf8_line_does_not_end_session() {
    let responder = Responder::with_defaults().unwrap();
    let supervisor =
        SupervisorHandle::new(responder, NonZeroUsize::new(8).unwrap(), Duration::from_secs(5));
    let input: &[u8] = b"hi\n\xff\xfe\nwhat are the fees\n";
    let mut transport = ConsoleTransport::new(BufReader::new(input), Vec::new());

    serve(&mut transport, &supervisor).await.unwrap();
    supervisor.shutdown().await.unwrap();

    let kb = KnowledgeBase::default();
    let output = String::from_utf8(transport.into_writer()).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1], kb.fallback);
    assert!(lines[2].starts_with("The fees for IELTS coaching"));
}

#[tokio::test]
async fn test_reset_command_forgets_name() {
    let script = "My name is Priya\n/reset\nhello\n";

    let output = run_script(script, SelectionStrategy::First).await;

    assert_eq!(output.len(), 3);
    assert_eq!(output[1], "Conversation cleared.");
    assert_eq!(output[2], "Hello! How can I assist you today? What can I help you with?");
}

#[tokio::test]
async fn test_round_robin_rotates_farewells() {
    let kb = KnowledgeBase::default();
    let output = run_script("bye\nbye\nbye\n", SelectionStrategy::RoundRobin).await;

    assert_eq!(output.len(), 3);
    for line in &output {
        assert!(kb.farewells.contains(line), "Unexpected farewell '{}'", line);
    }
    assert_ne!(output[0], output[1]);
}

#[tokio::test]
async fn test_random_selection_stays_in_list() {
    let kb = KnowledgeBase::default();
    let output = run_script("hey\nhow are you\n", SelectionStrategy::Random).await;

    assert_eq!(output.len(), 2);
    assert!(kb.greetings.iter().any(|g| output[0].starts_with(g.as_str())));
    assert!(kb.how_are_you.contains(&output[1]));
}
