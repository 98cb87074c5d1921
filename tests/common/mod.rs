//! Shared fixtures and helpers for integration tests.

use std::time::Duration;

use storefront::player::{PipelinePlayer, PlaybackState};

/// Poll until `predicate` holds on the player state, advancing tokio's
/// (possibly paused) clock in small increments. Panics if the condition is
/// never reached.
pub async fn wait_for_state<F>(player: &PipelinePlayer, predicate: F)
where
    F: Fn(&PlaybackState) -> bool,
{
    for _ in 0..10_000 {
        if predicate(&player.state()) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("player never reached the expected state");
}

/// Poll until a manual wait is armed.
pub async fn wait_until_armed(player: &PipelinePlayer) {
    for _ in 0..10_000 {
        if player.is_waiting() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("player never armed the step gate");
}
