//! End-to-end playback runs over a scripted fetcher.
//!
//! All tests run under tokio's paused clock, so simulated delays advance
//! deterministically and assertions on elapsed time are exact.

use std::sync::Arc;
use std::time::Duration;

use storefront::player::mock::{MockFetchConfig, MockFetcher};
use storefront::player::{
    CatalogProduct, FetchError, PipelinePlayer, PlaybackMode, PlayerError, StageStatus,
};

use super::common::{wait_for_state, wait_until_armed};

fn demo_products(count: usize) -> Vec<CatalogProduct> {
    (0..count)
        .map(|i| CatalogProduct {
            id: i as i64 + 1,
            name: format!("Product {}", i + 1),
            description: "demo".to_string(),
            price: 10.0 + i as f64,
            image_url: None,
            created_at: None,
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn auto_run_with_three_products_completes_the_pipeline() {
    // Simulated waits total 1600 ms; the scripted call adds 150 more.
    let fetcher = MockFetcher::new(
        MockFetchConfig::default()
            .with_products(demo_products(3))
            .with_response_delay(Duration::from_millis(120))
            .with_body_delay(Duration::from_millis(30)),
    );
    let player = PipelinePlayer::new(Arc::new(fetcher));

    let products = player.run().await.unwrap();
    assert_eq!(products.len(), 3);
    assert_eq!(products[0].price, 10.0);

    let state = player.state();
    assert!(state
        .stages
        .iter()
        .all(|s| s.status == StageStatus::Complete));
    assert!(!state.playing);
    assert!(state.error.is_none());
    assert!(state.last_fetched.is_some());

    // The trace reconstructs the whole timeline and ends with the count.
    assert!(state.log.len() >= 7, "log had {} entries", state.log.len());
    assert_eq!(state.log.last().unwrap().message, "Loaded 3 products");

    // End-to-end time covers every simulated wait plus the real call.
    let response_time = state.response_time_ms.unwrap();
    assert!(response_time > 1600, "response time was {response_time} ms");
}

#[tokio::test(start_paused = true)]
async fn manual_run_advances_one_wait_per_step() {
    let player = Arc::new(PipelinePlayer::new(Arc::new(MockFetcher::new(
        MockFetchConfig::default().with_products(demo_products(2)),
    ))));
    player.toggle_mode();
    assert_eq!(player.state().mode, PlaybackMode::Manual);

    let handle = tokio::spawn({
        let player = player.clone();
        async move { player.run().await }
    });

    // Wait 1: frontend. Nothing later than stage 0 has started.
    wait_until_armed(&player).await;
    let state = player.state();
    assert_eq!(state.stages[0].status, StageStatus::Active);
    assert_eq!(state.stages[1].status, StageStatus::Pending);

    // There is no time-based fallback: a full minute changes nothing.
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert!(player.is_waiting());
    assert_eq!(player.state().stages[0].status, StageStatus::Active);

    assert!(player.step());

    // Wait 2: proxy. Stage order is preserved.
    wait_until_armed(&player).await;
    let state = player.state();
    assert_eq!(state.stages[0].status, StageStatus::Complete);
    assert_eq!(state.stages[1].status, StageStatus::Active);
    assert_eq!(state.stages[2].status, StageStatus::Pending);
    assert!(player.step());

    // Wait 3: store. The service stage and the real call finished ungated.
    wait_until_armed(&player).await;
    let state = player.state();
    assert_eq!(state.stages[2].status, StageStatus::Complete);
    assert_eq!(state.stages[3].status, StageStatus::Active);
    assert!(player.step());

    let products = handle.await.unwrap().unwrap();
    assert_eq!(products.len(), 2);
    assert!(player
        .state()
        .stages
        .iter()
        .all(|s| s.status == StageStatus::Complete));
}

#[tokio::test(start_paused = true)]
async fn manual_run_propagates_failure_without_further_steps() {
    let player = Arc::new(PipelinePlayer::new(Arc::new(
        MockFetcher::failing_with_status(500),
    )));
    player.toggle_mode();

    let handle = tokio::spawn({
        let player = player.clone();
        async move { player.run().await }
    });

    // Step through the two gated waits before the real call.
    for _ in 0..2 {
        wait_until_armed(&player).await;
        assert!(player.step());
    }

    // The failure at the service hop needs no further steps.
    let err = handle.await.unwrap().unwrap_err();
    assert_eq!(err, PlayerError::Fetch(FetchError::Status(500)));

    let state = player.state();
    assert!(state.stages.iter().all(|s| s.status == StageStatus::Error));
    assert!(!state.playing);
    assert!(state.response_time_ms.is_none());
    assert!(state.error.as_deref().unwrap().contains("500"));
}

#[tokio::test(start_paused = true)]
async fn transport_failure_marks_even_completed_stages_as_error() {
    let player = PipelinePlayer::new(Arc::new(MockFetcher::failing_with_transport(
        "connection refused",
    )));

    let err = player.run().await.unwrap_err();
    assert!(matches!(err, PlayerError::Fetch(FetchError::Transport(_))));

    // Stages 0 and 1 had completed before the call failed; the failure is
    // shown uniformly anyway.
    let state = player.state();
    assert!(state.stages.iter().all(|s| s.status == StageStatus::Error));
    assert!(!state.playing);
    assert!(state.response_time_ms.is_none());
    assert!(state
        .log
        .last()
        .unwrap()
        .message
        .contains("connection refused"));
}

#[tokio::test(start_paused = true)]
async fn reset_during_the_real_call_discards_the_stale_result() {
    // The call takes 10 s; the reset lands while it is in flight.
    let player = Arc::new(PipelinePlayer::new(Arc::new(MockFetcher::new(
        MockFetchConfig::default()
            .with_products(demo_products(4))
            .with_response_delay(Duration::from_secs(10)),
    ))));

    let handle = tokio::spawn({
        let player = player.clone();
        async move { player.run().await }
    });

    // Let the run get past the simulated waits and into the fetch.
    wait_for_state(&player, |s| s.stages[2].status == StageStatus::Active).await;
    player.reset();

    // The reset takes effect immediately.
    let state = player.state();
    assert!(state.stages.iter().all(|s| s.status == StageStatus::Pending));
    assert!(state.log.is_empty());
    assert!(!state.playing);

    // The call eventually resolves, but its result is discarded.
    tokio::time::sleep(Duration::from_secs(15)).await;
    let err = handle.await.unwrap().unwrap_err();
    assert_eq!(err, PlayerError::Superseded);

    let state = player.state();
    assert!(state.stages.iter().all(|s| s.status == StageStatus::Pending));
    assert!(state.log.is_empty());
    assert!(state.response_time_ms.is_none());
    assert!(state.last_fetched.is_none());
}

#[tokio::test(start_paused = true)]
async fn reset_releases_a_manually_suspended_run() {
    let player = Arc::new(PipelinePlayer::new(Arc::new(
        MockFetcher::with_product_count(1),
    )));
    player.toggle_mode();

    let handle = tokio::spawn({
        let player = player.clone();
        async move { player.run().await }
    });

    wait_until_armed(&player).await;
    player.reset();

    let err = handle.await.unwrap().unwrap_err();
    assert_eq!(err, PlayerError::Superseded);
    assert!(!player.is_waiting());
    assert!(player
        .state()
        .stages
        .iter()
        .all(|s| s.status == StageStatus::Pending));
}

#[tokio::test(start_paused = true)]
async fn mode_change_takes_effect_at_the_next_wait() {
    let player = Arc::new(PipelinePlayer::new(Arc::new(
        MockFetcher::with_product_count(1),
    )));
    player.toggle_mode(); // manual

    let handle = tokio::spawn({
        let player = player.clone();
        async move { player.run().await }
    });

    // Gate the first wait manually, then flip back to auto mid-run.
    wait_until_armed(&player).await;
    player.toggle_mode();
    assert!(player.step());

    // The remaining waits run on timers; no more steps are needed.
    let products = handle.await.unwrap().unwrap();
    assert_eq!(products.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn speed_change_mid_run_affects_later_waits_only() {
    let player = Arc::new(PipelinePlayer::new(Arc::new(
        MockFetcher::with_product_count(1),
    )));

    let handle = tokio::spawn({
        let player = player.clone();
        async move { player.run().await }
    });

    // Change the speed while the frontend wait (begun at 1.0) is running.
    wait_for_state(&player, |s| s.stages[0].status == StageStatus::Active).await;
    player.set_speed(0.5);

    handle.await.unwrap().unwrap();

    // Frontend kept its full 700 ms; proxy and store were halved.
    // 700 + 250 + 200 = 1150, plus a few virtual milliseconds of polling.
    let response_time = player.state().response_time_ms.unwrap();
    assert!(
        (1150..1200).contains(&response_time),
        "response time was {response_time} ms"
    );
}
