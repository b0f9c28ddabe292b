//! Playback coordinator: single active handle and best-effort teardown.

use bridge_traits::error::Result as BridgeResult;
use bridge_traits::{
    BridgeError, LoadedSession, PlaybackAdapter, PlaybackOptions, PlaybackRequest,
    PlaybackSessionId, PlaybackStatus,
};
use core_playback::{PlaybackCoordinator, PlaybackError, PlaybackHandle};
use core_runtime::events::{CoreEvent, EventBus, PlaybackEvent};
use mockall::{mock, predicate::eq, Sequence};
use std::sync::Arc;
use std::time::Duration;

mock! {
    pub Engine {}

    #[async_trait::async_trait]
    impl PlaybackAdapter for Engine {
        async fn load(&self, request: PlaybackRequest) -> BridgeResult<LoadedSession>;
        async fn play(&self, session: PlaybackSessionId) -> BridgeResult<()>;
        async fn pause(&self, session: PlaybackSessionId) -> BridgeResult<()>;
        async fn stop(&self, session: PlaybackSessionId) -> BridgeResult<()>;
        async fn seek(&self, session: PlaybackSessionId, position: Duration) -> BridgeResult<()>;
        async fn set_looping(&self, session: PlaybackSessionId, looping: bool) -> BridgeResult<()>;
        async fn status(&self, session: PlaybackSessionId) -> BridgeResult<PlaybackStatus>;
        async fn unload(&self, session: PlaybackSessionId) -> BridgeResult<()>;
    }
}

fn handle(uri: &str) -> PlaybackHandle {
    PlaybackHandle::new(PlaybackSessionId::new(), uri)
}

#[tokio::test]
async fn test_acquire_stops_then_unloads_previous_once() {
    let first = handle("https://cdn.test/a.mp3");
    let second = handle("https://cdn.test/b.mp3");

    let mut engine = MockEngine::new();
    let mut seq = Sequence::new();
    engine
        .expect_stop()
        .with(eq(first.session()))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    engine
        .expect_unload()
        .with(eq(first.session()))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));

    let bus = EventBus::new(8);
    let mut rx = bus.subscribe();
    let coordinator = PlaybackCoordinator::new(Arc::new(engine)).with_event_bus(bus);

    coordinator.acquire(first.clone()).await.unwrap();
    assert!(coordinator.is_current(&first).await);

    coordinator.acquire(second.clone()).await.unwrap();

    assert!(first.is_released());
    assert!(!second.is_released());
    assert_eq!(coordinator.current().await, Some(second));
    assert_eq!(
        rx.recv().await.unwrap(),
        CoreEvent::Playback(PlaybackEvent::Superseded {
            handle_id: first.id()
        })
    );
}

#[tokio::test]
async fn test_acquire_same_handle_is_noop() {
    // no expectations: any engine call fails the test
    let coordinator = PlaybackCoordinator::new(Arc::new(MockEngine::new()));
    let only = handle("https://cdn.test/a.mp3");

    coordinator.acquire(only.clone()).await.unwrap();
    coordinator.acquire(only.clone()).await.unwrap();

    assert!(coordinator.is_current(&only).await);
    assert!(!only.is_released());
}

#[tokio::test]
async fn test_teardown_failures_are_swallowed() {
    let mut engine = MockEngine::new();
    engine
        .expect_stop()
        .times(1)
        .returning(|_| Err(BridgeError::OperationFailed("already stopped".into())));
    engine
        .expect_unload()
        .times(1)
        .returning(|_| Err(BridgeError::OperationFailed("not loaded".into())));

    let coordinator = PlaybackCoordinator::new(Arc::new(engine));
    let first = handle("a");
    let second = handle("b");

    coordinator.acquire(first.clone()).await.unwrap();
    coordinator.acquire(second.clone()).await.unwrap();

    assert!(first.is_released());
    assert!(coordinator.is_current(&second).await);
}

#[tokio::test]
async fn test_superseded_handle_never_reaches_engine() {
    let mut engine = MockEngine::new();
    engine.expect_stop().returning(|_| Ok(()));
    engine.expect_unload().returning(|_| Ok(()));
    engine.expect_play().never();
    engine.expect_seek().never();

    let coordinator = PlaybackCoordinator::new(Arc::new(engine));
    let first = handle("a");
    coordinator.acquire(first.clone()).await.unwrap();
    coordinator.acquire(handle("b")).await.unwrap();

    let err = coordinator.play(&first).await.unwrap_err();
    assert!(matches!(err, PlaybackError::Superseded(ref id) if *id == first.id()));
    assert!(coordinator.seek(&first, Duration::ZERO).await.is_err());
    assert!(coordinator.acquire(first).await.unwrap_err().is_superseded());
}

#[tokio::test]
async fn test_stop_current_rewinds_and_keeps_handle() {
    let current = handle("a");

    let mut engine = MockEngine::new();
    let mut seq = Sequence::new();
    engine
        .expect_stop()
        .with(eq(current.session()))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    engine
        .expect_seek()
        .with(eq(current.session()), eq(Duration::ZERO))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(()));
    engine.expect_unload().never();

    let coordinator = PlaybackCoordinator::new(Arc::new(engine));
    coordinator.stop_current().await;

    coordinator.acquire(current.clone()).await.unwrap();
    coordinator.stop_current().await;

    assert!(coordinator.is_current(&current).await);
    assert!(!current.is_released());
}

#[tokio::test]
async fn test_stop_current_swallows_engine_errors() {
    let mut engine = MockEngine::new();
    engine
        .expect_stop()
        .returning(|_| Err(BridgeError::OperationFailed("gone".into())));
    engine
        .expect_seek()
        .returning(|_, _| Err(BridgeError::OperationFailed("gone".into())));

    let coordinator = PlaybackCoordinator::new(Arc::new(engine));
    let current = handle("a");
    coordinator.acquire(current.clone()).await.unwrap();

    coordinator.stop_current().await;
    assert!(coordinator.is_current(&current).await);
}

#[tokio::test]
async fn test_shutdown_releases_current() {
    let current = handle("a");

    let mut engine = MockEngine::new();
    engine
        .expect_unload()
        .with(eq(current.session()))
        .times(1)
        .returning(|_| Ok(()));

    let bus = EventBus::new(8);
    let mut rx = bus.subscribe();
    let coordinator = PlaybackCoordinator::new(Arc::new(engine)).with_event_bus(bus);
    coordinator.acquire(current.clone()).await.unwrap();

    coordinator.shutdown().await;
    coordinator.shutdown().await;

    assert!(current.is_released());
    assert!(coordinator.current().await.is_none());
    assert_eq!(
        rx.recv().await.unwrap(),
        CoreEvent::Playback(PlaybackEvent::Released {
            handle_id: current.id()
        })
    );
}

#[tokio::test]
async fn test_load_makes_new_session_current() {
    let session = PlaybackSessionId::new();

    let mut engine = MockEngine::new();
    engine
        .expect_load()
        .withf(|request| !request.options.should_play && request.source.is_remote())
        .times(1)
        .returning(move |_| {
            Ok(LoadedSession {
                session,
                status: PlaybackStatus::loaded(Some(Duration::from_secs(90))),
            })
        });

    let coordinator = PlaybackCoordinator::new(Arc::new(engine));
    let (loaded, status) = coordinator
        .load("https://cdn.test/a.mp3", PlaybackOptions::default())
        .await
        .unwrap();

    assert_eq!(loaded.session(), session);
    assert_eq!(status.duration, Some(Duration::from_secs(90)));
    assert!(coordinator.is_current(&loaded).await);
}

#[tokio::test]
async fn test_load_failure_keeps_previous_current() {
    let mut engine = MockEngine::new();
    engine
        .expect_load()
        .returning(|_| Err(BridgeError::OperationFailed("unsupported codec".into())));
    engine.expect_stop().never();

    let bus = EventBus::new(8);
    let mut rx = bus.subscribe();
    let coordinator = PlaybackCoordinator::new(Arc::new(engine)).with_event_bus(bus);
    let existing = handle("a");
    coordinator.acquire(existing.clone()).await.unwrap();

    let err = coordinator
        .load("https://cdn.test/bad.xyz", PlaybackOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PlaybackError::LoadFailed { ref uri, .. } if uri == "https://cdn.test/bad.xyz"
    ));
    assert!(coordinator.is_current(&existing).await);
    assert!(matches!(
        rx.recv().await.unwrap(),
        CoreEvent::Playback(PlaybackEvent::Failed { .. })
    ));
}
