use music_fleet::music::state::{Advance, Enqueued, TrackOutcome};
use music_fleet::music::{self, queue, BoundChannel, PlayerError, PlayerStatus, Requester, Track};
use serenity::model::id::{ChannelId, GuildId, UserId};

fn test_track(n: u32) -> Track {
    Track {
        title: format!("Song {n}"),
        url: format!("https://youtube.com/watch?v=test{n}"),
        duration_secs: Some(u64::from(n) * 60),
        requester: Requester {
            id: UserId::new(42),
            name: "user".to_string(),
        },
        thumbnail: None,
    }
}

fn lobby() -> BoundChannel {
    BoundChannel {
        id: ChannelId::new(100),
        name: "Lobby".to_string(),
    }
}

fn started_generation(enqueued: Enqueued) -> u64 {
    match enqueued {
        Enqueued::Started { generation, .. } => generation,
        other => panic!("expected the track to start, got {other:?}"),
    }
}

#[tokio::test]
async fn test_play_queue_skip_flow() {
    // /play 1, /play 2, /play 3, then /skip until the queue drains
    let registry = music::new_registry();
    let gid = GuildId::new(1);
    queue::join(&registry, gid, lobby()).await;

    let first = queue::enqueue(&registry, gid, test_track(1)).await.unwrap();
    started_generation(first);
    assert_eq!(
        queue::enqueue(&registry, gid, test_track(2)).await.unwrap(),
        Enqueued::Queued { position: 1 }
    );
    assert_eq!(
        queue::enqueue(&registry, gid, test_track(3)).await.unwrap(),
        Enqueued::Queued { position: 2 }
    );

    let (current, queued) = queue::get_queue_list(&registry, gid).await;
    assert_eq!(current.unwrap().title, "Song 1");
    assert_eq!(queued.len(), 2);

    let skipped = queue::skip(&registry, gid).await.unwrap();
    assert_eq!(skipped.skipped.title, "Song 1");
    assert_eq!(skipped.next.unwrap().0.title, "Song 2");

    let skipped = queue::skip(&registry, gid).await.unwrap();
    assert_eq!(skipped.next.unwrap().0.title, "Song 3");

    let skipped = queue::skip(&registry, gid).await.unwrap();
    assert!(skipped.next.is_none());
    assert_eq!(
        queue::get_status(&registry, gid).await,
        PlayerStatus::ConnectedEmpty
    );
    assert_eq!(
        queue::skip(&registry, gid).await.unwrap_err(),
        PlayerError::NothingPlaying
    );
}

#[tokio::test]
async fn test_natural_end_advances_and_drains() {
    let registry = music::new_registry();
    let gid = GuildId::new(2);
    queue::join(&registry, gid, lobby()).await;

    let generation = started_generation(queue::enqueue(&registry, gid, test_track(1)).await.unwrap());
    queue::enqueue(&registry, gid, test_track(2)).await.unwrap();

    let next_generation = match queue::advance(&registry, gid, generation, TrackOutcome::Ended).await {
        Advance::Start { track, generation } => {
            assert_eq!(track.title, "Song 2");
            generation
        }
        other => panic!("expected next track to start, got {other:?}"),
    };

    assert_eq!(
        queue::advance(&registry, gid, next_generation, TrackOutcome::Ended).await,
        Advance::Drained
    );
    assert_eq!(
        queue::get_status(&registry, gid).await,
        PlayerStatus::ConnectedEmpty
    );
    assert!(queue::get_channel(&registry, gid).await.is_some());
}

#[tokio::test]
async fn test_end_event_after_skip_is_ignored() {
    // the engine reports End for the track we skipped; it must not advance twice
    let registry = music::new_registry();
    let gid = GuildId::new(3);
    queue::join(&registry, gid, lobby()).await;

    let old = started_generation(queue::enqueue(&registry, gid, test_track(1)).await.unwrap());
    queue::enqueue(&registry, gid, test_track(2)).await.unwrap();
    queue::enqueue(&registry, gid, test_track(3)).await.unwrap();

    queue::skip(&registry, gid).await.unwrap();
    assert_eq!(
        queue::advance(&registry, gid, old, TrackOutcome::Ended).await,
        Advance::Stale
    );

    let (current, queued) = queue::get_queue_list(&registry, gid).await;
    assert_eq!(current.unwrap().title, "Song 2");
    assert_eq!(queued.len(), 1);
}

#[tokio::test]
async fn test_repeated_failures_halt_playback() {
    let registry = music::new_registry();
    let gid = GuildId::new(4);
    queue::join(&registry, gid, lobby()).await;

    let mut generation =
        started_generation(queue::enqueue(&registry, gid, test_track(1)).await.unwrap());
    for n in 2..=6 {
        queue::enqueue(&registry, gid, test_track(n)).await.unwrap();
    }

    let mut halted = None;
    for _ in 0..music::state::MAX_CONSECUTIVE_FAILURES {
        match queue::advance(&registry, gid, generation, TrackOutcome::Failed).await {
            Advance::Start { generation: next, .. } => generation = next,
            Advance::Halted { dropped } => {
                halted = Some(dropped);
                break;
            }
            other => panic!("unexpected advance {other:?}"),
        }
    }

    assert!(halted.is_some(), "player kept retrying after repeated failures");
    let (current, queued) = queue::get_queue_list(&registry, gid).await;
    assert!(current.is_none());
    assert!(queued.is_empty());
    assert_eq!(
        queue::get_status(&registry, gid).await,
        PlayerStatus::ConnectedEmpty
    );
}

#[tokio::test]
async fn test_pause_resume_flow() {
    let registry = music::new_registry();
    let gid = GuildId::new(5);

    assert_eq!(
        queue::pause(&registry, gid).await.unwrap_err(),
        PlayerError::NothingPlaying
    );

    queue::join(&registry, gid, lobby()).await;
    queue::enqueue(&registry, gid, test_track(1)).await.unwrap();

    assert_eq!(queue::pause(&registry, gid).await.unwrap().title, "Song 1");
    assert_eq!(queue::get_status(&registry, gid).await, PlayerStatus::Paused);
    assert_eq!(
        queue::pause(&registry, gid).await.unwrap_err(),
        PlayerError::NothingPlaying
    );

    // enqueue while paused appends instead of replacing
    assert_eq!(
        queue::enqueue(&registry, gid, test_track(2)).await.unwrap(),
        Enqueued::Queued { position: 1 }
    );

    assert_eq!(queue::resume(&registry, gid).await.unwrap().title, "Song 1");
    assert_eq!(queue::get_status(&registry, gid).await, PlayerStatus::Playing);
    assert_eq!(
        queue::resume(&registry, gid).await.unwrap_err(),
        PlayerError::NotPaused
    );
}

#[tokio::test]
async fn test_stop_clears_but_stays_connected() {
    let registry = music::new_registry();
    let gid = GuildId::new(6);
    queue::join(&registry, gid, lobby()).await;
    queue::enqueue(&registry, gid, test_track(1)).await.unwrap();
    queue::enqueue(&registry, gid, test_track(2)).await.unwrap();
    queue::enqueue(&registry, gid, test_track(3)).await.unwrap();

    let stopped = queue::stop(&registry, gid).await;
    assert!(stopped.had_track);
    assert_eq!(stopped.cleared, 2);

    let (current, queued) = queue::get_queue_list(&registry, gid).await;
    assert!(current.is_none());
    assert!(queued.is_empty());
    assert!(!queue::has_keep_alive(&registry, gid).await);
    assert_eq!(queue::get_channel(&registry, gid).await, Some(lobby()));

    // stop on an empty player is still fine
    let stopped = queue::stop(&registry, gid).await;
    assert!(!stopped.had_track);
    assert_eq!(stopped.cleared, 0);
}

#[tokio::test]
async fn test_play_requires_connection_and_leave_resets() {
    let registry = music::new_registry();
    let gid = GuildId::new(7);

    assert_eq!(
        queue::enqueue(&registry, gid, test_track(1)).await.unwrap_err(),
        PlayerError::NotConnected
    );
    assert_eq!(
        queue::leave(&registry, gid).await.unwrap_err(),
        PlayerError::NotConnected
    );

    queue::join(&registry, gid, lobby()).await;
    queue::enqueue(&registry, gid, test_track(1)).await.unwrap();
    queue::enqueue(&registry, gid, test_track(2)).await.unwrap();

    let departed = queue::leave(&registry, gid).await.unwrap();
    assert_eq!(departed.channel.name, "Lobby");
    assert_eq!(queue::get_status(&registry, gid).await, PlayerStatus::Idle);
    assert_eq!(queue::get_queue_list(&registry, gid).await, (None, vec![]));
    assert_eq!(
        queue::leave(&registry, gid).await.unwrap_err(),
        PlayerError::NotConnected
    );
}

#[tokio::test]
async fn test_connection_lost_returns_to_idle() {
    let registry = music::new_registry();
    let gid = GuildId::new(8);
    queue::join(&registry, gid, lobby()).await;
    queue::enqueue(&registry, gid, test_track(1)).await.unwrap();
    queue::enqueue(&registry, gid, test_track(2)).await.unwrap();

    assert!(queue::connection_lost(&registry, gid).await.is_none());
    assert_eq!(queue::get_status(&registry, gid).await, PlayerStatus::Idle);
    assert!(queue::get_current(&registry, gid).await.is_none());
    assert!(queue::get_channel(&registry, gid).await.is_none());
}

#[tokio::test]
async fn test_volume_is_clamped_and_remembered() {
    let registry = music::new_registry();
    let gid = GuildId::new(9);

    assert_eq!(
        queue::get_volume(&registry, gid).await,
        music::state::DEFAULT_VOLUME
    );
    queue::set_volume(&registry, gid, 0.8).await;
    assert!((queue::get_volume(&registry, gid).await - 0.8).abs() < f32::EPSILON);
    queue::set_volume(&registry, gid, 3.0).await;
    assert!((queue::get_volume(&registry, gid).await - 1.0).abs() < f32::EPSILON);
}

#[tokio::test]
async fn test_guild_isolation() {
    let registry = music::new_registry();
    let a = GuildId::new(10);
    let b = GuildId::new(11);

    queue::join(&registry, a, lobby()).await;
    queue::enqueue(&registry, a, test_track(1)).await.unwrap();
    queue::enqueue(&registry, a, test_track(2)).await.unwrap();

    assert_eq!(queue::get_status(&registry, b).await, PlayerStatus::Idle);
    assert_eq!(queue::get_queue_list(&registry, b).await, (None, vec![]));

    queue::stop(&registry, b).await;
    let (current, queued) = queue::get_queue_list(&registry, a).await;
    assert_eq!(current.unwrap().title, "Song 1");
    assert_eq!(queued.len(), 1);
}
