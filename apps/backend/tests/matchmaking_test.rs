mod support;

use std::sync::Arc;

use futures::future::join_all;
use neutrino_backend::errors::{ConflictKind, DomainError, ErrorKind, StoragePhase};
use neutrino_backend::{
    AdmissionOutcome, GameDataStore, GameplayConfig, LifecyclePhase, PlayerSlot,
    SessionMatchmaker,
};
use support::{memory_store, player, sqlite_store, FaultyStore};

#[tokio::test]
async fn open_then_join_scenario() {
    let store = memory_store();
    let matchmaker = SessionMatchmaker::new(store.clone(), GameplayConfig::default());
    let (alice, bob) = (player("alice"), player("bob"));

    let a = matchmaker.admit(&alice).await.unwrap();
    assert_eq!(a.outcome, AdmissionOutcome::Created);
    let open = store.load_session(&a.game_id).await.unwrap().unwrap();
    assert_eq!(open.lifecycle_phase, LifecyclePhase::Initializing);
    assert_eq!(open.player_one, alice);
    assert_eq!(open.player_two, None);

    let b = matchmaker.admit(&bob).await.unwrap();
    assert_eq!((b.outcome, b.seat), (AdmissionOutcome::Joined, PlayerSlot::Two));
    assert_eq!(b.game_id, a.game_id);
    let playing = store.load_session(&a.game_id).await.unwrap().unwrap();
    assert_eq!(playing.lifecycle_phase, LifecyclePhase::Playing);
    assert_eq!(playing.player_two, Some(bob));
}

#[tokio::test]
async fn sixth_admit_exceeds_default_quota() {
    let store = memory_store();
    let matchmaker = SessionMatchmaker::new(store.clone(), GameplayConfig::default());
    let alice = player("alice");

    // Alice opens, a fresh opponent joins, five times over.
    for _ in 0..5 {
        let opened = matchmaker.admit(&alice).await.unwrap();
        assert_eq!(opened.outcome, AdmissionOutcome::Created);
        let joined = matchmaker.admit(&player("opponent")).await.unwrap();
        assert_eq!(joined.game_id, opened.game_id);
    }
    assert_eq!(store.active_games_count(&alice).await.unwrap(), 5);
    let games_before = store.len();

    let err = matchmaker.admit(&alice).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::QuotaExceeded);
    assert_eq!(err, DomainError::quota_exceeded(5, 5));
    assert_eq!(store.len(), games_before);
}

#[tokio::test]
async fn quota_rejection_issues_no_create_or_join() {
    let store = memory_store();
    let faulty = Arc::new(FaultyStore::new(store.clone()));
    let config = GameplayConfig {
        max_active_games: 1,
        ..GameplayConfig::default()
    };
    let matchmaker = SessionMatchmaker::new(faulty.clone(), config);
    let alice = player("alice");

    matchmaker.admit(&alice).await.unwrap();
    let creates = faulty.create_calls();
    let joins = faulty.join_calls();

    assert!(matches!(
        matchmaker.admit(&alice).await,
        Err(DomainError::QuotaExceeded { active: 1, limit: 1 })
    ));
    assert_eq!(faulty.create_calls(), creates);
    assert_eq!(faulty.join_calls(), joins);
}

#[tokio::test]
async fn finished_games_do_not_count_toward_quota() {
    let store = memory_store();
    let config = GameplayConfig {
        max_active_games: 1,
        ..GameplayConfig::default()
    };
    let matchmaker = SessionMatchmaker::new(store.clone(), config);
    let (alice, bob) = (player("alice"), player("bob"));

    let admission = matchmaker.admit(&alice).await.unwrap();
    matchmaker.admit(&bob).await.unwrap();
    assert!(matchmaker.admit(&alice).await.is_err());

    let mut game = store.load_session(&admission.game_id).await.unwrap().unwrap();
    game.finish(neutrino_backend::WinningCondition::Default).unwrap();
    store.save_session(&game).await.unwrap();

    assert_eq!(
        matchmaker.admit(&alice).await.unwrap().outcome,
        AdmissionOutcome::Created
    );
}

#[tokio::test]
async fn lost_join_race_is_rerouted_to_a_new_session() {
    let store = memory_store();
    let faulty = Arc::new(FaultyStore::new(store.clone()));
    let matchmaker = SessionMatchmaker::new(faulty.clone(), GameplayConfig::default());

    let waiting = matchmaker.admit(&player("alice")).await.unwrap();
    faulty.preempt(1);

    let bob = player("bob");
    let admission = matchmaker.admit(&bob).await.unwrap();
    assert_eq!(admission.outcome, AdmissionOutcome::Created);
    assert_ne!(admission.game_id, waiting.game_id);

    let stolen = store.load_session(&waiting.game_id).await.unwrap().unwrap();
    assert_eq!(stolen.lifecycle_phase, LifecyclePhase::Playing);
    assert_ne!(stolen.player_two.as_ref(), Some(&bob));
}

#[tokio::test]
async fn repeated_lost_races_give_up_with_contention() {
    let store = memory_store();
    let faulty = Arc::new(FaultyStore::new(store.clone()));
    let matchmaker = SessionMatchmaker::new(faulty.clone(), GameplayConfig::default());
    faulty.preempt(u32::MAX);

    let err = matchmaker.admit(&player("bob")).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::MatchmakingContention, _)
    ));
    assert!(err.is_no_op());
    assert_eq!(faulty.create_calls() + faulty.join_calls(), 3);
}

#[tokio::test]
async fn storage_failure_surfaces_as_storage_error() {
    let store = memory_store();
    let faulty = Arc::new(FaultyStore::new(store.clone()));
    faulty.fail_reads(true);
    let matchmaker = SessionMatchmaker::new(faulty, GameplayConfig::default());

    let err = matchmaker.admit(&player("alice")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StorageError);
    assert!(matches!(err, DomainError::Infra(_, StoragePhase::Read, _)));
    assert!(!err.requires_reconciliation());
    assert!(store.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_admits_fill_the_slot_exactly_once() {
    let store = memory_store();
    let matchmaker = Arc::new(SessionMatchmaker::new(
        store.clone(),
        GameplayConfig::default(),
    ));
    let opener = matchmaker.admit(&player("alice")).await.unwrap();

    let contenders: Vec<_> = (0..2).map(|_| player("contender")).collect();
    let results = join_all(contenders.iter().cloned().map(|p| {
        let matchmaker = matchmaker.clone();
        tokio::spawn(async move { matchmaker.admit(&p).await })
    }))
    .await;

    let admissions: Vec<_> = results
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();
    let joined: Vec<_> = admissions
        .iter()
        .filter(|a| a.outcome == AdmissionOutcome::Joined)
        .collect();
    assert_eq!(joined.len(), 1);
    assert_eq!(joined[0].game_id, opener.game_id);

    let created: Vec<_> = admissions
        .iter()
        .filter(|a| a.outcome == AdmissionOutcome::Created)
        .collect();
    assert_eq!(created.len(), 1);
    assert_ne!(created[0].game_id, opener.game_id);

    let open = store.find_open_session().await.unwrap().unwrap();
    assert_eq!(open.id, created[0].game_id);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn many_concurrent_admits_pair_everyone_up() {
    let store = memory_store();
    let matchmaker = Arc::new(SessionMatchmaker::new(
        store.clone(),
        GameplayConfig {
            max_admit_attempts: 64,
            ..GameplayConfig::default()
        },
    ));

    let players: Vec<_> = (0..16).map(|_| player("crowd")).collect();
    let results = join_all(players.iter().cloned().map(|p| {
        let matchmaker = matchmaker.clone();
        tokio::spawn(async move { matchmaker.admit(&p).await })
    }))
    .await;
    for result in results {
        result.unwrap().unwrap();
    }

    let mut open = 0;
    let mut seats = 0;
    for p in &players {
        let games = store.games_for_player(p, true).await.unwrap();
        assert_eq!(games.len(), 1, "each player holds exactly one seat");
        seats += 1;
        if games[0].is_open() {
            open += 1;
        }
    }
    assert_eq!(seats, 16);
    assert_eq!(open, 0, "an even crowd leaves no open slot");
    assert_eq!(store.len(), 8);
}

#[tokio::test]
async fn sqlite_store_enforces_the_same_admission_rules() {
    let store = sqlite_store().await;
    let matchmaker = SessionMatchmaker::new(store.clone(), GameplayConfig::default());
    let (alice, bob, carol) = (player("alice"), player("bob"), player("carol"));

    let a = matchmaker.admit(&alice).await.unwrap();
    let again = matchmaker.admit(&alice).await.unwrap();
    assert_eq!(again.outcome, AdmissionOutcome::AlreadyWaiting);
    assert_eq!(again.game_id, a.game_id);

    let b = matchmaker.admit(&bob).await.unwrap();
    assert_eq!(b.outcome, AdmissionOutcome::Joined);
    assert_eq!(b.game_id, a.game_id);

    let c = matchmaker.admit(&carol).await.unwrap();
    assert_eq!(c.outcome, AdmissionOutcome::Created);
    assert_eq!(store.active_games_count(&alice).await.unwrap(), 1);
    assert_eq!(store.active_games_count(&carol).await.unwrap(), 1);
}
