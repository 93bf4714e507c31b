mod support;

use std::sync::Arc;

use neutrino_backend::domain::{Relocation, Square, SubPhase, Turn};
use neutrino_backend::engine::NeutrinoSession;
use neutrino_backend::errors::{ConflictKind, DomainError, ErrorKind, ForbiddenKind, MoveStep};
use neutrino_backend::{
    GameDataStore, GameEngine, GameId, GameplayConfig, LifecyclePhase, MakeMoveRequest,
    MoveOrchestrator, NeutrinoEngine, PlayerId, PlayerSlot, SessionMatchmaker, TurnMove,
    TurnPhase, WinningCondition,
};
use proptest::prelude::*;
use support::{memory_store, player, sqlite_store, FaultyStore};

fn relocation(from: (u8, u8), to: (u8, u8)) -> Relocation {
    Relocation::new(Square::new(from.0, from.1), Square::new(to.0, to.1))
}

fn opening_move() -> TurnMove {
    TurnMove {
        neutrino: relocation((2, 2), (2, 1)),
        piece: relocation((0, 0), (0, 3)),
    }
}

/// Admit two players through the matchmaker and return the shared game.
async fn paired(store: Arc<dyn GameDataStore>) -> (GameId, PlayerId, PlayerId) {
    let matchmaker = SessionMatchmaker::new(store, GameplayConfig::default());
    let (alice, bob) = (player("alice"), player("bob"));
    let game_id = matchmaker.admit(&alice).await.unwrap().game_id;
    matchmaker.admit(&bob).await.unwrap();
    (game_id, alice, bob)
}

#[tokio::test]
async fn turns_alternate_between_seats() {
    let store = memory_store();
    let (game_id, alice, bob) = paired(store.clone()).await;
    let orchestrator = MoveOrchestrator::neutrino(store.clone());

    let err = orchestrator
        .apply(&bob, &game_id, opening_move())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(ForbiddenKind::NotYourTurn, _)));
    assert!(err.is_no_op());

    let saved = orchestrator
        .apply(&alice, &game_id, opening_move())
        .await
        .unwrap();
    assert_eq!(
        orchestrator.turn_phase(&saved),
        TurnPhase::Turn(Turn::new(PlayerSlot::Two, SubPhase::Neutrino))
    );

    // Alice may not move twice in a row.
    let err = orchestrator
        .apply(&alice, &game_id, opening_move())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let reply = TurnMove {
        neutrino: relocation((2, 1), (2, 3)),
        piece: relocation((4, 4), (4, 1)),
    };
    let saved = orchestrator.apply(&bob, &game_id, reply).await.unwrap();
    assert_eq!(
        orchestrator.turn_phase(&saved),
        TurnPhase::Turn(Turn::new(PlayerSlot::One, SubPhase::Neutrino))
    );
}

#[tokio::test]
async fn out_of_turn_move_leaves_record_untouched() {
    let store = memory_store();
    let (game_id, _alice, bob) = paired(store.clone()).await;
    let faulty = Arc::new(FaultyStore::new(store.clone()));
    let orchestrator = MoveOrchestrator::neutrino(faulty.clone());
    let before = store.load_session(&game_id).await.unwrap().unwrap();

    assert!(orchestrator.apply(&bob, &game_id, opening_move()).await.is_err());
    assert_eq!(faulty.save_calls(), 0);
    assert_eq!(store.load_session(&game_id).await.unwrap().unwrap(), before);
}

#[tokio::test]
async fn illegal_piece_relocation_is_atomic() {
    let store = memory_store();
    let (game_id, alice, _bob) = paired(store.clone()).await;
    let faulty = Arc::new(FaultyStore::new(store.clone()));
    let orchestrator = MoveOrchestrator::neutrino(faulty.clone());
    let before = store.load_session(&game_id).await.unwrap().unwrap();

    // Legal neutrino move, then a piece that stops short of its slide.
    let turn = TurnMove {
        piece: relocation((0, 0), (0, 2)),
        ..opening_move()
    };
    let err = orchestrator.apply(&alice, &game_id, turn).await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidMove(MoveStep::Piece, _)));

    // Illegal neutrino move: the piece half is never consulted.
    let turn = TurnMove {
        neutrino: relocation((2, 2), (3, 4)),
        ..opening_move()
    };
    let err = orchestrator.apply(&alice, &game_id, turn).await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidMove(MoveStep::Neutrino, _)));

    assert_eq!(faulty.save_calls(), 0);
    let after = store.load_session(&game_id).await.unwrap().unwrap();
    assert_eq!(after.packed_state, before.packed_state);
    assert_eq!(after.lock_version, before.lock_version);
}

#[tokio::test]
async fn waiting_and_finished_games_reject_moves() {
    let store = memory_store();
    let matchmaker = SessionMatchmaker::new(store.clone(), GameplayConfig::default());
    let orchestrator = MoveOrchestrator::neutrino(store.clone());

    let alice = player("alice");
    let waiting = matchmaker.admit(&alice).await.unwrap().game_id;
    let err = orchestrator
        .apply(&alice, &waiting, opening_move())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(ForbiddenKind::NotInPlay, _)));

    let bob = player("bob");
    matchmaker.admit(&bob).await.unwrap();
    let mut game = store.load_session(&waiting).await.unwrap().unwrap();
    game.finish(WinningCondition::Default).unwrap();
    store.save_session(&game).await.unwrap();

    for who in [&alice, &bob] {
        let err = orchestrator
            .apply(who, &waiting, opening_move())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(ForbiddenKind::GameFinished, _)));
    }
}

#[tokio::test]
async fn back_line_win_by_neutrino_skips_the_piece_half() {
    let store = memory_store();
    let (game_id, alice, bob) = paired(store.clone()).await;
    let engine = NeutrinoEngine::new();

    let position = NeutrinoSession::from_rows(
        [".1111", "1....", ".....", "..N..", "2.222"],
        Turn::new(PlayerSlot::Two, SubPhase::Neutrino),
    )
    .unwrap();
    let mut record = store.load_session(&game_id).await.unwrap().unwrap();
    record.packed_state = engine.encode(&position);
    store.insert_record(record);

    let orchestrator = MoveOrchestrator::new(store.clone(), engine);
    let saved = orchestrator
        .apply(&bob, &game_id, TurnMove {
            neutrino: relocation((2, 3), (1, 4)),
            piece: relocation((0, 0), (0, 0)),
        })
        .await
        .unwrap();
    assert_eq!(saved.lifecycle_phase, LifecyclePhase::Done);
    assert_eq!(saved.winning_condition, WinningCondition::BackLine);
    assert!(matches!(
        orchestrator.turn_phase(&saved),
        TurnPhase::Finished(outcome) if outcome.winner == Some(PlayerSlot::Two)
    ));

    let err = orchestrator
        .apply(&alice, &game_id, opening_move())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(ForbiddenKind::GameFinished, _)));
    assert_eq!(store.active_games_count(&alice).await.unwrap(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_moves_commit_at_most_once() {
    let store = memory_store();
    let (game_id, alice, _bob) = paired(store.clone()).await;
    let orchestrator = Arc::new(MoveOrchestrator::neutrino(store.clone()));

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let orchestrator = orchestrator.clone();
            let (alice, game_id) = (alice.clone(), game_id.clone());
            tokio::spawn(async move { orchestrator.apply(&alice, &game_id, opening_move()).await })
        })
        .collect();

    let mut committed = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => committed += 1,
            Err(DomainError::Conflict(ConflictKind::OptimisticLock, _))
            | Err(DomainError::Forbidden(ForbiddenKind::NotYourTurn, _)) => {}
            Err(other) => panic!("unexpected error {other:?}"),
        }
    }
    assert_eq!(committed, 1);

    let stored = store.load_session(&game_id).await.unwrap().unwrap();
    assert_eq!(stored.lock_version, 3);
}

#[tokio::test]
async fn stale_save_surfaces_optimistic_lock_on_sqlite() {
    let store = sqlite_store().await;
    let (game_id, alice, _bob) = paired(store.clone()).await;

    let stale = store.load_session(&game_id).await.unwrap().unwrap();
    let orchestrator = MoveOrchestrator::neutrino(store.clone());
    orchestrator
        .apply(&alice, &game_id, opening_move())
        .await
        .unwrap();

    let err = store.save_session(&stale).await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict(ConflictKind::OptimisticLock, _)));
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn unacknowledged_save_demands_reconciliation() {
    let store = memory_store();
    let (game_id, alice, _bob) = paired(store.clone()).await;
    let faulty = Arc::new(FaultyStore::new(store.clone()));
    faulty.fail_after_save(true);
    let orchestrator = MoveOrchestrator::neutrino(faulty);

    let err = orchestrator
        .apply(&alice, &game_id, opening_move())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StorageError);
    assert!(err.requires_reconciliation());
    assert!(!err.is_no_op());

    // The write actually landed; a reload shows the advanced turn.
    let reloaded = store.load_session(&game_id).await.unwrap().unwrap();
    assert_eq!(reloaded.lock_version, 3);
}

#[tokio::test]
async fn flat_request_round_trips_through_the_orchestrator() {
    let store = memory_store();
    let (game_id, alice, _bob) = paired(store.clone()).await;
    let orchestrator = MoveOrchestrator::neutrino(store.clone());

    let body = format!(
        r#"{{"GameID":"{game_id}","NeutrinoFromX":2,"NeutrinoFromY":2,"NeutrinoToX":2,"NeutrinoToY":1,
            "PieceFromX":0,"PieceFromY":0,"PieceToX":0,"PieceToY":3}}"#
    );
    let request: MakeMoveRequest = serde_json::from_str(&body).unwrap();
    let saved = orchestrator.apply_request(&alice, request).await.unwrap();
    assert_eq!(saved.id, game_id);
}

/// Pick a full legal turn for the current owner of `session`.
fn legal_turn(session: &NeutrinoSession, choice: usize) -> Option<TurnMove> {
    let engine = NeutrinoEngine::new();
    let neutrinos = session.legal_relocations();
    let neutrino = *neutrinos.get(choice % neutrinos.len().max(1))?;
    let after = engine.apply_move(session.clone(), neutrino).ok()?;
    let pieces = after.legal_relocations();
    let piece = match pieces.is_empty() {
        true => neutrino,
        false => pieces[(choice / 7) % pieces.len()],
    };
    Some(TurnMove { neutrino, piece })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_only_the_turn_owner_can_move(
        choices in proptest::collection::vec(any::<usize>(), 1..30),
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async {
            let store = memory_store();
            let (game_id, alice, bob) = paired(store.clone()).await;
            let orchestrator = MoveOrchestrator::neutrino(store.clone());
            let engine = NeutrinoEngine::new();

            for choice in choices {
                let record = store.load_session(&game_id).await.unwrap().unwrap();
                if record.lifecycle_phase == LifecyclePhase::Done {
                    break;
                }
                let session = engine.decode(record.packed_state);
                let Some(turn) = legal_turn(&session, choice) else { break };
                let (mover, waiter) = match orchestrator.turn_phase(&record).owner() {
                    Some(PlayerSlot::One) => (&alice, &bob),
                    Some(PlayerSlot::Two) => (&bob, &alice),
                    None => break,
                };

                let err = orchestrator.apply(waiter, &game_id, turn).await.unwrap_err();
                prop_assert!(matches!(err, DomainError::Forbidden(ForbiddenKind::NotYourTurn, _)));
                prop_assert_eq!(
                    store.load_session(&game_id).await.unwrap().unwrap().lock_version,
                    record.lock_version
                );

                let saved = orchestrator.apply(mover, &game_id, turn).await.unwrap();
                prop_assert_eq!(saved.lock_version, record.lock_version + 1);
                prop_assert_eq!(
                    saved.lifecycle_phase == LifecyclePhase::Done,
                    orchestrator.turn_phase(&saved).outcome().is_some()
                );
            }
            Ok(())
        })?;
    }
}
