use barabara_core::{Board, DropOutcome, Phase, Session};

fn active_session() -> Session {
    let mut session = Session::new(0xBA6A_BA6A);
    session.restart();
    session
}

#[test]
fn new_sessions_wait_for_a_picture() {
    let session = Session::new(1);
    assert_eq!(session.phase, Phase::Empty);
    assert_eq!(session.elapsed_secs, 0);
}

#[test]
fn drops_before_any_picture_are_ignored() {
    let mut session = Session::new(1);
    assert_eq!(session.drop_tile(1, 2), DropOutcome::Ignored);
    assert_eq!(session.board, Board::solved());
}

#[test]
fn upload_restart_scrambles_and_arms_the_clock() {
    let session = active_session();
    assert_eq!(session.phase, Phase::Active);
    assert_eq!(session.elapsed_secs, 0);
    let mut seen = [false; 9];
    for id in session.board.slots() {
        seen[(*id - 1) as usize] = true;
    }
    assert!(seen.iter().all(|present| *present));
}

#[test]
fn clock_counts_whole_seconds_while_active() {
    let mut session = active_session();
    for _ in 0..5 {
        session.tick();
    }
    assert_eq!(session.elapsed_secs, 5);
}

#[test]
fn swap_that_does_not_solve_keeps_the_round_active() {
    let mut session = active_session();
    session.board = Board::from_slots([2, 1, 3, 4, 5, 6, 7, 8, 9]);
    assert_eq!(session.drop_tile(3, 4), DropOutcome::Swapped { solved: false });
    assert_eq!(session.phase, Phase::Active);
}

#[test]
fn last_pair_swap_completes_the_round() {
    let mut session = active_session();
    session.board = Board::from_slots([1, 2, 3, 4, 5, 6, 8, 7, 9]);
    assert!(!session.board.is_solved());
    assert_eq!(session.drop_tile(7, 8), DropOutcome::Swapped { solved: true });
    assert!(session.board.is_solved());
    assert!(session.is_completed());
}

#[test]
fn clock_freezes_once_the_round_completes() {
    let mut session = active_session();
    session.board = Board::from_slots([1, 2, 3, 4, 5, 6, 8, 7, 9]);
    for _ in 0..3 {
        session.tick();
    }
    assert_eq!(session.drop_tile(8, 7), DropOutcome::Swapped { solved: true });
    for _ in 0..10 {
        session.tick();
    }
    assert_eq!(session.elapsed_secs, 3);
}

#[test]
fn self_drop_changes_nothing() {
    let mut session = active_session();
    let before = session.board;
    assert_eq!(session.drop_tile(4, 4), DropOutcome::Ignored);
    assert_eq!(session.board, before);
    assert_eq!(session.phase, Phase::Active);
}

#[test]
fn drops_after_completion_are_ignored() {
    let mut session = active_session();
    session.board = Board::from_slots([1, 2, 3, 4, 5, 6, 8, 7, 9]);
    session.drop_tile(8, 7);
    assert_eq!(session.drop_tile(1, 2), DropOutcome::Ignored);
    assert!(session.board.is_solved());
}

#[test]
fn restart_rescrambles_and_resets_the_clock() {
    let mut session = active_session();
    session.board = Board::from_slots([1, 2, 3, 4, 5, 6, 8, 7, 9]);
    for _ in 0..7 {
        session.tick();
    }
    session.drop_tile(8, 7);
    assert_eq!(session.phase, Phase::Completed);

    session.restart();
    assert_eq!(session.phase, Phase::Active);
    assert_eq!(session.elapsed_secs, 0);
    let mut seen = [false; 9];
    for id in session.board.slots() {
        seen[(*id - 1) as usize] = true;
    }
    assert!(seen.iter().all(|present| *present));
}
