use super::*;

#[test]
fn test_initial_state() {
    let state = TicTacToe::new();
    assert_eq!(state.board, [0; 9]);
    assert_eq!(state.current_player, Player::One);
    assert_eq!(state.winner, None);
    assert!(!state.is_done());
}

#[test]
fn test_legal_moves() {
    let state = TicTacToe::new();
    let legal = state.legal_actions();
    assert_eq!(legal, (0..9).collect::<Vec<_>>());
    assert_eq!(state.legal_mask(), vec![1.0; 9]);

    // After one move
    let state = state.apply(4); // Center
    let legal = state.legal_actions();
    assert_eq!(legal.len(), 8);
    assert!(!legal.contains(&4));
    assert_eq!(state.legal_mask()[4], 0.0);
}

#[test]
fn test_make_move() {
    let state = TicTacToe::new();
    let new_state = state.make_move(4); // X places in center

    assert_eq!(new_state.board[4], 1);
    assert_eq!(new_state.player(), Player::Two); // Now O's turn
    assert!(!new_state.is_done());
}

#[test]
fn test_invalid_move() {
    let state = TicTacToe::new();
    let state_with_move = state.make_move(4);

    // Try to place in same position
    let invalid_state = state_with_move.make_move(4);
    assert_eq!(invalid_state, state_with_move); // Should be unchanged
}

#[test]
fn test_winning_game() {
    // X wins with top row
    let state = TicTacToe::from_moves(&[0, 3, 1, 4, 2]);

    assert_eq!(state.winner(), Some(Outcome::Win(Player::One)));
    assert!(state.is_terminal());
    assert!(state.legal_actions().is_empty());
    // The winner stays the mover of record
    assert_eq!(state.player(), Player::One);
}

#[test]
fn test_draw_game() {
    // X O X / X O O / O X X
    let state = TicTacToe::from_moves(&[0, 1, 2, 4, 3, 5, 7, 6, 8]);

    assert_eq!(state.winner(), Some(Outcome::Draw));
    assert!(state.legal_actions().is_empty());
}

#[test]
fn test_moves_after_game_over_are_ignored() {
    let won = TicTacToe::from_moves(&[0, 3, 1, 4, 2]);
    assert_eq!(won.make_move(8), won);
}

#[test]
fn test_observation_encoding() {
    let state = TicTacToe::new();
    let encoded = state.encode();

    assert_eq!(encoded.len(), TicTacToe::INPUT_SIZE);
    // All board positions should be 0 initially
    assert!(encoded[..18].iter().all(|&v| v == 0.0));
    // All moves should be legal
    assert!(encoded[18..27].iter().all(|&v| v == 1.0));
    // X should be current player
    assert_eq!(&encoded[27..], &[1.0, 0.0]);
}

#[test]
fn test_observation_after_moves() {
    let state = TicTacToe::from_moves(&[0, 2]);
    let encoded = state.encode();

    assert_eq!(encoded[0], 1.0); // X at 0
    assert_eq!(encoded[9 + 2], 1.0); // O at 2
    assert_eq!(encoded[18], 0.0); // position 0 no longer legal
    assert_eq!(&encoded[27..], &[1.0, 0.0]); // X to move
}

#[test]
fn test_equal_positions_hash_equal() {
    use std::collections::HashSet;

    // Transposition: same cells, same mover
    let a = TicTacToe::from_moves(&[0, 4, 8]);
    let b = TicTacToe::from_moves(&[8, 4, 0]);
    assert_eq!(a, b);

    let set: HashSet<TicTacToe> = [a, b].into_iter().collect();
    assert_eq!(set.len(), 1);
}

#[test]
fn test_display() {
    let state = TicTacToe::from_moves(&[0, 4]);
    let rendered = state.to_string();
    assert_eq!(rendered, "X..\n.O.\n...\n");
}

#[test]
fn test_eval_to_string_uses_board_shape() {
    let state = TicTacToe::new();
    let rendered = state.eval_to_string(&[0.5; 9]);
    assert_eq!(rendered.lines().count(), 3);
}
