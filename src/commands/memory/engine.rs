use super::board::Board;
use super::card::Symbol;
use super::error::MemoryError;
use super::timer::GameTimer;
use rand::Rng;
use std::time::Duration;

/// How long a mismatched pair stays visible before it is turned back down.
pub const MISMATCH_DELAY: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    Idle,
    AwaitingFirstFlip,
    AwaitingSecondFlip { first: usize },
    Resolving { pair: [usize; 2] },
    Complete,
}

/// Why a flip was dropped without touching the board.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IgnoredAction {
    NotPlaying,
    Resolving,
    OutOfRange,
    AlreadyRevealed,
}

/// Handed out on a mismatch. Give it back to [`MatchEngine::hide_mismatch`]
/// once [`MISMATCH_DELAY`] has passed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PendingHide {
    generation: u64,
    pair: [usize; 2],
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Completion {
    pub player_name: String,
    pub elapsed_seconds: u64,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FlipOutcome {
    Ignored(IgnoredAction),
    FirstReveal,
    Matched,
    Mismatch(PendingHide),
    Completed(Completion),
}

pub struct MatchEngine {
    board: Board,
    phase: Phase,
    player_name: Option<String>,
    matched_pairs: usize,
    generation: u64,
    timer: GameTimer,
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchEngine {
    pub fn new() -> Self {
        Self {
            board: Board::empty(),
            phase: Phase::Idle,
            player_name: None,
            matched_pairs: 0,
            generation: 0,
            timer: GameTimer::new(),
        }
    }

    /// Deals a new board for `player_name` and starts the clock.
    ///
    /// A blank name is rejected and the current game, if any, keeps running.
    pub fn start_game<R: Rng + ?Sized>(
        &mut self,
        player_name: &str,
        rng: &mut R,
    ) -> Result<(), MemoryError> {
        let player_name = player_name.trim();
        if player_name.is_empty() {
            return Err(MemoryError::InvalidInput);
        }

        self.board = Board::deal(rng);
        self.matched_pairs = 0;
        self.generation += 1;
        self.player_name = Some(player_name.to_owned());
        self.phase = Phase::AwaitingFirstFlip;
        self.timer.start();
        Ok(())
    }

    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), MemoryError> {
        let player_name = self.player_name.clone().ok_or(MemoryError::InvalidInput)?;
        self.start_game(&player_name, rng)
    }

    pub fn flip(&mut self, index: usize) -> FlipOutcome {
        let first = match self.phase {
            Phase::AwaitingFirstFlip => None,
            Phase::AwaitingSecondFlip { first } => Some(first),
            Phase::Resolving { .. } => return FlipOutcome::Ignored(IgnoredAction::Resolving),
            Phase::Idle | Phase::Complete => {
                return FlipOutcome::Ignored(IgnoredAction::NotPlaying);
            }
        };

        let Some(card) = self.board.get_mut(index) else {
            return FlipOutcome::Ignored(IgnoredAction::OutOfRange);
        };
        if card.matched || card.face_up {
            return FlipOutcome::Ignored(IgnoredAction::AlreadyRevealed);
        }
        card.face_up = true;

        match first {
            None => {
                self.phase = Phase::AwaitingSecondFlip { first: index };
                FlipOutcome::FirstReveal
            }
            Some(first) => self.resolve([first, index]),
        }
    }

    fn resolve(&mut self, pair: [usize; 2]) -> FlipOutcome {
        if !self.board.symbols_match(pair) {
            self.phase = Phase::Resolving { pair };
            return FlipOutcome::Mismatch(PendingHide {
                generation: self.generation,
                pair,
            });
        }

        self.board.mark_matched(pair);
        self.matched_pairs += 1;

        if self.matched_pairs < self.total_pairs() {
            self.phase = Phase::AwaitingFirstFlip;
            return FlipOutcome::Matched;
        }

        self.timer.stop();
        self.phase = Phase::Complete;
        FlipOutcome::Completed(Completion {
            player_name: self.player_name.clone().unwrap_or_default(),
            elapsed_seconds: self.timer.elapsed_seconds(),
        })
    }

    /// Turns a mismatched pair face-down again.
    ///
    /// Returns `false` and leaves the board alone when the ticket is stale: the
    /// game was restarted or disposed since the mismatch happened.
    pub fn hide_mismatch(&mut self, ticket: PendingHide) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        match self.phase {
            Phase::Resolving { pair } if pair == ticket.pair => {
                self.board.hide(pair);
                self.phase = Phase::AwaitingFirstFlip;
                true
            }
            _ => false,
        }
    }

    /// Stops the clock and drops the board. Outstanding tickets become stale.
    pub fn dispose(&mut self) {
        self.timer.stop();
        self.generation += 1;
        self.board = Board::empty();
        self.matched_pairs = 0;
        self.phase = Phase::Idle;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn matched_pairs(&self) -> usize {
        self.matched_pairs
    }

    pub fn total_pairs(&self) -> usize {
        Symbol::ALL.len()
    }

    pub fn player_name(&self) -> Option<&str> {
        self.player_name.as_deref()
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.timer.elapsed_seconds()
    }

    pub fn is_timer_running(&self) -> bool {
        self.timer.is_running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::memory::board::BOARD_SIZE;
    use rand::{SeedableRng, rngs::StdRng};
    use tokio::time::sleep;

    fn started(name: &str) -> MatchEngine {
        let mut engine = MatchEngine::new();
        engine
            .start_game(name, &mut StdRng::seed_from_u64(7))
            .expect("valid name");
        engine
    }

    fn partner_of(engine: &MatchEngine, index: usize) -> usize {
        let symbol = engine.board().get(index).expect("in range").symbol;
        (0..BOARD_SIZE)
            .find(|&other| other != index && engine.board().get(other).unwrap().symbol == symbol)
            .expect("every symbol has a partner")
    }

    fn mismatch_of(engine: &MatchEngine, index: usize) -> usize {
        let symbol = engine.board().get(index).expect("in range").symbol;
        (0..BOARD_SIZE)
            .find(|&other| engine.board().get(other).unwrap().symbol != symbol)
            .expect("board has more than one symbol")
    }

    fn solve(engine: &mut MatchEngine) -> Option<Completion> {
        let mut done = None;
        for index in 0..BOARD_SIZE {
            if engine.board().get(index).unwrap().matched {
                continue;
            }
            let partner = partner_of(engine, index);
            assert_eq!(engine.flip(index), FlipOutcome::FirstReveal);
            if let FlipOutcome::Completed(completion) = engine.flip(partner) {
                done = Some(completion);
            }
        }
        done
    }

    #[tokio::test]
    async fn blank_name_is_rejected_and_nothing_starts() {
        let mut engine = MatchEngine::new();
        let result = engine.start_game("   ", &mut StdRng::seed_from_u64(1));
        assert!(matches!(result, Err(MemoryError::InvalidInput)));
        assert_eq!(engine.phase(), Phase::Idle);
        assert!(engine.board().is_empty());
        assert!(!engine.is_timer_running());
    }

    #[tokio::test]
    async fn start_deals_and_awaits_first_flip() {
        let engine = started("  Alice ");
        assert_eq!(engine.phase(), Phase::AwaitingFirstFlip);
        assert_eq!(engine.board().len(), BOARD_SIZE);
        assert_eq!(engine.matched_pairs(), 0);
        assert_eq!(engine.player_name(), Some("Alice"));
        assert!(engine.is_timer_running());
    }

    #[tokio::test]
    async fn matching_pair_is_marked_and_round_resets() {
        let mut engine = started("Alice");
        let partner = partner_of(&engine, 0);

        assert_eq!(engine.flip(0), FlipOutcome::FirstReveal);
        assert_eq!(engine.phase(), Phase::AwaitingSecondFlip { first: 0 });
        assert_eq!(engine.flip(partner), FlipOutcome::Matched);

        assert!(engine.board().get(0).unwrap().matched);
        assert!(engine.board().get(partner).unwrap().matched);
        assert_eq!(engine.matched_pairs(), 1);
        assert_eq!(engine.phase(), Phase::AwaitingFirstFlip);
        assert_eq!(engine.board().pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn mismatch_resolves_after_delay() {
        let mut engine = started("Bob");
        let other = mismatch_of(&engine, 2);

        engine.flip(2);
        let FlipOutcome::Mismatch(ticket) = engine.flip(other) else {
            panic!("expected a mismatch");
        };
        assert_eq!(ticket.pair, [2, other]);
        assert_eq!(engine.phase(), Phase::Resolving { pair: [2, other] });
        assert_eq!(engine.board().pending_count(), 2);

        assert_eq!(engine.flip(5), FlipOutcome::Ignored(IgnoredAction::Resolving));

        sleep(MISMATCH_DELAY).await;
        assert!(engine.hide_mismatch(ticket));
        assert!(!engine.board().get(2).unwrap().face_up);
        assert!(!engine.board().get(other).unwrap().face_up);
        assert_eq!(engine.matched_pairs(), 0);
        assert_eq!(engine.phase(), Phase::AwaitingFirstFlip);
    }

    #[tokio::test]
    async fn ignored_flips_change_nothing() {
        let mut engine = started("Carol");
        let partner = partner_of(&engine, 0);
        engine.flip(0);
        engine.flip(partner);

        let board = engine.board().clone();
        assert_eq!(
            engine.flip(0),
            FlipOutcome::Ignored(IgnoredAction::AlreadyRevealed)
        );
        assert_eq!(
            engine.flip(BOARD_SIZE),
            FlipOutcome::Ignored(IgnoredAction::OutOfRange)
        );
        assert_eq!(engine.board(), &board);
        assert_eq!(engine.phase(), Phase::AwaitingFirstFlip);

        let next = (0..BOARD_SIZE)
            .find(|&index| !engine.board().get(index).unwrap().matched)
            .unwrap();
        engine.flip(next);
        let board = engine.board().clone();
        assert_eq!(
            engine.flip(next),
            FlipOutcome::Ignored(IgnoredAction::AlreadyRevealed)
        );
        assert_eq!(engine.board(), &board);
        assert_eq!(engine.phase(), Phase::AwaitingSecondFlip { first: next });

        let mut idle = MatchEngine::new();
        assert_eq!(idle.flip(0), FlipOutcome::Ignored(IgnoredAction::NotPlaying));
    }

    #[tokio::test(start_paused = true)]
    async fn full_game_completes_with_every_card_matched() {
        let mut engine = started("Dana");
        sleep(Duration::from_millis(4_500)).await;

        let completion = solve(&mut engine).expect("game completes");
        assert_eq!(completion.player_name, "Dana");
        assert_eq!(completion.elapsed_seconds, 4);
        assert_eq!(engine.phase(), Phase::Complete);
        assert_eq!(engine.matched_pairs(), engine.total_pairs());
        assert!(engine.board().all_matched());
        assert!(!engine.is_timer_running());

        sleep(Duration::from_secs(3)).await;
        assert_eq!(engine.elapsed_seconds(), 4);
        assert_eq!(engine.flip(0), FlipOutcome::Ignored(IgnoredAction::NotPlaying));
    }

    #[tokio::test]
    async fn stale_ticket_after_restart_is_discarded() {
        let mut engine = started("Eve");
        let other = mismatch_of(&engine, 0);
        engine.flip(0);
        let FlipOutcome::Mismatch(ticket) = engine.flip(other) else {
            panic!("expected a mismatch");
        };

        engine
            .restart(&mut StdRng::seed_from_u64(99))
            .expect("name is held");
        let first = (0..BOARD_SIZE)
            .find(|&index| index != 0 && index != other)
            .unwrap();
        engine.flip(first);

        assert!(!engine.hide_mismatch(ticket));
        assert_eq!(engine.phase(), Phase::AwaitingSecondFlip { first });
        assert!(engine.board().get(first).unwrap().face_up);
        assert_eq!(engine.player_name(), Some("Eve"));
    }

    #[tokio::test(start_paused = true)]
    async fn restart_resets_clock_and_pairs() {
        let mut engine = started("Finn");
        let partner = partner_of(&engine, 0);
        engine.flip(0);
        engine.flip(partner);
        sleep(Duration::from_millis(2_500)).await;
        assert_eq!(engine.elapsed_seconds(), 2);

        engine
            .restart(&mut StdRng::seed_from_u64(3))
            .expect("name is held");
        assert_eq!(engine.matched_pairs(), 0);
        assert_eq!(engine.elapsed_seconds(), 0);
        assert_eq!(engine.phase(), Phase::AwaitingFirstFlip);
        assert!(engine.board().cards().iter().all(|card| !card.face_up));
    }

    #[tokio::test]
    async fn restart_without_a_player_is_invalid() {
        let mut engine = MatchEngine::new();
        let result = engine.restart(&mut StdRng::seed_from_u64(3));
        assert!(matches!(result, Err(MemoryError::InvalidInput)));
    }

    #[tokio::test]
    async fn dispose_stops_clock_and_invalidates_tickets() {
        let mut engine = started("Gus");
        let other = mismatch_of(&engine, 0);
        engine.flip(0);
        let FlipOutcome::Mismatch(ticket) = engine.flip(other) else {
            panic!("expected a mismatch");
        };

        engine.dispose();
        assert!(!engine.hide_mismatch(ticket));
        assert_eq!(engine.phase(), Phase::Idle);
        assert!(engine.board().is_empty());
        assert!(!engine.is_timer_running());
    }
}
