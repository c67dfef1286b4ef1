use poise::serenity_prelude::UserId;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// Players with an unfinished game. One running game per player at a time.
#[derive(Clone, Debug, Default)]
pub struct ActiveGames {
    players: Arc<Mutex<HashSet<UserId>>>,
}

impl ActiveGames {
    /// Claims the player's slot; `None` if they already have a game running.
    pub fn try_claim(&self, user_id: UserId) -> Option<GameSlot> {
        if !self.lock().insert(user_id) {
            return None;
        }

        Some(GameSlot {
            games: self.clone(),
            user_id,
            held: true,
        })
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<UserId>> {
        self.players
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// A board's hold on its player's slot. Released when the game finishes and
/// again, at the latest, when the board goes away.
#[derive(Debug)]
pub struct GameSlot {
    games: ActiveGames,
    user_id: UserId,
    held: bool,
}

impl GameSlot {
    /// Lets the player start another game while this board stays on screen.
    pub fn release(&mut self) {
        if std::mem::take(&mut self.held) {
            self.games.lock().remove(&self.user_id);
        }
    }

    /// Takes the slot back for a restart. `false` if another game owns it now.
    pub fn reclaim(&mut self) -> bool {
        if !self.held {
            self.held = self.games.lock().insert(self.user_id);
        }
        self.held
    }
}

impl Drop for GameSlot {
    fn drop(&mut self) {
        self.release();
    }
}
