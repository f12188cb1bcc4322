use std::{
    sync::{Arc, Weak},
    time::Duration,
};

use chess_shared::{
    domain::{Color, GameId, PromotionPiece, Square, TimeControl},
    protocol::{MoveRequest, NewGameRequest},
};
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
    time::MissedTickBehavior,
};
use tracing::{debug, info, warn};

use crate::{
    api::GameApi,
    error::{ClientError, ClientErrorNotice, Operation},
    prompt::Prompter,
    state::{ClickOutcome, MoveIntent, SessionState},
    view::{render, BoardView},
    ClientEvent, BOT_MOVE_DELAY, CLOCK_POLL_INTERVAL, HINT_DISPLAY_WINDOW,
};

pub const RESIGN_QUESTION: &str = "Are you sure you want to resign?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub bot_move_delay: Duration,
    pub hint_display: Duration,
    pub clock_poll: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            bot_move_delay: BOT_MOVE_DELAY,
            hint_display: HINT_DISPLAY_WINDOW,
            clock_poll: CLOCK_POLL_INTERVAL,
        }
    }
}

/// Mediates between player intent and the game authority.
///
/// The state lock is never held across a request. Overlapping requests are
/// not serialized: whichever response lands last is what the player sees.
pub struct SessionController {
    api: Arc<dyn GameApi>,
    prompter: Arc<dyn Prompter>,
    inner: Mutex<SessionState>,
    events: broadcast::Sender<ClientEvent>,
    timings: Timings,
}

impl SessionController {
    pub fn new(api: Arc<dyn GameApi>, prompter: Arc<dyn Prompter>) -> Arc<Self> {
        Self::with_timings(api, prompter, Timings::default())
    }

    pub fn with_timings(
        api: Arc<dyn GameApi>,
        prompter: Arc<dyn Prompter>,
        timings: Timings,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            api,
            prompter,
            inner: Mutex::new(SessionState::new()),
            events,
            timings,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> SessionState {
        self.inner.lock().await.clone()
    }

    pub async fn view(&self) -> BoardView {
        render(&*self.inner.lock().await)
    }

    fn emit(&self, event: ClientEvent) {
        let _ = self.events.send(event);
    }

    fn changed(&self) {
        self.emit(ClientEvent::StateChanged);
    }

    fn notify(&self, message: impl Into<String>) {
        self.emit(ClientEvent::Notice(message.into()));
    }

    /// Reports a failed operation and hands the error back to the caller.
    fn surface<T>(
        &self,
        operation: Operation,
        result: Result<T, ClientError>,
    ) -> Result<T, ClientError> {
        if let Err(err) = &result {
            if operation.is_background() {
                warn!(operation = operation.label(), %err, "background request failed");
            } else {
                warn!(operation = operation.label(), %err, "request failed");
                self.emit(ClientEvent::Error(ClientErrorNotice::new(operation, err)));
            }
        }
        result
    }

    async fn current_game(&self) -> Result<GameId, ClientError> {
        self.inner
            .lock()
            .await
            .game_id()
            .cloned()
            .ok_or(ClientError::NoActiveGame)
    }

    pub async fn start_game(
        &self,
        player_name: &str,
        player_color: Color,
        time_control: TimeControl,
    ) -> Result<(), ClientError> {
        let request = NewGameRequest {
            username: player_name.to_string(),
            player_color,
            time_control,
        };
        let response = self.surface(Operation::StartGame, self.api.new_game(&request).await)?;
        info!(
            game_id = %response.game_id,
            player = player_name,
            color = %player_color,
            %time_control,
            "game started"
        );
        self.inner
            .lock()
            .await
            .begin_game(player_name, player_color, time_control, response);
        self.changed();

        let _ = self.load_stats(player_name).await;
        Ok(())
    }

    /// Square click. Either selects a piece of the side to move or, with a
    /// piece already selected, sends the move.
    pub async fn select_or_move(self: &Arc<Self>, square: Square) -> Result<(), ClientError> {
        let outcome = self.inner.lock().await.click(square);
        match outcome {
            ClickOutcome::Ignored => Ok(()),
            ClickOutcome::Selected {
                square,
                possible_moves,
            } => {
                debug!(%square, advisory = possible_moves.len(), "piece selected");
                self.changed();
                Ok(())
            }
            ClickOutcome::MoveAttempt(intent) => {
                self.changed();
                self.make_move(intent).await
            }
        }
    }

    /// Origin and target given together. A pending selection is dropped
    /// first, and nothing is sent unless `from` holds a piece of the side to
    /// move.
    pub async fn play_move(self: &Arc<Self>, from: Square, to: Square) -> Result<(), ClientError> {
        let (cleared, outcome) = {
            let mut guard = self.inner.lock().await;
            let cleared = guard.clear_selection();
            (cleared, guard.click(from))
        };
        match outcome {
            ClickOutcome::Selected { .. } => {
                self.changed();
                self.select_or_move(to).await
            }
            _ => {
                if cleared {
                    self.changed();
                }
                Err(ClientError::NotMovable(from))
            }
        }
    }

    async fn make_move(self: &Arc<Self>, intent: MoveIntent) -> Result<(), ClientError> {
        let promotion = if intent.needs_promotion {
            match self.prompter.choose_promotion().await {
                Some(piece) => piece,
                None => {
                    debug!(from = %intent.from, to = %intent.to, "promotion prompt dismissed");
                    return Ok(());
                }
            }
        } else {
            PromotionPiece::Queen
        };

        let game_id = self.surface(Operation::Move, self.current_game().await)?;
        let request = MoveRequest {
            game_id,
            from: intent.from,
            to: intent.to,
            promotion,
        };
        debug!(from = %request.from, to = %request.to, "sending move");
        let response = self.surface(Operation::Move, self.api.make_move(&request).await)?;

        let applied = self.inner.lock().await.apply_move(response);
        self.changed();

        if let Some(result) = applied.finished {
            self.game_over(&result);
        } else if applied.bot_to_move {
            self.schedule_bot_move();
        }
        Ok(())
    }

    fn schedule_bot_move(self: &Arc<Self>) {
        let controller = Arc::clone(self);
        let delay = self.timings.bot_move_delay;
        debug!(?delay, "bot move scheduled");
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = controller.request_bot_move().await;
        });
    }

    /// Asks the authority to play for the bot. Never chains another bot move.
    pub async fn request_bot_move(&self) -> Result<(), ClientError> {
        let game_id = self.surface(Operation::BotMove, self.current_game().await)?;
        let response = self.surface(Operation::BotMove, self.api.bot_move(&game_id).await)?;

        let applied = self.inner.lock().await.apply_move(response);
        self.changed();

        if let Some(result) = applied.finished {
            self.game_over(&result);
        }
        Ok(())
    }

    fn game_over(&self, result: &str) {
        info!(result, "game finished");
        self.notify(format!("Game over: {result}"));
    }

    pub async fn undo(&self) -> Result<(), ClientError> {
        let game_id = self.surface(Operation::Undo, self.current_game().await)?;
        let response = self.surface(Operation::Undo, self.api.undo(&game_id).await)?;
        self.inner.lock().await.apply_undo(response);
        self.changed();
        Ok(())
    }

    pub async fn resign(&self) -> Result<(), ClientError> {
        if !self.prompter.confirm(RESIGN_QUESTION).await {
            debug!("resignation declined");
            return Ok(());
        }

        let game_id = self.surface(Operation::Resign, self.current_game().await)?;
        let response = self.surface(Operation::Resign, self.api.resign(&game_id).await)?;
        self.inner.lock().await.apply_resign(response);
        self.changed();
        info!(%game_id, "player resigned");
        self.notify("You resigned. Game over.");
        Ok(())
    }

    /// Marks one suggested move for the display window, then clears it.
    pub async fn request_hint(self: &Arc<Self>) -> Result<(), ClientError> {
        let game_id = self.surface(Operation::Hint, self.current_game().await)?;
        self.inner.lock().await.clear_hint();
        self.changed();

        let response = self.surface(Operation::Hint, self.api.hint(&game_id).await)?;
        debug!(from = %response.from_square, to = %response.to_square, "hint received");
        let generation = self.inner.lock().await.show_hint(response);
        self.changed();

        let controller = Arc::clone(self);
        let window = self.timings.hint_display;
        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            if controller.inner.lock().await.expire_hint(generation) {
                controller.changed();
            }
        });
        Ok(())
    }

    /// One clock poll. Skipped while no timed game is running.
    pub async fn sync_clock(&self) -> Result<(), ClientError> {
        let game_id = {
            let guard = self.inner.lock().await;
            match guard.game_id() {
                Some(game_id) if guard.is_playable() && guard.timers_enabled() => game_id.clone(),
                _ => return Ok(()),
            }
        };

        let response = self.surface(Operation::ClockSync, self.api.timers(&game_id).await)?;

        let timed_out = {
            let mut guard = self.inner.lock().await;
            if guard.game_id() != Some(&game_id) {
                debug!(%game_id, "dropping clock update for a replaced game");
                return Ok(());
            }
            guard.apply_timers(response)
        };
        self.changed();

        if timed_out {
            info!(%game_id, "game finished on time");
            self.notify("Time out! Game over.");
        }
        Ok(())
    }

    /// Polls the clock on a fixed interval until the controller is dropped.
    pub fn spawn_clock_sync(self: &Arc<Self>) -> JoinHandle<()> {
        let controller: Weak<Self> = Arc::downgrade(self);
        let period = self.timings.clock_poll;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let Some(controller) = controller.upgrade() else {
                    break;
                };
                let _ = controller.sync_clock().await;
            }
        })
    }

    pub async fn load_stats(&self, username: &str) -> Result<(), ClientError> {
        let stats = self.surface(Operation::Stats, self.api.stats(username).await)?;
        self.inner.lock().await.apply_stats(stats);
        self.changed();
        Ok(())
    }

    pub async fn flip_board(&self) {
        self.inner.lock().await.toggle_orientation();
        self.changed();
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
