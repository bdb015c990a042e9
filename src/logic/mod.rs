use std::{sync::Arc, time::Duration};

use rand::Rng;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::{
    error::{GameError, Result},
    field::{NumberField, TimeLimit},
    modal::ModalService,
    model::{CellState, GamePhase, Grid, ResultData, ResultDialog, Winner},
};

pub mod helpers;

/// Broker type the game core talks to.
pub type ResultModalService = ModalService<ResultDialog, ResultData, bool>;

/// What a concrete game does when the player confirms a restart.
pub trait RestartHook {
    fn restart_callback(&self);
}

impl<F: Fn()> RestartHook for F {
    fn restart_callback(&self) {
        self()
    }
}

/// Lifecycle shared by every game variant: time limit, result negotiation
/// and grid helpers. Win conditions and rendering stay with the variant,
/// which plugs in through `H`.
pub struct GameCore<H> {
    session_id: String,
    modal: Arc<ResultModalService>,
    result_dialog: ResultDialog,
    time_limit: TimeLimit,
    phase: watch::Sender<GamePhase>,
    restart: H,
}

impl<H: RestartHook> GameCore<H> {
    pub fn new(modal: Arc<ResultModalService>, result_dialog: ResultDialog, restart: H) -> Self {
        let session_id = nanoid::nanoid!();
        debug!("Created game session {}", session_id);

        Self {
            session_id,
            modal,
            result_dialog,
            time_limit: NumberField::time_limit(),
            phase: watch::Sender::new(GamePhase::Idle),
            restart,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn time_limit(&self) -> &TimeLimit {
        &self.time_limit
    }

    pub fn phase(&self) -> GamePhase {
        *self.phase.borrow()
    }

    pub fn subscribe_phase(&self) -> watch::Receiver<GamePhase> {
        self.phase.subscribe()
    }

    fn set_phase(&self, phase: GamePhase) {
        let previous = self.phase.send_replace(phase);
        if previous != phase {
            debug!(session = %self.session_id, ?previous, ?phase, "Phase changed");
        }
    }

    /// Arm a round: checks the time limit and enters `Playing`.
    ///
    /// Refused while a result dialog is open or when the time limit is
    /// invalid; the phase is left untouched in both cases.
    #[instrument(skip(self), fields(session = %self.session_id))]
    pub fn start(&self) -> Result<Duration> {
        if self.phase() == GamePhase::AwaitingModalDecision {
            warn!("Refusing to start a round while a result dialog is open");
            return Err(GameError::AwaitingDecision);
        }

        let millis = self
            .time_limit
            .valid_value()
            .map_err(GameError::InvalidTimeLimit)?;

        self.set_phase(GamePhase::Playing);
        info!("Round armed with a {}ms time limit", millis);
        Ok(Duration::from_millis(u64::from(millis)))
    }

    /// Announce `winner` and wait for the user's decision.
    ///
    /// Restarts through the hook when the dialog closes with `true` and
    /// returns whether it did. Any other outcome ends the session, and so
    /// does dropping the future before the dialog closes.
    #[instrument(skip(self), fields(session = %self.session_id))]
    pub async fn open_modal(&self, winner: Winner) -> bool {
        self.set_phase(GamePhase::AwaitingModalDecision);
        let mut pending = PendingDecision {
            phase: &self.phase,
            modal: &self.modal,
            request: None,
            settled: false,
        };

        let receipt = self
            .modal
            .open(self.result_dialog.clone(), Some(ResultData { winner }))
            .await;
        pending.request = Some(receipt.id());
        let confirmed = receipt.await.unwrap_or(false);
        pending.settled = true;

        if confirmed {
            info!("Restart confirmed");
            self.restart.restart_callback();
            self.set_phase(GamePhase::Playing);
        } else {
            info!("Result dialog dismissed without restart");
            self.set_phase(GamePhase::Idle);
        }

        confirmed
    }

    pub fn fill_cell_item_by_index(
        &self,
        cells: &[CellState],
        index: usize,
        state: CellState,
    ) -> Result<Grid> {
        helpers::fill_cell_item_by_index(cells, index, state)
    }

    pub fn get_random_cell_index(&self, cells: &[CellState]) -> Result<usize> {
        helpers::get_random_cell_index(cells)
    }

    pub fn get_random_cell_index_with_rng<R: Rng + ?Sized>(
        &self,
        cells: &[CellState],
        rng: &mut R,
    ) -> Result<usize> {
        helpers::get_random_cell_index_with_rng(cells, rng)
    }
}

/// Puts the session back to `Idle` when `open_modal` is abandoned mid-decision.
struct PendingDecision<'a> {
    phase: &'a watch::Sender<GamePhase>,
    modal: &'a ResultModalService,
    request: Option<Uuid>,
    settled: bool,
}

impl Drop for PendingDecision<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        warn!("Result dialog abandoned before a decision");
        if let Some(id) = self.request {
            self.modal.discard(id);
        }
        self.phase.send_replace(GamePhase::Idle);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::{
        field::ValidationKind,
        model::CellState::{self, *},
    };

    fn test_game() -> (GameCore<impl RestartHook>, Arc<ResultModalService>, Arc<AtomicUsize>) {
        let modal = Arc::new(ResultModalService::new());
        let restarts = Arc::new(AtomicUsize::new(0));
        let counter = restarts.clone();
        let game = GameCore::new(modal.clone(), ResultDialog::default(), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (game, modal, restarts)
    }

    /// Drive `open_modal` while a fake renderer answers with `result`.
    async fn answer_modal(
        game: &GameCore<impl RestartHook>,
        modal: &ResultModalService,
        winner: Winner,
        result: Option<bool>,
    ) -> (bool, Option<ResultData>) {
        let mut events = modal.subscribe().await;
        let renderer = async {
            events.recv().await;
            let data = modal.data().await;
            modal.close(result).await;
            data
        };
        tokio::join!(game.open_modal(winner), renderer)
    }

    #[test]
    fn starts_idle_with_default_time_limit() {
        let (game, _, _) = test_game();
        assert_eq!(game.phase(), GamePhase::Idle);
        assert_eq!(game.time_limit().value(), Some(1000));
        assert_eq!(game.session_id().len(), 21);
    }

    #[test]
    fn start_arms_valid_time_limit() {
        let (game, _, _) = test_game();
        game.time_limit().set_value(Some(500));

        assert_eq!(game.start(), Ok(Duration::from_millis(500)));
        assert_eq!(game.phase(), GamePhase::Playing);
    }

    #[test]
    fn start_rejects_invalid_time_limit() {
        let (game, _, _) = test_game();

        game.time_limit().set_value(Some(499));
        assert_eq!(
            game.start(),
            Err(GameError::InvalidTimeLimit(vec![ValidationKind::Min]))
        );

        game.time_limit().set_value(None);
        assert_eq!(
            game.start(),
            Err(GameError::InvalidTimeLimit(vec![ValidationKind::Required]))
        );
        assert_eq!(game.phase(), GamePhase::Idle);
    }

    #[tokio::test]
    async fn true_result_restarts_once() {
        let (game, modal, restarts) = test_game();

        let (restarted, _) = answer_modal(&game, &modal, Winner::Player, Some(true)).await;

        assert!(restarted);
        assert_eq!(restarts.load(Ordering::SeqCst), 1);
        assert_eq!(game.phase(), GamePhase::Playing);
    }

    #[tokio::test]
    async fn false_result_does_not_restart() {
        let (game, modal, restarts) = test_game();

        let (restarted, _) = answer_modal(&game, &modal, Winner::Computer, Some(false)).await;

        assert!(!restarted);
        assert_eq!(restarts.load(Ordering::SeqCst), 0);
        assert_eq!(game.phase(), GamePhase::Idle);
    }

    #[tokio::test]
    async fn missing_result_does_not_restart() {
        let (game, modal, restarts) = test_game();

        answer_modal(&game, &modal, Winner::Player, None).await;

        assert_eq!(restarts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn winner_is_passed_to_modal() {
        let (game, modal, _) = test_game();

        let (_, data) = answer_modal(&game, &modal, Winner::Player, None).await;

        assert_eq!(
            data,
            Some(ResultData {
                winner: Winner::Player
            })
        );
        assert_eq!(modal.component().await, None);
    }

    #[tokio::test]
    async fn awaits_decision_while_dialog_is_open() {
        let (game, modal, restarts) = test_game();
        let mut phases = game.subscribe_phase();
        let mut events = modal.subscribe().await;

        let renderer = async {
            events.recv().await;
            phases.changed().await.unwrap();
            let phase = *phases.borrow_and_update();
            assert_eq!(restarts.load(Ordering::SeqCst), 0);
            modal.close(Some(true)).await;
            phase
        };
        let (_, phase) = tokio::join!(game.open_modal(Winner::Player), renderer);

        assert_eq!(phase, GamePhase::AwaitingModalDecision);
    }

    #[tokio::test]
    async fn start_is_refused_while_dialog_is_open() {
        let (game, modal, restarts) = test_game();
        game.time_limit().set_value(Some(800));
        let mut events = modal.subscribe().await;

        let renderer = async {
            events.recv().await;
            let started = game.start();
            let phase = game.phase();
            let still_open = modal.is_open().await;
            modal.close(Some(false)).await;
            (started, phase, still_open)
        };
        let (restarted, (started, phase, still_open)) =
            tokio::join!(game.open_modal(Winner::Computer), renderer);

        assert_eq!(started, Err(GameError::AwaitingDecision));
        assert_eq!(phase, GamePhase::AwaitingModalDecision);
        assert!(still_open);
        assert!(!restarted);
        assert_eq!(restarts.load(Ordering::SeqCst), 0);
        assert_eq!(game.phase(), GamePhase::Idle);
        assert_eq!(game.start(), Ok(Duration::from_millis(800)));
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_decision_returns_to_idle() {
        let (game, modal, restarts) = test_game();

        let outcome = tokio::time::timeout(
            Duration::from_millis(10),
            game.open_modal(Winner::Player),
        )
        .await;

        assert!(outcome.is_err());
        assert_eq!(game.phase(), GamePhase::Idle);
        assert!(!modal.is_open().await);
        assert_eq!(restarts.load(Ordering::SeqCst), 0);
        assert!(game.start().is_ok());
    }

    #[test]
    fn fill_returns_new_grid() {
        let (game, _, _) = test_game();
        let cells: Vec<CellState> = vec![Blue, Blue, Blue];

        let result = game.fill_cell_item_by_index(&cells, 1, Red).unwrap();

        assert_eq!(result, vec![Blue, Red, Blue]);
        assert_eq!(cells, vec![Blue, Blue, Blue]);
    }

    #[test]
    fn fill_first_and_last_index() {
        let (game, _, _) = test_game();
        let cells = vec![Blue, Blue, Blue];

        let first = game.fill_cell_item_by_index(&cells, 0, Yellow).unwrap();
        assert_eq!(first[0], Yellow);

        let last = game.fill_cell_item_by_index(&cells, 2, Green).unwrap();
        assert_eq!(last[2], Green);
    }

    #[test]
    fn random_index_single_blue_cell() {
        let (game, _, _) = test_game();

        assert_eq!(game.get_random_cell_index(&[Red, Blue, Green, Red, Yellow]), Ok(1));
        assert_eq!(game.get_random_cell_index(&[Blue, Red, Red]), Ok(0));
        assert_eq!(game.get_random_cell_index(&[Red, Red, Blue]), Ok(2));
    }

    #[test]
    fn random_index_among_several_blue_cells() {
        let (game, _, _) = test_game();
        let cells = [Blue, Blue, Blue, Red, Red];

        for _ in 0..20 {
            let index = game.get_random_cell_index(&cells).unwrap();
            assert!([0, 1, 2].contains(&index));
            assert_eq!(cells[index], Blue);
        }
    }
}
