use std::{sync::Arc, time::Duration};

use rand::Rng;
use tokio::{sync::watch, time};
use tracing::{debug, info};

use gridreact::{
    CellState, GameCore, Grid, RestartHook, ResultDialog, ResultModalService, Winner, new_grid,
};

use crate::config::Config;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub cells: Grid,
    pub player: u32,
    pub computer: u32,
}

impl Board {
    fn new(size: usize) -> Self {
        Self {
            cells: new_grid(size),
            player: 0,
            computer: 0,
        }
    }

    fn leader(&self, win_score: u32) -> Option<Winner> {
        if self.player >= win_score {
            Some(Winner::Player)
        } else if self.computer >= win_score {
            Some(Winner::Computer)
        } else {
            None
        }
    }

    fn render(&self) -> String {
        self.cells
            .iter()
            .map(|cell| match cell {
                CellState::Blue => '.',
                CellState::Yellow => '?',
                CellState::Green => 'o',
                CellState::Red => 'x',
            })
            .collect()
    }
}

struct BoardReset {
    board: Arc<watch::Sender<Board>>,
    size: usize,
}

impl RestartHook for BoardReset {
    fn restart_callback(&self) {
        self.board.send_replace(Board::new(self.size));
        info!("Board reset to {} cells", self.size);
    }
}

/// Light up a random cell each turn; the player scores if the simulated
/// reaction beats the time limit, the computer scores otherwise.
pub struct ReactionGame {
    core: GameCore<BoardReset>,
    board: Arc<watch::Sender<Board>>,
    config: Config,
}

impl ReactionGame {
    pub fn new(modal: Arc<ResultModalService>, config: Config) -> Self {
        let board = Arc::new(watch::Sender::new(Board::new(config.grid_size)));
        let reset = BoardReset {
            board: board.clone(),
            size: config.grid_size,
        };

        let core = GameCore::new(modal, ResultDialog::new("Reaction"), reset);
        core.time_limit().set_value(Some(config.time_limit_ms));

        Self {
            core,
            board,
            config,
        }
    }

    pub fn board(&self) -> Board {
        self.board.borrow().clone()
    }

    /// Play games until the result dialog is dismissed without a restart.
    /// Returns how many games were played.
    pub async fn run(&self) -> gridreact::Result<u32> {
        let mut games = 0;

        loop {
            let time_limit = self.core.start()?;
            let winner = self.play(time_limit).await?;
            games += 1;
            info!("Game {} won by {}", games, winner);

            if !self.core.open_modal(winner).await {
                return Ok(games);
            }
        }
    }

    async fn play(&self, time_limit: Duration) -> gridreact::Result<Winner> {
        loop {
            let cells = self.board.borrow().cells.clone();
            let target = self.core.get_random_cell_index(&cells)?;
            let lit = self
                .core
                .fill_cell_item_by_index(&cells, target, CellState::Yellow)?;
            self.board.send_modify(|board| board.cells = lit.clone());

            let reaction =
                Duration::from_millis(rand::rng().random_range(self.config.reaction_ms.clone()));
            let hit = reaction <= time_limit;
            time::sleep(reaction.min(time_limit)).await;

            let state = if hit { CellState::Green } else { CellState::Red };
            let cells = self.core.fill_cell_item_by_index(&lit, target, state)?;
            self.board.send_modify(|board| {
                board.cells = cells;
                if hit {
                    board.player += 1;
                } else {
                    board.computer += 1;
                }
            });

            let board = self.board.borrow().clone();
            debug!(
                "Cell {} {} after {:?}: {} ({}:{})",
                target,
                if hit { "hit" } else { "missed" },
                reaction,
                board.render(),
                board.player,
                board.computer
            );

            if let Some(winner) = board.leader(self.config.win_score) {
                return Ok(winner);
            }
        }
    }
}
