use std::{error::Error, sync::Arc};

use gridreact::{ModalEvent, ResultModalService};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::{config::Config, reaction::ReactionGame};

mod config;
mod reaction;

/// Headless stand-in for a dialog renderer: logs each result and asks for
/// another game until `rounds` games have been shown.
async fn render_results(
    modal: Arc<ResultModalService>,
    mut events: mpsc::UnboundedReceiver<ModalEvent>,
    rounds: u32,
) {
    let mut shown = 0;

    while let Some(event) = events.recv().await {
        let ModalEvent::Opened { id } = event else {
            continue;
        };

        let (Some(dialog), Some(data)) = (modal.component().await, modal.data().await) else {
            warn!("Modal {} opened without a result payload", id);
            modal.close_request(id, None).await;
            continue;
        };

        shown += 1;
        let again = shown < rounds;
        info!("{} (play again: {})", dialog.message(&data), again);
        modal.close_request(id, Some(again)).await;
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env();
    let modal = Arc::new(ResultModalService::new());

    let events = modal.subscribe().await;
    let renderer = tokio::spawn(render_results(modal.clone(), events, config.rounds));

    let game = ReactionGame::new(modal, config);
    let result = game.run().await;

    renderer.abort();
    let _ = renderer.await;

    let games = result?;
    let board = game.board();
    info!(
        "Played {} games, last score {}:{}",
        games, board.player, board.computer
    );
    Ok(())
}
