//! Grid Reaction Game Engine
//!
//! This library provides the lifecycle core shared by grid-based reaction
//! games: a validated time limit, helpers for working on grid snapshots, and
//! a modal broker used to announce the winner and wait for the player to
//! decide whether to play again.
//!
//! ## Usage
//!
//! A concrete game owns a [`GameCore`] and plugs its reset logic in through
//! [`RestartHook`]. Whoever draws dialogs shares the same [`ModalService`]:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use gridreact::{GameCore, ResultDialog, ResultModalService, Winner, new_grid};
//!
//! #[tokio::main]
//! async fn main() -> gridreact::Result<()> {
//!     let modal = Arc::new(ResultModalService::new());
//!     let game = GameCore::new(modal.clone(), ResultDialog::default(), || {
//!         println!("resetting board");
//!     });
//!
//!     let time_limit = game.start()?;
//!     let grid = new_grid(100);
//!     let target = game.get_random_cell_index(&grid)?;
//!     println!("click cell {} within {:?}", target, time_limit);
//!
//!     // Somewhere else the renderer answers with `modal.close(Some(true))`.
//!     let restarted = game.open_modal(Winner::Player).await;
//!     println!("restarted: {}", restarted);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod field;
pub mod logic;
pub mod modal;
pub mod model;

pub use error::{GameError, Result};
pub use field::{NumberField, TimeLimit, ValidationKind, Validator};
pub use logic::{GameCore, RestartHook, ResultModalService};
pub use modal::{ModalEvent, ModalReceipt, ModalService};
pub use model::*;
