//! Turn arbitration between two players.

use crate::error::MatchError;
use crate::player::Player;
use crate::protocol::{MoveRequest, Notification};
use derive_getters::Getters;
use parijs_game::{ByColor, Color, Game, MoveResponse, Phase};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Summary of a match whose setup phase completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize)]
pub struct MatchOutcome {
    /// Color that opens the building phase.
    building_first_player: Color,
    /// Color that placed the final tile block.
    last_block_placer: Option<Color>,
    /// Accepted moves during setup.
    accepted_moves: usize,
    /// Denied proposals during setup.
    denied_moves: usize,
}

/// Drives one [`Game`] by asking its two players for moves.
pub struct Orchestrator {
    game: Game,
    players: ByColor<Arc<dyn Player>>,
    accepted_moves: usize,
    denied_moves: usize,
}

impl Orchestrator {
    /// Creates an orchestrator over `game` with one player per color.
    pub fn new(game: Game, blue: Arc<dyn Player>, orange: Arc<dyn Player>) -> Self {
        Self {
            game,
            players: ByColor::new(blue, orange),
            accepted_moves: 0,
            denied_moves: 0,
        }
    }

    /// The game being played.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Runs the setup phase to completion and announces the building phase.
    ///
    /// Returns early only on a gateway failure, which is fatal to the match.
    #[instrument(skip(self))]
    pub async fn run(&mut self) -> Result<MatchOutcome, MatchError> {
        info!(first_player = %self.game.to_move(), "Starting match orchestration");
        self.announce(Phase::Setup)?;

        let first_player = loop {
            match self.game.phase() {
                Phase::Setup => {
                    let color = self.game.to_move();
                    self.play_turn(color).await?;
                }
                Phase::Building { first_player } => break first_player,
            }
        };

        self.announce(self.game.phase())?;
        info!(
            %first_player,
            accepted = self.accepted_moves,
            denied = self.denied_moves,
            "Setup phase complete"
        );

        Ok(MatchOutcome {
            building_first_player: first_player,
            last_block_placer: self.game.last_block_placer(),
            accepted_moves: self.accepted_moves,
            denied_moves: self.denied_moves,
        })
    }

    /// Asks `color` until it proposes an acceptable move, then relays it.
    #[instrument(skip(self))]
    async fn play_turn(&mut self, color: Color) -> Result<(), MatchError> {
        let player = Arc::clone(&self.players[color]);
        let opponent = Arc::clone(&self.players[color.opponent()]);
        let request = MoveRequest::new(
            self.game.unpicked_buildings().to_vec(),
            self.game.head_block(color).map(|block| block.in_frame(color)),
        );

        loop {
            debug!(player = player.name(), "Waiting for move");
            let proposed = player
                .ask_move(request.clone())
                .await
                .map_err(|source| MatchError::new(color, source))?;
            // Setup moves carry no tiles, so the reply needs no frame conversion.
            let verdict = proposed
                .clone()
                .resolve()
                .and_then(|mv| self.game.submit(color, mv));

            match verdict {
                Ok(applied) => {
                    self.accepted_moves += 1;
                    player
                        .respond(MoveResponse::Accept)
                        .map_err(|source| MatchError::new(color, source))?;
                    opponent
                        .notify(Notification::OpponentMoved {
                            update: applied.in_frame(color.opponent()),
                        })
                        .map_err(|source| MatchError::new(color.opponent(), source))?;
                    return Ok(());
                }
                Err(error) => {
                    self.denied_moves += 1;
                    warn!(%color, ?proposed, %error, "Move denied");
                    player
                        .respond(MoveResponse::deny(&error))
                        .map_err(|source| MatchError::new(color, source))?;
                }
            }
        }
    }

    fn announce(&self, phase: Phase) -> Result<(), MatchError> {
        for color in [Color::Blue, Color::Orange] {
            self.players[color]
                .notify(Notification::PhaseStarted { phase })
                .map_err(|source| MatchError::new(color, source))?;
        }
        Ok(())
    }
}
