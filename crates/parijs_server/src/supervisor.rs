//! Match supervision: pairs two connections and runs one orchestrator.

use crate::config::ServerConfig;
use crate::error::{GatewayError, MatchError};
use crate::gateway::Gateway;
use crate::orchestrator::{MatchOutcome, Orchestrator};
use crate::player::Player;
use crate::protocol::Notification;
use crate::transport::Connection;
use parijs_game::{ByColor, Color, Game};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::task::{JoinError, JoinHandle};
use tracing::{Instrument, error, info, info_span, instrument, warn};

/// Starts matches on their own tasks.
#[derive(Debug)]
pub struct MatchSupervisor {
    seed: Option<u64>,
    next_match_id: AtomicU64,
}

impl MatchSupervisor {
    /// Creates a supervisor using the seed from `config`, if any.
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            seed: *config.seed(),
            next_match_id: AtomicU64::new(1),
        }
    }

    /// Starts a match: `blue` plays Blue, `orange` plays Orange.
    ///
    /// Watches both readers, announces the match to each player and
    /// runs the orchestrator on a separate task, so the caller can keep
    /// accepting connections. On failure both players are told the match
    /// was aborted; a player whose opponent disconnected wins by forfeit.
    #[instrument(skip_all)]
    pub fn start(&self, blue: Connection, orange: Connection) -> JoinHandle<Result<MatchOutcome, MatchError>> {
        let match_id = self.next_match_id.fetch_add(1, Ordering::Relaxed);
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(match_id)),
            None => StdRng::from_os_rng(),
        };
        let game = Game::new(&mut rng);

        let (blue, mut blue_reader) = blue.into_parts();
        let (orange, mut orange_reader) = orange.into_parts();
        let gateways = ByColor::new(blue, orange);
        info!(
            match_id,
            blue = gateways.blue.name(),
            orange = gateways.orange.name(),
            "Pairing players"
        );

        let span = info_span!("match", match_id);
        tokio::spawn(
            async move {
                // A reader only stops on a fatal connection error.
                let result = tokio::select! {
                    result = play(game, &gateways) => result,
                    ended = &mut blue_reader => Err(reader_ended(Color::Blue, ended, &gateways)),
                    ended = &mut orange_reader => Err(reader_ended(Color::Orange, ended, &gateways)),
                };
                match &result {
                    Ok(outcome) => info!(?outcome, "Match finished"),
                    Err(error) => {
                        error!(%error, "Match aborted");
                        abort(&gateways, error);
                    }
                }

                blue_reader.abort();
                orange_reader.abort();
                result
            }
            .instrument(span),
        )
    }
}

async fn play(game: Game, gateways: &ByColor<Arc<Gateway>>) -> Result<MatchOutcome, MatchError> {
    for color in [Color::Blue, Color::Orange] {
        let opponent = gateways[color.opponent()].name().to_string();
        gateways[color]
            .notify(Notification::MatchStarted { color, opponent })
            .map_err(|source| MatchError::new(color, source))?;
    }

    let blue: Arc<dyn Player> = gateways.blue.clone();
    let orange: Arc<dyn Player> = gateways.orange.clone();
    Orchestrator::new(game, blue, orange).run().await
}

fn reader_ended(
    color: Color,
    ended: Result<GatewayError, JoinError>,
    gateways: &ByColor<Arc<Gateway>>,
) -> MatchError {
    let source = ended.unwrap_or_else(|_| GatewayError::TransportClosed {
        player: gateways[color].name().to_string(),
    });
    MatchError::new(color, source)
}

fn abort(gateways: &ByColor<Arc<Gateway>>, error: &MatchError) {
    let failed = error.color;
    let survivor_reason = if error.source.is_disconnect() {
        format!("Opponent disconnected; {failed} forfeits")
    } else {
        format!("Match aborted: {}", error.source)
    };

    for color in [Color::Blue, Color::Orange] {
        let reason = if color == failed {
            format!("Match aborted: {}", error.source)
        } else {
            survivor_reason.clone()
        };
        if let Err(send_error) = gateways[color].notify(Notification::MatchAborted { reason }) {
            warn!(%color, %send_error, "Could not deliver abort notice");
        }
        gateways[color].close();
    }
}
