//! The match driver.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::snapshot::{MatchCheckpoint, StateSnapshot, TurnRecord};
use crate::ai::{strategy_for, Decision, Strategy};
use crate::board::{check_win_from_last_move, scan_all_wins, Point, WinLine};
use crate::cards::{legal_targets, CardId, CardMeta, CardRegistry, TargetValue};
use crate::core::config::MatchConfig;
use crate::core::error::{ConfigError, SessionError};
use crate::core::player::{Player, PlayerMap};
use crate::core::rng::{GameRng, GameRngState};
use crate::core::state::GameState;
use crate::rules::Winner;
use crate::turn::{TurnEvent, TurnMachine, TurnPhase};

/// One in-memory match: config, registry, match RNG, the authoritative
/// state and the live turn.
///
/// Turns chain automatically. When a turn ends the next one starts at once
/// (running any skip turns) and stops at its first input phase. Nothing
/// starts once a winner is set.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use card_gomoku::cards::CardRegistry;
/// use card_gomoku::core::MatchConfig;
/// use card_gomoku::session::MatchSession;
///
/// let config = MatchConfig::default().with_board_size(9).with_seed("doc");
/// let mut session = MatchSession::new(config, Arc::new(CardRegistry::with_base_cards())).unwrap();
///
/// // The first draw always holds a Place card.
/// assert!(session.drawn().iter().any(|c| c.as_str() == "Place"));
/// assert!(session.choose_card("Place"));
/// assert!(session.select_cell(4, 4));
/// assert_eq!(session.turn_number(), 2);
/// ```
#[derive(Debug)]
pub struct MatchSession {
    config: MatchConfig,
    registry: Arc<CardRegistry>,
    rng: GameRng,
    /// State at the start of the live turn (or final state).
    game: GameState,
    /// RNG position matching `game`.
    turn_start_rng: GameRngState,
    turn: Option<TurnMachine>,
    turn_number: u32,
    winning_line: Option<WinLine>,
    history: Vec<TurnRecord>,
    bot: Option<Box<dyn Strategy>>,
}

impl MatchSession {
    /// Build the deck, seed the RNG and start the first turn.
    pub fn new(config: MatchConfig, registry: Arc<CardRegistry>) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = GameRng::new(config.seed.clone());
        let game = GameState::from_config(&config, &registry, &mut rng)?;
        info!(
            size = config.board_size,
            seed = %config.seed,
            cards = game.deck.total_cards(),
            opponent = ?config.opponent,
            "match created"
        );
        let mut session = Self::assemble(config, registry, rng, game);
        session.advance();
        Ok(session)
    }

    /// Resume a checkpoint. The live turn restarts from its beginning.
    ///
    /// A state with no cards in either pile is rejected, like a config
    /// that builds an empty deck.
    pub fn restore(
        checkpoint: MatchCheckpoint,
        registry: Arc<CardRegistry>,
    ) -> Result<Self, SessionError> {
        checkpoint.config.validate()?;
        let game = GameState::from_plain(&checkpoint.state)?;
        if game.deck.total_cards() == 0 {
            return Err(ConfigError::EmptyDeck.into());
        }
        let rng = GameRng::from_state(&checkpoint.rng);
        let mut session = Self::assemble(checkpoint.config, registry, rng, game);
        session.turn_number = checkpoint.history.len() as u32;
        session.winning_line = winning_line_of(&session.game);
        session.history = checkpoint.history;
        session.advance();
        info!(turn = session.turn_number, "match restored");
        Ok(session)
    }

    fn assemble(
        config: MatchConfig,
        registry: Arc<CardRegistry>,
        rng: GameRng,
        game: GameState,
    ) -> Self {
        let bot = strategy_for(config.opponent, config.simultaneous_five_policy);
        Self {
            turn_start_rng: rng.state(),
            config,
            registry,
            rng,
            game,
            turn: None,
            turn_number: 0,
            winning_line: None,
            history: Vec::new(),
            bot,
        }
    }

    /// Discard the match (and any live turn) and start over with `config`.
    pub fn reset(&mut self, config: MatchConfig) -> Result<(), ConfigError> {
        *self = Self::new(config, Arc::clone(&self.registry))?;
        info!("match reset");
        Ok(())
    }

    /// Freeze the match at the start of the live turn.
    #[must_use]
    pub fn checkpoint(&self) -> MatchCheckpoint {
        MatchCheckpoint {
            config: self.config.clone(),
            state: self.game.to_plain(),
            rng: self.turn_start_rng.clone(),
            history: self.history.clone(),
        }
    }

    // === Intents ===

    /// `CHOOSE_CARD`. Returns whether the intent took effect.
    pub fn choose_card(&mut self, card: impl Into<CardId>) -> bool {
        self.send(TurnEvent::ChooseCard(card.into()))
    }

    /// `SELECT_TARGET`. Returns whether the intent took effect.
    pub fn select_target(&mut self, target: TargetValue) -> bool {
        self.send(TurnEvent::SelectTarget(target))
    }

    /// `SELECT_TARGET` with a cell.
    pub fn select_cell(&mut self, x: i32, y: i32) -> bool {
        self.select_target(TargetValue::cell(x, y))
    }

    /// Let the configured bot play the live turn if it owns it.
    pub fn play_bot_turn(&mut self) -> Option<Decision> {
        if !self.is_bot_turn() {
            return None;
        }
        let bot = self.bot.take()?;
        let decision = self.play_with(bot.as_ref());
        self.bot = Some(bot);
        decision
    }

    /// Start the next turns of a paused match. See [`MatchSession::is_paused`].
    pub fn resume(&mut self) {
        if self.is_paused() {
            self.advance();
        }
    }

    /// Let `strategy` play the live turn, whoever owns it. A paused match
    /// is resumed first.
    ///
    /// The chosen card falls back to the first drawn card if the strategy
    /// names one not in hand. An invalid target falls back to the first
    /// legal target.
    pub fn play_with(&mut self, strategy: &dyn Strategy) -> Option<Decision> {
        self.resume();
        let turn = self.turn.as_ref().filter(|t| t.phase() == TurnPhase::Choose)?;
        let decision = strategy.decide(turn.game(), turn.drawn(), &self.registry, &mut self.rng);
        let card = if turn.drawn().contains(&decision.card_id) {
            decision.card_id.clone()
        } else {
            warn!(card = %decision.card_id, "strategy chose a card not in hand");
            turn.drawn().first()?.clone()
        };

        let turn_before = self.turn_number;
        self.choose_card(card.clone());
        if self.turn_number == turn_before {
            if let Some(target) = self.pick_target(&card, decision.target) {
                self.select_target(target);
            }
        }
        Some(decision)
    }

    /// Play out the match with a strategy per seat, for at most
    /// `max_turns` more turns. Returns the winner, if any.
    pub fn play_out(
        &mut self,
        strategies: &PlayerMap<Box<dyn Strategy>>,
        max_turns: u32,
    ) -> Option<Winner> {
        let limit = self.turn_number.saturating_add(max_turns);
        while !self.is_over() && self.turn_number < limit {
            if self.is_paused() {
                self.resume();
                continue;
            }
            let player = self.current_player();
            if self.play_with(strategies[player].as_ref()).is_none() {
                break;
            }
        }
        self.winner()
    }

    fn pick_target(&self, card: &CardId, preferred: Option<TargetValue>) -> Option<TargetValue> {
        let turn = self.turn.as_ref().filter(|t| t.phase() == TurnPhase::SelectTarget)?;
        let def = self.registry.get(card)?;
        let ctx = turn.game().context();
        preferred
            .filter(|target| def.validate_target(&ctx, target).is_ok())
            .or_else(|| legal_targets(def, &ctx).into_iter().next())
    }

    fn send(&mut self, event: TurnEvent) -> bool {
        let Some(turn) = self.turn.as_mut() else {
            debug!(?event, "no live turn");
            return false;
        };
        let accepted = turn.send(event, &mut self.rng);
        if accepted {
            self.advance();
        }
        accepted
    }

    /// Close a finished turn and start the next one, until a turn waits for
    /// input or the match is over.
    ///
    /// Turns that end without input (skips, empty draws) are capped at one
    /// round per call; past that the session pauses with no live turn.
    fn advance(&mut self) {
        let mut started = false;
        let mut idle_turns = 0;
        loop {
            match self.turn.take() {
                Some(turn) if turn.is_done() => {
                    if started {
                        idle_turns += 1;
                    }
                    self.finish_turn(turn);
                }
                Some(turn) => {
                    self.turn = Some(turn);
                    return;
                }
                None => {}
            }
            if self.game.is_finished() {
                return;
            }
            if idle_turns >= Player::BOTH.len() {
                self.turn_start_rng = self.rng.state();
                warn!(turn = self.turn_number, "a full round passed without input, pausing");
                return;
            }
            started = true;
            self.turn_start_rng = self.rng.state();
            self.turn_number += 1;
            self.turn = Some(TurnMachine::start(
                self.game.clone(),
                Arc::clone(&self.registry),
                self.config.simultaneous_five_policy,
                &mut self.rng,
            ));
        }
    }

    fn finish_turn(&mut self, turn: TurnMachine) {
        let player = self.game.current_player;
        let (game, ctx) = turn.into_parts();
        debug!(turn = self.turn_number, %player, "turn finished");
        self.winning_line = winning_line_of(&game);
        self.history.push(TurnRecord {
            number: self.turn_number,
            player,
            drawn: ctx.drawn.to_vec(),
            chosen: ctx.chosen,
            target: ctx.target,
            logs: ctx.logs,
        });
        if let Some(winner) = game.winner {
            info!(turn = self.turn_number, %winner, "match over");
        }
        self.game = game;
    }

    // === Queries ===

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &CardRegistry {
        &self.registry
    }

    /// The live turn's view of the game, or the final state.
    #[must_use]
    pub fn game(&self) -> &GameState {
        self.turn.as_ref().map_or(&self.game, TurnMachine::game)
    }

    #[must_use]
    pub fn current_player(&self) -> Player {
        self.game().current_player
    }

    #[must_use]
    pub fn phase(&self) -> Option<TurnPhase> {
        self.turn.as_ref().map(TurnMachine::phase)
    }

    #[must_use]
    pub fn drawn(&self) -> &[CardId] {
        self.turn.as_ref().map(TurnMachine::drawn).unwrap_or_default()
    }

    #[must_use]
    pub fn winner(&self) -> Option<Winner> {
        self.game.winner
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.game.is_finished()
    }

    /// No live turn although the match goes on: a full round ended without
    /// any turn waiting for input. [`MatchSession::resume`] plays on.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.turn.is_none() && !self.is_over()
    }

    /// 1-based number of the live turn (or of the last turn played).
    #[must_use]
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    /// Every completed turn of this session.
    #[must_use]
    pub fn history(&self) -> &[TurnRecord] {
        &self.history
    }

    /// The line through the last placed stone, if it is a five. Falls back
    /// to any line of the winner when the win did not come from a placement.
    #[must_use]
    pub fn winning_line(&self) -> Option<&WinLine> {
        self.winning_line.as_ref()
    }

    /// Whether the live turn's chosen card accepts `point` as its target.
    #[must_use]
    pub fn is_cell_enabled(&self, point: Point) -> bool {
        let Some(turn) = self.turn.as_ref().filter(|t| t.phase() == TurnPhase::SelectTarget)
        else {
            return false;
        };
        let ctx = turn.game().context();
        turn.chosen()
            .and_then(|id| self.registry.get(id))
            .is_some_and(|def| def.validate_target(&ctx, &TargetValue::Cell { point }).is_ok())
    }

    /// Display metadata for every registered card.
    #[must_use]
    pub fn registry_meta(&self) -> BTreeMap<CardId, CardMeta> {
        self.registry.meta_map()
    }

    /// Whether the configured bot owns the live turn.
    #[must_use]
    pub fn is_bot_turn(&self) -> bool {
        self.bot.is_some()
            && self
                .turn
                .as_ref()
                .is_some_and(|t| t.game().current_player == self.config.bot_player)
    }

    #[must_use]
    pub fn snapshot(&self) -> StateSnapshot {
        let game = self.game();
        let plain = game.to_plain();
        let (drawn, chosen, logs) = match (&self.turn, self.history.last()) {
            (Some(turn), _) => {
                (turn.drawn().to_vec(), turn.chosen().cloned(), turn.logs().to_vec())
            }
            (None, Some(last)) => (Vec::new(), None, last.logs.clone()),
            (None, None) => (Vec::new(), None, Vec::new()),
        };
        StateSnapshot {
            turn_number: self.turn_number,
            board: plain.board,
            current_player: game.current_player,
            draw_pile: game.deck.draw_pile().len(),
            discard_pile: game.deck.discard_pile().len(),
            skip_next_turns: plain.status.skip_next_turns,
            winner: game.winner,
            phase: self.phase(),
            drawn,
            chosen,
            logs,
            winning_line: self.winning_line.as_ref().map(|w| w.line.clone()),
        }
    }
}

fn winning_line_of(game: &GameState) -> Option<WinLine> {
    check_win_from_last_move(&game.board).or_else(|| match game.winner {
        Some(Winner::Player(p)) => scan_all_wins(&game.board).into_iter().find(|w| w.player == p),
        _ => None,
    })
}
