//! One player-turn as an explicit finite-state machine.
//!
//! ```text
//! MaybeSkip --skip pending--> EndTurn
//!     |
//!  DrawTwo --nothing drawn--> CheckWin
//!     |
//!  Choose  <== ChooseCard(id)
//!     |
//! MaybeTarget --no target needed--> Resolve
//!     |
//! SelectTarget <== SelectTarget(target)
//!     |
//!  Resolve -> CheckWin -> EndTurn
//! ```
//!
//! `Choose` and `SelectTarget` wait for an event. Every other phase runs
//! to completion as soon as it is entered. Rejected events leave the
//! machine where it was and return `false`.
//!
//! The machine owns its `GameState` value. Dropping a machine mid-turn
//! leaves nothing behind: the state it started from is untouched.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, warn};

use super::log::{LogEntry, LogTag};
use crate::cards::{CardId, CardRegistry, TargetValue};
use crate::core::config::SimultaneousFivePolicy;
use crate::core::rng::GameRng;
use crate::core::state::GameState;
use crate::effects::apply_ops;
use crate::rules::resolve_wins;

/// Cards drawn per turn.
pub const DRAW_COUNT: usize = 2;

/// Where a turn is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TurnPhase {
    MaybeSkip,
    DrawTwo,
    Choose,
    MaybeTarget,
    SelectTarget,
    Resolve,
    CheckWin,
    EndTurn,
}

impl TurnPhase {
    /// Whether the machine is waiting for an external event.
    #[must_use]
    pub const fn awaits_input(self) -> bool {
        matches!(self, TurnPhase::Choose | TurnPhase::SelectTarget)
    }
}

/// Inbound intents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnEvent {
    ChooseCard(CardId),
    SelectTarget(TargetValue),
}

/// Per-turn scratch data. Discarded when the turn ends.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnContext {
    pub drawn: SmallVec<[CardId; DRAW_COUNT]>,
    pub chosen: Option<CardId>,
    pub target: Option<TargetValue>,
    pub logs: Vec<LogEntry>,
}

/// State machine for a single turn.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use card_gomoku::board::Board;
/// use card_gomoku::cards::{CardId, CardRegistry, TargetValue};
/// use card_gomoku::core::{GameRng, GameState, Player, SimultaneousFivePolicy};
/// use card_gomoku::deck::DeckState;
/// use card_gomoku::turn::{TurnEvent, TurnMachine, TurnPhase};
///
/// let registry = Arc::new(CardRegistry::with_base_cards());
/// let deck = DeckState::from_piles(vec![CardId::new("Take"), CardId::new("Place")], vec![]);
/// let game = GameState::new(Board::new(5).unwrap(), Player::One, deck);
/// let mut rng = GameRng::new("doc");
///
/// let mut turn = TurnMachine::start(game, registry, SimultaneousFivePolicy::Attacker, &mut rng);
/// assert_eq!(turn.phase(), TurnPhase::Choose);
///
/// assert!(turn.send(TurnEvent::ChooseCard(CardId::new("Place")), &mut rng));
/// assert!(turn.send(TurnEvent::SelectTarget(TargetValue::cell(2, 2)), &mut rng));
/// assert!(turn.is_done());
/// assert_eq!(turn.game().current_player, Player::Two);
/// ```
#[derive(Clone, Debug)]
pub struct TurnMachine {
    phase: TurnPhase,
    game: GameState,
    ctx: TurnContext,
    registry: Arc<CardRegistry>,
    policy: SimultaneousFivePolicy,
}

impl TurnMachine {
    /// Begin a turn for `game.current_player` and run until the first phase
    /// that needs input (or the end of the turn).
    pub fn start(
        game: GameState,
        registry: Arc<CardRegistry>,
        policy: SimultaneousFivePolicy,
        rng: &mut GameRng,
    ) -> Self {
        let mut machine = Self {
            phase: TurnPhase::MaybeSkip,
            game,
            ctx: TurnContext::default(),
            registry,
            policy,
        };
        machine.run(rng);
        machine
    }

    /// Feed an intent. Returns whether it was accepted.
    pub fn send(&mut self, event: TurnEvent, rng: &mut GameRng) -> bool {
        let accepted = match (self.phase, event) {
            (TurnPhase::Choose, TurnEvent::ChooseCard(id)) => self.choose(id),
            (TurnPhase::SelectTarget, TurnEvent::SelectTarget(target)) => {
                self.select_target(target)
            }
            (phase, event) => {
                debug!(?phase, ?event, "event ignored in this phase");
                false
            }
        };
        if accepted {
            self.run(rng);
        }
        accepted
    }

    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.phase == TurnPhase::EndTurn
    }

    #[must_use]
    pub fn drawn(&self) -> &[CardId] {
        &self.ctx.drawn
    }

    #[must_use]
    pub fn chosen(&self) -> Option<&CardId> {
        self.ctx.chosen.as_ref()
    }

    #[must_use]
    pub fn target(&self) -> Option<&TargetValue> {
        self.ctx.target.as_ref()
    }

    #[must_use]
    pub fn logs(&self) -> &[LogEntry] {
        &self.ctx.logs
    }

    #[must_use]
    pub fn context(&self) -> &TurnContext {
        &self.ctx
    }

    /// The turn's current view of the game.
    #[must_use]
    pub fn game(&self) -> &GameState {
        &self.game
    }

    #[must_use]
    pub fn registry(&self) -> &CardRegistry {
        &self.registry
    }

    #[must_use]
    pub fn into_game(self) -> GameState {
        self.game
    }

    #[must_use]
    pub fn into_parts(self) -> (GameState, TurnContext) {
        (self.game, self.ctx)
    }

    fn enter(&mut self, phase: TurnPhase) {
        debug!(
            player = %self.game.current_player,
            from = ?self.phase,
            to = ?phase,
            "turn transition"
        );
        self.phase = phase;
    }

    fn log(&mut self, tag: LogTag, detail: impl std::fmt::Display) {
        self.ctx.logs.push(LogEntry::new(tag, detail));
    }

    /// Run immediate phases until input is needed or the turn ends.
    fn run(&mut self, rng: &mut GameRng) {
        loop {
            match self.phase {
                TurnPhase::Choose | TurnPhase::SelectTarget | TurnPhase::EndTurn => return,
                TurnPhase::MaybeSkip => self.maybe_skip(),
                TurnPhase::DrawTwo => self.draw_two(rng),
                TurnPhase::MaybeTarget => self.maybe_target(),
                TurnPhase::Resolve => {
                    self.resolve(rng);
                    self.enter(TurnPhase::CheckWin);
                }
                TurnPhase::CheckWin => {
                    self.check_win();
                    self.end_turn();
                }
            }
        }
    }

    fn maybe_skip(&mut self) {
        let player = self.game.current_player;
        let pending = self.game.status.skip_next_turns[player];
        if pending > 0 {
            self.game.status.skip_next_turns[player] = pending - 1;
            self.log(LogTag::Skip, format_args!("{player} skips ({} remaining)", pending - 1));
            self.end_turn();
        } else {
            self.enter(TurnPhase::DrawTwo);
        }
    }

    fn draw_two(&mut self, rng: &mut GameRng) {
        let drawn = self.game.deck.draw(DRAW_COUNT, rng);
        let detail = if drawn.is_empty() {
            "no cards left".to_string()
        } else {
            join_ids(&drawn)
        };
        self.log(LogTag::DrawTwo, detail);
        let empty = drawn.is_empty();
        self.ctx.drawn = drawn.into_iter().collect();
        if empty {
            warn!(player = %self.game.current_player, "nothing to draw, turn passes");
            self.enter(TurnPhase::CheckWin);
        } else {
            self.enter(TurnPhase::Choose);
        }
    }

    fn choose(&mut self, id: CardId) -> bool {
        let Some(pos) = self.ctx.drawn.iter().position(|c| *c == id) else {
            debug!(card = %id, "chosen card was not drawn");
            return false;
        };
        let rest: Vec<CardId> = self
            .ctx
            .drawn
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != pos)
            .map(|(_, c)| c.clone())
            .collect();
        self.game.deck.discard(&rest);
        self.log(LogTag::Choose, &id);
        self.ctx.chosen = Some(id);
        self.enter(TurnPhase::MaybeTarget);
        true
    }

    fn maybe_target(&mut self) {
        let ctx = self.game.context();
        // An unplayable card has no legal target (Take with no opponent
        // stones), so waiting in SelectTarget would stall the turn forever.
        let needs_target = self
            .ctx
            .chosen
            .as_ref()
            .and_then(|id| self.registry.get(id))
            .is_some_and(|def| def.target().needs_target() && def.can_play(&ctx).is_ok());
        if needs_target {
            self.enter(TurnPhase::SelectTarget);
        } else {
            self.enter(TurnPhase::Resolve);
        }
    }

    fn select_target(&mut self, target: TargetValue) -> bool {
        let Some(def) = self.ctx.chosen.as_ref().and_then(|id| self.registry.get(id)) else {
            return false;
        };
        let verdict = def.validate_target(&self.game.context(), &target);
        match verdict {
            Ok(accepted) => {
                self.ctx.target = Some(accepted);
                self.log(LogTag::SelectTarget, accepted);
                self.enter(TurnPhase::Resolve);
                true
            }
            Err(err) => {
                debug!(%target, %err, "target rejected");
                false
            }
        }
    }

    fn resolve(&mut self, rng: &mut GameRng) {
        let Some(id) = self.ctx.chosen.clone() else {
            self.log(LogTag::Resolve, "nothing chosen");
            return;
        };

        let outcome = match self.registry.get(&id) {
            None => Err(format!("unknown card {id}")),
            Some(def) => {
                let ctx = self.game.context();
                let target = self.ctx.target.unwrap_or(TargetValue::None);
                def.can_play(&ctx)
                    .and_then(|()| def.validate_target(&ctx, &target))
                    .map_err(|err| format!("{id} not playable ({err})"))
                    .and_then(|target| {
                        let out = def.effect(&ctx, rng, &target);
                        apply_ops(&self.game, &out.ops)
                            .map(|next| (next, out.log))
                            .map_err(|err| format!("{id} failed to apply ({err})"))
                    })
            }
        };

        match outcome {
            Ok((next, log)) => {
                self.game = next;
                let detail = log.unwrap_or_else(|| "no effect".to_string());
                self.log(LogTag::Resolve, format_args!("{id}: {detail}"));
            }
            Err(reason) => {
                warn!(player = %self.game.current_player, %reason, "resolved as no-op");
                self.log(LogTag::Resolve, format_args!("{reason}, no effect"));
            }
        }
        self.game.deck.discard(std::slice::from_ref(&id));
    }

    fn check_win(&mut self) {
        if self.game.winner.is_none() {
            self.game = resolve_wins(&self.game, self.game.current_player, self.policy);
        }
        match self.game.winner {
            Some(winner) => self.log(LogTag::CheckWin, winner),
            None => self.log(LogTag::CheckWin, "no winner"),
        }
    }

    fn end_turn(&mut self) {
        self.game.current_player = self.game.current_player.opponent();
        self.enter(TurnPhase::EndTurn);
    }
}

fn join_ids(ids: &[CardId]) -> String {
    ids.iter()
        .map(CardId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Point};
    use crate::core::player::Player;
    use crate::deck::DeckState;

    fn ids(names: &[&str]) -> Vec<CardId> {
        names.iter().map(|n| CardId::new(n)).collect()
    }

    fn game(size: usize, draw_pile: &[&str]) -> GameState {
        GameState::new(
            Board::new(size).unwrap(),
            Player::One,
            DeckState::from_piles(ids(draw_pile), Vec::new()),
        )
    }

    fn start(game: GameState, rng: &mut GameRng) -> TurnMachine {
        TurnMachine::start(
            game,
            Arc::new(CardRegistry::with_base_cards()),
            SimultaneousFivePolicy::Attacker,
            rng,
        )
    }

    fn tags(machine: &TurnMachine) -> Vec<LogTag> {
        machine.logs().iter().map(|l| l.tag).collect()
    }

    #[test]
    fn test_happy_path() {
        let mut rng = GameRng::new("seed");
        let mut turn = start(game(5, &["Other", "Place"]), &mut rng);

        assert_eq!(turn.phase(), TurnPhase::Choose);
        assert_eq!(turn.drawn(), ids(&["Place", "Other"]).as_slice());

        assert!(turn.send(TurnEvent::ChooseCard(CardId::new("Place")), &mut rng));
        assert_eq!(turn.phase(), TurnPhase::SelectTarget);

        assert!(turn.send(TurnEvent::SelectTarget(TargetValue::cell(0, 0)), &mut rng));
        assert!(turn.is_done());

        let game = turn.game();
        assert_eq!(game.board.owner_at(Point::new(0, 0)), Some(Player::One));
        assert_eq!(game.current_player, Player::Two);
        assert!(game.deck.discard_pile().contains(&CardId::new("Place")));
        assert!(game.deck.discard_pile().contains(&CardId::new("Other")));
        assert_eq!(
            tags(&turn),
            vec![
                LogTag::DrawTwo,
                LogTag::Choose,
                LogTag::SelectTarget,
                LogTag::Resolve,
                LogTag::CheckWin
            ]
        );
        assert!(turn.logs()[0].message.starts_with("drawTwo:"));
    }

    #[test]
    fn test_skip_consumes_one_and_ends() {
        let mut rng = GameRng::new("seed");
        let mut g = game(5, &["Place"]);
        g.status.skip_next_turns[Player::One] = 2;

        let turn = start(g, &mut rng);
        assert!(turn.is_done());
        assert!(turn.drawn().is_empty());
        assert_eq!(tags(&turn), vec![LogTag::Skip]);

        let game = turn.into_game();
        assert_eq!(game.current_player, Player::Two);
        assert_eq!(game.skips_pending(Player::One), 1);
        assert_eq!(game.deck.draw_pile().len(), 1);
    }

    #[test]
    fn test_no_target_card_resolves_immediately() {
        let mut rng = GameRng::new("seed");
        let mut g = game(5, &["Place", "PolarityInversion"]);
        g.board.place(Point::new(1, 1), Player::One).unwrap();

        let mut turn = start(g, &mut rng);
        assert!(turn.send(TurnEvent::ChooseCard(CardId::new("PolarityInversion")), &mut rng));
        assert!(turn.is_done());
        assert_eq!(turn.game().board.owner_at(Point::new(1, 1)), Some(Player::Two));
        assert_eq!(
            tags(&turn),
            vec![LogTag::DrawTwo, LogTag::Choose, LogTag::Resolve, LogTag::CheckWin]
        );
    }

    #[test]
    fn test_invalid_events_are_ignored() {
        let mut rng = GameRng::new("seed");
        let mut turn = start(game(5, &["Take", "Place"]), &mut rng);

        assert!(!turn.send(TurnEvent::SelectTarget(TargetValue::cell(0, 0)), &mut rng));
        assert!(!turn.send(TurnEvent::ChooseCard(CardId::new("TimeFreeze")), &mut rng));
        assert_eq!(turn.phase(), TurnPhase::Choose);

        assert!(turn.send(TurnEvent::ChooseCard(CardId::new("Place")), &mut rng));
        assert!(!turn.send(TurnEvent::SelectTarget(TargetValue::cell(9, 9)), &mut rng));
        assert!(!turn.send(TurnEvent::SelectTarget(TargetValue::None), &mut rng));
        assert!(!turn.send(TurnEvent::ChooseCard(CardId::new("Take")), &mut rng));
        assert_eq!(turn.phase(), TurnPhase::SelectTarget);
        assert_eq!(turn.logs().len(), 2);
    }

    #[test]
    fn test_unplayable_card_is_a_noop_and_still_discarded() {
        let mut rng = GameRng::new("seed");
        let mut turn = start(game(5, &["Place", "Take"]), &mut rng);

        assert!(turn.send(TurnEvent::ChooseCard(CardId::new("Take")), &mut rng));
        assert!(turn.is_done());

        let game = turn.game();
        assert_eq!(game.board.count_empties(), 25);
        assert_eq!(game.deck.total_cards(), 2);
        assert!(turn.logs()[2].message.contains("not playable"));
    }

    #[test]
    fn test_duplicate_draw_keeps_both_copies() {
        let mut rng = GameRng::new("seed");
        let mut turn = start(game(5, &["Place", "Place"]), &mut rng);

        assert!(turn.send(TurnEvent::ChooseCard(CardId::new("Place")), &mut rng));
        assert!(turn.send(TurnEvent::SelectTarget(TargetValue::cell(2, 2)), &mut rng));

        assert_eq!(turn.game().deck.discard_pile().len(), 2);
    }

    #[test]
    fn test_empty_deck_passes_turn() {
        let mut rng = GameRng::new("seed");
        let turn = start(game(5, &[]), &mut rng);

        assert!(turn.is_done());
        assert_eq!(tags(&turn), vec![LogTag::DrawTwo, LogTag::CheckWin]);
        assert_eq!(turn.game().current_player, Player::Two);
    }

    #[test]
    fn test_winning_move_sets_winner() {
        let mut rng = GameRng::new("seed");
        let mut g = game(7, &["Take", "Place"]);
        for x in 0..4 {
            g.board.place(Point::new(x, 3), Player::One).unwrap();
        }

        let mut turn = start(g, &mut rng);
        turn.send(TurnEvent::ChooseCard(CardId::new("Place")), &mut rng);
        turn.send(TurnEvent::SelectTarget(TargetValue::cell(4, 3)), &mut rng);

        let game = turn.game();
        assert_eq!(game.winner, Some(crate::rules::Winner::Player(Player::One)));
        assert_eq!(turn.logs().last().unwrap().message, "checkWin: Player 1 wins");
    }

    #[test]
    fn test_dropping_machine_leaves_origin_untouched() {
        let mut rng = GameRng::new("seed");
        let origin = game(5, &["Take", "Place"]);

        let mut turn = start(origin.clone(), &mut rng);
        turn.send(TurnEvent::ChooseCard(CardId::new("Place")), &mut rng);
        drop(turn);

        assert_eq!(origin.deck.draw_pile().len(), 2);
        assert!(origin.deck.discard_pile().is_empty());
    }
}
