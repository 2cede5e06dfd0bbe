/// Game loop driver.
///
/// [`Game::update`] is the single scheduler: it feeds wall-clock time to every
/// entity's own clock and fires the fixed-period main tick. Each tick runs, in
/// order, hero intent application, the collision pass (whose events mutate the
/// round through the bus), the end-of-round verdict, and the prune.
use tracing::trace;

use crate::collision;
use crate::config::GameConfig;
use crate::entities::{Cadence, Signal};
use crate::events::{Event, EventBus};
use crate::frame::{Banner, Frame, Hud, Renderable};
use crate::intent::Intent;
use crate::state::{register_handlers, Phase, Round};

pub struct Game {
    bus: EventBus<Round>,
    round: Round,
    tick_clock: Cadence,
    ticks: u64,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        let tick_clock = Cadence::new(config.timing.tick_ms);
        Self {
            bus: EventBus::new(),
            round: Round::new(config),
            tick_clock,
            ticks: 0,
        }
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    /// Direct access for callers that stage a specific scene.
    pub fn round_mut(&mut self) -> &mut Round {
        &mut self.round
    }

    pub fn phase(&self) -> Phase {
        self.round.phase
    }

    /// Main ticks run since construction.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The renderer finished loading; show the ready banner and accept a start.
    pub fn mark_ready(&mut self) {
        if self.round.phase == Phase::NotReady {
            self.round.phase = Phase::Ready;
            self.round.banner = Some(Banner::ready());
        }
    }

    pub fn handle_intent(&mut self, intent: Intent) {
        match intent {
            Intent::StartOrRestart => self.start_round(),
            _ if !self.round.is_running() => {
                trace!(?intent, phase = ?self.round.phase, "intent ignored");
            }
            _ => {
                if let Some(event) = intent.event() {
                    self.publish(event);
                }
            }
        }
    }

    /// Start (or restart) a round. Ignored before the game is ready and while
    /// a round is already running.
    fn start_round(&mut self) {
        match self.round.phase {
            Phase::Ready | Phase::Ended(_) => {}
            Phase::NotReady | Phase::Running => {
                trace!(phase = ?self.round.phase, "start ignored");
                return;
            }
        }
        self.bus.reset();
        register_handlers(&mut self.bus);
        self.round.begin();
        self.tick_clock.restart();
    }

    /// Advance the simulation by `elapsed_ms` of wall-clock time.
    ///
    /// Entity clocks that come due at the same instant as the main tick run
    /// first. Once the round ends the scene freezes and only the banner delay
    /// keeps counting.
    pub fn update(&mut self, elapsed_ms: u32) {
        let mut remaining = elapsed_ms;
        while remaining > 0 {
            match self.round.phase {
                Phase::Running => {
                    let step = remaining.min(self.tick_clock.until_next());
                    remaining -= step;
                    self.advance_entities(step);
                    if self.tick_clock.advance(step) > 0 {
                        self.tick();
                    }
                }
                Phase::Ended(_) => {
                    self.round.advance_banner(remaining);
                    return;
                }
                Phase::NotReady | Phase::Ready => return,
            }
        }
    }

    /// One main-loop pass. A no-op unless a round is running.
    pub fn tick(&mut self) {
        if !self.round.is_running() {
            return;
        }
        self.ticks += 1;

        let width = self.round.config.playfield.width as f32;
        self.round.hero.apply_speed(width);

        for hit in collision::scan(&self.round.hero, &self.round.entities) {
            self.publish(hit);
        }

        if let Some(outcome) = self.round.verdict() {
            self.publish(Event::RoundOver(outcome));
        }

        self.round.prune();
    }

    fn advance_entities(&mut self, elapsed_ms: u32) {
        let decay = self.round.config.tuning.cooldown_decay;
        self.round.hero.advance(elapsed_ms, decay);

        let floor = self.round.config.playfield.height as f32;
        let signals: Vec<Event> = self
            .round
            .entities
            .iter_mut()
            .filter_map(|e| match e.advance(elapsed_ms, floor) {
                Some(Signal::OutOfBounds) => Some(Event::EnemyOutOfBounds { enemy: e.id }),
                None => None,
            })
            .collect();
        for signal in signals {
            self.publish(signal);
        }
    }

    fn publish(&mut self, event: Event) {
        let handled = self.bus.publish(&mut self.round, &event);
        trace!(?event, handled, "published");
    }

    /// Snapshot for the renderer: live entities in insertion order (the hero
    /// slotted in by id), plus HUD values.
    pub fn frame(&self) -> Frame {
        let hero = &self.round.hero;
        let mut entities: Vec<Renderable> = Vec::with_capacity(self.round.entities.len() + 1);
        let in_round = matches!(self.round.phase, Phase::Running | Phase::Ended(_));
        let mut hero_pending = in_round && !hero.is_dead();
        for e in self.round.entities.iter().filter(|e| e.is_live()) {
            if hero_pending && e.id > hero.body.id {
                entities.push(Renderable::from(&hero.body));
                hero_pending = false;
            }
            entities.push(Renderable::from(e));
        }
        if hero_pending {
            entities.push(Renderable::from(&hero.body));
        }

        Frame {
            entities,
            hud: Hud {
                score: self.round.score(),
                life: self.round.life(),
                banner: self.round.banner.clone(),
            },
            width: self.round.config.playfield.width,
            height: self.round.config.playfield.height,
        }
    }
}
