//! Round state and the event handlers that are allowed to mutate it.
//!
//! Phase flow: `NotReady` → `Ready` → `Running` → `Ended(outcome)` →
//! `Running` again on restart. Score and life live on the hero; the round
//! owns the hero, the entity collection, and the end-of-round banner.

use tracing::{debug, info};

use crate::config::GameConfig;
use crate::entities::{enemy_grid, Cadence, Entity, EntityId, Hero, Kind, Sprite};
use crate::events::{Event, EventBus, Topic};
use crate::frame::Banner;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Assets still loading on the renderer side.
    NotReady,
    /// Waiting for the first start.
    Ready,
    Running,
    Ended(Outcome),
}

pub struct Round {
    pub config: GameConfig,
    pub phase: Phase,
    /// Held apart from `entities` for direct access; frames merge it back in
    /// by id.
    pub hero: Hero,
    /// Enemies, lasers and explosions in insertion order.
    pub entities: Vec<Entity>,
    pub banner: Option<Banner>,
    banner_delay: Option<Cadence>,
    next_id: EntityId,
}

impl Round {
    pub fn new(config: GameConfig) -> Self {
        let hero = Hero::new(0, &config);
        Self {
            config,
            phase: Phase::NotReady,
            hero,
            entities: Vec::new(),
            banner: None,
            banner_delay: None,
            next_id: 1,
        }
    }

    /// Has the game been initialized at least once.
    pub fn is_ready(&self) -> bool {
        self.phase != Phase::NotReady
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn score(&self) -> u32 {
        self.hero.score
    }

    pub fn life(&self) -> u32 {
        self.hero.life
    }

    pub fn allocate_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Reset everything for a fresh round: new enemy grid, hero re-initialized
    /// in place, score and life back to their starting values.
    pub fn begin(&mut self) {
        self.entities.clear();
        self.banner = None;
        self.banner_delay = None;
        self.next_id = 0;

        for (x, y) in enemy_grid(&self.config) {
            let id = self.allocate_id();
            self.entities.push(Entity::enemy(id, x, y, &self.config));
        }
        let hero_id = self.allocate_id();
        self.hero.reset(hero_id, &self.config);
        self.phase = Phase::Running;
        info!(
            enemies = self.entities.len(),
            life = self.hero.life,
            "round started"
        );
    }

    /// Conclude the round. The banner appears once the delay has elapsed.
    pub fn end(&mut self, outcome: Outcome) {
        if !self.is_running() {
            return;
        }
        self.phase = Phase::Ended(outcome);
        info!(?outcome, score = self.hero.score, life = self.hero.life, "round over");
        match self.config.timing.banner_delay_ms {
            0 => self.banner = Some(Banner::for_outcome(outcome)),
            delay => self.banner_delay = Some(Cadence::new(delay)),
        }
    }

    pub fn advance_banner(&mut self, elapsed_ms: u32) {
        let Phase::Ended(outcome) = self.phase else {
            return;
        };
        let Some(delay) = self.banner_delay.as_mut() else {
            return;
        };
        if delay.advance(elapsed_ms) > 0 {
            self.banner_delay = None;
            self.banner = Some(Banner::for_outcome(outcome));
        }
    }

    pub fn live_enemies(&self) -> usize {
        self.entities
            .iter()
            .filter(|e| e.kind == Kind::Enemy && e.is_live())
            .count()
    }

    /// Hero death outranks a cleared grid.
    pub fn verdict(&self) -> Option<Outcome> {
        if !self.is_running() {
            None
        } else if self.hero.is_dead() {
            Some(Outcome::Loss)
        } else if self.live_enemies() == 0 {
            Some(Outcome::Win)
        } else {
            None
        }
    }

    pub fn prune(&mut self) {
        self.entities.retain(Entity::is_live);
    }

    /// Dead entities stay findable until the next prune.
    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.iter().position(|e| e.id == id)
    }

    fn spawn_explosion(&mut self, x: f32, y: f32, sprite: Sprite) {
        let id = self.allocate_id();
        let boom = Entity::explosion(id, x, y, sprite, &self.config);
        self.entities.push(boom);
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

fn on_speed_left(round: &mut Round, _: &Event) {
    round.hero.steer(-round.config.tuning.hero_speed);
}

fn on_speed_right(round: &mut Round, _: &Event) {
    round.hero.steer(round.config.tuning.hero_speed);
}

fn on_speed_zero(round: &mut Round, _: &Event) {
    round.hero.steer(0);
}

fn on_step_up(round: &mut Round, _: &Event) {
    let height = round.config.playfield.height as f32;
    round.hero.step_vertical(-round.config.tuning.hero_step, height);
}

fn on_step_down(round: &mut Round, _: &Event) {
    let height = round.config.playfield.height as f32;
    round.hero.step_vertical(round.config.tuning.hero_step, height);
}

fn on_fire(round: &mut Round, _: &Event) {
    if !round.hero.can_fire() {
        return;
    }
    let id = round.allocate_id();
    if let Some(laser) = round.hero.fire(id, &round.config) {
        round.entities.push(laser);
    }
}

fn on_laser_hit_enemy(round: &mut Round, event: &Event) {
    let Event::LaserHitEnemy { laser, enemy } = *event else {
        return;
    };
    // Every reported pair counts, even if one side already died this pass.
    let (Some(li), Some(ei)) = (round.index_of(laser), round.index_of(enemy)) else {
        return;
    };
    round.entities[li].mark_dead();
    round.entities[ei].mark_dead();
    let (x, y) = (round.entities[ei].x, round.entities[ei].y);
    round.hero.reward(round.config.tuning.reward);
    round.spawn_explosion(x, y, Sprite::ExplosionRed);
    debug!(laser, enemy, score = round.hero.score, "laser hit enemy");
}

fn on_enemy_hit_hero(round: &mut Round, event: &Event) {
    let Event::EnemyHitHero { enemy } = *event else {
        return;
    };
    let Some(ei) = round.index_of(enemy) else {
        return;
    };
    round.entities[ei].mark_dead();
    if round.hero.take_hit() {
        let (hx, hy) = (round.hero.body.x, round.hero.body.y);
        round.spawn_explosion(hx, hy, Sprite::ExplosionGreen);
    }
    let (x, y) = (round.entities[ei].x, round.entities[ei].y);
    round.spawn_explosion(x, y, Sprite::ExplosionRed);
    debug!(enemy, life = round.hero.life, "enemy hit hero");
}

fn on_enemy_out_of_bounds(round: &mut Round, event: &Event) {
    let Event::EnemyOutOfBounds { enemy } = *event else {
        return;
    };
    debug!(enemy, "enemy reached the bottom; hero destroyed");
    round.hero.destroy();
}

fn on_round_over(round: &mut Round, event: &Event) {
    if let Event::RoundOver(outcome) = *event {
        round.end(outcome);
    }
}

/// Bind the round handlers. Called on a freshly reset bus at every round
/// start so bindings never accumulate.
pub fn register_handlers(bus: &mut EventBus<Round>) {
    bus.subscribe(Topic::HeroSpeedLeft, on_speed_left);
    bus.subscribe(Topic::HeroSpeedRight, on_speed_right);
    bus.subscribe(Topic::HeroSpeedZero, on_speed_zero);
    bus.subscribe(Topic::HeroStepUp, on_step_up);
    bus.subscribe(Topic::HeroStepDown, on_step_down);
    bus.subscribe(Topic::HeroFire, on_fire);
    bus.subscribe(Topic::LaserHitEnemy, on_laser_hit_enemy);
    bus.subscribe(Topic::EnemyHitHero, on_enemy_hit_hero);
    bus.subscribe(Topic::EnemyOutOfBounds, on_enemy_out_of_bounds);
    bus.subscribe(Topic::RoundOver, on_round_over);
}
