/// Entity model: geometry, lifecycle, and per-kind autonomous behaviour.
///
/// Every on-screen object is an [`Entity`] tagged with a [`Kind`]. Enemies,
/// lasers and explosions drive themselves from their own [`Cadence`]; the hero
/// wraps an entity in [`Hero`] to carry speed, cooldown, life and score.
use crate::config::GameConfig;

pub type EntityId = u32;

// ── Sizes (pixels, fixed per kind) ───────────────────────────────────────────

pub const HERO_WIDTH: u32 = 99;
pub const HERO_HEIGHT: u32 = 75;
pub const ENEMY_WIDTH: u32 = 98;
pub const ENEMY_HEIGHT: u32 = 50;
pub const LASER_WIDTH: u32 = 9;
pub const LASER_HEIGHT: u32 = 33;
pub const EXPLOSION_WIDTH: u32 = 112;
pub const EXPLOSION_HEIGHT: u32 = 108;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Hero,
    Enemy,
    Laser,
    Explosion,
}

impl Kind {
    pub fn size(self) -> (u32, u32) {
        match self {
            Kind::Hero => (HERO_WIDTH, HERO_HEIGHT),
            Kind::Enemy => (ENEMY_WIDTH, ENEMY_HEIGHT),
            Kind::Laser => (LASER_WIDTH, LASER_HEIGHT),
            Kind::Explosion => (EXPLOSION_WIDTH, EXPLOSION_HEIGHT),
        }
    }
}

/// Opaque visual handle. The renderer decides what each one looks like.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sprite {
    Hero,
    HeroLeft,
    HeroRight,
    HeroDamaged,
    Enemy,
    Laser,
    ExplosionRed,
    ExplosionGreen,
}

/// Axis-aligned bounding box, top-left origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

// ── Cadence ──────────────────────────────────────────────────────────────────

/// A fixed-period clock fed with elapsed time. Each entity owns one, so its
/// motion advances once per period no matter how the caller slices time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cadence {
    period_ms: u32,
    elapsed_ms: u32,
}

impl Cadence {
    pub fn new(period_ms: u32) -> Self {
        Self {
            period_ms,
            elapsed_ms: 0,
        }
    }

    /// Feed `elapsed_ms` and return how many whole periods completed.
    pub fn advance(&mut self, elapsed_ms: u32) -> u32 {
        if self.period_ms == 0 {
            return 0;
        }
        let total = self.elapsed_ms.saturating_add(elapsed_ms);
        self.elapsed_ms = total % self.period_ms;
        total / self.period_ms
    }

    /// Milliseconds until the next period completes.
    pub fn until_next(&self) -> u32 {
        if self.period_ms == 0 {
            return u32::MAX;
        }
        self.period_ms - self.elapsed_ms
    }

    pub fn restart(&mut self) {
        self.elapsed_ms = 0;
    }
}

/// Something an entity reports back while advancing on its own clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    /// An enemy reached the bottom of the playfield.
    OutOfBounds,
}

// ── Entity ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub kind: Kind,
    pub x: f32,
    pub y: f32,
    pub width: u32,
    pub height: u32,
    /// Monotonic: once set it is never cleared.
    pub dead: bool,
    pub sprite: Sprite,
    clock: Cadence,
    /// Pixels moved per clock period (enemies down, lasers up).
    step: f32,
}

impl Entity {
    fn new(
        id: EntityId,
        kind: Kind,
        x: f32,
        y: f32,
        sprite: Sprite,
        clock: Cadence,
        step: f32,
    ) -> Self {
        let (width, height) = kind.size();
        Self {
            id,
            kind,
            x,
            y,
            width,
            height,
            dead: false,
            sprite,
            clock,
            step,
        }
    }

    pub fn enemy(id: EntityId, x: f32, y: f32, cfg: &GameConfig) -> Self {
        Self::new(
            id,
            Kind::Enemy,
            x,
            y,
            Sprite::Enemy,
            Cadence::new(cfg.timing.enemy_step_ms),
            cfg.tuning.enemy_step,
        )
    }

    pub fn laser(id: EntityId, x: f32, y: f32, cfg: &GameConfig) -> Self {
        Self::new(
            id,
            Kind::Laser,
            x,
            y,
            Sprite::Laser,
            Cadence::new(cfg.timing.laser_step_ms),
            cfg.tuning.laser_step,
        )
    }

    pub fn explosion(id: EntityId, x: f32, y: f32, sprite: Sprite, cfg: &GameConfig) -> Self {
        Self::new(
            id,
            Kind::Explosion,
            x,
            y,
            sprite,
            Cadence::new(cfg.timing.explosion_ms),
            0.0,
        )
    }

    fn hero(id: EntityId, x: f32, y: f32) -> Self {
        // The hero has no self-motion; its cooldown runs on `Hero`'s own clock.
        Self::new(id, Kind::Hero, x, y, Sprite::Hero, Cadence::new(0), 0.0)
    }

    pub fn bounding_box(&self) -> Rect {
        Rect {
            top: self.y,
            left: self.x,
            bottom: self.y + self.height as f32,
            right: self.x + self.width as f32,
        }
    }

    pub fn is_live(&self) -> bool {
        !self.dead
    }

    pub fn mark_dead(&mut self) {
        self.dead = true;
    }

    /// Run this entity's own clock forward. Each completed period applies one
    /// step of kind-specific behaviour; a dead entity never moves again.
    pub fn advance(&mut self, elapsed_ms: u32, playfield_height: f32) -> Option<Signal> {
        if self.dead {
            return None;
        }
        for _ in 0..self.clock.advance(elapsed_ms) {
            match self.kind {
                Kind::Enemy => {
                    let floor = playfield_height - self.height as f32;
                    if self.y < floor {
                        self.y += self.step;
                    }
                    if self.y >= floor {
                        self.mark_dead();
                        return Some(Signal::OutOfBounds);
                    }
                }
                Kind::Laser => {
                    if self.y > 0.0 {
                        self.y -= self.step;
                    } else {
                        self.mark_dead();
                        return None;
                    }
                }
                Kind::Explosion => {
                    self.mark_dead();
                    return None;
                }
                Kind::Hero => return None,
            }
        }
        None
    }
}

// ── Hero ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Hero {
    pub body: Entity,
    /// Lateral pixels per tick; zero when no direction is held.
    pub speed: i32,
    /// Laser fire is permitted only at zero.
    pub cooldown: u32,
    pub life: u32,
    pub score: u32,
    full_life: u32,
    cooling: Cadence,
}

impl Hero {
    pub fn new(id: EntityId, cfg: &GameConfig) -> Self {
        let (x, y) = spawn_point(cfg);
        Self {
            body: Entity::hero(id, x, y),
            speed: 0,
            cooldown: 0,
            life: cfg.tuning.lives,
            score: 0,
            full_life: cfg.tuning.lives,
            cooling: Cadence::new(cfg.timing.cooldown_step_ms),
        }
    }

    /// Re-initialize in place for a new round.
    pub fn reset(&mut self, id: EntityId, cfg: &GameConfig) {
        *self = Self::new(id, cfg);
    }

    pub fn is_dead(&self) -> bool {
        self.body.dead
    }

    pub fn can_fire(&self) -> bool {
        self.cooldown == 0
    }

    /// Spawn a laser above the hero and start the cooldown. A no-op while
    /// cooling down.
    pub fn fire(&mut self, id: EntityId, cfg: &GameConfig) -> Option<Entity> {
        if !self.can_fire() || self.is_dead() {
            return None;
        }
        self.cooldown = cfg.tuning.cooldown;
        self.cooling.restart();
        Some(Entity::laser(
            id,
            self.body.x + cfg.tuning.laser_offset_x,
            self.body.y + cfg.tuning.laser_offset_y,
            cfg,
        ))
    }

    /// Decay the cooldown on its own clock.
    pub fn advance(&mut self, elapsed_ms: u32, decay: u32) {
        if self.cooldown == 0 {
            return;
        }
        let periods = self.cooling.advance(elapsed_ms);
        self.cooldown = self.cooldown.saturating_sub(periods.saturating_mul(decay));
    }

    /// Lose one life. Returns `true` when this hit killed the hero.
    pub fn take_hit(&mut self) -> bool {
        if self.is_dead() {
            return false;
        }
        self.life = self.life.saturating_sub(1);
        self.body.sprite = Sprite::HeroDamaged;
        if self.life == 0 {
            self.body.mark_dead();
            return true;
        }
        false
    }

    /// Kill outright, regardless of remaining life.
    pub fn destroy(&mut self) {
        self.life = 0;
        self.body.mark_dead();
    }

    pub fn reward(&mut self, amount: u32) {
        self.score = self.score.saturating_add(amount);
    }

    pub fn steer(&mut self, speed: i32) {
        self.speed = speed;
        self.body.sprite = match speed {
            s if s < 0 => Sprite::HeroLeft,
            s if s > 0 => Sprite::HeroRight,
            _ if self.life == self.full_life => Sprite::Hero,
            _ => Sprite::HeroDamaged,
        };
    }

    /// Apply the held lateral speed, clamped to the playfield.
    pub fn apply_speed(&mut self, playfield_width: f32) {
        if self.speed == 0 || self.is_dead() {
            return;
        }
        let max_x = (playfield_width - self.body.width as f32).max(0.0);
        self.body.x = (self.body.x + self.speed as f32).clamp(0.0, max_x);
    }

    /// Vertical nudge from `MoveUp`/`MoveDown`, clamped to the playfield.
    pub fn step_vertical(&mut self, dy: f32, playfield_height: f32) {
        if self.is_dead() {
            return;
        }
        let max_y = (playfield_height - self.body.height as f32).max(0.0);
        self.body.y = (self.body.y + dy).clamp(0.0, max_y);
    }
}

/// Where the hero appears at round start: horizontally centred (left edge at
/// the midline), three quarters of the way down.
pub fn spawn_point(cfg: &GameConfig) -> (f32, f32) {
    let w = cfg.playfield.width as f32;
    let h = cfg.playfield.height as f32;
    (w / 2.0, h / 4.0 * 3.0)
}

/// Top-left corners of the enemy grid, column by column.
pub fn enemy_grid(cfg: &GameConfig) -> Vec<(f32, f32)> {
    let cols = cfg.tuning.grid_columns;
    let rows = cfg.tuning.grid_rows;
    let grid_width = cols * ENEMY_WIDTH;
    let start_x = (cfg.playfield.width.saturating_sub(grid_width)) as f32 / 2.0;
    (0..cols)
        .flat_map(|c| {
            (0..rows).map(move |r| {
                (
                    start_x + (c * ENEMY_WIDTH) as f32,
                    (r * ENEMY_HEIGHT) as f32,
                )
            })
        })
        .collect()
}
