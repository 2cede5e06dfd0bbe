/// Publish/subscribe dispatch between producers (intents, collision scan,
/// entity clocks) and the handlers that mutate round state.
///
/// Handlers are plain function pointers that receive the current context by
/// `&mut`, so nothing they touch can outlive the round it belongs to.
use std::collections::HashMap;

use crate::entities::EntityId;
use crate::state::Outcome;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Topic {
    HeroSpeedLeft,
    HeroSpeedRight,
    HeroSpeedZero,
    HeroStepUp,
    HeroStepDown,
    HeroFire,
    LaserHitEnemy,
    EnemyHitHero,
    EnemyOutOfBounds,
    RoundOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    HeroSpeedLeft,
    HeroSpeedRight,
    HeroSpeedZero,
    HeroStepUp,
    HeroStepDown,
    HeroFire,
    LaserHitEnemy { laser: EntityId, enemy: EntityId },
    EnemyHitHero { enemy: EntityId },
    EnemyOutOfBounds { enemy: EntityId },
    RoundOver(Outcome),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::HeroSpeedLeft => Topic::HeroSpeedLeft,
            Event::HeroSpeedRight => Topic::HeroSpeedRight,
            Event::HeroSpeedZero => Topic::HeroSpeedZero,
            Event::HeroStepUp => Topic::HeroStepUp,
            Event::HeroStepDown => Topic::HeroStepDown,
            Event::HeroFire => Topic::HeroFire,
            Event::LaserHitEnemy { .. } => Topic::LaserHitEnemy,
            Event::EnemyHitHero { .. } => Topic::EnemyHitHero,
            Event::EnemyOutOfBounds { .. } => Topic::EnemyOutOfBounds,
            Event::RoundOver(_) => Topic::RoundOver,
        }
    }
}

pub type Handler<C> = fn(&mut C, &Event);

pub struct EventBus<C> {
    listeners: HashMap<Topic, Vec<Handler<C>>>,
}

impl<C> Default for EventBus<C> {
    fn default() -> Self {
        Self {
            listeners: HashMap::new(),
        }
    }
}

impl<C> EventBus<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handlers for a topic run in registration order.
    pub fn subscribe(&mut self, topic: Topic, handler: Handler<C>) {
        self.listeners.entry(topic).or_default().push(handler);
    }

    /// Run every handler subscribed to the event's topic, synchronously.
    /// Returns how many ran; a topic nobody listens to is a no-op.
    pub fn publish(&self, ctx: &mut C, event: &Event) -> usize {
        let Some(handlers) = self.listeners.get(&event.topic()) else {
            return 0;
        };
        for handler in handlers {
            handler(ctx, event);
        }
        handlers.len()
    }

    /// Drop every subscription.
    pub fn reset(&mut self) {
        self.listeners.clear();
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.listeners.get(&topic).map_or(0, Vec::len)
    }
}
