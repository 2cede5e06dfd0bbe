/// Abstract input commands consumed by the simulation.
///
/// The input layer owns the physical keys and key-repeat debouncing; the core
/// only ever sees one of these per logical press or release.
use crate::events::Event;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Intent {
    MoveLeftStart,
    MoveRightStart,
    MoveStop,
    MoveUp,
    MoveDown,
    Fire,
    StartOrRestart,
}

impl Intent {
    pub const ALL: [Intent; 7] = [
        Intent::MoveLeftStart,
        Intent::MoveRightStart,
        Intent::MoveStop,
        Intent::MoveUp,
        Intent::MoveDown,
        Intent::Fire,
        Intent::StartOrRestart,
    ];

    /// Parse an intent name. Accepts `MoveLeftStart`, `move_left_start` and
    /// `move-left-start`, case-insensitively. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Intent> {
        let folded: String = name
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        Self::ALL
            .into_iter()
            .find(|intent| intent.name().to_lowercase() == folded)
    }

    pub fn name(self) -> &'static str {
        match self {
            Intent::MoveLeftStart => "MoveLeftStart",
            Intent::MoveRightStart => "MoveRightStart",
            Intent::MoveStop => "MoveStop",
            Intent::MoveUp => "MoveUp",
            Intent::MoveDown => "MoveDown",
            Intent::Fire => "Fire",
            Intent::StartOrRestart => "StartOrRestart",
        }
    }

    /// Lateral intents persist until replaced; the input layer tracks them
    /// as held keys rather than one-shot presses.
    pub fn is_steering(self) -> bool {
        matches!(
            self,
            Intent::MoveLeftStart | Intent::MoveRightStart | Intent::MoveStop
        )
    }

    /// The bus event this intent publishes. `StartOrRestart` drives the round
    /// lifecycle directly and has no event.
    pub fn event(self) -> Option<Event> {
        match self {
            Intent::MoveLeftStart => Some(Event::HeroSpeedLeft),
            Intent::MoveRightStart => Some(Event::HeroSpeedRight),
            Intent::MoveStop => Some(Event::HeroSpeedZero),
            Intent::MoveUp => Some(Event::HeroStepUp),
            Intent::MoveDown => Some(Event::HeroStepDown),
            Intent::Fire => Some(Event::HeroFire),
            Intent::StartOrRestart => None,
        }
    }
}
