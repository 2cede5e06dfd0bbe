/// Render hand-off: what the simulation exposes to whatever draws it.
use crate::entities::{Entity, Kind, Sprite};
use crate::state::Outcome;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageColor {
    Yellow,
    Red,
    Green,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Banner {
    pub text: String,
    pub color: MessageColor,
}

impl Banner {
    pub fn ready() -> Self {
        Self {
            text: "* * Press ENTER to start the game! pew pew pew * *".to_string(),
            color: MessageColor::Yellow,
        }
    }

    pub fn for_outcome(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Win => Self {
                text: "You did it!! Press ENTER to start a new game.".to_string(),
                color: MessageColor::Green,
            },
            Outcome::Loss => Self {
                text: "Don't panic. You died. Press ENTER to start again.".to_string(),
                color: MessageColor::Red,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Renderable {
    pub kind: Kind,
    pub x: f32,
    pub y: f32,
    pub width: u32,
    pub height: u32,
    pub sprite: Sprite,
}

impl From<&Entity> for Renderable {
    fn from(e: &Entity) -> Self {
        Self {
            kind: e.kind,
            x: e.x,
            y: e.y,
            width: e.width,
            height: e.height,
            sprite: e.sprite,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hud {
    pub score: u32,
    pub life: u32,
    pub banner: Option<Banner>,
}

/// One render-ready snapshot: live entities in insertion order plus HUD.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub entities: Vec<Renderable>,
    pub hud: Hud,
    pub width: u32,
    pub height: u32,
}

impl Frame {
    pub fn count(&self, kind: Kind) -> usize {
        self.entities.iter().filter(|e| e.kind == kind).count()
    }
}
