/// Axis-aligned rectangle collision, applied as an all-pairs scan over the
/// live entities each tick.
use crate::entities::{Entity, Hero, Kind, Rect};
use crate::events::Event;

/// True unless the rectangles are fully separated along either axis. Touching
/// edges count as a hit.
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    !(b.left > a.right || b.right < a.left || b.top > a.bottom || b.bottom < a.top)
}

/// Every live laser against every live enemy, then every live enemy against
/// the hero. Only reports hits; handlers decide what they mean.
///
/// The result is collected before any handler runs, so handlers can spawn or
/// kill entities without disturbing the scan.
pub fn scan(hero: &Hero, entities: &[Entity]) -> Vec<Event> {
    let mut hits = Vec::new();
    for laser in live(entities, Kind::Laser) {
        let laser_box = laser.bounding_box();
        for enemy in live(entities, Kind::Enemy) {
            if intersects(&laser_box, &enemy.bounding_box()) {
                hits.push(Event::LaserHitEnemy {
                    laser: laser.id,
                    enemy: enemy.id,
                });
            }
        }
    }

    if !hero.is_dead() {
        let hero_box = hero.body.bounding_box();
        for enemy in live(entities, Kind::Enemy) {
            if intersects(&enemy.bounding_box(), &hero_box) {
                hits.push(Event::EnemyHitHero { enemy: enemy.id });
            }
        }
    }
    hits
}

fn live(entities: &[Entity], kind: Kind) -> impl Iterator<Item = &Entity> {
    entities
        .iter()
        .filter(move |e| e.kind == kind && e.is_live())
}
