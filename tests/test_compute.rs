use laser_defense::config::GameConfig;
use laser_defense::entities::{Entity, Kind, Sprite};
use laser_defense::frame::MessageColor;
use laser_defense::{Game, Intent, Outcome, Phase};

fn running_game() -> Game {
    let mut game = Game::new(GameConfig::default());
    game.mark_ready();
    game.handle_intent(Intent::StartOrRestart);
    game
}

/// Park a laser squarely inside the enemy with `enemy_id`.
fn laser_on_enemy(game: &mut Game, enemy_id: u32) {
    let round = game.round_mut();
    let (x, y) = round
        .entities
        .iter()
        .find(|e| e.id == enemy_id)
        .map(|e| (e.x + 10.0, e.y + 10.0))
        .expect("enemy exists");
    let id = round.allocate_id();
    let laser = Entity::laser(id, x, y, &round.config);
    round.entities.push(laser);
}

/// Move the enemy with `enemy_id` on top of the hero.
fn enemy_on_hero(game: &mut Game, enemy_id: u32) {
    let round = game.round_mut();
    let (hx, hy) = (round.hero.body.x, round.hero.body.y);
    let enemy = round
        .entities
        .iter_mut()
        .find(|e| e.id == enemy_id)
        .expect("enemy exists");
    enemy.x = hx;
    enemy.y = hy;
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[test]
fn new_game_is_not_ready() {
    let mut game = Game::new(GameConfig::default());
    assert_eq!(game.phase(), Phase::NotReady);
    assert!(!game.round().is_ready());

    // Starting before assets are loaded does nothing.
    game.handle_intent(Intent::StartOrRestart);
    assert_eq!(game.phase(), Phase::NotReady);
    assert!(game.frame().entities.is_empty());
}

#[test]
fn ready_game_shows_start_banner() {
    let mut game = Game::new(GameConfig::default());
    game.mark_ready();
    assert_eq!(game.phase(), Phase::Ready);
    let banner = game.frame().hud.banner.expect("ready banner");
    assert!(banner.text.contains("Press ENTER"));
    assert_eq!(banner.color, MessageColor::Yellow);
}

#[test]
fn start_spawns_grid_and_hero() {
    let game = running_game();
    assert_eq!(game.phase(), Phase::Running);
    let frame = game.frame();
    assert_eq!(frame.count(Kind::Enemy), 25);
    assert_eq!(frame.count(Kind::Hero), 1);
    assert_eq!(frame.hud.score, 0);
    assert_eq!(frame.hud.life, 3);
    assert_eq!(frame.hud.banner, None);
}

#[test]
fn frame_keeps_insertion_order() {
    let mut game = running_game();
    game.handle_intent(Intent::Fire);
    let kinds: Vec<Kind> = game.frame().entities.iter().map(|e| e.kind).collect();
    assert!(kinds[..25].iter().all(|k| *k == Kind::Enemy));
    assert_eq!(kinds[25], Kind::Hero);
    assert_eq!(kinds[26], Kind::Laser);
}

#[test]
fn movement_intents_are_ignored_outside_a_round() {
    let mut game = Game::new(GameConfig::default());
    game.mark_ready();
    game.handle_intent(Intent::Fire);
    game.handle_intent(Intent::MoveLeftStart);
    game.update(1000);
    assert_eq!(game.phase(), Phase::Ready);
    assert!(game.round().entities.is_empty());
    assert_eq!(game.ticks(), 0);
}

// ── Loop driver ───────────────────────────────────────────────────────────────

#[test]
fn update_fires_one_tick_per_period() {
    let mut game = running_game();
    game.update(99);
    assert_eq!(game.ticks(), 0);
    game.update(1);
    assert_eq!(game.ticks(), 1);
    game.update(250);
    assert_eq!(game.ticks(), 3);
}

#[test]
fn enemies_drift_on_their_own_clock() {
    let mut game = running_game();
    let y0 = game.round().entities[0].y;

    // Two main ticks pass without enemy motion.
    game.update(200);
    assert_eq!(game.round().entities[0].y, y0);

    game.update(100);
    assert_eq!(game.round().entities[0].y, y0 + 5.0);
}

#[test]
fn enemy_drift_does_not_depend_on_update_slicing() {
    let mut coarse = running_game();
    let mut fine = running_game();
    coarse.update(900);
    for _ in 0..90 {
        fine.update(10);
    }
    assert_eq!(coarse.round().entities[7].y, fine.round().entities[7].y);
    assert_eq!(coarse.round().entities[7].y, 15.0 + 50.0 * 2.0);
}

#[test]
fn held_direction_moves_hero_each_tick() {
    let mut game = running_game();
    let x0 = game.round().hero.body.x;
    game.handle_intent(Intent::MoveLeftStart);
    assert_eq!(game.round().hero.body.sprite, Sprite::HeroLeft);
    game.update(300);
    assert_eq!(game.round().hero.body.x, x0 - 30.0);

    game.handle_intent(Intent::MoveStop);
    game.update(300);
    assert_eq!(game.round().hero.body.x, x0 - 30.0);
    assert_eq!(game.round().hero.body.sprite, Sprite::Hero);
}

#[test]
fn hero_cannot_leave_the_playfield() {
    let mut game = running_game();
    game.handle_intent(Intent::MoveRightStart);
    for _ in 0..100 {
        game.tick();
    }
    assert_eq!(game.round().hero.body.x, 925.0);
}

#[test]
fn vertical_intents_step_immediately() {
    let mut game = running_game();
    let y0 = game.round().hero.body.y;
    game.handle_intent(Intent::MoveUp);
    assert_eq!(game.round().hero.body.y, y0 - 5.0);
    game.handle_intent(Intent::MoveDown);
    game.handle_intent(Intent::MoveDown);
    assert_eq!(game.round().hero.body.y, y0 + 5.0);
}

#[test]
fn lasers_leaving_the_top_are_pruned() {
    let mut game = running_game();
    // Fire up the empty lane left of the grid.
    game.round_mut().hero.body.x = 0.0;
    game.handle_intent(Intent::Fire);
    assert_eq!(game.frame().count(Kind::Laser), 1);
    // Spawned at y = 546; 15 px per 100 ms, gone after 38 steps.
    game.update(3_700);
    assert_eq!(game.frame().count(Kind::Laser), 1);
    game.update(300);
    assert_eq!(game.frame().count(Kind::Laser), 0);
}

// ── Scenario: firing and cooldown ─────────────────────────────────────────────

#[test]
fn firing_spawns_laser_and_starts_cooldown() {
    let mut game = running_game();
    let (hx, hy) = (game.round().hero.body.x, game.round().hero.body.y);
    game.handle_intent(Intent::Fire);

    let round = game.round();
    let laser = round.entities.last().expect("laser spawned");
    assert_eq!(laser.kind, Kind::Laser);
    assert_eq!((laser.x, laser.y), (hx + 45.0, hy - 30.0));
    assert_eq!(round.hero.cooldown, 500);
    assert!(!round.hero.can_fire());
}

#[test]
fn cooldown_expires_after_five_cooldown_periods() {
    let mut game = running_game();
    game.handle_intent(Intent::Fire);
    for _ in 0..4 {
        game.update(100);
        assert!(!game.round().hero.can_fire());
        game.handle_intent(Intent::Fire);
    }
    assert_eq!(game.frame().count(Kind::Laser), 1);

    game.update(100);
    assert!(game.round().hero.can_fire());
    game.handle_intent(Intent::Fire);
    assert_eq!(game.frame().count(Kind::Laser), 2);
}

// ── Scenario: laser hits enemy ────────────────────────────────────────────────

#[test]
fn laser_hit_kills_both_rewards_and_explodes() {
    let mut game = running_game();
    let (ex, ey) = (game.round().entities[0].x, game.round().entities[0].y);
    laser_on_enemy(&mut game, 0);

    game.tick();

    let round = game.round();
    assert_eq!(round.score(), 100);
    assert_eq!(round.live_enemies(), 24);
    assert!(round.entities.iter().all(|e| e.id != 0));
    assert!(round.entities.iter().all(|e| e.kind != Kind::Laser));

    let explosions: Vec<&Entity> = round
        .entities
        .iter()
        .filter(|e| e.kind == Kind::Explosion)
        .collect();
    assert_eq!(explosions.len(), 1);
    assert_eq!((explosions[0].x, explosions[0].y), (ex, ey));
    assert_eq!(explosions[0].sprite, Sprite::ExplosionRed);
}

#[test]
fn explosion_expires_on_its_own() {
    let mut game = running_game();
    laser_on_enemy(&mut game, 0);
    game.tick();
    assert_eq!(game.frame().count(Kind::Explosion), 1);

    game.update(300);
    assert_eq!(game.frame().count(Kind::Explosion), 0);
}

#[test]
fn two_lasers_on_one_enemy_both_score() {
    let mut game = running_game();
    laser_on_enemy(&mut game, 3);
    laser_on_enemy(&mut game, 3);

    game.tick();

    assert_eq!(game.round().score(), 200);
    assert_eq!(game.round().live_enemies(), 24);
    assert_eq!(game.frame().count(Kind::Explosion), 2);
    assert_eq!(game.frame().count(Kind::Laser), 0);
}

#[test]
fn laser_on_a_column_seam_clears_both_enemies() {
    let mut game = running_game();
    let round = game.round_mut();
    // Enemy 5 heads the second column, 98 px right of enemy 0.
    let (x, y) = round
        .entities
        .iter()
        .find(|e| e.id == 0)
        .map(|e| (e.x + 94.0, e.y + 10.0))
        .expect("enemy exists");
    let id = round.allocate_id();
    let laser = Entity::laser(id, x, y, &round.config);
    round.entities.push(laser);

    game.tick();

    assert_eq!(game.round().score(), 200);
    assert_eq!(game.round().live_enemies(), 23);
    assert_eq!(game.frame().count(Kind::Explosion), 2);
}

#[test]
fn separate_hits_in_one_tick_are_all_processed() {
    let mut game = running_game();
    laser_on_enemy(&mut game, 0);
    laser_on_enemy(&mut game, 12);
    laser_on_enemy(&mut game, 24);

    game.tick();

    assert_eq!(game.round().score(), 300);
    assert_eq!(game.round().live_enemies(), 22);
    assert_eq!(game.frame().count(Kind::Explosion), 3);
}

// ── Scenario: enemy hits hero ─────────────────────────────────────────────────

#[test]
fn enemy_hit_costs_a_life() {
    let mut game = running_game();
    enemy_on_hero(&mut game, 4);

    game.tick();

    let round = game.round();
    assert_eq!(round.life(), 2);
    assert_eq!(round.live_enemies(), 24);
    assert_eq!(round.hero.body.sprite, Sprite::HeroDamaged);
    assert_eq!(game.phase(), Phase::Running);
    assert_eq!(game.frame().count(Kind::Explosion), 1);
}

#[test]
fn enemy_shot_while_touching_the_hero_still_costs_a_life() {
    let mut game = running_game();
    enemy_on_hero(&mut game, 4);
    laser_on_enemy(&mut game, 4);

    game.tick();

    let round = game.round();
    assert_eq!(round.score(), 100);
    assert_eq!(round.life(), 2);
    assert_eq!(round.live_enemies(), 24);
    assert_eq!(game.phase(), Phase::Running);
}

#[test]
fn last_life_lost_ends_round_as_loss() {
    let mut game = running_game();
    game.round_mut().hero.life = 1;
    enemy_on_hero(&mut game, 4);

    game.tick();

    assert_eq!(game.phase(), Phase::Ended(Outcome::Loss));
    assert_eq!(game.round().life(), 0);
    assert_eq!(game.frame().count(Kind::Hero), 0);
    // Hero and enemy both leave an explosion.
    assert_eq!(game.frame().count(Kind::Explosion), 2);

    // The loop has stopped.
    let ticks = game.ticks();
    game.update(1_000);
    game.tick();
    assert_eq!(game.ticks(), ticks);
}

#[test]
fn loss_outranks_a_simultaneous_clear() {
    let mut game = running_game();
    game.round_mut().hero.life = 1;
    // Everything but enemy 4 is already gone.
    for e in game.round_mut().entities.iter_mut().filter(|e| e.id != 4) {
        e.mark_dead();
    }
    enemy_on_hero(&mut game, 4);

    game.tick();

    assert_eq!(game.phase(), Phase::Ended(Outcome::Loss));
}

#[test]
fn loss_banner_appears_after_delay() {
    let mut game = running_game();
    game.round_mut().hero.life = 1;
    enemy_on_hero(&mut game, 4);
    game.tick();

    assert_eq!(game.frame().hud.banner, None);
    game.update(199);
    assert_eq!(game.frame().hud.banner, None);
    game.update(1);
    let banner = game.frame().hud.banner.expect("loss banner");
    assert_eq!(banner.color, MessageColor::Red);
    assert!(banner.text.contains("You died"));
}

#[test]
fn scene_freezes_once_the_round_ends() {
    let mut game = running_game();
    game.round_mut().hero.life = 1;
    enemy_on_hero(&mut game, 4);
    game.tick();

    let before = game.frame().entities;
    game.update(5_000);
    assert_eq!(game.frame().entities, before);
}

#[test]
fn only_restart_is_accepted_after_the_end() {
    let mut game = running_game();
    game.round_mut().hero.life = 1;
    enemy_on_hero(&mut game, 4);
    game.tick();

    let explosions = game.frame().count(Kind::Explosion);
    game.handle_intent(Intent::Fire);
    game.handle_intent(Intent::MoveLeftStart);
    assert_eq!(game.frame().count(Kind::Laser), 0);
    assert_eq!(game.frame().count(Kind::Explosion), explosions);
    assert_eq!(game.round().hero.speed, 0);
}

// ── Scenario: grid cleared ────────────────────────────────────────────────────

#[test]
fn clearing_the_grid_wins() {
    let mut game = running_game();
    for id in 0..25 {
        laser_on_enemy(&mut game, id);
    }

    game.tick();

    assert_eq!(game.round().score(), 2_500);
    assert_eq!(game.phase(), Phase::Ended(Outcome::Win));
    game.update(200);
    let banner = game.frame().hud.banner.expect("win banner");
    assert_eq!(banner.color, MessageColor::Green);
    assert!(banner.text.contains("You did it"));
}

// ── Scenario: enemy reaches the bottom ────────────────────────────────────────

#[test]
fn enemy_at_bottom_destroys_hero() {
    let mut game = running_game();
    {
        // Column 0, row 0, parked 5 px above the floor (768 - 50).
        let enemy = &mut game.round_mut().entities[0];
        enemy.y = 713.0;
    }

    game.update(300);

    let round = game.round();
    assert!(round.entities.iter().all(|e| e.id != 0));
    assert!(round.hero.is_dead());
    assert_eq!(round.life(), 0);
    assert_eq!(game.phase(), Phase::Ended(Outcome::Loss));
}

// ── Restart ───────────────────────────────────────────────────────────────────

#[test]
fn restart_while_running_is_a_no_op() {
    let mut game = running_game();
    laser_on_enemy(&mut game, 0);
    game.tick();
    game.update(150);
    let before = game.frame();

    game.handle_intent(Intent::StartOrRestart);

    assert_eq!(game.phase(), Phase::Running);
    assert_eq!(game.frame(), before);
    assert_eq!(game.round().score(), 100);
}

#[test]
fn restart_resets_score_life_and_entities() {
    let mut game = running_game();
    laser_on_enemy(&mut game, 0);
    game.tick();
    game.round_mut().hero.life = 1;
    enemy_on_hero(&mut game, 6);
    game.tick();
    assert_eq!(game.phase(), Phase::Ended(Outcome::Loss));
    assert_eq!(game.round().score(), 100);

    game.handle_intent(Intent::StartOrRestart);

    assert_eq!(game.phase(), Phase::Running);
    let frame = game.frame();
    assert_eq!(frame.hud.score, 0);
    assert_eq!(frame.hud.life, 3);
    assert_eq!(frame.hud.banner, None);
    assert_eq!(frame.count(Kind::Enemy), 25);
    assert_eq!(frame.count(Kind::Hero), 1);
    assert_eq!(frame.count(Kind::Explosion), 0);
    assert!(game.round().hero.can_fire());
}

#[test]
fn restart_does_not_duplicate_handlers() {
    let mut game = running_game();
    for _ in 0..3 {
        game.round_mut().hero.life = 1;
        enemy_on_hero(&mut game, 0);
        game.tick();
        game.handle_intent(Intent::StartOrRestart);
    }
    laser_on_enemy(&mut game, 0);
    game.tick();
    // One handler per topic: a single reward, a single explosion.
    assert_eq!(game.round().score(), 100);
    assert_eq!(game.frame().count(Kind::Explosion), 1);
}
