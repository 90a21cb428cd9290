//! Per-tick simulation step
//!
//! One call processes input, then pickups, enemies, projectiles, spawning
//! and finally terminal conditions, in that order. Later stages see the
//! results of earlier ones (enemies chase the player's post-move cell,
//! projectiles hit enemies at their post-move cells).

use super::autopilot;
use super::entity::{Advance, Projectile};
use super::grid::Direction;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::SCORE_PER_KILL;

/// Input intents for a single tick
///
/// Fire buttons carry held state, not one-shot presses: a shot goes off on
/// the tick a button goes from released to held.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Requested movement (also turns the player)
    pub move_dir: Option<Direction>,
    /// Standard fire button held
    pub fire: bool,
    /// Piercing fire button held
    pub fire_piercing: bool,
    /// Stop before touching any state
    pub quit: bool,
    /// Idle/demo mode - the autopilot plays the game
    pub idle_mode: bool,
}

/// Advance the session to `now_ms`
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: u64) {
    if input.quit || !state.is_running() {
        return;
    }

    let planned;
    let input = if input.idle_mode {
        planned = autopilot::plan(state);
        &planned
    } else {
        input
    };

    state.now_ms = now_ms;
    state.time_ticks += 1;

    // 1. Player input: shots leave from the pre-move cell, then the move
    apply_fire(state, input, now_ms);
    if let Some(dir) = input.move_dir {
        let cooldown = state.settings.player_move_cooldown_ms;
        state.player.step(dir, &state.grid, now_ms, cooldown);
    }

    // 2. Pickups under the player
    collect_pickups(state);

    // 3. Enemies chase the player's current cell
    let target = state.player.pos();
    let enemy_cooldown = state.settings.enemy_move_cooldown_ms;
    for enemy in &mut state.enemies {
        enemy.move_towards(target, &state.grid, now_ms, enemy_cooldown);
    }

    // 4. Projectiles travel and hit enemies
    step_projectiles(state, now_ms);

    // 5. Survival keeps a floor of pickups on the map
    if state.settings.variant.respawns_enemies() {
        state.replenish_pickups();
    }

    // 6. Terminal conditions; being caught wins over reaching the exit
    let player_pos = state.player.pos();
    if let Some(enemy) = state.enemies.iter().find(|e| e.pos() == player_pos) {
        log::info!("Player caught by enemy {} at {}", enemy.id, player_pos);
        state.events.push(GameEvent::PlayerCaught {
            enemy_id: enemy.id,
            pos: player_pos,
        });
        state.phase = GamePhase::Lost;
    } else if state.exit == Some(player_pos) {
        log::info!("Level {} cleared at tick {}", state.level, state.time_ticks);
        state.events.push(GameEvent::LevelCleared { level: state.level });
        state.phase = GamePhase::LevelClear;
    }
}

/// Edge-triggered firing for both buttons
fn apply_fire(state: &mut GameState, input: &TickInput, now_ms: u64) {
    let standard_pressed = input.fire && !state.latch.standard_held;
    let piercing_pressed = input.fire_piercing && !state.latch.piercing_held;
    state.latch.standard_held = input.fire;
    state.latch.piercing_held = input.fire_piercing;

    if standard_pressed && state.player.try_spend_ammo() {
        spawn_projectile(state, false, now_ms);
    }
    if piercing_pressed {
        spawn_projectile(state, true, now_ms);
    }
}

fn spawn_projectile(state: &mut GameState, piercing: bool, now_ms: u64) {
    let id = state.next_entity_id();
    let pos = state.player.pos();
    state
        .projectiles
        .push(Projectile::new(id, pos, state.player.facing, piercing));
    state.player.last_fire_ms = Some(now_ms);
    state.events.push(GameEvent::ShotFired { pos, piercing });
}

fn collect_pickups(state: &mut GameState) {
    let player_pos = state.player.pos();
    let before = state.pickups.len();
    state.pickups.retain(|p| p.pos != player_pos);
    for _ in state.pickups.len()..before {
        state.player.pickup_ammo();
        state.events.push(GameEvent::PickupCollected {
            pos: player_pos,
            ammo: state.player.ammo,
        });
    }
}

fn step_projectiles(state: &mut GameState, now_ms: u64) {
    let cooldown = state.settings.projectile_cooldown_ms;
    let mut killed = Vec::new();

    for projectile in &mut state.projectiles {
        if let Advance::BrokeWall(pos) = projectile.advance(&mut state.grid, now_ms, cooldown) {
            log::debug!("Piercing shot {} destroyed wall at {}", projectile.id, pos);
            state.events.push(GameEvent::WallDestroyed { pos });
        }

        // Blocked or expired shots still hit whatever shares their cell this tick
        let pos = projectile.pos();
        let kills_before = killed.len();
        state.enemies.retain(|enemy| {
            if enemy.pos() == pos {
                killed.push((enemy.id, pos));
                false
            } else {
                true
            }
        });
        if killed.len() > kills_before && !projectile.piercing {
            projectile.active = false;
        }
    }

    for (enemy_id, pos) in killed {
        log::debug!("Enemy {} killed at {}", enemy_id, pos);
        state.score += SCORE_PER_KILL;
        state.events.push(GameEvent::EnemyKilled { enemy_id, pos });
        if state.settings.variant.respawns_enemies() {
            if let Some((enemy_id, pos)) = state.spawn_enemy() {
                log::debug!("Enemy {} respawned at {}", enemy_id, pos);
                state.events.push(GameEvent::EnemyRespawned { enemy_id, pos });
            }
        }
    }

    state.projectiles.retain(|p| p.active);
}
