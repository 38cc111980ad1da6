//! Battle entity container.
//!
//! The battle simulation itself is not wired up yet; this module is the data
//! shell the future simulation will run against. Entities are created
//! through an injected factory so gameplay code never constructs them
//! directly.

use crate::masterdata::{BossParams, PlayerParams};
use crate::session::BattlePhase;

#[derive(Debug, Clone)]
pub struct Player {
    pub hp: i32,
    pub max_hp: i32,
    pub move_speed: f32,
}

/// The support robot flying alongside the player.
#[derive(Debug, Clone)]
pub struct Robot {
    pub fire_interval_secs: f32,
}

#[derive(Debug, Clone)]
pub struct Boss {
    pub id: String,
    pub display_name: String,
    pub hp: i32,
    pub max_hp: i32,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub hp: i32,
}

#[derive(Debug, Clone)]
pub struct RobotBullet;

#[derive(Debug, Clone)]
pub struct EnemyBullet;

#[derive(Debug, Clone)]
pub struct ItemInstance;

/// Creates the battle entities for one stage.
pub trait BattleEntityFactory {
    fn create_player(&self) -> Player;
    fn create_robot(&self) -> Robot;
    fn create_boss(&self) -> Boss;
    fn create_enemy(&self) -> Enemy;
}

/// Factory built from master data tuning values.
pub struct StandardEntityFactory {
    player: PlayerParams,
    boss: BossParams,
}

impl StandardEntityFactory {
    pub fn new(player: PlayerParams, boss: BossParams) -> Self {
        Self { player, boss }
    }
}

impl BattleEntityFactory for StandardEntityFactory {
    fn create_player(&self) -> Player {
        Player {
            hp: self.player.max_hp,
            max_hp: self.player.max_hp,
            move_speed: self.player.move_speed,
        }
    }

    fn create_robot(&self) -> Robot {
        Robot {
            fire_interval_secs: self.player.fire_interval_secs,
        }
    }

    fn create_boss(&self) -> Boss {
        Boss {
            id: self.boss.id.clone(),
            display_name: self.boss.display_name.clone(),
            hp: self.boss.max_hp,
            max_hp: self.boss.max_hp,
        }
    }

    fn create_enemy(&self) -> Enemy {
        Enemy { hp: 1 }
    }
}

/// Inert container for the entities of one battle.
#[derive(Default)]
pub struct BattleContext {
    pub phase: BattlePhase,
    pub player: Option<Player>,
    pub robot: Option<Robot>,
    pub boss: Option<Boss>,
    pub enemies: Vec<Enemy>,
    pub robot_bullets: Vec<RobotBullet>,
    pub enemy_bullets: Vec<EnemyBullet>,
    pub items: Vec<ItemInstance>,
}

impl BattleContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate entities for a fresh battle.
    pub fn setup(&mut self, factory: &dyn BattleEntityFactory) {
        self.phase = BattlePhase::BattleStart;
        self.player = Some(factory.create_player());
        self.robot = Some(factory.create_robot());
        self.boss = Some(factory.create_boss());
        self.enemies.clear();
        self.robot_bullets.clear();
        self.enemy_bullets.clear();
        self.items.clear();
    }

    /// Clear transient entities and restart from the boss boot phase.
    ///
    /// Player and boss vitals are deliberately left untouched: full retry
    /// semantics are still an open product question.
    pub fn reset_for_retry(&mut self) {
        self.phase = BattlePhase::BossBoot;
        self.enemies.clear();
        self.robot_bullets.clear();
        self.enemy_bullets.clear();
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory() -> StandardEntityFactory {
        StandardEntityFactory::new(
            PlayerParams {
                max_hp: 100,
                move_speed: 6.5,
                fire_interval_secs: 0.12,
            },
            BossParams {
                id: "boss_dredger".to_string(),
                display_name: "Dredger".to_string(),
                max_hp: 800,
                attack_sequence_id: "atk".to_string(),
            },
        )
    }

    #[test]
    fn setup_populates_entities_at_full_health() {
        let mut ctx = BattleContext::new();
        ctx.setup(&factory());

        assert_eq!(ctx.phase, BattlePhase::BattleStart);
        assert_eq!(ctx.player.as_ref().unwrap().hp, 100);
        assert_eq!(ctx.boss.as_ref().unwrap().hp, 800);
        assert!(ctx.enemies.is_empty());
    }

    #[test]
    fn retry_clears_transients_and_restarts_at_boss_boot() {
        let mut ctx = BattleContext::new();
        ctx.setup(&factory());
        ctx.enemies.push(Enemy { hp: 1 });
        ctx.enemy_bullets.push(EnemyBullet);
        ctx.items.push(ItemInstance);

        ctx.reset_for_retry();

        assert_eq!(ctx.phase, BattlePhase::BossBoot);
        assert!(ctx.enemies.is_empty());
        assert!(ctx.enemy_bullets.is_empty());
        assert!(ctx.items.is_empty());
        // Entities survive the retry.
        assert!(ctx.player.is_some());
        assert!(ctx.boss.is_some());
    }
}
