/// Combat narration glue — enemy registry, attack resolution, and the
/// textbox pages that narrate an attack's outcome.

use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::schema::enemy::{AnimationTrigger, AttackKind, AttackPattern, EnemyStats, StatusEffect};

#[derive(Debug, Error)]
pub enum CombatError {
    #[error("unknown enemy: {0}")]
    UnknownEnemy(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// All loaded enemy stat blocks, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct EnemyRegistry {
    enemies: FxHashMap<String, EnemyStats>,
}

// RON deserialization helper — the file keys enemies by name, so the
// stat block itself carries no name field.

#[derive(Debug, Deserialize)]
#[serde(rename = "Enemy")]
struct RonEnemy {
    display_name: String,
    hp: i32,
    exp: i32,
    #[serde(default)]
    armor_class: i32,
    damage: i32,
    #[serde(default)]
    freeze_chance: f32,
    pattern: AttackPattern,
}

impl EnemyRegistry {
    pub fn new() -> Self {
        Self {
            enemies: FxHashMap::default(),
        }
    }

    pub fn register(&mut self, stats: EnemyStats) {
        self.enemies.insert(stats.name.clone(), stats);
    }

    pub fn get(&self, name: &str) -> Option<&EnemyStats> {
        self.enemies.get(name)
    }

    /// Like [`EnemyRegistry::get`] but with a caller-facing error.
    pub fn resolve(&self, name: &str) -> Result<&EnemyStats, CombatError> {
        self.enemies
            .get(name)
            .ok_or_else(|| CombatError::UnknownEnemy(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    /// Load an enemy registry from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<EnemyRegistry, CombatError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse an enemy registry from a RON string.
    pub fn parse_ron(input: &str) -> Result<EnemyRegistry, CombatError> {
        let raw: FxHashMap<String, RonEnemy> = ron::from_str(input)?;
        let mut registry = EnemyRegistry::new();
        for (name, e) in raw {
            registry.register(EnemyStats {
                name,
                display_name: e.display_name,
                hp: e.hp,
                exp: e.exp,
                armor_class: e.armor_class,
                damage: e.damage,
                freeze_chance: e.freeze_chance,
                pattern: e.pattern,
            });
        }
        Ok(registry)
    }

    /// Merge another registry into this one. Entries from `other`
    /// override entries in `self` with the same name.
    pub fn merge(&mut self, other: EnemyRegistry) {
        for (name, stats) in other.enemies {
            self.enemies.insert(name, stats);
        }
    }
}

/// Everything the turn controller needs after an enemy attack lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackOutcome {
    pub damage_dealt: i32,
    pub status: Option<StatusEffect>,
    pub animation: AnimationTrigger,
}

/// Resolve one enemy attack into damage, status, and animation trigger.
pub fn resolve_attack(kind: AttackKind, stats: &EnemyStats) -> AttackOutcome {
    AttackOutcome {
        damage_dealt: kind.damage_dealt(stats.damage),
        status: kind.status(),
        animation: kind.animation(),
    }
}

impl AttackOutcome {
    /// The textbox pages narrating this outcome, one page for the damage
    /// line and one more when a status effect landed.
    pub fn narration(&self) -> Vec<String> {
        let mut pages = vec![format!(
            "You took <<b>>{}<</b>> damage!",
            self.damage_dealt
        )];
        if let Some(status) = self.status {
            pages.push(status_line(status).to_string());
        }
        pages
    }
}

fn status_line(status: StatusEffect) -> &'static str {
    match status {
        StatusEffect::Poisoned => "You have been <<i>>poisoned<</i>>!",
        StatusEffect::Confused => "You feel <<i>>confused<</i>>...",
        StatusEffect::Frozen => "You are frozen solid!",
    }
}
