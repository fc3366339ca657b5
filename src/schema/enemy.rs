use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Stat block for one enemy kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyStats {
    pub name: String,
    pub display_name: String,
    pub hp: i32,
    pub exp: i32,
    #[serde(default)]
    pub armor_class: i32,
    pub damage: i32,
    /// Chance (0.0..1.0) that a freeze attempt against this enemy lands.
    #[serde(default)]
    pub freeze_chance: f32,
    pub pattern: AttackPattern,
}

/// One attack an enemy can make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackKind {
    Normal,
    Poison,
    Confusion,
}

impl AttackKind {
    /// Damage dealt for a given base damage stat.
    pub fn damage_dealt(&self, base_damage: i32) -> i32 {
        match self {
            Self::Normal => base_damage,
            Self::Poison => base_damage / 2,
            Self::Confusion => (base_damage as f32 * 0.75).round() as i32,
        }
    }

    /// Status effect this attack applies to the player, if any.
    pub fn status(&self) -> Option<StatusEffect> {
        match self {
            Self::Normal => None,
            Self::Poison => Some(StatusEffect::Poisoned),
            Self::Confusion => Some(StatusEffect::Confused),
        }
    }

    /// Animator trigger fired alongside this attack.
    pub fn animation(&self) -> AnimationTrigger {
        match self {
            Self::Normal => AnimationTrigger::Attack,
            Self::Poison | Self::Confusion => AnimationTrigger::AttackAlt,
        }
    }
}

/// A lingering condition on the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusEffect {
    Poisoned,
    Confused,
    Frozen,
}

/// Named trigger handed to the external animator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationTrigger {
    Attack,
    AttackAlt,
}

impl AnimationTrigger {
    /// Returns the trigger name the animator expects.
    pub fn trigger_name(&self) -> &'static str {
        match self {
            Self::Attack => "Attack",
            Self::AttackAlt => "Attack2",
        }
    }
}

/// How an enemy chooses its next attack.
///
/// Dispatched as data by the turn controller, a tagged union rather than
/// a subclass-per-enemy hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AttackPattern {
    /// Always the same attack.
    Fixed(AttackKind),
    /// Walks a list in order, wrapping around.
    Cycle {
        attacks: Vec<AttackKind>,
        #[serde(skip)]
        next: usize,
    },
    /// Uniform pick from a list.
    Random(Vec<AttackKind>),
}

impl AttackPattern {
    /// The attack this enemy makes this turn. An empty pattern falls back
    /// to a plain attack.
    pub fn next(&mut self, rng: &mut StdRng) -> AttackKind {
        match self {
            Self::Fixed(kind) => *kind,
            Self::Cycle { attacks, next } => {
                if attacks.is_empty() {
                    return AttackKind::Normal;
                }
                let kind = attacks[*next % attacks.len()];
                *next = (*next + 1) % attacks.len();
                kind
            }
            Self::Random(attacks) => {
                if attacks.is_empty() {
                    return AttackKind::Normal;
                }
                attacks[rng.gen_range(0..attacks.len())]
            }
        }
    }
}
