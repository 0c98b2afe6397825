//! Combatants and the encounter inputs handed to the combat engine.
//!
//! None of these are owned by the engine: the session orchestrator builds
//! them from its own character and encounter records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::ChallengeRating;
use crate::{CharacterId, CombatId, CombatantId, SessionId};

/// Which side of the table controls a combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatantKind {
    PlayerCharacter,
    Npc,
}

impl fmt::Display for CombatantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlayerCharacter => write!(f, "player_character"),
            Self::Npc => write!(f, "npc"),
        }
    }
}

impl FromStr for CombatantKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "player_character" | "pc" | "player" => Ok(Self::PlayerCharacter),
            "npc" | "monster" | "enemy" => Ok(Self::Npc),
            other => Err(DomainError::parse(format!("Unknown combatant kind: {}", other))),
        }
    }
}

/// A participant in a combat, as seen at the moment the engine is invoked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combatant {
    pub id: CombatantId,
    pub kind: CombatantKind,
    pub name: String,
    pub current_hp: i32,
    pub max_hp: i32,
    /// Dexterity modifier, the base of every initiative bonus.
    #[serde(default)]
    pub dexterity_modifier: i32,
}

impl Combatant {
    pub fn new(kind: CombatantKind, name: impl Into<String>, max_hp: i32) -> Self {
        Self {
            id: CombatantId::new(),
            kind,
            name: name.into(),
            current_hp: max_hp,
            max_hp,
            dexterity_modifier: 0,
        }
    }

    pub fn player(name: impl Into<String>, max_hp: i32) -> Self {
        Self::new(CombatantKind::PlayerCharacter, name, max_hp)
    }

    pub fn npc(name: impl Into<String>, max_hp: i32) -> Self {
        Self::new(CombatantKind::Npc, name, max_hp)
    }

    pub fn with_dexterity_modifier(mut self, modifier: i32) -> Self {
        self.dexterity_modifier = modifier;
        self
    }

    pub fn with_current_hp(mut self, hp: i32) -> Self {
        self.current_hp = hp;
        self
    }

    pub fn is_down(&self) -> bool {
        self.current_hp <= 0
    }
}

/// Snapshot of a party member for auto-resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyMember {
    pub character_id: CharacterId,
    pub name: String,
    pub level: u32,
    pub max_hp: i32,
}

impl PartyMember {
    pub fn new(name: impl Into<String>, level: u32, max_hp: i32) -> Self {
        Self {
            character_id: CharacterId::new(),
            name: name.into(),
            level,
            max_hp,
        }
    }
}

/// One group of identical enemies in an encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyInfo {
    pub name: String,
    /// Raw CR token, e.g. "1/4" or "5".
    pub challenge_rating: String,
    pub count: u32,
}

impl EnemyInfo {
    pub fn new(name: impl Into<String>, challenge_rating: impl Into<String>, count: u32) -> Self {
        Self {
            name: name.into(),
            challenge_rating: challenge_rating.into(),
            count,
        }
    }

    pub fn challenge_rating(&self) -> ChallengeRating {
        ChallengeRating::parse(&self.challenge_rating)
    }
}

/// A finished (or in-progress) detailed combat handed to the analytics pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatState {
    pub id: CombatId,
    pub session_id: SessionId,
    /// Round the combat ended on.
    pub round: u32,
    /// Everyone still on the roster when the combat ended, alive or not.
    pub combatants: Vec<Combatant>,
}

impl CombatState {
    pub fn new(session_id: SessionId, round: u32, combatants: Vec<Combatant>) -> Self {
        Self {
            id: CombatId::new(),
            session_id,
            round,
            combatants,
        }
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id == id)
    }
}
