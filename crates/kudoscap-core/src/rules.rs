//! Restriction rules: which block kinds are level-gated and at what threshold.
//!
//! A block kind maps to at most one rule, so evaluation never has to order
//! rules against each other. The only secondary condition is the tool
//! requirement inside the spawner rule.

use crate::actor::{BlockKind, HeldTool, ItemKind};
use crate::config::KudosConfig;
use crate::messaging::{Messages, RichText};
use serde::{Deserialize, Serialize};

/// Resource groups that carry a restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestrictedResource {
    /// Diamond ore, both variants.
    HighValueOre,
    /// Ancient debris.
    RareResource,
    /// Spawners; also need silk touch.
    SpecialContainer,
}

impl RestrictedResource {
    pub fn classify(block: &BlockKind) -> Option<Self> {
        match block {
            BlockKind::DiamondOre | BlockKind::DeepslateDiamondOre => Some(Self::HighValueOre),
            BlockKind::AncientDebris => Some(Self::RareResource),
            BlockKind::Spawner => Some(Self::SpecialContainer),
            BlockKind::Other(_) => None,
        }
    }

    /// Item that a leaked break of this resource leaves on the ground.
    pub fn residue(self) -> ItemKind {
        match self {
            Self::HighValueOre => ItemKind::Diamond,
            Self::RareResource => ItemKind::AncientDebris,
            Self::SpecialContainer => ItemKind::Spawner,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::HighValueOre => "diamond ore",
            Self::RareResource => "ancient debris",
            Self::SpecialContainer => "spawner",
        }
    }
}

/// Extra condition beyond the level threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolRequirement {
    SilkTouch,
}

impl ToolRequirement {
    pub fn satisfied_by(self, tool: &HeldTool) -> bool {
        match self {
            Self::SilkTouch => tool.silk_touch,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestrictionRule {
    pub resource: RestrictedResource,
    pub required_level: u32,
    pub tool: Option<ToolRequirement>,
    /// Denial message with the threshold already substituted.
    pub message: RichText,
}

/// How a rule was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    LevelTooLow,
    MissingTool,
}

impl RestrictionRule {
    /// `None` if the actor satisfies the rule. Level is checked before the tool.
    pub fn check(&self, level: u32, tool: &HeldTool) -> Option<Violation> {
        if level < self.required_level {
            return Some(Violation::LevelTooLow);
        }
        match self.tool {
            Some(req) if !req.satisfied_by(tool) => Some(Violation::MissingTool),
            _ => None,
        }
    }
}

/// Rules built from one configuration snapshot.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<RestrictionRule>,
}

impl RuleSet {
    pub fn from_config(config: &KudosConfig) -> Self {
        let r = &config.restrictions;
        let m = &config.messages;
        let messages = Messages::new(m);
        let rules = vec![
            RestrictionRule {
                resource: RestrictedResource::HighValueOre,
                required_level: r.diamond_level,
                tool: None,
                message: messages.templated(&m.diamond_restricted, "<diamond-level>", r.diamond_level),
            },
            RestrictionRule {
                resource: RestrictedResource::RareResource,
                required_level: r.debris_level,
                tool: None,
                message: messages.templated(&m.debris_restricted, "<debris-level>", r.debris_level),
            },
            RestrictionRule {
                resource: RestrictedResource::SpecialContainer,
                required_level: r.spawner_level,
                tool: Some(ToolRequirement::SilkTouch),
                message: messages.templated(&m.spawner_restricted, "<spawner-level>", r.spawner_level),
            },
        ];
        Self { rules }
    }

    pub fn rule_for(&self, block: &BlockKind) -> Option<&RestrictionRule> {
        let resource = RestrictedResource::classify(block)?;
        self.rules.iter().find(|rule| rule.resource == resource)
    }

    /// Every item kind cleanup may remove.
    pub fn residue_kinds(&self) -> Vec<ItemKind> {
        self.rules.iter().map(|rule| rule.resource.residue()).collect()
    }
}
