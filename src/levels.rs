//! Level catalog
//!
//! Levels are described in canvas fractions so the same catalog works at
//! any canvas size. Rope lengths are in pixels.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::MAX_ROPES;

/// Errors raised while loading or validating a catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("level catalog JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("level catalog is empty")]
    Empty,
    #[error("level {level}: {field} must be a canvas fraction in [0, 1], got ({x}, {y})")]
    OutOfCanvas {
        level: usize,
        field: &'static str,
        x: f32,
        y: f32,
    },
    #[error("level {level}: rope {rope} length must be finite and > 0, got {length}")]
    BadRopeLength { level: usize, rope: usize, length: f32 },
    #[error("level {level}: needs between 1 and {max} ropes, got {count}", max = MAX_ROPES)]
    RopeCount { level: usize, count: usize },
}

/// A position in canvas fractions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FractionPoint {
    pub x: f32,
    pub y: f32,
}

impl FractionPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    fn in_unit_square(self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }
}

/// Fixed end of a rope plus its length in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RopeAnchor {
    pub x: f32,
    pub y: f32,
    pub length: f32,
}

impl RopeAnchor {
    pub const fn new(x: f32, y: f32, length: f32) -> Self {
        Self { x, y, length }
    }

    pub fn position(&self) -> FractionPoint {
        FractionPoint::new(self.x, self.y)
    }
}

/// Static description of one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    #[serde(default)]
    pub name: String,
    pub rope_anchors: Vec<RopeAnchor>,
    pub monster_position: FractionPoint,
    pub candy_start_position: FractionPoint,
}

impl Level {
    fn validate(&self, level: usize) -> Result<(), CatalogError> {
        let count = self.rope_anchors.len();
        if count == 0 || count > MAX_ROPES {
            return Err(CatalogError::RopeCount { level, count });
        }
        for (rope, anchor) in self.rope_anchors.iter().enumerate() {
            check_fraction(level, "rope anchor", anchor.position())?;
            if !(anchor.length.is_finite() && anchor.length > 0.0) {
                return Err(CatalogError::BadRopeLength {
                    level,
                    rope,
                    length: anchor.length,
                });
            }
        }
        check_fraction(level, "monster position", self.monster_position)?;
        check_fraction(level, "candy start position", self.candy_start_position)?;
        Ok(())
    }
}

fn check_fraction(level: usize, field: &'static str, p: FractionPoint) -> Result<(), CatalogError> {
    if p.in_unit_square() {
        Ok(())
    } else {
        Err(CatalogError::OutOfCanvas {
            level,
            field,
            x: p.x,
            y: p.y,
        })
    }
}

/// Ordered, validated list of levels
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelCatalog {
    levels: Vec<Level>,
}

impl LevelCatalog {
    /// Validate and wrap an ordered list of levels
    pub fn new(levels: Vec<Level>) -> Result<Self, CatalogError> {
        if levels.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (index, level) in levels.iter().enumerate() {
            level.validate(index)?;
        }
        Ok(Self { levels })
    }

    /// Load a catalog from a JSON array of levels
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let levels: Vec<Level> = serde_json::from_str(json)?;
        match Self::new(levels) {
            Ok(catalog) => {
                log::info!("Loaded level catalog ({} levels)", catalog.len());
                Ok(catalog)
            }
            Err(e) => {
                log::warn!("Rejected level catalog: {}", e);
                Err(e)
            }
        }
    }

    /// The catalog shipped with the game
    pub fn builtin() -> Self {
        Self {
            levels: builtin_levels(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn is_final(&self, index: usize) -> bool {
        index + 1 >= self.levels.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Level> {
        self.levels.iter()
    }
}

impl std::ops::Index<usize> for LevelCatalog {
    type Output = Level;

    fn index(&self, index: usize) -> &Level {
        &self.levels[index]
    }
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_levels() -> Vec<Level> {
    vec![
        Level {
            name: "First Bite".into(),
            rope_anchors: vec![RopeAnchor::new(0.5, 0.1, 150.0)],
            monster_position: FractionPoint::new(0.5, 0.85),
            candy_start_position: FractionPoint::new(0.5, 0.3),
        },
        Level {
            name: "Two Strings".into(),
            rope_anchors: vec![
                RopeAnchor::new(0.3, 0.1, 200.0),
                RopeAnchor::new(0.7, 0.1, 200.0),
            ],
            monster_position: FractionPoint::new(0.5, 0.85),
            candy_start_position: FractionPoint::new(0.5, 0.35),
        },
        Level {
            name: "Off Center".into(),
            rope_anchors: vec![
                RopeAnchor::new(0.2, 0.15, 180.0),
                RopeAnchor::new(0.45, 0.05, 250.0),
            ],
            monster_position: FractionPoint::new(0.3, 0.85),
            candy_start_position: FractionPoint::new(0.3, 0.35),
        },
        Level {
            name: "Triangle".into(),
            rope_anchors: vec![
                RopeAnchor::new(0.2, 0.1, 280.0),
                RopeAnchor::new(0.8, 0.1, 280.0),
                RopeAnchor::new(0.5, 0.05, 160.0),
            ],
            monster_position: FractionPoint::new(0.5, 0.8),
            candy_start_position: FractionPoint::new(0.5, 0.3),
        },
        Level {
            name: "Long Drop".into(),
            rope_anchors: vec![
                RopeAnchor::new(0.75, 0.05, 120.0),
                RopeAnchor::new(0.9, 0.2, 125.0),
                RopeAnchor::new(0.6, 0.2, 150.0),
            ],
            monster_position: FractionPoint::new(0.75, 0.9),
            candy_start_position: FractionPoint::new(0.75, 0.2),
        },
    ]
}
