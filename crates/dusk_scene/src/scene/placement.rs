//! Procedural placement sequences
//!
//! A [`PlacementRule`] describes a finite row of placements: every step the
//! scale shrinks by a fixed factor and the translation advances by a step
//! vector whose components decay independently. The rule is plain data, so
//! the generated transforms can be checked without emitting anything.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Transformation, Vec3};

/// Declarative row of placements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementRule {
    /// First placement
    pub initial: Transformation,
    /// Scale multiplier applied once per step
    pub scale_decay: f32,
    /// Translation step before decay
    pub step: Vec3,
    /// Per-component multiplier applied to the step before it is added
    pub step_decay: Vec3,
    /// Number of placements
    pub count: usize,
}

impl Default for PlacementRule {
    fn default() -> Self {
        Self {
            initial: Transformation::default(),
            scale_decay: 1.0,
            step: Vec3::zeros(),
            step_decay: Vec3::new(1.0, 1.0, 1.0),
            count: 0,
        }
    }
}

impl PlacementRule {
    /// Create a rule with `count` placements starting at `initial`
    pub fn new(initial: Transformation, count: usize) -> Self {
        Self {
            initial,
            count,
            ..Self::default()
        }
    }

    /// Set the per-step scale multiplier
    pub fn with_scale_decay(mut self, scale_decay: f32) -> Self {
        self.scale_decay = scale_decay;
        self
    }

    /// Set the translation step and its per-component decay
    pub fn with_step(mut self, step: Vec3, step_decay: Vec3) -> Self {
        self.step = step;
        self.step_decay = step_decay;
        self
    }

    /// Fresh iterator over the placements
    pub fn iter(&self) -> Placements {
        Placements {
            next: self.initial,
            step: self.step,
            scale_decay: self.scale_decay,
            step_decay: self.step_decay,
            remaining: self.count,
        }
    }
}

impl<'a> IntoIterator for &'a PlacementRule {
    type Item = Transformation;
    type IntoIter = Placements;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator produced by [`PlacementRule::iter`]
#[derive(Debug, Clone)]
pub struct Placements {
    next: Transformation,
    step: Vec3,
    scale_decay: f32,
    step_decay: Vec3,
    remaining: usize,
}

impl Iterator for Placements {
    type Item = Transformation;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let current = self.next;
        self.next.scale *= self.scale_decay;
        self.step.component_mul_assign(&self.step_decay);
        self.next.translate += self.step;
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Placements {}
