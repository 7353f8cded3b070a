//! Graphics state stack
//!
//! Each frame holds the transform operations issued since the frame was
//! entered and the currently bound material. `begin` pushes a copy of the
//! current frame, `end` throws the current frame away and restores the saved
//! one, so whatever happens inside a scope is invisible after it closes.

use crate::foundation::math::{axis_angle_to_matrix, Mat4, Vec3};

use super::error::{SceneError, SceneResult};

/// The two kinds of scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// `AttributeBegin` / `AttributeEnd`
    Attribute,
    /// `ObjectBegin` / `ObjectEnd`, only used while defining a template
    Object,
}

impl ScopeKind {
    fn end_call(self) -> &'static str {
        match self {
            Self::Attribute => "AttributeEnd",
            Self::Object => "ObjectEnd",
        }
    }
}

/// A single transform call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformOp {
    /// Translation
    Translate(Vec3),
    /// Scale
    Scale(Vec3),
    /// Rotation in degrees around an axis
    Rotate {
        /// Angle in degrees
        degrees: f32,
        /// Rotation axis, not necessarily normalized
        axis: Vec3,
    },
}

impl TransformOp {
    /// Matrix of this single operation
    pub fn to_matrix(&self) -> Mat4 {
        match *self {
            Self::Translate(delta) => Mat4::new_translation(&delta),
            Self::Scale(factors) => Mat4::new_nonuniform_scaling(&factors),
            Self::Rotate { degrees, axis } => axis_angle_to_matrix(degrees, axis).to_homogeneous(),
        }
    }
}

/// One stack frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphicsState {
    /// Transform calls in issue order
    pub ops: Vec<TransformOp>,
    /// Bound material
    pub material: Option<String>,
}

impl GraphicsState {
    /// Cumulative transform, each call post-multiplied in issue order
    pub fn matrix(&self) -> Mat4 {
        self.ops.iter().fold(Mat4::identity(), |acc, op| acc * op.to_matrix())
    }
}

/// Stack of graphics state frames
#[derive(Debug, Default)]
pub struct GraphicsStateStack {
    current: GraphicsState,
    pushed: Vec<(ScopeKind, GraphicsState)>,
}

impl GraphicsStateStack {
    /// Create an empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a scope
    ///
    /// An object scope starts from an empty transform: calls made while a
    /// template is being defined belong to the template, not to the live
    /// transform instances are placed under. Object scopes do not nest.
    pub fn begin(&mut self, kind: ScopeKind) -> SceneResult<()> {
        if kind == ScopeKind::Object && self.in_object_definition() {
            return Err(SceneError::protocol("ObjectBegin called inside of an object definition"));
        }

        self.pushed.push((kind, self.current.clone()));
        if kind == ScopeKind::Object {
            self.current.ops.clear();
        }
        Ok(())
    }

    /// Close the innermost scope, which must be of `kind`
    pub fn end(&mut self, kind: ScopeKind) -> SceneResult<()> {
        match self.pushed.last() {
            None => Err(SceneError::protocol(format!("Unmatched {} encountered", kind.end_call()))),
            Some((open, _)) if *open != kind => Err(SceneError::protocol(format!(
                "{} does not close the innermost {:?} scope",
                kind.end_call(),
                open
            ))),
            Some(_) => {
                if let Some((_, saved)) = self.pushed.pop() {
                    self.current = saved;
                }
                Ok(())
            }
        }
    }

    /// Append a translation to the current frame
    pub fn translate(&mut self, delta: Vec3) {
        self.current.ops.push(TransformOp::Translate(delta));
    }

    /// Append a scale to the current frame
    pub fn scale(&mut self, factors: Vec3) {
        self.current.ops.push(TransformOp::Scale(factors));
    }

    /// Append a rotation to the current frame
    pub fn rotate(&mut self, degrees: f32, axis: Vec3) {
        self.current.ops.push(TransformOp::Rotate { degrees, axis });
    }

    /// Bind a material in the current frame
    pub fn bind_material(&mut self, name: impl Into<String>) {
        self.current.material = Some(name.into());
    }

    /// Current frame
    pub fn current(&self) -> &GraphicsState {
        &self.current
    }

    /// Currently bound material
    pub fn current_material(&self) -> Option<&str> {
        self.current.material.as_deref()
    }

    /// Cumulative transform of the current frame
    pub fn current_matrix(&self) -> Mat4 {
        self.current.matrix()
    }

    /// Number of open scopes
    pub fn depth(&self) -> usize {
        self.pushed.len()
    }

    /// Whether a template definition is open
    pub fn in_object_definition(&self) -> bool {
        self.pushed.iter().any(|(kind, _)| *kind == ScopeKind::Object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_end_restores_state_at_any_depth() {
        let mut stack = GraphicsStateStack::new();
        stack.translate(Vec3::new(1.0, 2.0, 3.0));
        stack.bind_material("Bark");

        let mut snapshots = Vec::new();
        for depth in 0..5u8 {
            snapshots.push(stack.current().clone());
            stack.begin(ScopeKind::Attribute).unwrap();
            stack.scale(Vec3::new(2.0, 2.0, 2.0));
            stack.rotate(f32::from(depth) * 10.0, Vec3::new(0.0, 0.0, 1.0));
            stack.bind_material(format!("material-{depth}"));
        }

        while let Some(expected) = snapshots.pop() {
            stack.end(ScopeKind::Attribute).unwrap();
            assert_eq!(stack.current(), &expected);
        }
        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.current_material(), Some("Bark"));
    }

    #[test]
    fn test_unmatched_end_is_protocol_violation() {
        let mut stack = GraphicsStateStack::new();

        assert!(matches!(stack.end(ScopeKind::Attribute), Err(SceneError::Protocol(_))));
        assert!(matches!(stack.end(ScopeKind::Object), Err(SceneError::Protocol(_))));
    }

    #[test]
    fn test_end_must_match_scope_kind() {
        let mut stack = GraphicsStateStack::new();
        stack.begin(ScopeKind::Object).unwrap();
        stack.begin(ScopeKind::Attribute).unwrap();

        assert!(matches!(stack.end(ScopeKind::Object), Err(SceneError::Protocol(_))));
        assert_eq!(stack.depth(), 2);

        stack.end(ScopeKind::Attribute).unwrap();
        stack.end(ScopeKind::Object).unwrap();
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_object_scopes_do_not_nest() {
        let mut stack = GraphicsStateStack::new();
        stack.begin(ScopeKind::Object).unwrap();
        stack.begin(ScopeKind::Attribute).unwrap();

        assert!(stack.in_object_definition());
        assert!(matches!(stack.begin(ScopeKind::Object), Err(SceneError::Protocol(_))));
    }

    #[test]
    fn test_object_scope_starts_from_empty_transform() {
        let mut stack = GraphicsStateStack::new();
        stack.translate(Vec3::new(0.0, 10.0, 0.0));

        stack.begin(ScopeKind::Object).unwrap();
        assert!(stack.current().ops.is_empty());
        stack.end(ScopeKind::Object).unwrap();

        assert_eq!(stack.current().ops, vec![TransformOp::Translate(Vec3::new(0.0, 10.0, 0.0))]);
    }

    #[test]
    fn test_cumulative_matrix_follows_issue_order() {
        let mut stack = GraphicsStateStack::new();
        stack.translate(Vec3::new(0.0, 0.0, -2.0));
        stack.scale(Vec3::new(5.0, 5.0, 5.0));
        stack.rotate(90.0, Vec3::new(1.0, 0.0, 0.0));

        let expected = crate::foundation::math::Transformation::from_translation(Vec3::new(0.0, 0.0, -2.0))
            .with_uniform_scale(5.0)
            .with_rotation(90.0, Vec3::new(1.0, 0.0, 0.0))
            .to_matrix();
        assert_relative_eq!(stack.current_matrix(), expected, epsilon = 1e-5);
    }
}
