//! Oriented-box corner extraction and cardinal direction resolution.
//!
//! Everything here is pure: it reads a transform and returns values.

use std::fmt;

use glam::Vec3;

use crate::ecs::components::transform::Transform;

/// Corner of a box collider, named in the box's own frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoxCorner {
    UpperBackLeft,
    UpperBackRight,
    UpperForwardLeft,
    UpperForwardRight,
    LowerBackLeft,
    LowerBackRight,
    LowerForwardLeft,
    LowerForwardRight,
}

impl BoxCorner {
    pub const ALL: [BoxCorner; 8] = [
        BoxCorner::UpperBackLeft,
        BoxCorner::UpperBackRight,
        BoxCorner::UpperForwardLeft,
        BoxCorner::UpperForwardRight,
        BoxCorner::LowerBackLeft,
        BoxCorner::LowerBackRight,
        BoxCorner::LowerForwardLeft,
        BoxCorner::LowerForwardRight,
    ];

    /// Sign of the corner along local (x, y, z).
    pub fn signs(self) -> Vec3 {
        match self {
            BoxCorner::UpperBackLeft => Vec3::new(-1.0, 1.0, -1.0),
            BoxCorner::UpperBackRight => Vec3::new(1.0, 1.0, -1.0),
            BoxCorner::UpperForwardLeft => Vec3::new(-1.0, 1.0, 1.0),
            BoxCorner::UpperForwardRight => Vec3::new(1.0, 1.0, 1.0),
            BoxCorner::LowerBackLeft => Vec3::new(-1.0, -1.0, -1.0),
            BoxCorner::LowerBackRight => Vec3::new(1.0, -1.0, -1.0),
            BoxCorner::LowerForwardLeft => Vec3::new(-1.0, -1.0, 1.0),
            BoxCorner::LowerForwardRight => Vec3::new(1.0, -1.0, 1.0),
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// The 8 world-space corners of a target's box collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedBoxVertices {
    corners: [Vec3; 8],
}

impl OrientedBoxVertices {
    #[inline]
    pub fn corner(&self, corner: BoxCorner) -> Vec3 {
        self.corners[corner.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (BoxCorner, Vec3)> + '_ {
        BoxCorner::ALL.iter().map(move |c| (*c, self.corner(*c)))
    }

    /// Lower-back-left to upper-back-left.
    pub fn vertical_edge(&self) -> Vec3 {
        self.corner(BoxCorner::UpperBackLeft) - self.corner(BoxCorner::LowerBackLeft)
    }

    /// Extent along the box's local X (left to right).
    pub fn width(&self) -> f32 {
        (self.corner(BoxCorner::LowerBackRight) - self.corner(BoxCorner::LowerBackLeft)).length()
    }

    /// Extent along the box's local Z (back to forward).
    pub fn depth(&self) -> f32 {
        (self.corner(BoxCorner::LowerForwardLeft) - self.corner(BoxCorner::LowerBackLeft))
            .length()
    }

    /// Extent along the box's local Y.
    pub fn height(&self) -> f32 {
        self.vertical_edge().length()
    }
}

/// Compute the world-space corners of a box collider.
///
/// `half_extents` are the collider's local half extents. The engine reports
/// bounds already multiplied by the transform's scale; those are divided back
/// by the per-axis scale and then pushed through translation and rotation
/// only, so the result does not depend on `transform.scale`. An axis with zero
/// scale keeps its local extent.
pub fn compute_oriented_box_vertices(
    transform: &Transform,
    half_extents: Vec3,
) -> OrientedBoxVertices {
    let scale = transform.scale;
    let bounds_extents = half_extents * scale.abs();
    let safe = |extent: f32, s: f32, local: f32| {
        if s != 0.0 {
            extent / s.abs()
        } else {
            local
        }
    };
    let extents = Vec3::new(
        safe(bounds_extents.x, scale.x, half_extents.x),
        safe(bounds_extents.y, scale.y, half_extents.y),
        safe(bounds_extents.z, scale.z, half_extents.z),
    );

    let mat = transform.to_rigid_matrix();
    let mut corners = [Vec3::ZERO; 8];
    for corner in BoxCorner::ALL {
        corners[corner.index()] = mat.transform_point3(extents * corner.signs());
    }

    OrientedBoxVertices { corners }
}

/// Which way a push moves the target, relative to the target's own axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CardinalDirection {
    #[default]
    TargetForward,
    TargetBack,
    TargetRight,
    TargetLeft,
}

impl CardinalDirection {
    pub fn opposite(self) -> Self {
        match self {
            CardinalDirection::TargetForward => CardinalDirection::TargetBack,
            CardinalDirection::TargetBack => CardinalDirection::TargetForward,
            CardinalDirection::TargetRight => CardinalDirection::TargetLeft,
            CardinalDirection::TargetLeft => CardinalDirection::TargetRight,
        }
    }

    /// World-space unit vector for this direction on `target`.
    pub fn world_vector(self, target: &Transform) -> Vec3 {
        match self {
            CardinalDirection::TargetForward => target.forward(),
            CardinalDirection::TargetBack => -target.forward(),
            CardinalDirection::TargetRight => target.right(),
            CardinalDirection::TargetLeft => -target.right(),
        }
    }

    /// Whether this direction runs along the target's local Z axis.
    pub fn is_longitudinal(self) -> bool {
        matches!(
            self,
            CardinalDirection::TargetForward | CardinalDirection::TargetBack
        )
    }
}

impl fmt::Display for CardinalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CardinalDirection::TargetForward => "TargetForward",
            CardinalDirection::TargetBack => "TargetBack",
            CardinalDirection::TargetRight => "TargetRight",
            CardinalDirection::TargetLeft => "TargetLeft",
        };
        f.write_str(name)
    }
}

/// Pick the target axis best aligned with the actor's forward vector.
///
/// Returns the candidate whose dot product is strictly greater than the other
/// three. Exact ties (a target turned 45 degrees) resolve to `TargetForward`.
pub fn resolve_cardinal_direction(
    actor_forward: Vec3,
    target_forward: Vec3,
    target_right: Vec3,
) -> CardinalDirection {
    let candidates = [
        (
            CardinalDirection::TargetForward,
            actor_forward.dot(target_forward),
        ),
        (
            CardinalDirection::TargetBack,
            actor_forward.dot(-target_forward),
        ),
        (
            CardinalDirection::TargetRight,
            actor_forward.dot(target_right),
        ),
        (
            CardinalDirection::TargetLeft,
            actor_forward.dot(-target_right),
        ),
    ];

    candidates
        .iter()
        .find(|(dir, score)| {
            candidates
                .iter()
                .filter(|(other, _)| other != dir)
                .all(|(_, other_score)| score > other_score)
        })
        .map_or(CardinalDirection::TargetForward, |(dir, _)| *dir)
}
