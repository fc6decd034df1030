use glam::{Vec3, Vec4};

use crate::math::bounds::AABB;
use crate::scene_graph::object3d::ObjectId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HelperId(pub(crate) u32);

/// Auxiliary line geometry drawn on top of the scene. Helpers never take
/// part in picking.
#[derive(Debug, Clone)]
pub enum Helper {
    Grid {
        size: f32,
        divisions: u32,
        color: Vec4,
    },
    BoundingBox {
        target: ObjectId,
        bounds: AABB,
        color: Vec4,
    },
}

impl Helper {
    pub fn bounding_box(target: ObjectId, bounds: AABB) -> Self {
        Helper::BoundingBox {
            target,
            bounds,
            color: Vec4::new(1.0, 1.0, 0.0, 1.0),
        }
    }

    /// Appends the helper's segments to `out` as (start, end, color).
    pub fn line_segments(&self, out: &mut Vec<(Vec3, Vec3, Vec4)>) {
        match self {
            Helper::Grid {
                size,
                divisions,
                color,
            } => {
                let divisions = (*divisions).max(1);
                let half = size * 0.5;
                let step = size / divisions as f32;

                for i in 0..=divisions {
                    let offset = -half + step * i as f32;
                    out.push((
                        Vec3::new(offset, 0.0, -half),
                        Vec3::new(offset, 0.0, half),
                        *color,
                    ));
                    out.push((
                        Vec3::new(-half, 0.0, offset),
                        Vec3::new(half, 0.0, offset),
                        *color,
                    ));
                }
            }
            Helper::BoundingBox { bounds, color, .. } => {
                if bounds.is_empty() {
                    return;
                }

                for (start, end) in bounds.edges() {
                    out.push((start, end, *color));
                }
            }
        }
    }
}
