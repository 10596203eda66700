use std::collections::HashMap;

use bevy_ecs::prelude::*;
use glam::{Mat4, Quat, Vec3};

/// Guards the parent walk against accidental cycles in the hierarchy.
const MAX_HIERARCHY_DEPTH: usize = 256;

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self {
            translation: Vec3::new(x, y, z),
            ..Default::default()
        }
    }

    /// Rotates the object around the Y axis (Global Up)
    pub fn rotate_y(&mut self, angle_radians: f32) {
        let rotation = Quat::from_rotation_y(angle_radians);
        self.rotation = self.rotation * rotation;
    }

    // --- Matrices ---

    /// Creates the Model Matrix (Local -> Parent)
    pub fn compute_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// Scene-graph link to the parent node. Non-owning: despawning the parent
/// leaves a dangling id that the propagation treats as "no world transform".
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parent(pub Entity);

/// Local -> World matrix, rewritten every frame by [`transform_propagation_system`].
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct GlobalTransform(pub Mat4);

impl Default for GlobalTransform {
    fn default() -> Self {
        Self(Mat4::IDENTITY)
    }
}

impl GlobalTransform {
    pub fn translation(&self) -> Vec3 {
        self.0.w_axis.truncate()
    }
}

/// Anything that can answer "what is the world matrix of this node".
/// Lights only hold an `Entity`, the lookup goes through this trait.
pub trait WorldTransforms {
    fn world_matrix(&self, node: Entity) -> Option<Mat4>;
}

impl<'w, 's, 'a> WorldTransforms for Query<'w, 's, &'a GlobalTransform> {
    fn world_matrix(&self, node: Entity) -> Option<Mat4> {
        self.get(node).ok().map(|global| global.0)
    }
}

impl WorldTransforms for World {
    fn world_matrix(&self, node: Entity) -> Option<Mat4> {
        self.get::<GlobalTransform>(node).map(|global| global.0)
    }
}

impl WorldTransforms for HashMap<Entity, Mat4> {
    fn world_matrix(&self, node: Entity) -> Option<Mat4> {
        self.get(&node).copied()
    }
}

/// Walks the parent chain of `entity` and composes the local matrices.
/// Returns `None` if any link is missing a `Transform` or the chain is too deep.
pub fn compute_world_matrix(
    entity: Entity,
    locals: &Query<(&Transform, Option<&Parent>)>,
) -> Option<Mat4> {
    let mut matrix = Mat4::IDENTITY;
    let mut current = Some(entity);
    let mut depth = 0;

    while let Some(node) = current {
        let (transform, parent) = locals.get(node).ok()?;
        matrix = transform.compute_matrix() * matrix;
        current = parent.map(|p| p.0);

        depth += 1;
        if depth > MAX_HIERARCHY_DEPTH {
            log::warn!("Hierarchy above {entity:?} is deeper than {MAX_HIERARCHY_DEPTH}, cycle?");
            return None;
        }
    }

    Some(matrix)
}

pub fn transform_propagation_system(
    mut globals: Query<(Entity, &mut GlobalTransform)>,
    locals: Query<(&Transform, Option<&Parent>)>,
) {
    for (entity, mut global) in &mut globals {
        match compute_world_matrix(entity, &locals) {
            Some(matrix) => {
                if global.0 != matrix {
                    global.0 = matrix;
                }
            }
            None => log::trace!("No world transform for {entity:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn propagate(world: &mut World) {
        let mut schedule = Schedule::default();
        schedule.add_systems(transform_propagation_system);
        schedule.run(world);
    }

    #[test]
    fn child_inherits_parent_translation() {
        let mut world = World::new();
        let parent = world
            .spawn((Transform::from_xyz(10.0, 0.0, 0.0), GlobalTransform::default()))
            .id();
        let child = world
            .spawn((
                Transform::from_xyz(0.0, 5.0, 0.0),
                GlobalTransform::default(),
                Parent(parent),
            ))
            .id();

        propagate(&mut world);

        let global = world.get::<GlobalTransform>(child).unwrap();
        assert_eq!(global.translation(), Vec3::new(10.0, 5.0, 0.0));
        assert_eq!(world.world_matrix(parent).unwrap().w_axis.x, 10.0);
    }

    #[test]
    fn parent_rotation_moves_child() {
        let mut world = World::new();
        let parent = world
            .spawn((
                Transform { rotation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_2), ..Default::default() },
                GlobalTransform::default(),
            ))
            .id();
        let child = world
            .spawn((
                Transform::from_xyz(0.0, 0.0, 1.0),
                GlobalTransform::default(),
                Parent(parent),
            ))
            .id();

        propagate(&mut world);

        let position = world.get::<GlobalTransform>(child).unwrap().translation();
        assert!((position - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn dangling_parent_keeps_previous_matrix() {
        let mut world = World::new();
        let parent = world.spawn(Transform::default()).id();
        let child = world
            .spawn((Transform::from_xyz(1.0, 1.0, 1.0), GlobalTransform::default(), Parent(parent)))
            .id();
        world.despawn(parent);

        propagate(&mut world);

        assert_eq!(
            world.get::<GlobalTransform>(child).copied(),
            Some(GlobalTransform::default())
        );
    }

    #[test]
    fn map_lookup() {
        let mut world = World::new();
        let node = world.spawn_empty().id();
        let mut map = HashMap::new();
        map.insert(node, Mat4::from_translation(Vec3::X));

        assert_eq!(map.world_matrix(node), Some(Mat4::from_translation(Vec3::X)));
    }
}
