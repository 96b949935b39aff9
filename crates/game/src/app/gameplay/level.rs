use std::collections::HashMap;

use engine::physics::nalgebra;
use engine::physics::{
    point, vector, ActiveEvents, ColliderBuilder, ColliderHandle, Group, InteractionGroups,
    PhysicsWorld, RigidBodyBuilder, RigidBodyHandle, SpringJointBuilder,
};
use engine::{EntityId, RenderableDesc, RenderableKind, SceneWorld, Transform, Vec2};

use super::types::SurfaceTag;

// The course was authored against a 1200x600 px surface at 50 px per world
// unit, y flipped to point up.
pub(crate) const WORLD_WIDTH: f32 = 24.0;
pub(crate) const WORLD_HEIGHT: f32 = 12.0;

// Character proportions. Parts hang below the head; offsets are relative
// to the head center so the rig can be spawned anywhere.
const HEAD_RADIUS: f32 = 0.3;
pub(crate) const HEAD_SPAWN: [f32; 2] = [2.0, 6.0];
const TORSO_OFFSET: [f32; 2] = [0.0, -0.4];
const TORSO_HALF: [f32; 2] = [0.08, 0.4];
const UPPER_LEG_OFFSET: [f32; 2] = [0.0, -1.0];
const UPPER_LEG_HALF: [f32; 2] = [0.06, 0.3];
const SHAFT_OFFSET: [f32; 2] = [0.0, -1.8];
const SHAFT_HALF: [f32; 2] = [0.08, 0.6];
const SPRING_FOOT_OFFSET: [f32; 2] = [0.0, -2.4];
const SPRING_FOOT_RADIUS: f32 = 0.2;

// Densities keep the original 1:2:5 limb/shaft/foot mass ratio.
const LIMB_DENSITY: f32 = 1.0;
const SHAFT_DENSITY: f32 = 2.0;
const SPRING_FOOT_DENSITY: f32 = 5.0;
const SHAFT_FRICTION: f32 = 0.3;
const SPRING_FOOT_FRICTION: f32 = 0.5;
const SPRING_FOOT_RESTITUTION: f32 = 1.2;

// Spring joints: (rest length, stiffness). Stiffness ratios follow the
// original joint table; damping keeps the rig from ringing.
const HEAD_TORSO_SPRING: (f32, f32) = (0.1, 90.0);
const TORSO_LEG_SPRING: (f32, f32) = (0.2, 75.0);
const LEG_SHAFT_SPRING: (f32, f32) = (0.1, 105.0);
const SHAFT_FOOT_SPRING: (f32, f32) = (0.0, 135.0);
const JOINT_DAMPING: f32 = 6.0;

// Static course geometry: (center, half extents).
const GROUND: ([f32; 2], [f32; 2]) = ([8.0, 0.4], [8.0, 0.4]);
const PLATFORMS: [([f32; 2], [f32; 2]); 4] = [
    ([6.0, 3.0], [2.0, 0.2]),
    ([11.0, 4.4], [1.5, 0.2]),
    ([16.0, 5.6], [1.8, 0.2]),
    ([20.0, 7.0], [2.0, 0.2]),
];
const SPIKE_CIRCUMRADIUS: f32 = 0.4;
const SPIKE_POSITIONS: [[f32; 2]; 3] = [[9.0, 3.4], [13.0, 4.8], [18.0, 6.0]];
const GOAL_POLE: ([f32; 2], [f32; 2]) = ([22.0, 8.2], [0.1, 1.0]);
const GOAL_FLAG: ([f32; 2], [f32; 2]) = ([22.6, 8.8], [0.6, 0.4]);

const HEAD_COLOR: [u8; 4] = [255, 219, 172, 255];
const TORSO_COLOR: [u8; 4] = [255, 0, 0, 255];
const UPPER_LEG_COLOR: [u8; 4] = [0, 0, 255, 255];
const SHAFT_COLOR: [u8; 4] = [102, 102, 102, 255];
const SPRING_FOOT_COLOR: [u8; 4] = [255, 0, 0, 255];
const GROUND_COLOR: [u8; 4] = [139, 69, 19, 255];
const PLATFORM_COLOR: [u8; 4] = [101, 67, 33, 255];
const SPIKE_COLOR: [u8; 4] = [255, 0, 0, 255];
const GOAL_POLE_COLOR: [u8; 4] = [16, 16, 16, 255];
const GOAL_FLAG_COLOR: [u8; 4] = [0, 255, 0, 255];

// Rig colliders collide with the course but never with each other; the
// parts overlap at spawn by construction.
const WORLD_GROUP: Group = Group::GROUP_1;
const CHARACTER_GROUP: Group = Group::GROUP_2;

fn character_groups() -> InteractionGroups {
    InteractionGroups::new(CHARACTER_GROUP, WORLD_GROUP)
}

fn world_groups() -> InteractionGroups {
    InteractionGroups::new(WORLD_GROUP, Group::ALL)
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct CharacterRig {
    pub(crate) head: RigidBodyHandle,
    pub(crate) torso: RigidBodyHandle,
    pub(crate) upper_leg: RigidBodyHandle,
    pub(crate) shaft: RigidBodyHandle,
    pub(crate) spring_foot: RigidBodyHandle,
}

pub(crate) struct Level {
    pub(crate) rig: CharacterRig,
    pub(crate) surfaces: HashMap<ColliderHandle, SurfaceTag>,
    /// Body-to-render-entity pairing, walked every tick to sync transforms.
    pub(crate) body_entities: Vec<(RigidBodyHandle, EntityId)>,
    pub(crate) goal_x: f32,
}

/// Incrementally populates a physics world and its render twin. The fixed
/// course uses it from `build_level`; tests compose custom courses from the
/// same pieces.
pub(crate) struct LevelBuilder<'a> {
    physics: &'a mut PhysicsWorld,
    world: &'a mut SceneWorld,
    surfaces: HashMap<ColliderHandle, SurfaceTag>,
    body_entities: Vec<(RigidBodyHandle, EntityId)>,
}

impl<'a> LevelBuilder<'a> {
    pub(crate) fn new(physics: &'a mut PhysicsWorld, world: &'a mut SceneWorld) -> Self {
        Self {
            physics,
            world,
            surfaces: HashMap::new(),
            body_entities: Vec::new(),
        }
    }

    pub(crate) fn spawn_terrain_block(
        &mut self,
        center: [f32; 2],
        half_extents: [f32; 2],
        color: [u8; 4],
        debug_name: &'static str,
    ) {
        self.spawn_static_cuboid(center, half_extents, SurfaceTag::Terrain, false, color, debug_name);
    }

    pub(crate) fn spawn_goal_block(
        &mut self,
        center: [f32; 2],
        half_extents: [f32; 2],
        color: [u8; 4],
        debug_name: &'static str,
    ) {
        self.spawn_static_cuboid(center, half_extents, SurfaceTag::Goal, true, color, debug_name);
    }

    pub(crate) fn spawn_spike(&mut self, center: [f32; 2]) {
        let body = self
            .physics
            .insert_body(RigidBodyBuilder::fixed().translation(vector![center[0], center[1]]));
        let radius = SPIKE_CIRCUMRADIUS;
        let half_base = radius * 0.866_025_4;
        let collider = self.physics.attach_collider(
            ColliderBuilder::triangle(
                point![0.0, radius],
                point![-half_base, -0.5 * radius],
                point![half_base, -0.5 * radius],
            )
            .collision_groups(world_groups())
            .active_events(ActiveEvents::COLLISION_EVENTS),
            body,
        );
        self.surfaces.insert(collider, SurfaceTag::Spike);
        self.register_entity(
            body,
            center,
            RenderableKind::Triangle {
                circumradius: radius,
            },
            SPIKE_COLOR,
            "spike",
        );
    }

    pub(crate) fn spawn_character(&mut self, head_center: [f32; 2]) -> CharacterRig {
        let at = |offset: [f32; 2]| {
            [head_center[0] + offset[0], head_center[1] + offset[1]]
        };

        let head = self.spawn_rig_ball(
            head_center,
            HEAD_RADIUS,
            LIMB_DENSITY,
            None,
            SurfaceTag::Head,
            HEAD_COLOR,
            "head",
        );
        let torso = self.spawn_rig_cuboid(
            at(TORSO_OFFSET),
            TORSO_HALF,
            LIMB_DENSITY,
            None,
            TORSO_COLOR,
            "torso",
        );
        let upper_leg = self.spawn_rig_cuboid(
            at(UPPER_LEG_OFFSET),
            UPPER_LEG_HALF,
            LIMB_DENSITY,
            None,
            UPPER_LEG_COLOR,
            "upper_leg",
        );
        let shaft = self.spawn_rig_cuboid(
            at(SHAFT_OFFSET),
            SHAFT_HALF,
            SHAFT_DENSITY,
            Some(SHAFT_FRICTION),
            SHAFT_COLOR,
            "pogo_shaft",
        );
        let spring_foot = self.spawn_rig_ball(
            at(SPRING_FOOT_OFFSET),
            SPRING_FOOT_RADIUS,
            SPRING_FOOT_DENSITY,
            Some(SPRING_FOOT_FRICTION),
            SurfaceTag::Limb,
            SPRING_FOOT_COLOR,
            "spring_foot",
        );

        for (body_a, body_b, (rest_length, stiffness)) in [
            (head, torso, HEAD_TORSO_SPRING),
            (torso, upper_leg, TORSO_LEG_SPRING),
            (upper_leg, shaft, LEG_SHAFT_SPRING),
            (shaft, spring_foot, SHAFT_FOOT_SPRING),
        ] {
            self.physics.insert_joint(
                body_a,
                body_b,
                SpringJointBuilder::new(rest_length, stiffness, JOINT_DAMPING).build(),
            );
        }

        CharacterRig {
            head,
            torso,
            upper_leg,
            shaft,
            spring_foot,
        }
    }

    pub(crate) fn finish(self, rig: CharacterRig, goal_x: f32) -> Level {
        Level {
            rig,
            surfaces: self.surfaces,
            body_entities: self.body_entities,
            goal_x,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn spawn_rig_ball(
        &mut self,
        center: [f32; 2],
        radius: f32,
        density: f32,
        friction: Option<f32>,
        tag: SurfaceTag,
        color: [u8; 4],
        debug_name: &'static str,
    ) -> RigidBodyHandle {
        let body = self.physics.insert_body(
            RigidBodyBuilder::dynamic()
                .translation(vector![center[0], center[1]])
                .ccd_enabled(true),
        );
        let mut collider = ColliderBuilder::ball(radius)
            .density(density)
            .collision_groups(character_groups());
        if let Some(friction) = friction {
            collider = collider.friction(friction);
        }
        if tag == SurfaceTag::Head {
            collider = collider.active_events(ActiveEvents::COLLISION_EVENTS);
        } else {
            // The only non-head rig ball is the bouncy foot.
            collider = collider.restitution(SPRING_FOOT_RESTITUTION);
        }
        let collider = self.physics.attach_collider(collider, body);
        self.surfaces.insert(collider, tag);
        self.register_entity(body, center, RenderableKind::Circle { radius }, color, debug_name);
        body
    }

    #[allow(clippy::too_many_arguments)]
    fn spawn_rig_cuboid(
        &mut self,
        center: [f32; 2],
        half_extents: [f32; 2],
        density: f32,
        friction: Option<f32>,
        color: [u8; 4],
        debug_name: &'static str,
    ) -> RigidBodyHandle {
        let body = self.physics.insert_body(
            RigidBodyBuilder::dynamic().translation(vector![center[0], center[1]]),
        );
        let mut collider = ColliderBuilder::cuboid(half_extents[0], half_extents[1])
            .density(density)
            .collision_groups(character_groups());
        if let Some(friction) = friction {
            collider = collider.friction(friction);
        }
        let collider = self.physics.attach_collider(collider, body);
        self.surfaces.insert(collider, SurfaceTag::Limb);
        self.register_entity(
            body,
            center,
            RenderableKind::Rect {
                half_extents: Vec2 {
                    x: half_extents[0],
                    y: half_extents[1],
                },
            },
            color,
            debug_name,
        );
        body
    }

    fn spawn_static_cuboid(
        &mut self,
        center: [f32; 2],
        half_extents: [f32; 2],
        tag: SurfaceTag,
        wants_events: bool,
        color: [u8; 4],
        debug_name: &'static str,
    ) {
        let body = self
            .physics
            .insert_body(RigidBodyBuilder::fixed().translation(vector![center[0], center[1]]));
        let mut collider = ColliderBuilder::cuboid(half_extents[0], half_extents[1])
            .collision_groups(world_groups());
        if wants_events {
            collider = collider.active_events(ActiveEvents::COLLISION_EVENTS);
        }
        let collider = self.physics.attach_collider(collider, body);
        self.surfaces.insert(collider, tag);
        self.register_entity(
            body,
            center,
            RenderableKind::Rect {
                half_extents: Vec2 {
                    x: half_extents[0],
                    y: half_extents[1],
                },
            },
            color,
            debug_name,
        );
    }

    fn register_entity(
        &mut self,
        body: RigidBodyHandle,
        center: [f32; 2],
        kind: RenderableKind,
        color: [u8; 4],
        debug_name: &'static str,
    ) {
        let entity = self.world.spawn(
            Transform {
                position: Vec2 {
                    x: center[0],
                    y: center[1],
                },
                rotation_radians: 0.0,
            },
            RenderableDesc {
                kind,
                color,
                debug_name,
            },
        );
        self.body_entities.push((body, entity));
    }
}

/// Build the fixed course and character into the given worlds.
pub(crate) fn build_level(physics: &mut PhysicsWorld, world: &mut SceneWorld) -> Level {
    world.camera_mut().position = Vec2 {
        x: WORLD_WIDTH * 0.5,
        y: WORLD_HEIGHT * 0.5,
    };

    let mut builder = LevelBuilder::new(physics, world);
    builder.spawn_terrain_block(GROUND.0, GROUND.1, GROUND_COLOR, "ground");
    for (index, (center, half_extents)) in PLATFORMS.into_iter().enumerate() {
        let debug_name = ["platform_1", "platform_2", "platform_3", "platform_4"][index];
        builder.spawn_terrain_block(center, half_extents, PLATFORM_COLOR, debug_name);
    }
    for center in SPIKE_POSITIONS {
        builder.spawn_spike(center);
    }
    builder.spawn_goal_block(GOAL_POLE.0, GOAL_POLE.1, GOAL_POLE_COLOR, "goal_pole");
    builder.spawn_goal_block(GOAL_FLAG.0, GOAL_FLAG.1, GOAL_FLAG_COLOR, "goal_flag");
    let rig = builder.spawn_character(HEAD_SPAWN);
    builder.finish(rig, GOAL_POLE.0[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn built_level() -> (PhysicsWorld, SceneWorld, Level) {
        let mut physics = PhysicsWorld::new(-9.81);
        let mut world = SceneWorld::default();
        let level = build_level(&mut physics, &mut world);
        world.apply_pending();
        (physics, world, level)
    }

    #[test]
    fn course_has_expected_surface_tags() {
        let (_, _, level) = built_level();

        let count_of = |tag: SurfaceTag| {
            level
                .surfaces
                .values()
                .filter(|candidate| **candidate == tag)
                .count()
        };
        assert_eq!(count_of(SurfaceTag::Head), 1);
        assert_eq!(count_of(SurfaceTag::Limb), 4);
        assert_eq!(count_of(SurfaceTag::Terrain), 5);
        assert_eq!(count_of(SurfaceTag::Spike), 3);
        assert_eq!(count_of(SurfaceTag::Goal), 2);
    }

    #[test]
    fn every_body_has_a_render_entity() {
        let (physics, world, level) = built_level();
        assert_eq!(level.body_entities.len(), physics.body_count());
        assert_eq!(level.body_entities.len(), world.entity_count());
        for (_, entity_id) in &level.body_entities {
            assert!(world.find_entity(*entity_id).is_some());
        }
    }

    #[test]
    fn goal_is_east_of_the_character_spawn() {
        let (physics, _, level) = built_level();
        let head_x = physics.translation(level.rig.head).expect("head")[0];
        assert!(level.goal_x > head_x);
    }

    #[test]
    fn rig_handles_are_distinct() {
        let (_, _, level) = built_level();
        let bodies = [
            level.rig.head,
            level.rig.torso,
            level.rig.upper_leg,
            level.rig.shaft,
            level.rig.spring_foot,
        ];
        for (index, body) in bodies.iter().enumerate() {
            for other in bodies.iter().skip(index + 1) {
                assert_ne!(body, other);
            }
        }
    }

    #[test]
    fn rig_parts_spawn_below_the_head() {
        let (physics, _, level) = built_level();
        let head_y = physics.translation(level.rig.head).expect("head")[1];
        for part in [
            level.rig.torso,
            level.rig.upper_leg,
            level.rig.shaft,
            level.rig.spring_foot,
        ] {
            let part_y = physics.translation(part).expect("part")[1];
            assert!(part_y < head_y);
        }
    }

    #[test]
    fn camera_is_centered_on_the_course() {
        let (_, world, _) = built_level();
        let camera = world.camera().position;
        assert!((camera.x - WORLD_WIDTH * 0.5).abs() < f32::EPSILON);
        assert!((camera.y - WORLD_HEIGHT * 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn spikes_sit_inside_the_course_bounds() {
        for [x, y] in SPIKE_POSITIONS {
            assert!(x > 0.0 && x < WORLD_WIDTH);
            assert!(y > 0.0 && y < WORLD_HEIGHT);
        }
    }
}
