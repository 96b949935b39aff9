//! Ownership wrapper around the rapier2d object graph. The game layer
//! builds bodies, colliders, and joints through this type and receives the
//! frame's collision transitions back as plain handle pairs.

use std::sync::Mutex;

use rapier2d::prelude::*;

pub use rapier2d::prelude::{
    point, vector, ActiveEvents, Collider, ColliderBuilder, ColliderHandle, GenericJoint, Group,
    ImpulseJointHandle, InteractionGroups, Real, RigidBody, RigidBodyBuilder, RigidBodyHandle,
    SpringJointBuilder,
};

// The `point!`/`vector!` macros expand to absolute `nalgebra::` paths, so any
// crate invoking them needs `nalgebra` nameable in scope. Re-export it here the
// same way rapier2d's prelude does, so downstream crates can bring it in.
pub use rapier2d::prelude::nalgebra;

/// One contact transition between two colliders, drained after each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactPairEvent {
    pub collider_a: ColliderHandle,
    pub collider_b: ColliderHandle,
    pub started: bool,
}

#[derive(Default)]
struct CollisionLog {
    events: Mutex<Vec<ContactPairEvent>>,
}

impl CollisionLog {
    fn push(&self, event: ContactPairEvent) {
        // A poisoned lock only loses pending events, never corrupts them.
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }

    fn drain(&self) -> Vec<ContactPairEvent> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl EventHandler for CollisionLog {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        let mapped = match event {
            CollisionEvent::Started(collider_a, collider_b, _) => ContactPairEvent {
                collider_a,
                collider_b,
                started: true,
            },
            CollisionEvent::Stopped(collider_a, collider_b, _) => ContactPairEvent {
                collider_a,
                collider_b,
                started: false,
            },
        };
        self.push(mapped);
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

pub struct PhysicsWorld {
    gravity: Vector<Real>,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    collision_log: CollisionLog,
}

impl PhysicsWorld {
    pub fn new(gravity_y: f32) -> Self {
        Self {
            gravity: vector![0.0, gravity_y],
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            collision_log: CollisionLog::default(),
        }
    }

    pub fn insert_body(&mut self, body: impl Into<RigidBody>) -> RigidBodyHandle {
        self.bodies.insert(body)
    }

    pub fn attach_collider(
        &mut self,
        collider: impl Into<Collider>,
        parent: RigidBodyHandle,
    ) -> ColliderHandle {
        self.colliders
            .insert_with_parent(collider, parent, &mut self.bodies)
    }

    pub fn insert_joint(
        &mut self,
        body_a: RigidBodyHandle,
        body_b: RigidBodyHandle,
        joint: impl Into<GenericJoint>,
    ) -> ImpulseJointHandle {
        self.impulse_joints.insert(body_a, body_b, joint, true)
    }

    pub fn body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle)
    }

    pub fn body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle)
    }

    pub fn translation(&self, handle: RigidBodyHandle) -> Option<[f32; 2]> {
        self.bodies.get(handle).map(|body| {
            let translation = body.translation();
            [translation.x, translation.y]
        })
    }

    pub fn rotation_angle(&self, handle: RigidBodyHandle) -> Option<f32> {
        self.bodies.get(handle).map(|body| body.rotation().angle())
    }

    pub fn linear_velocity(&self, handle: RigidBodyHandle) -> Option<[f32; 2]> {
        self.bodies.get(handle).map(|body| {
            let velocity = body.linvel();
            [velocity.x, velocity.y]
        })
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Advance the simulation by `dt` seconds and return the contact
    /// transitions reported during the step.
    pub fn step(&mut self, dt: f32) -> Vec<ContactPairEvent> {
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.collision_log,
        );
        self.collision_log.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn dynamic_body_falls_under_gravity() {
        let mut world = PhysicsWorld::new(-9.81);
        let handle = world.insert_body(
            RigidBodyBuilder::dynamic().translation(vector![0.0, 10.0]),
        );
        world.attach_collider(ColliderBuilder::ball(0.5), handle);

        let initial_y = world.translation(handle).expect("body")[1];
        for _ in 0..10 {
            world.step(DT);
        }
        let final_y = world.translation(handle).expect("body")[1];

        assert!(final_y < initial_y);
    }

    #[test]
    fn fixed_body_stays_put() {
        let mut world = PhysicsWorld::new(-9.81);
        let handle = world.insert_body(
            RigidBodyBuilder::fixed().translation(vector![3.0, 2.0]),
        );
        world.attach_collider(ColliderBuilder::cuboid(1.0, 0.5), handle);

        for _ in 0..30 {
            world.step(DT);
        }
        let translation = world.translation(handle).expect("body");

        assert!((translation[0] - 3.0).abs() < 1e-5);
        assert!((translation[1] - 2.0).abs() < 1e-5);
    }

    #[test]
    fn contact_events_report_the_colliding_pair() {
        let mut world = PhysicsWorld::new(-9.81);
        let ground = world.insert_body(RigidBodyBuilder::fixed().translation(vector![0.0, 0.0]));
        let ground_collider =
            world.attach_collider(ColliderBuilder::cuboid(5.0, 0.5), ground);

        let ball = world.insert_body(
            RigidBodyBuilder::dynamic().translation(vector![0.0, 3.0]),
        );
        let ball_collider = world.attach_collider(
            ColliderBuilder::ball(0.5).active_events(ActiveEvents::COLLISION_EVENTS),
            ball,
        );

        let mut started_pair = None;
        for _ in 0..600 {
            for event in world.step(DT) {
                if event.started {
                    started_pair = Some((event.collider_a, event.collider_b));
                }
            }
            if started_pair.is_some() {
                break;
            }
        }

        let (a, b) = started_pair.expect("ball should land on the ground");
        let expected = [ground_collider, ball_collider];
        assert!(expected.contains(&a));
        assert!(expected.contains(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn no_events_without_active_events_flag() {
        let mut world = PhysicsWorld::new(-9.81);
        let ground = world.insert_body(RigidBodyBuilder::fixed());
        world.attach_collider(ColliderBuilder::cuboid(5.0, 0.5), ground);
        let ball = world.insert_body(
            RigidBodyBuilder::dynamic().translation(vector![0.0, 2.0]),
        );
        world.attach_collider(ColliderBuilder::ball(0.5), ball);

        let mut events = Vec::new();
        for _ in 0..300 {
            events.extend(world.step(DT));
        }
        assert!(events.is_empty());
    }

    #[test]
    fn spring_joint_pulls_bodies_toward_rest_length() {
        let mut world = PhysicsWorld::new(0.0);
        let left = world.insert_body(
            RigidBodyBuilder::dynamic().translation(vector![0.0, 0.0]),
        );
        world.attach_collider(ColliderBuilder::ball(0.1).density(1.0), left);
        let right = world.insert_body(
            RigidBodyBuilder::dynamic().translation(vector![2.0, 0.0]),
        );
        world.attach_collider(ColliderBuilder::ball(0.1).density(1.0), right);

        world.insert_joint(left, right, SpringJointBuilder::new(1.0, 50.0, 5.0).build());

        for _ in 0..600 {
            world.step(DT);
        }

        let left_x = world.translation(left).expect("left")[0];
        let right_x = world.translation(right).expect("right")[0];
        let distance = (right_x - left_x).abs();
        assert!(
            distance < 1.5,
            "spring should pull the pair toward rest length, distance = {distance}"
        );
    }

    #[test]
    fn collision_groups_filter_pairs() {
        let character = InteractionGroups::new(Group::GROUP_2, Group::GROUP_1);

        let mut world = PhysicsWorld::new(-9.81);
        let upper = world.insert_body(
            RigidBodyBuilder::dynamic().translation(vector![0.0, 1.0]),
        );
        world.attach_collider(
            ColliderBuilder::ball(0.5)
                .collision_groups(character)
                .active_events(ActiveEvents::COLLISION_EVENTS),
            upper,
        );
        let lower = world.insert_body(
            RigidBodyBuilder::dynamic().translation(vector![0.0, 0.0]),
        );
        world.attach_collider(
            ColliderBuilder::ball(0.5).collision_groups(character),
            lower,
        );

        // Same-group colliders pass through each other while falling.
        let mut events = Vec::new();
        for _ in 0..120 {
            events.extend(world.step(DT));
        }
        assert!(events.is_empty());
    }
}
