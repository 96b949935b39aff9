use engine::physics::PhysicsWorld;
use engine::{
    Banner, BannerStyle, InputSnapshot, Scene, SceneCommand, SceneWorld, Transform, Vec2,
};
use tracing::info;

use super::control::{apply_controls, ControlInputs};
use super::level::{build_level, Level};
use super::outcome::{apply_outcome, classify_pair};
use super::types::Phase;

const GRAVITY_Y: f32 = -9.81;

const START_BANNER: Banner = Banner {
    title: "POGO GAUNTLET",
    lines: &[
        "LEFT/RIGHT: TILT AND MOVE",
        "SPACE: BOUNCE",
        "REACH THE GREEN FLAG, AVOID THE SPIKES",
        "PRESS A CONTROL KEY TO START",
    ],
    style: BannerStyle::Start,
};

const LOSE_BANNER: Banner = Banner {
    title: "WASTED!",
    lines: &["PRESS R TO RESTART"],
    style: BannerStyle::Lose,
};

const WIN_BANNER: Banner = Banner {
    title: "YOU WIN!",
    lines: &["PRESS R TO PLAY AGAIN"],
    style: BannerStyle::Win,
};

pub(crate) fn build_scene() -> Box<dyn Scene> {
    Box::new(PogoScene::new())
}

pub(crate) struct PogoScene {
    pub(crate) physics: PhysicsWorld,
    pub(crate) level: Option<Level>,
    pub(crate) phase: Phase,
    pub(crate) tick_count: u64,
}

impl PogoScene {
    pub(crate) fn new() -> Self {
        Self {
            physics: PhysicsWorld::new(GRAVITY_Y),
            level: None,
            phase: Phase::NotStarted,
            tick_count: 0,
        }
    }

    pub(crate) fn head_position(&self) -> Option<[f32; 2]> {
        let rig = self.level.as_ref()?.rig;
        self.physics.translation(rig.head)
    }

    fn sync_render_transforms(&self, world: &mut SceneWorld) {
        let Some(level) = self.level.as_ref() else {
            return;
        };
        for (body, entity_id) in &level.body_entities {
            let Some(translation) = self.physics.translation(*body) else {
                continue;
            };
            let Some(angle) = self.physics.rotation_angle(*body) else {
                continue;
            };
            if let Some(entity) = world.find_entity_mut(*entity_id) {
                entity.transform = Transform {
                    position: Vec2 {
                        x: translation[0],
                        y: translation[1],
                    },
                    rotation_radians: angle,
                };
            }
        }
    }
}

impl Scene for PogoScene {
    fn load(&mut self, world: &mut SceneWorld) {
        self.physics = PhysicsWorld::new(GRAVITY_Y);
        self.phase = Phase::NotStarted;
        self.tick_count = 0;
        self.level = Some(build_level(&mut self.physics, world));
        info!(
            bodies = self.physics.body_count(),
            colliders = self.physics.collider_count(),
            "level_built"
        );
    }

    fn update(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> SceneCommand {
        if input.restart_pressed() {
            info!(phase = self.phase.label(), "restart_requested");
            return SceneCommand::HardReset;
        }

        let Some(level) = self.level.as_ref() else {
            return SceneCommand::None;
        };

        let inputs = if self.phase.is_terminal() {
            ControlInputs::NONE
        } else {
            ControlInputs::from_snapshot(input)
        };

        if self.phase == Phase::NotStarted && inputs.any() {
            self.phase = Phase::Running;
            info!("run_started");
        }

        apply_controls(&mut self.physics, &level.rig, inputs);
        let contacts = self.physics.step(fixed_dt_seconds);

        // The simulation keeps tumbling after a terminal outcome; only the
        // outcome itself is latched.
        if !self.phase.is_terminal() {
            for contact in contacts.iter().filter(|contact| contact.started) {
                let Some(tag_a) = level.surfaces.get(&contact.collider_a).copied() else {
                    continue;
                };
                let Some(tag_b) = level.surfaces.get(&contact.collider_b).copied() else {
                    continue;
                };
                if let Some(outcome) = classify_pair(tag_a, tag_b) {
                    let next = apply_outcome(self.phase, outcome);
                    if next != self.phase {
                        info!(
                            outcome = ?outcome,
                            phase = next.label(),
                            tick = self.tick_count,
                            "run_ended"
                        );
                        self.phase = next;
                    }
                }
            }
        }

        self.sync_render_transforms(world);
        self.tick_count += 1;
        SceneCommand::None
    }

    fn unload(&mut self, _world: &mut SceneWorld) {
        info!(
            ticks = self.tick_count,
            phase = self.phase.label(),
            "scene_unload"
        );
        self.level = None;
        self.physics = PhysicsWorld::new(GRAVITY_Y);
        self.phase = Phase::NotStarted;
        self.tick_count = 0;
    }

    fn banner(&self, _world: &SceneWorld) -> Option<Banner> {
        match self.phase {
            Phase::NotStarted => Some(START_BANNER),
            Phase::Running => None,
            Phase::Lost => Some(LOSE_BANNER),
            Phase::Won => Some(WIN_BANNER),
        }
    }

    fn debug_title(&self, _world: &SceneWorld) -> Option<String> {
        let head = self.head_position()?;
        Some(format!(
            "Pogo Gauntlet | head ({:.2}, {:.2}) | {}",
            head[0],
            head[1],
            self.phase.label()
        ))
    }

    fn debug_lines(&self, _world: &SceneWorld) -> Vec<String> {
        let mut lines = vec![
            format!("PHASE: {}", self.phase.label()),
            format!("TICK: {}", self.tick_count),
        ];
        if let (Some(head), Some(level)) = (self.head_position(), self.level.as_ref()) {
            lines.push(format!("HEAD: {:.1}, {:.1}", head[0], head[1]));
            lines.push(format!("TO GOAL: {:.1}", level.goal_x - head[0]));
        }
        lines
    }
}
