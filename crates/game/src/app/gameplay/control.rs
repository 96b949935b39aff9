use engine::physics::nalgebra;
use engine::physics::{vector, PhysicsWorld};
use engine::{InputAction, InputSnapshot};

use super::level::CharacterRig;

// Fixed control magnitudes, applied once per tick before the physics step.
const HORIZONTAL_FORCE: f32 = 12.0;
const TORSO_TILT_TORQUE: f32 = 0.6;
// The torso tilts twice as hard as the leg, like the original rig.
const LEG_TILT_TORQUE: f32 = 0.3;
const BOUNCE_FORCE: f32 = 40.0;

/// The three control levels a tick reacts to, cut from the input snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ControlInputs {
    pub(crate) move_left: bool,
    pub(crate) move_right: bool,
    pub(crate) jump: bool,
}

impl ControlInputs {
    pub(crate) const NONE: Self = Self {
        move_left: false,
        move_right: false,
        jump: false,
    };

    pub(crate) fn from_snapshot(input: &InputSnapshot) -> Self {
        Self {
            move_left: input.is_down(InputAction::MoveLeft),
            move_right: input.is_down(InputAction::MoveRight),
            jump: input.is_down(InputAction::Jump),
        }
    }

    pub(crate) fn any(self) -> bool {
        self.move_left || self.move_right || self.jump
    }

    /// +1 leaning right, -1 leaning left, 0 neutral or both held.
    fn tilt(self) -> f32 {
        (self.move_right as i8 - self.move_left as i8) as f32
    }
}

/// Replace the rig's accumulated control forces for this tick. Passing
/// `ControlInputs::NONE` clears them, which is what terminal phases do.
pub(crate) fn apply_controls(physics: &mut PhysicsWorld, rig: &CharacterRig, inputs: ControlInputs) {
    let tilt = inputs.tilt();

    if let Some(torso) = physics.body_mut(rig.torso) {
        torso.reset_forces(true);
        torso.reset_torques(true);
        if tilt != 0.0 {
            torso.add_force(vector![tilt * HORIZONTAL_FORCE, 0.0], true);
            // Screen-clockwise lean is a negative angle in the y-up world.
            torso.add_torque(-tilt * TORSO_TILT_TORQUE, true);
        }
    }

    if let Some(upper_leg) = physics.body_mut(rig.upper_leg) {
        upper_leg.reset_torques(true);
        if tilt != 0.0 {
            upper_leg.add_torque(-tilt * LEG_TILT_TORQUE, true);
        }
    }

    if let Some(spring_foot) = physics.body_mut(rig.spring_foot) {
        spring_foot.reset_forces(true);
        if inputs.jump {
            spring_foot.add_force(vector![0.0, BOUNCE_FORCE], true);
        }
    }
}
