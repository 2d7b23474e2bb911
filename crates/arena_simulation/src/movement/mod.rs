//! Movement domain: команды перемещения (logic фаза) и интеграция (physics фаза)
//!
//! Содержит:
//! - MoveRequest (MoveTo / LookAt / Stop / SetCanMove)
//! - apply_move_requests: команды → MovementController
//! - physics: controller → velocity → Transform / Rapier

pub mod events;
pub mod physics;

pub use events::*;
pub use physics::*;

use bevy::prelude::*;

use crate::combat::start_attacks;
use crate::components::{face_point, HealthStatus, MovementController, PhysicsBody};
use crate::{LogicTick, PhysicsTick, SimSet};

/// Movement Plugin
///
/// LogicTick (Actions): apply_move_requests до start_attacks (оба пишут Transform).
/// PhysicsTick: drive_movement → integrate_bodies → sync_velocity_to_rapier.
pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<MoveRequest>();

        app.add_systems(
            LogicTick,
            apply_move_requests.in_set(SimSet::Actions).before(start_attacks),
        );

        app.add_systems(
            PhysicsTick,
            (drive_movement, integrate_bodies, sync_velocity_to_rapier).chain(),
        );
    }
}

/// System: MoveRequest → MovementController
///
/// MoveTo/LookAt для мертвых и оглушенных игнорируются, Stop/SetCanMove проходят всегда.
pub fn apply_move_requests(
    mut requests: EventReader<MoveRequest>,
    mut movers: Query<(
        &mut MovementController,
        &mut Transform,
        &HealthStatus,
        Option<&mut PhysicsBody>,
    )>,
) {
    for request in requests.read() {
        let Ok((mut controller, mut transform, health, body)) = movers.get_mut(request.entity()) else {
            continue;
        };

        let incapacitated = health.is_dead() || health.is_stunned();

        match *request {
            MoveRequest::MoveTo { .. } | MoveRequest::LookAt { .. } if incapacitated => {}
            MoveRequest::MoveTo { target, .. } => {
                let from = transform.translation;
                controller.move_to(from, target);
            }
            MoveRequest::LookAt { point, .. } => {
                face_point(&mut transform, point);
            }
            MoveRequest::Stop { .. } => {
                controller.stop();
                if let Some(mut body) = body {
                    body.stop_horizontal();
                }
            }
            MoveRequest::SetCanMove { can_move, .. } => {
                controller.set_can_move(can_move);
                if !can_move {
                    if let Some(mut body) = body {
                        body.stop_horizontal();
                    }
                }
            }
        }
    }
}
