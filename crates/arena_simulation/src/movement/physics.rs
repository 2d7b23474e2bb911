//! Physics фаза движения
//!
//! Архитектура:
//! - MovementController решает куда и с какой скоростью (step)
//! - С `PhysicsBody` скорость пишется в тело; без него Transform двигается напрямую
//! - Тело без Rapier `RigidBody` интегрируется здесь (headless)
//! - Тело с Rapier `RigidBody::KinematicVelocityBased` двигает Rapier через `Velocity`

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::components::{face_direction, MovementController, MovementStep, PhysicsBody, StatsInstance};

/// System: шаг контроллеров движения
///
/// Скорость ограничена остатком пути, чтобы не перелетать цель за один тик.
pub fn drive_movement(
    time: Res<Time>,
    mut movers: Query<(
        &mut MovementController,
        &mut Transform,
        &StatsInstance,
        Option<&mut PhysicsBody>,
    )>,
) {
    let delta = time.delta_secs();

    for (mut controller, mut transform, stats, body) in movers.iter_mut() {
        let position = transform.translation;

        match controller.step(position, stats.move_speed) {
            MovementStep::Idle | MovementStep::Arrived => {
                if let Some(mut body) = body {
                    body.stop_horizontal();
                }
            }
            MovementStep::Moving { direction, speed } => {
                let remaining = position.distance(controller.target());
                let speed = if delta > 0.0 { speed.min(remaining / delta) } else { speed };

                match body {
                    Some(mut body) => {
                        body.velocity.x = direction.x * speed;
                        body.velocity.z = direction.z * speed;
                    }
                    None => {
                        transform.translation += direction * speed * delta;
                    }
                }

                face_direction(&mut transform, direction);
            }
        }
    }
}

/// System: velocity → Transform для тел без Rapier (headless режим)
pub fn integrate_bodies(
    time: Res<Time>,
    mut bodies: Query<(&PhysicsBody, &mut Transform), Without<RigidBody>>,
) {
    let delta = time.delta_secs();

    for (body, mut transform) in bodies.iter_mut() {
        transform.translation += body.velocity * delta;
    }
}

/// System: PhysicsBody.velocity → Rapier Velocity
pub fn sync_velocity_to_rapier(mut bodies: Query<(&PhysicsBody, &mut Velocity), With<RigidBody>>) {
    for (body, mut rapier_velocity) in bodies.iter_mut() {
        rapier_velocity.linvel = body.velocity;
    }
}

/// Rapier компоненты для персонажа, которого двигает физика движка
///
/// Capsule высотой 1.8m, радиус 0.4m.
pub fn rapier_body() -> (RigidBody, Collider, Velocity) {
    (
        RigidBody::KinematicVelocityBased,
        Collider::capsule_y(0.5, 0.4),
        Velocity::default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    fn physics_world() -> World {
        let mut world = World::new();
        let mut time = Time::<()>::default();
        time.advance_by(std::time::Duration::from_millis(100));
        world.insert_resource(time);
        world
    }

    fn mover(world: &mut World, target: Vec3) -> Entity {
        let mut controller = MovementController::default();
        controller.move_to(Vec3::ZERO, target);
        world
            .spawn((controller, Transform::default(), StatsInstance::default()))
            .id()
    }

    #[test]
    fn test_direct_integration_moves_and_faces() {
        let mut world = physics_world();
        let entity = mover(&mut world, Vec3::new(10.0, 0.0, 0.0));

        world.run_system_once(drive_movement).expect("system runs");

        let transform = world.get::<Transform>(entity).expect("transform");
        // move_speed 3.0 × 0.1s
        assert!((transform.translation.x - 0.3).abs() < 1e-4);
        assert!((transform.forward().x - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_step_does_not_overshoot() {
        let mut world = physics_world();
        let entity = mover(&mut world, Vec3::new(0.15, 0.0, 0.0));

        world.run_system_once(drive_movement).expect("system runs");

        let transform = world.get::<Transform>(entity).expect("transform");
        assert!((transform.translation.x - 0.15).abs() < 1e-4);
    }

    #[test]
    fn test_body_velocity_then_integration() {
        let mut world = physics_world();
        let entity = mover(&mut world, Vec3::new(0.0, 0.0, 10.0));
        world.entity_mut(entity).insert(PhysicsBody::default());

        world.run_system_once(drive_movement).expect("system runs");
        let body = *world.get::<PhysicsBody>(entity).expect("body");
        assert!((body.velocity.z - 3.0).abs() < 1e-4);

        // Transform ещё не сдвинут: тело двигает integrate_bodies
        assert_eq!(world.get::<Transform>(entity).expect("transform").translation, Vec3::ZERO);

        world.run_system_once(integrate_bodies).expect("system runs");
        let transform = world.get::<Transform>(entity).expect("transform");
        assert!((transform.translation.z - 0.3).abs() < 1e-4);
    }

    #[test]
    fn test_rapier_body_receives_velocity() {
        let mut world = physics_world();
        let entity = mover(&mut world, Vec3::new(5.0, 0.0, 0.0));
        world.entity_mut(entity).insert((PhysicsBody::default(), rapier_body()));

        world.run_system_once(drive_movement).expect("system runs");
        world.run_system_once(integrate_bodies).expect("system runs");
        world.run_system_once(sync_velocity_to_rapier).expect("system runs");

        // Rapier тело не интегрируется вручную
        assert_eq!(world.get::<Transform>(entity).expect("transform").translation, Vec3::ZERO);
        let velocity = world.get::<Velocity>(entity).expect("rapier velocity");
        assert!((velocity.linvel.x - 3.0).abs() < 1e-4);
    }
}
