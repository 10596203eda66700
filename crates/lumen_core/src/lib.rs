pub use bevy_ecs::prelude::*;
use bevy_ecs::system::ScheduleSystem;

pub mod frame;
pub mod time;
pub mod transform;

pub use frame::{FrameListeners, ListenerId};

use crate::{time::Time, transform::transform_propagation_system};

/// The Plugin Trait
/// Every module (Lights, Scene) must implement this.
pub trait Plugin {
    fn build(&self, app: &mut App);
}

/// The Engine Application
/// Holds the ECS World and orchestrates the loop.
pub struct App {
    pub world: World,
    pub main_schedule: Schedule,
    pub pre_update_schedule: Schedule,
    pub post_update_schedule: Schedule,
    pub running: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    PreUpdate, // Scene spawning
    Update,
    PostUpdate, // Transforms, then everything that reads world transforms
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        let mut world = World::new();

        world.init_resource::<Time>();
        world.init_resource::<FrameListeners>();

        let mut app = Self {
            world,
            main_schedule: Schedule::default(),
            pre_update_schedule: Schedule::default(),
            post_update_schedule: Schedule::default(),
            running: true,
        };

        app.add_system_to_stage(Stage::PostUpdate, transform_propagation_system);

        app
    }

    pub fn add_plugin<P: Plugin>(&mut self, plugin: P) -> &mut Self {
        plugin.build(self);
        self
    }

    pub fn add_system<M>(
        &mut self,
        system: impl IntoScheduleConfigs<ScheduleSystem, M>,
    ) -> &mut Self {
        self.main_schedule.add_systems(system);
        self
    }

    pub fn add_system_to_stage<M>(
        &mut self,
        stage: Stage,
        system: impl IntoScheduleConfigs<ScheduleSystem, M>,
    ) -> &mut Self {
        match stage {
            Stage::PreUpdate => {
                self.pre_update_schedule.add_systems(system);
            }
            Stage::Update => {
                self.main_schedule.add_systems(system);
            }
            Stage::PostUpdate => {
                self.post_update_schedule.add_systems(system);
            }
        }
        self
    }

    /// Explicit ticks: there is no run() that takes over the thread.
    /// update() processes ONE frame, the caller decides WHEN.
    pub fn update(&mut self) {
        if !self.running {
            return;
        }
        self.pre_update_schedule.run(&mut self.world);
        self.main_schedule.run(&mut self.world);
        self.post_update_schedule.run(&mut self.world);
    }

    /// Advances the clock by a fixed step and runs one frame.
    /// Used by headless runners that have no window to pace them.
    pub fn step(&mut self, dt: std::time::Duration) {
        if let Some(mut time) = self.world.get_resource_mut::<Time>() {
            time.advance(dt);
        }
        self.update();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{GlobalTransform, Transform};
    use glam::Vec3;
    use std::time::Duration;

    #[derive(Resource, Default)]
    struct Ticks(u32);

    fn count_ticks(mut ticks: ResMut<Ticks>) {
        ticks.0 += 1;
    }

    #[test]
    fn update_runs_every_stage_once() {
        let mut app = App::new();
        app.world.init_resource::<Ticks>();
        app.add_system(count_ticks);

        app.update();
        app.update();

        assert_eq!(app.world.resource::<Ticks>().0, 2);
    }

    #[derive(Resource, Default)]
    struct Order(Vec<Stage>);

    #[test]
    fn stages_run_pre_main_post() {
        let mut app = App::new();
        app.world.init_resource::<Order>();
        app.add_system_to_stage(Stage::PostUpdate, |mut order: ResMut<Order>| {
            order.0.push(Stage::PostUpdate);
        });
        app.add_system(|mut order: ResMut<Order>| order.0.push(Stage::Update));
        app.add_system_to_stage(Stage::PreUpdate, |mut order: ResMut<Order>| {
            order.0.push(Stage::PreUpdate);
        });

        app.update();

        assert_eq!(
            app.world.resource::<Order>().0,
            vec![Stage::PreUpdate, Stage::Update, Stage::PostUpdate]
        );
    }

    #[test]
    fn stopped_app_does_not_tick() {
        let mut app = App::new();
        app.world.init_resource::<Ticks>();
        app.add_system_to_stage(Stage::PreUpdate, count_ticks);
        app.running = false;

        app.update();

        assert_eq!(app.world.resource::<Ticks>().0, 0);
    }

    #[test]
    fn step_advances_time_and_propagates_transforms() {
        let mut app = App::new();
        let node = app
            .world
            .spawn((Transform::from_xyz(1.0, 2.0, 3.0), GlobalTransform::default()))
            .id();

        app.step(Duration::from_millis(16));

        let time = app.world.resource::<Time>();
        assert!((time.delta_seconds() - 0.016).abs() < 1e-6);
        assert_eq!(app.world.resource::<Time>().frame_count(), 1);

        let global = app.world.get::<GlobalTransform>(node).copied().unwrap();
        assert_eq!(global.translation(), Vec3::new(1.0, 2.0, 3.0));
    }
}
