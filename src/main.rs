use avian2d::prelude::*;
use bevy::prelude::*;

use dungeon_rooms::{camera, content, core, rooms};

fn main() {
    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Dungeon Rooms".to_string(),
            resizable: true,
            ..default()
        }),
        ..default()
    }))
    .add_plugins(PhysicsPlugins::default())
    .insert_resource(Gravity(Vec2::ZERO))
    .add_plugins((
        content::ContentPlugin::default(),
        core::CorePlugin,
        rooms::RoomsPlugin,
        camera::CameraPlugin,
    ));

    #[cfg(feature = "dev-tools")]
    app.add_plugins(dungeon_rooms::debug::DebugPlugin);

    app.run();
}
