//! Meridian - headless avatar simulation demo
//!
//! Builds a small physics world, spawns an avatar from the character
//! catalog, and drives it through a scripted walk/jump/boost sequence on a
//! fixed tick, logging the resolved state along the way.

use anyhow::{Context, Result};
use glam::Vec3;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use winit::keyboard::KeyCode;

use meridian_avatar::{
    load_catalog, AvatarController, BoostEmitter, CameraFollowController, CharacterProfile,
    ClipLibrary, InputProfile,
};
use meridian_core::GameTime;
use meridian_physics::{AvatarBody, PhysicsWorld};

const CATALOG_PATH: &str = "assets/characters.toml";
const SPAWN_POINT: Vec3 = Vec3::new(0.0, 3.0, 0.0);
const SIMULATION_TICKS: u32 = 900;

/// Boost effect stand-in for the demo: logs instead of emitting particles.
struct ThrusterLog;

impl BoostEmitter for ThrusterLog {
    fn set_active(&mut self, active: bool) {
        debug!("thruster {}", if active { "on" } else { "off" });
    }
}

fn load_characters() -> Vec<CharacterProfile> {
    match load_catalog(CATALOG_PATH) {
        Ok(characters) => characters,
        Err(e) => {
            warn!("{e}; using the default character");
            vec![CharacterProfile::default()]
        }
    }
}

fn build_world() -> PhysicsWorld {
    let mut world = PhysicsWorld::new();
    world.create_ground(0.0);
    world.create_static_box(Vec3::new(2.0, 0.5, 2.0), Vec3::new(6.0, 0.5, 6.0));
    world.create_moving_platform(
        Vec3::new(1.5, 0.2, 1.5),
        Vec3::new(-5.0, 1.0, 0.0),
        Vec3::new(0.8, 0.0, 0.0),
    );
    world.update_queries();
    world
}

/// Scripted input edges, keyed by tick.
fn apply_script(avatar: &mut AvatarController<AvatarBody>, tick: u32) {
    let input = avatar.input_mut();
    match tick {
        120 => input.key_down(KeyCode::KeyW),
        360 => input.key_down(KeyCode::Space),
        380 => input.key_up(KeyCode::Space),
        480 => input.key_down(KeyCode::ShiftLeft),
        560 => input.key_up(KeyCode::ShiftLeft),
        660 => input.key_up(KeyCode::KeyW),
        _ => {}
    }

    match tick {
        700 => avatar.pause_physics(),
        760 => avatar.resume_physics(),
        _ => {}
    }
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("failed to set subscriber")?;

    info!("Starting Meridian avatar demo...");

    let characters = load_characters();
    let profile = characters.first().cloned().context("empty catalog")?;
    info!(
        "loaded {} character(s); playing '{}'",
        characters.len(),
        profile.name
    );

    let mut world = build_world();

    let mut body = AvatarBody::new();
    body.spawn(&mut world, SPAWN_POINT);
    world.update_queries();

    let mut avatar = AvatarController::new(body, InputProfile::desktop());

    let mut camera = CameraFollowController::new();
    camera.set_position(Vec3::new(0.0, 5.0, -10.0));
    avatar.attach_camera(camera);
    avatar.attach_boost_emitter(Box::new(ThrusterLog));

    let clips = ClipLibrary::from_names([
        profile.clips.idle.clone(),
        profile.clips.walk.clone(),
        profile.clips.jump.clone(),
    ]);
    avatar.set_character(&mut world, profile, SPAWN_POINT, clips);

    let mut time = GameTime::default();
    let dt = time.config.fixed_timestep;

    for tick in 0..SIMULATION_TICKS {
        time.update(dt);
        apply_script(&mut avatar, tick);

        avatar.pre_render_update(dt);
        avatar.post_physics_update(&mut world, dt);
        world.step();

        if tick % 60 == 0 {
            let position = avatar.position();
            info!(
                "t={:>5.2}s state={:?} pos=({:.2}, {:.2}, {:.2}) moving={} boosting={}",
                time.total_time,
                avatar.state(),
                position.x,
                position.y,
                position.z,
                avatar.is_moving(),
                avatar.is_boosting(),
            );
        }
    }

    let camera_position = avatar
        .camera()
        .map(|camera| camera.position())
        .unwrap_or_default();
    info!(
        "simulation finished at pos=({:.2}, {:.2}, {:.2}), camera=({:.2}, {:.2}, {:.2})",
        avatar.position().x,
        avatar.position().y,
        avatar.position().z,
        camera_position.x,
        camera_position.y,
        camera_position.z,
    );

    avatar.dispose();
    Ok(())
}
