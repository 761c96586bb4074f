//! Headless sandbox: a scripted character in a small rapier2d level.
//!
//! Run with `RUST_LOG=info` (or `debug` for state transitions and contacts).
//! `SANDBOX_SECONDS` sets the simulated duration.

use controller::rapier_world::rapier2d::prelude::RigidBodyHandle;
use controller::{
    BodyDef, BodyEventKind, Character, ContactSide, ControllerSettings, Knockback, RapierWorld,
    SimulationClock, Vec2,
};

/// Seconds between two platform direction changes.
const PLATFORM_PERIOD: f32 = 2.0;
const PLATFORM_SPEED: f32 = 1.5;
const WALK_SPEED: f32 = 4.0;

fn env_f32(key: &str, default: f32) -> f32 {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse::<f32>().ok())
        .unwrap_or(default)
}

/// What the scripted player does on a given tick.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Action {
    Idle,
    Walk(f32),
    Jump,
    CancelJump,
    Knockback(Vec2, f32),
}

/// Rides the platform through one reversal, then walks off it.
fn script(tick: u64) -> Action {
    match tick {
        200..=289 => Action::Walk(WALK_SPEED),
        290 => Action::Jump,
        296 => Action::CancelJump,
        350 => Action::Jump,
        366 => Action::Jump,
        450 => Action::Knockback(Vec2::new(-6.0, 4.0), 0.3),
        550..=670 => Action::Walk(-WALK_SPEED),
        _ => Action::Idle,
    }
}

struct Level {
    world: RapierWorld,
    player: RigidBodyHandle,
    platform: RigidBodyHandle,
}

fn build_level() -> Level {
    let mut world = RapierWorld::new();
    world.insert_fixed(&BodyDef::cuboid(Vec2::new(0.0, 0.0), Vec2::new(40.0, 0.5)));
    world.insert_fixed(&BodyDef::cuboid(Vec2::new(8.0, 3.0), Vec2::new(0.5, 2.5)));
    // Floats just above the ground; the player starts on top of it.
    let (platform, _) = world.insert_platform(
        &BodyDef::cuboid(Vec2::new(0.0, 0.8), Vec2::new(2.0, 0.2)),
        Vec2::new(PLATFORM_SPEED, 0.0),
    );
    let (player, _) = world.insert_character(
        &BodyDef::cuboid(Vec2::new(0.0, 1.51), Vec2::new(0.4, 0.5)).with_friction(0.0),
    );
    Level {
        world,
        player,
        platform,
    }
}

fn apply(
    action: Action,
    character: &mut Character,
    level: &mut Level,
    now: f32,
) -> Result<(), controller::ConfigError> {
    match action {
        Action::Idle => {}
        Action::Walk(speed) => character.body_mut().set_move_velocity_x(speed),
        Action::Jump => {
            let started = character.jump(now);
            log::info!("jump requested at {now:.2}s: started = {started}");
        }
        Action::CancelJump => character.cancel_jump(now),
        Action::Knockback(impulse, duration) => {
            let knockback = Knockback::new(impulse, duration)?;
            let mut body = level.world.body(level.player)?;
            character.body_mut().add_knockback_impulse(&mut body, knockback);
            log::info!("knockback {impulse:?} for {duration}s");
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let settings = ControllerSettings::default();
    let mut clock: SimulationClock = settings.clock()?;
    let mut character = Character::from_settings(&settings)?;
    let mut level = build_level();

    character.body_mut().subscribe(|event| match event.kind {
        BodyEventKind::Grounded => log::info!("landed at {:.2}s", event.time),
        BodyEventKind::Takeoff => log::info!("took off at {:.2}s", event.time),
    });

    let seconds = env_f32("SANDBOX_SECONDS", 15.0);
    let total_ticks = (seconds / clock.dt()).ceil() as u64;
    let period_ticks = (PLATFORM_PERIOD / clock.dt()).round().max(1.0) as u64;
    log::info!("simulating {total_ticks} ticks of {:.3}s", clock.dt());

    let mut platform_dir = 1.0;
    while clock.ticks() < total_ticks {
        let tick = clock.ticks();
        let now = clock.now();

        if tick > 0 && tick % period_ticks == 0 {
            platform_dir = -platform_dir;
            level
                .world
                .set_linvel(level.platform, Vec2::new(PLATFORM_SPEED * platform_dir, 0.0));
        }

        apply(script(tick), &mut character, &mut level, now)?;
        {
            let mut body = level.world.body(level.player)?;
            character.fixed_update(&mut body, &clock);
        }
        level.world.step(clock.dt());

        if tick % 25 == 0 {
            let position = level.world.translation(level.player).unwrap_or_else(Vec2::zeros);
            let velocity = character.body().velocity();
            let flags = character.collision().flags();
            log::info!(
                "t={now:6.2}s pos=({:6.2}, {:5.2}) vel=({:5.2}, {:5.2}) {:?} ground={} wall={} attached={:?}",
                position.x,
                position.y,
                velocity.x,
                velocity.y,
                character.body().vertical_state(),
                flags.has(ContactSide::Bottom),
                flags.has_any(&[ContactSide::Left, ContactSide::Right]),
                character.body().attached_platform().map(|a| a.body),
            );
        }

        clock.advance();
    }

    Ok(())
}
