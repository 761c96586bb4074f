pub mod body;
pub mod character;
pub mod clock;
pub mod collision;
pub mod constants;
pub mod contact_flags;
pub mod error;
pub mod jump;
pub mod math;
pub mod physics;
pub mod rapier_world;
pub mod settings;

#[cfg(test)]
mod test_support;

pub use body::{
    Attachment, Body, BodyEvent, BodyEventKind, BodySettings, Knockback, SubscriptionId,
    VerticalState,
};
pub use character::Character;
pub use clock::SimulationClock;
pub use collision::{CollisionSettings, CollisionState, ContactProbe, ProbeSettings};
pub use contact_flags::{ContactFlags, ContactSide};
pub use error::ConfigError;
pub use jump::{
    AirJumpSettings, AirJumper, GroundJumpSettings, GroundJumper, JumpCurve, Jumper, Keyframe,
};
pub use math::Vec2;
pub use physics::{BodyId, ColliderId, PhysicsBody, ProbeHit, TouchingBody};
pub use rapier_world::{BodyDef, ColliderShapeDef, RapierBody, RapierWorld};
pub use settings::ControllerSettings;
