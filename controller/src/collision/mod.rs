/*!
Directional contact sensing.

A body carries four probes (down, left, right, up). Each step they sweep the
body's collider a short distance in their direction through the physics
boundary and keep the hits whose surface normal lies in the probe's angle range.

- settings: per-probe normal-angle filters and the minimum probe distance
- probe:    one directional query and its cached aggregate normal
- state:    the four probes and the ground/wall/ceiling predicates
*/

pub mod probe;
pub mod settings;
pub mod state;

pub use probe::ContactProbe;
pub use settings::{CollisionSettings, ProbeSettings};
pub use state::CollisionState;
