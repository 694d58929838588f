pub mod arc;
pub mod clock;
pub mod synth;

pub use arc::arc;
pub use clock::{SimSnapshot, SimulationClock};
pub use synth::{default_catalog, relaunch, synthesize, SiteCatalog};
