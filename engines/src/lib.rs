pub mod bands;
pub mod pulse;
pub mod registry;

pub use bands::BandsEngine;
pub use pulse::PulseEngine;
