pub mod engine;
pub mod order;
pub mod player;
pub mod position;
pub mod roster;
pub mod scarcity;
pub mod snapshot;
