pub mod controller;
pub mod error;
pub mod output;
pub mod player;
pub mod queue;
pub mod state;
