pub mod dummies;
pub mod stubs;

pub use dummies::*;
pub use stubs::ScriptedDriver;
