//! Sending Simulation - Engine, quota accounting and the tick worker

mod engine;
mod quota;
mod rng;
mod worker;

pub use engine::{simulate_tick, EnginePolicy, TickOutcome, TickReport};
pub use quota::{charge_per_email, charge_per_tick, reset_stale};
pub use rng::{RandomTicks, ScriptedTicks, TickRng};
pub use worker::{EngineMonitor, EngineStatus, SimulationWorker};
