pub mod harness;

mod drive_cycle;
mod staleness;
mod telemetry_flow;
