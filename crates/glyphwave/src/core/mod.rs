pub mod rng;
pub mod run_loop;
pub mod time;
pub mod viewport;
