mod clock_context;
mod config;
mod sim_time;
