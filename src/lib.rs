pub mod types;
pub mod constants;
pub mod config;
pub mod frontier;
pub mod sensor;
pub mod path_planner;
pub mod target_selector;
pub mod drone;
pub mod cave_generator;
pub mod map_loader;
pub mod simulation_manager;
