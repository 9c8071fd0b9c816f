pub mod animation;
pub mod camera;
pub mod controller;
pub mod core;
pub mod device;
pub mod lighting;
pub mod phases;
pub mod resources;
pub mod scene;
pub mod systems;

pub mod visualizer;
