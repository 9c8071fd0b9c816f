pub mod particle_budget;
pub mod render_settings;
