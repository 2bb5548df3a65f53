pub mod flood_control;
pub mod health;
