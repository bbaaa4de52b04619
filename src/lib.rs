pub mod alert;
pub mod camera;
pub mod config;
pub mod logger;
pub mod pose;
pub mod posture;
pub mod render;
