pub mod overlay;
pub mod skeleton;
pub mod window;

pub use minifb::Key;
pub use overlay::draw_status;
pub use skeleton::SKELETON_CONNECTIONS;
pub use window::MonitorWindow;
