//! Desktop stand-ins for mobile platform plugins.

mod camera;
mod clipboard;
mod opener;

pub use camera::VideoDevicePermission;
pub use clipboard::CommandClipboard;
pub use opener::SystemOpener;
