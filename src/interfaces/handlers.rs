pub mod assets;
pub mod home;
pub mod renditions;
pub mod system;
