//! One repository per JSON side-file.

pub mod device_name_repo;
pub mod order_repo;
pub mod selected_repo;
pub mod settings_repo;
pub mod slideshow_state_repo;

pub use device_name_repo::DeviceNameRepo;
pub use order_repo::OrderRepo;
pub use selected_repo::SelectedRepo;
pub use settings_repo::SettingsRepo;
pub use slideshow_state_repo::SlideshowStateRepo;
