pub mod images;
pub mod index;
pub mod settings;
pub mod slideshow;
