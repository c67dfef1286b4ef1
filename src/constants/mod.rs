pub mod color;
pub mod emoji;

pub mod colors {
    pub use super::color::MOON;
}

pub use emoji::icon;
