pub mod common;
pub mod image;
pub mod logo;

pub use self::common::*;
pub use self::image::*;
pub use self::logo::*;
