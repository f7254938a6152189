//! Core account types.

mod image;
mod rating;

pub use image::Image;
pub use rating::{ParseRatingError, Rating};
