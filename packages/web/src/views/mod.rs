mod landing;
pub use landing::Landing;

mod welcome;
pub use welcome::Welcome;
