pub mod point;
pub mod store;
pub mod synthetic;

pub use point::Point;
pub use store::PointStore;
pub use synthetic::gaussian_blobs;
