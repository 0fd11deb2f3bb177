mod composite;
mod warp;

pub use composite::{composite, AlphaMask};
pub use warp::warp_garment;
