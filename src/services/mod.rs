pub mod gate;
pub mod overlay;
pub mod transport;
