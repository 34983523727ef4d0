pub mod emitter;
pub mod pixel_grid;
pub mod position;
pub mod sample;
pub mod sink;
