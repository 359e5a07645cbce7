pub mod forces;
pub mod particles;
pub mod pulse;
pub mod render;
pub mod text;
