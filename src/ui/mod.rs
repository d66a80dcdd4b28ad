pub mod editor_view;
pub mod frame;
pub mod input;
pub mod renderer;
pub mod sound;
