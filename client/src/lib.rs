mod app;
mod config;
mod dom;
mod net;
mod overlay;
mod palette;
mod render;
mod state;
mod typeset;

pub use app::run;
pub use typeset::{MathJax, Typesetter};
