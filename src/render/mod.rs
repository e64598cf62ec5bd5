pub mod animation;
pub mod presenter;
pub mod renderer;

pub use animation::{AnimationKind, AnimationRequest, Animations};
pub use presenter::{TuiPresenter, UiCmd};
pub use renderer::Renderer;
