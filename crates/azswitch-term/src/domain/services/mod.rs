//! State machine, rendering and the two services that feed it.

pub mod actions;
mod app_state;
pub mod events;
mod renderer;
mod themes;

pub use actions::ActionTimeouts;
pub use actions::ActionsService;
pub use app_state::*;
pub use events::EventsService;
pub use renderer::render;
pub use renderer::render_view;
pub use renderer::RenderedView;
pub use renderer::TITLE;
pub use themes::Theme;
