mod dashboard;
mod state;

pub use dashboard::Dashboard;
pub use state::{Action, AppState, Highlight, Panel, StoryboardState, Topic};
