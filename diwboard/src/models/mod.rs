mod chat;
mod graph;
mod report;
mod storyboard;

pub use chat::*;
pub use graph::*;
pub use report::*;
pub use storyboard::*;
