//! Pagination and the widget-facing table session

mod controller;
mod session;
mod view;
mod window;

pub use controller::*;
pub use session::*;
pub use view::*;
pub use window::*;
