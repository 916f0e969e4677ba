mod schema;
mod transform_choice;
mod ui_choice;

pub use schema::*;
pub use transform_choice::*;
pub use ui_choice::UIChoice;
