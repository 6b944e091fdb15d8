// Presentation layer - View implementations
pub mod text_view;
