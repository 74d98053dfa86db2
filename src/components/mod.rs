pub mod app;
pub mod globe_view;
pub mod popover;
