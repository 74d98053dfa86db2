pub mod drag;
pub mod gesture;
pub mod globe;
pub mod hover;

pub use drag::DragState;
pub use gesture::PointerSample;
pub use globe::GlobeState;
pub use hover::hit_test;
