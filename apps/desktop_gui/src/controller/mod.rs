//! Controller layer: UI events and command orchestration around the upload widget.

pub mod events;
pub mod orchestration;
