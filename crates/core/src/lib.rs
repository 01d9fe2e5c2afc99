// Core of prefmap: the prefecture geography, its projection onto the drawing
// surface, and the interaction state that the terminal and web front ends drive.

pub mod animation;
pub mod annotations;
pub mod controller;
pub mod domain;
pub mod error;
pub mod geometry;
pub mod loader;
pub mod notice;
pub mod projection;
pub mod transform;

pub use annotations::AnnotationTable;
pub use controller::{Effect, MapController, MapEvent, Phase};
pub use domain::{RegionAnnotation, RegionFeature, RegionKey, DESCRIPTION_CHAR_CAP};
pub use error::{MapError, ValidationError};
pub use loader::LoadOutcome;
pub use transform::ViewTransform;
