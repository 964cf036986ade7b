//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod camera;
pub mod network;
pub mod persistence;

pub use camera::{Camera, CameraError, CodeReport, Symbology};
pub use network::{HttpClient, HttpResponse, NetworkError};
pub use persistence::KeyValueStore;
