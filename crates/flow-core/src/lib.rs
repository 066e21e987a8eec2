pub mod camera;
pub mod config;
pub mod constants;
pub mod device;
pub mod error;
pub mod fade;
pub mod lines;
pub mod metrics;
pub mod path;
pub mod scene;
pub mod scheduler;
pub mod signals;
pub mod vertex;
pub mod viewport;

pub use camera::*;
pub use config::*;
pub use device::*;
pub use error::*;
pub use lines::*;
pub use metrics::*;
pub use path::*;
pub use scene::*;
pub use scheduler::*;
pub use signals::*;
pub use vertex::*;
pub use viewport::*;
