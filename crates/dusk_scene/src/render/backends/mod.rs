//! Scene backend implementations
//!
//! - [`RecordingBackend`]: keeps the command stream in memory
//! - [`PbrtWriter`]: writes the command stream as a `.pbrt` file

mod recording;
mod pbrt_writer;

pub use recording::RecordingBackend;
pub use pbrt_writer::PbrtWriter;
