//! External media tooling (ffmpeg/ffprobe subprocesses)
//!
//! Audio never flows through this process: extraction, size-driven
//! re-encoding and chunk splitting are all delegated to ffmpeg, and only
//! file paths travel through the pipeline.

mod chunk;
mod extract;

pub use chunk::{cleanup_chunks, needs_chunking, split_audio, AudioChunk, CHUNK_DURATION_SECS};
pub use extract::{extract_audio, probe_duration};
