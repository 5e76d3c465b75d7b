// THEORY:
// The `frame_source` module is the tracker's boundary with the camera. The
// core never talks to a network or a filesystem; it consumes a `FrameSource`,
// a blocking iterator-like trait that yields decoded RGB frames until the
// stream ends.
//
// Two implementations ship with the crate:
// - `MjpegStream` reads the `multipart/x-mixed-replace` MJPEG stream an
//   ESP32-cam style camera serves over HTTP. It scans the byte stream for
//   JPEG start/end markers and decodes each part; a corrupt part is logged
//   and skipped rather than killing the session.
// - `ImageDirSource` plays back a directory of still images in filename
//   order, for offline testing without a camera.

use crate::error::TrackerError;
use image::RgbImage;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A blocking supplier of decoded video frames.
///
/// `Ok(None)` signals a clean end of stream. Frames may arrive at any
/// resolution; the tracker resizes them before processing.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<RgbImage>, TrackerError>;
}

const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];
const JPEG_EOI: [u8; 2] = [0xFF, 0xD9];
const READ_CHUNK_SIZE: usize = 8192;
/// Upper bound on buffered bytes while hunting for a frame boundary, so a
/// misbehaving stream cannot grow the buffer without limit.
const MAX_BUFFER_SIZE: usize = 8 * 1024 * 1024;

/// An MJPEG-over-HTTP frame source.
pub struct MjpegStream {
    reader: Box<dyn Read + Send>,
    buffer: Vec<u8>,
}

impl MjpegStream {
    /// Connects to the camera's stream URL and starts reading.
    pub fn connect(url: &str) -> Result<Self, TrackerError> {
        let response = ureq::get(url)
            .call()
            .map_err(|e| TrackerError::Stream(e.to_string()))?;
        debug!(url, status = response.status(), "connected to mjpeg stream");
        Ok(Self {
            reader: Box::new(response.into_reader()),
            buffer: Vec::new(),
        })
    }

    #[cfg(test)]
    fn from_reader(reader: impl Read + Send + 'static) -> Self {
        Self {
            reader: Box::new(reader),
            buffer: Vec::new(),
        }
    }

    /// Pulls the next complete JPEG out of the buffer, if one is present.
    /// Returns the raw bytes with the buffer drained past them.
    fn take_jpeg(&mut self) -> Option<Vec<u8>> {
        let start = find_marker(&self.buffer, &JPEG_SOI)?;
        // Everything before the start marker is multipart boundary chatter.
        let end = find_marker(&self.buffer[start + 2..], &JPEG_EOI)? + start + 2 + 2;
        let jpeg = self.buffer[start..end].to_vec();
        self.buffer.drain(..end);
        Some(jpeg)
    }
}

impl FrameSource for MjpegStream {
    fn next_frame(&mut self) -> Result<Option<RgbImage>, TrackerError> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        loop {
            while let Some(jpeg) = self.take_jpeg() {
                match image::load_from_memory(&jpeg) {
                    Ok(decoded) => return Ok(Some(decoded.to_rgb8())),
                    Err(e) => {
                        // A torn frame is not fatal; wait for the next one.
                        warn!(error = %e, bytes = jpeg.len(), "skipping undecodable mjpeg part");
                    }
                }
            }

            if self.buffer.len() > MAX_BUFFER_SIZE {
                return Err(TrackerError::Stream(
                    "no frame boundary found within buffer limit".to_string(),
                ));
            }

            let read = self.reader.read(&mut chunk)?;
            if read == 0 {
                return Ok(None);
            }
            self.buffer.extend_from_slice(&chunk[..read]);
        }
    }
}

fn find_marker(haystack: &[u8], marker: &[u8; 2]) -> Option<usize> {
    haystack.windows(2).position(|w| w == marker)
}

/// Plays back a directory of still images in filename order.
pub struct ImageDirSource {
    paths: Vec<PathBuf>,
    next: usize,
}

impl ImageDirSource {
    pub fn open(dir: &Path) -> Result<Self, TrackerError> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                matches!(
                    path.extension().and_then(|e| e.to_str()),
                    Some("jpg") | Some("jpeg") | Some("png")
                )
            })
            .collect();
        paths.sort();
        if paths.is_empty() {
            return Err(TrackerError::Stream(format!(
                "no image frames found in {}",
                dir.display()
            )));
        }
        Ok(Self { paths, next: 0 })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl FrameSource for ImageDirSource {
    fn next_frame(&mut self) -> Result<Option<RgbImage>, TrackerError> {
        let Some(path) = self.paths.get(self.next) else {
            return Ok(None);
        };
        self.next += 1;
        let frame = image::open(path)?.to_rgb8();
        Ok(Some(frame))
    }
}
