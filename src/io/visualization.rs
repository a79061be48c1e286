//! Collapse event capture and GIF generation for solve visualization

use image::{Frame, Rgba, RgbaImage};
use ndarray::Array3;

use crate::io::error::{GenerationError, Result};
use crate::spatial::grid::{Coordinate, GridVolume};

/// One recorded event of the collapse process
#[derive(Debug, Clone)]
pub enum CollapseEvent {
    /// A cell was decided to a module of the given prototype
    Placed {
        /// Cell coordinate
        coordinate: Coordinate,
        /// Prototype index, used to look up the display color
        prototype: usize,
        /// Collapse step when this happened
        iteration: usize,
    },
    /// A previously decided cell was undone by backtracking
    Retracted {
        /// Cell coordinate
        coordinate: Coordinate,
        /// Collapse step when this happened
        iteration: usize,
    },
    /// The attempt was abandoned and the grid reset for a restart
    Reset {
        /// Collapse step when this happened
        iteration: usize,
    },
}

/// Captures collapse events during solving for post-hoc visualization
///
/// Frames render a top-down view of the volume: each pixel shows the color of
/// the highest visible module in its column, so vertical structure reads as
/// occlusion. Replay covers placements, backtracking retractions, and
/// restarts.
pub struct CollapseCapture {
    events: Vec<CollapseEvent>,
    volume: GridVolume,
    colors: Vec<[u8; 4]>,
    empty_color: [u8; 4],
}

impl CollapseCapture {
    /// The average of all visible prototype colors is used as the empty color
    pub fn new(volume: GridVolume, colors: Vec<[u8; 4]>) -> Self {
        let visible: Vec<[u8; 4]> = colors.iter().copied().filter(|c| c[3] > 0).collect();
        let empty_color = if visible.is_empty() {
            [128, 128, 128, 255]
        } else {
            let mut sums = [0u32; 4];
            for color in &visible {
                for (sum, component) in sums.iter_mut().zip(color.iter()) {
                    *sum += u32::from(*component);
                }
            }
            let count = visible.len() as u32;
            [
                (sums[0] / count) as u8,
                (sums[1] / count) as u8,
                (sums[2] / count) as u8,
                255,
            ]
        };

        Self {
            events: Vec::new(),
            volume,
            colors,
            empty_color,
        }
    }

    /// Record a decided cell
    pub fn record_placement(&mut self, coordinate: Coordinate, prototype: usize, iteration: usize) {
        self.events.push(CollapseEvent::Placed {
            coordinate,
            prototype,
            iteration,
        });
    }

    /// Record a backtracked cell
    pub fn record_retraction(&mut self, coordinate: Coordinate, iteration: usize) {
        self.events
            .push(CollapseEvent::Retracted {
                coordinate,
                iteration,
            });
    }

    /// Record an attempt restart
    pub fn record_reset(&mut self, iteration: usize) {
        self.events.push(CollapseEvent::Reset { iteration });
    }

    /// All recorded events in order
    pub fn events(&self) -> &[CollapseEvent] {
        &self.events
    }

    /// Total number of recorded events
    pub const fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Export the captured events as a GIF with automatic frame skipping
    ///
    /// Skips frames if the requested frame rate exceeds viewer capabilities:
    /// with a 5ms request but a 50ms viewer minimum, every 10th event becomes
    /// a frame so the apparent speed is preserved.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No events were captured
    /// - File system operations fail
    /// - GIF encoding fails
    pub fn export_gif(&self, output_path: &str, frame_delay_ms: u32) -> Result<()> {
        use crate::io::configuration::VIEWER_MIN_FRAME_DELAY_MS;

        if self.events.is_empty() {
            return Err(GenerationError::InvalidParameter {
                parameter: "events",
                value: "0".to_string(),
                reason: "No collapse events captured for visualization".to_string(),
            });
        }

        let effective_delay_ms = frame_delay_ms.max(VIEWER_MIN_FRAME_DELAY_MS);
        let skip_factor = if frame_delay_ms < VIEWER_MIN_FRAME_DELAY_MS {
            VIEWER_MIN_FRAME_DELAY_MS.div_ceil(frame_delay_ms) as usize
        } else {
            1
        };

        let frames = self.generate_frames(effective_delay_ms, skip_factor);

        if let Some(parent) = std::path::Path::new(output_path).parent() {
            std::fs::create_dir_all(parent).map_err(|e| GenerationError::FileSystem {
                path: parent.to_path_buf(),
                operation: "create directory",
                source: e,
            })?;
        }

        let file = std::fs::File::create(output_path).map_err(|e| GenerationError::FileSystem {
            path: output_path.into(),
            operation: "create file",
            source: e,
        })?;

        let mut encoder = image::codecs::gif::GifEncoder::new(file);
        encoder
            .encode_frames(frames)
            .map_err(|e| GenerationError::ImageExport {
                path: output_path.into(),
                source: e,
            })?;

        Ok(())
    }

    fn generate_frames(&self, delay_ms: u32, skip_factor: usize) -> Vec<Frame> {
        let volume = self.volume;
        let mut placed: Array3<Option<usize>> =
            Array3::from_elem((volume.size_x, volume.size_y, volume.size_z), None);
        let mut frames = Vec::new();

        frames.push(self.render_frame(&placed, delay_ms));

        let mut event_count = 0;
        for event in &self.events {
            match event {
                CollapseEvent::Placed {
                    coordinate,
                    prototype,
                    ..
                } => {
                    if let Some(cell) = placed.get_mut(*coordinate) {
                        *cell = Some(*prototype);
                    }
                }
                CollapseEvent::Retracted { coordinate, .. } => {
                    if let Some(cell) = placed.get_mut(*coordinate) {
                        *cell = None;
                    }
                }
                CollapseEvent::Reset { .. } => {
                    placed.fill(None);
                }
            }

            event_count += 1;
            if event_count % skip_factor == 0 {
                frames.push(self.render_frame(&placed, delay_ms));
            }
        }

        if event_count % skip_factor != 0 {
            frames.push(self.render_frame(&placed, delay_ms));
        }

        // Final frame displays longer for better visibility
        let final_frame_delay = delay_ms * 25;
        if let Some(last_frame_img) = frames.last().map(|f| f.buffer().clone()) {
            frames.push(Frame::from_parts(
                last_frame_img,
                0,
                0,
                image::Delay::from_numer_denom_ms(final_frame_delay, 1),
            ));
        }

        frames
    }

    /// Render a top-down frame: highest visible module wins each column
    fn render_frame(&self, placed: &Array3<Option<usize>>, delay_ms: u32) -> Frame {
        let volume = self.volume;
        let mut img = RgbaImage::new(volume.size_x as u32, volume.size_z as u32);

        for z in 0..volume.size_z {
            for x in 0..volume.size_x {
                let mut color = self.empty_color;
                for y in (0..volume.size_y).rev() {
                    let visible = placed
                        .get([x, y, z])
                        .copied()
                        .flatten()
                        .and_then(|prototype| self.colors.get(prototype).copied())
                        .filter(|rgba| rgba[3] > 0);
                    if let Some(rgba) = visible {
                        color = rgba;
                        break;
                    }
                }
                img.put_pixel(x as u32, z as u32, Rgba(color));
            }
        }

        Frame::from_parts(img, 0, 0, image::Delay::from_numer_denom_ms(delay_ms, 1))
    }
}
