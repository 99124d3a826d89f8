//! Frame sinks for export encoding.

use std::io::Write;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crossbeam_channel::{bounded, Sender};
use log::{debug, warn};

use super::{ExportError, ExportFormat};

/// Receives raw RGBA frames during capture. The ffmpeg sink is the production
/// implementation; tests substitute in-memory sinks.
pub trait FrameSink: Send {
    /// Accept one frame of tightly packed RGBA pixels.
    fn write_frame(&mut self, rgba: &[u8]) -> Result<(), ExportError>;

    /// Flush and close the output. Must be called exactly once.
    fn finish(&mut self) -> Result<(), ExportError>;
}

/// Pipes raw frames into an ffmpeg child process that encodes and muxes the
/// final file. Frames are handed to a writer thread over a bounded channel so
/// composition is not blocked on encoder throughput.
pub struct FfmpegSink {
    child: Child,
    sender: Option<Sender<Vec<u8>>>,
    writer: Option<JoinHandle<std::io::Result<()>>>,
}

impl FfmpegSink {
    /// Spawn the encoder. `audio` is muxed in when given; when the file is
    /// missing the export degrades to video-only rather than failing.
    pub fn spawn(
        output: &Path,
        width: u32,
        height: u32,
        fps: u32,
        format: ExportFormat,
        audio: Option<&Path>,
    ) -> Result<Self, ExportError> {
        let mut command = Command::new("ffmpeg");
        command
            .arg("-y")
            .args(["-f", "rawvideo"])
            .args(["-pixel_format", "rgba"])
            .args(["-video_size", &format!("{width}x{height}")])
            .args(["-framerate", &fps.to_string()])
            .args(["-i", "-"]);

        match audio {
            Some(path) if path.is_file() => {
                command.arg("-i").arg(path).args(["-shortest"]);
            }
            Some(path) => {
                warn!(
                    "audio source {} not found, exporting video only",
                    path.display()
                );
            }
            None => {}
        }

        command
            .args(["-c:v", format.video_codec()])
            .args(["-pix_fmt", "yuv420p"])
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let mut child = command.spawn().map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                ExportError::CaptureUnavailable
            } else {
                ExportError::Io(err)
            }
        })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| ExportError::Encoder("ffmpeg stdin not available".into()))?;

        let (sender, receiver) = bounded::<Vec<u8>>(4);
        let writer = std::thread::spawn(move || -> std::io::Result<()> {
            for frame in receiver {
                stdin.write_all(&frame)?;
            }
            Ok(())
        });

        debug!("spawned ffmpeg encoder for {}", output.display());
        Ok(Self {
            child,
            sender: Some(sender),
            writer: Some(writer),
        })
    }
}

impl FrameSink for FfmpegSink {
    fn write_frame(&mut self, rgba: &[u8]) -> Result<(), ExportError> {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| ExportError::Encoder("sink already finished".into()))?;
        sender
            .send(rgba.to_vec())
            .map_err(|_| ExportError::Encoder("encoder stopped accepting frames".into()))
    }

    fn finish(&mut self) -> Result<(), ExportError> {
        // Closing the channel lets the writer drain and close ffmpeg's stdin.
        self.sender.take();
        if let Some(writer) = self.writer.take() {
            match writer.join() {
                Ok(result) => result?,
                Err(_) => return Err(ExportError::Encoder("frame writer panicked".into())),
            }
        }
        let status = self.child.wait()?;
        if !status.success() {
            return Err(ExportError::Encoder(format!(
                "ffmpeg exited with {status}"
            )));
        }
        Ok(())
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        self.sender.take();
        if let Some(writer) = self.writer.take() {
            let _ = writer.join();
        }
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Collects frames in memory. Test-only sink kept public so integration
/// tests can run the exporter without ffmpeg. The frame store is shared so
/// callers can keep a handle after boxing the sink into an exporter.
#[derive(Default)]
pub struct MemorySink {
    frames: Arc<Mutex<Vec<Vec<u8>>>>,
    pub finished: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the captured frames, valid after the sink is handed off.
    pub fn frames(&self) -> Arc<Mutex<Vec<Vec<u8>>>> {
        Arc::clone(&self.frames)
    }
}

impl FrameSink for MemorySink {
    fn write_frame(&mut self, rgba: &[u8]) -> Result<(), ExportError> {
        self.frames
            .lock()
            .map_err(|_| ExportError::Encoder("frame store poisoned".into()))?
            .push(rgba.to_vec());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), ExportError> {
        self.finished = true;
        Ok(())
    }
}

/// A sink that fails on demand, for exercising error paths.
pub struct FailingSink {
    pub fail_after: usize,
    written: usize,
}

impl FailingSink {
    pub fn new(fail_after: usize) -> Self {
        Self {
            fail_after,
            written: 0,
        }
    }
}

impl FrameSink for FailingSink {
    fn write_frame(&mut self, _rgba: &[u8]) -> Result<(), ExportError> {
        if self.written >= self.fail_after {
            return Err(ExportError::Encoder("simulated encoder failure".into()));
        }
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), ExportError> {
        Ok(())
    }
}
