//! Webcam capture through nokhwa on a dedicated thread.

use crossbeam_channel::{Receiver, Sender, TryRecvError, TrySendError};
use image::RgbImage;
use nokhwa::{
    pixel_format::RgbFormat,
    utils::{CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType},
    Camera,
};
use pixcloud::{Error, VideoSource};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
};

use super::FailureBudget;

/// Decoded frames buffered between the capture thread and the frame loop.
const FRAME_QUEUE: usize = 2;

/// A decoded frame, or the error that ended capture.
type CaptureMsg = Result<RgbImage, Error>;

/// Latest-frame view of a capture device.
///
/// The device is opened and read on its own thread (some backends are not
/// `Send`); decoded frames cross over a bounded channel and the newest one
/// wins on each [`refresh`](VideoSource::refresh).
pub struct WebcamSource {
    rx: Receiver<CaptureMsg>,
    frame: Option<RgbImage>,
    name: String,
    stop: Arc<AtomicBool>,
    worker: Option<thread::JoinHandle<()>>,
    disconnected: bool,
}

impl WebcamSource {
    /// Opens device `index`, blocking until it either streams or fails.
    pub fn open(index: u32) -> pixcloud::Result<Self> {
        let (tx, rx) = crossbeam_channel::bounded::<CaptureMsg>(FRAME_QUEUE);
        let (ready_tx, ready_rx) = crossbeam_channel::bounded::<Result<String, String>>(1);
        let stop = Arc::new(AtomicBool::new(false));

        let worker = thread::Builder::new()
            .name("webcam-capture".to_string())
            .spawn({
                let stop = stop.clone();
                move || capture_loop(index, tx, ready_tx, stop)
            })
            .map_err(|e| Error::VideoUnavailable(e.to_string()))?;

        match ready_rx.recv() {
            Ok(Ok(name)) => {
                log::info!("Opened camera {}: {}", index, name);
                Ok(Self {
                    rx,
                    frame: None,
                    name,
                    stop,
                    worker: Some(worker),
                    disconnected: false,
                })
            }
            Ok(Err(msg)) => {
                let _ = worker.join();
                Err(Error::VideoUnavailable(msg))
            }
            Err(_) => {
                let _ = worker.join();
                Err(Error::VideoUnavailable(
                    "capture thread exited during startup".to_string(),
                ))
            }
        }
    }
}

fn open_camera(index: u32) -> Result<Camera, nokhwa::NokhwaError> {
    let wanted = CameraFormat::new(
        nokhwa::utils::Resolution::new(1280, 720),
        FrameFormat::MJPEG,
        30,
    );
    let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(wanted));
    let mut camera = Camera::new(CameraIndex::Index(index), requested)?;
    camera.open_stream()?;
    Ok(camera)
}

fn capture_loop(
    index: u32,
    tx: Sender<CaptureMsg>,
    ready_tx: Sender<Result<String, String>>,
    stop: Arc<AtomicBool>,
) {
    let mut camera = match open_camera(index) {
        Ok(camera) => camera,
        Err(e) => {
            let _ = ready_tx.send(Err(e.to_string()));
            return;
        }
    };
    let _ = ready_tx.send(Ok(camera.info().human_name()));

    let mut failures = FailureBudget::default();
    while !stop.load(Ordering::Acquire) {
        let decoded = match camera
            .frame()
            .and_then(|buf| buf.decode_image::<RgbFormat>())
        {
            Ok(img) => {
                failures.record_success();
                img
            }
            Err(e) => {
                log::debug!("Skipping unreadable camera frame: {}", e);
                if let Some(err) = failures.record_failure(&e) {
                    // Best effort: a full queue still ends in a disconnect.
                    let _ = tx.try_send(Err(err));
                    break;
                }
                continue;
            }
        };

        // nokhwa may link a different `image` release; move the raw bytes across.
        let (w, h) = decoded.dimensions();
        let Some(frame) = RgbImage::from_raw(w, h, decoded.into_raw()) else {
            log::debug!("Discarding malformed {}x{} frame", w, h);
            continue;
        };

        match tx.try_send(Ok(frame)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                log::debug!("Dropped webcam frame (render thread busy)");
            }
            Err(TrySendError::Disconnected(_)) => break,
        }
    }

    if let Err(e) = camera.stop_stream() {
        log::warn!("Failed to stop camera stream: {}", e);
    }
    log::debug!("Capture thread for camera {} finished", index);
}

impl VideoSource for WebcamSource {
    fn refresh(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(Ok(frame)) => self.frame = Some(frame),
                Ok(Err(err)) => log::warn!("Camera '{}': {}", self.name, err),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.disconnected {
                        log::warn!("Camera '{}' stopped delivering frames", self.name);
                        self.disconnected = true;
                        self.frame = None;
                    }
                    break;
                }
            }
        }
    }

    fn is_ready(&self) -> bool {
        self.frame.is_some()
    }

    fn current_frame(&self) -> Option<&RgbImage> {
        self.frame.as_ref()
    }

    fn describe(&self) -> String {
        format!("webcam '{}'", self.name)
    }
}

impl Drop for WebcamSource {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        // Unblock a full queue so the worker sees the stop flag.
        while self.rx.try_recv().is_ok() {}
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("Capture thread panicked");
            }
        }
    }
}
