//! Paired input/prediction buffers for one monitored model.
//!
//! Every served request contributes one [`FeatureRow`] and one [`Score`].
//! Both are appended inside the same critical section so the two buffers
//! always describe the same window of requests.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::warn;

use crate::monitor::buffer::{BufferError, BufferResult, SampleBuffer};
use crate::monitor::sample::{FeatureRow, Score};

/// File name of the persisted input buffer.
pub const INPUT_BUFFER_FILE: &str = "input_buffer.csv";
/// File name of the persisted prediction buffer.
pub const PRED_BUFFER_FILE: &str = "pred_buffer.csv";

/// Point-in-time copy of both buffers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Window {
    pub inputs: Vec<FeatureRow>,
    pub predictions: Vec<Score>,
}

impl Window {
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty() && self.predictions.is_empty()
    }
}

/// Current buffer lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferLengths {
    pub inputs: usize,
    pub predictions: usize,
}

struct Buffers {
    inputs: SampleBuffer<FeatureRow>,
    predictions: SampleBuffer<Score>,
}

impl Buffers {
    fn lengths(&self) -> BufferLengths {
        BufferLengths { inputs: self.inputs.len(), predictions: self.predictions.len() }
    }

    /// Both files go first; memory is only emptied once neither remains.
    fn clear(&mut self) -> BufferResult<()> {
        self.inputs.remove_file()?;
        if let Err(e) = self.predictions.remove_file() {
            if let Err(restore) = self.inputs.restore_file() {
                warn!(error = %restore, "could not restore input buffer file after failed reset");
            }
            return Err(e);
        }
        self.inputs.forget();
        self.predictions.forget();
        Ok(())
    }

    fn snapshot(&self) -> Window {
        Window { inputs: self.inputs.snapshot(), predictions: self.predictions.snapshot() }
    }
}

/// Thread-safe accumulation window shared by the serving path and the
/// background drift check.
pub struct DriftState {
    buffer_size: usize,
    buffers: Mutex<Buffers>,
}

impl DriftState {
    /// Open (or recover) the buffers stored under `dir`.
    pub fn open<P: AsRef<Path>>(dir: P, buffer_size: usize) -> BufferResult<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|e| BufferError::io(dir, e))?;

        let inputs = SampleBuffer::open(dir.join(INPUT_BUFFER_FILE), buffer_size)?;
        let predictions = SampleBuffer::open(dir.join(PRED_BUFFER_FILE), buffer_size)?;
        if inputs.len() != predictions.len() {
            warn!(
                inputs = inputs.len(),
                predictions = predictions.len(),
                dir = %dir.display(),
                "recovered drift buffers differ in length"
            );
        }

        Ok(Self { buffer_size, buffers: Mutex::new(Buffers { inputs, predictions }) })
    }

    /// Append one request's input and score. Returns `true` when both buffers
    /// are full and a drift check should run.
    pub fn record(&self, input: FeatureRow, score: Score) -> BufferResult<bool> {
        let mut buffers = self.lock();
        Self::record_locked(&mut buffers, input, score)
    }

    /// Like [`DriftState::record`], but when the pair fills the window the
    /// window is drained and returned in the same critical section.
    pub fn record_window(&self, input: FeatureRow, score: Score) -> BufferResult<Option<Window>> {
        let mut buffers = self.lock();
        if !Self::record_locked(&mut buffers, input, score)? {
            return Ok(None);
        }
        let window = buffers.snapshot();
        buffers.clear()?;
        Ok(Some(window))
    }

    /// Clear both buffers and delete their files.
    pub fn reset(&self) -> BufferResult<()> {
        self.lock().clear()
    }

    /// Copies of both buffers taken under the lock.
    pub fn snapshot_all(&self) -> Window {
        self.lock().snapshot()
    }

    pub fn lengths(&self) -> BufferLengths {
        self.lock().lengths()
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    fn record_locked(buffers: &mut Buffers, input: FeatureRow, score: Score) -> BufferResult<bool> {
        let (input_status, evicted) = buffers.inputs.push(input)?;
        let pred_status = match buffers.predictions.append(score) {
            Ok(status) => status,
            Err(e) => {
                if let Err(undo) = buffers.inputs.undo_push(evicted) {
                    warn!(error = %undo, "could not roll back input append; drift buffers diverged");
                }
                return Err(e);
            }
        };

        let lengths = buffers.lengths();
        if lengths.inputs != lengths.predictions {
            warn!(
                inputs = lengths.inputs,
                predictions = lengths.predictions,
                "drift buffers differ in length; holding drift check until both are full"
            );
        }
        Ok(input_status.is_full() && pred_status.is_full())
    }

    fn lock(&self) -> MutexGuard<'_, Buffers> {
        // Buffers commit atomically, so a poisoned guard still holds a consistent window.
        self.buffers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for DriftState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriftState")
            .field("buffer_size", &self.buffer_size)
            .field("lengths", &self.lengths())
            .finish()
    }
}
