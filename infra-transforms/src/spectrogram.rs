use ndarray::{s, Array2};
use speechprep_domain::{DomainError, Sample, Transform};

/// Pads the time axis of a `(time_steps, channels)` spectrogram. Channels are
/// never padded.
pub struct SpectrogramPadding {
    max_spectrogram_length: usize,
    padding_value: f32,
}

impl SpectrogramPadding {
    pub fn new(max_spectrogram_length: usize, padding_value: f32) -> Self {
        Self {
            max_spectrogram_length,
            padding_value,
        }
    }
}

impl Transform for SpectrogramPadding {
    fn name(&self) -> &'static str {
        "spectrogram_padding"
    }

    fn apply(&self, sample: Sample) -> Result<Sample, DomainError> {
        let Sample { features, label } = sample;
        let (time_steps, channels) = features.dim();

        if time_steps > self.max_spectrogram_length {
            return Err(DomainError::shape(format!(
                "spectrogram has {time_steps} time steps, exceeds max_spectrogram_length {}",
                self.max_spectrogram_length
            )));
        }
        if time_steps == self.max_spectrogram_length {
            return Ok(Sample::new(features, label));
        }

        let mut padded = Array2::from_elem(
            (self.max_spectrogram_length, channels),
            self.padding_value,
        );
        padded.slice_mut(s![..time_steps, ..]).assign(&features);

        tracing::trace!(
            time_steps,
            channels,
            padded_steps = self.max_spectrogram_length - time_steps,
            "padded spectrogram"
        );

        Ok(Sample::new(padded, label))
    }
}
