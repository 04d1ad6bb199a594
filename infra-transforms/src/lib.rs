pub mod label;
pub mod spectrogram;

pub use label::{LabelIndexer, LabelPadding};
pub use spectrogram::SpectrogramPadding;
