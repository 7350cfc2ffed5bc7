//! Microphone capture and WAV serialization.

pub mod recorder;
pub mod wav;

pub use recorder::{list_input_devices, MicRecorder};
pub use wav::{encode_wav, read_wav_file, AudioBuffer};
