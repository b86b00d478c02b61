use crate::{FlavorError, Result};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use tracing::debug;

/// Mono sinc resampler from the device rate to the upload rate
pub struct AudioResampler {
    resampler: SincFixedIn<f32>,
    input_rate: u32,
    output_rate: u32,
}

impl AudioResampler {
    pub fn new(input_rate: u32, output_rate: u32) -> Result<Self> {
        if input_rate == 0 || output_rate == 0 {
            return Err(FlavorError::Config(
                "Sample rates must be greater than 0".into(),
            ));
        }

        let params = SincInterpolationParameters {
            sinc_len: 256,
            f_cutoff: 0.95,
            interpolation: SincInterpolationType::Linear,
            oversampling_factor: 256,
            window: WindowFunction::BlackmanHarris2,
        };

        let resampler = SincFixedIn::<f32>::new(
            output_rate as f64 / input_rate as f64,
            2.0,
            params,
            1024,
            1,
        )
        .map_err(|e| FlavorError::AudioProcessing(format!("Failed to create resampler: {}", e)))?;

        debug!("Created resampler: {} Hz -> {} Hz", input_rate, output_rate);

        Ok(Self {
            resampler,
            input_rate,
            output_rate,
        })
    }

    /// Resample a whole recording.
    ///
    /// The filter delay is trimmed from the front and the tail is flushed
    /// with silence, so the output lines up with the input.
    pub fn resample(&mut self, input: &[f32]) -> Result<Vec<f32>> {
        if input.is_empty() {
            return Ok(Vec::new());
        }

        self.resampler.reset();

        let chunk_size = self.resampler.input_frames_max();
        let delay = self.resampler.output_delay();
        let expected = (input.len() as u64 * self.output_rate as u64)
            .div_ceil(self.input_rate as u64) as usize;

        let mut output = Vec::with_capacity(expected + delay + chunk_size);
        let mut planar = vec![vec![0.0f32; chunk_size]];
        let mut offset = 0;

        while output.len() < expected + delay {
            // SincFixedIn wants exactly chunk_size frames; past the end it gets silence
            let chunk = if offset < input.len() {
                &input[offset..(offset + chunk_size).min(input.len())]
            } else {
                &[][..]
            };
            planar[0].fill(0.0);
            planar[0][..chunk.len()].copy_from_slice(chunk);
            offset += chunk_size;

            let processed = self
                .resampler
                .process(&planar, None)
                .map_err(|e| FlavorError::AudioProcessing(format!("Resampling failed: {}", e)))?;
            output.extend_from_slice(&processed[0]);
        }

        output.drain(..delay);
        output.truncate(expected);

        debug!("Resampled {} frames -> {} frames", input.len(), output.len());
        Ok(output)
    }
}

/// Resample mono audio in one step
pub fn resample_audio(input: &[f32], input_rate: u32, output_rate: u32) -> Result<Vec<f32>> {
    if input_rate == output_rate {
        return Ok(input.to_vec());
    }

    AudioResampler::new(input_rate, output_rate)?.resample(input)
}
