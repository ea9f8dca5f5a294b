//! Audio decoding and resampling to the model input format.
//!
//! Whisper consumes 16kHz mono f32 PCM. Anything symphonia can demux and
//! decode (WAV, MP3, AAC/M4A per enabled features) is accepted; multichannel
//! audio is averaged down to mono and off-rate audio is resampled.

use std::io::Cursor;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::types::{ResultExt, TranscriptionError};

/// Sample rate whisper.cpp expects.
pub const MODEL_SAMPLE_RATE: u32 = 16_000;

/// Decode audio bytes into 16kHz mono f32 samples.
///
/// The MIME type is only a container hint for the probe; symphonia still
/// sniffs the actual byte stream, so a wrong or missing type usually works.
pub fn decode_to_model_rate(
    data: Vec<u8>,
    mime_type: &str,
) -> Result<Vec<f32>, TranscriptionError> {
    let source = MediaSourceStream::new(Box::new(Cursor::new(data)), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = extension_hint(mime_type) {
        let _ = hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            source,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .decode("probe")?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| TranscriptionError::Decode("no audio track found".into()))?;
    let track_id = track.id;
    let codec_params = track.codec_params.clone();
    let source_rate = codec_params.sample_rate.unwrap_or(MODEL_SAMPLE_RATE);
    let channels = codec_params.channels.map_or(1, |c| c.count());

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .decode("codec init")?;

    let mut mono: Vec<f32> = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(TranscriptionError::Decode(format!("packet read: {e}"))),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder.decode(&packet).decode("packet decode")?;
        let spec = *decoded.spec();
        let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        buf.copy_interleaved_ref(decoded);
        mono.extend(mix_to_mono(buf.samples(), channels));
    }

    if mono.is_empty() {
        return Err(TranscriptionError::Decode("no audio samples decoded".into()));
    }

    if source_rate == MODEL_SAMPLE_RATE {
        Ok(mono)
    } else {
        resample(&mono, source_rate, MODEL_SAMPLE_RATE)
    }
}

/// Container extension hint for a MIME type, if we recognize it.
fn extension_hint(mime_type: &str) -> Option<&'static str> {
    match mime_type {
        "audio/wav" | "audio/wave" | "audio/x-wav" => Some("wav"),
        "audio/mpeg" | "audio/mp3" => Some("mp3"),
        "audio/mp4" | "audio/m4a" | "audio/x-m4a" | "audio/aac" => Some("m4a"),
        "audio/ogg" | "audio/vorbis" => Some("ogg"),
        "audio/flac" | "audio/x-flac" => Some("flac"),
        _ => None,
    }
}

/// Average interleaved frames down to a single channel.
fn mix_to_mono(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

/// Resample mono audio between rates with a sinc interpolator.
fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, TranscriptionError> {
    use rubato::{
        Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
    };

    let ratio = f64::from(to_rate) / f64::from(from_rate);
    let chunk_size = 1024;
    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let mut resampler =
        SincFixedIn::<f32>::new(ratio, 2.0, params, chunk_size, 1).resample("init")?;

    let mut output = Vec::with_capacity((samples.len() as f64 * ratio) as usize + chunk_size);
    for chunk in samples.chunks(chunk_size) {
        // SincFixedIn wants full chunks; zero-pad the tail.
        let input = if chunk.len() == chunk_size {
            vec![chunk.to_vec()]
        } else {
            let mut padded = chunk.to_vec();
            padded.resize(chunk_size, 0.0);
            vec![padded]
        };

        let processed = resampler.process(&input, None).resample("process")?;
        if let Some(channel) = processed.first() {
            output.extend_from_slice(channel);
        }
    }

    Ok(output)
}
