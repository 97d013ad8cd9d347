//! WAV decoding with symphonia
//!
//! Integer PCM (8 to 32 bit), IEEE float (32 and 64 bit) and ADPCM are
//! accepted. Multi-channel files are collapsed to their first channel.

use super::waveform::Waveform;
use crate::error::{Result, WaveError};
use std::io::Cursor;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Load a WAV file from disk
pub fn load_wav<P: AsRef<Path>>(path: P) -> Result<Waveform> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }
    decode(Box::new(file), &hint)
}

/// Decode WAV data held in memory
pub fn load_wav_bytes(bytes: &[u8]) -> Result<Waveform> {
    decode(Box::new(Cursor::new(bytes.to_vec())), &Hint::new())
}

fn decode(source: Box<dyn MediaSource>, hint: &Hint) -> Result<Waveform> {
    let mss = MediaSourceStream::new(source, Default::default());
    let probed = symphonia::default::get_probe().format(
        hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or(SymphoniaError::Unsupported("no audio track"))?
        .clone();
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| WaveError::InvalidInput("sample rate missing from header".into()))?;

    let mut decoder =
        symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut samples = Vec::new();
    let mut channels = 0;
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => return Err(e.into()),
        };
        if packet.track_id() != track.id {
            continue;
        }

        let decoded = decoder.decode(&packet)?;
        let spec = *decoded.spec();
        channels = spec.channels.count().max(1);

        let mut buffer = SampleBuffer::<f64>::new(decoded.capacity() as u64, spec);
        buffer.copy_interleaved_ref(decoded);
        samples.extend(buffer.samples().iter().step_by(channels));
    }

    tracing::debug!(
        channels,
        sample_rate,
        bits = track.codec_params.bits_per_sample,
        frames = samples.len(),
        "decoded WAV"
    );

    Waveform::new(samples, sample_rate)
}
