//! Audio Capture Adapter (C12): opens the default input device and feeds
//! fixed-size mono `f32` chunks into the analysis pipeline on `T-audio`.
//!
//! The cpal callback itself must never block or allocate, so it only copies
//! samples into a bounded SPSC ring; a plain loop on a dedicated thread
//! drains that ring and hands fixed-size chunks to [`lumen_dsp::AnalysisPipeline`].

use crate::command::{apply_pipeline_command, PipelineCommand};
use crate::error::{EngineError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat};
use lumen_core::spsc::{Consumer, Producer, SpscRingBuffer};
use lumen_dsp::AnalysisPipeline;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

const CAPTURE_RING_CAPACITY: usize = 1 << 16;

/// Push mono samples from a cpal callback into the bounded ring, converting
/// from the device's native sample format and mixing down to mono if needed.
fn push_samples<T: Sample + cpal::SizedSample>(data: &[T], channels: usize, producer: &mut Producer<f32>, dropped: &AtomicBool)
where
    f32: cpal::FromSample<T>,
{
    for frame in data.chunks(channels.max(1)) {
        let mono = frame.iter().map(|s| f32::from_sample(*s)).sum::<f32>() / frame.len().max(1) as f32;
        if producer.try_push(mono).is_err() {
            dropped.store(true, Ordering::Relaxed);
        }
    }
}

/// Open the default input device and build its input stream. Returns the
/// live `cpal::Stream` (must be kept alive for capture to continue), the
/// consumer side of the sample ring, the device's native sample rate, and
/// the shared overflow flag the cpal callback sets when the ring is full.
pub fn open_default_input() -> Result<(cpal::Stream, Consumer<f32>, u32, Arc<AtomicBool>)> {
    let host = cpal::default_host();
    let device = host.default_input_device().ok_or(EngineError::NoInputDevice)?;
    let config = device
        .default_input_config()
        .map_err(|e| EngineError::UnsupportedInputConfig(e.to_string()))?;
    let sample_rate = config.sample_rate().0;

    let (producer, consumer) = SpscRingBuffer::new::<f32>(CAPTURE_RING_CAPACITY);
    let producer = Arc::new(Mutex::new(producer));
    let dropped = Arc::new(AtomicBool::new(false));
    let channels = config.channels() as usize;
    let sample_format = config.sample_format();

    let err_fn = |err| log::warn!("audio input stream error: {err}");

    macro_rules! build_stream {
        ($t:ty) => {{
            let producer = Arc::clone(&producer);
            let dropped = Arc::clone(&dropped);
            device.build_input_stream(
                &config.into(),
                move |data: &[$t], _| {
                    let mut producer = producer.lock().expect("capture ring producer mutex poisoned");
                    push_samples(data, channels, &mut producer, &dropped);
                },
                err_fn,
                None,
            )
        }};
    }

    let stream = match sample_format {
        SampleFormat::F32 => build_stream!(f32),
        SampleFormat::I16 => build_stream!(i16),
        SampleFormat::U16 => build_stream!(u16),
        other => return Err(EngineError::UnsupportedInputConfig(format!("{other:?}"))),
    }
    .map_err(|e| EngineError::UnsupportedInputConfig(e.to_string()))?;

    stream.play().map_err(|e| EngineError::UnsupportedInputConfig(e.to_string()))?;

    Ok((stream, consumer, sample_rate, dropped))
}

/// `T-audio`: drains the capture ring, accumulates fixed-size chunks, and
/// runs them through the analysis pipeline, publishing detector events.
pub fn run_capture_loop(
    mut consumer: Consumer<f32>,
    mut pipeline: AnalysisPipeline,
    chunk_len: usize,
    mut events: Producer<lumen_dsp::DetectorEvent>,
    mut commands: Consumer<PipelineCommand>,
    dropped: Arc<AtomicBool>,
    running: Arc<AtomicBool>,
) {
    let mut chunk = Vec::with_capacity(chunk_len);
    let mut dropped_events = 0u64;
    let mut last_overflow_log: Option<Instant> = None;

    while running.load(Ordering::Relaxed) {
        while let Some(command) = commands.try_pop() {
            apply_pipeline_command(&mut pipeline, command);
        }

        if dropped.load(Ordering::Relaxed) && last_overflow_log.is_none_or(|t| t.elapsed() >= Duration::from_secs(1)) {
            log::warn!("capture ring overflow: input samples were dropped");
            dropped.store(false, Ordering::Relaxed);
            last_overflow_log = Some(Instant::now());
        }

        match consumer.try_pop() {
            Some(sample) => {
                chunk.push(sample);
                if chunk.len() == chunk_len {
                    for event in pipeline.process(&chunk, Instant::now()).as_slice() {
                        if events.try_push(*event).is_err() {
                            dropped_events += 1;
                            if dropped_events % 100 == 1 {
                                log::warn!("detector event channel overflow, dropped {dropped_events} events so far");
                            }
                        }
                    }
                    chunk.clear();
                }
            }
            None => std::thread::sleep(std::time::Duration::from_millis(1)),
        }
    }
}

/// Entry point for the whole `T-audio` thread: opens the device, builds the
/// analysis pipeline at the device's native sample rate, and runs the
/// capture loop until `running` clears. The `cpal::Stream` is `!Send`, so it
/// must be constructed on this thread rather than passed in.
pub fn run_audio_thread(
    config: lumen_dsp::AnalysisConfig,
    events: Producer<lumen_dsp::DetectorEvent>,
    commands: Consumer<PipelineCommand>,
    running: Arc<AtomicBool>,
) -> Result<()> {
    let (stream, consumer, sample_rate, dropped) = open_default_input()?;
    let config = lumen_dsp::AnalysisConfig { sample_rate: sample_rate as f32, ..config };
    let pipeline = AnalysisPipeline::new(config.clone());
    run_capture_loop(consumer, pipeline, config.chunk_len, events, commands, dropped, running);
    drop(stream);
    Ok(())
}
