//! Streaming inference
//!
//! Feeds frames to a multilayer LSTM one at a time with `step`, carrying the
//! state between calls, and checks the result against a full `forward` pass.

use burn::backend::NdArray;
use burn::tensor::{Distribution, Tensor};
use lego_rnn::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), LegoError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Streaming Example ===\n");

    type Backend = NdArray<f32>;
    let device = Default::default();

    let lstm = MultilayerLSTMConfig::new(6, 16)
        .with_layers(2)
        .with_use_previous_higher(true)
        .init::<Backend>(&device)?;

    let frames = 8;
    let input = Tensor::<Backend, 3>::random([1, frames, 6], Distribution::Uniform(-1.0, 1.0), &device);

    let mut state: Option<CellStack<Backend>> = None;
    let mut streamed = Vec::with_capacity(frames);
    for t in 0..frames {
        let frame = input.clone().narrow(1, t, 1).reshape([1, 6]);
        let (hidden, next) = lstm.step(frame, state.as_ref(), None)?;
        println!("  Frame {t}: hidden snapshot {:?}", hidden.dims());
        streamed.push(hidden);
        state = Some(next);
    }

    let streamed = Tensor::stack::<4>(streamed, 1);
    let full = lstm.forward(input, None)?;
    let diff: f32 = (streamed - full).abs().max().into_scalar();

    println!();
    println!("  Max difference to full forward pass: {diff:e}");
    println!("\n=== Streaming Example completed! ===");
    Ok(())
}
