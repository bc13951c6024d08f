//! Sequence processing with a multilayer LSTM
//!
//! Runs a three-layer LSTM with top-down feedback over a batch of sequences,
//! once without resets and once with two episodes packed into each row.
//!
//! Run with `RUST_LOG=lego_rnn=trace cargo run --example sequence` to see
//! the library's tracing output.

use burn::backend::NdArray;
use burn::tensor::{Distribution, Tensor};
use lego_rnn::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), LegoError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Multilayer LSTM Example ===\n");

    type Backend = NdArray<f32>;
    let device = Default::default();

    let config = MultilayerLSTMConfig::new(12, 32)
        .with_layers(3)
        .with_every_layer_input(true)
        .with_use_previous_higher(true);
    let lstm = config.init::<Backend>(&device)?;

    println!("Created MultilayerLSTM:");
    println!("  Config: {config:?}");
    println!("  Per-layer input widths: {:?}", lstm.cell().layer_input_sizes());
    println!();

    // [batch=4, seq=10, features=12]
    let input = Tensor::<Backend, 3>::random([4, 10, 12], Distribution::Uniform(-1.0, 1.0), &device);

    println!("Example 1: Plain sequence");
    let output = lstm.forward(input.clone(), None)?;
    println!("  Input shape:  {:?}", input.dims());
    println!("  Output shape: {:?}", output.dims());
    println!();

    println!("Example 2: Two episodes per row");
    // Each row ends its first episode at timestep 4; state is cleared before timestep 5.
    let mut flags = vec![0.0f32; 4 * 10];
    for row in 0..4 {
        flags[row * 10 + 4] = 1.0;
    }
    let reset = Tensor::<Backend, 1>::from_floats(flags.as_slice(), &device).reshape([4, 10]);
    let (output, state) = lstm.forward_with_state(input, Some(reset))?;

    println!("  Output shape:      {:?}", output.dims());
    println!("  Final state layers: {}", state.len());
    println!();

    println!("=== Example completed! ===");
    Ok(())
}
