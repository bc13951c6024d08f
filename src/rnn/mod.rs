//! # Sequence Layers
//!
//! [`MultilayerLSTM`] drives a [`MultilayerLSTMCell`](crate::cells::MultilayerLSTMCell)
//! across a sequence. **This is the primary API most users should use.**
//!
//! ## Tensor Shapes
//!
//! | Tensor | Shape |
//! |--------|-------|
//! | input | `[batch, seq_len, input_size]` (batch-first) |
//! | reset | `[batch, seq_len]` |
//! | output | `[batch, seq_len, layers, hidden_size]` |
//!
//! ## Resetting State Mid-Sequence
//!
//! A reset value above `1e-6` at `[b, t]` zeroes the hidden and cell state of
//! every layer for batch element `b` *after* timestep `t` has produced its
//! output, so `t + 1` starts from scratch while `t` itself is unaffected.
//! This lets several episodes be packed back to back in one sequence.
//!
//! ```rust
//! use burn::backend::NdArray;
//! use burn::tensor::Tensor;
//! use lego_rnn::cells::MultilayerLSTMConfig;
//!
//! type Backend = NdArray<f32>;
//! let device = Default::default();
//!
//! let lstm = MultilayerLSTMConfig::new(8, 16)
//!     .with_layers(2)
//!     .with_every_layer_input(true)
//!     .init::<Backend>(&device)
//!     .unwrap();
//!
//! let input = Tensor::<Backend, 3>::zeros([2, 6, 8], &device);
//! let reset = Tensor::<Backend, 2>::from_floats(
//!     [[0.0, 0.0, 1.0, 0.0, 0.0, 0.0], [0.0; 6]],
//!     &device,
//! );
//! let output = lstm.forward(input, Some(reset)).unwrap();
//! assert_eq!(output.dims(), [2, 6, 2, 16]);
//! ```
//!
//! ## Streaming
//!
//! [`MultilayerLSTM::step`] runs one timestep at a time with exactly the
//! semantics of `forward`, for inputs that arrive incrementally:
//!
//! ```ignore
//! let mut state = None;
//! for frame in frames {
//!     let (hidden, next) = lstm.step(frame, state.as_ref(), None)?;
//!     state = Some(next);
//! }
//! ```

pub mod multilayer_lstm;

pub use multilayer_lstm::MultilayerLSTM;
