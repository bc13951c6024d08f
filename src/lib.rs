//! # lego-rnn
//!
//! Multilayer LSTM building blocks on top of the Burn framework, meant to be
//! composed into larger models.
//!
//! ## Features
//!
//! - **LSTMCell**: standard gated LSTM unit with optional bias
//! - **MultilayerLSTMCell**: stacked cells where upper layers can also see the
//!   raw input (`every_layer_input`) and each layer can see the previous
//!   hidden state of the layer above it (`use_previous_higher`)
//! - **MultilayerLSTM**: batch-first sequence driver with per-timestep,
//!   per-element state reset
//!
//! ## Quick Start
//!
//! ```rust
//! use burn::backend::NdArray;
//! use burn::tensor::Tensor;
//! use lego_rnn::prelude::*;
//!
//! type Backend = NdArray<f32>;
//! let device = Default::default();
//!
//! let lstm = MultilayerLSTMConfig::new(16, 32)
//!     .with_layers(3)
//!     .with_use_previous_higher(true)
//!     .init::<Backend>(&device)
//!     .unwrap();
//!
//! let input = Tensor::<Backend, 3>::zeros([4, 10, 16], &device);
//! let output = lstm.forward(input, None).unwrap();
//! assert_eq!(output.dims(), [4, 10, 3, 32]);
//! ```

pub mod cells;
pub mod error;
pub mod rnn;

pub use error::LegoError;

pub mod prelude {
    pub use crate::cells::{CellStack, LSTMCell, LayerState, MultilayerLSTMCell, MultilayerLSTMConfig};
    pub use crate::error::LegoError;
    pub use crate::rnn::MultilayerLSTM;
}
