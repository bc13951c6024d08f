//! # Recurrent Cell Implementations
//!
//! Single-timestep cells. The sequence layer in [`crate::rnn`] wraps them and
//! threads their state across a whole sequence.
//!
//! | Cell | Description |
//! |------|-------------|
//! | [`LSTMCell`] | Standard gated LSTM unit |
//! | [`MultilayerLSTMCell`] | Stack of [`LSTMCell`]s with configurable inter-layer inputs |
//!
//! ## Layer Inputs
//!
//! With `L` layers, input width `I` and hidden width `H`, layer `l` of a
//! [`MultilayerLSTMCell`] reads the concatenation of:
//!
//! ```text
//! running signal       x_t                  (l == 0, width I)
//!                      h_t[l-1]             (l > 0,  width H)
//! raw input            x_t                  (l > 0 and every_layer_input, width I)
//! feedback from above  h_{t-1}[l+1] or 0    (l < L-1 and use_previous_higher, width H)
//! ```
//!
//! ## Tensor Shapes
//!
//! | Tensor | Shape | Description |
//! |--------|-------|-------------|
//! | `input` | `[batch, input_size]` | One timestep of external input |
//! | [`LayerState`] hidden / cell | `[batch, hidden_size]` | State of one layer |
//! | [`CellStack::hidden_snapshot`] | `[batch, layers, hidden_size]` | Hidden outputs of every layer |
//!
//! ## Example
//!
//! ```rust
//! use burn::backend::NdArray;
//! use burn::tensor::Tensor;
//! use lego_rnn::cells::MultilayerLSTMConfig;
//!
//! type Backend = NdArray<f32>;
//! let device = Default::default();
//!
//! let cell = MultilayerLSTMConfig::new(16, 32)
//!     .with_layers(2)
//!     .with_use_previous_higher(true)
//!     .init_cell::<Backend>(&device)
//!     .unwrap();
//!
//! let x = Tensor::<Backend, 2>::zeros([4, 16], &device);
//! let state = cell.forward(x.clone(), None).unwrap();
//! let state = cell.forward(x, Some(&state)).unwrap();
//! assert_eq!(state.hidden_snapshot().dims(), [4, 2, 32]);
//! ```

pub mod lstm_cell;
pub mod multilayer_lstm_cell;
pub mod state;

pub use lstm_cell::LSTMCell;
pub use multilayer_lstm_cell::{layer_input_sizes, MultilayerLSTMCell, MultilayerLSTMConfig};
pub use state::{CellStack, LayerState, RESET_THRESHOLD};
