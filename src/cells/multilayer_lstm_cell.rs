//! Stacked LSTM cell with optional raw-input skip connections and top-down
//! feedback from the previous timestep.

use burn::config::Config;
use burn::module::Module;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use super::state::{CellStack, LayerState};
use super::LSTMCell;
use crate::error::LegoError;

/// Configuration shared by [`MultilayerLSTMCell`] and
/// [`MultilayerLSTM`](crate::rnn::MultilayerLSTM).
#[derive(Config, Debug)]
pub struct MultilayerLSTMConfig {
    /// Width of the external input
    pub input_size: usize,
    /// Width of every layer's hidden and cell state
    pub hidden_size: usize,
    /// Number of stacked layers
    #[config(default = 1)]
    pub layers: usize,
    /// Feed the raw input to every layer, not only the lowest one
    #[config(default = false)]
    pub every_layer_input: bool,
    /// Feed each layer the previous-timestep hidden state of the layer above it
    #[config(default = false)]
    pub use_previous_higher: bool,
    /// Whether the LSTM affine maps carry bias terms
    #[config(default = true)]
    pub bias: bool,
}

impl MultilayerLSTMConfig {
    /// Reject configurations that cannot build a cell
    pub fn validate(&self) -> Result<(), LegoError> {
        if self.layers == 0 {
            return Err(LegoError::InvalidConfig(
                "layers must be at least 1".to_string(),
            ));
        }
        if self.input_size == 0 || self.hidden_size == 0 {
            return Err(LegoError::InvalidConfig(format!(
                "input_size and hidden_size must be positive (got {} and {})",
                self.input_size, self.hidden_size
            )));
        }
        Ok(())
    }

    /// Effective input width of each layer, see [`layer_input_sizes`]
    pub fn layer_input_sizes(&self) -> Vec<usize> {
        layer_input_sizes(
            self.input_size,
            self.hidden_size,
            self.layers,
            self.every_layer_input,
            self.use_previous_higher,
        )
    }

    /// Build the multilayer cell on `device`
    pub fn init_cell<B: Backend>(
        &self,
        device: &B::Device,
    ) -> Result<MultilayerLSTMCell<B>, LegoError> {
        self.validate()?;

        let input_sizes = self.layer_input_sizes();
        tracing::debug!(
            layers = self.layers,
            hidden_size = self.hidden_size,
            every_layer_input = self.every_layer_input,
            use_previous_higher = self.use_previous_higher,
            ?input_sizes,
            "building multilayer LSTM cell"
        );

        let cells = input_sizes
            .iter()
            .map(|&size| LSTMCell::new(size, self.hidden_size, self.bias, device))
            .collect();

        Ok(MultilayerLSTMCell {
            cells,
            input_size: self.input_size,
            hidden_size: self.hidden_size,
            every_layer_input: self.every_layer_input,
            use_previous_higher: self.use_previous_higher,
        })
    }
}

/// Input width seen by each layer's LSTM cell.
///
/// Layer 0 reads the raw input. Higher layers read the hidden output of the
/// layer below, plus the raw input when `every_layer_input` is set. With
/// `use_previous_higher`, every layer but the top also reads the hidden state
/// of the layer above from the previous timestep.
pub fn layer_input_sizes(
    input_size: usize,
    hidden_size: usize,
    layers: usize,
    every_layer_input: bool,
    use_previous_higher: bool,
) -> Vec<usize> {
    (0..layers)
        .map(|layer| {
            let mut size = if layer == 0 { input_size } else { hidden_size };
            if layer > 0 && every_layer_input {
                size += input_size;
            }
            if use_previous_higher && layer + 1 < layers {
                size += hidden_size;
            }
            size
        })
        .collect()
}

/// Multilayer LSTM cell processing a single timestep.
///
/// Layers run bottom-up within a timestep since each consumes the fresh
/// hidden output of the one below. Build it through
/// [`MultilayerLSTMConfig::init_cell`].
#[derive(Module, Debug)]
pub struct MultilayerLSTMCell<B: Backend> {
    cells: Vec<LSTMCell<B>>,
    input_size: usize,
    hidden_size: usize,
    every_layer_input: bool,
    use_previous_higher: bool,
}

impl<B: Backend> MultilayerLSTMCell<B> {
    /// Get the external input size
    pub fn input_size(&self) -> usize {
        self.input_size
    }

    /// Get the hidden size of every layer
    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    /// Get the number of layers
    pub fn layers(&self) -> usize {
        self.cells.len()
    }

    /// Whether the raw input reaches every layer
    pub fn every_layer_input(&self) -> bool {
        self.every_layer_input
    }

    /// Whether layers read the previous hidden state of the layer above
    pub fn use_previous_higher(&self) -> bool {
        self.use_previous_higher
    }

    /// The LSTM cell of one layer
    pub fn layer(&self, index: usize) -> Option<&LSTMCell<B>> {
        self.cells.get(index)
    }

    /// Effective input width of one layer
    pub fn layer_input_size(&self, index: usize) -> Option<usize> {
        self.cells.get(index).map(|cell| cell.input_size())
    }

    /// Effective input widths of all layers, bottom first
    pub fn layer_input_sizes(&self) -> Vec<usize> {
        self.cells.iter().map(|cell| cell.input_size()).collect()
    }

    /// Advance every layer by one timestep.
    ///
    /// # Arguments
    /// * `input` - External input of shape `[batch, input_size]`
    /// * `previous` - States from the previous timestep, or `None` to start from zeros
    ///
    /// # Returns
    /// The new per-layer states. `previous` is left as it was.
    pub fn forward(
        &self,
        input: Tensor<B, 2>,
        previous: Option<&CellStack<B>>,
    ) -> Result<CellStack<B>, LegoError> {
        let [batch_size, input_width] = input.dims();
        LegoError::check(
            "input",
            &[batch_size, self.input_size],
            &[batch_size, input_width],
        )?;
        if let Some(stack) = previous {
            self.check_state(stack, batch_size)?;
        }

        let device = input.device();
        let mut layers = Vec::with_capacity(self.cells.len());
        let mut recent = input.clone();

        for (layer, cell) in self.cells.iter().enumerate() {
            let layer_input = self.assemble_input(layer, recent, &input, previous);
            let state = match previous {
                Some(stack) => stack.layers[layer].clone(),
                None => LayerState::zeros(batch_size, self.hidden_size, &device),
            };

            let (hidden, cell_state) = cell.forward(layer_input, state.into_parts());
            recent = hidden.clone();
            layers.push(LayerState::new(hidden, cell_state));
        }

        Ok(CellStack { layers })
    }

    /// Concatenate the input of `layer`: running signal, raw input if
    /// requested, then the previous hidden state of the layer above (zeros
    /// when there is no previous state).
    pub(crate) fn assemble_input(
        &self,
        layer: usize,
        recent: Tensor<B, 2>,
        raw: &Tensor<B, 2>,
        previous: Option<&CellStack<B>>,
    ) -> Tensor<B, 2> {
        let mut parts = vec![recent];

        if layer > 0 && self.every_layer_input {
            parts.push(raw.clone());
        }

        if self.use_previous_higher && layer + 1 < self.cells.len() {
            let higher = match previous {
                Some(stack) => stack.layers[layer + 1].hidden.clone(),
                None => {
                    let [batch_size, _] = raw.dims();
                    Tensor::zeros([batch_size, self.hidden_size], &raw.device())
                }
            };
            parts.push(higher);
        }

        Tensor::cat(parts, 1)
    }

    fn check_state(&self, stack: &CellStack<B>, batch_size: usize) -> Result<(), LegoError> {
        LegoError::check("previous state layers", &[self.cells.len()], &[stack.len()])?;
        let expected = [batch_size, self.hidden_size];
        for state in stack.iter() {
            LegoError::check("previous hidden state", &expected, &state.hidden.dims())?;
            LegoError::check("previous cell state", &expected, &state.cell.dims())?;
        }
        Ok(())
    }
}
