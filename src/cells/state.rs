//! Recurrent state carried between timesteps of a [`MultilayerLSTMCell`](super::MultilayerLSTMCell).

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use crate::error::LegoError;

/// Reset values strictly above this clear the state of their batch element.
pub const RESET_THRESHOLD: f32 = 1e-6;

/// Hidden and cell state of one layer, each `[batch, hidden_size]`.
#[derive(Debug, Clone)]
pub struct LayerState<B: Backend> {
    /// Hidden output `h`
    pub hidden: Tensor<B, 2>,
    /// Cell memory `c`
    pub cell: Tensor<B, 2>,
}

impl<B: Backend> LayerState<B> {
    /// Pair up a hidden and a cell tensor
    pub fn new(hidden: Tensor<B, 2>, cell: Tensor<B, 2>) -> Self {
        Self { hidden, cell }
    }

    /// All-zero state, the implicit starting point of every sequence
    pub fn zeros(batch_size: usize, hidden_size: usize, device: &B::Device) -> Self {
        Self {
            hidden: Tensor::zeros([batch_size, hidden_size], device),
            cell: Tensor::zeros([batch_size, hidden_size], device),
        }
    }

    /// Split into the `(hidden, cell)` tuple taken by [`LSTMCell::forward`](super::LSTMCell::forward)
    pub fn into_parts(self) -> (Tensor<B, 2>, Tensor<B, 2>) {
        (self.hidden, self.cell)
    }
}

/// Per-layer states of a multilayer cell, lowest layer first.
///
/// Every entry shares the same `[batch, hidden_size]` shape and the number of
/// layers never changes once the stack exists.
#[derive(Debug, Clone)]
pub struct CellStack<B: Backend> {
    pub(crate) layers: Vec<LayerState<B>>,
}

impl<B: Backend> CellStack<B> {
    /// Build a stack from explicit layer states.
    ///
    /// Fails when `layers` is empty or when the entries do not all share one
    /// `[batch, hidden_size]` shape.
    pub fn new(layers: Vec<LayerState<B>>) -> Result<Self, LegoError> {
        let Some(first) = layers.first() else {
            return Err(LegoError::InvalidConfig(
                "a cell stack needs at least one layer".to_string(),
            ));
        };
        let expected = first.hidden.dims();
        for state in &layers {
            LegoError::check("layer hidden state", &expected, &state.hidden.dims())?;
            LegoError::check("layer cell state", &expected, &state.cell.dims())?;
        }
        Ok(Self { layers })
    }

    /// All-zero stack of `layers` entries
    pub fn zeros(layers: usize, batch_size: usize, hidden_size: usize, device: &B::Device) -> Self {
        Self {
            layers: (0..layers)
                .map(|_| LayerState::zeros(batch_size, hidden_size, device))
                .collect(),
        }
    }

    /// Number of layers
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// True only for a stack with no layers, which [`CellStack::new`] never builds
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Batch size shared by every entry
    pub fn batch_size(&self) -> usize {
        self.layers.first().map_or(0, |state| state.hidden.dims()[0])
    }

    /// State of one layer, `None` past the top
    pub fn layer(&self, index: usize) -> Option<&LayerState<B>> {
        self.layers.get(index)
    }

    /// Iterate layers from the bottom up
    pub fn iter(&self) -> impl Iterator<Item = &LayerState<B>> {
        self.layers.iter()
    }

    /// Take the layer states out of the stack
    pub fn into_layers(self) -> Vec<LayerState<B>> {
        self.layers
    }

    /// Hidden outputs of all layers stacked as `[batch, layers, hidden_size]`
    pub fn hidden_snapshot(&self) -> Tensor<B, 3> {
        let hiddens = self.layers.iter().map(|state| state.hidden.clone()).collect();
        Tensor::stack::<3>(hiddens, 1)
    }

    /// Zero every layer of the batch elements whose `reset` value exceeds
    /// [`RESET_THRESHOLD`]; other elements are left untouched.
    ///
    /// `reset` has shape `[batch]`.
    pub fn reset_where(self, reset: Tensor<B, 1>) -> Result<Self, LegoError> {
        let batch_size = self.batch_size();
        LegoError::check("reset", &[batch_size], &reset.dims())?;

        // [batch, 1] with 1.0 where the element keeps its state
        let keep = reset
            .lower_equal_elem(RESET_THRESHOLD)
            .float()
            .unsqueeze_dim::<2>(1);

        let layers = self
            .layers
            .into_iter()
            .map(|state| {
                let keep = keep.clone().expand(state.hidden.dims());
                LayerState::new(state.hidden * keep.clone(), state.cell * keep)
            })
            .collect();

        Ok(Self { layers })
    }
}
