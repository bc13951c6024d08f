//! Multilayer LSTM sequence layer
//!
//! Steps a [`MultilayerLSTMCell`] over a batch-first sequence, collecting the
//! hidden output of every layer at every timestep and clearing state where
//! the caller asks for a reset.

use burn::module::Module;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use crate::cells::{CellStack, MultilayerLSTMCell, MultilayerLSTMConfig};
use crate::error::LegoError;

/// Multilayer LSTM over whole sequences
///
/// Output keeps every layer: `[batch, seq, layers, hidden_size]`.
///
/// # Type Parameters
/// * `B` - The backend type
#[derive(Module, Debug)]
pub struct MultilayerLSTM<B: Backend> {
    /// The cell advanced once per timestep
    cell: MultilayerLSTMCell<B>,
}

impl MultilayerLSTMConfig {
    /// Build the sequence layer on `device`
    pub fn init<B: Backend>(&self, device: &B::Device) -> Result<MultilayerLSTM<B>, LegoError> {
        self.init_cell::<B>(device).map(MultilayerLSTM::from_cell)
    }
}

impl<B: Backend> MultilayerLSTM<B> {
    /// Wrap an existing multilayer cell
    pub fn from_cell(cell: MultilayerLSTMCell<B>) -> Self {
        Self { cell }
    }

    /// The underlying cell
    pub fn cell(&self) -> &MultilayerLSTMCell<B> {
        &self.cell
    }

    /// Get input size
    pub fn input_size(&self) -> usize {
        self.cell.input_size()
    }

    /// Get hidden size of every layer
    pub fn hidden_size(&self) -> usize {
        self.cell.hidden_size()
    }

    /// Get number of layers
    pub fn layers(&self) -> usize {
        self.cell.layers()
    }

    /// Advance one timestep.
    ///
    /// # Arguments
    /// * `input` - Input of shape `[batch, input_size]`
    /// * `state` - State carried from the previous step, `None` at the start of a sequence
    /// * `reset` - Optional `[batch]` signal; elements above
    ///   [`RESET_THRESHOLD`](crate::cells::RESET_THRESHOLD) get their whole state zeroed
    ///   after this step's output is taken
    ///
    /// # Returns
    /// Tuple of (hidden outputs `[batch, layers, hidden_size]`, state for the next step)
    pub fn step(
        &self,
        input: Tensor<B, 2>,
        state: Option<&CellStack<B>>,
        reset: Option<Tensor<B, 1>>,
    ) -> Result<(Tensor<B, 3>, CellStack<B>), LegoError> {
        let new_state = self.cell.forward(input, state)?;
        let output = new_state.hidden_snapshot();

        let carried = match reset {
            Some(reset) => new_state.reset_where(reset)?,
            None => new_state,
        };

        Ok((output, carried))
    }

    /// Forward pass over a sequence
    ///
    /// # Arguments
    /// * `input` - Input tensor of shape `[batch, seq, input_size]`
    /// * `reset` - Optional `[batch, seq]` reset signal, see [`MultilayerLSTM::step`]
    ///
    /// # Returns
    /// Hidden outputs of shape `[batch, seq, layers, hidden_size]`
    pub fn forward(
        &self,
        input: Tensor<B, 3>,
        reset: Option<Tensor<B, 2>>,
    ) -> Result<Tensor<B, 4>, LegoError> {
        self.forward_with_state(input, reset)
            .map(|(output, _)| output)
    }

    /// Same as [`MultilayerLSTM::forward`], also returning the state carried
    /// out of the last timestep (after its reset, if any).
    pub fn forward_with_state(
        &self,
        input: Tensor<B, 3>,
        reset: Option<Tensor<B, 2>>,
    ) -> Result<(Tensor<B, 4>, CellStack<B>), LegoError> {
        let [batch_size, seq_len, input_width] = input.dims();
        LegoError::check(
            "input",
            &[batch_size, seq_len, self.input_size()],
            &[batch_size, seq_len, input_width],
        )?;
        if let Some(reset) = &reset {
            LegoError::check("reset", &[batch_size, seq_len], &reset.dims())?;
        }
        if seq_len == 0 {
            return Err(LegoError::EmptySequence);
        }

        tracing::trace!(
            batch_size,
            seq_len,
            with_reset = reset.is_some(),
            "running multilayer LSTM"
        );

        let mut state: Option<CellStack<B>> = None;
        let mut outputs: Vec<Tensor<B, 3>> = Vec::with_capacity(seq_len);

        for t in 0..seq_len {
            // input[batch, t, features] -> [batch, features]
            let step_input = input
                .clone()
                .narrow(1, t, 1)
                .reshape([batch_size, input_width]);
            let step_reset = reset
                .as_ref()
                .map(|reset| reset.clone().narrow(1, t, 1).reshape([batch_size]));

            let (output, next) = self.step(step_input, state.as_ref(), step_reset)?;
            outputs.push(output);
            state = Some(next);
        }

        let final_state = state.ok_or(LegoError::EmptySequence)?;
        let output = Tensor::stack::<4>(outputs, 1); // [batch, seq, layers, hidden]
        Ok((output, final_state))
    }
}
