use burn::module::Module;
use burn::nn::{Initializer, Linear, LinearConfig};
use burn::tensor::activation;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

/// Standard LSTM cell, one timestep at a time.
///
/// Gates are laid out in the usual order (input, forget, cell, output):
/// - i = sigmoid(W_ii @ x + b_ii + W_hi @ h + b_hi)
/// - f = sigmoid(W_if @ x + b_if + W_hf @ h + b_hf)
/// - g = tanh(W_ig @ x + b_ig + W_hg @ h + b_hg)
/// - o = sigmoid(W_io @ x + b_io + W_ho @ h + b_ho)
/// - c' = f * c + i * g
/// - h' = o * tanh(c')
///
/// Weights and biases start uniform in `[-1/sqrt(hidden_size), 1/sqrt(hidden_size)]`.
#[derive(Module, Debug)]
pub struct LSTMCell<B: Backend> {
    input_size: usize,
    hidden_size: usize,
    bias: bool,
    input_map: Linear<B>,     // input -> 4 * hidden_size
    recurrent_map: Linear<B>, // hidden -> 4 * hidden_size
}

impl<B: Backend> LSTMCell<B> {
    /// Create a new LSTM cell
    ///
    /// # Arguments
    /// * `input_size` - Size of the input features
    /// * `hidden_size` - Size of the hidden and cell state
    /// * `bias` - Whether both affine maps carry a bias term
    /// * `device` - Device to create the module on
    pub fn new(input_size: usize, hidden_size: usize, bias: bool, device: &B::Device) -> Self {
        let bound = 1.0 / (hidden_size as f64).sqrt();
        let initializer = Initializer::Uniform {
            min: -bound,
            max: bound,
        };

        let input_map = LinearConfig::new(input_size, 4 * hidden_size)
            .with_bias(bias)
            .with_initializer(initializer.clone())
            .init(device);

        let recurrent_map = LinearConfig::new(hidden_size, 4 * hidden_size)
            .with_bias(bias)
            .with_initializer(initializer)
            .init(device);

        Self {
            input_size,
            hidden_size,
            bias,
            input_map,
            recurrent_map,
        }
    }

    /// Get the input size
    pub fn input_size(&self) -> usize {
        self.input_size
    }

    /// Get the hidden size
    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    /// Whether the affine maps carry bias terms
    pub fn has_bias(&self) -> bool {
        self.bias
    }

    /// Perform a forward pass through the LSTM cell
    ///
    /// # Arguments
    /// * `input` - Input tensor of shape `[batch_size, input_size]`
    /// * `states` - Tuple of (hidden_state, cell_state), each of shape `[batch_size, hidden_size]`
    ///
    /// # Returns
    /// Tuple of (new_hidden_state, new_cell_state)
    pub fn forward(
        &self,
        input: Tensor<B, 2>,
        states: (Tensor<B, 2>, Tensor<B, 2>),
    ) -> (Tensor<B, 2>, Tensor<B, 2>) {
        let (hidden_state, cell_state) = states;

        let z = self.input_map.forward(input) + self.recurrent_map.forward(hidden_state);

        // Split into 4 gates
        let chunks = z.chunk(4, 1);
        let input_gate = activation::sigmoid(chunks[0].clone());
        let forget_gate = activation::sigmoid(chunks[1].clone());
        let candidate = chunks[2].clone().tanh();
        let output_gate = activation::sigmoid(chunks[3].clone());

        let new_cell = cell_state * forget_gate + input_gate * candidate;
        let new_hidden = new_cell.clone().tanh() * output_gate;

        (new_hidden, new_cell)
    }
}
