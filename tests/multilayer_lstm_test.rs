//! Integration tests for the MultilayerLSTM sequence layer

use burn::backend::NdArray;
use burn::tensor::{Distribution, Tensor};
use lego_rnn::cells::{CellStack, MultilayerLSTMConfig};
use lego_rnn::rnn::MultilayerLSTM;

type Backend = NdArray<f32>;

fn values<const D: usize>(tensor: Tensor<Backend, D>) -> Vec<f32> {
    tensor.into_data().to_vec::<f32>().unwrap()
}

fn max_abs_diff<const D: usize>(a: Tensor<Backend, D>, b: Tensor<Backend, D>) -> f32 {
    (a - b).abs().max().into_scalar()
}

/// Hidden and cell state of one batch element, all layers, as `[layers, 2, hidden]`.
fn element_state(state: &CellStack<Backend>, element: usize) -> Tensor<Backend, 3> {
    let per_layer = state
        .iter()
        .map(|layer| {
            let hidden = layer.hidden.clone().narrow(0, element, 1);
            let cell = layer.cell.clone().narrow(0, element, 1);
            Tensor::cat(vec![hidden, cell], 0)
        })
        .collect();
    Tensor::stack(per_layer, 0)
}

fn scenario_model() -> MultilayerLSTM<Backend> {
    let device = Default::default();
    MultilayerLSTMConfig::new(3, 4)
        .with_layers(2)
        .init(&device)
        .unwrap()
}

fn scenario_input() -> Tensor<Backend, 3> {
    let device = Default::default();
    Tensor::random([2, 3, 3], Distribution::Uniform(-1.0, 1.0), &device)
}

fn scenario_reset() -> Tensor<Backend, 2> {
    let device = Default::default();
    Tensor::from_floats([[0.0, 1.0, 0.0], [0.0, 0.0, 0.0]], &device)
}

#[test]
fn test_output_shape_for_all_flag_combinations() {
    let device = Default::default();

    for layers in [1, 2, 4] {
        for every_layer_input in [false, true] {
            for use_previous_higher in [false, true] {
                let lstm = MultilayerLSTMConfig::new(5, 6)
                    .with_layers(layers)
                    .with_every_layer_input(every_layer_input)
                    .with_use_previous_higher(use_previous_higher)
                    .init::<Backend>(&device)
                    .unwrap();

                let input = Tensor::<Backend, 3>::random(
                    [3, 7, 5],
                    Distribution::Uniform(-1.0, 1.0),
                    &device,
                );
                let output = lstm.forward(input, None).unwrap();

                assert_eq!(output.dims(), [3, 7, layers, 6]);
            }
        }
    }
}

#[test]
fn test_forward_is_deterministic() {
    let device = Default::default();
    let lstm = MultilayerLSTMConfig::new(3, 4)
        .with_layers(3)
        .with_every_layer_input(true)
        .with_use_previous_higher(true)
        .init::<Backend>(&device)
        .unwrap();

    let input = Tensor::<Backend, 3>::random([2, 6, 3], Distribution::Uniform(-1.0, 1.0), &device);
    let reset = Tensor::<Backend, 2>::from_floats(
        [[0.0, 0.0, 1.0, 0.0, 0.0, 0.0], [0.0, 1.0, 0.0, 0.0, 1.0, 0.0]],
        &device,
    );

    let first = lstm.forward(input.clone(), Some(reset.clone())).unwrap();
    let second = lstm.forward(input, Some(reset)).unwrap();

    assert_eq!(values(first), values(second));
}

#[test]
fn test_single_layer_matches_plain_lstm_cell() {
    let device = Default::default();
    let lstm = MultilayerLSTMConfig::new(3, 4)
        .init::<Backend>(&device)
        .unwrap();
    let cell = lstm.cell().layer(0).unwrap();

    let input = Tensor::<Backend, 3>::random([2, 5, 3], Distribution::Uniform(-1.0, 1.0), &device);
    let output = lstm.forward(input.clone(), None).unwrap();

    let mut h = Tensor::<Backend, 2>::zeros([2, 4], &device);
    let mut c = Tensor::<Backend, 2>::zeros([2, 4], &device);
    for t in 0..5 {
        let x = input.clone().narrow(1, t, 1).reshape([2, 3]);
        (h, c) = cell.forward(x, (h, c));

        let got = output.clone().narrow(1, t, 1).reshape([2, 4]);
        assert!(max_abs_diff(got, h.clone()) < 1e-6, "timestep {t} diverged");
    }
}

#[test]
fn test_step_by_step_matches_forward() {
    let device = Default::default();
    let lstm = MultilayerLSTMConfig::new(3, 4)
        .with_layers(2)
        .with_use_previous_higher(true)
        .init::<Backend>(&device)
        .unwrap();

    let input = Tensor::<Backend, 3>::random([2, 4, 3], Distribution::Uniform(-1.0, 1.0), &device);
    let reset = Tensor::<Backend, 2>::from_floats([[0.0, 1.0, 0.0, 0.0], [1.0, 0.0, 0.0, 1.0]], &device);
    let output = lstm.forward(input.clone(), Some(reset.clone())).unwrap();

    let mut state: Option<CellStack<Backend>> = None;
    for t in 0..4 {
        let x = input.clone().narrow(1, t, 1).reshape([2, 3]);
        let r = reset.clone().narrow(1, t, 1).reshape([2]);
        let (hidden, next) = lstm.step(x, state.as_ref(), Some(r)).unwrap();
        state = Some(next);

        let expected = output.clone().narrow(1, t, 1).reshape([2, 2, 4]);
        assert!(max_abs_diff(hidden, expected) < 1e-6);
    }
}

#[test]
fn test_reset_clears_state_entering_next_step() {
    let lstm = scenario_model();
    let input = scenario_input();
    let reset = scenario_reset();

    let mut with_reset: Option<CellStack<Backend>> = None;
    let mut without_reset: Option<CellStack<Backend>> = None;
    for t in 0..2 {
        let x = input.clone().narrow(1, t, 1).reshape([2, 3]);
        let r = reset.clone().narrow(1, t, 1).reshape([2]);

        let (_, next) = lstm.step(x.clone(), with_reset.as_ref(), Some(r)).unwrap();
        with_reset = Some(next);
        let (_, next) = lstm.step(x, without_reset.as_ref(), None).unwrap();
        without_reset = Some(next);
    }
    let with_reset = with_reset.unwrap();
    let without_reset = without_reset.unwrap();

    // Element 0 enters timestep 2 with nothing on any layer.
    let cleared = element_state(&with_reset, 0);
    assert_eq!(cleared.dims(), [2, 2, 4]);
    assert!(values(cleared).iter().all(|&v| v == 0.0));

    // Element 1 carries its ordinary state.
    let kept = element_state(&with_reset, 1);
    let reference = element_state(&without_reset, 1);
    assert!(max_abs_diff(kept.clone(), reference) < 1e-6);
    assert!(values(kept).iter().any(|&v| v != 0.0));
}

#[test]
fn test_reset_leaves_emitted_output_untouched() {
    let lstm = scenario_model();
    let input = scenario_input();

    let plain = lstm.forward(input.clone(), None).unwrap();
    let reset = lstm.forward(input, Some(scenario_reset())).unwrap();

    // Timesteps 0 and 1 are produced before the reset takes effect.
    let plain_head = plain.clone().narrow(1, 0, 2);
    let reset_head = reset.clone().narrow(1, 0, 2);
    assert!(max_abs_diff(plain_head, reset_head) < 1e-6);

    // Element 1 never resets, so its whole output matches.
    let plain_other = plain.narrow(0, 1, 1);
    let reset_other = reset.clone().narrow(0, 1, 1);
    assert!(max_abs_diff(plain_other, reset_other) < 1e-6);
}

#[test]
fn test_reset_restarts_element_from_zero_state() {
    let lstm = scenario_model();
    let input = scenario_input();

    let reset_output = lstm.forward(input.clone(), Some(scenario_reset())).unwrap();

    // Running timestep 2 alone starts from zero state, as element 0 should after its reset.
    let fresh = lstm.forward(input.narrow(1, 2, 1), None).unwrap();

    let after_reset = reset_output.narrow(1, 2, 1).narrow(0, 0, 1);
    let fresh_start = fresh.narrow(0, 0, 1);
    assert!(max_abs_diff(after_reset, fresh_start) < 1e-6);
}

#[test]
fn test_sub_threshold_reset_is_ignored() {
    let device = Default::default();
    let lstm = scenario_model();
    let input = scenario_input();

    let tiny = Tensor::<Backend, 2>::full([2, 3], 1e-7, &device);
    let plain = lstm.forward(input.clone(), None).unwrap();
    let nudged = lstm.forward(input, Some(tiny)).unwrap();

    assert_eq!(values(plain), values(nudged));
}

#[test]
fn test_final_state_reflects_last_reset() {
    let device = Default::default();
    let lstm = scenario_model();
    let input = scenario_input();
    let reset = Tensor::<Backend, 2>::from_floats([[0.0, 0.0, 0.0], [0.0, 0.0, 1.0]], &device);

    let (_, state) = lstm.forward_with_state(input, Some(reset)).unwrap();

    assert!(values(element_state(&state, 1)).iter().all(|&v| v == 0.0));
    assert!(values(element_state(&state, 0)).iter().any(|&v| v != 0.0));
}

#[test]
fn test_previous_higher_starts_from_zero_feedback() {
    let device = Default::default();
    let with_feedback = MultilayerLSTMConfig::new(3, 4)
        .with_layers(2)
        .with_use_previous_higher(true)
        .init::<Backend>(&device)
        .unwrap();

    let input = Tensor::<Backend, 3>::random([2, 3, 3], Distribution::Uniform(-1.0, 1.0), &device);
    let output = with_feedback.forward(input.clone(), None).unwrap();

    // Step 0 sees zero feedback, so it matches a manual step with a zero stack.
    let zeros = CellStack::zeros(2, 2, 4, &device);
    let first = input.clone().narrow(1, 0, 1).reshape([2, 3]);
    let (hidden, _) = with_feedback.step(first, Some(&zeros), None).unwrap();
    let step0 = output.narrow(1, 0, 1).reshape([2, 2, 4]);
    assert!(max_abs_diff(hidden, step0) < 1e-6);

    assert_eq!(with_feedback.cell().layer_input_sizes(), vec![7, 4]);
}
