#[cfg(test)]
mod tests {
    use dcgp::{Expression, Loss, kernels};

    #[test]
    fn construct_and_evaluate_identity_like_expression() {
        let expr = Expression::<f64>::from_chromosome(
            1,
            1,
            1,
            1,
            1,
            vec![1],
            kernels::default_library(),
            vec![0, 0, 1], // sum(input0), output = node 1
            0,
        )
        .unwrap();

        assert_eq!(expr.eval(&[5.0]).unwrap(), vec![5.0]);
    }

    #[test]
    fn minimal_active_set_excludes_unreferenced_columns() {
        let expr = Expression::<f64>::from_chromosome(
            1,
            1,
            1,
            2,
            2,
            vec![1, 1],
            kernels::default_library(),
            vec![
                0, 0, // node 1 (col 0): sum(input0)
                0, 1, // node 2 (col 1): sum(node1) -- unused by output
                1,    // output reads node 1
            ],
            0,
        )
        .unwrap();

        assert_eq!(expr.get_active_nodes(), &[0, 1]);
        assert!(!expr.is_active(2));
    }

    #[test]
    fn mutate_active_a_thousand_times_stays_valid() {
        let mut expr = Expression::<f64>::new(
            3,
            2,
            3,
            4,
            3,
            vec![2, 2, 2, 2],
            kernels::default_library(),
            123,
        )
        .unwrap();

        for _ in 0..1000 {
            expr.mutate_active(1).unwrap();
            assert!(expr.is_valid(expr.get()));
        }
    }

    #[test]
    fn mse_loss_matches_hand_computation() {
        let expr = Expression::<f64>::from_chromosome(
            2,
            1,
            1,
            1,
            1,
            vec![2],
            kernels::default_library(),
            vec![0, 0, 1, 2], // sum(input0, input1), output = node 2
            0,
        )
        .unwrap();

        // prediction = 1 + 2 = 3, target = 1 -> squared error = 4
        let loss = expr.loss(Loss::Mse, &[1.0, 2.0], &[1.0]).unwrap();
        assert_eq!(loss, 4.0);
    }

    #[test]
    fn protected_division_never_produces_nan() {
        let expr = Expression::<f64>::from_chromosome(
            2,
            1,
            1,
            1,
            1,
            vec![2],
            kernels::default_library(),
            vec![3, 0, 1, 2], // div(input0, input1), output = node 2
            0,
        )
        .unwrap();

        let out = expr.eval(&[1.0, 0.0]).unwrap();
        assert!(out[0].is_finite());
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn parallel_batch_loss_equals_sequential_batch_loss() {
        let expr = Expression::<f64>::new(
            2,
            1,
            2,
            3,
            2,
            vec![2, 2, 2],
            kernels::default_library(),
            99,
        )
        .unwrap();

        let inputs: Vec<Vec<f64>> = (0..50).map(|i| vec![i as f64, (50 - i) as f64]).collect();
        let targets: Vec<Vec<f64>> = (0..50).map(|_| vec![1.0]).collect();

        let sequential = expr.loss_batch(Loss::Mse, &inputs, &targets, 0).unwrap();
        let parallel = expr.loss_batch(Loss::Mse, &inputs, &targets, 5).unwrap();

        assert!((sequential - parallel).abs() < 1e-9);
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn batch_loss_is_invariant_to_the_chosen_divisor() {
        let expr = Expression::<f64>::new(1, 1, 1, 2, 1, vec![1, 1], kernels::default_library(), 5)
            .unwrap();

        let inputs: Vec<Vec<f64>> = (0..24).map(|i| vec![i as f64]).collect();
        let targets: Vec<Vec<f64>> = (0..24).map(|_| vec![0.0]).collect();

        let baseline = expr.loss_batch(Loss::Mse, &inputs, &targets, 0).unwrap();
        for p in [1, 2, 3, 4, 6, 8, 12, 24] {
            let batched = expr.loss_batch(Loss::Mse, &inputs, &targets, p).unwrap();
            assert!(
                (baseline - batched).abs() < 1e-9,
                "divisor {} diverged from sequential baseline",
                p
            );
        }
    }

    #[test]
    fn single_node_grid_is_a_well_formed_expression() {
        let expr = Expression::<f64>::new(1, 1, 1, 1, 1, vec![1], kernels::default_library(), 1).unwrap();
        assert_eq!(expr.get().len(), expr.get_lb().len());
        assert!(expr.eval(&[2.0]).is_ok());
    }

    #[test]
    fn mixed_arity_columns_each_draw_their_own_connection_count() {
        let expr = Expression::<f64>::from_chromosome(
            2,
            1,
            1,
            2,
            2,
            vec![2, 1],
            kernels::default_library(),
            vec![
                0, 0, 1, // node 2 (col 0, arity 2): sum(input0, input1)
                4, 2,    // node 3 (col 1, arity 1): sin(node2)
                3,       // output reads node 3
            ],
            0,
        )
        .unwrap();

        let out = expr.eval(&[0.0, 0.0]).unwrap();
        assert_eq!(out, vec![0.0]); // sin(0 + 0) = 0
    }

    #[test]
    fn duplicated_output_genes_reference_the_same_active_node() {
        let expr = Expression::<f64>::from_chromosome(
            1,
            2,
            1,
            1,
            1,
            vec![1],
            kernels::default_library(),
            vec![0, 0, 1, 1],
            0,
        )
        .unwrap();

        assert_eq!(expr.get_active_nodes(), &[0, 1]);
        let out = expr.eval(&[4.0]).unwrap();
        assert_eq!(out, vec![4.0, 4.0]);
    }

    #[test]
    fn cross_entropy_loss_remains_finite_for_extreme_predictions() {
        let expr = Expression::<f64>::from_chromosome(
            1,
            2,
            1,
            1,
            1,
            vec![1],
            kernels::default_library(),
            vec![6, 0, 1, 1], // exp(input0) duplicated across two outputs
            0,
        )
        .unwrap();

        let loss = expr.loss(Loss::Ce, &[50.0], &[1.0, 0.0]).unwrap();
        assert!(loss.is_finite());
    }

    #[test]
    fn set_replaces_chromosome_and_refreshes_active_set() {
        let mut expr = Expression::<f64>::from_chromosome(
            1,
            1,
            1,
            2,
            2,
            vec![1, 1],
            kernels::default_library(),
            vec![0, 0, 0, 1, 1],
            0,
        )
        .unwrap();
        assert_eq!(expr.get_active_nodes(), &[0, 1]);

        expr.set(vec![0, 0, 0, 1, 2]).unwrap();
        assert_eq!(expr.get_active_nodes(), &[0, 1, 2]);
    }
}
