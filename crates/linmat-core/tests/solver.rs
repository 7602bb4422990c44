use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use linmat_core::solver::{
    multiply_matrices, solve, solve_ec, solve_ec_with_config, solve_in_place,
};
use linmat_core::{Matrix, MatrixError, NumericConfig, Vector};

fn system() -> (Matrix, Vector) {
    let a = Matrix::from_rows(&[
        vec![-4.0, 3.0, -4.0, -1.0],
        vec![-2.0, 0.0, -5.0, 3.0],
        vec![-1.0, -1.0, -3.0, -4.0],
        vec![-3.0, 2.0, 4.0, -1.0],
    ])
    .unwrap();
    let b = Vector::from_vec(vec![-37.0, -20.0, -27.0, 7.0]);
    (a, b)
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn assert_vector_close(actual: &Vector, expected: &[f64], tol: f64) {
    assert_eq!(actual.len(), expected.len());
    for (x, y) in actual.iter().zip(expected) {
        assert_abs_diff_eq!(x, y, epsilon = tol);
    }
}

#[test]
fn solve_known_system() {
    let (a, b) = system();
    let x = solve(&a, &b).unwrap();
    assert_vector_close(&x, &[2.0, -2.0, 5.0, 3.0], 1e-10);
    // a is untouched
    assert_eq!(a, system().0);
}

#[test]
fn solve_ec_known_system() {
    init_logging();
    let (a, b) = system();
    let x = solve_ec(&a, &b).unwrap();
    assert_vector_close(&x, &[2.0, -2.0, 5.0, 3.0], 1e-12);
}

#[test]
fn solve_in_place_leaves_inverse() {
    let (mut a, b) = system();
    let original = a.clone();
    let x = solve_in_place(&mut a, &b).unwrap();
    assert_vector_close(&x, &[2.0, -2.0, 5.0, 3.0], 1e-10);

    let product = multiply_matrices(&original, &a).unwrap();
    let identity = Matrix::identity(4).unwrap();
    for (p, i) in product.as_slice().iter().zip(identity.as_slice()) {
        assert_abs_diff_eq!(p, i, epsilon = 1e-10);
    }
}

#[test]
fn residual_is_small_for_random_systems() {
    let mut rng = StdRng::seed_from_u64(2024);
    for n in 2..7 {
        let data = (0..n * n).map(|_| rng.gen_range(-5.0..5.0)).collect();
        let a = Matrix::from_shape_vec((n, n), data).unwrap();
        let b: Vector = (0..n).map(|_| rng.gen_range(-5.0..5.0)).collect();

        let refined = solve_ec_with_config(&a, &b, &NumericConfig::default()).unwrap();
        assert!(refined.iterations <= NumericConfig::DEFAULT_MAX_REFINEMENTS);
        let residual = a.vector_multiply(&refined.x).unwrap().sub(&b).unwrap();
        assert!(residual.length() < 1e-9, "n = {}: {}", n, residual.length());

        let direct = solve(&a, &b).unwrap();
        let direct_residual = a.vector_multiply(&direct).unwrap().sub(&b).unwrap();
        assert!(direct_residual.length() < 1e-9);
    }
}

#[test]
fn rhs_length_mismatch_is_rejected_before_inversion() {
    let (mut a, _) = system();
    let short = Vector::from_vec(vec![1.0, 2.0, 3.0]);

    assert!(matches!(
        solve(&a, &short),
        Err(MatrixError::DimensionMismatch { .. })
    ));
    assert!(matches!(
        solve_ec(&a, &short),
        Err(MatrixError::DimensionMismatch { .. })
    ));
    assert!(matches!(
        solve_in_place(&mut a, &short),
        Err(MatrixError::DimensionMismatch { .. })
    ));
    assert_eq!(a, system().0);
}

#[test]
fn singular_system_propagates_error() {
    let mut a = Matrix::from_rows(&[vec![1.0, 2.0], vec![2.0, 4.0]]).unwrap();
    let b = Vector::from_vec(vec![1.0, 1.0]);
    assert!(matches!(
        solve(&a, &b),
        Err(MatrixError::SingularMatrix { .. })
    ));
    assert!(matches!(
        solve_ec(&a, &b),
        Err(MatrixError::SingularMatrix { .. })
    ));
    assert!(matches!(
        solve_in_place(&mut a, &b),
        Err(MatrixError::SingularMatrix { .. })
    ));
    assert_eq!(a.data().unwrap(), vec![vec![1.0, 2.0], vec![2.0, 4.0]]);
}

#[test]
fn empty_matrix_cannot_be_solved() {
    let a = Matrix::new();
    let b = Vector::from_vec(vec![1.0]);
    assert!(matches!(solve(&a, &b), Err(MatrixError::Empty)));
}

#[test]
fn rectangular_system_is_not_square() {
    let a = Matrix::one(2, 3).unwrap();
    let b = Vector::from_vec(vec![1.0, 1.0, 1.0]);
    assert!(matches!(
        solve(&a, &b),
        Err(MatrixError::NotSquare { .. })
    ));
}

#[test]
fn multiply_matrices_keeps_operands() {
    let a = Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
    let b = Matrix::from_rows(&[vec![-1.0, 2.0], vec![0.0, 1.0], vec![-4.0, 3.0]]).unwrap();
    let ab = multiply_matrices(&a, &b).unwrap();
    assert_eq!(
        ab.data().unwrap(),
        vec![vec![-13.0, 13.0], vec![-28.0, 31.0]]
    );
    assert_eq!(a.size().unwrap(), (2, 3));
    assert!(matches!(
        multiply_matrices(&a, &a),
        Err(MatrixError::DimensionMismatch { .. })
    ));
}
