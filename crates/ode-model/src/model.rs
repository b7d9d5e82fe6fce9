//! Sparse coefficient model of a linear constant-coefficient ODE.

use nalgebra::{DMatrix, DVector};
use ode_core::{CoefficientTerm, OdeError, OdeResult};
use tracing::debug;

use crate::state_space::{ForcingScale, StateSpace};

/// Ordered coefficient terms plus an optional initial condition.
///
/// Terms are kept in insertion order; duplicates of the same degree are
/// summed only when the state space is built.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinearOdeModel {
    terms: Vec<CoefficientTerm>,
    initial: Option<DVector<f64>>,
}

impl LinearOdeModel {
    /// Create a model from a term list, without an initial condition.
    pub fn new(terms: impl IntoIterator<Item = CoefficientTerm>) -> Self {
        Self {
            terms: terms.into_iter().collect(),
            initial: None,
        }
    }

    /// Create a model and attach an initial condition, validating its length.
    pub fn with_initial_condition(
        terms: impl IntoIterator<Item = CoefficientTerm>,
        initial: &[f64],
    ) -> OdeResult<Self> {
        let mut model = Self::new(terms);
        model.set_initial_condition(initial)?;
        Ok(model)
    }

    /// Placeholder equation `0 * x = 0`, meant to be filled with [`add_term`].
    ///
    /// [`add_term`]: Self::add_term
    pub fn blank() -> Self {
        Self::new([CoefficientTerm::derivative(0.0, 0)])
    }

    pub fn terms(&self) -> &[CoefficientTerm] {
        &self.terms
    }

    pub fn initial_condition(&self) -> Option<&DVector<f64>> {
        self.initial.as_ref()
    }

    /// Highest derivative degree present.
    ///
    /// `None` when there are no terms or only constant terms.
    pub fn order(&self) -> Option<usize> {
        self.terms
            .iter()
            .filter(|term| !term.is_constant())
            .map(|term| term.slot() - 1)
            .max()
    }

    pub fn add_term(&mut self, term: CoefficientTerm) {
        self.terms.push(term);
    }

    /// Attach or replace the initial condition `[x, x', ..., x^(N-1)]`.
    ///
    /// On error the stored condition is left untouched. With an undefined
    /// order no length matches, reported as an expected length of 0.
    pub fn set_initial_condition(&mut self, initial: &[f64]) -> OdeResult<()> {
        let order = self.order();
        if order != Some(initial.len()) {
            return Err(OdeError::DimensionMismatch {
                what: "initial condition",
                expected: order.unwrap_or(0),
                actual: initial.len(),
            });
        }
        self.initial = Some(DVector::from_column_slice(initial));
        Ok(())
    }

    /// Magnitudes summed per degree, indexed by `degree + 1`.
    ///
    /// Slot 0 holds the constant term and the last slot the leading
    /// coefficient. `None` when the order is undefined.
    pub fn coefficient_table(&self) -> Option<Vec<f64>> {
        let order = self.order()?;
        let mut table = vec![0.0; order + 2];
        for term in &self.terms {
            table[term.slot()] += term.magnitude();
        }
        Some(table)
    }

    /// Sum of the magnitudes of the highest-degree terms.
    pub fn leading_coefficient(&self) -> Option<f64> {
        self.coefficient_table()
            .and_then(|table| table.last().copied())
    }

    /// Companion-form state space with the constant term copied as-is.
    pub fn build_state_space(&self) -> OdeResult<StateSpace> {
        self.build_state_space_with(ForcingScale::Literal)
    }

    /// Companion-form state space `x' = A x + b`.
    ///
    /// `A` has ones on the super-diagonal and the lower-order coefficients
    /// divided by the leading coefficient on its last row; `b` is zero
    /// except for the constant term in its last entry.
    pub fn build_state_space_with(&self, forcing: ForcingScale) -> OdeResult<StateSpace> {
        let table = self.coefficient_table().ok_or(OdeError::UnderdeterminedSystem {
            what: "no derivative terms",
        })?;
        let order = table.len() - 2;
        if order == 0 {
            return Err(OdeError::UnderdeterminedSystem {
                what: "highest degree is 0, no derivative to solve for",
            });
        }

        let leading = table[order + 1];
        if leading == 0.0 {
            return Err(OdeError::SingularLeadingCoefficient { degree: order });
        }

        let mut a = DMatrix::<f64>::zeros(order, order);
        for i in 0..order - 1 {
            a[(i, i + 1)] = 1.0;
        }
        for k in 0..order {
            a[(order - 1, k)] = table[k + 1] / leading;
        }

        let mut b = DVector::<f64>::zeros(order);
        b[order - 1] = match forcing {
            ForcingScale::Literal => table[0],
            ForcingScale::Normalized => table[0] / leading,
        };

        debug!(order, leading, forcing = ?forcing, "built companion state space");
        StateSpace::new(a, b)
    }

    /// Derivative callable `f(x) = A x + b` for use with external steppers.
    pub fn derivative_fn(&self) -> OdeResult<Box<dyn Fn(&DVector<f64>) -> DVector<f64>>> {
        let (a, b) = self.build_state_space()?.into_parts();
        Ok(Box::new(move |x: &DVector<f64>| &a * x + &b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn damped_oscillator() -> LinearOdeModel {
        LinearOdeModel::new([
            CoefficientTerm::derivative(1.0, 1),
            CoefficientTerm::derivative(1.0, 0),
            CoefficientTerm::derivative(-1.0, 2),
        ])
    }

    #[test]
    fn order_of_empty_and_constant_only_is_undefined() {
        assert_eq!(LinearOdeModel::default().order(), None);
        let model = LinearOdeModel::new([CoefficientTerm::constant(3.0)]);
        assert_eq!(model.order(), None);
    }

    #[test]
    fn order_tracks_appended_terms() {
        let mut model = LinearOdeModel::new([CoefficientTerm::derivative(1.0, 0)]);
        assert_eq!(model.order(), Some(0));

        model.add_term(CoefficientTerm::derivative(2.0, 3));
        assert_eq!(model.order(), Some(3));

        model.add_term(CoefficientTerm::derivative(2.0, 1));
        assert_eq!(model.order(), Some(3));
    }

    #[test]
    fn blank_has_order_zero() {
        let model = LinearOdeModel::blank();
        assert_eq!(model.order(), Some(0));
        assert!(matches!(
            model.build_state_space(),
            Err(OdeError::UnderdeterminedSystem { .. })
        ));
    }

    #[test]
    fn canonical_second_order_matrices() {
        let ss = damped_oscillator().build_state_space().unwrap();

        let expected_a = DMatrix::from_row_slice(2, 2, &[0.0, 1.0, -1.0, -1.0]);
        assert_eq!(ss.a(), &expected_a);
        assert_eq!(ss.b(), &DVector::from_vec(vec![0.0, 0.0]));
    }

    #[test]
    fn duplicate_degrees_are_summed() {
        let model = LinearOdeModel::new([
            CoefficientTerm::derivative(0.5, 0),
            CoefficientTerm::derivative(-2.0, 1),
            CoefficientTerm::derivative(0.5, 0),
            CoefficientTerm::derivative(-1.0, 1),
        ]);
        let ss = model.build_state_space().unwrap();
        assert_eq!(ss.order(), 1);
        assert_eq!(ss.a()[(0, 0)], 1.0 / -3.0);
    }

    #[test]
    fn third_order_companion_layout() {
        let model = LinearOdeModel::new([
            CoefficientTerm::derivative(2.0, 3),
            CoefficientTerm::derivative(4.0, 2),
            CoefficientTerm::derivative(6.0, 1),
            CoefficientTerm::derivative(8.0, 0),
            CoefficientTerm::constant(10.0),
        ]);
        let ss = model.build_state_space().unwrap();

        let expected_a = DMatrix::from_row_slice(
            3,
            3,
            &[0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 4.0, 3.0, 2.0],
        );
        assert_eq!(ss.a(), &expected_a);
        // Constant term is not divided by the leading coefficient
        assert_eq!(ss.b(), &DVector::from_vec(vec![0.0, 0.0, 10.0]));
    }

    #[test]
    fn normalized_forcing_divides_constant() {
        let model = LinearOdeModel::new([
            CoefficientTerm::derivative(2.0, 1),
            CoefficientTerm::constant(10.0),
        ]);
        let literal = model.build_state_space().unwrap();
        let normalized = model
            .build_state_space_with(ForcingScale::Normalized)
            .unwrap();

        assert_eq!(literal.b()[0], 10.0);
        assert_eq!(normalized.b()[0], 5.0);
        assert_eq!(literal.a(), normalized.a());
    }

    #[test]
    fn constant_only_is_underdetermined() {
        let model = LinearOdeModel::new([CoefficientTerm::constant(1.0)]);
        assert!(matches!(
            model.build_state_space(),
            Err(OdeError::UnderdeterminedSystem { .. })
        ));
        assert!(matches!(
            LinearOdeModel::default().build_state_space(),
            Err(OdeError::UnderdeterminedSystem { .. })
        ));
    }

    #[test]
    fn zero_leading_coefficient_is_singular() {
        let model = LinearOdeModel::new([
            CoefficientTerm::derivative(1.0, 2),
            CoefficientTerm::derivative(-1.0, 2),
            CoefficientTerm::derivative(1.0, 1),
        ]);
        assert_eq!(
            model.build_state_space().unwrap_err(),
            OdeError::SingularLeadingCoefficient { degree: 2 }
        );
    }

    #[test]
    fn set_initial_condition_validates_length() {
        let mut model = damped_oscillator();
        model.set_initial_condition(&[1.0, 0.0]).unwrap();

        let err = model.set_initial_condition(&[1.0, 0.0, 0.0]).unwrap_err();
        assert_eq!(
            err,
            OdeError::DimensionMismatch {
                what: "initial condition",
                expected: 2,
                actual: 3,
            }
        );
        assert_eq!(
            model.initial_condition(),
            Some(&DVector::from_vec(vec![1.0, 0.0]))
        );

        model.set_initial_condition(&[0.5, -0.5]).unwrap();
        assert_eq!(
            model.initial_condition(),
            Some(&DVector::from_vec(vec![0.5, -0.5]))
        );
    }

    #[test]
    fn set_initial_condition_without_order_fails() {
        let mut model = LinearOdeModel::new([CoefficientTerm::constant(1.0)]);
        assert_eq!(
            model.set_initial_condition(&[1.0]).unwrap_err(),
            OdeError::DimensionMismatch {
                what: "initial condition",
                expected: 0,
                actual: 1,
            }
        );
        assert!(matches!(
            model.set_initial_condition(&[]),
            Err(OdeError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            LinearOdeModel::default().set_initial_condition(&[0.0, 1.0]),
            Err(OdeError::DimensionMismatch { expected: 0, actual: 2, .. })
        ));
        assert!(model.initial_condition().is_none());
    }

    #[test]
    fn with_initial_condition_rejects_mismatch() {
        let terms = damped_oscillator().terms().to_vec();
        assert!(LinearOdeModel::with_initial_condition(terms.clone(), &[1.0]).is_err());
        let model = LinearOdeModel::with_initial_condition(terms, &[1.0, 2.0]).unwrap();
        assert_eq!(model.initial_condition().map(|x| x.len()), Some(2));
    }

    #[test]
    fn coefficient_table_layout() {
        let model = LinearOdeModel::new([
            CoefficientTerm::constant(7.0),
            CoefficientTerm::derivative(3.0, 2),
            CoefficientTerm::derivative(1.0, 0),
        ]);
        assert_eq!(model.coefficient_table(), Some(vec![7.0, 1.0, 0.0, 3.0]));
        assert_eq!(model.leading_coefficient(), Some(3.0));
    }

    #[test]
    fn derivative_fn_evaluates_affine_map() {
        let model = LinearOdeModel::new([
            CoefficientTerm::derivative(1.0, 1),
            CoefficientTerm::derivative(-2.0, 0),
            CoefficientTerm::constant(3.0),
        ]);
        let f = model.derivative_fn().unwrap();
        let dx = f(&DVector::from_vec(vec![2.0]));
        assert_eq!(dx[0], -2.0 * 2.0 + 3.0);
    }
}
