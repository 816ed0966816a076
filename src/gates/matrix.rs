// src/gates/matrix.rs

use crate::core::precision::cast_complex;
use crate::core::{AutopsiError, Precision};
use num_complex::Complex;
use std::fmt;

/// A square complex matrix in row-major order whose dimension is a power of two.
///
/// Gate matrices are produced fresh by [`Gate::matrix`](crate::Gate::matrix)
/// and consumed by [`SimulationEngine::step`](crate::SimulationEngine::step).
/// There are no mutating methods; every transformation returns a new matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct GateMatrix<T> {
    dim: usize,
    elements: Vec<Complex<T>>,
}

impl<T: Precision> GateMatrix<T> {
    /// Builds a matrix from `dim * dim` elements listed row by row.
    pub fn from_row_major(dim: usize, elements: Vec<Complex<T>>) -> Result<Self, AutopsiError> {
        if dim < 2 || !dim.is_power_of_two() {
            return Err(AutopsiError::InvalidDimension { dimension: dim });
        }
        let expected = dim
            .checked_mul(dim)
            .ok_or(AutopsiError::InvalidDimension { dimension: dim })?;
        if elements.len() != expected {
            return Err(AutopsiError::DimensionMismatch { expected, actual: elements.len() });
        }
        Ok(Self { dim, elements })
    }

    /// Builds a matrix from a fixed-size array of rows.
    pub(crate) fn from_rows<const N: usize>(rows: [[Complex<T>; N]; N]) -> Self {
        debug_assert!(N.is_power_of_two() && N >= 2);
        Self {
            dim: N,
            elements: rows.into_iter().flatten().collect(),
        }
    }

    /// The `dim x dim` identity.
    pub fn identity(dim: usize) -> Result<Self, AutopsiError> {
        if dim < 2 || !dim.is_power_of_two() {
            return Err(AutopsiError::InvalidDimension { dimension: dim });
        }
        let mut elements = vec![zero(); dim * dim];
        for k in 0..dim {
            elements[k * dim + k] = one();
        }
        Ok(Self { dim, elements })
    }

    /// Number of rows (and columns).
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of qubits the matrix acts on (`log2(dim)`).
    pub fn num_qubits(&self) -> usize {
        self.dim.trailing_zeros() as usize
    }

    /// Row-major view of the elements.
    pub fn elements(&self) -> &[Complex<T>] {
        &self.elements
    }

    /// Element at `(row, col)`, or `None` when out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<Complex<T>> {
        if row < self.dim && col < self.dim {
            Some(self.elements[row * self.dim + col])
        } else {
            None
        }
    }

    /// Kronecker (tensor) product `self ⊗ other`.
    pub fn kron(&self, other: &GateMatrix<T>) -> GateMatrix<T> {
        let dim = self.dim * other.dim;
        let mut elements = vec![zero(); dim * dim];
        for r1 in 0..self.dim {
            for c1 in 0..self.dim {
                let a = self.elements[r1 * self.dim + c1];
                for r2 in 0..other.dim {
                    for c2 in 0..other.dim {
                        let row = r1 * other.dim + r2;
                        let col = c1 * other.dim + c2;
                        elements[row * dim + col] = a * other.elements[r2 * other.dim + c2];
                    }
                }
            }
        }
        GateMatrix { dim, elements }
    }

    /// Conjugate transpose `U†`.
    pub fn conjugate_transpose(&self) -> GateMatrix<T> {
        let n = self.dim;
        let mut elements = vec![zero(); n * n];
        for row in 0..n {
            for col in 0..n {
                elements[col * n + row] = self.elements[row * n + col].conj();
            }
        }
        GateMatrix { dim: n, elements }
    }

    /// Matrix product `self × other`.
    pub fn matmul(&self, other: &GateMatrix<T>) -> Result<GateMatrix<T>, AutopsiError> {
        if self.dim != other.dim {
            return Err(AutopsiError::DimensionMismatch { expected: self.dim, actual: other.dim });
        }
        let n = self.dim;
        let mut elements = vec![zero(); n * n];
        for row in 0..n {
            for k in 0..n {
                let a = self.elements[row * n + k];
                for col in 0..n {
                    elements[row * n + col] = elements[row * n + col] + a * other.elements[k * n + col];
                }
            }
        }
        Ok(GateMatrix { dim: n, elements })
    }

    /// Largest absolute deviation of `U U†` from the identity.
    pub fn unitarity_deviation(&self) -> T {
        let n = self.dim;
        let adjoint = self.conjugate_transpose();
        let mut worst = T::zero();
        for row in 0..n {
            for col in 0..n {
                let mut acc = zero::<T>();
                for k in 0..n {
                    acc = acc + self.elements[row * n + k] * adjoint.elements[k * n + col];
                }
                let target = if row == col { one::<T>() } else { zero::<T>() };
                worst = worst.max((acc - target).norm());
            }
        }
        worst
    }

    /// Whether `U U† = I` within `tolerance`.
    pub fn is_unitary(&self, tolerance: T) -> bool {
        self.unitarity_deviation() <= tolerance
    }

    /// Expands this k-qubit matrix onto an n-qubit register, acting on
    /// `targets` and as the identity everywhere else.
    ///
    /// `targets[0]` maps to the most significant bit of the matrix's own index,
    /// and qubit 0 of the register is the most significant bit of a basis
    /// index. For adjacent, ordered targets this equals `I ⊗ U ⊗ I`.
    pub fn embed(&self, targets: &[usize], num_qubits: usize) -> Result<GateMatrix<T>, AutopsiError> {
        if targets.len() != self.num_qubits() {
            return Err(AutopsiError::DimensionMismatch {
                expected: self.dim,
                actual: 1usize.checked_shl(targets.len() as u32).unwrap_or(0),
            });
        }
        if num_qubits == 0 || num_qubits >= usize::BITS as usize / 2 {
            let dimension = 1usize.checked_shl(num_qubits as u32).unwrap_or(0);
            return Err(AutopsiError::InvalidDimension { dimension });
        }
        for (i, &qubit) in targets.iter().enumerate() {
            if qubit >= num_qubits {
                return Err(AutopsiError::InvalidQubit { qubit, num_qubits });
            }
            if targets[..i].contains(&qubit) {
                return Err(AutopsiError::DuplicateQubit { qubit });
            }
        }

        let k = targets.len();
        let shifts: Vec<usize> = targets.iter().map(|&q| num_qubits - 1 - q).collect();
        let target_mask = shifts.iter().fold(0usize, |mask, &s| mask | (1 << s));
        let gather = |index: usize| shifts.iter().fold(0usize, |acc, &s| (acc << 1) | ((index >> s) & 1));
        let scatter = |sub: usize| {
            shifts
                .iter()
                .enumerate()
                .fold(0usize, |acc, (i, &s)| acc | (((sub >> (k - 1 - i)) & 1) << s))
        };

        let full = 1usize << num_qubits;
        let mut elements = vec![zero(); full * full];
        for row in 0..full {
            let sub_row = gather(row);
            let rest = row & !target_mask;
            for sub_col in 0..self.dim {
                let col = rest | scatter(sub_col);
                elements[row * full + col] = self.elements[sub_row * self.dim + sub_col];
            }
        }
        Ok(GateMatrix { dim: full, elements })
    }

    /// Converts the matrix to another precision.
    pub fn cast<U: Precision>(&self) -> GateMatrix<U> {
        GateMatrix {
            dim: self.dim,
            elements: self.elements.iter().map(|&c| cast_complex(c)).collect(),
        }
    }
}

impl<T: Precision> fmt::Display for GateMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.elements.chunks(self.dim) {
            write!(f, "[")?;
            for (i, c) in row.iter().enumerate() {
                write!(f, "{}{:.4}", if i > 0 { ", " } else { "" }, c)?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}

fn zero<T: Precision>() -> Complex<T> {
    Complex::new(T::zero(), T::zero())
}

fn one<T: Precision>() -> Complex<T> {
    Complex::new(T::one(), T::zero())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn c(re: f64, im: f64) -> Complex<f64> {
        Complex::new(re, im)
    }

    fn pauli_x() -> GateMatrix<f64> {
        GateMatrix::from_rows([[c(0.0, 0.0), c(1.0, 0.0)], [c(1.0, 0.0), c(0.0, 0.0)]])
    }

    #[test]
    fn from_row_major_validates_shape() {
        assert_eq!(
            GateMatrix::<f64>::from_row_major(3, vec![c(0.0, 0.0); 9]),
            Err(AutopsiError::InvalidDimension { dimension: 3 })
        );
        assert_eq!(
            GateMatrix::<f64>::from_row_major(2, vec![c(0.0, 0.0); 3]),
            Err(AutopsiError::DimensionMismatch { expected: 4, actual: 3 })
        );
    }

    #[test]
    fn kron_with_identity_matches_embed() -> Result<(), AutopsiError> {
        let x = pauli_x();
        let identity = GateMatrix::identity(2)?;
        assert_eq!(x.kron(&identity), x.embed(&[0], 2)?);
        assert_eq!(identity.kron(&x), x.embed(&[1], 2)?);
        Ok(())
    }

    #[test]
    fn embed_respects_target_order() -> Result<(), AutopsiError> {
        // CNOT with control on qubit 1 and target on qubit 0.
        let one = c(1.0, 0.0);
        let zero = c(0.0, 0.0);
        let cnot = GateMatrix::from_rows([
            [one, zero, zero, zero],
            [zero, one, zero, zero],
            [zero, zero, zero, one],
            [zero, zero, one, zero],
        ]);
        let reversed = cnot.embed(&[1, 0], 2)?;
        // |01> (control set) <-> |11>
        assert_eq!(reversed.get(1, 3), Some(one));
        assert_eq!(reversed.get(3, 1), Some(one));
        assert_eq!(reversed.get(0, 0), Some(one));
        assert_eq!(reversed.get(2, 2), Some(one));
        assert_eq!(reversed.get(1, 1), Some(zero));
        Ok(())
    }

    #[test]
    fn embed_rejects_bad_targets() {
        let x = pauli_x();
        assert_eq!(x.embed(&[2], 2), Err(AutopsiError::InvalidQubit { qubit: 2, num_qubits: 2 }));
        assert!(matches!(x.embed(&[0, 1], 2), Err(AutopsiError::DimensionMismatch { .. })));
        let swap_like = x.kron(&x);
        assert_eq!(swap_like.embed(&[1, 1], 3), Err(AutopsiError::DuplicateQubit { qubit: 1 }));
    }

    #[test]
    fn conjugate_transpose_and_unitarity() -> Result<(), AutopsiError> {
        let y = GateMatrix::from_rows([[c(0.0, 0.0), c(0.0, -1.0)], [c(0.0, 1.0), c(0.0, 0.0)]]);
        assert_eq!(y.conjugate_transpose(), y);
        assert!(y.is_unitary(1e-12));
        assert_eq!(y.matmul(&y)?, GateMatrix::identity(2)?);

        let skewed = GateMatrix::from_rows([[c(1.0, 0.0), c(1.0, 0.0)], [c(0.0, 0.0), c(1.0, 0.0)]]);
        assert!(!skewed.is_unitary(1e-6));
        assert_abs_diff_eq!(skewed.unitarity_deviation(), 1.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn cast_preserves_values() {
        let narrowed: GateMatrix<f32> = pauli_x().cast();
        assert_eq!(narrowed.get(0, 1), Some(Complex::new(1.0f32, 0.0)));
        assert_eq!(narrowed.dim(), 2);
    }
}
