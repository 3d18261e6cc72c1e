//! The support vector array maintained by the outer loop.

use rayon::prelude::*;

use crate::error::{McbError, McbResult};
use crate::gf2::Gf2Vector;

/// The dual-space basis `S[0..dim)`.
///
/// `S[i]` starts as the singleton `{i}`. After iteration `k` every later
/// vector is orthogonal to the emitted cycle; `S[k]` itself is spent.
#[derive(Debug)]
pub struct SupportVectors {
    vecs: Vec<Gf2Vector>,
}

impl SupportVectors {
    /// Initialize `dim` singleton vectors (parallel over the index range).
    pub fn new(dim: usize) -> Self {
        let vecs = (0..dim).into_par_iter().map(Gf2Vector::singleton).collect();
        Self { vecs }
    }

    /// The pivot of iteration `k`, after checking it is still nonzero.
    ///
    /// A zero pivot means linear independence was lost earlier; nothing
    /// meaningful can be extracted from it, so the run must abort.
    pub fn pivot(&self, k: usize) -> McbResult<&Gf2Vector> {
        let v = &self.vecs[k];
        if v.is_zero() {
            return Err(McbError::InternalInvariant(format!(
                "support vector {} is zero before its iteration",
                k
            )));
        }
        Ok(v)
    }

    /// Replace the pivot with a value received from the root.
    pub fn set_pivot(&mut self, k: usize, v: Gf2Vector) {
        self.vecs[k] = v;
    }

    /// Make every remaining vector orthogonal to the emitted cycle.
    ///
    /// For `i` in `(k, dim)`: if `dot(S[i], cycle)` is odd, `S[i] ^= S[k]`.
    /// Parallel over `i`; each vector is written only by its own task.
    pub fn update(&mut self, k: usize, cycle: &Gf2Vector) {
        let (head, tail) = self.vecs.split_at_mut(k + 1);
        let pivot = &head[k];
        tail.par_iter_mut().for_each(|s| {
            if s.dot(cycle) {
                s.xor_assign(pivot);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_singletons() {
        let s = SupportVectors::new(3);
        for k in 0..3 {
            assert_eq!(s.pivot(k).unwrap(), &Gf2Vector::singleton(k));
        }
    }

    #[test]
    fn test_update_enforces_orthogonality() {
        let mut s = SupportVectors::new(3);
        // cycle with odd intersection against S[1] and S[2]
        let cycle = Gf2Vector::from_indices(vec![0, 1, 2]);
        s.update(0, &cycle);
        assert!(!s.pivot(1).unwrap().dot(&cycle));
        assert!(!s.pivot(2).unwrap().dot(&cycle));
        // S[1] absorbed the pivot {0}
        assert_eq!(s.pivot(1).unwrap(), &Gf2Vector::from_indices(vec![0, 1]));
    }

    #[test]
    fn test_zero_pivot_is_an_invariant_violation() {
        let mut s = SupportVectors::new(2);
        s.set_pivot(1, Gf2Vector::zero());
        assert!(s.pivot(1).is_err());
    }
}
