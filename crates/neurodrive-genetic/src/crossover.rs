//! Crossover operators combining the parent list into one child chromosome.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::GeneDomain;

/// How a child chromosome is assembled from the selected parents.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
)]
#[serde(rename_all = "kebab-case")]
pub enum CrossoverKind {
    /// Each gene is copied from a uniformly chosen parent.
    #[default]
    #[display("uniform")]
    Uniform,
    /// Each gene is the blend (mean) of that gene across all parents.
    #[display("mean")]
    Mean,
    /// Genes before a random pivot come from parent 0, the rest from parent 1.
    #[display("one-point")]
    OnePoint,
    /// Parent 0, then parent 1 between two random pivots, then parent 0 again.
    #[display("two-point")]
    TwoPoint,
}

impl CrossoverKind {
    pub const ALL: [Self; 4] = [Self::Uniform, Self::Mean, Self::OnePoint, Self::TwoPoint];

    /// Smallest parent list the operator can work with.
    #[must_use]
    pub fn min_parents(self) -> usize {
        match self {
            Self::Uniform | Self::Mean => 1,
            Self::OnePoint | Self::TwoPoint => 2,
        }
    }

    /// Produces one child from `parents`, which must all share the same length.
    pub fn apply<D, R>(self, parents: &[Vec<D::Gene>], domain: &D, rng: &mut R) -> Vec<D::Gene>
    where
        D: GeneDomain,
        R: Rng + ?Sized,
    {
        let len = parents[0].len();
        match self {
            Self::Uniform => (0..len)
                .map(|i| parents[rng.random_range(0..parents.len())][i])
                .collect(),
            Self::Mean => (0..len)
                .map(|i| {
                    let column = parents.iter().map(|p| p[i]).collect::<Vec<_>>();
                    domain.blend(&column)
                })
                .collect(),
            Self::OnePoint => {
                let pivot = rng.random_range(0..len);
                one_point(&parents[0], &parents[1], pivot)
            }
            Self::TwoPoint => {
                let first = rng.random_range(0..len);
                let second = rng.random_range(first..=len);
                two_point(&parents[0], &parents[1], first, second)
            }
        }
    }
}

/// `a[..pivot]` followed by `b[pivot..]`.
#[must_use]
pub fn one_point<G>(a: &[G], b: &[G], pivot: usize) -> Vec<G>
where
    G: Copy,
{
    a[..pivot].iter().chain(&b[pivot..]).copied().collect()
}

/// `a[..first]`, then `b[first..second]`, then `a[second..]`.
#[must_use]
pub fn two_point<G>(a: &[G], b: &[G], first: usize, second: usize) -> Vec<G>
where
    G: Copy,
{
    debug_assert!(first <= second);
    a[..first]
        .iter()
        .chain(&b[first..second])
        .chain(&a[second..])
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64;

    use super::*;
    use crate::{BinaryDomain, FloatDomain};

    fn parents() -> Vec<Vec<f64>> {
        vec![vec![0.0, 0.2, 0.4, 0.6], vec![1.0, 0.8, -0.4, -0.2]]
    }

    #[test]
    fn test_one_point_at_pivot() {
        let p = parents();
        assert_eq!(one_point(&p[0], &p[1], 0), p[1]);
        assert_eq!(one_point(&p[0], &p[1], 2), vec![0.0, 0.2, -0.4, -0.2]);
        assert_eq!(one_point(&p[0], &p[1], 4), p[0]);
    }

    #[test]
    fn test_two_point_at_pivots() {
        let p = parents();
        assert_eq!(two_point(&p[0], &p[1], 1, 3), vec![0.0, 0.8, -0.4, 0.6]);
        assert_eq!(two_point(&p[0], &p[1], 2, 2), p[0]);
    }

    #[test]
    fn test_mean_of_two_parents() {
        let p = parents();
        let mut rng = Pcg64::seed_from_u64(1);
        let child = CrossoverKind::Mean.apply(&p, &FloatDomain::default(), &mut rng);
        for (i, gene) in child.iter().enumerate() {
            assert_eq!(*gene, (p[0][i] + p[1][i]) / 2.0);
        }
    }

    #[test]
    fn test_uniform_only_copies_parent_genes() {
        let p = parents();
        let mut rng = Pcg64::seed_from_u64(2);
        for _ in 0..50 {
            let child = CrossoverKind::Uniform.apply(&p, &FloatDomain::default(), &mut rng);
            assert_eq!(child.len(), 4);
            for (i, gene) in child.iter().enumerate() {
                assert!(*gene == p[0][i] || *gene == p[1][i]);
            }
        }
    }

    #[test]
    fn test_point_crossover_is_reproducible() {
        let p = vec![vec![true; 16], vec![false; 16]];
        for kind in [CrossoverKind::OnePoint, CrossoverKind::TwoPoint] {
            let a = kind.apply(&p, &BinaryDomain, &mut Pcg64::seed_from_u64(9));
            let b = kind.apply(&p, &BinaryDomain, &mut Pcg64::seed_from_u64(9));
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_parse_and_display() {
        for kind in CrossoverKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
        assert_eq!("TwoPoint".parse::<CrossoverKind>().unwrap(), CrossoverKind::TwoPoint);
    }
}
