//! Reproduction: crossover, mutation, and parent pairing.
//!
//! Parents that ate two candies are shuffled and paired consecutively. Each
//! pair shares one mixing ratio `mix ~ U(0, 1)` and yields two complementary
//! children, `mix * a + (1 - mix) * b` and `mix * b + (1 - mix) * a`. An odd
//! parent out is paired again with a random other parent; a lone parent is
//! cloned. Every child is then mutated gene by gene with Gaussian noise
//! scaled by its own mutation rate.
//!
//! Genes are never clamped: the behaviors tolerate negative values.

use core::f64::consts::TAU;

use candied_types::Genome;
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

/// Draw from the standard normal distribution (Box-Muller transform).
pub fn standard_normal(rng: &mut impl Rng) -> f64 {
    // 1 - U(0, 1] keeps the logarithm finite.
    let u1 = 1.0 - rng.random::<f64>();
    let u2 = rng.random::<f64>();
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}

/// Perturb every gene by `mut_rate * N(0, 1)`, drawn independently per gene.
pub fn mutate(genome: &Genome, rng: &mut impl Rng) -> Genome {
    let rate = genome.mut_rate;
    Genome::from_genes(
        genome
            .genes()
            .map(|gene| rate.mul_add(standard_normal(rng), gene)),
    )
}

/// Blend two genomes with ratio `mix`, returning both complementary children.
pub fn crossover(first: &Genome, second: &Genome, mix: f64) -> [Genome; 2] {
    let blend = |a: &Genome, b: &Genome| {
        let mut genes = a.genes();
        for (gene, other) in genes.iter_mut().zip(b.genes()) {
            *gene = mix.mul_add(*gene, (1.0 - mix) * other);
        }
        Genome::from_genes(genes)
    };
    [blend(first, second), blend(second, first)]
}

/// Pair already-shuffled parents consecutively.
///
/// With an odd count, the last parent is paired with a uniformly random
/// other parent. Fewer than two parents yield no pairs.
pub fn pair_parents<T: Copy>(parents: &[T], rng: &mut impl Rng) -> Vec<(T, T)> {
    let chunks = parents.chunks_exact(2);
    let odd_one_out = chunks.remainder().first().copied();
    let mut pairs: Vec<(T, T)> = chunks
        .filter_map(|pair| match pair {
            [a, b] => Some((*a, *b)),
            _ => None,
        })
        .collect();

    if let Some(last) = odd_one_out
        && let [others @ .., _] = parents
        && let Some(partner) = others.choose(rng)
    {
        pairs.push((last, *partner));
    }
    pairs
}

/// Genomes of every child produced by today's parents.
///
/// Zero parents give no children, one parent gives one mutated clone, and
/// `n >= 2` parents give two children per pair, `2 * ceil(n / 2)` in total.
pub fn offspring_genomes(parents: &[Genome], rng: &mut impl Rng) -> Vec<Genome> {
    let mut shuffled = parents.to_vec();
    shuffled.shuffle(rng);

    match shuffled.as_slice() {
        [] => Vec::new(),
        [only] => vec![mutate(only, rng)],
        _ => {
            let pairs = pair_parents(&shuffled, rng);
            let mut children = Vec::with_capacity(pairs.len().saturating_mul(2));
            for (first, second) in pairs {
                let mix = rng.random_range(0.0..1.0);
                for child in crossover(&first, &second, mix) {
                    children.push(mutate(&child, rng));
                }
            }
            children
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn genome(value: f64, mut_rate: f64) -> Genome {
        Genome {
            speed: value,
            focus_angle: value,
            view_range: value,
            mut_rate,
        }
    }

    #[test]
    fn crossover_children_are_complementary() {
        let a = genome(1.0, 0.0);
        let b = genome(3.0, 1.0);
        let [first, second] = crossover(&a, &b, 0.25);

        assert!((first.speed - 2.5).abs() < 1e-12);
        assert!((second.speed - 1.5).abs() < 1e-12);
        assert!((first.mut_rate - 0.75).abs() < 1e-12);
        assert!((second.mut_rate - 0.25).abs() < 1e-12);
        // Each gene's sum is preserved across the pair.
        assert!((first.view_range + second.view_range - 4.0).abs() < 1e-12);
    }

    #[test]
    fn zero_mutation_rate_leaves_genome_intact() {
        let mut rng = SmallRng::seed_from_u64(1);
        let g = genome(2.0, 0.0);
        assert_eq!(mutate(&g, &mut rng), g);
    }

    #[test]
    fn mutation_noise_scales_with_rate() {
        let mut rng = SmallRng::seed_from_u64(2);
        let g = genome(0.0, 0.5);
        let samples: Vec<f64> = (0..4000).map(|_| mutate(&g, &mut rng).speed).collect();
        let n = 4000.0;
        let mean = samples.iter().sum::<f64>() / n;
        let var = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
        assert!(mean.abs() < 0.05, "mean {mean}");
        assert!((var.sqrt() - 0.5).abs() < 0.05, "stddev {}", var.sqrt());
    }

    #[test]
    fn standard_normal_is_finite() {
        let mut rng = SmallRng::seed_from_u64(3);
        assert!((0..10_000).all(|_| standard_normal(&mut rng).is_finite()));
    }

    #[test]
    fn odd_parent_is_paired_with_someone_else() {
        let mut rng = SmallRng::seed_from_u64(4);
        for _ in 0..100 {
            let pairs = pair_parents(&[1, 2, 3, 4, 5], &mut rng);
            assert_eq!(pairs.len(), 3);
            assert_eq!(pairs.first(), Some(&(1, 2)));
            assert_eq!(pairs.get(1), Some(&(3, 4)));
            let (last, partner) = *pairs.last().unwrap();
            assert_eq!(last, 5);
            assert_ne!(partner, 5);
        }
    }

    #[test]
    fn fewer_than_two_parents_make_no_pairs() {
        let mut rng = SmallRng::seed_from_u64(5);
        assert!(pair_parents::<u8>(&[], &mut rng).is_empty());
        assert!(pair_parents(&[7], &mut rng).is_empty());
    }

    #[test]
    fn offspring_arity() {
        let mut rng = SmallRng::seed_from_u64(6);
        let parent = genome(1.0, 0.1);
        for (parents, expected) in [(0, 0), (1, 1), (2, 2), (3, 4), (4, 4), (5, 6)] {
            let genomes = vec![parent; parents];
            assert_eq!(offspring_genomes(&genomes, &mut rng).len(), expected);
        }
    }

    #[test]
    fn lone_parent_is_cloned() {
        let mut rng = SmallRng::seed_from_u64(7);
        let parent = genome(4.0, 0.0);
        assert_eq!(offspring_genomes(&[parent], &mut rng), vec![parent]);
    }
}
