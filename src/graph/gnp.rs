use rand::Rng;
use rand_distr::{Distribution, Geometric, Uniform};

use super::*;

/// Generators for random weighted route networks. Vertices are called `v0`, `v1`, ...
pub trait RandomRouteNetwork: Sized {
    /// Generates a Gilbert graph `G(n,p)`: each of the `n(n-1)/2` vertex pairs is joined
    /// independently with probability `p`. Weights are drawn uniformly from `1..=max_weight`.
    fn random_gnp<R: Rng>(rng: &mut R, n: NumNodes, p: f64, max_weight: Weight) -> Self;

    /// Like [`RandomRouteNetwork::random_gnp`], but first connects all vertices via a
    /// random spanning tree, so the result is connected for every `p`.
    fn random_connected_gnp<R: Rng>(rng: &mut R, n: NumNodes, p: f64, max_weight: Weight) -> Self;
}

impl RandomRouteNetwork for RouteNetwork {
    fn random_gnp<R: Rng>(rng: &mut R, n: NumNodes, p: f64, max_weight: Weight) -> Self {
        let mut net = named_vertices(n);
        add_random_edges(&mut net, rng, p, max_weight);
        net
    }

    fn random_connected_gnp<R: Rng>(rng: &mut R, n: NumNodes, p: f64, max_weight: Weight) -> Self {
        let mut net = named_vertices(n);
        let weights = Uniform::new_inclusive(1, max_weight.max(1));

        // attach each vertex to a uniformly chosen predecessor
        for v in 1..n {
            let u = rng.gen_range(0..v);
            net.add_edge(u, v, weights.sample(rng));
        }

        add_random_edges(&mut net, rng, p, max_weight);
        net
    }
}

fn named_vertices(n: NumNodes) -> RouteNetwork {
    let mut net = RouteNetwork::new();
    for i in 0..n {
        net.add_vertex(&format!("v{i}"));
    }
    net
}

fn add_random_edges<R: Rng>(net: &mut RouteNetwork, rng: &mut R, p: f64, max_weight: Weight) {
    let n = net.number_of_nodes() as i64;
    let weights = Uniform::new_inclusive(1, max_weight.max(1));

    // indirection via vector as we need a &mut for rng and the weights also need rng
    let pairs: Vec<_> = BernoulliSamplingRange::new(rng, 0, n * n, p)
        .filter_map(|x| {
            let u = x / n;
            let v = x % n;
            (u < v).then_some((u as Node, v as Node))
        })
        .collect();

    for (u, v) in pairs {
        net.add_edge(u, v, weights.sample(rng));
    }
}

/// Provides an iterator similarly to Range, but
/// includes each element i.i.d. with probability of p
pub struct BernoulliSamplingRange<'a, R: Rng> {
    current: i64,
    end: i64,
    distr: Option<Geometric>,
    rng: &'a mut R,
}

impl<'a, R: Rng> BernoulliSamplingRange<'a, R> {
    pub fn new(rng: &'a mut R, begin: i64, end: i64, prob: f64) -> Self {
        debug_assert!(begin <= end);
        debug_assert!((0.0..=1.0).contains(&prob));
        Self {
            rng,
            current: begin - 1,
            end,
            distr: Geometric::new(prob).ok(),
        }
    }

    fn try_advance(&mut self) {
        if self.current >= self.end {
            return;
        }

        let Some(distr) = self.distr else {
            self.current = self.end;
            return;
        };

        let skip = self.rng.sample(distr);
        if skip > i64::MAX as u64 {
            self.current = self.end;
        } else {
            self.current += 1;
            self.current = match self.current.checked_add(skip as i64) {
                Some(x) => x,
                None => self.end,
            }
        }
    }
}

impl<R: Rng> Iterator for BernoulliSamplingRange<'_, R> {
    type Item = i64;
    fn next(&mut self) -> Option<Self::Item> {
        self.try_advance();

        if self.current >= self.end {
            None
        } else {
            Some(self.current)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn bernoulli_range() {
        let rng = &mut Pcg64Mcg::seed_from_u64(0x5eed);

        assert_eq!(BernoulliSamplingRange::new(rng, 0, 0, 1.0).count(), 0);
        assert_eq!(BernoulliSamplingRange::new(rng, 0, 10, 1.0).count(), 10);
        assert_eq!(BernoulliSamplingRange::new(rng, 0, 100, 0.0).count(), 0);

        let min = 3;
        let max = 100;
        let mut counts = vec![0; max as usize];
        for _ in 0..1000 {
            for x in BernoulliSamplingRange::new(rng, min, max, 0.25) {
                assert!((min..max).contains(&x));
                counts[x as usize] += 1;
            }
        }

        assert!(counts.iter().enumerate().all(|(i, &c)| {
            if i < min as usize {
                c == 0
            } else {
                (150..350).contains(&c)
            }
        }));
    }

    #[test]
    fn connected_gnp_is_connected() {
        let rng = &mut Pcg64Mcg::seed_from_u64(0x1234);
        for n in [1, 2, 10, 50] {
            let net = RouteNetwork::random_connected_gnp(rng, n, 0.05, 20);
            assert_eq!(net.number_of_nodes(), n);
            assert_eq!(net.number_of_components(), 1);
            assert!(net.edges().all(|(_, e)| (1..=20).contains(&e.weight())));
        }
    }

    #[test]
    fn gnp_edge_count() {
        let rng = &mut Pcg64Mcg::seed_from_u64(0x4321);
        for p in [0.01, 0.1] {
            let repeats = 100;
            let n = 100;

            let mean_edges = (0..repeats)
                .map(|_| RouteNetwork::random_gnp(rng, n, p, 5).number_of_edges() as f64)
                .sum::<f64>()
                / repeats as f64;

            let expected = p * (n as f64) * ((n - 1) as f64) / 2.0;
            assert!((0.75 * expected..1.25 * expected).contains(&mean_edges));
        }
    }
}
