/// Compressed adjacency list indexed by waypoint position.
///
/// Neighbors of every node are stored contiguously and sorted by index, so
/// iteration order is fixed once at build time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Adjacency {
    pub nodes: usize,
    pub offsets: Vec<usize>,
    pub dst: Vec<u32>,
    pub w: Vec<f64>,
}

impl Adjacency {
    pub fn build(nodes: usize, src: &[u32], dst: &[u32], w: &[f64]) -> Self {
        let mut counts = vec![0usize; nodes];
        for &s in src {
            counts[s as usize] += 1;
        }
        let mut offsets = vec![0usize; nodes + 1];
        for i in 0..nodes {
            offsets[i + 1] = offsets[i] + counts[i];
        }
        let mut cur = offsets[..nodes].to_vec();
        let mut adst = vec![0u32; dst.len()];
        let mut aw = vec![0f64; w.len()];
        for i in 0..src.len() {
            let s = src[i] as usize;
            let p = cur[s];
            adst[p] = dst[i];
            aw[p] = w[i];
            cur[s] += 1;
        }
        for u in 0..nodes {
            let (start, end) = (offsets[u], offsets[u + 1]);
            let mut pairs: Vec<(u32, f64)> = adst[start..end].iter().copied().zip(aw[start..end].iter().copied()).collect();
            pairs.sort_unstable_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.total_cmp(&b.1)));
            for (k, (d, wt)) in pairs.into_iter().enumerate() {
                adst[start + k] = d;
                aw[start + k] = wt;
            }
        }
        Adjacency { nodes, offsets, dst: adst, w: aw }
    }

    pub fn neighbors(&self, u: u32) -> impl Iterator<Item = (u32, f64)> + '_ {
        let u = u as usize;
        let (s, e) = (self.offsets[u], self.offsets[u + 1]);
        self.dst[s..e].iter().copied().zip(self.w[s..e].iter().copied())
    }

    pub fn degree(&self, u: u32) -> usize {
        let u = u as usize;
        self.offsets[u + 1] - self.offsets[u]
    }

    pub fn edge_count(&self) -> usize {
        self.dst.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_and_sorts_by_source() {
        let adj = Adjacency::build(3, &[2, 0, 0, 1], &[0, 2, 1, 0], &[4.0, 2.0, 1.0, 1.0]);
        assert_eq!(adj.neighbors(0).collect::<Vec<_>>(), vec![(1, 1.0), (2, 2.0)]);
        assert_eq!(adj.neighbors(1).collect::<Vec<_>>(), vec![(0, 1.0)]);
        assert_eq!(adj.neighbors(2).collect::<Vec<_>>(), vec![(0, 4.0)]);
        assert_eq!(adj.degree(0), 2);
        assert_eq!(adj.edge_count(), 4);
    }

    #[test]
    fn isolated_nodes_have_no_neighbors() {
        let adj = Adjacency::build(2, &[], &[], &[]);
        assert_eq!(adj.neighbors(1).count(), 0);
    }
}
