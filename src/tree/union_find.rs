//! Disjoint-set forest with union by size.

/// Union-find over the elements `0..n`.
///
/// `find` walks parent pointers without path compression, so the parent
/// array stays exactly as the sequence of unions left it.
///
/// # Examples
///
/// ```
/// use u_landscape::tree::UnionFind;
///
/// let mut uf = UnionFind::new(4);
/// uf.union(0, 1);
/// uf.union(2, 3);
/// assert!(uf.same_component(0, 1));
/// assert!(!uf.same_component(1, 2));
/// assert_eq!(uf.num_components(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl UnionFind {
    /// `n` singleton components.
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Whether the structure holds no elements.
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Root of the component containing `i`.
    ///
    /// # Panics
    /// Panics if `i >= len()`.
    pub fn find(&self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        root
    }

    /// Merges the components of `i` and `j`, returning whether they were
    /// separate.
    ///
    /// The smaller component goes under the larger root; on equal sizes
    /// `i`'s root goes under `j`'s root. Both roots record the combined
    /// size. Joining an element with its own component changes nothing.
    pub fn union(&mut self, i: usize, j: usize) -> bool {
        let root_i = self.find(i);
        let root_j = self.find(j);
        if root_i == root_j {
            return false;
        }
        let (size_i, size_j) = (self.size[root_i], self.size[root_j]);
        if size_i > size_j {
            self.parent[root_j] = root_i;
        } else {
            self.parent[root_i] = root_j;
        }
        self.size[root_i] = size_i + size_j;
        self.size[root_j] = size_i + size_j;
        true
    }

    /// Whether `i` and `j` share a root.
    pub fn same_component(&self, i: usize, j: usize) -> bool {
        self.find(i) == self.find(j)
    }

    /// Size of the component containing `i`.
    pub fn component_size(&self, i: usize) -> usize {
        self.size[self.find(i)]
    }

    /// Number of distinct components.
    pub fn num_components(&self) -> usize {
        (0..self.parent.len())
            .filter(|&i| self.parent[i] == i)
            .count()
    }
}
