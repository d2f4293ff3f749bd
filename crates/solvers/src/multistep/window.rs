/// A solution node kept for a multistep formula.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Node {
    pub(crate) value: Vec<f64>,
    pub(crate) slope: Vec<f64>,
}

/// Fixed-capacity history of the most recent nodes.
///
/// Pushing into a full window evicts the oldest node. Index 0 is always the
/// newest node.
#[derive(Debug)]
pub(crate) struct Window<const N: usize> {
    slots: [Node; N],
    head: usize,
    len: usize,
}

impl<const N: usize> Window<N> {
    pub(crate) fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| Node::default()),
            head: 0,
            len: 0,
        }
    }

    pub(crate) fn push(&mut self, node: Node) {
        let slot = (self.head + self.len) % N;
        self.slots[slot] = node;
        if self.len < N {
            self.len += 1;
        } else {
            self.head = (self.head + 1) % N;
        }
    }

    /// Returns the node `age` positions before the newest one.
    ///
    /// # Panics
    ///
    /// Panics if `age` is not less than the number of stored nodes.
    pub(crate) fn get(&self, age: usize) -> &Node {
        assert!(age < self.len, "window holds only {} nodes", self.len);
        let slot = (self.head + self.len - 1 - age) % N;
        &self.slots[slot]
    }

    pub(crate) fn is_full(&self) -> bool {
        self.len == N
    }

    pub(crate) fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }
}
