use std::cmp::min;
use std::fmt::Debug;

use nonmax::NonMaxUsize;

/// Position of an entry in the heap array.
pub type HeapIndex = usize;

const HEAP_ARITY: usize = 4usize;

// Entries are laid out level by level, each node above the next 4 slots.
//
// ```text
//                      0
//      1          2           3           4
//   5..=8      9..=12     13..=16     17..=20
// ```
#[inline(always)]
#[must_use]
fn parent(i: usize) -> usize {
    debug_assert!(i != 0, "The root has no parent");
    (i - 1) / HEAP_ARITY
}
#[inline(always)]
#[must_use]
fn first_child(i: usize) -> usize {
    HEAP_ARITY * i + 1
}

/// Offset of the smallest among up to [`HEAP_ARITY`] siblings, the leftmost
/// one on ties.
///
/// Pairs are compared first so the comparisons don't depend on each other.
#[inline(always)]
#[must_use]
fn min_sibling<T: PartialOrd>(siblings: &[T]) -> usize {
    debug_assert!((1..=HEAP_ARITY).contains(&siblings.len()));
    let pick = |l: usize, r: usize| if siblings[r] < siblings[l] { r } else { l };
    match siblings.len() {
        1 => 0,
        2 => pick(0, 1),
        3 => pick(pick(0, 1), 2),
        _ => pick(pick(0, 1), pick(2, 3)),
    }
}

/// Something with a dense slot number, `0..n`.
pub trait HeapItem: Copy + Debug {
    fn slot(&self) -> usize;
}

impl HeapItem for usize {
    #[inline(always)]
    fn slot(&self) -> usize {
        *self
    }
}

/// A heap entry.
///
/// Entries carry just ranking information and the item they stand for, so heap
/// operations move as little data as possible.
#[derive(Copy, Clone, Debug)]
pub struct HeapNode<I, R> {
    /// The rank of this entry that defines how good it is.
    pub rank: R,
    /// The item this entry stands for. Ignored when ranking.
    pub item: I,
}

/// PartialEq is forwarded to self.rank's PartialEq
impl<I, R: Ord> PartialEq for HeapNode<I, R> {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.rank.eq(&other.rank)
    }
}
impl<I, R: Ord> Eq for HeapNode<I, R> {}

/// PartialOrd is forwarded to Ord::cmp
impl<I, R: Ord> PartialOrd for HeapNode<I, R> {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
/// Ord is forwarded to self.rank's Ord
impl<I, R: Ord> Ord for HeapNode<I, R> {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank.cmp(&other.rank)
    }
}

/// "Intrusive" min-heap over items with dense slots `0..n`.
///
/// Alongside the heap array it keeps where each item currently sits, so an
/// item's rank can be improved in place instead of pushing a duplicate entry.
///
/// ```pseudocode
/// for (i, hn) in self.heap.enumerate():
///   assert_eq(self.positions[hn.item.slot()], i)
/// ```
#[derive(Debug, Clone)]
pub struct IntrusiveHeap<I, R>
where
    I: HeapItem,
    R: Ord + Copy + Debug,
{
    heap: Vec<HeapNode<I, R>>,
    positions: Vec<Option<NonMaxUsize>>,
}

impl<I, R> IntrusiveHeap<I, R>
where
    I: HeapItem,
    R: Ord + Copy + Debug,
{
    /// A heap for items with slots `0..num_items`.
    #[must_use]
    pub fn new(num_items: usize) -> Self {
        Self {
            heap: Vec::with_capacity(min(num_items, 2048)),
            positions: vec![None; num_items],
        }
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether `item` is waiting in the heap.
    #[inline(always)]
    pub fn contains(&self, item: I) -> bool {
        matches!(self.positions.get(item.slot()), Some(Some(_)))
    }

    /// Current rank of `item`, if it's in the heap.
    pub fn rank(&self, item: I) -> Option<R> {
        let pos = (*self.positions.get(item.slot())?)?;
        Some(self.heap[pos.get()].rank)
    }

    pub fn peek(&self) -> Option<&HeapNode<I, R>> {
        self.heap.first()
    }

    /// Adds an item that isn't in the heap yet.
    pub fn push(&mut self, item: I, rank: R) -> HeapIndex {
        debug_assert!(item.slot() < self.positions.len(), "Item {item:?} is unknown");
        debug_assert!(!self.contains(item), "Item {item:?} is already queued");
        self.verify_heap();

        let heap_index = self.heap.len(); // Future heap_index
        self.heap.push(HeapNode { rank, item });
        self.positions[item.slot()] = NonMaxUsize::new(heap_index);
        let heap_index = self.sift_up(heap_index);

        self.verify_heap();
        heap_index
    }

    /// Gives a queued item a better rank.
    ///
    /// Returns `None` if the item isn't queued.
    pub fn improve(&mut self, item: I, rank: R) -> Option<HeapIndex> {
        let pos = (*self.positions.get(item.slot())?)?.get();
        debug_assert!(
            rank < self.heap[pos].rank,
            "Rank {rank:?} doesn't improve {:?}",
            self.heap[pos].rank
        );

        self.heap[pos].rank = rank;
        let heap_index = self.sift_up(pos);
        self.verify_heap();
        Some(heap_index)
    }

    /// Removes the best entry.
    pub fn pop(&mut self) -> Option<HeapNode<I, R>> {
        self.verify_heap();

        let last = self.heap.len().checked_sub(1)?;
        if last != 0 {
            self.swap(0, last);
        }
        let node = self.heap.pop()?;
        self.positions[node.item.slot()] = None;
        if !self.heap.is_empty() {
            self.sift_down(0);
        }

        self.verify_heap();
        Some(node)
    }

    #[inline(always)]
    #[cfg(not(feature = "verify"))]
    pub(crate) fn verify_heap(&self) {
        // All good... (hopefully)
    }

    #[cfg(feature = "verify")]
    pub(crate) fn verify_heap(&self) {
        // Every node,
        for (i, node) in self.heap.iter().enumerate() {
            // - Has the right intrusive index set.
            assert_eq!(self.positions[node.item.slot()].map(|p| p.get()), Some(i));

            // - Goes after its parent node, if any.
            if i == 0 {
                continue;
            }
            let p = parent(i);
            assert!(
                self.heap[p] <= self.heap[i],
                "Node[{p}]={:?} !<= child [{i}]={:?}. Out of heap of len={}",
                self.heap[p],
                self.heap[i],
                self.heap.len(),
            );
        }
        let queued = self.positions.iter().filter(|p| p.is_some()).count();
        assert_eq!(queued, self.heap.len());
    }

    // Implementation details

    /// Raises a node
    /// Returns it's new index
    #[inline(always)]
    fn sift_up(&mut self, index: usize) -> usize {
        debug_assert!(
            index < self.heap.len(),
            "Node is way out of sync. Index out of bounds..."
        );

        let mut pos = index;
        while pos != 0 {
            let up = parent(pos);
            if self.heap[up] <= self.heap[pos] {
                break;
            }
            self.swap(up, pos);
            pos = up;
        }
        pos
    }

    /// Lowers a node
    /// Returns it's new index
    #[inline(always)]
    fn sift_down(&mut self, mut index: usize) -> usize {
        let len = self.heap.len();
        debug_assert!(
            index < len,
            "Node is way out of sync. Index out of bounds..."
        );

        loop {
            // Find the best child
            let mut child = first_child(index);
            if child >= len {
                break;
            }
            child += min_sibling(&self.heap[child..min(child + HEAP_ARITY, len)]);

            if self.heap[index] <= self.heap[child] {
                break;
            }

            self.swap(index, child);
            index = child;
        }
        index
    }

    /// Swaps two elements in the heap.
    ///
    /// For consistency in calling code `l < r` is checked.
    ///
    /// Keeps the intrusive indices in sync.
    #[inline(always)]
    fn swap(&mut self, l: usize, r: usize) {
        debug_assert!(l < r, "Swap({l}, {r}) uses wrong argument order");

        let len = self.heap.len();
        debug_assert!(l < len, "Left  swap index {l} is OUT OF BOUNDS({len})");
        debug_assert!(r < len, "Right swap index {r} is OUT OF BOUNDS({len})");
        self.heap.swap(l, r);
        self.positions[self.heap[l].item.slot()] = NonMaxUsize::new(l);
        self.positions[self.heap[r].item.slot()] = NonMaxUsize::new(r);
    }
}
