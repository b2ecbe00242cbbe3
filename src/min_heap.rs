use thiserror::Error;

/// Array-backed binary min-heap. Children of `i` live at `2i + 1` and `2i + 2`.
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    elements: Vec<T>,
}

impl<T> MinHeap<T> {
    pub fn heap_size(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn parent(i: usize) -> usize {
        (i - 1) / 2
    }

    fn left(i: usize) -> usize {
        2 * i + 1
    }

    fn right(i: usize) -> usize {
        2 * i + 2
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeapErr {
    #[error("index {0} out of bounds for heap of size {1}")]
    KeyError(usize, usize),
    #[error("extract from an empty heap")]
    HeapUnderflow,
}

impl<T: Ord> MinHeap<T> {
    pub fn build(source: Vec<T>) -> Self {
        let mut heap = MinHeap { elements: source };
        let n = heap.heap_size();
        for i in (0..n / 2).rev() {
            heap.sift_down(i);
        }
        heap
    }

    pub fn valid_min_heap(&self) -> bool {
        (1..self.heap_size()).all(|i| self.elements[Self::parent(i)] <= self.elements[i])
    }

    fn sift_down(&mut self, mut i: usize) {
        loop {
            let l = Self::left(i);
            let r = Self::right(i);
            let mut smallest = i;

            if l < self.heap_size() && self.elements[l] < self.elements[smallest] {
                smallest = l;
            }
            if r < self.heap_size() && self.elements[r] < self.elements[smallest] {
                smallest = r;
            }
            if smallest == i {
                return;
            }
            self.elements.swap(i, smallest);
            i = smallest;
        }
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let p = Self::parent(i);
            if self.elements[i] >= self.elements[p] {
                return;
            }
            self.elements.swap(i, p);
            i = p;
        }
    }

    pub fn insert(&mut self, value: T) {
        self.elements.push(value);
        self.sift_up(self.heap_size() - 1);
        debug_assert!(self.valid_min_heap());
    }

    pub fn extract_min(&mut self) -> Result<T, HeapErr> {
        if self.is_empty() {
            return Err(HeapErr::HeapUnderflow);
        }
        let n = self.heap_size() - 1;
        self.elements.swap(0, n);
        let result = self.elements.pop().ok_or(HeapErr::HeapUnderflow)?;
        if !self.is_empty() {
            self.sift_down(0);
        }
        Ok(result)
    }

    pub fn into_single(mut self) -> Result<T, HeapErr> {
        match self.heap_size() {
            1 => self.extract_min(),
            0 => Err(HeapErr::HeapUnderflow),
            n => Err(HeapErr::KeyError(1, n)),
        }
    }
}
