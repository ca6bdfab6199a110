/// Single-channel boolean coverage grid, same dimensions as the annotated
/// buffer. A pixel is true iff it lies inside the union of all committed
/// polygons.
#[derive(Clone, Debug, PartialEq)]
pub struct CoverageMask {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl CoverageMask {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn total_pixels(&self) -> usize {
        self.bits.len()
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.bits[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize) {
        self.bits[y * self.width + x] = true;
    }

    pub fn covered_pixels(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    pub fn clear(&mut self) {
        self.bits.fill(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty_and_counts_set_pixels() {
        let mut mask = CoverageMask::new(4, 3);
        assert_eq!(mask.total_pixels(), 12);
        assert_eq!(mask.covered_pixels(), 0);

        mask.set(0, 0);
        mask.set(3, 2);
        mask.set(3, 2); // idempotent
        assert_eq!(mask.covered_pixels(), 2);
        assert!(mask.get(3, 2));

        mask.clear();
        assert_eq!(mask.covered_pixels(), 0);
    }
}
