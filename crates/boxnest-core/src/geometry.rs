// crates/boxnest-core/src/geometry.rs
use glam::IVec2;

/// Space reserved on each side of a nested sizer, in `(left, right, bottom, top)` order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Insets {
    pub left: i32,
    pub right: i32,
    pub bottom: i32,
    pub top: i32,
}

impl Insets {
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    pub const fn new(left: i32, right: i32, bottom: i32, top: i32) -> Self {
        Self {
            left,
            right,
            bottom,
            top,
        }
    }

    pub const fn uniform(value: i32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn horizontal(&self) -> i32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> i32 {
        self.bottom + self.top
    }

    /// Combined extent of the insets on both axes.
    pub fn total(&self) -> IVec2 {
        IVec2::new(self.horizontal(), self.vertical())
    }

    /// Top-left corner of the interior; y grows downward.
    pub fn origin(&self) -> IVec2 {
        IVec2::new(self.left, self.top)
    }

    pub fn shrink(&self, size: IVec2) -> IVec2 {
        size - self.total()
    }

    pub fn grow(&self, size: IVec2) -> IVec2 {
        size + self.total()
    }
}

impl From<(i32, i32, i32, i32)> for Insets {
    fn from((left, right, bottom, top): (i32, i32, i32, i32)) -> Self {
        Self::new(left, right, bottom, top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insets_totals() {
        let insets = Insets::new(2, 2, 1, 1);

        assert_eq!(insets.horizontal(), 4);
        assert_eq!(insets.vertical(), 2);
        assert_eq!(insets.total(), IVec2::new(4, 2));
        assert_eq!(insets.origin(), IVec2::new(2, 1));
    }

    #[test]
    fn test_shrink_and_grow_are_inverse() {
        let insets = Insets::from((1, 3, 2, 0));
        let size = IVec2::new(10, 7);

        assert_eq!(insets.shrink(size), IVec2::new(6, 5));
        assert_eq!(insets.grow(insets.shrink(size)), size);
    }
}
