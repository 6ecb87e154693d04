/*!
Coordinate types.  Both texture and screen space use

```text
           x
      0 ────────▶
      │ ┌───────┐
    y │ │       │
      │ │       │
      │ │       │
      ▼ └───────┘
 ```
*/

/// A rectangle of texels.  Empty when either extent is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn full(width: u16, height: u16) -> Self {
        Rect::new(0, 0, width, height)
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Exclusive right edge.
    pub const fn right(&self) -> u32 {
        self.x as u32 + self.width as u32
    }

    /// Exclusive bottom edge.
    pub const fn bottom(&self) -> u32 {
        self.y as u32 + self.height as u32
    }

    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Bounding box of both rectangles.  An empty side contributes nothing.
    pub fn union(self, other: Rect) -> Rect {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, saturate(right - x as u32), saturate(bottom - y as u32))
    }

    /// Clips to `0..width` x `0..height`.
    pub fn clamp_to(self, width: u16, height: u16) -> Rect {
        let x = self.x.min(width);
        let y = self.y.min(height);
        let right = self.right().min(width as u32);
        let bottom = self.bottom().min(height as u32);
        Rect::new(x, y, (right - x as u32) as u16, (bottom - y as u32) as u16)
    }

    /// Whether the rectangle lies within `width` x `height`.
    pub const fn fits_within(&self, width: u16, height: u16) -> bool {
        self.right() <= width as u32 && self.bottom() <= height as u32
    }
}

#[inline]
fn saturate(extent: u32) -> u16 {
    extent.min(u16::MAX as u32) as u16
}

/// Destination of a draw, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DestRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl DestRect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        DestRect {
            x,
            y,
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Rect;

    #[test]
    fn union_is_bounding_box() {
        let a = Rect::new(10, 10, 50, 50);
        let b = Rect::new(100, 100, 20, 20);
        let u = a.union(b);
        assert_eq!(u, Rect::new(10, 10, 110, 110));
        assert_eq!(u.right(), 120);
        assert_eq!(u.bottom(), 120);
        assert_eq!(b.union(a), u);
    }

    #[test]
    fn union_ignores_empty() {
        let a = Rect::new(3, 4, 5, 6);
        assert_eq!(a.union(Rect::new(0, 0, 0, 10)), a);
        assert_eq!(Rect::default().union(a), a);
    }

    #[test]
    fn clamp() {
        let r = Rect::new(90, 90, 20, 20).clamp_to(100, 95);
        assert_eq!(r, Rect::new(90, 90, 10, 5));
        assert!(Rect::new(120, 0, 5, 5).clamp_to(100, 100).is_empty());
        assert!(Rect::new(0, 0, 100, 100).fits_within(100, 100));
        assert!(!Rect::new(1, 0, 100, 100).fits_within(100, 100));
    }
}
