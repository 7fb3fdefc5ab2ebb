//! The addressing window: the rectangle of frame memory that the next pixel stream fills.

/// Inclusive bounds of an addressing window, in panel pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Window {
    pub x0: u16,
    pub y0: u16,
    pub x1: u16,
    pub y1: u16,
}

impl Window {
    /// Construct a window from inclusive corner coordinates. Returns `None` unless
    /// `x0 <= x1 < width` and `y0 <= y1 < height`. Out-of-range bounds are never clamped, since a
    /// clamped window would hold fewer pixels than the caller is about to stream.
    pub fn new(x0: u16, y0: u16, x1: u16, y1: u16, width: u16, height: u16) -> Option<Self> {
        if false || x0 > x1 || y0 > y1 || x1 >= width || y1 >= height {
            return None;
        }
        Some(Window { x0, y0, x1, y1 })
    }

    /// Construct the window covering a `w` by `h` rectangle whose upper left pixel is `(x, y)`.
    /// Returns `None` for empty rectangles and for rectangles not entirely on the panel.
    pub fn from_rect(x: i16, y: i16, w: i16, h: i16, width: u16, height: u16) -> Option<Self> {
        // Widen before adding so rectangles near i16::MAX cannot wrap back onto the panel.
        let (x, y, w, h) = (i32::from(x), i32::from(y), i32::from(w), i32::from(h));
        if false
            || w <= 0
            || h <= 0
            || x < 0
            || y < 0
            || x + w > i32::from(width)
            || y + h > i32::from(height)
        {
            return None;
        }
        Some(Window {
            x0: x as u16,
            y0: y as u16,
            x1: (x + w - 1) as u16,
            y1: (y + h - 1) as u16,
        })
    }

    pub fn width(&self) -> u16 {
        self.x1 - self.x0 + 1
    }

    pub fn height(&self) -> u16 {
        self.y1 - self.y0 + 1
    }

    /// Number of pixels the controller expects to receive to fill the window.
    pub fn pixel_count(&self) -> usize {
        usize::from(self.width()) * usize::from(self.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners() {
        assert_eq!(
            Window::new(0, 0, 319, 239, 320, 240),
            Some(Window {
                x0: 0,
                y0: 0,
                x1: 319,
                y1: 239
            })
        );
        assert!(Window::new(5, 5, 5, 5, 320, 240).is_some());

        // Reversed.
        assert!(Window::new(10, 0, 9, 0, 320, 240).is_none());
        assert!(Window::new(0, 10, 0, 9, 320, 240).is_none());
        // Past the edge.
        assert!(Window::new(0, 0, 320, 0, 320, 240).is_none());
        assert!(Window::new(0, 0, 0, 240, 320, 240).is_none());
    }

    #[test]
    fn rect() {
        let w = Window::from_rect(10, 20, 4, 3, 320, 240).unwrap();
        assert_eq!((w.x0, w.y0, w.x1, w.y1), (10, 20, 13, 22));
        assert_eq!((w.width(), w.height(), w.pixel_count()), (4, 3, 12));

        // Exactly touching the far edges.
        assert!(Window::from_rect(316, 236, 4, 4, 320, 240).is_some());

        // Empty.
        assert!(Window::from_rect(0, 0, 0, 1, 320, 240).is_none());
        assert!(Window::from_rect(0, 0, 1, -1, 320, 240).is_none());
        // Hanging off an edge.
        assert!(Window::from_rect(-1, 0, 4, 4, 320, 240).is_none());
        assert!(Window::from_rect(0, -1, 4, 4, 320, 240).is_none());
        assert!(Window::from_rect(317, 0, 4, 4, 320, 240).is_none());
        assert!(Window::from_rect(0, 237, 4, 4, 320, 240).is_none());
        // Would wrap if summed in i16.
        assert!(Window::from_rect(i16::MAX, 0, i16::MAX, 1, 320, 240).is_none());
    }
}
