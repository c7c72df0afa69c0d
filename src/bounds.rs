use std::fmt;

use num::Num;

use crate::geometry::Point2;
use crate::Point2i;

pub type Bounds2i = Bounds2<i32>;

/// Axis aligned 2D rectangle. `p_max` is exclusive when iterating pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds2<T: Num> {
    pub p_min: Point2<T>,
    pub p_max: Point2<T>,
}

impl<T> Bounds2<T>
where
    T: PartialOrd + fmt::Display + Num + Copy,
{
    pub fn from_points(min: &Point2<T>, max: &Point2<T>) -> Bounds2<T> {
        assert!(
            min.x <= max.x && min.y <= max.y,
            "Invalid bounds: {} - {}",
            min,
            max
        );
        Bounds2 {
            p_min: *min,
            p_max: *max,
        }
    }

    /// Half-open containment test, the one used for pixel coordinates.
    pub fn inside_exclusive(&self, p: &Point2<T>) -> bool {
        p.x >= self.p_min.x && p.x < self.p_max.x && p.y >= self.p_min.y && p.y < self.p_max.y
    }

    pub fn area(&self) -> T {
        (self.p_max.x - self.p_min.x) * (self.p_max.y - self.p_min.y)
    }
}

impl<T> fmt::Display for Bounds2<T>
where
    T: fmt::Display + Num,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{} → {}]", self.p_min, self.p_max)
    }
}

pub struct Bounds2Iterator<'a> {
    p: Point2i,
    bounds: &'a Bounds2i,
}

impl<'a> Iterator for Bounds2Iterator<'a> {
    type Item = Point2i;

    fn next(&mut self) -> Option<Point2i> {
        if self.bounds.area() <= 0 || self.p.y >= self.bounds.p_max.y {
            return None;
        }
        let cur = self.p;
        self.p.x += 1;
        if self.p.x == self.bounds.p_max.x {
            self.p.x = self.bounds.p_min.x;
            self.p.y += 1;
        }
        Some(cur)
    }
}

impl<'a> IntoIterator for &'a Bounds2<i32> {
    type Item = Point2i;
    type IntoIter = Bounds2Iterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        Bounds2Iterator {
            p: self.p_min,
            bounds: self,
        }
    }
}

#[test]
fn test_iter_bounds() {
    let bounds = Bounds2i::from_points(&Point2i::new(12, 12), &Point2i::new(20, 20));
    let pixels: Vec<Point2i> = bounds.into_iter().collect();

    assert_eq!(pixels.len(), 64);
    assert_eq!(pixels[0], Point2i::new(12, 12));
    assert_eq!(pixels[1], Point2i::new(13, 12));
    assert_eq!(pixels[63], Point2i::new(19, 19));
}

#[test]
fn test_iter_empty_bounds() {
    let bounds = Bounds2i::from_points(&Point2i::new(4, 4), &Point2i::new(4, 9));
    assert_eq!(bounds.into_iter().count(), 0);
}
