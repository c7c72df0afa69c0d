use std::fmt::{Display, Error, Formatter};
use std::ops::Add;

use crate::{Point2f, Point2i};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Point2<T> {
    pub x: T,
    pub y: T,
}

impl<T> Point2<T> {
    pub fn new(x: T, y: T) -> Point2<T> {
        Point2 { x, y }
    }
}

impl Point2<f32> {
    /// Integer coordinates of the pixel containing this continuous point.
    pub fn floor(&self) -> Point2i {
        Point2i::new(self.x.floor() as i32, self.y.floor() as i32)
    }
}

impl From<Point2i> for Point2f {
    fn from(p: Point2i) -> Point2f {
        Point2f::new(p.x as f32, p.y as f32)
    }
}

// Point2 + Point2 -> Point2
impl<T> Add<Point2<T>> for Point2<T>
where
    T: Add<Output = T> + Copy,
{
    type Output = Point2<T>;

    fn add(self, rhs: Point2<T>) -> Point2<T> {
        Point2 {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl<T> Default for Point2<T>
where
    T: Default,
{
    fn default() -> Self {
        Point2 {
            x: T::default(),
            y: T::default(),
        }
    }
}

impl<T> Display for Point2<T>
where
    T: Display,
{
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}
