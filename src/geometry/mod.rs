pub use self::point::Point2;

mod point;
