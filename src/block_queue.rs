use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{Bounds2i, Point2i};

/// A block of pixels that a thread is responsible for rendering (i.e a bucket).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block {
    pub index: usize,
    pub bounds: Bounds2i,
}

impl Block {
    /// Return the area of this block in pixels (i.e. number of pixels this
    /// block covers)
    pub fn area(&self) -> usize {
        self.bounds.area() as usize
    }

    pub fn pixels(&self) -> impl Iterator<Item = Point2i> + '_ {
        self.bounds.into_iter()
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{} {}", self.index, self.bounds)
    }
}

/// Splits an image into square blocks, indexed in scanline order. Blocks on
/// the right and bottom edges are clipped to the image.
///
/// Threads can claim blocks one at a time through `next()`; every block is
/// handed out exactly once.
pub struct BlockQueue {
    pub dims: (u32, u32),
    pub block_size: u32,
    counter: AtomicUsize,
    num_blocks_x: u32,
    pub num_blocks: usize,
}

impl BlockQueue {
    pub fn new(dims: (u32, u32), block_size: u32) -> BlockQueue {
        assert!(block_size > 0, "block size must be positive");
        let xblocks = (dims.0 + block_size - 1) / block_size;
        let yblocks = (dims.1 + block_size - 1) / block_size;
        BlockQueue {
            dims,
            block_size,
            counter: AtomicUsize::new(0),
            num_blocks_x: xblocks,
            num_blocks: (xblocks * yblocks) as usize,
        }
    }

    /// The block with the given scanline index.
    pub fn block(&self, index: usize) -> Block {
        assert!(index < self.num_blocks, "block index {} out of range", index);
        let bx = index as u32 % self.num_blocks_x;
        let by = index as u32 / self.num_blocks_x;
        let start = Point2i::new((bx * self.block_size) as i32, (by * self.block_size) as i32);
        let end = Point2i::new(
            ((bx + 1) * self.block_size).min(self.dims.0) as i32,
            ((by + 1) * self.block_size).min(self.dims.1) as i32,
        );
        Block {
            index,
            bounds: Bounds2i::from_points(&start, &end),
        }
    }

    /// Claim the next unclaimed block, if any.
    pub fn next(&self) -> Option<Block> {
        let c = self.counter.fetch_add(1, Ordering::AcqRel);
        if c >= self.num_blocks {
            None
        } else {
            Some(self.block(c))
        }
    }
}

impl Iterator for BlockQueue {
    type Item = Block;

    fn next(&mut self) -> Option<Block> {
        BlockQueue::next(self)
    }
}

#[test]
fn test_area() {
    let queue = BlockQueue::new((100, 100), 8);
    assert_eq!(queue.block(0).area(), 64);
    // Bottom right corner is clipped to 4x4
    assert_eq!(queue.block(queue.num_blocks - 1).area(), 16);
}

#[test]
fn test_iter() {
    let queue = BlockQueue::new((32, 32), 8);
    let block = queue.block(5);
    let pixels: Vec<Point2i> = block.pixels().collect();

    assert_eq!(pixels.len(), 64);
    assert_eq!(pixels[0], Point2i::new(8, 8));
    assert_eq!(pixels[63], Point2i::new(15, 15));
}

#[test]
fn test_queue_iter() {
    let queue = BlockQueue::new((100, 100), 8);
    let blocks: Vec<Block> = queue.into_iter().collect();

    // 100 is not a multiple of 8, so make sure we generate enough blocks to cover the whole image.
    // In this case, we need 13 * 13.
    assert_eq!(blocks.len(), 169);
    let total: usize = blocks.iter().map(|b| b.area()).sum();
    assert_eq!(total, 100 * 100);
}

#[test]
fn test_power_of_two() {
    let queue = BlockQueue::new((96, 96), 8);
    let blocks: Vec<Block> = queue.into_iter().collect();

    assert_eq!(blocks.len(), 144);
}

#[test]
fn test_non_square_image() {
    let queue = BlockQueue::new((20, 10), 8);
    assert_eq!(queue.num_blocks, 6);
    assert_eq!(queue.block(2).bounds.p_max, Point2i::new(20, 8));
    assert_eq!(queue.block(3).bounds.p_min, Point2i::new(0, 8));
}
