use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use indicatif::{HumanDuration, ProgressBar, ProgressStyle};

use crate::barrier::Barrier;
use crate::block_queue::{Block, BlockQueue};
use crate::film::Film;
use crate::integrator::SamplerIntegrator;
use crate::parallel::{parallel_for_chunked_with, ExecutionPolicy, ParallelOptions};
use crate::sampler::Sampler;

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Edge length of the square tiles handed to worker threads
    pub tile_size: u32,
    /// Number of times every tile is rendered; samples accumulate
    pub passes: usize,
    pub policy: ExecutionPolicy,
    pub parallel: ParallelOptions,
    /// Number of tiles a worker takes in one go
    pub grain_size: usize,
    pub show_progress: bool,
}

impl Default for RenderOptions {
    fn default() -> RenderOptions {
        RenderOptions {
            tile_size: 16,
            passes: 1,
            policy: ExecutionPolicy::Parallel,
            parallel: ParallelOptions::default(),
            grain_size: 1,
            show_progress: false,
        }
    }
}

pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Renderer {
        assert!(options.passes > 0, "need at least one pass");
        Renderer { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render every pass with `parallel_for` over the tiles; the join at the
    /// end of each call separates the passes.
    pub fn render(
        &self,
        integrator: &dyn SamplerIntegrator,
        sampler: &mut dyn Sampler,
        film: &Film,
    ) {
        integrator.preprocess(&mut *sampler);
        let sampler: &dyn Sampler = &*sampler;
        let blocks = self.block_queue(film);
        let progress = self.progress_bar(blocks.num_blocks);
        let start_time = Instant::now();

        for pass in 0..self.options.passes {
            parallel_for_chunked_with(
                &self.options.parallel,
                0,
                blocks.num_blocks,
                self.options.grain_size,
                |range| {
                    for index in range {
                        let block = blocks.block(index);
                        render_block(&block, seed(pass, &blocks, &block), sampler, integrator, film);
                        progress.inc(1);
                    }
                },
                self.options.policy,
            );
            debug!(slog_scope::logger(), "Pass {}/{} done", pass + 1, self.options.passes);
        }
        progress.finish_and_clear();
        info!(
            slog_scope::logger(),
            "Rendered {} passes in {}",
            self.options.passes,
            HumanDuration(start_time.elapsed())
        );
    }

    /// Render with long lived worker threads that pull tiles off a queue and
    /// meet at a barrier at the end of every pass, so no thread starts pass
    /// `n + 1` while another one is still working on pass `n`.
    pub fn render_progressive(
        &self,
        integrator: &dyn SamplerIntegrator,
        sampler: &mut dyn Sampler,
        film: &Film,
    ) {
        integrator.preprocess(&mut *sampler);
        let sampler: &dyn Sampler = &*sampler;
        let passes = self.options.passes;
        let n_threads = match self.options.policy {
            ExecutionPolicy::Serial => 1,
            ExecutionPolicy::Parallel => self.options.parallel.threads.max(1),
        };
        let queues: Vec<BlockQueue> = (0..passes).map(|_| self.block_queue(film)).collect();
        let barriers: Vec<Barrier> = (0..passes).map(|_| Barrier::new(n_threads)).collect();
        let progress = self.progress_bar(queues[0].num_blocks);
        let start_time = Instant::now();
        info!(
            slog_scope::logger(),
            "Rendering {} passes using {} threads", passes, n_threads
        );

        let res = crossbeam::scope(|s| {
            for thread_index in 0..n_threads {
                let queues = &queues;
                let barriers = &barriers;
                let progress = &progress;
                s.spawn(move |_| {
                    let mut failure = None;
                    for pass in 0..passes {
                        if failure.is_none() {
                            let res = panic::catch_unwind(AssertUnwindSafe(|| {
                                while let Some(block) = queues[pass].next() {
                                    let tile_seed = seed(pass, &queues[pass], &block);
                                    render_block(&block, tile_seed, sampler, integrator, film);
                                    progress.inc(1);
                                }
                            }));
                            if let Err(e) = res {
                                failure = Some(e);
                            }
                        }
                        // Still show up so the other workers are not stranded
                        barriers[pass].wait();
                        if thread_index == 0 {
                            debug!(slog_scope::logger(), "Pass {}/{} done", pass + 1, passes);
                        }
                    }
                    if let Some(e) = failure {
                        panic::resume_unwind(e);
                    }
                });
            }
        });
        if let Err(e) = res {
            panic::resume_unwind(e);
        }
        progress.finish_and_clear();
        info!(
            slog_scope::logger(),
            "Rendered {} passes in {}",
            passes,
            HumanDuration(start_time.elapsed())
        );
    }

    fn block_queue(&self, film: &Film) -> BlockQueue {
        BlockQueue::new(
            (film.resolution.x as u32, film.resolution.y as u32),
            self.options.tile_size,
        )
    }

    fn progress_bar(&self, num_blocks: usize) -> ProgressBar {
        if !self.options.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new((num_blocks * self.options.passes) as u64);
        let style = ProgressStyle::with_template("{elapsed_precise} [{bar:40}] {pos}/{len} tiles ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);
        pb
    }
}

/// Every (pass, tile) pair gets its own random stream, whichever thread
/// ends up rendering it.
fn seed(pass: usize, queue: &BlockQueue, block: &Block) -> u64 {
    (pass * queue.num_blocks + block.index) as u64
}

fn render_block(
    block: &Block,
    seed: u64,
    prototype: &dyn Sampler,
    integrator: &dyn SamplerIntegrator,
    film: &Film,
) {
    let mut sampler = prototype.clone_with_seed(seed);
    for pixel in block.pixels() {
        sampler.start_pixel(pixel);
        loop {
            let camera_sample = sampler.get_camera_sample(pixel);
            let l = integrator.li(&camera_sample, &mut *sampler);
            film.add_sample(camera_sample.p_film, l);
            if !sampler.start_next_sample() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::camera::CameraSample;
    use crate::parallel::Schedule;
    use crate::sampler::RandomSampler;
    use crate::Point2i;

    struct Constant;

    impl SamplerIntegrator for Constant {
        fn li(&self, _cs: &CameraSample, sampler: &mut dyn Sampler) -> [f32; 3] {
            let _ = sampler.get_1d();
            [1.0, 0.5, 0.25]
        }
    }

    fn options(passes: usize, schedule: Schedule) -> RenderOptions {
        RenderOptions {
            tile_size: 4,
            passes,
            parallel: ParallelOptions::new(3, schedule),
            ..RenderOptions::default()
        }
    }

    #[test]
    fn test_every_pixel_gets_spp_per_pass() {
        for &schedule in &[Schedule::StaticSplit, Schedule::AtomicSeize] {
            let film = Film::new(Point2i::new(10, 7));
            let mut sampler = RandomSampler::new(3, 0);
            Renderer::new(options(2, schedule)).render(&Constant, &mut sampler, &film);
            for p in &film.bounds {
                assert_eq!(film.sample_count(p), 6.0);
                assert_eq!(film.pixel(p), [1.0, 0.5, 0.25]);
            }
        }
    }

    #[test]
    fn test_progressive_matches() {
        let film = Film::new(Point2i::new(9, 9));
        let mut sampler = RandomSampler::new(2, 0);
        Renderer::new(options(3, Schedule::AtomicSeize)).render_progressive(
            &Constant,
            &mut sampler,
            &film,
        );
        for p in &film.bounds {
            assert_eq!(film.sample_count(p), 6.0);
        }
    }

    #[test]
    fn test_serial_policy() {
        let film = Film::new(Point2i::new(5, 5));
        let mut sampler = RandomSampler::new(1, 0);
        let opts = RenderOptions {
            policy: ExecutionPolicy::Serial,
            ..options(1, Schedule::StaticSplit)
        };
        Renderer::new(opts).render_progressive(&Constant, &mut sampler, &film);
        Renderer::new(opts).render(&Constant, &mut sampler, &film);
        for p in &film.bounds {
            assert_eq!(film.sample_count(p), 2.0);
        }
    }
}
