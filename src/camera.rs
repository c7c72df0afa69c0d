use crate::Point2f;

/// What a camera needs from the sampler to generate a ray: the continuous
/// position on the film plane, in raster space.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct CameraSample {
    pub p_film: Point2f,
}
