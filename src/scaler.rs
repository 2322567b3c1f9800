use rayon::{
    iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

/// Precomputed nearest source row/column for every destination pixel.
pub struct ScaleLut {
    src_x: Vec<usize>,
    src_y: Vec<usize>,
}

impl ScaleLut {
    pub fn empty() -> Self {
        Self {
            src_x: Vec::new(),
            src_y: Vec::new(),
        }
    }

    pub fn dst_size(&self) -> (usize, usize) {
        (self.src_x.len(), self.src_y.len())
    }
}

#[inline]
fn nearest_indices(dst: usize, src: usize) -> Vec<usize> {
    let step = src as f32 / dst as f32;
    (0..dst)
        .map(|d| (((d as f32 + 0.5) * step) as usize).min(src.saturating_sub(1)))
        .collect()
}

pub fn build_scale_lut(dst_w: usize, dst_h: usize, src_w: usize, src_h: usize) -> ScaleLut {
    if dst_w == 0 || dst_h == 0 || src_w == 0 || src_h == 0 {
        return ScaleLut::empty();
    }
    ScaleLut {
        src_x: nearest_indices(dst_w, src_w),
        src_y: nearest_indices(dst_h, src_h),
    }
}

/// Parallel nearest-neighbour stretch. Keeps the blocky columns of the low
/// resolution framebuffer crisp. Rows are processed in parallel.
pub fn blit_nearest(dst: &mut [u32], dw: usize, src: &[u32], sw: usize, lut: &ScaleLut) {
    if dw == 0 || lut.dst_size().0 != dw {
        return;
    }
    dst.par_chunks_mut(dw)
        .zip(lut.src_y.par_iter())
        .for_each(|(dst_row, &sy)| {
            let row = &src[sy * sw..(sy + 1) * sw];
            for (d, &sx) in dst_row.iter_mut().zip(&lut.src_x) {
                *d = row[sx];
            }
        });
}
