//! Mini-batch iteration over decoded samples.

use crate::types::Sample;
use burn::tensor::{backend::Backend, Tensor};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Cursor-based iterator yielding `(images, targets)` mini-batches.
///
/// Visits every sample exactly once per pass; the last batch may be smaller
/// than the requested size. With a shuffle seed the visiting order is a
/// seeded permutation, so epochs replay identically for a fixed seed.
pub struct BatchIter<'a> {
    samples: &'a [Sample],
    order: Vec<usize>,
    cursor: usize,
    width: usize,
    height: usize,
}

impl<'a> BatchIter<'a> {
    pub fn new(samples: &'a [Sample], width: u32, height: u32, shuffle_seed: Option<u64>) -> Self {
        let mut order: Vec<usize> = (0..samples.len()).collect();
        if let Some(seed) = shuffle_seed {
            order.shuffle(&mut StdRng::seed_from_u64(seed));
        }
        Self {
            samples,
            order,
            cursor: 0,
            width: width as usize,
            height: height as usize,
        }
    }

    /// Next mini-batch as `([batch, 3, H, W], [batch, 1])`, or `None` when
    /// the pass is exhausted.
    pub fn next_batch<B: Backend>(
        &mut self,
        batch_size: usize,
        device: &B::Device,
    ) -> Option<(Tensor<B, 4>, Tensor<B, 2>)> {
        if self.cursor >= self.order.len() {
            return None;
        }
        let batch_size = batch_size.max(1);
        let end = (self.cursor + batch_size).min(self.order.len());
        let picked = &self.order[self.cursor..end];
        self.cursor = end;

        let mut images = Vec::with_capacity(picked.len() * 3 * self.height * self.width);
        let mut targets = Vec::with_capacity(picked.len());
        for &idx in picked {
            let sample = &self.samples[idx];
            images.extend_from_slice(&sample.image_chw);
            targets.push(sample.target);
        }

        let batch_len = picked.len();
        let images = Tensor::<B, 1>::from_floats(images.as_slice(), device).reshape([
            batch_len,
            3,
            self.height,
            self.width,
        ]);
        let targets =
            Tensor::<B, 1>::from_floats(targets.as_slice(), device).reshape([batch_len, 1]);
        Some((images, targets))
    }
}
