use nalgebra::Vector4;
use std::cell::UnsafeCell;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

const LOCK_STRIPES: usize = 1024;

/// Color + depth render target shared by all fragment invocations of a draw.
///
/// Depth is stored as atomic f32 bits so the depth test needs no lock. Color
/// writes go through striped locks and only happen after a passing depth test.
/// Colors are linear RGBA and are not clamped here.
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    /// Samples per axis (1 = no supersampling).
    pub sample_count: usize,
    pub buffer_width: usize,
    pub buffer_height: usize,

    color_buffer: UnsafeCell<Vec<Vector4<f32>>>,
    depth_buffer: Vec<AtomicU32>,
    locks: Vec<Mutex<()>>,
}

// Color access is guarded by `locks`; depth is atomic.
unsafe impl Sync for FrameBuffer {}

impl FrameBuffer {
    pub fn new(width: usize, height: usize, sample_count: usize) -> Self {
        let sample_count = sample_count.max(1);
        let buffer_width = width * sample_count;
        let buffer_height = height * sample_count;
        let size = buffer_width * buffer_height;

        let depth_buffer = (0..size)
            .map(|_| AtomicU32::new(f32::INFINITY.to_bits()))
            .collect();
        let locks = (0..LOCK_STRIPES).map(|_| Mutex::new(())).collect();

        Self {
            width,
            height,
            sample_count,
            buffer_width,
            buffer_height,
            color_buffer: UnsafeCell::new(vec![Vector4::zeros(); size]),
            depth_buffer,
            locks,
        }
    }

    pub fn clear(&mut self, color: Vector4<f32>, depth: f32) {
        self.color_buffer.get_mut().fill(color);
        let bits = depth.to_bits();
        for d in &self.depth_buffer {
            d.store(bits, Ordering::Relaxed);
        }
    }

    #[inline(always)]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.buffer_width && y < self.buffer_height
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.buffer_width + x
    }

    /// Depth test with `Less` and, on success, depth write.
    #[inline]
    pub fn depth_test_and_update(&self, x: usize, y: usize, new_depth: f32) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let depth_atomic = &self.depth_buffer[self.index(x, y)];
        let new_bits = new_depth.to_bits();

        let mut current_bits = depth_atomic.load(Ordering::Relaxed);
        loop {
            if new_depth >= f32::from_bits(current_bits) {
                return false;
            }
            match depth_atomic.compare_exchange_weak(
                current_bits,
                new_bits,
                Ordering::Acquire,
                Ordering::Relaxed,
            ) {
                Ok(_) => return true,
                Err(updated) => current_bits = updated,
            }
        }
    }

    /// Replaces the stored color. Call only after `depth_test_and_update` passed.
    #[inline]
    pub fn set_pixel_safe(&self, x: usize, y: usize, color: Vector4<f32>) {
        if !self.in_bounds(x, y) {
            return;
        }
        let idx = self.index(x, y);
        let _guard = self.locks[idx % self.locks.len()]
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // The stripe lock for `idx` is held.
        unsafe {
            let buffer = &mut *self.color_buffer.get();
            buffer[idx] = color;
        }
    }

    pub fn depth_at(&self, x: usize, y: usize) -> Option<f32> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(f32::from_bits(
            self.depth_buffer[self.index(x, y)].load(Ordering::Relaxed),
        ))
    }

    /// Resolved color of output pixel (x, y), averaging its samples.
    /// Meant for readback once the draw has finished.
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Vector4<f32>> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let buffer = unsafe { &*self.color_buffer.get() };

        if self.sample_count == 1 {
            return Some(buffer[self.index(x, y)]);
        }

        let start_x = x * self.sample_count;
        let start_y = y * self.sample_count;
        let mut sum = Vector4::zeros();
        for dy in 0..self.sample_count {
            for dx in 0..self.sample_count {
                sum += buffer[self.index(start_x + dx, start_y + dy)];
            }
        }
        Some(sum / (self.sample_count * self.sample_count) as f32)
    }

    /// All resolved pixels in row-major order.
    pub fn resolve(&self) -> Vec<Vector4<f32>> {
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .filter_map(|(x, y)| self.get_pixel(x, y))
            .collect()
    }
}
