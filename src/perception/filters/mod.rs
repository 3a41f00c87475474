//! Filtering algorithms for sensor data

use std::collections::VecDeque;

/// A simple moving average filter
#[derive(Debug, Clone)]
pub struct MovingAverageFilter {
    window_size: usize,
    buffer: VecDeque<f64>,
}

impl MovingAverageFilter {
    /// Create a new moving average filter
    pub fn new(window_size: usize) -> Self {
        let window_size = window_size.max(1);
        MovingAverageFilter {
            window_size,
            buffer: VecDeque::with_capacity(window_size),
        }
    }

    /// Add a sample, evicting the oldest once the window is full
    pub fn push(&mut self, input: f64) {
        if self.buffer.len() == self.window_size {
            self.buffer.pop_front();
        }
        self.buffer.push_back(input);
    }

    /// Average of the buffered samples, if any
    pub fn average(&self) -> Option<f64> {
        if self.buffer.is_empty() {
            return None;
        }
        Some(self.buffer.iter().sum::<f64>() / self.buffer.len() as f64)
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn averages_only_the_window() {
        let mut f = MovingAverageFilter::new(3);
        assert_eq!(f.average(), None);
        f.push(10.0);
        f.push(20.0);
        f.push(30.0);
        assert_relative_eq!(f.average().unwrap(), 20.0);
        f.push(60.0);
        assert_relative_eq!(f.average().unwrap(), (20.0 + 30.0 + 60.0) / 3.0);
        assert_eq!(f.len(), 3);
    }

    #[test]
    fn clear_empties_buffer() {
        let mut f = MovingAverageFilter::new(2);
        f.push(1.0);
        f.clear();
        assert!(f.is_empty());
    }
}
