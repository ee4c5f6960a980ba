//! Progress aggregation for multi-file upload batches.

/// Allocates each file in a batch a share of 0-100 proportional to its byte
/// size. Files transfer strictly sequentially, so the reported percentage is
/// `floor(bytes_done_across_all_files / total_bytes * 100)`, clamped to each
/// file's allotted sub-range, and therefore monotonically non-decreasing
/// across the whole batch. A single-file batch degenerates to the raw
/// `loaded/total` percentage.
#[derive(Debug, Clone)]
pub struct BatchPlan {
    sizes: Vec<u64>,
    /// Bytes completed before file `i` starts.
    offsets: Vec<u64>,
    total: u64,
}

impl BatchPlan {
    pub fn new(sizes: &[u64]) -> Self {
        let mut offsets = Vec::with_capacity(sizes.len());
        let mut total = 0u64;
        for size in sizes {
            offsets.push(total);
            total += size;
        }
        Self {
            sizes: sizes.to_vec(),
            offsets,
            total,
        }
    }

    pub fn total_bytes(&self) -> u64 {
        self.total
    }

    pub fn file_count(&self) -> usize {
        self.sizes.len()
    }

    /// Batch percentage while `loaded` bytes of file `index` have
    /// transferred. `loaded` past the file's size is clamped, which pins the
    /// value inside the file's sub-range.
    pub fn percent(&self, index: usize, loaded: u64) -> u8 {
        if self.total == 0 {
            return 100;
        }
        let loaded = loaded.min(self.sizes[index]);
        let done = self.offsets[index] + loaded;
        ((done * 100) / self.total) as u8
    }

    /// Batch percentage once file `index` has fully transferred.
    pub fn file_end_percent(&self, index: usize) -> u8 {
        self.percent(index, self.sizes[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MB: u64 = 1024 * 1024;

    #[test]
    fn test_two_file_batch_allocates_proportional_shares() {
        // 30MB + 70MB: after the first file fully transfers, progress is
        // exactly 30; at half of the second file it is 30 + 0.5*70 = 65.
        let plan = BatchPlan::new(&[30 * MB, 70 * MB]);

        assert_eq!(plan.percent(0, 30 * MB), 30);
        assert_eq!(plan.file_end_percent(0), 30);
        assert_eq!(plan.percent(1, 35 * MB), 65);
        assert_eq!(plan.percent(1, 70 * MB), 100);
    }

    #[test]
    fn test_single_file_reports_raw_ratio() {
        let plan = BatchPlan::new(&[200]);
        assert_eq!(plan.percent(0, 0), 0);
        assert_eq!(plan.percent(0, 50), 25);
        assert_eq!(plan.percent(0, 200), 100);
    }

    #[test]
    fn test_percent_is_floored_not_rounded() {
        let plan = BatchPlan::new(&[3]);
        // 2/3 = 66.67 -> 66
        assert_eq!(plan.percent(0, 2), 66);
    }

    #[test]
    fn test_overrun_is_clamped_to_sub_range() {
        let plan = BatchPlan::new(&[30 * MB, 70 * MB]);
        // A transfer reporting more bytes than the file has never spills
        // into the next file's share.
        assert_eq!(plan.percent(0, 45 * MB), 30);
    }

    #[test]
    fn test_monotone_across_sequential_batch() {
        let plan = BatchPlan::new(&[10 * MB, 1, 25 * MB]);
        let mut last = 0u8;
        for index in 0..plan.file_count() {
            let size = [10 * MB, 1, 25 * MB][index];
            for step in 0..=10u64 {
                let pct = plan.percent(index, size * step / 10);
                assert!(pct >= last, "progress went backwards: {} < {}", pct, last);
                last = pct;
            }
        }
        assert_eq!(last, 100);
    }
}
