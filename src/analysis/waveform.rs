//! Silence estimation over amplitude waveforms
//!
//! The client ships coarse amplitude graphs sampled at 50 Hz alongside the
//! transcript. Silence is estimated by thresholding the series and summing
//! sample runs that stay below the threshold; short dips are recognizer
//! noise, not pauses, so a run only counts once it reaches a minimum
//! length.

use serde::{Deserialize, Serialize};

/// How the silence threshold is derived from the series itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SilenceMode {
    /// Threshold at a low percentile of the sorted amplitudes
    Percentile,
    /// Threshold at a fixed ratio of the series maximum
    Rel,
}

/// Tunable silence estimation parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SilenceEstimator {
    pub sample_rate_hz: u32,
    pub mode: SilenceMode,
    /// Percentile (0..1) used in [`SilenceMode::Percentile`]
    pub percentile: f64,
    /// Ratio of the maximum used in [`SilenceMode::Rel`]
    pub rel_ratio: f64,
    /// Minimum run length, in samples, for a dip to count as silence
    pub min_run_samples: usize,
}

impl Default for SilenceEstimator {
    fn default() -> Self {
        Self {
            sample_rate_hz: 50,
            mode: SilenceMode::Percentile,
            percentile: 0.15,
            rel_ratio: 0.25,
            min_run_samples: 4,
        }
    }
}

impl SilenceEstimator {
    /// Estimated total silence in the series, in seconds.
    ///
    /// Empty input yields 0.0.
    pub fn estimate_silence_seconds(&self, series: &[u32]) -> f64 {
        if series.is_empty() {
            return 0.0;
        }

        let threshold = self.threshold(series);

        let mut silent_samples = 0usize;
        let mut run = 0usize;
        for &sample in series {
            if f64::from(sample) <= threshold {
                run += 1;
            } else {
                if run >= self.min_run_samples {
                    silent_samples += run;
                }
                run = 0;
            }
        }
        if run >= self.min_run_samples {
            silent_samples += run;
        }

        silent_samples as f64 / f64::from(self.sample_rate_hz.max(1))
    }

    fn threshold(&self, series: &[u32]) -> f64 {
        match self.mode {
            SilenceMode::Percentile => {
                let mut sorted = series.to_vec();
                sorted.sort_unstable();
                let idx = ((sorted.len() as f64) * self.percentile).floor() as usize;
                f64::from(sorted[idx.min(sorted.len() - 1)])
            }
            SilenceMode::Rel => {
                let max = series.iter().copied().max().unwrap_or(0);
                f64::from(max) * self.rel_ratio
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_series() {
        let est = SilenceEstimator::default();
        assert_eq!(est.estimate_silence_seconds(&[]), 0.0);
    }

    #[test]
    fn test_flat_series_percentile() {
        // all-equal values: the percentile threshold equals every sample,
        // so the whole series is one qualifying run
        let est = SilenceEstimator::default();
        let series = vec![10u32; 20];
        let silence = est.estimate_silence_seconds(&series);
        assert!((silence - 0.4).abs() < 1e-9); // 20 samples / 50 Hz
    }

    #[test]
    fn test_flat_series_rel() {
        // rel threshold is max * 0.25 = 2.5, nothing qualifies
        let est = SilenceEstimator {
            mode: SilenceMode::Rel,
            ..Default::default()
        };
        let series = vec![10u32; 20];
        assert_eq!(est.estimate_silence_seconds(&series), 0.0);
    }

    #[test]
    fn test_short_dips_ignored() {
        let est = SilenceEstimator {
            mode: SilenceMode::Rel,
            ..Default::default()
        };
        // dips of 2 samples stay under min_run_samples = 4
        let mut series = vec![100u32; 10];
        series.extend([0, 0]);
        series.extend(vec![100u32; 10]);
        assert_eq!(est.estimate_silence_seconds(&series), 0.0);
    }

    #[test]
    fn test_long_pause_counted() {
        let est = SilenceEstimator {
            mode: SilenceMode::Rel,
            ..Default::default()
        };
        let mut series = vec![100u32; 10];
        series.extend(vec![0u32; 10]); // 200 ms pause at 50 Hz
        series.extend(vec![100u32; 10]);
        let silence = est.estimate_silence_seconds(&series);
        assert!((silence - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_trailing_run_counted() {
        let est = SilenceEstimator {
            mode: SilenceMode::Rel,
            ..Default::default()
        };
        let mut series = vec![100u32; 5];
        series.extend(vec![0u32; 5]); // series ends inside the run
        let silence = est.estimate_silence_seconds(&series);
        assert!((silence - 0.1).abs() < 1e-9);
    }
}
