use crate::error::{FilterError, Result};
use std::sync::OnceLock;

pub const DEFAULT_PHRED_OFFSET: u8 = 33;
pub const MAX_PHRED: u8 = 126;

static SCORE_TO_ERROR_RATE: OnceLock<[f64; 128]> = OnceLock::new();

/// Lookup table mapping a decoded phred score to its error probability,
/// `table[score] = 10^(-score/10)`. Built once, read-only afterwards.
#[inline]
fn score_to_error_rate() -> &'static [f64; 128] {
    SCORE_TO_ERROR_RATE.get_or_init(|| {
        let mut table = [0.0; 128];
        for (score, entry) in table.iter_mut().enumerate() {
            *entry = 10f64.powf(-(score as f64) / 10.0);
        }
        table
    })
}

/// Sum of per-base error probabilities, not yet divided by the length.
///
/// Every byte must decode to a score in `[0, 126 - offset]`. The wrapping
/// subtraction makes a single comparison catch bytes below the offset as
/// well as bytes above 126.
pub fn sum_error_rate(scores: &[u8], offset: u8) -> Result<f64> {
    let table = score_to_error_rate();
    // An offset past '~' leaves no representable score at all.
    let Some(max_score) = MAX_PHRED.checked_sub(offset) else {
        return match scores.first() {
            Some(&byte) => Err(FilterError::OutOfRange { byte, offset }),
            None => Ok(0.0),
        };
    };
    let mut total = 0.0;
    for &byte in scores {
        let score = byte.wrapping_sub(offset);
        if score > max_score {
            return Err(FilterError::OutOfRange { byte, offset });
        }
        total += table[score as usize];
    }
    Ok(total)
}

pub fn average_error_rate(scores: &[u8], offset: u8) -> Result<f64> {
    if scores.is_empty() {
        return Err(FilterError::EmptyInput {
            statistic: "average error rate",
        });
    }
    Ok(sum_error_rate(scores, offset)? / scores.len() as f64)
}

/// Phred-scale mean quality: `-10 * log10(average_error_rate)`.
///
/// Averaging must happen in error-rate space. Arithmetic averaging of the
/// phred scores themselves understates the error contribution of low
/// quality bases by up to 5x.
pub fn qualmean(scores: &[u8], offset: u8) -> Result<f64> {
    Ok(-10.0 * average_error_rate(scores, offset)?.log10())
}

/// Occurrence counts per decoded phred score, merged across any number of
/// quality strings and consumed by the counting-sort median.
#[derive(Debug, Clone)]
pub struct PhredHistogram {
    counts: [u64; 128],
    total: u64,
}

impl Default for PhredHistogram {
    fn default() -> Self {
        Self::new()
    }
}

impl PhredHistogram {
    pub fn new() -> Self {
        PhredHistogram {
            counts: [0; 128],
            total: 0,
        }
    }

    pub fn add(&mut self, scores: &[u8], offset: u8) -> Result<()> {
        let Some(max_score) = MAX_PHRED.checked_sub(offset) else {
            return match scores.first() {
                Some(&byte) => Err(FilterError::OutOfRange { byte, offset }),
                None => Ok(()),
            };
        };
        for &byte in scores {
            let score = byte.wrapping_sub(offset);
            if score > max_score {
                return Err(FilterError::OutOfRange { byte, offset });
            }
            self.counts[score as usize] += 1;
        }
        self.total += scores.len() as u64;
        Ok(())
    }

    #[inline]
    pub fn total(&self) -> u64 {
        self.total
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Median score via a cumulative scan over the 128 buckets.
    ///
    /// With an even item count and the two middle values in different
    /// buckets, the result is the true average of the two bucket values
    /// and may end in `.5`. The median of an empty histogram is NaN by
    /// convention, distinct from the error raised for an empty mean.
    pub fn median(&self) -> Result<f64> {
        if self.total == 0 {
            return Ok(f64::NAN);
        }
        let odd = self.total % 2 == 1;
        let half = self.total / 2 + u64::from(odd);
        let mut counted = 0u64;
        for (score, &count) in self.counts.iter().enumerate() {
            counted += count;
            if counted < half {
                continue;
            }
            if odd || counted > half {
                // Both middle values fall in this bucket.
                return Ok(score as f64);
            }
            for (upper, &upper_count) in self.counts.iter().enumerate().skip(score + 1) {
                if upper_count > 0 {
                    return Ok((score + upper) as f64 / 2.0);
                }
            }
            return Err(FilterError::InternalConsistency);
        }
        Err(FilterError::InternalConsistency)
    }
}

pub fn qualmedian(scores: &[u8], offset: u8) -> Result<f64> {
    let mut histogram = PhredHistogram::new();
    histogram.add(scores, offset)?;
    histogram.median()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Realistic quality strings taken from Illumina-style data.
    const QUAL_STRINGS: [&[u8]; 2] = [
        b"I?>DC:>@?IDC9??G?>EH9E@66=9<?@E?DC:@<@BBFG>=FIC@F9>7CG?IC?I;CD9>>>A@C7>>\
          8>>D9GCB<;?DD>C;9?>5G>?H?=6@>:G6B<?==A7?@???8IF<75C=@A:BEA@A;C89D:=1?=<A\
          >D=>B66C",
        b"C:@?;8@=DC???>E>E;98BBB?9D=?@B;D?I:??FD8CH?A7?<H>ABD@C@C?>;;B<><;9@8BAFD\
          ?;:>I3DB<?<B=?A??CI>2E>><BD?A??FCBCE?DAI><B:8D>?C>@BA=F<>7=E=?DC=@9GG=>?\
          C@><CA;>",
    ];

    fn direct_qualmean(quals: &[u8], offset: u8) -> f64 {
        let probs: Vec<f64> = quals
            .iter()
            .map(|&q| 10f64.powf(-((q - offset) as f64) / 10.0))
            .collect();
        -10.0 * (probs.iter().sum::<f64>() / probs.len() as f64).log10()
    }

    fn direct_median(quals: &[u8], offset: u8) -> f64 {
        let mut scores: Vec<u8> = quals.iter().map(|&q| q - offset).collect();
        scores.sort_unstable();
        let n = scores.len();
        if n % 2 == 1 {
            scores[n / 2] as f64
        } else {
            (scores[n / 2 - 1] as f64 + scores[n / 2] as f64) / 2.0
        }
    }

    #[test]
    fn qualmean_matches_direct_computation() {
        for quals in QUAL_STRINGS {
            let expected = direct_qualmean(quals, DEFAULT_PHRED_OFFSET);
            let actual = qualmean(quals, DEFAULT_PHRED_OFFSET).unwrap();
            assert!(
                (expected - actual).abs() < 1e-9,
                "expected {expected}, got {actual}"
            );
        }
    }

    #[test]
    fn qualmedian_matches_direct_computation() {
        for quals in QUAL_STRINGS {
            let expected = direct_median(quals, DEFAULT_PHRED_OFFSET);
            let actual = qualmedian(quals, DEFAULT_PHRED_OFFSET).unwrap();
            assert_eq!(expected, actual);
        }
    }

    #[test]
    fn qualmean_of_uniform_i_string_is_40() {
        // 'I' decodes to score 40 at offset 33.
        let quals = vec![b'I'; 100];
        let mean = qualmean(&quals, DEFAULT_PHRED_OFFSET).unwrap();
        assert!((mean - 40.0).abs() < 1e-9);
        assert_eq!(qualmedian(&quals, DEFAULT_PHRED_OFFSET).unwrap(), 40.0);
    }

    #[test]
    fn average_error_rate_of_scores_10_and_30() {
        let scores = [10u8, 30u8];
        let rate = average_error_rate(&scores, 0).unwrap();
        assert!((rate - 0.0505).abs() < 1e-12);
        let mean = qualmean(&scores, 0).unwrap();
        assert!((mean - 12.966).abs() < 1e-3);
    }

    #[test]
    fn median_averages_distinct_middle_buckets() {
        // Sorted: A A C E G G, middle values C (67) and E (69).
        let quals = b"AACEGG";
        assert_eq!(qualmedian(quals, 0).unwrap(), 68.0);
    }

    #[test]
    fn median_half_point() {
        let scores = [10u8, 11u8];
        assert_eq!(qualmedian(&scores, 0).unwrap(), 10.5);
    }

    #[test]
    fn median_of_identical_bytes_is_exact() {
        for byte in [b'!', b'5', b'I', b'~'] {
            let quals = vec![byte; 7];
            assert_eq!(
                qualmedian(&quals, DEFAULT_PHRED_OFFSET).unwrap(),
                (byte - DEFAULT_PHRED_OFFSET) as f64
            );
        }
    }

    #[test]
    fn bytes_outside_range_are_rejected() {
        for byte in (0u8..33).chain([127u8, 200u8]) {
            let err = qualmean(&[byte], DEFAULT_PHRED_OFFSET).unwrap_err();
            assert!(matches!(err, FilterError::OutOfRange { .. }), "{byte}");
            let err = qualmedian(&[byte], DEFAULT_PHRED_OFFSET).unwrap_err();
            assert!(matches!(err, FilterError::OutOfRange { .. }), "{byte}");
        }
    }

    #[test]
    fn offsets_past_the_printable_range_reject_every_byte() {
        for offset in [127u8, 200u8, 255u8] {
            let err = qualmean(b"IIII", offset).unwrap_err();
            assert!(matches!(err, FilterError::OutOfRange { .. }), "{offset}");
            let err = qualmedian(b"IIII", offset).unwrap_err();
            assert!(matches!(err, FilterError::OutOfRange { .. }), "{offset}");
        }
    }

    #[test]
    fn boundary_bytes_are_accepted() {
        assert!(qualmean(b"!~", DEFAULT_PHRED_OFFSET).is_ok());
        assert!(qualmedian(b"!~", DEFAULT_PHRED_OFFSET).is_ok());
    }

    #[test]
    fn empty_mean_is_an_error() {
        let err = average_error_rate(b"", DEFAULT_PHRED_OFFSET).unwrap_err();
        assert!(matches!(err, FilterError::EmptyInput { .. }));
        assert!(qualmean(b"", DEFAULT_PHRED_OFFSET).is_err());
    }

    #[test]
    fn empty_median_is_nan() {
        assert!(qualmedian(b"", DEFAULT_PHRED_OFFSET).unwrap().is_nan());
    }

    #[test]
    fn error_rate_of_score_zero_is_one() {
        assert!((average_error_rate(b"!", DEFAULT_PHRED_OFFSET).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn lookup_table_matches_direct_exponentiation() {
        for score in 0..128usize {
            let direct = 10f64.powf(-(score as f64) / 10.0);
            assert_eq!(score_to_error_rate()[score], direct);
        }
    }
}
