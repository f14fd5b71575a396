use fastq_filter::{average_error_rate, qualmean, qualmedian, DEFAULT_PHRED_OFFSET};
use proptest::collection::vec;
use proptest::prelude::*;

fn quality_string() -> impl Strategy<Value = Vec<u8>> {
    vec(DEFAULT_PHRED_OFFSET..=126u8, 1..400)
}

proptest! {
    #[test]
    fn average_error_rate_is_in_unit_interval(quals in quality_string()) {
        let rate = average_error_rate(&quals, DEFAULT_PHRED_OFFSET).unwrap();
        prop_assert!(rate > 0.0);
        prop_assert!(rate <= 1.0);
    }

    #[test]
    fn qualmean_is_non_negative(quals in quality_string()) {
        prop_assert!(qualmean(&quals, DEFAULT_PHRED_OFFSET).unwrap() >= 0.0);
    }

    #[test]
    fn odd_length_median_is_a_member_score(quals in quality_string()) {
        let mut quals = quals;
        if quals.len() % 2 == 0 {
            quals.pop();
        }
        let median = qualmedian(&quals, DEFAULT_PHRED_OFFSET).unwrap();
        prop_assert_eq!(median.fract(), 0.0);
        prop_assert!(quals
            .iter()
            .any(|&q| (q - DEFAULT_PHRED_OFFSET) as f64 == median));
    }

    #[test]
    fn even_length_median_is_at_worst_a_half_point(quals in quality_string()) {
        let mut quals = quals;
        if quals.len() % 2 == 1 {
            quals.pop();
        }
        if !quals.is_empty() {
            let median = qualmedian(&quals, DEFAULT_PHRED_OFFSET).unwrap();
            prop_assert_eq!((median * 2.0).fract(), 0.0);
        }
    }

    #[test]
    fn repeating_a_record_does_not_change_its_error_rate(
        quals in quality_string(),
        copies in 1usize..5,
    ) {
        let single = average_error_rate(&quals, DEFAULT_PHRED_OFFSET).unwrap();
        let repeated: Vec<u8> = quals
            .iter()
            .copied()
            .cycle()
            .take(quals.len() * copies)
            .collect();
        let combined = average_error_rate(&repeated, DEFAULT_PHRED_OFFSET).unwrap();
        prop_assert!((single - combined).abs() < 1e-12);
    }

    #[test]
    fn median_is_order_independent(quals in quality_string()) {
        let mut sorted = quals.clone();
        sorted.sort_unstable();
        prop_assert_eq!(
            qualmedian(&quals, DEFAULT_PHRED_OFFSET).unwrap(),
            qualmedian(&sorted, DEFAULT_PHRED_OFFSET).unwrap()
        );
    }
}
