//! End-to-end checks of the series transform over a recorded two-day
//! window of outcome data: 48 hourly buckets of accepted, filtered,
//! rate-limited and client-discarded counts.

use rustc_hash::FxHashMap;
use tally_series::{build_series, Outcome, SeriesName, TrackedCount, UsageReport};

const WINDOW_START: u64 = 1656788400000;
const HOUR_MS: u64 = 3600000;

/// Independently reported indexed counts per bucket.
const INDEXED: [u64; 48] = [
    294117, 281850, 263003, 259581, 246831, 278464, 290677, 242770, 242559, 248963, 250920,
    268994, 296129, 308165, 302398, 301891, 316698, 333888, 336204, 329735, 323717, 317564,
    312407, 307008, 301681, 299652, 276849, 274486, 298985, 368148, 444434, 423119, 416110,
    464443, 526387, 692300, 720026, 719854, 719658, 719237, 717889, 719757, 718147, 719843,
    712099, 643028, 545065, 311310,
];

/// Accepted volume beyond the indexed share: the "Processed" segment.
const PROCESSED_REMAINDER: [u64; 48] = [
    248, 278, 244, 241, 270, 269, 285, 256, 248, 267, 326, 335, 258, 255, 269, 292, 271, 246,
    254, 285, 291, 295, 260, 292, 242, 318, 326, 302, 299, 299, 321, 310, 320, 371, 323, 331,
    286, 256, 275, 316, 294, 295, 301, 282, 391, 358, 391, 217,
];

/// Client-reported discard volume per bucket.
const CLIENT_DISCARDED: [u64; 48] = [
    0, 1, 1, 1, 94, 1, 1, 0, 566, 179, 1, 1, 1, 0, 222, 6, 287, 465, 83, 7, 0, 1835, 145, 0, 0,
    1, 0, 0, 0, 1, 0, 2, 0, 1, 849, 25331, 147200, 220014, 189001, 99590, 81288, 134522, 151489,
    128585, 41643, 6404, 145, 1381,
];

/// Discard volume a 20% client sample rate implies when the client did not
/// report its discards: four dropped for every accepted event.
const PROJECTED_DISCARDED: [u64; 48] = [
    1177460, 1128512, 1052988, 1039288, 988404, 1114932, 1163848, 972104, 971228, 996920,
    1004984, 1077316, 1185548, 1233680, 1210668, 1208732, 1267876, 1336536, 1345832, 1320080,
    1296032, 1271436, 1250668, 1229200, 1207692, 1199880, 1108700, 1099152, 1197136, 1473788,
    1779020, 1693716, 1665720, 1859256, 2106840, 2770524, 2881248, 2880440, 2879732, 2878212,
    2872732, 2880208, 2873792, 2880500, 2849960, 2573544, 2181824, 1246108,
];

fn bucketed(values: &[u64]) -> Vec<TrackedCount> {
    values
        .iter()
        .enumerate()
        .map(|(i, &count)| TrackedCount {
            timestamp: WINDOW_START + i as u64 * HOUR_MS,
            count,
        })
        .collect()
}

/// The window as the usage-statistics endpoint reports it: indexed counts
/// supplied separately, client discards broken down by reason.
fn recorded_outcomes() -> UsageReport {
    let accepted: Vec<u64> = INDEXED
        .iter()
        .zip(PROCESSED_REMAINDER.iter())
        .map(|(&indexed, &rest)| indexed + rest)
        .collect();

    let mut outcomes = FxHashMap::default();
    outcomes.insert(Outcome::Accepted, bucketed(&accepted));
    outcomes.insert(Outcome::Filtered, bucketed(&[0; 48]));
    outcomes.insert(Outcome::RateLimited, bucketed(&[0; 48]));
    outcomes.insert(Outcome::ClientDiscard, bucketed(&CLIENT_DISCARDED));

    let queue: Vec<u64> = CLIENT_DISCARDED.iter().map(|&d| d - d / 3).collect();
    let network: Vec<u64> = CLIENT_DISCARDED.iter().map(|&d| d / 3).collect();
    let mut reasons = FxHashMap::default();
    reasons.insert("queue_overflow".to_owned(), bucketed(&queue));
    reasons.insert("network_error".to_owned(), bucketed(&network));

    UsageReport {
        outcomes,
        indexed: Some(bucketed(&INDEXED)),
        client_discards: Some(reasons),
    }
}

fn assert_axis_and_dress(series: &tally_series::Series) {
    assert_eq!(series.data.len(), 48);
    assert_eq!(series.kind, "bar");
    assert_eq!(series.stack, "usage");
    assert_eq!(series.bar_min_height, 0);
    for (i, point) in series.data.iter().enumerate() {
        assert_eq!(point.timestamp, WINDOW_START + i as u64 * HOUR_MS);
    }
}

#[test]
fn recorded_window_without_sampling_rate() {
    let [indexed, processed, discarded] = build_series(&recorded_outcomes(), None);

    assert_eq!(indexed.name, SeriesName::IndexedAndProcessed);
    assert_eq!(indexed.color, "#2BA185");
    assert_eq!(processed.name, SeriesName::Processed);
    assert_eq!(processed.color, "#F5B000");
    assert_eq!(discarded.name, SeriesName::Discarded);
    assert_eq!(discarded.color, "#F55459");

    for series in [&indexed, &processed, &discarded] {
        assert_axis_and_dress(series);
    }

    for i in 0..48 {
        assert_eq!(indexed.data[i].value, INDEXED[i], "indexed bucket {i}");
        assert_eq!(
            processed.data[i].value, PROCESSED_REMAINDER[i],
            "processed bucket {i}"
        );
        assert_eq!(
            discarded.data[i].value, CLIENT_DISCARDED[i],
            "discarded bucket {i}"
        );
    }

    // Documented first bucket.
    assert_eq!(indexed.data[0].timestamp, 1656788400000);
    assert_eq!(indexed.data[0].value, 294117);
    assert_eq!(processed.data[0].value, 248);
    assert_eq!(discarded.data[0].value, 0);
}

#[test]
fn recorded_window_with_rate_and_no_client_reports() {
    let mut report = recorded_outcomes();
    report.outcomes.remove(&Outcome::ClientDiscard);
    report.client_discards = None;

    let [indexed, processed, discarded] = build_series(&report, Some(0.2));

    for series in [&indexed, &processed, &discarded] {
        assert_axis_and_dress(series);
    }

    // The indexed/processed split is unchanged: explicit indexed counts
    // win over the rate. Only the discarded series differs, projected
    // from the 20% client sample rate.
    for i in 0..48 {
        assert_eq!(indexed.data[i].value, INDEXED[i], "indexed bucket {i}");
        assert_eq!(
            processed.data[i].value, PROCESSED_REMAINDER[i],
            "processed bucket {i}"
        );
        assert_eq!(
            discarded.data[i].value, PROJECTED_DISCARDED[i],
            "discarded bucket {i}"
        );
    }
}
