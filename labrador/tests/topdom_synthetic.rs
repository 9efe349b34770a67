use labrador::_internal_test_data::{tad_matrix, THREE_TAD_MATRIX, TWO_TAD_MATRIX};
use labrador::topdom::TopDomParams;
use labrador::RAW_COUNT_FIELD;

#[test_log::test]
fn test_two_domains() {
    let params = TopDomParams::builder().window_size(15_000).build();

    let boundaries = TWO_TAD_MATRIX.call_topdom(RAW_COUNT_FIELD, &params).unwrap();

    assert_eq!(boundaries.len(), 1);
    assert_eq!(boundaries[0].coordinate, 95_000);
    assert!(boundaries[0].p_value.unwrap() < 0.05);
}

#[test]
fn test_three_domains_without_significance_test() {
    let params = TopDomParams::builder()
        .window_size(15_000)
        .significance_test(false)
        .build();

    let boundaries = THREE_TAD_MATRIX
        .call_topdom(RAW_COUNT_FIELD, &params)
        .unwrap();

    let coordinates: Vec<u64> = boundaries.iter().map(|b| b.coordinate).collect();
    assert_eq!(coordinates, [45_000, 95_000]);
    assert!(boundaries.iter().all(|b| b.p_value.is_none()));
}

#[test]
fn test_boundaries_are_sorted_and_unique() {
    let matrix = tad_matrix("chr3", 1000, 60, &[(0, 12), (12, 30), (30, 45), (45, 60)], None);
    let params = TopDomParams::builder().window_size(3000).build();

    let boundaries = matrix.call_topdom(RAW_COUNT_FIELD, &params).unwrap();

    assert!(!boundaries.is_empty());
    assert!(boundaries
        .windows(2)
        .all(|pair| pair[0].coordinate < pair[1].coordinate));
    for boundary in &boundaries {
        assert_eq!(boundary.coordinate, boundary.bin as u64 * 1000);
    }
}

#[test]
fn test_resolution_override() {
    let params = TopDomParams::builder()
        .window_size(30)
        .resolution(10)
        .significance_test(false)
        .build();

    let boundaries = TWO_TAD_MATRIX.call_topdom(RAW_COUNT_FIELD, &params).unwrap();

    assert_eq!(boundaries.len(), 1);
    assert_eq!(boundaries[0].bin, 19);
    assert_eq!(boundaries[0].coordinate, 190);
}
