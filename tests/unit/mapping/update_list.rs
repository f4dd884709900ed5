use super::*;

fn rec(no: u64) -> CallRecord {
    CallRecord::new(no, "memcpy")
}

fn spans(list: &UpdateList) -> Vec<(u64, u64)> {
    let mut v: Vec<_> = list.records().iter().map(|r| (r.begin, r.end)).collect();
    v.sort();
    v
}

#[test]
fn inner_write_splits_the_enclosing_record() {
    let mut list = UpdateList::new();
    list.update(&[rec(1)], 0, 10);
    list.update(&[rec(2)], 4, 6);
    assert_eq!(spans(&list), vec![(0, 4), (4, 6), (6, 10)]);

    let inner = list.records().iter().find(|r| r.begin == 4).unwrap();
    assert_eq!(inner.calls, vec![rec(2)]);
    let tail = list.records().iter().find(|r| r.begin == 6).unwrap();
    assert_eq!(tail.calls, vec![rec(1)]);
}

#[test]
fn covering_write_replaces_older_records() {
    let mut list = UpdateList::new();
    list.update(&[rec(1)], 0, 4);
    list.update(&[rec(2)], 4, 8);
    list.update(&[rec(3)], 0, 8);
    assert_eq!(spans(&list), vec![(0, 8)]);
    assert_eq!(list.calls().map(CallRecord::no).collect::<Vec<_>>(), vec![3]);
}

#[test]
fn partial_overlaps_trim_both_sides() {
    let mut list = UpdateList::new();
    list.update(&[rec(1)], 0, 6);
    list.update(&[rec(2)], 10, 16);
    list.update(&[rec(3)], 4, 12);
    assert_eq!(spans(&list), vec![(0, 4), (4, 12), (12, 16)]);
}

#[test]
fn adjacent_ranges_do_not_overlap() {
    let mut list = UpdateList::new();
    list.update(&[rec(1)], 0, 4);
    list.update(&[rec(2)], 4, 8);
    assert_eq!(spans(&list), vec![(0, 4), (4, 8)]);
    list.clear();
    assert!(list.is_empty());
}
