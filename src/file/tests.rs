use super::*;
use proptest::prelude::*;
use std::fs;
use tempfile::TempDir;

fn setup_test_store(page_size: usize) -> (TempDir, PageStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = PageStore::create(temp_dir.path().join("test.db"), page_size);
    (temp_dir, store)
}

#[test]
fn test_padded_write_layout() {
    let (_temp, store) = setup_test_store(8);

    store.write_page(&Page::new(0, b"ab".to_vec())).unwrap();

    let bytes = fs::read(store.path()).unwrap();
    assert_eq!(bytes, vec![0x61, 0x62, 0, 0, 0, 0, 0, 0]);

    let page = store.read_page(0).unwrap();
    assert_eq!(page.data(), b"ab\0\0\0\0\0\0");
}

#[test]
fn test_allocation_scenario() {
    let (_temp, mut store) = setup_test_store(8);

    assert_eq!(store.get_next_page(), 1);
    assert_eq!(store.get_next_page(), 2);
    store.free_page(1).unwrap();
    assert_eq!(store.get_next_page(), 1);
    assert_eq!(store.get_next_page(), 3);
}

#[test]
fn test_no_cross_contamination() {
    let (_temp, store) = setup_test_store(16);

    store.write_page(&Page::new(0, b"zero".to_vec())).unwrap();
    store.write_page(&Page::new(1, b"one".to_vec())).unwrap();
    store.write_page(&Page::new(2, b"two!".to_vec())).unwrap();

    let bytes = fs::read(store.path()).unwrap();
    assert_eq!(bytes.len(), 48);
    assert_eq!(&bytes[16..19], b"one");
    assert_eq!(&bytes[32..36], b"two!");

    assert_eq!(&store.read_page(0).unwrap().data()[..4], b"zero");
    assert_eq!(&store.read_page(1).unwrap().data()[..3], b"one");
    assert_eq!(&store.read_page(2).unwrap().data()[..4], b"two!");
}

#[test]
fn test_double_write_idempotent() {
    let (_temp, store) = setup_test_store(8);
    let page = Page::new(2, b"same".to_vec());

    store.write_page(&page).unwrap();
    let once = fs::read(store.path()).unwrap();

    store.write_page(&page).unwrap();
    let twice = fs::read(store.path()).unwrap();

    assert_eq!(once, twice);
    assert_eq!(store.read_page(2).unwrap().data(), b"same\0\0\0\0");
}

#[test]
fn test_allocate_write_free_reuse_cycle() {
    let (_temp, mut store) = setup_test_store(8);

    let a = store.get_next_page();
    let b = store.get_next_page();
    store.write_page(&Page::new(a, b"first".to_vec())).unwrap();
    store.write_page(&Page::new(b, b"second".to_vec())).unwrap();

    store.free_page(a).unwrap();
    let reused = store.get_next_page();
    assert_eq!(reused, a);

    store.write_page(&Page::new(reused, b"third".to_vec())).unwrap();
    assert_eq!(store.read_page(reused).unwrap().data(), b"third\0\0\0");
    assert_eq!(store.read_page(b).unwrap().data(), b"second\0\0");
}

proptest! {
    #[test]
    fn prop_read_returns_payload_then_zeros(
        number in 0u64..32,
        payload in proptest::collection::vec(any::<u8>(), 0..=64),
    ) {
        let (_temp, store) = setup_test_store(64);
        store.write_page(&Page::new(number, payload.clone())).unwrap();

        let page = store.read_page(number).unwrap();
        prop_assert_eq!(page.data().len(), 64);
        prop_assert_eq!(&page.data()[..payload.len()], payload.as_slice());
        prop_assert!(page.data()[payload.len()..].iter().all(|&b| b == 0));
    }

    #[test]
    fn prop_fresh_allocation_is_increasing(k in 1usize..200) {
        let mut list = FreeList::new();
        let pages: Vec<PageNumber> = (0..k).map(|_| list.get_next_page()).collect();
        let expected: Vec<PageNumber> = (1..=k as PageNumber).collect();
        prop_assert_eq!(pages, expected);
    }

    #[test]
    fn prop_freed_page_is_reused_next(k in 1u64..50, pick in 0u64..50) {
        let mut list = FreeList::new();
        for _ in 0..k {
            list.get_next_page();
        }
        let freed = pick % k + 1;
        list.free_page(freed, ContractMode::Checked).unwrap();

        prop_assert_eq!(list.get_next_page(), freed);
        prop_assert_eq!(list.get_next_page(), k + 1);
    }
}
