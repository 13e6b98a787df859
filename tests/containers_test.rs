use bucketmap_rs::darray::{DARRAY_DEFAULT_EXPAND_RATE, DARRAY_MINIMUM_CAPACITY};
use bucketmap_rs::{DArray, Error, LinkedList};

// ------------------------------------------------------------------------------------------------
// DArray
// ------------------------------------------------------------------------------------------------

#[test]
fn test_darray_create() {
    let a: DArray<u32> = DArray::new();
    assert_eq!(a.capacity(), DARRAY_MINIMUM_CAPACITY);
    assert_eq!(a.len(), 0);
    assert!(a.is_empty());
    assert_eq!(a.first(), None);
    assert_eq!(a.last(), None);

    assert_eq!(
        DArray::<u32>::with_capacity(0).unwrap_err(),
        Error::InvalidCapacity(0)
    );
}

#[test]
fn test_darray_push_pop() {
    let mut a = DArray::new();
    for i in 0..1000u32 {
        a.push(i * 3).unwrap();
    }
    assert_eq!(a.len(), 1000);
    assert_eq!(
        a.capacity(),
        DARRAY_MINIMUM_CAPACITY + 4 * DARRAY_DEFAULT_EXPAND_RATE
    );
    assert_eq!(a.first(), Some(&0));
    assert_eq!(a.last(), Some(&2997));

    for i in (0..1000u32).rev() {
        assert_eq!(a.pop(), Some(i * 3));
    }
    assert_eq!(a.pop(), None);
    assert!(a.is_empty());
}

#[test]
fn test_darray_get_set() {
    let mut a: DArray<String> = DArray::with_capacity(4).unwrap();
    assert_eq!(a.set(0, "zero".into()).unwrap(), None);
    assert_eq!(a.set(2, "two".into()).unwrap(), None);
    assert_eq!(a.len(), 3);
    assert_eq!(a.get(1), None);
    assert_eq!(a.get(2).map(String::as_str), Some("two"));

    let old = a.set(2, "TWO".into()).unwrap();
    assert_eq!(old.as_deref(), Some("two"));

    if let Some(s) = a.get_mut(0) {
        s.push('!');
    }
    assert_eq!(a.get(0).map(String::as_str), Some("zero!"));

    assert_eq!(
        a.set(4, "four".into()),
        Err(Error::OutOfBounds { index: 4, len: 4 })
    );
    assert_eq!(a.get(100), None);
}

#[test]
fn test_darray_remove_leaves_hole() {
    let mut a = DArray::new();
    for i in 0..5 {
        a.push(i).unwrap();
    }
    assert_eq!(a.remove(2), Some(2));
    assert_eq!(a.remove(2), None);
    assert_eq!(a.len(), 5);
    assert_eq!(a.get(3), Some(&3));
    assert_eq!(a.iter().copied().collect::<Vec<_>>(), vec![0, 1, 3, 4]);

    for v in a.iter_mut() {
        *v += 10;
    }
    assert_eq!(a.iter().copied().collect::<Vec<_>>(), vec![10, 11, 13, 14]);
}

#[test]
fn test_darray_clear_keeps_capacity() {
    let mut a = DArray::with_capacity(2).unwrap().with_expand_rate(8);
    for i in 0..5 {
        a.push(i).unwrap();
    }
    assert_eq!(a.capacity(), 10);
    a.clear();
    assert!(a.is_empty());
    assert_eq!(a.capacity(), 10);
    assert_eq!(a.get(0), None);

    a.push(42).unwrap();
    a.trim_to_size();
    assert_eq!(a.capacity(), 1);
    assert_eq!(a.first(), Some(&42));
}

#[test]
fn test_darray_failed_growth_keeps_contents() {
    let mut a = DArray::with_capacity(2).unwrap().with_expand_rate(usize::MAX / 4);
    a.push(1u64).unwrap();
    a.push(2).unwrap();

    assert!(matches!(a.push(3), Err(Error::Alloc(_))));
    assert_eq!(a.len(), 2);
    assert_eq!(a.capacity(), 2);
    assert_eq!(a.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(a.pop(), Some(2));
}

// ------------------------------------------------------------------------------------------------
// LinkedList
// ------------------------------------------------------------------------------------------------

#[test]
fn test_list_push_pop() {
    let mut list = LinkedList::new();
    assert!(list.is_empty());
    assert_eq!(list.pop(), None);
    assert_eq!(list.pop_front(), None);

    list.push("a");
    list.push("b");
    list.push("c");
    assert_eq!(list.len(), 3);
    assert_eq!(list.first(), Some(&"a"));
    assert_eq!(list.last(), Some(&"c"));

    assert_eq!(list.pop(), Some("c"));
    assert_eq!(list.last(), Some(&"b"));
    assert_eq!(list.pop_front(), Some("a"));
    assert_eq!(list.first(), Some(&"b"));
    assert_eq!(list.pop(), Some("b"));
    assert!(list.is_empty());
    assert_eq!(list.first(), None);
    assert_eq!(list.last(), None);
}

#[test]
fn test_list_push_all_and_order() {
    let mut list = LinkedList::new();
    list.push_all(1..=5);
    list.extend([6, 7]);
    assert_eq!(list.to_vec(), vec![1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(list.iter().len(), 7);
    assert_eq!(format!("{:?}", list), "[1, 2, 3, 4, 5, 6, 7]");
}

#[test]
fn test_list_search() {
    let list: LinkedList<u32> = (0..10).map(|i| i * i).collect();
    assert!(list.contains(&49));
    assert!(!list.contains(&50));
    assert_eq!(list.find(|v| *v > 20), Some(&25));
    assert_eq!(list.position(|v| *v == 36), Some(6));
    assert_eq!(list.position(|v| *v == 37), None);
}

#[test]
fn test_list_remove_by_index() {
    let mut list = LinkedList::from(vec![10, 20, 30, 40]);
    assert_eq!(list.remove(4), None);
    assert_eq!(list.remove(1), Some(20));
    assert_eq!(list.remove(2), Some(40));
    assert_eq!(list.last(), Some(&30));

    // the tail stays usable after removing the old tail
    list.push(50);
    assert_eq!(list.to_vec(), vec![10, 30, 50]);
    assert_eq!(list.remove(0), Some(10));
    assert_eq!(list.first(), Some(&30));
    assert_eq!(list.len(), 2);
}

#[test]
fn test_list_mutation() {
    let mut list = LinkedList::from(vec![1, 2, 3]);
    if let Some(v) = list.find_mut(|v| *v == 2) {
        *v = 20;
    }
    for v in &mut list {
        *v += 1;
    }
    *list.push_mut(0) += 100;
    assert_eq!(list.to_vec(), vec![2, 21, 4, 100]);
}

#[test]
fn test_list_take_all_and_clear() {
    let mut list: LinkedList<String> = ["x", "y", "z"].into_iter().map(String::from).collect();
    let taken = list.take_all();
    assert_eq!(taken, vec!["x", "y", "z"]);
    assert!(list.is_empty());

    list.push("again".to_string());
    list.clear();
    assert!(list.is_empty());
    assert_eq!(list.first(), None);
}

#[test]
fn test_list_into_iter() {
    let list = LinkedList::from(vec![String::from("one"), String::from("two")]);
    let borrowed: Vec<&str> = (&list).into_iter().map(String::as_str).collect();
    assert_eq!(borrowed, vec!["one", "two"]);

    let owned: Vec<String> = list.into_iter().collect();
    assert_eq!(owned, vec!["one".to_string(), "two".to_string()]);

    // partially consumed iterator frees the rest
    let mut it = LinkedList::from(vec![vec![1u8], vec![2], vec![3]]).into_iter();
    assert_eq!(it.next(), Some(vec![1]));
    drop(it);
}
