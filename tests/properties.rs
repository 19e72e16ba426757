use std::collections::{BTreeMap, HashMap as StdHashMap, VecDeque};

use mysterious_collections::{
    ArrayList, ArrayStack, HashMap, LinkedList, RingQueue, Sequence, SortedList, SortedMap,
};
use proptest::prelude::*;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 500;

/// Small enough to make keys collide often.
fn key_strategy() -> impl Strategy<Value = i64> {
    -64i64..64i64
}

#[derive(Debug, Clone)]
enum MapOp {
    Insert(i64, i64),
    Add(i64, i64),
    Remove(i64),
    Get(i64),
    Clear,
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        6 => (key_strategy(), any::<i64>()).prop_map(|(k, v)| MapOp::Insert(k, v)),
        2 => (key_strategy(), any::<i64>()).prop_map(|(k, v)| MapOp::Add(k, v)),
        3 => key_strategy().prop_map(MapOp::Remove),
        2 => key_strategy().prop_map(MapOp::Get),
        1 => Just(MapOp::Clear),
    ]
}

#[derive(Debug, Clone)]
enum ListOp {
    Push(i32),
    Pop,
    Insert(usize, i32),
    Remove(usize),
    Set(usize, i32),
}

fn list_op_strategy() -> impl Strategy<Value = ListOp> {
    prop_oneof![
        4 => any::<i32>().prop_map(ListOp::Push),
        1 => Just(ListOp::Pop),
        2 => (0usize..40, any::<i32>()).prop_map(|(i, v)| ListOp::Insert(i, v)),
        2 => (0usize..40).prop_map(ListOp::Remove),
        1 => (0usize..40, any::<i32>()).prop_map(|(i, v)| ListOp::Set(i, v)),
    ]
}

/// Replays the same operations on one of ours and on a std model.
macro_rules! check_against_btreemap {
    ($map:expr, $ops:expr) => {{
        let mut ours = $map;
        let mut model: BTreeMap<i64, i64> = BTreeMap::new();

        for op in $ops {
            match op {
                MapOp::Insert(k, v) => {
                    prop_assert_eq!(model.insert(*k, *v), ours.insert(*k, *v), "insert({}, {})", k, v);
                }
                MapOp::Add(k, v) => {
                    let expected = !model.contains_key(k);
                    if expected {
                        model.insert(*k, *v);
                    }
                    prop_assert_eq!(expected, ours.add(*k, *v).is_ok(), "add({}, {})", k, v);
                }
                MapOp::Remove(k) => {
                    prop_assert_eq!(model.remove(k), ours.remove(k), "remove({})", k);
                }
                MapOp::Get(k) => {
                    prop_assert_eq!(model.get(k), ours.get(k), "get({})", k);
                }
                MapOp::Clear => {
                    model.clear();
                    ours.clear();
                }
            }
            prop_assert_eq!(model.len(), ours.len(), "len mismatch after {:?}", op);
        }

        (ours, model)
    }};
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn hash_map_matches_model(ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE)) {
        let (ours, model) = check_against_btreemap!(HashMap::new(), &ops);

        let mut entries = ours.to_vec();
        entries.sort();
        let expected: Vec<(i64, i64)> = model.into_iter().collect();
        prop_assert_eq!(expected, entries);
        prop_assert!(ours.load_factor() <= ours.max_load_factor());
    }

    #[test]
    fn sorted_list_matches_model(ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE)) {
        let (ours, model) = check_against_btreemap!(SortedList::new(), &ops);

        let expected: Vec<(i64, i64)> = model.into_iter().collect();
        prop_assert_eq!(expected, ours.to_vec());
    }

    #[test]
    fn sorted_map_matches_model(ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE)) {
        let (ours, model) = check_against_btreemap!(SortedMap::new(), &ops);

        let expected: Vec<(i64, i64)> = model.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(&expected, &ours.to_vec());
        for (rank, entry) in expected.iter().enumerate() {
            prop_assert_eq!(Some((&entry.0, &entry.1)), ours.nth(rank));
        }
    }

    #[test]
    fn last_put_wins(pairs in proptest::collection::vec((key_strategy(), any::<i64>()), 0..200)) {
        let model: StdHashMap<i64, i64> = pairs.iter().copied().collect();
        let hashed: HashMap<i64, i64> = pairs.iter().copied().collect();
        let listed: SortedList<i64, i64> = pairs.iter().copied().collect();
        let treed: SortedMap<i64, i64> = pairs.iter().copied().collect();

        prop_assert_eq!(model.len(), hashed.len());
        prop_assert_eq!(model.len(), listed.len());
        prop_assert_eq!(model.len(), treed.len());
        for (k, v) in &model {
            prop_assert_eq!(Some(v), hashed.get(k));
            prop_assert_eq!(Some(v), listed.get(k));
            prop_assert_eq!(Some(v), treed.get(k));
        }
    }

    #[test]
    fn array_list_matches_vec(ops in proptest::collection::vec(list_op_strategy(), TEST_SIZE)) {
        let mut ours: ArrayList<i32> = ArrayList::new();
        let mut model: Vec<i32> = Vec::new();

        for op in &ops {
            match *op {
                ListOp::Push(v) => {
                    ours.push(v);
                    model.push(v);
                }
                ListOp::Pop => prop_assert_eq!(model.pop(), ours.pop()),
                ListOp::Insert(i, v) => {
                    let result = ours.insert(i, v);
                    prop_assert_eq!(i <= model.len(), result.is_ok());
                    if i <= model.len() {
                        model.insert(i, v);
                    }
                }
                ListOp::Remove(i) => {
                    let expected = if i < model.len() { Some(model.remove(i)) } else { None };
                    prop_assert_eq!(expected, ours.remove(i).ok());
                }
                ListOp::Set(i, v) => {
                    let expected = model.get_mut(i).map(|slot| std::mem::replace(slot, v));
                    prop_assert_eq!(expected, ours.set(i, v).ok());
                }
            }
            prop_assert_eq!(model.len(), ours.len());
            prop_assert!(ours.capacity() >= ours.len());
        }

        prop_assert_eq!(&model[..], ours.as_slice());
        let walked: Vec<i32> = ours.cursor().copied().collect();
        prop_assert_eq!(model, walked);
    }

    #[test]
    fn stack_is_lifo(values in proptest::collection::vec(any::<i32>(), 0..100)) {
        let mut stack: ArrayStack<i32> = values.iter().copied().collect();
        let mut model = values.clone();

        prop_assert_eq!(model.last(), stack.try_peek());
        while let Some(v) = model.pop() {
            prop_assert_eq!(Ok(v), stack.pop());
        }
        prop_assert!(stack.is_empty());
        prop_assert!(stack.pop().is_err());
    }

    #[test]
    fn queue_matches_vecdeque(ops in proptest::collection::vec(prop::option::of(any::<i32>()), TEST_SIZE)) {
        let mut ours: RingQueue<i32> = RingQueue::new();
        let mut model: VecDeque<i32> = VecDeque::new();

        // Some(v) enqueues v, None dequeues.
        for op in &ops {
            match *op {
                Some(v) => {
                    ours.enqueue(v);
                    model.push_back(v);
                }
                None => prop_assert_eq!(model.pop_front(), ours.try_dequeue()),
            }
            prop_assert_eq!(model.len(), ours.len());
            prop_assert_eq!(model.front(), ours.try_peek());
        }

        let expected: Vec<i32> = model.into_iter().collect();
        prop_assert_eq!(&expected, &ours.to_vec());
        let walked: Vec<i32> = ours.cursor().copied().collect();
        prop_assert_eq!(expected, walked);
    }

    #[test]
    fn linked_list_removal_by_handle(
        values in proptest::collection::vec(any::<i16>(), 1..60),
        doomed in proptest::collection::vec(any::<bool>(), 60),
    ) {
        let mut list = LinkedList::new();
        let handles: Vec<_> = values.iter().map(|v| list.push_back(*v)).collect();

        let mut expected = Vec::new();
        for (i, handle) in handles.iter().enumerate() {
            if doomed[i] {
                prop_assert_eq!(Ok(values[i]), list.remove(handle));
                prop_assert!(!list.contains_node(handle));
                prop_assert!(list.remove(handle).is_err());
            } else {
                expected.push(values[i]);
            }
        }

        prop_assert_eq!(expected.len(), list.len());
        prop_assert_eq!(&expected, &list.to_vec());
        let backwards: Vec<i16> = list.iter().rev().copied().collect();
        let mut reversed = expected.clone();
        reversed.reverse();
        prop_assert_eq!(reversed, backwards);
    }

    #[test]
    fn containers_round_trip(values in proptest::collection::vec(any::<u8>(), 0..100)) {
        let list: ArrayList<u8> = values.iter().copied().collect();
        prop_assert_eq!(&values, &list.into_vec());

        let queue: RingQueue<u8> = values.iter().copied().collect();
        prop_assert_eq!(&values, &queue.into_iter().collect::<Vec<_>>());

        let linked: LinkedList<u8> = values.iter().copied().collect();
        prop_assert_eq!(&values, &linked.into_iter().collect::<Vec<_>>());

        // Stacks copy out top first; pushing the reversed copy restores them.
        let stack: ArrayStack<u8> = values.iter().copied().collect();
        let mut top_first = stack.to_vec();
        prop_assert_eq!(values.iter().rev().copied().collect::<Vec<_>>(), top_first.clone());
        top_first.reverse();
        let rebuilt: ArrayStack<u8> = top_first.into_iter().collect();
        prop_assert_eq!(stack.to_vec(), rebuilt.to_vec());

        let pairs = values.iter().copied().enumerate().map(|(i, v)| (v, i));

        // Hashed order is unspecified, so compare sorted copies.
        let hashed: HashMap<u8, usize> = pairs.clone().collect();
        let mut before = hashed.to_vec();
        before.sort();
        let mut after = hashed.into_iter().collect::<HashMap<u8, usize>>().to_vec();
        after.sort();
        prop_assert_eq!(before, after);

        let listed: SortedList<u8, usize> = pairs.clone().collect();
        let entries = listed.to_vec();
        prop_assert!(entries.windows(2).all(|w| w[0].0 < w[1].0));
        prop_assert_eq!(&entries, &listed.into_iter().collect::<SortedList<_, _>>().to_vec());

        let treed: SortedMap<u8, usize> = pairs.collect();
        prop_assert_eq!(&entries, &treed.to_vec());
        prop_assert_eq!(&entries, &treed.into_iter().collect::<SortedMap<_, _>>().to_vec());
    }
}
