pub mod sorted_list;
pub mod sorted_map;

pub use sorted_list::SortedList;
pub use sorted_map::SortedMap;

// Two takes on the same ordered dictionary. SortedList keeps parallel arrays
// and wins on positional access and memory; SortedMap is a balanced tree and
// wins once inserts and removals dominate.
