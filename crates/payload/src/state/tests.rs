use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;

#[test]
fn ids_are_prefixed_and_monotonic() {
	let state = TreeState::new("app-");
	assert_eq!(state.uid(), "app-s1");
	assert_eq!(state.uid(), "app-s2");
	assert_eq!(state.head().uid(), "app-s3");
}

#[test]
fn copy_shares_id_generator() {
	let state = TreeState::new("");
	let fork = state.copy();
	assert_eq!(state.uid(), "s1");
	assert_eq!(fork.uid(), "s2");
	assert_eq!(state.uid(), "s3");
}

#[test]
fn styles_dedupe_by_hash() {
	let state = TreeState::default();
	assert!(state.add_style(StyleRecord::new("abc", "p { color: red }")));
	assert!(!state.add_style(StyleRecord::new("abc", "p { color: blue }")));
	assert!(state.add_style(StyleRecord::new("def", "h1 {}")));

	let styles = state.styles();
	assert_eq!(styles.len(), 2);
	let codes: Vec<_> = styles.records().map(|r| r.code.as_str()).collect();
	assert_eq!(codes, ["p { color: red }", "h1 {}"]);
}

#[test]
fn copy_isolates_styles_until_subsumed() {
	let state = TreeState::default();
	state.add_style(StyleRecord::new("a", "a"));
	let fork = state.copy();
	fork.add_style(StyleRecord::new("b", "b"));
	fork.head().set_title(Title::new(vec![2], "fork"));

	assert_eq!(state.styles().len(), 1);
	assert_eq!(state.head().title(), None);

	state.subsume(&fork);
	assert!(state.styles().contains("b"));
	assert_eq!(state.head().title(), Some(Title::new(vec![2], "fork")));
}

#[test]
fn subsume_self_is_noop() {
	let state = TreeState::default();
	state.add_style(StyleRecord::new("a", "a"));
	state.subsume(&state.clone());
	assert_eq!(state.styles().len(), 1);
}

#[test]
fn head_styles_are_separate_from_tree_styles() {
	let state = TreeState::default();
	assert!(state.head().add_style(StyleRecord::new("h", "head-only")));
	assert!(!state.head().add_style(StyleRecord::new("h", "dupe")));
	assert!(state.styles().is_empty());
	assert_eq!(state.head().styles(), [StyleRecord::new("h", "head-only")]);
}

#[rstest]
#[case(&[1], &[0], true)]
#[case(&[0], &[1], false)]
#[case(&[1], &[0, 1], true)]
#[case(&[0, 1], &[1], false)]
#[case(&[0, 1], &[0], true)]
#[case(&[0], &[0, 1], false)]
#[case(&[0, 1], &[0, 1], false)]
#[case(&[0], &[], true)]
#[case(&[], &[], false)]
fn path_ordering(#[case] candidate: &[usize], #[case] stored: &[usize], #[case] expected: bool) {
	assert_eq!(supersedes(candidate, stored), expected);
}

#[rstest]
#[case([0, 1, 2])]
#[case([0, 2, 1])]
#[case([1, 0, 2])]
#[case([1, 2, 0])]
#[case([2, 0, 1])]
#[case([2, 1, 0])]
fn title_winner_ignores_arrival_order(#[case] order: [usize; 3]) {
	let candidates = [
		Title::new(vec![0], "first"),
		Title::new(vec![1], "second"),
		Title::new(vec![0, 1], "nested"),
	];
	let head = TreeState::default().head();
	for i in order {
		head.set_title(candidates[i].clone());
	}
	assert_eq!(head.title().map(|t| t.value), Some("second".to_string()));
}

#[test]
fn equal_path_keeps_first_arrival() {
	let head = TreeState::default().head();
	assert!(head.set_title(Title::new(vec![3, 1], "early")));
	assert!(!head.set_title(Title::new(vec![3, 1], "late")));
	assert_eq!(head.title().map(|t| t.value), Some("early".to_string()));
}

#[test]
fn subsumed_state_is_detached_from_its_source() {
	let state = TreeState::default();
	let fork = state.copy();
	fork.add_style(StyleRecord::new("a", "a"));
	state.subsume(&fork);

	fork.add_style(StyleRecord::new("late", "late"));

	assert!(state.styles().contains("a"));
	assert!(!state.styles().contains("late"));
	assert!(fork.styles().contains("a"));
}
